//! Service configuration file support.
//!
//! Configuration is read from a TOML file and then overridden by environment
//! variables:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [models]
//! vacancy_path = "models/xgb_parking_vacancy_model.json"
//! vehicle_path = "models/xgb_vehicle_type_model.json"
//! eager_load = false
//! ```
//!
//! | Variable             | Overrides             |
//! |----------------------|-----------------------|
//! | `HOST`               | `server.host`         |
//! | `PORT`               | `server.port`         |
//! | `VACANCY_MODEL_PATH` | `models.vacancy_path` |
//! | `VEHICLE_MODEL_PATH` | `models.vehicle_path` |

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "parking.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to write config file {path}: {message}")]
    Write { path: String, message: String },
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub models: ModelsConfig,
}

/// HTTP bind settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Model artifact locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_vacancy_path")]
    pub vacancy_path: PathBuf,
    #[serde(default = "default_vehicle_path")]
    pub vehicle_path: PathBuf,
    /// Load both models at startup instead of on first request.
    #[serde(default)]
    pub eager_load: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_vacancy_path() -> PathBuf {
    PathBuf::from("models/xgb_parking_vacancy_model.json")
}

fn default_vehicle_path() -> PathBuf {
    PathBuf::from("models/xgb_vehicle_type_model.json")
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            vacancy_path: default_vacancy_path(),
            vehicle_path: default_vehicle_path(),
            eager_load: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(ServiceConfig)` if successful
    /// * `Err(ConfigError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Find a configuration file in the default locations.
    ///
    /// Searches for `parking.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Without one, the default locations are
    /// searched and built-in defaults are used if nothing is found.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::find_default_file() {
                Some(path) => {
                    log::debug!("Using configuration file {}", path.display());
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `VACANCY_MODEL_PATH` and `VEHICLE_MODEL_PATH`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("{} ({})", port, e),
            })?;
        }
        if let Ok(path) = std::env::var("VACANCY_MODEL_PATH") {
            self.models.vacancy_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("VEHICLE_MODEL_PATH") {
            self.models.vehicle_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "server.host".to_string(),
                message: format!("{} ({})", self.server.host, e),
            })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            message: e.to_string(),
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
