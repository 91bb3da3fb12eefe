//! Lazily loaded, process-shared model handles.

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{BoostedTreeModel, Classifier, ErrorContext, ModelError, ModelResult};
use crate::config::ModelsConfig;
use crate::models::ModelKind;

/// A classifier that is loaded from disk on first use and then shared.
///
/// Concurrent first calls to [`LazyClassifier::get`] block on a single
/// initialisation; only one of them reads the artifact. A failed load leaves
/// the cell empty so the next call tries again.
pub struct LazyClassifier {
    kind: ModelKind,
    source: Option<PathBuf>,
    cell: OnceCell<Arc<dyn Classifier>>,
}

impl LazyClassifier {
    pub fn from_path(kind: ModelKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source: Some(path.into()),
            cell: OnceCell::new(),
        }
    }

    /// Wrap an already constructed classifier.
    pub fn preloaded(kind: ModelKind, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            kind,
            source: None,
            cell: OnceCell::with_value(classifier),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the shared classifier, loading it if needed.
    pub fn get(&self) -> ModelResult<Arc<dyn Classifier>> {
        self.cell
            .get_or_try_init(|| {
                let path = self.source.as_ref().ok_or_else(|| {
                    ModelError::configuration(
                        "no model source configured",
                        ErrorContext::new("load_model").with_model(self.kind),
                    )
                })?;
                let model = BoostedTreeModel::from_file(self.kind, path)?;
                Ok(Arc::new(model) as Arc<dyn Classifier>)
            })
            .map(Arc::clone)
    }
}

impl std::fmt::Debug for LazyClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyClassifier")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// The two classifiers served by the dashboard.
#[derive(Debug)]
pub struct ModelRegistry {
    vacancy: LazyClassifier,
    vehicle: LazyClassifier,
}

impl ModelRegistry {
    pub fn new(vacancy: LazyClassifier, vehicle: LazyClassifier) -> Self {
        Self { vacancy, vehicle }
    }

    pub fn from_config(config: &ModelsConfig) -> Self {
        Self::new(
            LazyClassifier::from_path(ModelKind::Vacancy, &config.vacancy_path),
            LazyClassifier::from_path(ModelKind::Vehicle, &config.vehicle_path),
        )
    }

    /// Registry backed by ready-made classifiers (tests, embedding).
    pub fn with_classifiers(vacancy: Arc<dyn Classifier>, vehicle: Arc<dyn Classifier>) -> Self {
        Self::new(
            LazyClassifier::preloaded(ModelKind::Vacancy, vacancy),
            LazyClassifier::preloaded(ModelKind::Vehicle, vehicle),
        )
    }

    pub fn handle(&self, kind: ModelKind) -> &LazyClassifier {
        match kind {
            ModelKind::Vacancy => &self.vacancy,
            ModelKind::Vehicle => &self.vehicle,
        }
    }

    pub fn vacancy(&self) -> ModelResult<Arc<dyn Classifier>> {
        self.vacancy.get()
    }

    pub fn vehicle(&self) -> ModelResult<Arc<dyn Classifier>> {
        self.vehicle.get()
    }

    /// Load both models now; used when `eager_load` is set.
    pub fn preload(&self) -> ModelResult<()> {
        self.vacancy.get()?;
        self.vehicle.get()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FixedClassifier;

    #[test]
    fn test_preloaded_is_loaded() {
        let handle = LazyClassifier::preloaded(
            ModelKind::Vacancy,
            Arc::new(FixedClassifier::positive(ModelKind::Vacancy)),
        );
        assert!(handle.is_loaded());
        assert!(handle.source().is_none());
        assert_eq!(handle.get().unwrap().predict(&[1.0, 0.0, 0.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_missing_file_not_cached() {
        let handle = LazyClassifier::from_path(ModelKind::Vacancy, "/nonexistent/vacancy.json");
        assert!(!handle.is_loaded());
        assert!(handle.get().is_err());
        assert!(!handle.is_loaded());
        // Still retries on the next call.
        assert!(matches!(handle.get(), Err(ModelError::Io { .. })));
    }

    #[test]
    fn test_registry_handles() {
        let registry = ModelRegistry::with_classifiers(
            Arc::new(FixedClassifier::positive(ModelKind::Vacancy)),
            Arc::new(FixedClassifier::negative(ModelKind::Vehicle)),
        );
        assert_eq!(registry.handle(ModelKind::Vacancy).kind(), ModelKind::Vacancy);
        assert_eq!(registry.handle(ModelKind::Vehicle).kind(), ModelKind::Vehicle);
        assert!(registry.preload().is_ok());
        assert_eq!(registry.vehicle().unwrap().info().kind, ModelKind::Vehicle);
    }

    #[test]
    fn test_from_config_is_lazy() {
        let config = ModelsConfig {
            vacancy_path: PathBuf::from("/nonexistent/a.json"),
            vehicle_path: PathBuf::from("/nonexistent/b.json"),
            eager_load: false,
        };
        let registry = ModelRegistry::from_config(&config);
        assert!(!registry.handle(ModelKind::Vacancy).is_loaded());
        assert_eq!(
            registry.handle(ModelKind::Vehicle).source(),
            Some(Path::new("/nonexistent/b.json"))
        );
        assert!(registry.preload().is_err());
    }
}
