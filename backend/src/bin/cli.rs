//! Smart Parking operational CLI
//!
//! Feature previews, one-off predictions, training data preparation and
//! model inspection from the command line.
//!
//! # Usage
//!
//! ```bash
//! parking-cli features --hour 12 --day 0 --duration 60
//! parking-cli predict --hour 23 --day 6 --duration 1440
//! parking-cli prepare-data --input data/preprocessed_parking_data.csv --output-dir data/prepared
//! parking-cli evaluate --kind vacancy --model models/xgb_parking_vacancy_model.json \
//!     --data data/prepared/vacancy_test.csv
//! parking-cli inspect --kind vehicle --model models/xgb_vehicle_type_model.json
//! parking-cli init-config
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use smart_parking::classifier::{expected_columns, BoostedTreeModel, Classifier, ModelRegistry};
use smart_parking::config::{ServiceConfig, CONFIG_FILE_NAME};
use smart_parking::features::FeatureVector;
use smart_parking::models::{ModelKind, TemporalInput};
use smart_parking::services::{self, PrepareOptions};

#[derive(Parser)]
#[command(name = "parking-cli")]
#[command(about = "Smart parking feature derivation and model tooling", long_about = None)]
struct Cli {
    /// Config file path (default: search for parking.toml)
    #[arg(short, long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print both feature vectors for one input
    Features {
        #[command(flatten)]
        input: InputArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run both models on one input
    Predict {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Build labeled train/test tables from the preprocessed feature table
    PrepareData {
        /// Preprocessed feature table (CSV)
        #[arg(long)]
        input: PathBuf,
        /// Directory for the four output tables
        #[arg(long)]
        output_dir: PathBuf,
        /// Fraction of each class held out for testing
        #[arg(long, default_value_t = services::dataset::DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
        /// Seed for labeling and shuffling
        #[arg(long, default_value_t = services::labeling::DEFAULT_SEED)]
        seed: u64,
    },
    /// Score a model artifact on a prepared table
    Evaluate {
        /// vacancy or vehicle
        #[arg(long)]
        kind: ModelKind,
        /// Model artifact (JSON)
        #[arg(long)]
        model: PathBuf,
        /// Prepared table with a label column
        #[arg(long)]
        data: PathBuf,
    },
    /// Show model metadata and checksum
    Inspect {
        /// vacancy or vehicle
        #[arg(long)]
        kind: ModelKind,
        /// Model artifact (JSON)
        #[arg(long)]
        model: PathBuf,
    },
    /// Write a default configuration file
    InitConfig {
        /// Output path
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Entry hour (0-23)
    #[arg(long)]
    hour: i64,
    /// Day of week (0 = Monday, 6 = Sunday)
    #[arg(long)]
    day: i64,
    /// Parking duration in minutes (1-1440)
    #[arg(long)]
    duration: i64,
}

impl InputArgs {
    fn validate(&self) -> anyhow::Result<TemporalInput> {
        Ok(TemporalInput::new(self.hour, self.day, self.duration)?)
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Features { input, json } => commands::features(&input, json),
        Commands::Predict { input } => commands::predict(cli.config, &input),
        Commands::PrepareData {
            input,
            output_dir,
            test_fraction,
            seed,
        } => commands::prepare_data(input, output_dir, PrepareOptions { test_fraction, seed }),
        Commands::Evaluate { kind, model, data } => commands::evaluate(kind, model, data),
        Commands::Inspect { kind, model } => commands::inspect(kind, model),
        Commands::InitConfig { path, force } => commands::init_config(path, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;

    fn print_vector(title: &str, vector: &impl FeatureVector) {
        println!("{}:", title);
        for (column, value) in vector.named() {
            println!("  {:<12} {}", column, value);
        }
    }

    pub fn features(input: &InputArgs, json: bool) -> anyhow::Result<()> {
        let preview = services::preview(&input.validate()?);
        if json {
            println!("{}", serde_json::to_string_pretty(&preview)?);
        } else {
            print_vector("Vacancy features", &preview.vacancy_features);
            print_vector("Vehicle features", &preview.vehicle_features);
        }
        Ok(())
    }

    pub fn predict(config: Option<PathBuf>, input: &InputArgs) -> anyhow::Result<()> {
        let input = input.validate()?;
        let config = ServiceConfig::load(config.as_deref())?;
        let registry = ModelRegistry::from_config(&config.models);
        let outcome = services::predict(&registry, &input)?;

        let [p_occupied, p_vacant] = outcome.vacancy.probabilities;
        let [p_four, p_two] = outcome.vehicle.probabilities;
        println!(
            "Vacancy: {} (occupied {:.3}, vacant {:.3})",
            outcome.vacancy.status, p_occupied, p_vacant
        );
        println!(
            "Vehicle: {} (four wheeler {:.3}, two wheeler {:.3})",
            outcome.vehicle.vehicle_type, p_four, p_two
        );
        Ok(())
    }

    pub fn prepare_data(input: PathBuf, output_dir: PathBuf, options: PrepareOptions) -> anyhow::Result<()> {
        let report = services::prepare_training_data(&input, &output_dir, options)
            .with_context(|| format!("preparing training data from {}", input.display()))?;

        println!(
            "Rows: {} read, {} accepted, {} rejected, {} flag mismatches",
            report.load.rows_read, report.load.accepted, report.load.rejected, report.load.flag_mismatches
        );
        for (name, split) in [("vacancy", &report.vacancy), ("vehicle", &report.vehicle)] {
            println!(
                "{:<8} positives {:>6}  negatives {:>6}  train {:>6}  test {:>6}",
                name, split.positives, split.negatives, split.train_rows, split.test_rows
            );
        }
        for file in &report.files {
            println!("Wrote {}", file.display());
        }
        Ok(())
    }

    pub fn evaluate(kind: ModelKind, model: PathBuf, data: PathBuf) -> anyhow::Result<()> {
        let classifier = BoostedTreeModel::from_file(kind, &model)?;
        let samples = services::load_labeled(&data, expected_columns(kind))
            .with_context(|| format!("reading {}", data.display()))?;
        let report = services::evaluate(&classifier, &samples)?;
        print!("{}", report);
        Ok(())
    }

    pub fn inspect(kind: ModelKind, model: PathBuf) -> anyhow::Result<()> {
        let classifier = BoostedTreeModel::from_file(kind, &model)?;
        let info = classifier.info();
        println!("Model:      {}", info.kind);
        println!("Source:     {}", model.display());
        println!("Objective:  {}", info.objective);
        println!("Trees:      {}", classifier.n_trees());
        println!("Features:   {}", info.feature_names.join(", "));
        println!("Version:    {:?}", classifier.format_version());
        println!("Checksum:   {}", classifier.checksum());
        Ok(())
    }

    pub fn init_config(path: PathBuf, force: bool) -> anyhow::Result<()> {
        if path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }
        ServiceConfig::default().save(&path)?;
        println!("Created default config at {}", path.display());
        Ok(())
    }
}
