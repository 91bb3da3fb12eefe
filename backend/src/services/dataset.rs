//! Training data preparation.
//!
//! Reads the preprocessed feature table, re-derives every row through the
//! feature deriver, attaches synthetic vacancy labels and writes stratified
//! train/test tables for both models. The tree ensembles themselves are
//! trained outside this crate from these files.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::labeling::{SyntheticVacancyLabeler, DEFAULT_SEED};
use crate::features::{derive_input, FeatureVector, VacancyFeatures, VehicleFeatures};
use crate::models::TemporalInput;

pub const ENTRY_HOUR_COLUMN: &str = "Entry_Hour";
pub const DURATION_COLUMN: &str = "Duration";
pub const DAY_OF_WEEK_COLUMN: &str = "DayOfWeek";
pub const IS_WEEKEND_COLUMN: &str = "Is_Weekend";
pub const HOUR_BIN_COLUMN: &str = "Hour_Bin";
pub const VEHICLE_LABEL_COLUMN: &str = "Type of Vehicle_Two Wheeler";
pub const LABEL_COLUMN: &str = "label";

pub const VACANCY_TRAIN_FILE: &str = "vacancy_train.csv";
pub const VACANCY_TEST_FILE: &str = "vacancy_test.csv";
pub const VEHICLE_TRAIN_FILE: &str = "vehicle_train.csv";
pub const VEHICLE_TEST_FILE: &str = "vehicle_test.csv";

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Error type for dataset operations.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("CSV error in {source_name}: {message}")]
    Csv { source_name: String, message: String },

    #[error("Missing column '{column}' in {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("Invalid value '{value}' for {column} at row {row} of {source_name}")]
    InvalidValue {
        source_name: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error("No usable rows in {0}")]
    Empty(String),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// One accepted row of the source feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkingRecord {
    pub input: TemporalInput,
    /// 1 = two wheeler, 0 = four wheeler
    pub two_wheeler: u8,
}

/// Row counts gathered while reading the source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub accepted: usize,
    /// Rows with unparsable or out-of-domain values
    pub rejected: usize,
    /// Accepted rows whose stored Is_Weekend/Hour_Bin disagreed with the derived value
    pub flag_mismatches: usize,
}

/// A feature vector with its target label.
#[derive(Debug, Clone, PartialEq)]
pub struct Labeled<F> {
    pub features: F,
    pub label: u8,
}

/// A numeric row read back from a prepared table.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub row: Vec<f64>,
    pub label: u8,
}

struct ColumnIndex {
    entry_hour: usize,
    duration: usize,
    day_of_week: usize,
    vehicle_label: usize,
    is_weekend: Option<usize>,
    hour_bin: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord, source_name: &str) -> DatasetResult<Self> {
        let positions: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h.trim(), i)).collect();
        let required = |column: &str| {
            positions.get(column).copied().ok_or_else(|| DatasetError::MissingColumn {
                source_name: source_name.to_string(),
                column: column.to_string(),
            })
        };

        Ok(Self {
            entry_hour: required(ENTRY_HOUR_COLUMN)?,
            duration: required(DURATION_COLUMN)?,
            day_of_week: required(DAY_OF_WEEK_COLUMN)?,
            vehicle_label: required(VEHICLE_LABEL_COLUMN)?,
            is_weekend: positions.get(IS_WEEKEND_COLUMN).copied(),
            hour_bin: positions.get(HOUR_BIN_COLUMN).copied(),
        })
    }
}

/// Parse an integral cell; accepts `"12"` and `"12.0"`.
fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(i) = value.parse::<i64>() {
        return Some(i);
    }
    let f: f64 = value.parse().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse a boolean label cell (`True`/`False`/`1`/`0`).
fn parse_flag(value: &str) -> Option<u8> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(1),
        "false" | "0" | "0.0" => Some(0),
        _ => None,
    }
}

/// Read the preprocessed feature table from any reader.
///
/// Rows with unparsable or out-of-domain values are skipped and counted;
/// a missing required column is an error.
pub fn read_feature_table<R: Read>(
    reader: R,
    source_name: &str,
) -> DatasetResult<(Vec<ParkingRecord>, LoadSummary)> {
    // Short rows read as empty cells and are rejected like any bad value.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let csv_err = |e: csv::Error| DatasetError::Csv {
        source_name: source_name.to_string(),
        message: e.to_string(),
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = ColumnIndex::from_headers(&headers, source_name)?;

    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let row_number = i + 1;
        summary.rows_read += 1;

        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let parsed = (
            parse_integer(cell(columns.entry_hour)),
            parse_integer(cell(columns.day_of_week)),
            parse_integer(cell(columns.duration)),
            parse_flag(cell(columns.vehicle_label)),
        );
        let (Some(hour), Some(day), Some(duration), Some(two_wheeler)) = parsed else {
            log::warn!("{}: row {} has unparsable values, skipping", source_name, row_number);
            summary.rejected += 1;
            continue;
        };

        let input = match TemporalInput::new(hour, day, duration) {
            Ok(input) => input,
            Err(e) => {
                log::warn!("{}: row {} rejected: {}", source_name, row_number, e);
                summary.rejected += 1;
                continue;
            }
        };

        let (vacancy, _) = derive_input(&input);
        let [_, _, weekend, bin] = vacancy.to_array();
        let stored_weekend = columns.is_weekend.and_then(|idx| parse_flag(cell(idx)));
        let stored_bin = columns.hour_bin.and_then(|idx| parse_integer(cell(idx)));
        let weekend_differs = stored_weekend.is_some_and(|w| u32::from(w) != weekend);
        let bin_differs = stored_bin.is_some_and(|b| b != bin as i64);
        if weekend_differs || bin_differs {
            summary.flag_mismatches += 1;
        }

        records.push(ParkingRecord { input, two_wheeler });
        summary.accepted += 1;
    }

    Ok((records, summary))
}

pub fn load_feature_table<P: AsRef<Path>>(path: P) -> DatasetResult<(Vec<ParkingRecord>, LoadSummary)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_feature_table(std::io::BufReader::new(file), &path.display().to_string())
}

/// Split rows so each label keeps its share in both parts.
///
/// For every class, `round(n * test_fraction)` shuffled rows go to the test
/// set. Both outputs are shuffled. The result depends only on `seed`.
pub fn stratified_split<F: Clone>(
    rows: &[Labeled<F>],
    test_fraction: f64,
    seed: u64,
) -> DatasetResult<(Vec<Labeled<F>>, Vec<Labeled<F>>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DatasetError::InvalidSplit(format!(
            "test fraction {} must be in (0, 1)",
            test_fraction
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut members: Vec<Labeled<F>> = rows.iter().filter(|r| r.label == class).cloned().collect();
        members.shuffle(&mut rng);
        let n_test = (members.len() as f64 * test_fraction).round() as usize;
        let rest = members.split_off(n_test);
        test.extend(members);
        train.extend(rest);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Ok((train, test))
}

/// Write labeled vectors with the contract column names plus `label`.
pub fn write_labeled<F: FeatureVector, W: Write>(writer: W, rows: &[Labeled<F>]) -> DatasetResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| DatasetError::Csv {
        source_name: "output".to_string(),
        message: e.to_string(),
    };

    let mut header: Vec<&str> = F::columns().to_vec();
    header.push(LABEL_COLUMN);
    writer.write_record(&header).map_err(csv_err)?;

    for row in rows {
        let mut fields: Vec<String> = row.features.values().iter().map(|v| v.to_string()).collect();
        fields.push(row.label.to_string());
        writer.write_record(&fields).map_err(csv_err)?;
    }

    writer.flush().map_err(|e| DatasetError::Io {
        path: "output".to_string(),
        message: e.to_string(),
    })
}

fn write_labeled_file<F: FeatureVector>(path: &Path, rows: &[Labeled<F>]) -> DatasetResult<()> {
    let file = File::create(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    write_labeled(file, rows)
}

/// Read a prepared table, checking its header against `columns`.
pub fn read_labeled<R: Read>(reader: R, columns: &[&str], source_name: &str) -> DatasetResult<Vec<LabeledSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let csv_err = |e: csv::Error| DatasetError::Csv {
        source_name: source_name.to_string(),
        message: e.to_string(),
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    let positions: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h.trim(), i)).collect();
    let lookup = |column: &str| {
        positions.get(column).copied().ok_or_else(|| DatasetError::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string(),
        })
    };
    let feature_idx = columns.iter().map(|c| lookup(*c)).collect::<DatasetResult<Vec<_>>>()?;
    let label_idx = lookup(LABEL_COLUMN)?;

    let mut samples = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let invalid = |column: &str, value: &str| DatasetError::InvalidValue {
            source_name: source_name.to_string(),
            row: i + 1,
            column: column.to_string(),
            value: value.to_string(),
        };

        let mut row = Vec::with_capacity(feature_idx.len());
        for (column, idx) in columns.iter().zip(&feature_idx) {
            let value = record.get(*idx).unwrap_or("");
            let x: f64 = value.trim().parse().map_err(|_| invalid(*column, value))?;
            row.push(x);
        }
        let label_value = record.get(label_idx).unwrap_or("");
        let label = parse_flag(label_value).ok_or_else(|| invalid(LABEL_COLUMN, label_value))?;
        samples.push(LabeledSample { row, label });
    }
    Ok(samples)
}

pub fn load_labeled<P: AsRef<Path>>(path: P, columns: &[&str]) -> DatasetResult<Vec<LabeledSample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_labeled(std::io::BufReader::new(file), columns, &path.display().to_string())
}

/// Options for [`prepare_training_data`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepareOptions {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

/// Label balance and split sizes for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub positives: usize,
    pub negatives: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl SplitSummary {
    fn new<F>(train: &[Labeled<F>], test: &[Labeled<F>]) -> Self {
        let positives = train.iter().chain(test).filter(|r| r.label == 1).count();
        Self {
            positives,
            negatives: train.len() + test.len() - positives,
            train_rows: train.len(),
            test_rows: test.len(),
        }
    }
}

/// Outcome of [`prepare_training_data`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparationReport {
    pub load: LoadSummary,
    pub vacancy: SplitSummary,
    pub vehicle: SplitSummary,
    pub files: Vec<PathBuf>,
}

/// Build labeled datasets for both models from accepted records.
pub fn build_datasets(
    records: &[ParkingRecord],
    seed: u64,
) -> (Vec<Labeled<VacancyFeatures>>, Vec<Labeled<VehicleFeatures>>) {
    let mut labeler = SyntheticVacancyLabeler::new(seed);
    records
        .iter()
        .map(|record| {
            let (vacancy, vehicle) = derive_input(&record.input);
            let vacancy_label = labeler.label(&vacancy);
            (
                Labeled {
                    features: vacancy,
                    label: vacancy_label,
                },
                Labeled {
                    features: vehicle,
                    label: record.two_wheeler,
                },
            )
        })
        .unzip()
}

/// Read `input`, label, split and write the four training tables into
/// `output_dir`.
pub fn prepare_training_data(
    input: &Path,
    output_dir: &Path,
    options: PrepareOptions,
) -> DatasetResult<PreparationReport> {
    let (records, load) = load_feature_table(input)?;
    if records.is_empty() {
        return Err(DatasetError::Empty(input.display().to_string()));
    }
    log::info!(
        "Read {} rows from {} ({} accepted, {} rejected, {} flag mismatches)",
        load.rows_read,
        input.display(),
        load.accepted,
        load.rejected,
        load.flag_mismatches
    );

    let (vacancy_rows, vehicle_rows) = build_datasets(&records, options.seed);
    let (vacancy_train, vacancy_test) = stratified_split(&vacancy_rows, options.test_fraction, options.seed)?;
    let (vehicle_train, vehicle_test) = stratified_split(&vehicle_rows, options.test_fraction, options.seed)?;

    std::fs::create_dir_all(output_dir).map_err(|e| DatasetError::Io {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let files = vec![
        output_dir.join(VACANCY_TRAIN_FILE),
        output_dir.join(VACANCY_TEST_FILE),
        output_dir.join(VEHICLE_TRAIN_FILE),
        output_dir.join(VEHICLE_TEST_FILE),
    ];
    write_labeled_file(&files[0], &vacancy_train)?;
    write_labeled_file(&files[1], &vacancy_test)?;
    write_labeled_file(&files[2], &vehicle_train)?;
    write_labeled_file(&files[3], &vehicle_test)?;

    Ok(PreparationReport {
        load,
        vacancy: SplitSummary::new(&vacancy_train, &vacancy_test),
        vehicle: SplitSummary::new(&vehicle_train, &vehicle_test),
        files,
    })
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod dataset_tests;
