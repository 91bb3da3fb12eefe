mod support;

use std::sync::Arc;

use smart_parking::classifier::{BoostedTreeModel, Classifier, ModelRegistry};
use smart_parking::config::ModelsConfig;
use smart_parking::features::{derive, FeatureVector, VACANCY_COLUMNS, VEHICLE_COLUMNS};
use smart_parking::models::{ModelKind, TemporalInput, VacancyStatus, VehicleType};
use smart_parking::services::dataset::{VEHICLE_TEST_FILE, VEHICLE_TRAIN_FILE};
use smart_parking::services::{self, PrepareOptions};

fn registry(dir: &std::path::Path) -> ModelRegistry {
    let (vacancy_path, vehicle_path) = support::write_models(dir);
    ModelRegistry::from_config(&ModelsConfig {
        vacancy_path,
        vehicle_path,
        eager_load: false,
    })
}

#[test]
fn test_prediction_with_artifacts_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry(dir.path());

    let night = services::predict(&registry, &TemporalInput::new(2, 5, 30).unwrap()).unwrap();
    assert_eq!(night.vacancy.status, VacancyStatus::Vacant);
    assert_eq!(night.vehicle.vehicle_type, VehicleType::TwoWheeler);

    let day = services::predict(&registry, &TemporalInput::new(12, 0, 60).unwrap()).unwrap();
    assert_eq!(day.vacancy.status, VacancyStatus::Occupied);
    assert_eq!(day.vehicle.vehicle_type, VehicleType::TwoWheeler);
    assert_eq!(day.features.vacancy_features.to_array(), [12, 0, 0, 3]);
}

#[test]
fn test_served_and_offline_paths_agree() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry(dir.path());
    let vehicle = registry.vehicle().unwrap();

    for (hour, day, duration) in [(0, 0, 1), (9, 3, 119), (20, 6, 120), (23, 6, 1440)] {
        let input = TemporalInput::new(hour, day, duration).unwrap();
        let outcome = services::predict(&registry, &input).unwrap();
        let (_, features) = derive(hour, day, duration).unwrap();
        assert_eq!(outcome.vehicle.label, vehicle.predict(&features.to_row()).unwrap());
    }
}

#[tokio::test]
async fn test_concurrent_first_use_shares_one_model() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(registry(dir.path()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::task::spawn_blocking(move || registry.vacancy())
        })
        .collect();

    let mut models = Vec::new();
    for handle in handles {
        models.push(handle.await.unwrap().unwrap());
    }
    assert!(models.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert!(registry.handle(ModelKind::Vacancy).is_loaded());
    assert!(!registry.handle(ModelKind::Vehicle).is_loaded());
}

#[test]
fn test_wrong_kind_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_json(dir.path(), "vehicle.json", &support::vehicle_document());
    let err = BoostedTreeModel::from_file(ModelKind::Vacancy, &path).unwrap_err();
    assert!(err.is_load_failure());
}

#[test]
fn test_prepare_then_evaluate_vehicle_model() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("preprocessed_parking_data.csv");

    // Two wheelers stay under two hours, four wheelers longer.
    let mut table = String::from("Entry_Hour,Duration,DayOfWeek,Is_Weekend,Hour_Bin,Type of Vehicle_Two Wheeler\n");
    for i in 0..40i64 {
        let two_wheeler = i % 2 == 0;
        let duration = if two_wheeler { 30 + i } else { 180 + i };
        let (_, f) = derive(i % 24, i % 7, duration).unwrap();
        let [hour, _, day, weekend, bin] = f.to_array();
        table.push_str(&format!(
            "{},{},{},{},{},{}\n",
            hour,
            duration,
            day,
            weekend,
            bin,
            if two_wheeler { "True" } else { "False" }
        ));
    }
    std::fs::write(&input, table).unwrap();

    let out = dir.path().join("prepared");
    let report = services::prepare_training_data(&input, &out, PrepareOptions::default()).unwrap();
    assert_eq!(report.load.flag_mismatches, 0);
    assert_eq!(report.vehicle.positives, 20);
    assert_eq!(report.vehicle.negatives, 20);

    let (_, vehicle_path) = support::write_models(dir.path());
    let model = BoostedTreeModel::from_file(ModelKind::Vehicle, &vehicle_path).unwrap();

    for file in [VEHICLE_TRAIN_FILE, VEHICLE_TEST_FILE] {
        let samples = services::load_labeled(out.join(file), &VEHICLE_COLUMNS).unwrap();
        let evaluation = services::evaluate(&model, &samples).unwrap();
        assert_eq!(evaluation.accuracy, 1.0, "{}", file);
        assert_eq!(evaluation.confusion[0][1] + evaluation.confusion[1][0], 0);
    }

    // Vacancy tables carry the vacancy contract.
    let vacancy_rows = services::load_labeled(out.join("vacancy_test.csv"), &VACANCY_COLUMNS).unwrap();
    assert_eq!(vacancy_rows.len(), report.vacancy.test_rows);
    assert!(vacancy_rows.iter().all(|s| s.row.len() == 4 && s.label <= 1));
}
