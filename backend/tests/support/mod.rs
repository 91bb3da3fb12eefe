#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use smart_parking::features::{VACANCY_COLUMNS, VEHICLE_COLUMNS};
use smart_parking::models::ModelKind;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Model fixtures
// =============================================================================

/// One split on `feature`; `left` when `x < threshold`, else `right`.
pub fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Value {
    json!({
        "base_weights": [0.0, left, right],
        "default_left": [true, false, false],
        "id": 0,
        "left_children": [1, -1, -1],
        "right_children": [2, -1, -1],
        "split_conditions": [threshold, left, right],
        "split_indices": [feature, 0, 0],
        "tree_param": {"num_deleted": "0", "num_feature": "0", "num_nodes": "3", "size_leaf_vector": "1"}
    })
}

/// A complete model document with feature names for `kind`.
pub fn model_document(kind: ModelKind, trees: Vec<Value>) -> Value {
    let columns: &[&str] = match kind {
        ModelKind::Vacancy => &VACANCY_COLUMNS,
        ModelKind::Vehicle => &VEHICLE_COLUMNS,
    };
    let n_trees = trees.len();
    json!({
        "learner": {
            "attributes": {},
            "feature_names": columns,
            "feature_types": vec!["int"; columns.len()],
            "gradient_booster": {
                "model": {
                    "gbtree_model_param": {"num_parallel_tree": "1", "num_trees": n_trees.to_string()},
                    "tree_info": vec![0; n_trees],
                    "trees": trees
                },
                "name": "gbtree"
            },
            "learner_model_param": {
                "base_score": "[5E-1]",
                "num_class": "0",
                "num_feature": columns.len().to_string(),
                "num_target": "1"
            },
            "objective": {"name": "binary:logistic"}
        },
        "version": [2, 1, 0]
    })
}

/// Vacancy model: vacant before 06:00, occupied otherwise.
pub fn vacancy_document() -> Value {
    model_document(ModelKind::Vacancy, vec![stump(0, 6.0, 2.0, -2.0)])
}

/// Vehicle model: two wheeler for stays shorter than two hours.
pub fn vehicle_document() -> Value {
    model_document(ModelKind::Vehicle, vec![stump(1, 120.0, 1.5, -1.5)])
}

pub fn write_json(dir: &Path, name: &str, doc: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, doc.to_string()).expect("write model fixture");
    path
}

/// Write both fixture models into `dir` and return `(vacancy, vehicle)` paths.
pub fn write_models(dir: &Path) -> (PathBuf, PathBuf) {
    (
        write_json(dir, "vacancy.json", &vacancy_document()),
        write_json(dir, "vehicle.json", &vehicle_document()),
    )
}
