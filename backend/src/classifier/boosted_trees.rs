//! Evaluator for gradient-boosted tree ensembles saved in the native JSON
//! model format (`save_model("*.json")`).
//!
//! Only the pieces needed for binary inference are read:
//!
//! ```text
//! learner
//! ├── feature_names                  (optional)
//! ├── learner_model_param.base_score  "5E-1" | "[5E-1]"
//! ├── learner_model_param.num_feature "4"
//! ├── objective.name                  "binary:logistic"
//! └── gradient_booster.model.trees[]
//!     ├── left_children / right_children   (-1 marks a leaf)
//!     ├── split_indices / split_conditions (leaf value for leaves)
//!     └── default_left                     (0/1 or bool)
//! ```
//!
//! A row goes left at a split iff `x[split_index] < split_condition`; a NaN
//! feature follows `default_left`. The margin is `logit(base_score)` plus the
//! sum of one leaf per tree, and `p1 = sigmoid(margin)`.

use serde::Deserialize;
use std::path::Path;

use super::{
    calculate_checksum, check_row_width, expected_columns, Classifier, ErrorContext, ModelError,
    ModelInfo, ModelResult,
};
use crate::models::ModelKind;

const SUPPORTED_OBJECTIVE: &str = "binary:logistic";

// =============================================================================
// On-disk document
// =============================================================================

#[derive(Debug, Deserialize)]
struct ModelDocument {
    learner: LearnerDoc,
    #[serde(default)]
    version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct LearnerDoc {
    #[serde(default)]
    feature_names: Vec<String>,
    learner_model_param: LearnerModelParam,
    objective: ObjectiveDoc,
    gradient_booster: GradientBoosterDoc,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: Scalar,
    num_feature: Scalar,
}

#[derive(Debug, Deserialize)]
struct ObjectiveDoc {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GradientBoosterDoc {
    name: String,
    #[serde(default)]
    model: Option<TreeEnsembleDoc>,
}

#[derive(Debug, Deserialize)]
struct TreeEnsembleDoc {
    trees: Vec<TreeDoc>,
}

#[derive(Debug, Deserialize)]
struct TreeDoc {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
}

/// Numeric parameters are written as strings, sometimes wrapped in brackets.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s
                .trim()
                .trim_start_matches('[')
                .trim_end_matches(']')
                .trim()
                .parse()
                .ok(),
        }
    }
}

/// Older writers emit integers, newer ones booleans.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(i) => *i != 0,
        }
    }
}

// =============================================================================
// Compiled ensemble
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f32),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn compile(index: usize, doc: TreeDoc, num_feature: usize, ctx: &ErrorContext) -> ModelResult<Self> {
        let n = doc.left_children.len();
        let tree_ctx = |details: String| ctx.clone().with_details(format!("tree {}: {}", index, details));

        if n == 0 {
            return Err(ModelError::parse("tree has no nodes", tree_ctx("empty".into())));
        }
        if doc.right_children.len() != n
            || doc.split_indices.len() != n
            || doc.split_conditions.len() != n
            || doc.default_left.len() != n
        {
            return Err(ModelError::parse(
                "node arrays have different lengths",
                tree_ctx(format!(
                    "left={}, right={}, split_indices={}, split_conditions={}, default_left={}",
                    n,
                    doc.right_children.len(),
                    doc.split_indices.len(),
                    doc.split_conditions.len(),
                    doc.default_left.len()
                )),
            ));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = doc.left_children[i];
            let right = doc.right_children[i];
            if left == -1 {
                nodes.push(Node::Leaf(doc.split_conditions[i]));
                continue;
            }

            // Children always follow their parent, which rules out cycles.
            let in_range = |c: i64| c > i as i64 && (c as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(ModelError::parse(
                    "child index out of range",
                    tree_ctx(format!("node {} -> ({}, {})", i, left, right)),
                ));
            }
            let feature = doc.split_indices[i];
            if feature < 0 || feature as usize >= num_feature {
                return Err(ModelError::parse(
                    "split feature out of range",
                    tree_ctx(format!("node {} splits on feature {}", i, feature)),
                ));
            }

            nodes.push(Node::Split {
                feature: feature as usize,
                threshold: doc.split_conditions[i],
                left: left as usize,
                right: right as usize,
                default_left: doc.default_left[i].is_set(),
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, row: &[f64]) -> f32 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = row[*feature];
                    idx = if x.is_nan() {
                        if *default_left {
                            *left
                        } else {
                            *right
                        }
                    } else if (x as f32) < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// A binary-logistic tree ensemble ready for inference.
#[derive(Debug, Clone)]
pub struct BoostedTreeModel {
    kind: ModelKind,
    trees: Vec<Tree>,
    base_margin: f64,
    num_feature: usize,
    feature_names: Vec<String>,
    format_version: Vec<u32>,
    source: Option<String>,
    checksum: String,
}

impl BoostedTreeModel {
    /// Load and validate a model artifact from disk.
    pub fn from_file<P: AsRef<Path>>(kind: ModelKind, path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| {
            ModelError::io(
                format!("Failed to read model file: {}", e),
                ErrorContext::new("load_model").with_model(kind).with_path(display.clone()),
            )
        })?;

        let mut model = Self::from_slice(kind, &bytes)?;
        model.source = Some(display);
        log::info!(
            "Loaded {} model from {} ({} trees, checksum {})",
            kind,
            path.display(),
            model.trees.len(),
            &model.checksum[..12]
        );
        Ok(model)
    }

    pub fn from_json_str(kind: ModelKind, json: &str) -> ModelResult<Self> {
        Self::from_slice(kind, json.as_bytes())
    }

    pub fn from_slice(kind: ModelKind, bytes: &[u8]) -> ModelResult<Self> {
        let ctx = ErrorContext::new("load_model").with_model(kind);
        let doc: ModelDocument = serde_json::from_slice(bytes)
            .map_err(|e| ModelError::parse(format!("Invalid model JSON: {}", e), ctx.clone()))?;
        let checksum = calculate_checksum(bytes);
        let learner = doc.learner;

        if learner.objective.name != SUPPORTED_OBJECTIVE {
            return Err(ModelError::unsupported(
                format!(
                    "objective '{}' is not supported, expected '{}'",
                    learner.objective.name, SUPPORTED_OBJECTIVE
                ),
                ctx,
            ));
        }
        if learner.gradient_booster.name != "gbtree" {
            return Err(ModelError::unsupported(
                format!("booster '{}' is not supported, expected 'gbtree'", learner.gradient_booster.name),
                ctx,
            ));
        }

        let base_score = learner
            .learner_model_param
            .base_score
            .as_f64()
            .ok_or_else(|| ModelError::parse("base_score is not a number", ctx.clone()))?;
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(ModelError::parse(
                format!("base_score {} is outside (0, 1)", base_score),
                ctx,
            ));
        }

        let num_feature = learner
            .learner_model_param
            .num_feature
            .as_f64()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .ok_or_else(|| ModelError::parse("num_feature is not a non-negative integer", ctx.clone()))?
            as usize;

        let expected = expected_columns(kind);
        if num_feature != expected.len() {
            return Err(ModelError::feature_mismatch(
                format!(
                    "model was trained on {} features, {} model expects {}",
                    num_feature,
                    kind,
                    expected.len()
                ),
                ctx,
            ));
        }
        if !learner.feature_names.is_empty() && learner.feature_names.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(ModelError::feature_mismatch(
                format!(
                    "feature names {:?} do not match expected order {:?}",
                    learner.feature_names, expected
                ),
                ctx,
            ));
        }

        let ensemble = learner
            .gradient_booster
            .model
            .ok_or_else(|| ModelError::parse("gradient_booster.model is missing", ctx.clone()))?;
        let trees = ensemble
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| Tree::compile(i, t, num_feature, &ctx))
            .collect::<ModelResult<Vec<_>>>()?;

        Ok(Self {
            kind,
            trees,
            base_margin: (base_score / (1.0 - base_score)).ln(),
            num_feature,
            feature_names: expected.iter().map(|c| c.to_string()).collect(),
            format_version: doc.version,
            source: None,
            checksum,
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Writer version recorded in the artifact, e.g. `[2, 0, 3]`.
    pub fn format_version(&self) -> &[u32] {
        &self.format_version
    }

    /// Raw log-odds before the sigmoid.
    pub fn margin(&self, row: &[f64]) -> ModelResult<f64> {
        check_row_width(self.kind, self.num_feature, row)?;
        let leaves: f64 = self.trees.iter().map(|t| t.leaf_value(row) as f64).sum();
        Ok(self.base_margin + leaves)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for BoostedTreeModel {
    fn info(&self) -> ModelInfo {
        ModelInfo {
            kind: self.kind,
            backend: "boosted_trees".to_string(),
            objective: SUPPORTED_OBJECTIVE.to_string(),
            n_features: self.num_feature,
            feature_names: self.feature_names.clone(),
            n_trees: Some(self.trees.len()),
            source: self.source.clone(),
            checksum: Some(self.checksum.clone()),
        }
    }

    fn n_features(&self) -> usize {
        self.num_feature
    }

    fn predict_proba(&self, row: &[f64]) -> ModelResult<[f64; 2]> {
        let p1 = sigmoid(self.margin(row)?);
        Ok([1.0 - p1, p1])
    }
}

#[cfg(test)]
#[path = "boosted_trees_tests.rs"]
mod boosted_trees_tests;
