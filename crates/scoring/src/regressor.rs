//! Regression over sentence embeddings.
//!
//! The predictor only sees the [`Regressor`] trait. [`RegressorModel`] is the
//! serialized form shipped next to the scaler: a linear model or a forest of
//! flat decision trees, stored as JSON tagged by `"type"`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ScoringError;

/// Summary of a loaded model, surfaced through `model_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegressorInfo {
    pub kind: String,
    pub input_dim: usize,
    /// Number of ensemble members; 1 for single models.
    pub members: usize,
}

/// Maps a feature vector to a raw, unbounded score.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f32]) -> Result<f64, ScoringError>;

    /// Per-member predictions for ensembles, `None` for single models.
    fn member_predictions(&self, features: &[f32]) -> Result<Option<Vec<f64>>, ScoringError> {
        let _ = features;
        Ok(None)
    }

    fn expected_dim(&self) -> usize;

    fn info(&self) -> RegressorInfo;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// One node of a flattened tree. Splits send `x[feature] <= threshold` left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Tree stored as a node array rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walks from the root. Bounded by the node count so a tree that skipped
    /// validation still cannot loop.
    fn evaluate(&self, features: &[f32]) -> Result<f64, ScoringError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        ScoringError::MalformedModel(format!("split on missing feature {feature}"))
                    })?;
                    idx = if f64::from(*x) <= *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(ScoringError::MalformedModel(
            "tree walk did not reach a leaf".into(),
        ))
    }

    /// Children must point strictly forward so evaluation always ends on a leaf.
    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ScoringError> {
        if self.nodes.is_empty() {
            return Err(ScoringError::MalformedModel(format!("tree {tree} has no nodes")));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } if !value.is_finite() => {
                    return Err(ScoringError::MalformedModel(format!(
                        "tree {tree} node {idx}: non-finite leaf value"
                    )));
                }
                TreeNode::Leaf { .. } => {}
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ScoringError::MalformedModel(format!(
                            "tree {tree} node {idx}: feature {feature} out of range for {n_features} features"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ScoringError::MalformedModel(format!(
                            "tree {tree} node {idx}: NaN threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ScoringError::MalformedModel(format!(
                                "tree {tree} node {idx}: child {child} must point forward within {} nodes",
                                self.nodes.len()
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Mean of independent regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegressorModel {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl RegressorModel {
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let model = Self::from_json(&fs::read_to_string(path)?)?;
        let info = model.info();
        info!(
            path = %path.display(),
            kind = %info.kind,
            input_dim = info.input_dim,
            members = info.members,
            "loaded regression model"
        );
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<(), ScoringError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        match self {
            RegressorModel::Linear(m) => {
                if m.weights.is_empty() {
                    return Err(ScoringError::MalformedModel("linear model has no weights".into()));
                }
                if let Some(w) = m.weights.iter().chain([&m.intercept]).find(|w| !w.is_finite()) {
                    return Err(ScoringError::NonFinite(*w));
                }
                Ok(())
            }
            RegressorModel::Forest(m) => {
                if m.n_features == 0 {
                    return Err(ScoringError::MalformedModel("forest has zero features".into()));
                }
                if m.trees.is_empty() {
                    return Err(ScoringError::MalformedModel("forest has no trees".into()));
                }
                m.trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, t)| t.validate(i, m.n_features))
            }
        }
    }

    fn check_input(&self, features: &[f32]) -> Result<(), ScoringError> {
        let expected = self.expected_dim();
        if features.len() != expected {
            return Err(ScoringError::Dimension {
                expected,
                actual: features.len(),
            });
        }
        if let Some(bad) = features.iter().find(|v| !v.is_finite()) {
            return Err(ScoringError::NonFinite(f64::from(*bad)));
        }
        Ok(())
    }
}

impl Regressor for RegressorModel {
    fn predict(&self, features: &[f32]) -> Result<f64, ScoringError> {
        self.check_input(features)?;
        match self {
            RegressorModel::Linear(m) => Ok(m
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * f64::from(*x))
                .sum::<f64>()
                + m.intercept),
            RegressorModel::Forest(m) => {
                let mut total = 0.0;
                for tree in &m.trees {
                    total += tree.evaluate(features)?;
                }
                Ok(total / m.trees.len() as f64)
            }
        }
    }

    fn member_predictions(&self, features: &[f32]) -> Result<Option<Vec<f64>>, ScoringError> {
        self.check_input(features)?;
        match self {
            RegressorModel::Linear(_) => Ok(None),
            RegressorModel::Forest(m) => m
                .trees
                .iter()
                .map(|t| t.evaluate(features))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
        }
    }

    fn expected_dim(&self) -> usize {
        match self {
            RegressorModel::Linear(m) => m.weights.len(),
            RegressorModel::Forest(m) => m.n_features,
        }
    }

    fn info(&self) -> RegressorInfo {
        match self {
            RegressorModel::Linear(m) => RegressorInfo {
                kind: "linear".into(),
                input_dim: m.weights.len(),
                members: 1,
            },
            RegressorModel::Forest(m) => RegressorInfo {
                kind: "forest".into(),
                input_dim: m.n_features,
                members: m.trees.len(),
            },
        }
    }
}
