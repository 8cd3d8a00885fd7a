#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use scoring::{DecisionTree, ForestModel, LinearModel, TreeNode};
use ticket_severity::{
    EMBEDDINGS_INFO_FILE, EmbeddingBackend, EmbeddingConfig, EmbeddingEncoder, EmbeddingError,
    EmbeddingsInfo, MODEL_FILE, ModelArtifacts, RegressorModel, SCALER_FILE, SeverityConfig,
    SeverityPredictor, SeverityScaler, StubBackend,
};

pub const DIM: usize = 16;
pub const MODEL_NAME: &str = "stub-minilm";

pub fn linear_model() -> RegressorModel {
    RegressorModel::Linear(LinearModel {
        weights: (0..DIM).map(|i| if i % 2 == 0 { 0.3 } else { -0.1 }).collect(),
        intercept: 0.2,
    })
}

/// Two stumps on features 0 and 1 plus a constant tree.
pub fn forest_model() -> RegressorModel {
    let stump = |feature: usize, low: f64, high: f64| DecisionTree {
        nodes: vec![
            TreeNode::Split {
                feature,
                threshold: 0.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ],
    };
    RegressorModel::Forest(ForestModel {
        n_features: DIM,
        trees: vec![
            stump(0, -0.5, 1.0),
            stump(1, 0.0, 0.8),
            DecisionTree {
                nodes: vec![TreeNode::Leaf { value: 0.3 }],
            },
        ],
    })
}

/// Writes a complete bundle: `model`, a scaler fitted on `fit_on`, and
/// embeddings info for the stub model.
pub fn write_bundle(dir: &Path, model: &RegressorModel, fit_on: &[f64]) {
    model.save(&dir.join(MODEL_FILE)).expect("save model");
    let mut scaler = SeverityScaler::default();
    scaler.fit(fit_on).expect("fit scaler");
    scaler.save(&dir.join(SCALER_FILE)).expect("save scaler");
    let info = EmbeddingsInfo {
        model_name: MODEL_NAME.into(),
        embedding_dim: DIM,
    };
    fs::write(
        dir.join(EMBEDDINGS_INFO_FILE),
        serde_json::to_vec_pretty(&info).expect("encode info"),
    )
    .expect("write info");
}

pub fn config_for(dir: &Path) -> SeverityConfig {
    SeverityConfig {
        model_dir: dir.to_path_buf(),
        ..SeverityConfig::default()
    }
}

/// A stub-backed predictor over a freshly written linear bundle.
pub fn stub_predictor() -> (tempfile::TempDir, SeverityPredictor) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_bundle(dir.path(), &linear_model(), &[-2.0, 2.0]);
    let predictor = SeverityPredictor::new(config_for(dir.path())).expect("predictor");
    (dir, predictor)
}

/// Fails for any text containing `poison`, otherwise defers to the stub.
pub struct PoisonedBackend {
    inner: StubBackend,
}

impl PoisonedBackend {
    pub fn new() -> Self {
        Self {
            inner: StubBackend::new(DIM),
        }
    }
}

#[async_trait]
impl EmbeddingBackend for PoisonedBackend {
    fn name(&self) -> &'static str {
        "poisoned"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.iter().any(|t| t.contains("poison")) {
            return Err(EmbeddingError::Inference("model rejected input".into()));
        }
        self.inner.embed(texts).await
    }
}

/// Always answers with vectors of the wrong length.
pub struct ShortBackend;

#[async_trait]
impl EmbeddingBackend for ShortBackend {
    fn name(&self) -> &'static str {
        "short"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| vec![0.5; DIM / 2]).collect())
    }
}

/// Builds a predictor over the bundle in `dir` with a custom backend.
pub fn predictor_with_backend(
    dir: &Path,
    cfg: SeverityConfig,
    backend: Arc<dyn EmbeddingBackend>,
) -> SeverityPredictor {
    let artifacts = ModelArtifacts::load(dir).expect("artifacts");
    let encoder = EmbeddingEncoder::with_backend(
        EmbeddingConfig {
            model_name: MODEL_NAME.into(),
            dimension: DIM,
            ..EmbeddingConfig::default()
        },
        backend,
    )
    .expect("encoder");
    SeverityPredictor::from_parts(cfg, artifacts, encoder).expect("predictor")
}

pub const TICKETS: &[&str] = &[
    "Production database is down, all users affected!!!",
    "Printer on floor 3 is out of toner",
    "Cannot login to VPN since morning, pwd reset did not help",
    "Please install Adobe reader on my laptop",
    "सर्वर डाउन है, कोई भी काम नहीं कर पा रहा",
    "ईमेल नहीं आ रहे हैं",
    "Payroll app crashes when exporting the monthly report",
    "wifi slow in conference room B",
    "VPN sign-in नहीं हो रहा है",
    "Single sign-on portal rejects my password",
];
