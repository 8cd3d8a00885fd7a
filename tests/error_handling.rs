mod common;

use std::fs;
use std::sync::Arc;

use common::{
    DIM, PoisonedBackend, ShortBackend, config_for, linear_model, predictor_with_backend,
    write_bundle,
};
use ticket_severity::{
    ArtifactError, CategoryScheme, EmbeddingConfig, EmbeddingEncoder, Language, MODEL_FILE, ModelArtifacts,
    PredictionStatus, PredictorError, SCALER_FILE, SeverityCategory, SeverityPredictor,
    StubBackend,
};

#[tokio::test]
async fn failing_item_does_not_abort_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), &linear_model(), &[-2.0, 2.0]);
    let predictor =
        predictor_with_backend(dir.path(), config_for(dir.path()), Arc::new(PoisonedBackend::new()));

    let tickets = [
        "Email server unreachable",
        "POISON pill ticket",
        "Laptop battery swollen",
    ];
    let report = predictor.predict_batch_report(&tickets).await;

    assert_eq!(report.predictions.len(), 3);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.success_count, 2);

    let failed = &report.predictions[1].result;
    assert_eq!(failed.severity_score, 50.0);
    assert_eq!(failed.severity_category, SeverityCategory::Medium);
    assert_eq!(failed.confidence, 0.0);
    assert_eq!(failed.status, PredictionStatus::Degraded);
    assert!(failed.error.as_deref().unwrap().contains("model rejected input"));
    assert_eq!(failed.detected_language, Language::En);
    assert_eq!(failed.processed_text, "poison pill ticket");

    for i in [0, 2] {
        let ok = &report.predictions[i].result;
        assert_eq!(ok.status, PredictionStatus::Scored);
        assert!(ok.error.is_none());
    }
}

#[tokio::test]
async fn degraded_category_follows_five_band_scheme() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), &linear_model(), &[-2.0, 2.0]);
    let mut cfg = config_for(dir.path());
    cfg.scoring.scheme = CategoryScheme::FiveBand;
    let predictor = predictor_with_backend(dir.path(), cfg, Arc::new(PoisonedBackend::new()));

    let failed = predictor.predict_single("poison in the mail queue").await;
    assert_eq!(failed.status, PredictionStatus::Degraded);
    assert_eq!(failed.severity_score, 50.0);
    assert_eq!(
        failed.severity_category,
        CategoryScheme::FiveBand.categorize(failed.severity_score)
    );
    assert!(predictor.validate_prediction(&failed));
}

#[tokio::test]
async fn wrong_embedding_dimension_degrades() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), &linear_model(), &[-2.0, 2.0]);
    let predictor =
        predictor_with_backend(dir.path(), config_for(dir.path()), Arc::new(ShortBackend));

    let result = predictor.predict_single("Disk quota exceeded").await;
    assert_eq!(result.status, PredictionStatus::Degraded);
    assert_eq!(result.severity_score, 50.0);
    assert!(predictor.validate_prediction(&result));
}

#[tokio::test]
async fn oversized_input_falls_back_to_raw_text() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), &linear_model(), &[-2.0, 2.0]);
    let mut cfg = config_for(dir.path());
    cfg.cleaner.max_input_chars = 10;
    let predictor = SeverityPredictor::new(cfg).unwrap();

    let text = "Outlook KEEPS crashing!!! on startup";
    let result = predictor.predict_single(text).await;
    assert_eq!(result.status, PredictionStatus::Scored);
    assert_eq!(result.processed_text, text);
}

#[test]
fn missing_model_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = SeverityPredictor::new(config_for(&dir.path().join("nope"))).unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Artifact(ArtifactError::Missing(ref path)) if path.ends_with(MODEL_FILE)
    ));
}

#[test]
fn corrupt_scaler_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), &linear_model(), &[-2.0, 2.0]);
    fs::write(
        dir.path().join(SCALER_FILE),
        r#"{"min_score":10.0,"max_score":100.0,"original_min":null,"original_max":null,"is_fitted":false}"#,
    )
    .unwrap();
    assert!(matches!(
        SeverityPredictor::new(config_for(dir.path())),
        Err(PredictorError::Artifact(ArtifactError::Model { .. }))
    ));
}

#[test]
fn encoder_dimension_must_match_regressor() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), &linear_model(), &[-2.0, 2.0]);
    let artifacts = ModelArtifacts::load(dir.path()).unwrap();
    let encoder = EmbeddingEncoder::with_backend(
        EmbeddingConfig {
            dimension: DIM * 2,
            ..EmbeddingConfig::default()
        },
        Arc::new(StubBackend::new(DIM * 2)),
    )
    .unwrap();
    let err =
        SeverityPredictor::from_parts(config_for(dir.path()), artifacts, encoder).unwrap_err();
    assert!(err.to_string().contains("expects 16-dim"));
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config_for(dir.path());
    cfg.batch.max_concurrency = 0;
    assert!(matches!(
        SeverityPredictor::new(cfg),
        Err(PredictorError::Config(_))
    ));
}
