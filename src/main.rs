//! Gaming Disorder Risk Screener - Main Entry Point
//!
//! Loads the ONNX model, reads one questionnaire answers file (JSON) and
//! prints the predicted risk category, or a structured explanation of why the
//! submission was rejected.

use anyhow::{Context, Result};
use gaming_risk_screener::{
    config::AppConfig, error::Error, metrics::ScreenerMetrics, models::ModelSessionManager,
    models::OrtEngine, orchestrator::InferenceOrchestrator, schema::FeatureCatalog,
    types::InputRecord, validator::FieldStatus,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load_or_default()?;

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("gaming_risk_screener={}", config.logging.level).parse()?);
    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(env_filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    info!("Starting gaming disorder risk screener");

    let answers_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/answers.json".to_string());

    let catalog = Arc::new(FeatureCatalog::standard()?);
    info!(features = catalog.len(), "Feature catalog initialized");

    let engine = OrtEngine::with_threads(config.model.onnx_threads)?;
    let session = Arc::new(ModelSessionManager::new(Box::new(engine), catalog.clone()));
    let metrics = Arc::new(ScreenerMetrics::new());
    let orchestrator = InferenceOrchestrator::new(catalog.clone(), session.clone(), metrics.clone());

    if let Err(err) = session.initialize(Path::new(&config.model.path)).await {
        // Load failure is fatal until an explicit reload; no silent fallback
        eprintln!("Model unavailable: {}", err);
        eprintln!(
            "Make sure the model artifact exists at {:?} and restart.",
            config.model.path
        );
        std::process::exit(1);
    }

    let raw = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("Failed to read answers file {:?}", answers_path))?;
    let record: InputRecord =
        serde_json::from_str(&raw).context("Failed to parse answers file")?;

    match orchestrator.submit(&record).await {
        Ok(result) => {
            println!("Risk category: {} (color {})", result.category, result.color());
            println!("Submission id: {}", result.submission_id);
        }
        Err(Error::ValidationFailed(outcome)) => {
            eprintln!("The submission has invalid fields:");
            for (name, status) in &outcome {
                if let FieldStatus::Invalid(reason) = status {
                    let label = catalog
                        .get(name)
                        .map(|spec| spec.label.as_str())
                        .unwrap_or(name.as_str());
                    eprintln!("  {}: {}", label, reason);
                }
            }
            std::process::exit(2);
        }
        Err(err) => {
            // Transient notice; the entered data is untouched and retryable
            eprintln!("Prediction failed: {}", err);
            std::process::exit(1);
        }
    }

    metrics.print_summary();
    Ok(())
}
