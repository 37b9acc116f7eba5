//! Gaming Disorder Risk Screener
//!
//! Client-side inference pipeline over a pre-trained tabular ONNX classifier:
//! validate a questionnaire submission, encode it into the tensor layout the
//! loaded model declares, invoke the model and decode the predicted risk
//! category.

pub mod config;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod schema;
pub mod types;
pub mod validator;

pub use config::AppConfig;
pub use encoder::{EncodingLayout, FeatureEncoder};
pub use error::{Error, Result};
pub use metrics::ScreenerMetrics;
pub use models::{InferenceEngine, ModelSessionManager, OrtEngine, ResultMapper};
pub use orchestrator::InferenceOrchestrator;
pub use schema::{FeatureCatalog, FeatureKind, FeatureSpec};
pub use types::{InferenceResult, InputRecord, RiskCategory};
pub use validator::{FieldValidator, ValidationOutcome};
