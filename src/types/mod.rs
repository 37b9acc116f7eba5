//! Type definitions for the risk screener

pub mod prediction;
pub mod record;
pub mod tensor;

pub use prediction::{InferenceResult, RiskCategory};
pub use record::{InputRecord, RawValue};
pub use tensor::{OutputFeed, TensorData, TensorFeed, TensorValue};
