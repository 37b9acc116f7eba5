//! Model session and inference components

pub mod engine;
pub mod mapper;
pub mod session;

pub use engine::{EngineSession, InferenceEngine, OrtEngine};
pub use mapper::ResultMapper;
pub use session::{ModelSchema, ModelSessionManager, SessionStateKind};
