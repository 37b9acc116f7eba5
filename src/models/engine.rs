//! Inference engine boundary and the ONNX Runtime adapter
//!
//! The engine is an opaque black box behind two small traits: it accepts a
//! feed keyed by input names and returns a feed keyed by output names. Input
//! and output name sets come from the loaded artifact, never from assumptions
//! about a particular export.

use crate::error::{Error, Result};
use crate::types::tensor::{OutputFeed, TensorData, TensorFeed, TensorValue};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputValue};
use ort::value::Tensor;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// A loaded, runnable model instance.
pub trait EngineSession: Send {
    /// Declared input names, introspected from the artifact.
    fn input_names(&self) -> Vec<String>;

    /// Declared output names, introspected from the artifact.
    fn output_names(&self) -> Vec<String>;

    /// Run one inference pass.
    fn run(&mut self, feed: &TensorFeed) -> Result<OutputFeed>;
}

/// Factory for engine sessions.
pub trait InferenceEngine: Send + Sync {
    /// Parse and initialize the artifact at `source`.
    fn load(&self, source: &Path) -> Result<Box<dyn EngineSession>>;
}

/// ONNX Runtime implementation of the engine boundary.
pub struct OrtEngine {
    /// Number of intra-op threads per session
    intra_threads: usize,
}

impl OrtEngine {
    /// Initialize ONNX Runtime with default settings (1 thread).
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Initialize ONNX Runtime with a specific intra-op thread count.
    pub fn with_threads(intra_threads: usize) -> Result<Self> {
        ort::init()
            .commit()
            .map_err(|e| Error::ModelMalformed(format!("runtime init failed: {}", e)))?;
        info!(intra_threads = intra_threads, "ONNX Runtime initialized");
        Ok(Self { intra_threads })
    }
}

impl InferenceEngine for OrtEngine {
    fn load(&self, source: &Path) -> Result<Box<dyn EngineSession>> {
        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(self.intra_threads))
            .and_then(|b| b.commit_from_file(source))
            .map_err(|e| Error::ModelMalformed(e.to_string()))?;

        let inputs: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let outputs: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        info!(
            path = %source.display(),
            inputs = ?inputs,
            outputs = ?outputs,
            "ONNX model loaded"
        );

        Ok(Box::new(OrtSession {
            session,
            inputs,
            outputs,
        }))
    }
}

struct OrtSession {
    session: Session,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl EngineSession for OrtSession {
    fn input_names(&self) -> Vec<String> {
        self.inputs.clone()
    }

    fn output_names(&self) -> Vec<String> {
        self.outputs.clone()
    }

    fn run(&mut self, feed: &TensorFeed) -> Result<OutputFeed> {
        let mut inputs: Vec<(Cow<'_, str>, SessionInputValue<'_>)> =
            Vec::with_capacity(feed.len());

        for (name, value) in feed {
            let dyn_value = match &value.data {
                TensorData::F32(data) => {
                    Tensor::from_array((value.shape.clone(), data.clone()))
                        .map_err(|e| Error::Inference(format!("input tensor {:?}: {}", name, e)))?
                        .into_dyn()
                }
                TensorData::I64(data) => {
                    Tensor::from_array((value.shape.clone(), data.clone()))
                        .map_err(|e| Error::Inference(format!("input tensor {:?}: {}", name, e)))?
                        .into_dyn()
                }
                TensorData::Text(data) => {
                    Tensor::from_string_array((value.shape.clone(), data.as_slice()))
                        .map_err(|e| Error::Inference(format!("input tensor {:?}: {}", name, e)))?
                        .into_dyn()
                }
            };
            inputs.push((Cow::Owned(name.clone()), dyn_value.into()));
        }

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| Error::Inference(e.to_string()))?;

        let mut feed_out = OutputFeed::new();
        for (name, output) in outputs.iter() {
            // Classifier exports mix tensor outputs with seq(map) probability
            // outputs; only tensor outputs are decodable here, the rest are
            // skipped.
            if let Ok((shape, data)) = output.try_extract_tensor::<i64>() {
                feed_out.insert(
                    name.to_string(),
                    TensorValue {
                        shape: shape.iter().copied().collect(),
                        data: TensorData::I64(data.to_vec()),
                    },
                );
            } else if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                feed_out.insert(
                    name.to_string(),
                    TensorValue {
                        shape: shape.iter().copied().collect(),
                        data: TensorData::F32(data.to_vec()),
                    },
                );
            } else {
                debug!(output = %name, "Skipping non-tensor model output");
            }
        }

        Ok(feed_out)
    }
}
