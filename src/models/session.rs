//! Model session lifecycle
//!
//! Owns the loaded model behind an explicit state machine:
//! `Unloaded -> Loading -> Ready`, or `Unloaded -> Loading -> LoadFailed`
//! (terminal until an explicit retry). The declared input/output schema is
//! introspected at load time and checked against the feature catalog, so a
//! deployment exposing either per-feature inputs or one aggregate vector is
//! picked up without code changes.

use crate::encoder::EncodingLayout;
use crate::error::{Error, Result};
use crate::models::engine::{EngineSession, InferenceEngine};
use crate::schema::FeatureCatalog;
use crate::types::tensor::{OutputFeed, TensorFeed};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{error, info};

/// Introspected schema of the loaded model.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    /// Encoding layout resolved from the input names
    pub layout: EncodingLayout,
    /// Declared input names
    pub input_names: Vec<String>,
    /// Declared output names
    pub output_names: Vec<String>,
    /// Output carrying the class label (first declared output)
    pub primary_output: String,
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStateKind {
    Unloaded,
    Loading,
    Ready,
    LoadFailed,
}

enum SessionState {
    Unloaded,
    Loading,
    Ready(ReadySession),
    LoadFailed(Error),
}

struct ReadySession {
    /// Runnable session behind its own lock so state queries stay readable
    /// while an inference pass is in flight.
    session: std::sync::Mutex<Box<dyn EngineSession>>,
    schema: ModelSchema,
}

/// Manager for the single loaded model session.
pub struct ModelSessionManager {
    engine: Box<dyn InferenceEngine>,
    catalog: Arc<FeatureCatalog>,
    state: RwLock<SessionState>,
    /// Serializes load attempts; a second initialize while Loading awaits the
    /// first outcome instead of triggering a duplicate load.
    load_guard: tokio::sync::Mutex<()>,
    /// Bumped after every resolved load attempt; lets a caller that waited on
    /// the guard tell a concurrent load's outcome apart from a stale failure.
    load_generation: AtomicU64,
}

impl ModelSessionManager {
    pub fn new(engine: Box<dyn InferenceEngine>, catalog: Arc<FeatureCatalog>) -> Self {
        Self {
            engine,
            catalog,
            state: RwLock::new(SessionState::Unloaded),
            load_guard: tokio::sync::Mutex::new(()),
            load_generation: AtomicU64::new(0),
        }
    }

    /// Probe, parse and initialize the model artifact, transitioning to Ready
    /// or LoadFailed. Calling again after LoadFailed is the explicit retry
    /// path; calling while a load is in flight resolves to that load's
    /// outcome.
    pub async fn initialize(&self, source: &Path) -> Result<()> {
        let entry_generation = self.load_generation.load(Ordering::Acquire);
        let _guard = self.load_guard.lock().await;

        // A generation bump while we waited for the guard means another
        // caller's load resolved; share its outcome instead of reloading.
        let resolved_while_waiting =
            self.load_generation.load(Ordering::Acquire) != entry_generation;

        {
            let state = self.read_state()?;
            match &*state {
                SessionState::Ready(_) => return Ok(()),
                SessionState::LoadFailed(err) if resolved_while_waiting => {
                    return Err(err.clone())
                }
                _ => {}
            }
        }

        *self.write_state()? = SessionState::Loading;
        info!(source = %source.display(), "Loading model artifact");

        let outcome = match self.load_session(source) {
            Ok(ready) => {
                info!(
                    layout = ?ready.schema.layout,
                    primary_output = %ready.schema.primary_output,
                    "Model session ready"
                );
                *self.write_state()? = SessionState::Ready(ready);
                Ok(())
            }
            Err(err) => {
                error!(source = %source.display(), error = %err, "Model load failed");
                *self.write_state()? = SessionState::LoadFailed(err.clone());
                Err(err)
            }
        };

        self.load_generation.fetch_add(1, Ordering::Release);
        outcome
    }

    fn load_session(&self, source: &Path) -> Result<ReadySession> {
        if !source.exists() {
            return Err(Error::ModelUnreachable(format!(
                "artifact {} does not exist",
                source.display()
            )));
        }

        let session = self.engine.load(source)?;
        let input_names = session.input_names();
        let output_names = session.output_names();
        let (layout, primary_output) =
            resolve_schema(&self.catalog, &input_names, &output_names)?;

        Ok(ReadySession {
            session: std::sync::Mutex::new(session),
            schema: ModelSchema {
                layout,
                input_names,
                output_names,
                primary_output,
            },
        })
    }

    /// Run one inference pass. Fails with NotReady before a successful load;
    /// an engine error leaves the session Ready so the caller may retry.
    pub fn invoke(&self, feed: &TensorFeed) -> Result<OutputFeed> {
        let state = self.read_state()?;
        match &*state {
            SessionState::Ready(ready) => {
                let declared: HashSet<&str> =
                    ready.schema.input_names.iter().map(String::as_str).collect();
                let provided: HashSet<&str> = feed.keys().map(String::as_str).collect();
                if declared != provided {
                    return Err(Error::Internal(format!(
                        "feed entries {:?} do not match declared inputs {:?}",
                        provided, declared
                    )));
                }
                let mut session = ready
                    .session
                    .lock()
                    .map_err(|_| Error::Internal("engine session lock poisoned".to_string()))?;
                session.run(feed)
            }
            _ => Err(Error::NotReady),
        }
    }

    /// Introspected schema of the ready session.
    pub fn schema(&self) -> Result<ModelSchema> {
        match &*self.read_state()? {
            SessionState::Ready(ready) => Ok(ready.schema.clone()),
            _ => Err(Error::NotReady),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state_kind(), Ok(SessionStateKind::Ready))
    }

    pub fn state_kind(&self) -> Result<SessionStateKind> {
        Ok(match &*self.read_state()? {
            SessionState::Unloaded => SessionStateKind::Unloaded,
            SessionState::Loading => SessionStateKind::Loading,
            SessionState::Ready(_) => SessionStateKind::Ready,
            SessionState::LoadFailed(_) => SessionStateKind::LoadFailed,
        })
    }

    /// The recorded load error, if the session is in LoadFailed.
    pub fn load_error(&self) -> Option<Error> {
        match &*self.read_state().ok()? {
            SessionState::LoadFailed(err) => Some(err.clone()),
            _ => None,
        }
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, SessionState>> {
        self.state
            .read()
            .map_err(|_| Error::Internal("session state lock poisoned".to_string()))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, SessionState>> {
        self.state
            .write()
            .map_err(|_| Error::Internal("session state lock poisoned".to_string()))
    }
}

/// Match the introspected input/output names against the catalog and pick the
/// encoding layout. Fails fast on any mismatch instead of assuming the first
/// declared name is correct.
fn resolve_schema(
    catalog: &FeatureCatalog,
    input_names: &[String],
    output_names: &[String],
) -> Result<(EncodingLayout, String)> {
    let primary_output = output_names
        .first()
        .cloned()
        .ok_or_else(|| Error::SchemaMismatch("model declares no outputs".to_string()))?;

    let declared: HashSet<&str> = input_names.iter().map(String::as_str).collect();
    let expected: HashSet<&str> = catalog.names().into_iter().collect();

    if declared == expected {
        return Ok((EncodingLayout::PerFeature, primary_output));
    }

    if input_names.len() == 1 {
        return Ok((
            EncodingLayout::Aggregate {
                input_name: input_names[0].clone(),
            },
            primary_output,
        ));
    }

    let missing: Vec<&&str> = expected.difference(&declared).collect();
    let unexpected: Vec<&&str> = declared.difference(&expected).collect();
    Err(Error::SchemaMismatch(format!(
        "model inputs do not cover the feature catalog (missing {:?}, unexpected {:?})",
        missing, unexpected
    )))
}
