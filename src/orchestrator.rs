//! Inference request orchestration
//!
//! Single public entry point for a submission: readiness check, busy check,
//! full validation, encoding, engine invocation, decoding. At most one
//! submission is in flight at a time; a second attempt is rejected with Busy,
//! never queued.

use crate::encoder::FeatureEncoder;
use crate::error::{Error, Result};
use crate::metrics::ScreenerMetrics;
use crate::models::mapper::ResultMapper;
use crate::models::session::ModelSessionManager;
use crate::schema::FeatureCatalog;
use crate::types::prediction::InferenceResult;
use crate::types::record::InputRecord;
use crate::validator::{all_valid, FieldValidator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Composes validator, encoder, session and mapper into one request cycle.
pub struct InferenceOrchestrator {
    catalog: Arc<FeatureCatalog>,
    session: Arc<ModelSessionManager>,
    metrics: Arc<ScreenerMetrics>,
    validator: FieldValidator,
    encoder: FeatureEncoder,
    mapper: ResultMapper,
    busy: AtomicBool,
}

impl InferenceOrchestrator {
    pub fn new(
        catalog: Arc<FeatureCatalog>,
        session: Arc<ModelSessionManager>,
        metrics: Arc<ScreenerMetrics>,
    ) -> Self {
        Self {
            catalog,
            session,
            metrics,
            validator: FieldValidator::new(),
            encoder: FeatureEncoder::new(),
            mapper: ResultMapper::new(),
            busy: AtomicBool::new(false),
        }
    }

    /// Run one submission through the pipeline.
    ///
    /// Validation runs before the busy flag is taken, so a validation failure
    /// never blocks a concurrent retry. The flag covers encoding, invocation
    /// and decoding, and is released on every exit path.
    pub async fn submit(&self, record: &InputRecord) -> Result<InferenceResult> {
        let start = Instant::now();

        let result = self.submit_inner(record).await;
        match &result {
            Ok(prediction) => {
                self.metrics
                    .record_prediction(start.elapsed(), prediction.category);
                info!(
                    submission_id = %prediction.submission_id,
                    category = %prediction.category,
                    label_index = prediction.label_index,
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Prediction complete"
                );
            }
            Err(err) => {
                self.metrics.record_rejection(rejection_kind(err));
                warn!(error = %err, "Submission rejected");
            }
        }
        result
    }

    async fn submit_inner(&self, record: &InputRecord) -> Result<InferenceResult> {
        if !self.session.is_ready() {
            return Err(Error::NotReady);
        }
        if self.busy.load(Ordering::Acquire) {
            return Err(Error::Busy);
        }

        let outcome = self.validator.validate_all(&self.catalog, record);
        if !all_valid(&outcome) {
            return Err(Error::ValidationFailed(outcome));
        }

        // Validation never sets busy; everything from here on does.
        let _guard = BusyGuard::acquire(&self.busy).ok_or(Error::Busy)?;

        let schema = self.session.schema()?;
        let feed = self.encoder.encode(&self.catalog, record, &schema.layout)?;
        let outputs = self.session.invoke(&feed)?;

        let primary = outputs.get(&schema.primary_output).ok_or_else(|| {
            Error::Inference(format!(
                "model output {:?} missing from result feed",
                schema.primary_output
            ))
        })?;

        let (label_index, category) = self.mapper.decode(primary)?;
        Ok(InferenceResult::new(label_index, category))
    }

    /// Whether a submission is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

fn rejection_kind(err: &Error) -> &'static str {
    match err {
        Error::NotReady => "not_ready",
        Error::Busy => "busy",
        Error::ValidationFailed(_) => "validation",
        Error::UnmappedLabel(_) => "unmapped_label",
        Error::ModelUnreachable(_) | Error::ModelMalformed(_) | Error::SchemaMismatch(_) => {
            "model_load"
        }
        Error::Inference(_) | Error::UnknownChoice { .. } | Error::Internal(_) => "inference",
    }
}

/// RAII busy flag; releases on drop so every exit path clears it.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);

        {
            let guard = BusyGuard::acquire(&flag).unwrap();
            assert!(flag.load(Ordering::Acquire));
            assert!(BusyGuard::acquire(&flag).is_none());
            drop(guard);
        }

        assert!(!flag.load(Ordering::Acquire));
        assert!(BusyGuard::acquire(&flag).is_some());
    }

    #[test]
    fn test_rejection_kinds() {
        assert_eq!(rejection_kind(&Error::NotReady), "not_ready");
        assert_eq!(rejection_kind(&Error::Busy), "busy");
        assert_eq!(rejection_kind(&Error::UnmappedLabel(7)), "unmapped_label");
        assert_eq!(
            rejection_kind(&Error::Inference("boom".to_string())),
            "inference"
        );
    }
}
