//! Performance and outcome statistics for the screener.

use crate::types::prediction::RiskCategory;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the inference pipeline
pub struct ScreenerMetrics {
    /// Submissions that produced a prediction
    pub predictions_made: AtomicU64,
    /// Submissions rejected before or during inference
    pub submissions_rejected: AtomicU64,
    /// Rejections by kind (not_ready, busy, validation, ...)
    rejections_by_kind: RwLock<HashMap<String, u64>>,
    /// Predictions by risk category
    predictions_by_category: RwLock<HashMap<String, u64>>,
    /// End-to-end submission times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ScreenerMetrics {
    pub fn new() -> Self {
        Self {
            predictions_made: AtomicU64::new(0),
            submissions_rejected: AtomicU64::new(0),
            rejections_by_kind: RwLock::new(HashMap::new()),
            predictions_by_category: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(256)),
            start_time: Instant::now(),
        }
    }

    /// Record a completed prediction
    pub fn record_prediction(&self, elapsed: Duration, category: RiskCategory) {
        self.predictions_made.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only the last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        if let Ok(mut by_category) = self.predictions_by_category.write() {
            *by_category.entry(category.to_string()).or_insert(0) += 1;
        }
    }

    /// Record a rejected submission
    pub fn record_rejection(&self, kind: &str) {
        self.submissions_rejected.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_kind) = self.rejections_by_kind.write() {
            *by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = match self.processing_times.read() {
            Ok(times) => times,
            Err(_) => return ProcessingStats::default(),
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Predictions broken down by category
    pub fn get_predictions_by_category(&self) -> HashMap<String, u64> {
        self.predictions_by_category
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Rejections broken down by kind
    pub fn get_rejections_by_kind(&self) -> HashMap<String, u64> {
        self.rejections_by_kind
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Predictions per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_made.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let predicted = self.predictions_made.load(Ordering::Relaxed);
        let rejected = self.submissions_rejected.load(Ordering::Relaxed);
        let stats = self.get_processing_stats();

        info!(
            predictions = predicted,
            rejections = rejected,
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p99_us = stats.p99_us,
            "Screener metrics summary"
        );
        for (category, count) in self.get_predictions_by_category() {
            info!(category = %category, count = count, "Predictions by category");
        }
        for (kind, count) in self.get_rejections_by_kind() {
            info!(kind = %kind, count = count, "Rejections by kind");
        }
    }
}

impl Default for ScreenerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = ScreenerMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), RiskCategory::Low);
        metrics.record_prediction(Duration::from_micros(200), RiskCategory::High);
        metrics.record_rejection("validation");

        assert_eq!(metrics.predictions_made.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.submissions_rejected.load(Ordering::Relaxed), 1);

        let by_category = metrics.get_predictions_by_category();
        assert_eq!(by_category.get("Low"), Some(&1));
        assert_eq!(by_category.get("High"), Some(&1));

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 150);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = ScreenerMetrics::new();
        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_us, 0);
    }
}
