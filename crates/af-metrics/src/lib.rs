//! Metrics sink seam for the authentication broker
//!
//! The broker only annotates; collection and persistence live with the
//! host's metrics pipeline.

use parking_lot::Mutex;
use tracing::trace;

/// Write-only metrics surface the broker annotates
///
/// Calls are synchronous and fire-and-forget; a sink must never fail.
pub trait MetricsSink: Send + Sync {
    /// Prefix subsequent view names (e.g. `signup`, `signin`)
    fn set_view_name_prefix(&self, prefix: &str);
}

/// Sink that discards every annotation
pub struct NullMetrics;

impl MetricsSink for NullMetrics {
    fn set_view_name_prefix(&self, prefix: &str) {
        trace!("NullMetrics: discarding view name prefix `{}`", prefix);
    }
}

/// Sink that records annotations for assertions
#[derive(Default)]
pub struct RecordingMetrics {
    prefixes: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// View name prefixes set so far, in order
    pub fn view_name_prefixes(&self) -> Vec<String> {
        self.prefixes.lock().clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn set_view_name_prefix(&self, prefix: &str) {
        self.prefixes.lock().push(prefix.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_metrics_records_in_order() {
        let metrics = RecordingMetrics::new();

        metrics.set_view_name_prefix("signup");
        metrics.set_view_name_prefix("signin");

        assert_eq!(metrics.view_name_prefixes(), vec!["signup", "signin"]);
    }

    #[test]
    fn test_recording_metrics_starts_empty() {
        let metrics = RecordingMetrics::new();
        assert!(metrics.view_name_prefixes().is_empty());
    }

    #[test]
    fn test_null_metrics_discards() {
        let metrics = NullMetrics;
        metrics.set_view_name_prefix("signup");
    }
}
