//! Registry metrics for observability
//!
//! Counters describing the reconciliation loop and the health of the
//! management mirror.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for registry observability
///
/// # Example
///
/// ```
/// use rust_logger_registry::RegistryMetrics;
///
/// let metrics = RegistryMetrics::new();
///
/// metrics.record_pass();
/// metrics.record_export_failure();
///
/// assert_eq!(metrics.passes(), 1);
/// assert_eq!(metrics.export_failures(), 1);
/// ```
#[derive(Debug)]
pub struct RegistryMetrics {
    /// Completed reconciliation passes
    passes: AtomicU64,

    /// Handles created for newly observed loggers
    handles_created: AtomicU64,

    /// Handles retired because their logger vanished
    handles_retired: AtomicU64,

    /// Exports that failed, collisions included
    export_failures: AtomicU64,

    unexport_failures: AtomicU64,

    /// Passes that panicked and were abandoned
    panicked_passes: AtomicU64,
}

impl RegistryMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            passes: AtomicU64::new(0),
            handles_created: AtomicU64::new(0),
            handles_retired: AtomicU64::new(0),
            export_failures: AtomicU64::new(0),
            unexport_failures: AtomicU64::new(0),
            panicked_passes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handles_created(&self) -> u64 {
        self.handles_created.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handles_retired(&self) -> u64 {
        self.handles_retired.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn export_failures(&self) -> u64 {
        self.export_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unexport_failures(&self) -> u64 {
        self.unexport_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn panicked_passes(&self) -> u64 {
        self.panicked_passes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_pass(&self) -> u64 {
        self.passes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_created(&self) -> u64 {
        self.handles_created.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_retired(&self) -> u64 {
        self.handles_retired.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_retired_many(&self, count: u64) -> u64 {
        self.handles_retired.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_export_failure(&self) -> u64 {
        self.export_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unexport_failure(&self) -> u64 {
        self.unexport_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_panicked_pass(&self) -> u64 {
        self.panicked_passes.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of handles that should currently be tracked
    pub fn live_handles(&self) -> u64 {
        self.handles_created().saturating_sub(self.handles_retired())
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.passes.store(0, Ordering::Relaxed);
        self.handles_created.store(0, Ordering::Relaxed);
        self.handles_retired.store(0, Ordering::Relaxed);
        self.export_failures.store(0, Ordering::Relaxed);
        self.unexport_failures.store(0, Ordering::Relaxed);
        self.panicked_passes.store(0, Ordering::Relaxed);
    }
}

impl Default for RegistryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RegistryMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            passes: AtomicU64::new(self.passes()),
            handles_created: AtomicU64::new(self.handles_created()),
            handles_retired: AtomicU64::new(self.handles_retired()),
            export_failures: AtomicU64::new(self.export_failures()),
            unexport_failures: AtomicU64::new(self.unexport_failures()),
            panicked_passes: AtomicU64::new(self.panicked_passes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = RegistryMetrics::new();
        assert_eq!(metrics.passes(), 0);
        assert_eq!(metrics.handles_created(), 0);
        assert_eq!(metrics.handles_retired(), 0);
        assert_eq!(metrics.export_failures(), 0);
        assert_eq!(metrics.unexport_failures(), 0);
        assert_eq!(metrics.panicked_passes(), 0);
    }

    #[test]
    fn test_metrics_record_pass() {
        let metrics = RegistryMetrics::new();
        assert_eq!(metrics.record_pass(), 0); // Returns previous value
        assert_eq!(metrics.passes(), 1);
    }

    #[test]
    fn test_metrics_live_handles() {
        let metrics = RegistryMetrics::new();
        for _ in 0..5 {
            metrics.record_created();
        }
        metrics.record_retired();
        metrics.record_retired();
        assert_eq!(metrics.live_handles(), 3);
    }

    #[test]
    fn test_metrics_retired_many() {
        let metrics = RegistryMetrics::new();
        for _ in 0..4 {
            metrics.record_created();
        }
        assert_eq!(metrics.record_retired_many(3), 0);
        assert_eq!(metrics.handles_retired(), 3);
        assert_eq!(metrics.live_handles(), 1);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = RegistryMetrics::new();
        metrics.record_pass();
        metrics.record_created();
        metrics.record_export_failure();

        metrics.reset();

        assert_eq!(metrics.passes(), 0);
        assert_eq!(metrics.handles_created(), 0);
        assert_eq!(metrics.export_failures(), 0);
    }

    #[test]
    fn test_metrics_clone() {
        let metrics = RegistryMetrics::new();
        metrics.record_pass();
        metrics.record_retired();

        let snapshot = metrics.clone();
        assert_eq!(snapshot.passes(), 1);
        assert_eq!(snapshot.handles_retired(), 1);

        // Original and clone are independent
        metrics.record_pass();
        assert_eq!(metrics.passes(), 2);
        assert_eq!(snapshot.passes(), 1);
    }
}
