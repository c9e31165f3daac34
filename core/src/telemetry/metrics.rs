use std::sync::Mutex;

/// Counters kept by every chain over its lifetime.
pub struct ChainMetrics {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub replacements: usize,
    pub work_passes: usize,
    pub samples_out: usize,
}

#[derive(Default)]
struct Metrics {
    replacements: usize,
    work_passes: usize,
    samples_out: usize,
}

impl ChainMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_replacement(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.replacements += 1;
        }
    }

    pub fn record_pass(&self, samples_out: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.work_passes += 1;
            metrics.samples_out += samples_out;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                replacements: metrics.replacements,
                work_passes: metrics.work_passes,
                samples_out: metrics.samples_out,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for ChainMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_metrics_are_zero() {
        assert_eq!(ChainMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn passes_accumulate_samples() {
        let metrics = ChainMetrics::new();
        metrics.record_pass(10);
        metrics.record_pass(5);
        metrics.record_replacement();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.work_passes, 2);
        assert_eq!(snapshot.samples_out, 15);
        assert_eq!(snapshot.replacements, 1);
    }
}
