//! In-memory histogram of query evaluation latency, cache loads included.

use std::sync::Mutex;
use std::time::Duration;

/// Shared latency stats. The /trends handler records, /stats/latency reads.
/// Values stored in microseconds.
pub struct QueryLatency {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl QueryLatency {
    /// Tracks 1us to 100s, 3 significant figures.
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 100_000_000, 3)
            .expect("valid histogram bounds");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    pub fn record(&self, d: Duration) {
        let us = d.as_micros().clamp(1, 100_000_000) as u64;
        if let Ok(mut h) = self.inner.lock() {
            let _ = h.record(us);
        }
    }

    /// (p50_us, p95_us, p99_us), `None` before the first sample.
    pub fn percentiles(&self) -> Option<(u64, u64, u64)> {
        let h = self.inner.lock().ok()?;
        if h.len() == 0 {
            return None;
        }
        Some((
            h.value_at_quantile(0.5),
            h.value_at_quantile(0.95),
            h.value_at_quantile(0.99),
        ))
    }

    pub fn len(&self) -> u64 {
        self.inner.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for QueryLatency {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram_has_no_percentiles() {
        assert!(QueryLatency::new().percentiles().is_none());
    }

    #[test]
    fn percentiles_are_ordered() {
        let latency = QueryLatency::new();
        for ms in 1..=100 {
            latency.record(Duration::from_millis(ms));
        }
        let (p50, p95, p99) = latency.percentiles().unwrap();
        assert_eq!(latency.len(), 100);
        assert!(p50 <= p95 && p95 <= p99);
        assert!((49_000..=51_000).contains(&p50));
    }
}
