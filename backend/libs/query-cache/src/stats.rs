//! Statistics tracking for query cache operations

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for query cache operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryStats {
    pub hits: u64,
    pub misses: u64,
    pub deduplicated: u64,
    pub invalidations: u64,
    pub fetch_errors: u64,
    pub fetch_latency_p50_ms: f64,
    pub fetch_latency_p99_ms: f64,
}

impl QueryStats {
    /// Share of reads answered without starting a fetch
    pub fn hit_ratio(&self) -> f64 {
        let served = self.hits + self.deduplicated;
        let total = served + self.misses;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }
}

/// Thread-safe statistics collector
#[derive(Clone)]
pub struct StatsCollector {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    deduplicated: Arc<AtomicU64>,
    invalidations: Arc<AtomicU64>,
    fetch_errors: Arc<AtomicU64>,
    latencies: Arc<Mutex<Vec<f64>>>,
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsCollector {
    /// Create new statistics collector
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            deduplicated: Arc::new(AtomicU64::new(0)),
            invalidations: Arc::new(AtomicU64::new(0)),
            fetch_errors: Arc::new(AtomicU64::new(0)),
            latencies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a read that joined an in-flight fetch
    pub fn record_dedup(&self) {
        self.deduplicated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_error(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record fetch latency (in milliseconds)
    pub fn record_latency(&self, latency_ms: f64) {
        let mut latencies = self.latencies.lock();
        latencies.push(latency_ms);
        // Keep only last 1000 samples
        if latencies.len() > 1000 {
            latencies.drain(0..500);
        }
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self) -> QueryStats {
        let (p50, p99) = {
            let mut latencies = self.latencies.lock();
            if latencies.is_empty() {
                (0.0, 0.0)
            } else {
                latencies.sort_by(|a, b| a.total_cmp(b));
                let p50_idx = (latencies.len() as f64 * 0.50) as usize;
                let p99_idx = (latencies.len() as f64 * 0.99) as usize;
                (
                    latencies[p50_idx.min(latencies.len() - 1)],
                    latencies[p99_idx.min(latencies.len() - 1)],
                )
            }
        };

        QueryStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            deduplicated: self.deduplicated.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            fetch_latency_p50_ms: p50,
            fetch_latency_p99_ms: p99,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = QueryStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_stats_collector_counters() {
        let collector = StatsCollector::new();
        collector.record_hit();
        collector.record_hit();
        collector.record_miss();
        collector.record_dedup();
        collector.record_invalidation();
        collector.record_fetch_error();

        let stats = collector.snapshot();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.deduplicated, 1);
        assert_eq!(stats.invalidations, 1);
        assert_eq!(stats.fetch_errors, 1);
        assert_eq!(stats.hit_ratio(), 0.75);
    }

    #[test]
    fn test_stats_collector_latency_percentiles() {
        let collector = StatsCollector::new();

        for i in 1..=100 {
            collector.record_latency(i as f64);
        }

        let stats = collector.snapshot();
        assert!(stats.fetch_latency_p50_ms >= 49.0 && stats.fetch_latency_p50_ms <= 51.0);
        assert!(stats.fetch_latency_p99_ms >= 98.0 && stats.fetch_latency_p99_ms <= 100.0);
    }

    #[test]
    fn test_stats_collector_clone_shares_counters() {
        let collector1 = StatsCollector::new();
        collector1.record_hit();

        let collector2 = collector1.clone();
        collector2.record_hit();

        assert_eq!(collector1.snapshot().hits, 2);
    }
}
