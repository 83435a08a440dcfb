//! Prediction statistics for a run of the predictor.

use crate::types::prediction::PredictionResult;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Width of one age bucket, in years
const AGE_BUCKET_YEARS: f64 = 5.0;
/// Number of age buckets; the last one is open-ended
const AGE_BUCKETS: usize = 7;
/// Latency samples kept in memory
const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Metrics collector for predictions
pub struct PredictionMetrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Failed requests
    pub failures: AtomicU64,
    /// Failures by error kind
    failures_by_kind: RwLock<HashMap<String, u64>>,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Estimated age distribution buckets
    age_buckets: RwLock<[u64; AGE_BUCKETS]>,
    /// Sum of estimated ages, for the mean
    age_sum: RwLock<f64>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PredictionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            failures_by_kind: RwLock::new(HashMap::new()),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            age_buckets: RwLock::new([0; AGE_BUCKETS]),
            age_sum: RwLock::new(0.0),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, latency: Duration, result: &PredictionResult) {
        self.predictions.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            if latencies.len() > MAX_LATENCY_SAMPLES {
                latencies.drain(0..MAX_LATENCY_SAMPLES / 2);
            }
        }

        if let Ok(mut buckets) = self.age_buckets.write() {
            buckets[age_bucket(result.estimated_age_years)] += 1;
        }

        if let Ok(mut sum) = self.age_sum.write() {
            *sum += result.estimated_age_years;
        }
    }

    /// Record a failed request
    pub fn record_failure(&self, kind: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_kind) = self.failures_by_kind.write() {
            *by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    /// Get latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let sorted = match self.latencies.read() {
            Ok(latencies) if !latencies.is_empty() => {
                let mut sorted = latencies.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return LatencyStats::default(),
        };

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: percentile(0.50),
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Mean estimated age over successful predictions
    pub fn get_mean_age(&self) -> f64 {
        let count = self.predictions.load(Ordering::Relaxed);
        match self.age_sum.read() {
            Ok(sum) if count > 0 => *sum / count as f64,
            _ => 0.0,
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get age distribution
    pub fn get_age_distribution(&self) -> [u64; AGE_BUCKETS] {
        self.age_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or([0; AGE_BUCKETS])
    }

    /// Get failures by error kind
    pub fn get_failures_by_kind(&self) -> HashMap<String, u64> {
        self.failures_by_kind
            .read()
            .map(|by_kind| by_kind.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let latency = self.get_latency_stats();
        let ages = self.get_age_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              ABALONE AGE PREDICTOR - RUN SUMMARY             ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Predictions: {:>8}  │  Failures: {:>6}  │  {:>8.1} req/s ║",
            predictions,
            failures,
            self.get_throughput()
        );
        info!(
            "║ Latency (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5}     ║",
            latency.mean_us, latency.p50_us, latency.p95_us, latency.p99_us
        );
        info!(
            "║ Mean estimated age: {:>6.2} years                            ║",
            self.get_mean_age()
        );

        let by_kind = self.get_failures_by_kind();
        if !by_kind.is_empty() {
            info!("╠══════════════════════════════════════════════════════════════╣");
            info!("║ Failures by Kind:                                            ║");
            for (kind, count) in &by_kind {
                info!("║   {:24}: {:>6}                            ║", kind, count);
            }
        }

        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Estimated Age Distribution (years):                          ║");
        let total: u64 = ages.iter().sum();
        for (i, &count) in ages.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar = "█".repeat(((pct / 5.0) as usize).min(20));
            let low = i as f64 * AGE_BUCKET_YEARS;
            let label = if i + 1 == AGE_BUCKETS {
                format!("{:>2.0}+   ", low)
            } else {
                format!("{:>2.0}-{:<2.0}", low, low + AGE_BUCKET_YEARS)
            };
            info!("║   {}: {:>6} ({:>5.1}%) {}", label, count, pct, bar);
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket index for an age; negative ages fall in the first bucket.
fn age_bucket(age_years: f64) -> usize {
    if age_years.is_nan() || age_years <= 0.0 {
        return 0;
    }
    ((age_years / AGE_BUCKET_YEARS) as usize).min(AGE_BUCKETS - 1)
}

/// Prediction latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}
