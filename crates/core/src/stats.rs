//! Latency and throughput statistics
//!
//! Reduces `RequestResult` sequences into per-operation and run-level metrics.
//! Latencies are reported in milliseconds and only successful results
//! contribute to them. Throughput is always successes divided by a wall-clock
//! span supplied by the driver, never by summed request durations.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::executor::RequestResult;
use crate::operation::Operation;

/// Arithmetic mean, `None` for an empty slice
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Median (average of the two middle values for even lengths)
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(median_sorted(&sorted(data)))
}

/// Sample standard deviation (n - 1 denominator), 0 for a single value
pub fn stdev(data: &[f64]) -> Option<f64> {
    let mean = mean(data)?;
    if data.len() < 2 {
        return Some(0.0);
    }
    let sum_sq: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    Some((sum_sq / (data.len() - 1) as f64).sqrt())
}

/// Linear-interpolated percentile, `p` clamped to `[0, 100]`.
///
/// `None` for empty data or a non-finite `p`.
pub fn percentile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() || !p.is_finite() {
        return None;
    }
    Some(percentile_sorted(&sorted(data), p))
}

fn sorted(data: &[f64]) -> Vec<f64> {
    let mut values = data.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

// Caller guarantees a non-empty, ascending slice
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let index = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = (index.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let weight = index - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Successes per second over a wall-clock span.
///
/// `None` when nothing succeeded or the span is empty, so callers never see
/// a division by zero.
pub fn throughput(successful: usize, wall_time: Duration) -> Option<f64> {
    let secs = wall_time.as_secs_f64();
    if successful == 0 || secs <= 0.0 {
        return None;
    }
    Some(successful as f64 / secs)
}

fn successful_durations_ms<'a>(results: impl IntoIterator<Item = &'a RequestResult>) -> Vec<f64> {
    results
        .into_iter()
        .filter(|r| r.success)
        .map(RequestResult::duration_ms)
        .collect()
}

/// Summary statistics for latency, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
    pub stdev: f64,
}

impl LatencySummary {
    /// Summarize latency samples; `None` when there are none
    pub fn from_samples(samples_ms: &[f64]) -> Option<Self> {
        let mean = mean(samples_ms)?;
        let stdev = stdev(samples_ms)?;
        let sorted = sorted(samples_ms);

        Some(Self {
            count: sorted.len(),
            mean,
            median: median_sorted(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p95: percentile_sorted(&sorted, 95.0),
            p99: percentile_sorted(&sorted, 99.0),
            stdev,
        })
    }
}

/// Statistics for one operation against one target
#[derive(Debug, Clone, Serialize)]
pub struct OperationStats {
    pub operation: Operation,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Elapsed time of the whole batch sequence for this operation
    #[serde(rename = "wall_time_secs", with = "duration_secs")]
    pub wall_time: Duration,
    pub req_per_sec: Option<f64>,
    /// `None` when every request failed
    pub latency: Option<LatencySummary>,
}

impl OperationStats {
    pub fn from_results(
        operation: Operation,
        results: &[RequestResult],
        wall_time: Duration,
    ) -> Self {
        let durations = successful_durations_ms(results);
        let successful = durations.len();

        Self {
            operation,
            total: results.len(),
            successful,
            failed: results.len() - successful,
            wall_time,
            req_per_sec: throughput(successful, wall_time),
            latency: LatencySummary::from_samples(&durations),
        }
    }

    pub fn all_failed(&self) -> bool {
        self.latency.is_none()
    }

    pub fn mean_ms(&self) -> Option<f64> {
        self.latency.as_ref().map(|l| l.mean)
    }
}

/// Results of one benchmark phase, as handed over by the batched driver
#[derive(Debug, Clone)]
pub struct PhaseResults {
    pub operation: Operation,
    pub results: Vec<RequestResult>,
    pub wall_time: Duration,
}

/// Totals across every phase of a benchmark run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Sum of the phases' wall times
    #[serde(rename = "wall_time_secs", with = "duration_secs")]
    pub wall_time: Duration,
    pub mean_ms: Option<f64>,
    pub req_per_sec: Option<f64>,
}

impl RunSummary {
    pub fn from_phases(phases: &[PhaseResults]) -> Self {
        let durations = successful_durations_ms(phases.iter().flat_map(|p| p.results.iter()));
        let total: usize = phases.iter().map(|p| p.results.len()).sum();
        let wall_time: Duration = phases.iter().map(|p| p.wall_time).sum();

        Self {
            total,
            successful: durations.len(),
            failed: total - durations.len(),
            wall_time,
            mean_ms: mean(&durations),
            req_per_sec: throughput(durations.len(), wall_time),
        }
    }
}

/// Per-operation statistics for one target
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRun {
    /// Configured request count per independent phase
    pub requests: usize,
    /// Configured batch size
    pub concurrency: usize,
    pub operations: BTreeMap<Operation, OperationStats>,
    pub summary: RunSummary,
}

impl BenchmarkRun {
    pub fn from_phases(requests: usize, concurrency: usize, phases: Vec<PhaseResults>) -> Self {
        let summary = RunSummary::from_phases(&phases);
        let operations = phases
            .iter()
            .map(|phase| {
                (
                    phase.operation,
                    OperationStats::from_results(phase.operation, &phase.results, phase.wall_time),
                )
            })
            .collect();

        Self {
            requests,
            concurrency,
            operations,
            summary,
        }
    }

    pub fn get(&self, operation: Operation) -> Option<&OperationStats> {
        self.operations.get(&operation)
    }
}

/// Aggregate statistics of one fixed-duration stress window, all operation
/// kinds combined
#[derive(Debug, Clone, Serialize)]
pub struct StressRun {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Actual elapsed time, which may exceed the configured duration
    #[serde(rename = "total_time_secs", with = "duration_secs")]
    pub total_time: Duration,
    pub req_per_sec: Option<f64>,
    pub latency: Option<LatencySummary>,
    #[serde(rename = "duration_secs", with = "duration_secs")]
    pub duration: Duration,
    pub workers: usize,
    pub identifiers_allocated: u64,
}

impl StressRun {
    pub fn from_results(
        results: &[RequestResult],
        total_time: Duration,
        duration: Duration,
        workers: usize,
        identifiers_allocated: u64,
    ) -> Self {
        let durations = successful_durations_ms(results);
        let successful = durations.len();

        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            total_time,
            req_per_sec: throughput(successful, total_time),
            latency: LatencySummary::from_samples(&durations),
            duration,
            workers,
            identifiers_allocated,
        }
    }

    pub fn all_failed(&self) -> bool {
        self.latency.is_none()
    }

    /// Fraction of requests that succeeded, 0 when nothing was issued
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total as f64
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }
}
