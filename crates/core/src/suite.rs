//! Suite orchestration
//!
//! Probes the configured targets, then benchmarks and stress-tests the ones
//! that answered, one target at a time and in list order.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::batch::{BatchConfig, BatchedBenchmark};
use crate::compare::Comparison;
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::executor::{HttpClient, LoadClient};
use crate::probe::{probe_targets, ProbeReport};
use crate::stats::{BenchmarkRun, StressRun};
use crate::stress::{StressConfig, StressTest};
use crate::target::Target;

/// Which load patterns a suite runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteMode {
    Full,
    BenchmarkOnly,
    StressOnly,
}

impl SuiteMode {
    pub fn runs_benchmark(&self) -> bool {
        matches!(self, SuiteMode::Full | SuiteMode::BenchmarkOnly)
    }

    pub fn runs_stress(&self) -> bool {
        matches!(self, SuiteMode::Full | SuiteMode::StressOnly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteConfig {
    pub mode: SuiteMode,
    pub batch: BatchConfig,
    pub stress: StressConfig,
    /// Settle time before each target's run
    pub target_pause: Duration,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            mode: SuiteMode::Full,
            batch: BatchConfig::default(),
            stress: StressConfig::default(),
            target_pause: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetBenchmark {
    pub target: Target,
    pub run: BenchmarkRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetStress {
    pub target: Target,
    pub run: StressRun,
}

/// Everything one suite invocation produced
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub mode: SuiteMode,
    pub available: Vec<Target>,
    pub unavailable: Vec<Target>,
    pub benchmarks: Vec<TargetBenchmark>,
    pub stress: Vec<TargetStress>,
    /// Present only when more than one target was available
    pub comparison: Option<Comparison>,
}

/// Runs the configured load patterns against a list of targets
pub struct Suite<C: LoadClient + 'static> {
    client: Arc<C>,
    config: SuiteConfig,
}

impl Suite<HttpClient> {
    /// Suite over a fresh HTTP client built from `config`
    pub fn http(config: &BenchConfig, mode: SuiteMode) -> Result<Self> {
        let client = HttpClient::new(config.request_timeout(), config.probe_timeout())?;
        Ok(Self::new(Arc::new(client), config.suite_config(mode)))
    }
}

impl<C: LoadClient + 'static> Suite<C> {
    pub fn new(client: Arc<C>, config: SuiteConfig) -> Self {
        Self { client, config }
    }

    pub async fn probe(&self, targets: &[Target]) -> ProbeReport {
        probe_targets(self.client.as_ref(), targets).await
    }

    /// Probe, then run every enabled load pattern on each available target.
    ///
    /// Fails with `NoTargetsAvailable` before any load is issued when no
    /// target passes the probe.
    pub async fn run(&self, targets: &[Target]) -> Result<SuiteReport> {
        let probe = self.probe(targets).await;
        self.run_probed(&probe).await
    }

    /// Run against the targets an earlier probe found available
    pub async fn run_probed(&self, probe: &ProbeReport) -> Result<SuiteReport> {
        let available: Vec<Target> = probe.available().cloned().collect();
        if available.is_empty() {
            return Err(BenchError::NoTargetsAvailable {
                checked: probe.checked(),
            });
        }

        tracing::info!(
            available = available.len(),
            unavailable = probe.checked() - available.len(),
            mode = ?self.config.mode,
            "Starting suite"
        );

        let mut benchmarks = Vec::new();
        if self.config.mode.runs_benchmark() {
            let bench = BatchedBenchmark::new(self.client.clone(), self.config.batch);
            for target in &available {
                self.pause().await;
                let run = bench.run(target).await;
                benchmarks.push(TargetBenchmark {
                    target: target.clone(),
                    run,
                });
            }
        }

        let mut stress = Vec::new();
        if self.config.mode.runs_stress() {
            let test = StressTest::new(self.client.clone(), self.config.stress);
            for target in &available {
                self.pause().await;
                let run = test.run(target).await;
                stress.push(TargetStress {
                    target: target.clone(),
                    run,
                });
            }
        }

        let comparison =
            (available.len() > 1).then(|| Comparison::build(&benchmarks, &stress));

        Ok(SuiteReport {
            mode: self.config.mode,
            available,
            unavailable: probe.unavailable().cloned().collect(),
            benchmarks,
            stress,
            comparison,
        })
    }

    async fn pause(&self) {
        if !self.config.target_pause.is_zero() {
            tokio::time::sleep(self.config.target_pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use crate::testing::FakeClient;

    fn targets() -> Vec<Target> {
        vec![
            Target::new("a", "http://a.local"),
            Target::new("b", "http://b.local"),
            Target::new("c", "http://c.local"),
        ]
    }

    fn config(mode: SuiteMode) -> SuiteConfig {
        SuiteConfig {
            mode,
            batch: BatchConfig {
                requests: 4,
                concurrency: 2,
            },
            stress: StressConfig {
                duration: Duration::from_millis(30),
                workers: 2,
            },
            target_pause: Duration::from_millis(500),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_available_targets_issues_no_load() {
        let client = Arc::new(
            FakeClient::with_latency(Duration::from_millis(1))
                .down("a")
                .down("b")
                .down("c"),
        );
        let suite = Suite::new(client.clone(), config(SuiteMode::Full));

        let err = suite.run(&targets()).await.unwrap_err();

        assert!(matches!(err, BenchError::NoTargetsAvailable { checked: 3 }));
        assert_eq!(client.probes().len(), 3);
        assert!(client.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_suite_runs_available_targets_in_order() {
        let client = Arc::new(FakeClient::with_latency(Duration::from_millis(5)).down("b"));
        let suite = Suite::new(client, config(SuiteMode::Full));

        let report = suite.run(&targets()).await.unwrap();

        let bench_names: Vec<_> = report.benchmarks.iter().map(|b| b.target.name.as_str()).collect();
        let stress_names: Vec<_> = report.stress.iter().map(|s| s.target.name.as_str()).collect();
        assert_eq!(bench_names, vec!["a", "c"]);
        assert_eq!(stress_names, vec!["a", "c"]);
        assert_eq!(report.unavailable, vec![Target::new("b", "http://b.local")]);

        let comparison = report.comparison.unwrap();
        assert_eq!(comparison.operations.len(), 5);
        assert!(comparison.stress.is_some());
        assert_eq!(report.benchmarks[0].run.get(Operation::Delete).unwrap().total, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_target_has_no_comparison() {
        let client = Arc::new(FakeClient::with_latency(Duration::from_millis(5)).down("b").down("c"));
        let suite = Suite::new(client, config(SuiteMode::BenchmarkOnly));

        let report = suite.run(&targets()).await.unwrap();

        assert_eq!(report.benchmarks.len(), 1);
        assert!(report.stress.is_empty());
        assert!(report.comparison.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stress_only_skips_benchmark_and_pauses_per_target() {
        let client = Arc::new(FakeClient::with_latency(Duration::from_millis(5)).down("c"));
        let suite = Suite::new(client.clone(), config(SuiteMode::StressOnly));

        let start = tokio::time::Instant::now();
        let report = suite.run(&targets()).await.unwrap();

        assert!(report.benchmarks.is_empty());
        assert_eq!(report.stress.len(), 2);
        // Two pauses of 500ms plus two stress windows of at least 30ms
        assert!(start.elapsed() >= Duration::from_millis(1060));
        assert!(client
            .calls()
            .iter()
            .all(|c| c.operation() != Operation::GetAll));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_probed_reuses_earlier_probe() {
        let client = Arc::new(FakeClient::with_latency(Duration::from_millis(5)).down("a"));
        let suite = Suite::new(client.clone(), config(SuiteMode::BenchmarkOnly));

        let probe = suite.probe(&targets()).await;
        let report = suite.run_probed(&probe).await.unwrap();

        assert_eq!(client.probes().len(), 3);
        assert_eq!(report.unavailable, vec![Target::new("a", "http://a.local")]);
        let names: Vec<_> = report.benchmarks.iter().map(|b| b.target.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_probed_without_available_targets_fails() {
        let client = Arc::new(FakeClient::with_latency(Duration::from_millis(1)));
        let suite = Suite::new(client.clone(), config(SuiteMode::Full));

        let err = suite.run_probed(&ProbeReport::default()).await.unwrap_err();

        assert!(matches!(err, BenchError::NoTargetsAvailable { checked: 0 }));
        assert!(client.calls().is_empty());
    }
}
