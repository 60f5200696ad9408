// CRUD HTTP Benchmark Engine
//
// This crate generates load against HTTP services exposing a `/users` CRUD
// surface and reduces the results into latency and throughput statistics.
//
// Key design decisions:
// - Drivers talk to targets only through the LoadClient trait (HttpClient is the
//   production implementation)
// - The batched benchmark bounds concurrency with an explicit per-batch barrier,
//   so phase wall time reflects the concurrency actually achieved
// - The stress driver shares one atomic identifier counter across workers and
//   merges per-worker result buffers after join
// - Success is status-code agnostic: only transport and decode faults count as
//   failures
// - Request failures are folded into statistics; the only fatal condition is
//   "no target passed the availability probe"

pub mod batch;
pub mod compare;
pub mod config;
pub mod error;
pub mod executor;
pub mod operation;
pub mod probe;
pub mod stats;
pub mod stress;
pub mod suite;
pub mod target;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use batch::{BatchConfig, BatchedBenchmark};
pub use compare::{benchmark_winners, stress_winner, Comparison, OperationWinner, StressWinner};
pub use config::BenchConfig;
pub use error::{BenchError, ConfigError, ExchangeError, Result};
pub use executor::{HttpClient, LoadClient, RequestResult};
pub use operation::{Call, Operation, ResourceId};
pub use probe::{probe_targets, ProbeReport, TargetStatus};
pub use stats::{
    mean, median, percentile, stdev, throughput, BenchmarkRun, LatencySummary, OperationStats,
    PhaseResults, RunSummary, StressRun,
};
pub use stress::{IdAllocator, StressConfig, StressTest};
pub use suite::{Suite, SuiteConfig, SuiteMode, SuiteReport, TargetBenchmark, TargetStress};
pub use target::{parse_target_list, Target};
