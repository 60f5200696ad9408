//! Cross-target comparison
//!
//! Picks the fastest target per benchmark operation (lowest mean latency) and
//! the stress target with the highest throughput. Comparisons are strict, so
//! on a tie the target listed first keeps the win.

use serde::Serialize;

use crate::operation::Operation;
use crate::suite::{TargetBenchmark, TargetStress};
use crate::target::Target;

/// Fastest target for one benchmark operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationWinner {
    pub operation: Operation,
    /// `None` when every target's stats for the operation are all-failed
    pub winner: Option<Target>,
    pub best_mean_ms: Option<f64>,
}

/// Stress target with the highest throughput
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressWinner {
    pub target: Target,
    pub req_per_sec: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub operations: Vec<OperationWinner>,
    pub stress: Option<StressWinner>,
}

impl Comparison {
    pub fn build(benchmarks: &[TargetBenchmark], stress: &[TargetStress]) -> Self {
        Self {
            operations: benchmark_winners(benchmarks),
            stress: stress_winner(stress),
        }
    }
}

/// Per operation, in phase order, the target with the strictly lowest mean
pub fn benchmark_winners(benchmarks: &[TargetBenchmark]) -> Vec<OperationWinner> {
    Operation::PHASES
        .iter()
        .map(|&operation| {
            let mut best: Option<(&Target, f64)> = None;

            for entry in benchmarks {
                let Some(mean) = entry.run.get(operation).and_then(|s| s.mean_ms()) else {
                    continue;
                };
                if best.map_or(true, |(_, best_mean)| mean < best_mean) {
                    best = Some((&entry.target, mean));
                }
            }

            OperationWinner {
                operation,
                winner: best.map(|(target, _)| target.clone()),
                best_mean_ms: best.map(|(_, mean)| mean),
            }
        })
        .collect()
}

/// The target with the strictly highest req/s; zero throughput never wins
pub fn stress_winner(stress: &[TargetStress]) -> Option<StressWinner> {
    let mut best_rps = 0.0;
    let mut winner = None;

    for entry in stress {
        let rps = entry.run.req_per_sec.unwrap_or(0.0);
        if rps > best_rps {
            best_rps = rps;
            winner = Some(&entry.target);
        }
    }

    winner.map(|target| StressWinner {
        target: target.clone(),
        req_per_sec: best_rps,
    })
}
