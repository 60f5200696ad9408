//! Batched benchmark driver
//!
//! Runs a fixed number of each CRUD operation against one target, phase by
//! phase in the order CREATE, GET_ALL, GET_ONE, UPDATE, DELETE. Each phase is
//! cut into batches of `concurrency` calls; a batch is dispatched at once and
//! fully completes before the next one starts. That barrier is what makes the
//! phase wall time reflect the concurrency actually achieved, so it must not
//! be replaced by a semaphore or a worker pool.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::Instant;

use crate::executor::{LoadClient, RequestResult};
use crate::operation::{Call, Operation, ResourceId};
use crate::stats::{BenchmarkRun, PhaseResults};
use crate::target::Target;

/// Configuration for a batched benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Invocations of CREATE and GET_ALL
    pub requests: usize,
    /// Batch size; values of `requests` or more run each phase as one batch
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            requests: 1000,
            concurrency: 100,
        }
    }
}

/// Drives the five-phase batched benchmark against a target
pub struct BatchedBenchmark<C: LoadClient> {
    client: Arc<C>,
    config: BatchConfig,
}

impl<C: LoadClient> BatchedBenchmark<C> {
    pub fn new(client: Arc<C>, config: BatchConfig) -> Self {
        Self { client, config }
    }

    /// Run every phase in order and aggregate the results
    pub async fn run(&self, target: &Target) -> BenchmarkRun {
        tracing::info!(
            server = %target.name,
            url = %target.base_url,
            requests = self.config.requests,
            concurrency = self.config.concurrency,
            "Starting batched benchmark"
        );

        let mut phases = Vec::with_capacity(Operation::PHASES.len());
        let mut created: Vec<ResourceId> = Vec::new();

        for operation in Operation::PHASES {
            let calls = self.phase_calls(operation, &created);
            let phase = self.run_phase(target, operation, calls).await;

            if operation == Operation::Create {
                created = created_ids(&phase.results);
                tracing::debug!(
                    server = %target.name,
                    created = created.len(),
                    "Dependent phases will use successful creates"
                );
            }

            phases.push(phase);
        }

        BenchmarkRun::from_phases(self.config.requests, self.config.concurrency, phases)
    }

    fn phase_calls(&self, operation: Operation, created: &[ResourceId]) -> Vec<Call> {
        match operation {
            Operation::Create => (1..=self.config.requests as u64)
                .map(|seq| Call::Create { seq })
                .collect(),
            Operation::GetAll => vec![Call::GetAll; self.config.requests],
            dependent => created
                .iter()
                .filter_map(|&id| Call::on_resource(dependent, id))
                .collect(),
        }
    }

    async fn run_phase(&self, target: &Target, operation: Operation, calls: Vec<Call>) -> PhaseResults {
        let batch_size = self.config.concurrency.max(1);
        let batches = calls.len().div_ceil(batch_size);

        tracing::info!(
            server = %target.name,
            operation = %operation,
            invocations = calls.len(),
            batches,
            "Running phase"
        );

        let start = Instant::now();
        let mut results = Vec::with_capacity(calls.len());

        for batch in calls.chunks(batch_size) {
            let batch_results =
                join_all(batch.iter().map(|&call| self.client.execute(target, call))).await;
            results.extend(batch_results);
        }

        let wall_time = start.elapsed();
        let failed = results.iter().filter(|r| !r.success).count();

        tracing::info!(
            server = %target.name,
            operation = %operation,
            failed,
            wall_time_ms = wall_time.as_millis() as u64,
            "Phase complete"
        );

        PhaseResults {
            operation,
            results,
            wall_time,
        }
    }
}

/// Identifiers returned by successful creates, in dispatch order
fn created_ids(results: &[RequestResult]) -> Vec<ResourceId> {
    results
        .iter()
        .filter(|r| r.success)
        .filter_map(RequestResult::resource_id)
        .collect()
}
