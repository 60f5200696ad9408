//! Fixed-duration stress driver
//!
//! `workers` concurrent tasks each loop create → get → update → delete until
//! the deadline passes. The deadline only stops new iterations from starting;
//! an iteration already underway runs to completion, so the run may overshoot
//! the configured duration by up to one full iteration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::executor::{LoadClient, RequestResult};
use crate::operation::{Call, ResourceId};
use crate::stats::StressRun;
use crate::target::Target;

/// Configuration for a stress run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressConfig {
    /// Window during which new iterations may start
    pub duration: Duration,
    pub workers: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
            workers: 200,
        }
    }
}

/// Hands out identifiers from one increasing sequence starting at 1
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> ResourceId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of identifiers handed out so far
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a stress run against a target
pub struct StressTest<C: LoadClient + 'static> {
    client: Arc<C>,
    config: StressConfig,
}

impl<C: LoadClient + 'static> StressTest<C> {
    pub fn new(client: Arc<C>, config: StressConfig) -> Self {
        Self { client, config }
    }

    pub async fn run(&self, target: &Target) -> StressRun {
        tracing::info!(
            server = %target.name,
            url = %target.base_url,
            duration_secs = self.config.duration.as_secs_f64(),
            workers = self.config.workers,
            "Starting stress test"
        );

        let ids = Arc::new(IdAllocator::new());
        let start = Instant::now();
        let deadline = start + self.config.duration;

        let mut tasks = JoinSet::new();
        for _ in 0..self.config.workers {
            tasks.spawn(run_worker(
                self.client.clone(),
                target.clone(),
                ids.clone(),
                deadline,
            ));
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(worker_results) => results.extend(worker_results),
                Err(e) => {
                    tracing::error!(server = %target.name, error = %e, "Stress worker failed");
                }
            }
        }

        let total_time = start.elapsed();
        let run = StressRun::from_results(
            &results,
            total_time,
            self.config.duration,
            self.config.workers,
            ids.allocated(),
        );

        tracing::info!(
            server = %target.name,
            total = run.total,
            failed = run.failed,
            total_time_ms = total_time.as_millis() as u64,
            "Stress test complete"
        );

        run
    }
}

/// One worker's loop; results stay local until the worker is joined
async fn run_worker<C: LoadClient>(
    client: Arc<C>,
    target: Target,
    ids: Arc<IdAllocator>,
    deadline: Instant,
) -> Vec<RequestResult> {
    let mut results = Vec::new();

    while Instant::now() < deadline {
        let seq = ids.next_id();
        let created = client.execute(&target, Call::Create { seq }).await;

        let id = match created.resource_id() {
            Some(id) if created.success => id,
            _ => {
                results.push(created);
                continue;
            }
        };
        results.push(created);

        for call in [
            Call::GetOne { id },
            Call::Update { id },
            Call::Delete { id },
        ] {
            results.push(client.execute(&target, call).await);
        }
    }

    results
}
