// Subcommands and the configuration they share

pub mod probe;
pub mod serve;
pub mod suite;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use crudbench_core::{BenchConfig, Target};

/// Batched benchmark flags
#[derive(Args, Debug, Default, Clone)]
pub struct BenchArgs {
    /// Requests per CREATE and GET_ALL phase
    #[arg(long)]
    pub requests: Option<usize>,

    /// Requests dispatched together in one batch
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Stress test flags
#[derive(Args, Debug, Default, Clone)]
pub struct StressArgs {
    /// Seconds during which workers start new iterations
    #[arg(long)]
    pub duration: Option<u64>,

    /// Concurrent stress workers
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct PauseArgs {
    /// Pause before each target, in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,
}

/// Options that apply to every load-generating subcommand
#[derive(Debug, Default, Clone)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub targets: Vec<Target>,
    pub timeout: Option<u64>,
}

/// Command-line overrides, applied after file and environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bench: BenchArgs,
    pub stress: StressArgs,
    pub pause: PauseArgs,
}

/// Resolve the effective configuration: defaults, file, environment, flags
pub fn load_config(global: &GlobalOptions, overrides: &Overrides) -> Result<BenchConfig> {
    let mut config =
        BenchConfig::load(global.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, global, overrides);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn apply_overrides(config: &mut BenchConfig, global: &GlobalOptions, overrides: &Overrides) {
    if !global.targets.is_empty() {
        config.targets = global.targets.clone();
    }
    if let Some(timeout) = global.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(requests) = overrides.bench.requests {
        config.requests = requests;
    }
    if let Some(concurrency) = overrides.bench.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(duration) = overrides.stress.duration {
        config.stress_duration_secs = duration;
    }
    if let Some(workers) = overrides.stress.workers {
        config.stress_workers = workers;
    }
    if let Some(pause_ms) = overrides.pause.pause_ms {
        config.target_pause_ms = pause_ms;
    }
}
