// Load-generating commands: run, bench and stress

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crudbench_core::{BenchConfig, BenchError, Suite, SuiteMode, SuiteReport};
use serde::Serialize;

use crate::output::{field, rule, OutputFormat};
use crate::report::{render_probe, render_suite};

/// Machine-readable output of a suite run
#[derive(Serialize)]
struct RunOutput<'a> {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a SuiteReport,
}

pub async fn run(config: &BenchConfig, mode: SuiteMode, output: OutputFormat) -> Result<()> {
    let started_at = Utc::now();
    let suite = Suite::http(config, mode).context("Failed to set up suite")?;

    if output.is_text() {
        println!("{}", rule());
        println!("SERVER PERFORMANCE TESTING");
        println!("{}", rule());
        println!("{}", field("Started", &started_at.to_rfc3339()));
        println!();
    }

    let probe = suite.probe(&config.targets).await;
    if output.is_text() {
        println!("{}", render_probe(&probe));
    }

    let report = match suite.run_probed(&probe).await {
        Ok(report) => report,
        Err(e @ BenchError::NoTargetsAvailable { .. }) => {
            return Err(e).context("No servers are running! Please start at least one server.");
        }
        Err(e) => return Err(e).context("Suite failed"),
    };

    if output.is_text() {
        print!("{}", render_suite(&report));
        println!("All tests completed!");
    } else {
        output.print_value(&RunOutput {
            started_at,
            finished_at: Utc::now(),
            report: &report,
        })?;
    }

    Ok(())
}
