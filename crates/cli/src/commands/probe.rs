// Availability check without load

use anyhow::{bail, Context, Result};
use crudbench_core::{BenchConfig, Suite, SuiteMode};

use crate::output::OutputFormat;
use crate::report::render_probe;

pub async fn run(config: &BenchConfig, output: OutputFormat) -> Result<()> {
    let suite = Suite::http(config, SuiteMode::Full).context("Failed to set up probe")?;
    let report = suite.probe(&config.targets).await;

    if output.is_text() {
        print!("{}", render_probe(&report));
    } else {
        output.print_value(&report)?;
    }

    if !report.any_available() {
        bail!("No servers are running! Please start at least one server.");
    }
    Ok(())
}
