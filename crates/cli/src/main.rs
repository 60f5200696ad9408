// crudbench CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Flags override environment, which overrides the config file.

mod commands;
mod output;
mod report;
mod telemetry;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crudbench_core::{SuiteMode, Target};

use commands::{BenchArgs, GlobalOptions, Overrides, PauseArgs, StressArgs};

#[derive(Parser)]
#[command(name = "crudbench")]
#[command(about = "crudbench - Measure latency and throughput of CRUD HTTP services")]
#[command(version)]
pub struct Cli {
    /// YAML or JSON config file
    #[arg(long, short, global = true, env = "CRUDBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Target as [name=]url (repeatable, replaces configured targets)
    #[arg(long = "target", short, global = true)]
    pub targets: Vec<Target>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short, global = true, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe, benchmark and stress-test every configured target
    Run {
        #[command(flatten)]
        bench: BenchArgs,

        #[command(flatten)]
        stress: StressArgs,

        #[command(flatten)]
        pause: PauseArgs,
    },

    /// Batched benchmark only
    Bench {
        #[command(flatten)]
        bench: BenchArgs,

        #[command(flatten)]
        pause: PauseArgs,
    },

    /// Stress test only
    Stress {
        #[command(flatten)]
        stress: StressArgs,

        #[command(flatten)]
        pause: PauseArgs,
    },

    /// Check which targets are available without generating load
    Probe,

    /// Serve the in-memory reference CRUD target
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3001")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(telemetry::TelemetryConfig::from_env(cli.quiet));

    let output_format = output::OutputFormat::parse(&cli.output);
    let global = GlobalOptions {
        config: cli.config,
        targets: cli.targets,
        timeout: cli.timeout,
    };

    let (mode, overrides) = match cli.command {
        Commands::Serve { bind } => return commands::serve::run(bind).await,
        Commands::Probe => {
            let config = commands::load_config(&global, &Overrides::default())?;
            return commands::probe::run(&config, output_format).await;
        }
        Commands::Run {
            bench,
            stress,
            pause,
        } => (
            SuiteMode::Full,
            Overrides {
                bench,
                stress,
                pause,
            },
        ),
        Commands::Bench { bench, pause } => (
            SuiteMode::BenchmarkOnly,
            Overrides {
                bench,
                pause,
                ..Default::default()
            },
        ),
        Commands::Stress { stress, pause } => (
            SuiteMode::StressOnly,
            Overrides {
                stress,
                pause,
                ..Default::default()
            },
        ),
    };

    let config = commands::load_config(&global, &overrides)?;
    commands::suite::run(&config, mode, output_format).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_repeated_targets_and_run_flags() {
        let cli = Cli::try_parse_from([
            "crudbench",
            "--target",
            "node=http://localhost:3001",
            "-t",
            "http://localhost:3002",
            "run",
            "--requests",
            "50",
            "--workers",
            "8",
            "--pause-ms",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.targets.len(), 2);
        assert_eq!(cli.targets[0].name, "node");
        assert_eq!(cli.targets[1].name, "http://localhost:3002");
        match cli.command {
            Commands::Run {
                bench,
                stress,
                pause,
            } => {
                assert_eq!(bench.requests, Some(50));
                assert_eq!(bench.concurrency, None);
                assert_eq!(stress.workers, Some(8));
                assert_eq!(pause.pause_ms, Some(0));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_rejects_invalid_target() {
        let result = Cli::try_parse_from(["crudbench", "--target", "ftp://x", "probe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["crudbench", "bench", "--output", "json", "--quiet"]).unwrap();
        assert_eq!(cli.output, "json");
        assert!(cli.quiet);
    }

    #[test]
    fn test_serve_default_bind() {
        let cli = Cli::try_parse_from(["crudbench", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.port(), 3001),
            _ => panic!("expected serve"),
        }
    }
}
