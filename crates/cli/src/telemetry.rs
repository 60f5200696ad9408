// Logging setup
//
// Logs go to stderr so report output on stdout stays machine-readable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "warn,crudbench=info";
const QUIET_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log filter (e.g., "info", "debug", "crudbench_core=debug")
    pub log_filter: Option<String>,
    /// Lower the default filter to warnings
    pub quiet: bool,
}

impl TelemetryConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `RUST_LOG` or `LOG_LEVEL`: Log filter
    pub fn from_env(quiet: bool) -> Self {
        Self {
            log_filter: std::env::var("RUST_LOG")
                .ok()
                .or_else(|| std::env::var("LOG_LEVEL").ok()),
            quiet,
        }
    }

    /// Filter directives in effect; an explicit filter wins over `quiet`
    pub fn filter(&self) -> EnvFilter {
        let default = if self.quiet {
            QUIET_FILTER
        } else {
            DEFAULT_FILTER
        };

        self.log_filter
            .as_ref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new(default))
    }
}

pub fn init_telemetry(config: TelemetryConfig) {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(config.filter());

    tracing_subscriber::registry().with(console_layer).init();
}
