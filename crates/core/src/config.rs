// Benchmark configuration
//
// Layered: built-in defaults, then an optional YAML/JSON file, then
// CRUDBENCH_* environment variables. Command-line flags are applied on top
// by the binary.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::error::ConfigError;
use crate::stress::StressConfig;
use crate::suite::{SuiteConfig, SuiteMode};
use crate::target::{parse_target_list, Target};

pub const ENV_REQUESTS: &str = "CRUDBENCH_REQUESTS";
pub const ENV_CONCURRENCY: &str = "CRUDBENCH_CONCURRENCY";
pub const ENV_STRESS_DURATION_SECS: &str = "CRUDBENCH_STRESS_DURATION_SECS";
pub const ENV_STRESS_WORKERS: &str = "CRUDBENCH_STRESS_WORKERS";
pub const ENV_TIMEOUT_SECS: &str = "CRUDBENCH_TIMEOUT_SECS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "CRUDBENCH_PROBE_TIMEOUT_SECS";
pub const ENV_TARGET_PAUSE_MS: &str = "CRUDBENCH_TARGET_PAUSE_MS";
pub const ENV_TARGETS: &str = "CRUDBENCH_TARGETS";

/// Everything a suite run needs to know
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Targets in comparison order
    pub targets: Vec<Target>,

    /// Invocations per independent benchmark phase
    pub requests: usize,

    /// Batch size of the benchmark
    pub concurrency: usize,

    pub stress_duration_secs: u64,

    pub stress_workers: usize,

    /// Transport timeout applied to every load request
    pub request_timeout_secs: u64,

    /// Timeout of the availability probe
    pub probe_timeout_secs: u64,

    /// Pause before each target's benchmark and stress run
    pub target_pause_ms: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                Target::new("Node.js", "http://localhost:3001"),
                Target::new("Deno", "http://localhost:3002"),
                Target::new("Bun", "http://localhost:3003"),
            ],
            requests: 1000,
            concurrency: 100,
            stress_duration_secs: 10,
            stress_workers: 200,
            request_timeout_secs: 30,
            probe_timeout_secs: 2,
            target_pause_ms: 1000,
        }
    }
}

impl BenchConfig {
    /// Load defaults, the optional config file, `.env` and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Read a YAML or JSON file; fields it omits keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&contents).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Override fields from `CRUDBENCH_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = env_value(&lookup, ENV_REQUESTS)? {
            self.requests = value;
        }
        if let Some(value) = env_value(&lookup, ENV_CONCURRENCY)? {
            self.concurrency = value;
        }
        if let Some(value) = env_value(&lookup, ENV_STRESS_DURATION_SECS)? {
            self.stress_duration_secs = value;
        }
        if let Some(value) = env_value(&lookup, ENV_STRESS_WORKERS)? {
            self.stress_workers = value;
        }
        if let Some(value) = env_value(&lookup, ENV_TIMEOUT_SECS)? {
            self.request_timeout_secs = value;
        }
        if let Some(value) = env_value(&lookup, ENV_PROBE_TIMEOUT_SECS)? {
            self.probe_timeout_secs = value;
        }
        if let Some(value) = env_value(&lookup, ENV_TARGET_PAUSE_MS)? {
            self.target_pause_ms = value;
        }
        if let Some(value) = lookup(ENV_TARGETS) {
            self.targets = parse_target_list(&value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests == 0 {
            return Err(ConfigError::Zero { field: "requests" });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Zero {
                field: "concurrency",
            });
        }
        if self.stress_duration_secs == 0 {
            return Err(ConfigError::Zero {
                field: "stress_duration_secs",
            });
        }
        if self.stress_workers == 0 {
            return Err(ConfigError::Zero {
                field: "stress_workers",
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                field: "request_timeout_secs",
            });
        }
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                field: "probe_timeout_secs",
            });
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        for target in &self.targets {
            target.validate()?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            requests: self.requests,
            concurrency: self.concurrency,
        }
    }

    pub fn stress_config(&self) -> StressConfig {
        StressConfig {
            duration: Duration::from_secs(self.stress_duration_secs),
            workers: self.stress_workers,
        }
    }

    pub fn suite_config(&self, mode: SuiteMode) -> SuiteConfig {
        SuiteConfig {
            mode,
            batch: self.batch_config(),
            stress: self.stress_config(),
            target_pause: Duration::from_millis(self.target_pause_ms),
        }
    }
}

fn env_value<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("crudbench-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.requests, 1000);
        assert_eq!(config.concurrency, 100);
        assert_eq!(config.stress_config().duration, Duration::from_secs(10));
        assert_eq!(config.stress_workers, 200);
        assert_eq!(config.probe_timeout(), Duration::from_secs(2));
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.targets[0].base_url, "http://localhost:3001");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BenchConfig::default();
        config
            .apply_env_from(lookup(&[
                (ENV_REQUESTS, "50"),
                (ENV_CONCURRENCY, " 5 "),
                (ENV_TARGET_PAUSE_MS, "0"),
                (ENV_TARGETS, "local=http://127.0.0.1:8080"),
            ]))
            .unwrap();

        assert_eq!(config.requests, 50);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.target_pause_ms, 0);
        assert_eq!(config.targets, vec![Target::new("local", "http://127.0.0.1:8080")]);
        // Untouched fields keep their defaults
        assert_eq!(config.stress_workers, 200);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = BenchConfig::default();
        let err = config
            .apply_env_from(lookup(&[(ENV_STRESS_WORKERS, "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref key, .. } if key == ENV_STRESS_WORKERS));
    }

    #[test]
    fn test_validate_rejects_zero_and_empty() {
        let zero_concurrency = BenchConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_concurrency.validate(),
            Err(ConfigError::Zero {
                field: "concurrency"
            })
        ));

        let no_targets = BenchConfig {
            targets: vec![],
            ..Default::default()
        };
        assert!(matches!(no_targets.validate(), Err(ConfigError::NoTargets)));

        let bad_url = BenchConfig {
            targets: vec![Target::new("x", "ftp://example.com")],
            ..Default::default()
        };
        assert!(matches!(
            bad_url.validate(),
            Err(ConfigError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_yaml_file_keeps_missing_defaults() {
        let path = write_temp(
            "partial.yaml",
            "requests: 10\ntargets:\n  - name: local\n    base_url: http://localhost:9000\n",
        );

        let config = BenchConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.requests, 10);
        assert_eq!(config.concurrency, 100);
        assert_eq!(config.targets[0].name, "local");
    }

    #[test]
    fn test_json_file_by_extension() {
        let path = write_temp("bench.json", r#"{"stress_workers": 8, "stress_duration_secs": 3}"#);

        let config = BenchConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.stress_config().workers, 8);
        assert_eq!(config.stress_config().duration, Duration::from_secs(3));
    }

    #[test]
    fn test_unparseable_file_names_path() {
        let path = write_temp("broken.yaml", "requests: [not a number");

        let err = BenchConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_suite_config_carries_pause() {
        let config = BenchConfig {
            target_pause_ms: 250,
            ..Default::default()
        };
        let suite = config.suite_config(SuiteMode::StressOnly);
        assert_eq!(suite.target_pause, Duration::from_millis(250));
        assert_eq!(suite.mode, SuiteMode::StressOnly);
        assert_eq!(suite.batch.requests, 1000);
    }
}
