// Targets under test

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One HTTP service instance under test.
///
/// List order of targets matters: comparisons break ties in favour of the
/// target that appears first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Display name used in reports and comparisons
    pub name: String,
    /// Base address, e.g. `http://localhost:3001`
    pub base_url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    /// Join a path onto the base address
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidTarget {
                target: self.base_url.clone(),
                reason: "display name is empty".to_string(),
            });
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidTarget {
                target: self.base_url.clone(),
                reason: "base URL must start with http:// or https://".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.base_url)
    }
}

/// Parses `name=url` or a bare `url` (the URL doubles as the name).
impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let target = match s.split_once('=') {
            Some((name, url)) if !name.contains("://") => Target::new(name.trim(), url.trim()),
            _ => Target::new(s, s),
        };
        target.validate()?;
        Ok(target)
    }
}

/// Parse a comma-separated list of targets
pub fn parse_target_list(s: &str) -> Result<Vec<Target>, ConfigError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Target::from_str)
        .collect()
}
