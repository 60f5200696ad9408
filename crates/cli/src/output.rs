// Output formatting for CLI

use anyhow::Result;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        }
    }

    pub fn print_value<T: Serialize>(&self, value: &T) -> Result<()> {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yaml::to_string(value)?);
            }
            OutputFormat::Text => {
                // Text format is handled by each command
            }
        }
        Ok(())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

pub const RULE_WIDTH: usize = 70;

/// A full-width `=` rule
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Key-value line with the label padded into a column
pub fn field(label: &str, value: &str) -> String {
    format!("{:<20} {}", format!("{}:", label), value)
}

/// Table header line
pub fn table_header(columns: &[(&str, usize)]) -> String {
    columns
        .iter()
        .map(|(name, width)| format!("{:<width$}", name, width = width))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Table row line; values wider than their column are cut with "..."
pub fn table_row(values: &[(&str, usize)]) -> String {
    values
        .iter()
        .map(|(val, width)| {
            let s = if val.chars().count() > *width {
                let kept: String = val.chars().take(width.saturating_sub(3)).collect();
                format!("{}...", kept)
            } else {
                val.to_string()
            };
            format!("{:<width$}", s, width = width)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Two decimals, or "-" when absent. Used for milliseconds and req/sec alike.
pub fn fixed2(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_row_truncates_long_values() {
        let row = table_row(&[("a-very-long-server-name", 10), ("1.00", 6)]);
        assert_eq!(row, "a-very-...  1.00  ");
    }

    #[test]
    fn test_field_aligns_label() {
        assert_eq!(field("Failed", "3"), format!("{:<20} 3", "Failed:"));
    }

    #[test]
    fn test_fixed2_formats_missing_as_dash() {
        assert_eq!(fixed2(Some(1.234)), "1.23");
        assert_eq!(fixed2(Some(1500.0)), "1500.00");
        assert_eq!(fixed2(None), "-");
    }

    #[test]
    fn test_parse_defaults_to_text() {
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::parse("xml"), OutputFormat::Text);
    }
}
