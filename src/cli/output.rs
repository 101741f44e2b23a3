//! Output formatting for CLI reports
//!
//! Reports can be rendered as JSON, YAML, or a plain table.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::validation::{IstioValidations, ValidationSeverity};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "table" => Ok(OutputFormat::Table),
            _ => anyhow::bail!(
                "Unsupported output format: '{}'. Use 'json', 'yaml', or 'table'.",
                s
            ),
        }
    }
}

/// Print per-namespace reports in the requested format
pub fn print_reports(
    reports: &BTreeMap<String, IstioValidations>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(reports),
        OutputFormat::Yaml => print_yaml(reports),
        OutputFormat::Table => {
            print!("{}", render_table(reports, false));
            Ok(())
        }
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(data).context("Failed to serialize to YAML")?;
    println!("{}", yaml);
    Ok(())
}

/// Render reports as a table, one row per check.
pub fn render_table(reports: &BTreeMap<String, IstioValidations>, plain: bool) -> String {
    let mut out = String::new();

    if reports.values().all(IstioValidations::is_empty) {
        out.push_str("No host conflicts found\n");
        return out;
    }

    let columns = [("Namespace", 20), ("Name", 30), ("Severity", 10), ("Path", 12), ("Message", 0)];
    out.push('\n');
    out.push_str(&table_header(&columns));

    for (namespace, validations) in reports {
        for validation in validations.values() {
            for check in &validation.checks {
                let severity = if plain {
                    check.severity.to_string()
                } else {
                    colored_severity(check.severity)
                };
                out.push_str(&format!(
                    "{:<20} {:<30} {:<10} {:<12} {}\n",
                    truncate(namespace, 18),
                    truncate(&validation.name, 28),
                    severity,
                    check.path,
                    check.message
                ));
            }
        }
    }

    out.push('\n');
    out
}

fn colored_severity(severity: ValidationSeverity) -> String {
    match severity {
        ValidationSeverity::Warning => format!("{:<10}", severity.as_str()).yellow().to_string(),
        ValidationSeverity::Error => format!("{:<10}", severity.as_str()).red().to_string(),
    }
}

/// Truncate string to maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn table_header(columns: &[(&str, usize)]) -> String {
    let mut header = String::new();
    for (name, width) in columns {
        header.push_str(&format!("{:<width$} ", name, width = width));
    }

    let total_width: usize = columns.iter().map(|(name, w)| (*w).max(name.len()) + 1).sum();
    format!("{}\n{}\n", header.trim_end(), "-".repeat(total_width.saturating_sub(1)))
}
