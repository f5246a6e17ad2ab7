//! Output formatting for CLI commands
//!
//! Analysis results print as JSON, YAML, or a compact endpoint table.

use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;

use crate::domain::AnalysisResult;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
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

/// Print an analysis result in the requested format
pub fn print_analysis(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(result),
        OutputFormat::Yaml => print_yaml(result),
        OutputFormat::Table => {
            print_endpoint_table(result);
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

/// One table row per endpoint
pub fn endpoint_rows(result: &AnalysisResult) -> Vec<[String; 4]> {
    result
        .endpoints
        .iter()
        .map(|endpoint| {
            let statuses: Vec<String> =
                endpoint.responses.keys().map(|status| status.to_string()).collect();
            [
                endpoint.method.clone(),
                truncate(&endpoint.path, 48),
                endpoint.sample_count.to_string(),
                statuses.join(","),
            ]
        })
        .collect()
}

fn print_endpoint_table(result: &AnalysisResult) {
    let columns = [("METHOD", 8), ("PATH", 48), ("SAMPLES", 8), ("STATUSES", 20)];
    print_table_header(&columns);
    for row in endpoint_rows(result) {
        println!(
            "{:<8} {:<48} {:<8} {}",
            row[0], row[1], row[2], row[3]
        );
    }
    println!();
    println!(
        "{} endpoints, {} auth patterns, {} common headers",
        result.endpoints.len(),
        result.auth_patterns.len(),
        result.common_headers.len()
    );
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

/// Print a horizontal separator line
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    println!();
    let mut header = String::new();
    for (name, width) in columns {
        header.push_str(&format!("{:<width$} ", name, width = width));
    }
    println!("{}", header.trim());

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    print_separator(total_width.saturating_sub(1));
}
