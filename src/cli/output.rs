//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::escape_csv;
use crate::cli::OutputFormat;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Table
            } else {
                OutputFormat::Yaml
            }
        }
        other => other,
    }
}

/// Print rows in the requested list format
///
/// `fields` extracts the raw cell values used for TSV/CSV output.
pub fn print_rows<T, F>(rows: &[T], format: OutputFormat, headers: &[&str], fields: F) -> Result<()>
where
    T: Serialize + Tabled,
    F: Fn(&T) -> Vec<String>,
{
    match effective_format(format, true) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(rows).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            println!("{}", headers.join("\t"));
            for row in rows {
                let cells: Vec<String> = fields(row)
                    .into_iter()
                    .map(|c| c.replace(['\t', '\n'], " "))
                    .collect();
                println!("{}", cells.join("\t"));
            }
        }
        OutputFormat::Csv => {
            println!("{}", headers.join(","));
            for row in rows {
                let cells: Vec<String> = fields(row).iter().map(|c| escape_csv(c)).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
    }
    Ok(())
}
