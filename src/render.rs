//! Response rendering for the supported output formats.
//!
//! A decoded response is a map whose list-valued fields hold the
//! interesting rows; scalar fields print as `key = value`. The optional
//! filter restricts which row keys are shown, in every format.

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::Error;
use crate::utils::scalar_to_string;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Bordered table
    Table,
    /// Comma-separated values
    Csv,
    /// Space-aligned columns
    Column,
    /// Flat `key = value` text
    Text,
}

impl OutputFormat {
    /// Accepted values for the `set output` sub-command.
    #[must_use]
    pub const fn names() -> [&'static str; 5] {
        ["json", "table", "csv", "column", "text"]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Column => "column",
            Self::Text => "text",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "column" => Ok(Self::Column),
            "text" => Ok(Self::Text),
            other => Err(Error::Config(format!(
                "invalid output format '{other}', expected one of: {}",
                Self::names().join(", ")
            ))),
        }
    }
}

/// Renders and prints a response.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn print_response(
    format: OutputFormat,
    response: &Value,
    filter: &[String],
) -> Result<(), Error> {
    let rendered = render_response(format, response, filter)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

/// Renders a response to a string; split out from printing for tests.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn render_response(
    format: OutputFormat,
    response: &Value,
    filter: &[String],
) -> Result<String, Error> {
    let filtered = apply_filter(response, filter);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&filtered)?),
        OutputFormat::Text => Ok(render_text(&filtered)),
        OutputFormat::Table => Ok(render_rows(&filtered, &TableShape::Bordered)),
        OutputFormat::Csv => Ok(render_rows(&filtered, &TableShape::Csv)),
        OutputFormat::Column => Ok(render_rows(&filtered, &TableShape::Column)),
    }
}

/// Restricts list-row keys to the filter set; scalars pass through.
fn apply_filter(response: &Value, filter: &[String]) -> Value {
    if filter.is_empty() {
        return response.clone();
    }
    let Some(obj) = response.as_object() else {
        return response.clone();
    };
    let mut out = Map::new();
    for (key, value) in obj {
        match value.as_array() {
            Some(items) => {
                let rows: Vec<Value> = items
                    .iter()
                    .map(|item| match item.as_object() {
                        Some(row) => Value::Object(
                            row.iter()
                                .filter(|(k, _)| filter.iter().any(|f| f.as_str() == k.as_str()))
                                .map(|(k, v)| (k.clone(), v.clone()))
                                .collect(),
                        ),
                        None => item.clone(),
                    })
                    .collect();
                out.insert(key.clone(), Value::Array(rows));
            }
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(out)
}

fn render_text(response: &Value) -> String {
    let Some(obj) = response.as_object() else {
        return scalar_to_string(response);
    };
    let mut out = String::new();
    for (key, value) in obj {
        match value.as_array() {
            Some(items) => {
                out.push_str(&format!("{key}:\n"));
                for item in items {
                    match item.as_object() {
                        Some(row) => {
                            for (field, v) in row {
                                out.push_str(&format!("{field} = {}\n", scalar_to_string(v)));
                            }
                        }
                        None => out.push_str(&format!("{}\n", scalar_to_string(item))),
                    }
                    out.push_str(&"=".repeat(80));
                    out.push('\n');
                }
            }
            None => out.push_str(&format!("{key} = {}\n", scalar_to_string(value))),
        }
    }
    out.trim_end().to_string()
}

enum TableShape {
    Bordered,
    Csv,
    Column,
}

fn render_rows(response: &Value, shape: &TableShape) -> String {
    let Some(obj) = response.as_object() else {
        return scalar_to_string(response);
    };
    let mut out = String::new();
    for (key, value) in obj {
        match value.as_array() {
            Some(items) => {
                let rows: Vec<&Map<String, Value>> =
                    items.iter().filter_map(Value::as_object).collect();
                if rows.is_empty() {
                    continue;
                }
                let header: Vec<String> = rows
                    .iter()
                    .flat_map(|row| row.keys().cloned())
                    .collect::<BTreeSet<String>>()
                    .into_iter()
                    .collect();
                out.push_str(&format!("{key}:\n"));
                out.push_str(&format_rows(&header, &rows, shape));
                out.push('\n');
            }
            None => out.push_str(&format!("{key} = {}\n", scalar_to_string(value))),
        }
    }
    out.trim_end().to_string()
}

fn format_rows(header: &[String], rows: &[&Map<String, Value>], shape: &TableShape) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            header
                .iter()
                .map(|field| row.get(field).map(scalar_to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    match shape {
        TableShape::Bordered => {
            let mut builder = Builder::default();
            builder.push_record(header.iter().cloned());
            for row in cells {
                builder.push_record(row);
            }
            builder.build().with(Style::sharp()).to_string()
        }
        TableShape::Csv => {
            let mut lines = vec![header.join(",")];
            for row in cells {
                let quoted: Vec<String> = row
                    .into_iter()
                    .map(|cell| {
                        if cell.contains(',') || cell.contains('"') {
                            format!("\"{}\"", cell.replace('"', "\"\""))
                        } else {
                            cell
                        }
                    })
                    .collect();
                lines.push(quoted.join(","));
            }
            lines.join("\n")
        }
        TableShape::Column => {
            let widths: Vec<usize> = header
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    cells
                        .iter()
                        .map(|row| row[i].len())
                        .chain(std::iter::once(h.len()))
                        .max()
                        .unwrap_or(0)
                })
                .collect();
            let fmt_line = |row: &[String]| -> String {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
                    .collect::<Vec<_>>()
                    .join("  ")
                    .trim_end()
                    .to_string()
            };
            let mut lines = vec![fmt_line(header)];
            for row in &cells {
                lines.push(fmt_line(row));
            }
            lines.join("\n")
        }
    }
}
