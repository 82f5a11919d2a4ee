//! Writing the report and the result table to disk.
//!
//! The result format follows the output path's extension: `.csv` or
//! `.json`. Any other extension is replaced by `.csv` with a warning.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use contagion_core::report::InitialReport;
use contagion_types::MeasurementTable;
use tracing::{info, warn};

use crate::error::AppError;

/// On-disk format of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// The serialized [`MeasurementTable`].
    Json,
}

/// Pick the format for `path`, replacing an unsupported extension with
/// `.csv`.
pub fn resolve_output_path(path: &Path) -> (PathBuf, OutputFormat) {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => (path.to_path_buf(), OutputFormat::Csv),
        Some("json") => (path.to_path_buf(), OutputFormat::Json),
        other => {
            let fallback = path.with_extension("csv");
            warn!(
                requested = %path.display(),
                extension = other.unwrap_or(""),
                fallback = %fallback.display(),
                "Unsupported output format, writing CSV instead"
            );
            (fallback, OutputFormat::Csv)
        }
    }
}

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Render a result table as CSV.
///
/// Aggregate tables use the header `<attribute>,value,time` where the
/// attribute column holds the value name and `value` holds the count.
/// Detailed tables use `node_index,<attribute>,time`.
pub fn render_csv(table: &MeasurementTable) -> String {
    let mut out = String::new();
    match table {
        MeasurementTable::Aggregate { attribute, rows } => {
            out.push_str(&format!("{},value,time\n", csv_field(attribute)));
            for row in rows {
                out.push_str(&format!(
                    "{},{},{}\n",
                    csv_field(&row.value),
                    row.count,
                    row.time
                ));
            }
        }
        MeasurementTable::Detailed { attribute, rows } => {
            out.push_str(&format!("node_index,{},time\n", csv_field(attribute)));
            for row in rows {
                out.push_str(&format!(
                    "{},{},{}\n",
                    row.node,
                    csv_field(&row.value),
                    row.time
                ));
            }
        }
    }
    out
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    std::fs::write(path, contents).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Save the result table, returning the path actually written.
///
/// # Errors
///
/// Returns [`AppError::Json`] if encoding fails or [`AppError::Write`] if
/// the file cannot be written.
pub fn save_table(table: &MeasurementTable, path: &Path) -> Result<PathBuf, AppError> {
    let (target, format) = resolve_output_path(path);
    let contents = match format {
        OutputFormat::Csv => render_csv(table),
        OutputFormat::Json => serde_json::to_string_pretty(table)?,
    };
    write_file(&target, &contents)?;
    info!(
        path = %target.display(),
        rows = table.len(),
        mode = %table.mode(),
        "Results saved"
    );
    Ok(target)
}

/// Write the rendered initial-conditions report.
///
/// # Errors
///
/// Returns [`AppError::Write`] if the file cannot be written.
pub fn write_report(report: &InitialReport, path: &Path) -> Result<(), AppError> {
    write_file(path, &report.to_string())?;
    info!(path = %path.display(), run_id = %report.run_id, "Report written");
    Ok(())
}
