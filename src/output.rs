//! Output formatting and persistence for aggregation results.
//!
//! Supports pretty-printing, JSON serialization to stdout or a file, and CSV
//! export of row-shaped results such as the enrollment trend.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Logs a result using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a result as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Prints a result as pretty-printed JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    write_json(std::io::stdout().lock(), value)
}

/// Serializes a result to a JSON file, creating parent directories as needed.
pub fn write_json_file(path: &Path, value: &impl Serialize) -> Result<()> {
    create_parent(path)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_json(file, value)?;

    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes rows to a CSV file with a header line, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    create_parent(path)?;
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
