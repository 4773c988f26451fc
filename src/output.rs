//! Report emission.
//!
//! Supports plain text, pretty-printed JSON, and CSV append of line counts.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::reports::LineSummary;
use csv::WriterBuilder;

/// Writes a report's text form followed by a newline.
pub fn write_text(out: &mut impl Write, report: &impl Display) -> Result<()> {
    writeln!(out, "{report}")?;
    Ok(())
}

/// Writes a report as pretty-printed JSON followed by a newline.
pub fn write_json(out: &mut impl Write, report: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Appends one CSV row per line of a [`LineSummary`].
///
/// Creates the file with headers if it does not already exist.
pub fn append_line_counts(path: &str, summary: &LineSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = summary.lines.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for line in &summary.lines {
        writer.serialize(line)?;
    }
    writer.flush()?;

    Ok(())
}
