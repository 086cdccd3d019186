//! Stamp `restaurant.updatedAt` in a menu JSON file.
//!
//! Key order and the rest of the document are preserved; the file is
//! rewritten as two-space pretty JSON with a trailing newline.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampOutcome {
    /// The file now carries this timestamp.
    Updated(String),
    /// `updatedAt` already had the timestamp; nothing written.
    Unchanged,
    /// No `restaurant` object; not a menu file.
    Skipped,
}

/// Stamp with the current UTC time.
pub fn stamp_file(path: &Path) -> Result<StampOutcome> {
    stamp_file_at(path, Utc::now())
}

pub fn stamp_file_at(path: &Path, now: DateTime<Utc>) -> Result<StampOutcome> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut doc: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let Some(restaurant) = doc.get_mut("restaurant").and_then(Value::as_object_mut) else {
        tracing::info!("skipped (no restaurant): {}", path.display());
        return Ok(StampOutcome::Skipped);
    };

    if restaurant.get("updatedAt").and_then(Value::as_str) == Some(stamp.as_str()) {
        tracing::debug!("no change: {}", path.display());
        return Ok(StampOutcome::Unchanged);
    }
    restaurant.insert("updatedAt".to_string(), Value::String(stamp.clone()));

    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("updated {} -> {}", path.display(), stamp);
    Ok(StampOutcome::Updated(stamp))
}
