// Variant configuration - the model plus file ingestion for the CLI

pub mod variant;

pub use variant::{DecodeError, StreamOutputVariant};

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read variant definitions from a JSON or TOML file.
///
/// The file may hold a single variant, an array of variants, or a mapping
/// with a `variants` array (TOML: one top-level table or `[[variants]]`
/// array-of-tables). Both formats use the same field names.
pub fn variants_from_file(path: &Path) -> Result<Vec<StreamOutputVariant>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read variant file: {}", path.display()))?;

    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    let raw: Value = if is_toml {
        let table: toml::Value = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;
        serde_json::to_value(table).context("Failed to convert TOML value")?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?
    };

    let variants = decode_all(&raw)
        .with_context(|| format!("Invalid variant definition in {}", path.display()))?;

    tracing::debug!(count = variants.len(), file = %path.display(), "loaded variants");
    Ok(variants)
}

fn decode_all(raw: &Value) -> Result<Vec<StreamOutputVariant>, DecodeError> {
    match raw {
        Value::Array(items) => items.iter().map(StreamOutputVariant::from_value).collect(),
        Value::Object(fields) => {
            if let Some(Value::Array(items)) = fields.get("variants") {
                items.iter().map(StreamOutputVariant::from_value).collect()
            } else {
                Ok(vec![StreamOutputVariant::from_value(raw)?])
            }
        }
        // Let the model report the kind mismatch.
        other => Ok(vec![StreamOutputVariant::from_value(other)?]),
    }
}
