//! The exported position list.
//!
//! One `{ "left": n, "top": n }` object per image, in image order, one
//! object per line. Numbers print the way a browser prints them: integral
//! values without a fractional part, unset or non-finite values as `0`.

use std::path::Path;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportedPosition {
    pub left: f64,
    pub top: f64,
}

impl From<Position> for ExportedPosition {
    fn from(position: Position) -> Self {
        let or_zero = |v: Option<f64>| v.filter(|v| v.is_finite()).unwrap_or(0.0);
        Self {
            left: or_zero(position.left),
            top: or_zero(position.top),
        }
    }
}

impl Serialize for ExportedPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ExportedPosition", 2)?;
        s.serialize_field("left", &Number(self.left))?;
        s.serialize_field("top", &Number(self.top))?;
        s.end()
    }
}

/// An f64 that serializes integral values as integers.
struct Number(f64);

// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let v = self.0;
        if !v.is_finite() {
            serializer.serialize_i64(0)
        } else if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

/// Text for a single coordinate, as shown in the position table.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    serde_json::to_string(&Number(value)).unwrap_or_default()
}

/// Compact JSON for one position, used for the marker tooltip.
pub fn position_json(position: Position) -> String {
    serde_json::to_string(&ExportedPosition::from(position)).unwrap_or_default()
}

pub fn to_json(entries: &[ExportedPosition]) -> Result<String> {
    if entries.is_empty() {
        return Ok("[]".to_string());
    }
    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        lines.push(format!(
            "  {{ \"left\": {}, \"top\": {} }}",
            serde_json::to_string(&Number(entry.left))?,
            serde_json::to_string(&Number(entry.top))?,
        ));
    }
    Ok(format!("[\n{}\n]", lines.join(",\n")))
}

pub fn write_json(path: &Path, entries: &[ExportedPosition]) -> Result<()> {
    let json = to_json(entries)?;
    std::fs::write(path, json + "\n").map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Exported {} positions to {}", entries.len(), path.display());
    Ok(())
}
