//! Input rows and the load-time enrichment that turns them into plot points.
//!
//! Enrichment is a pure transform: every accepted row becomes an immutable
//! [`DataPoint`] carrying its ordinal index and -log10 p-value. Rows that
//! would produce an undefined logarithm are rejected and reported instead of
//! being plotted at `NaN`.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::Result;

/// Default marker color for rows that do not name one.
pub const DEFAULT_POINT_COLOR: &str = "grey";

/// One row of input as supplied by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default, rename = "pValue", alias = "p_val")]
    pub p_value: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub annotated: bool,
    /// Remaining fields, in input order, shown in annotation text.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    /// Convenience constructor for a record without extra fields.
    pub fn new(id: impl Into<String>, p_value: f64) -> Self {
        Self {
            id: id.into(),
            p_value: Some(p_value),
            color: None,
            annotated: false,
            extra: Map::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn annotated(mut self, annotated: bool) -> Self {
        self.annotated = annotated;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// A plotted point. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub id: String,
    pub p_value: f64,
    pub neg_log10_p: f64,
    /// Ordinal position among accepted rows (0-based).
    pub index: usize,
    pub color: String,
    /// Whether the point starts out annotated.
    pub annotated: bool,
    /// Extra display fields rendered to text, in input order.
    pub extra: Vec<(String, String)>,
}

/// Why a row was not plotted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    #[error("missing p-value")]
    MissingPValue,
    #[error("p-value {0} is not a finite number")]
    NotFinite(f64),
    #[error("p-value {0} must be greater than zero")]
    NonPositive(f64),
    #[error("p-value {0} is greater than one")]
    AboveOne(f64),
    #[error("duplicate id")]
    DuplicateId,
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// A rejected input row.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Position of the row in the input.
    pub row: usize,
    pub id: String,
    pub reason: PointError,
}

/// Result of [`prepare_points`] and [`prepare_points_json`].
#[derive(Debug, Clone, Default)]
pub struct PreparedData {
    pub points: Vec<DataPoint>,
    pub rejected: Vec<RejectedRow>,
}

/// Largest -log10 p-value among `points`.
pub fn max_neg_log10_p(points: &[DataPoint]) -> Option<f64> {
    points
        .iter()
        .map(|p| p.neg_log10_p)
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

fn validate_p_value(p: Option<f64>) -> std::result::Result<f64, PointError> {
    match p {
        None => Err(PointError::MissingPValue),
        Some(p) if !p.is_finite() => Err(PointError::NotFinite(p)),
        Some(p) if p <= 0.0 => Err(PointError::NonPositive(p)),
        Some(p) if p > 1.0 => Err(PointError::AboveOne(p)),
        Some(p) => Ok(p),
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Accumulates accepted points and rejected rows in input order.
#[derive(Default)]
struct Preparer {
    out: PreparedData,
    seen: HashSet<String>,
}

impl Preparer {
    fn reject(&mut self, row: usize, id: String, reason: PointError) {
        tracing::warn!(row, id = %id, %reason, "skipping malformed row");
        self.out.rejected.push(RejectedRow { row, id, reason });
    }

    fn push(&mut self, row: usize, rec: RawRecord) {
        let checked = validate_p_value(rec.p_value).and_then(|p| {
            if self.seen.contains(&rec.id) {
                Err(PointError::DuplicateId)
            } else {
                Ok(p)
            }
        });
        let p = match checked {
            Ok(p) => p,
            Err(reason) => return self.reject(row, rec.id, reason),
        };
        self.seen.insert(rec.id.clone());
        let extra = rec
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), display_value(v)))
            .collect();
        self.out.points.push(DataPoint {
            index: self.out.points.len(),
            neg_log10_p: -p.log10(),
            p_value: p,
            color: rec.color.unwrap_or_else(|| DEFAULT_POINT_COLOR.to_string()),
            annotated: rec.annotated,
            id: rec.id,
            extra,
        });
    }
}

/// Validate and enrich raw rows. Rejected rows are logged and returned alongside the points.
pub fn prepare_points(records: Vec<RawRecord>) -> PreparedData {
    let mut prep = Preparer::default();
    for (row, rec) in records.into_iter().enumerate() {
        prep.push(row, rec);
    }
    prep.out
}

/// Parse a JSON array of records and enrich it.
///
/// Only a document that is not an array fails. A row whose fields have the
/// wrong type is rejected as [`PointError::Malformed`] and the rest still load.
pub fn prepare_points_json(s: &str) -> Result<PreparedData> {
    let rows: Vec<Value> = serde_json::from_str(s)?;
    let mut prep = Preparer::default();
    for (row, value) in rows.into_iter().enumerate() {
        let id = match value.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        match serde_json::from_value::<RawRecord>(value) {
            Ok(rec) => prep.push(row, rec),
            Err(e) => prep.reject(row, id, PointError::Malformed(e.to_string())),
        }
    }
    Ok(prep.out)
}
