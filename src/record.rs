//! Typed comment records and the column names they are read from.

use crate::error::ThreadError;
use serde_json::Value;

pub const ID_FIELD: &str = "comment_id";
pub const PARENT_FIELD: &str = "reply_to";
pub const DEPTH_FIELD: &str = "depth";

/// Reddit fullname prefixes: `t3_` replies to the submission, `t1_` to another comment.
const PARENT_PREFIXES: [&str; 2] = ["t3_", "t1_"];

/// One reply as read from the input table. Never mutated after reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentRecord {
    pub id: String,
    pub parent_id: String,
    pub depth: u32,
    /// Depth as written in the table (`"03"`, `"3.0"`), for text ordering.
    pub depth_text: String,
}

impl CommentRecord {
    pub fn new(id: impl Into<String>, parent_id: impl AsRef<str>, depth: u32) -> Self {
        Self {
            id: id.into(),
            parent_id: normalize_parent(parent_id.as_ref()).to_string(),
            depth,
            depth_text: depth.to_string(),
        }
    }

    /// Validate raw column values for data row `row` (1-based).
    /// Empty values count as missing.
    pub fn from_fields(
        row: usize,
        id: Option<&str>,
        reply_to: Option<&str>,
        depth: Option<&str>,
    ) -> Result<Self, ThreadError> {
        let id = present(id).ok_or_else(|| ThreadError::missing(row, ID_FIELD))?;
        let reply_to = present(reply_to).ok_or_else(|| ThreadError::missing(row, PARENT_FIELD))?;
        let depth = present(depth).ok_or_else(|| ThreadError::missing(row, DEPTH_FIELD))?;
        let parsed = parse_depth(depth)
            .ok_or_else(|| ThreadError::invalid(row, DEPTH_FIELD, format!("is not a non-negative integer: {depth:?}")))?;
        Ok(Self { depth_text: depth.trim().to_string(), ..Self::new(id, reply_to, parsed) })
    }

    /// Extract a record from one parsed NDJSON object.
    pub fn from_json(row: usize, v: &Value) -> Result<Self, ThreadError> {
        let id = field_text(v, ID_FIELD);
        let reply_to = field_text(v, PARENT_FIELD);
        let depth = field_text(v, DEPTH_FIELD);
        Self::from_fields(row, id.as_deref(), reply_to.as_deref(), depth.as_deref())
    }
}

/// Strip one known fullname prefix, leaving the bare id.
pub fn normalize_parent(raw: &str) -> &str {
    PARENT_PREFIXES
        .iter()
        .find_map(|p| raw.strip_prefix(p))
        .unwrap_or(raw)
}

fn present(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.trim().is_empty())
}

fn parse_depth(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(d) = s.parse::<u32>() {
        return Some(d);
    }
    // Scrapers that round-trip through floats write "3.0".
    let f: f64 = s.parse().ok()?;
    if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Strings pass through; numbers are rendered. Anything else is treated as absent.
fn field_text(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
