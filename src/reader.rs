//! Record Reader: turns a comment table into `CommentRecord`s, failing on the
//! first malformed row. Extra columns are ignored.

use crate::error::ThreadError;
use crate::record::CommentRecord;
use crate::table::{open_table, TableFile, TableFormat};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;

/// Only the columns the tree needs; csv maps them by header name.
#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(default)]
    comment_id: Option<String>,
    #[serde(default)]
    reply_to: Option<String>,
    #[serde(default)]
    depth: Option<String>,
}

pub fn read_records(table: &TableFile, buf_bytes: usize) -> Result<Vec<CommentRecord>> {
    let r = open_table(table, buf_bytes)?;
    let records = match table.format {
        TableFormat::Csv => parse_csv(r),
        TableFormat::Jsonl => parse_jsonl(r),
    }
    .with_context(|| format!("reading {}", table.path.display()))?;
    tracing::debug!(path = %table.path.display(), records = records.len(), "read comment table");
    Ok(records)
}

/// Parse CSV with a header row.
pub fn parse_csv<R: std::io::Read>(r: R) -> Result<Vec<CommentRecord>, ThreadError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(r);
    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let n = i + 1;
        let row = row.map_err(|e| ThreadError::invalid(n, "record", e.to_string()))?;
        out.push(CommentRecord::from_fields(
            n,
            row.comment_id.as_deref(),
            row.reply_to.as_deref(),
            row.depth.as_deref(),
        )?);
    }
    Ok(out)
}

/// Parse NDJSON, one object per line. Blank lines are skipped and not counted as rows.
pub fn parse_jsonl<R: BufRead>(mut r: R) -> Result<Vec<CommentRecord>, ThreadError> {
    let mut out = Vec::new();
    let mut buf = String::with_capacity(16 * 1024);
    let mut n = 0usize;
    loop {
        buf.clear();
        let read = r
            .read_line(&mut buf)
            .map_err(|e| ThreadError::invalid(n + 1, "record", e.to_string()))?;
        if read == 0 {
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        n += 1;
        let v: Value = serde_json::from_str(line).map_err(|e| ThreadError::invalid(n, "record", e.to_string()))?;
        out.push(CommentRecord::from_json(n, &v)?);
    }
    Ok(out)
}
