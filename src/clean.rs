//! Free-text cleaning for scraped comment bodies, plus a table pass that fills
//! a `body` column from the raw `text` column.

use crate::error::ThreadError;
use crate::table::{open_table, TableFile, TableSink};
use crate::util::{remove_with_backoff, replace_file_atomic_backoff, tmp_path_for};
use anyhow::{Context, Result};
use pulldown_cmark::{Event, Parser};
use regex::Regex;
use std::io::Read;
use std::sync::OnceLock;

pub const TEXT_FIELD: &str = "text";
pub const BODY_FIELD: &str = "body";

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(http|ftp|https)://([\w_-]+(?:(?:\.[\w_-]+)+))([\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-])")
            .expect("url pattern compiles")
    })
}

/// Full cleaning chain, in order: quotes, removal markers, edit markers,
/// zero-width spaces, markdown, URLs.
pub fn clean_text(text: &str) -> String {
    let s = remove_quotes(text);
    let s = s.replace("[removed]", "").replace("[deleted]", "");
    let s = s.replace("Edit:", "");
    let s = s.replace("&#x200B;", "");
    let s = strip_markdown(&s);
    remove_urls(&s)
}

/// Drop `>` quote lines and join what is left with single spaces.
pub fn remove_quotes(text: &str) -> String {
    text.lines().filter(|l| !l.starts_with('>')).collect::<Vec<_>>().join(" ")
}

/// Render markdown to its text content: each run of text between markup is
/// trimmed, empty runs are skipped, and the rest joined with spaces.
pub fn strip_markdown(text: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut run = String::new();
    let flush = |run: &mut String, pieces: &mut Vec<String>| {
        let t = run.trim();
        if !t.is_empty() {
            pieces.push(t.to_string());
        }
        run.clear();
    };
    for ev in Parser::new(text) {
        match ev {
            Event::Text(t) | Event::Code(t) => run.push_str(&t),
            Event::SoftBreak => run.push('\n'),
            Event::HardBreak | Event::Rule | Event::Start(_) | Event::End(_) => flush(&mut run, &mut pieces),
            _ => {}
        }
    }
    flush(&mut run, &mut pieces);
    pieces.join(" ")
}

pub fn remove_urls(text: &str) -> String {
    url_regex().replace_all(text, "").into_owned()
}

/// Rewrite a CSV comment table with a cleaned `body` column. All other columns
/// keep their position; `body` is replaced in place or appended. Returns rows written.
pub fn clean_table(input: &TableFile, output: &TableFile, read_buf: usize, write_buf: usize) -> Result<u64> {
    let r = open_table(input, read_buf)?;
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(r);
    let mut headers = rdr
        .headers()
        .with_context(|| format!("reading header of {}", input.path.display()))?
        .clone();
    let text_idx = headers
        .iter()
        .position(|h| h == TEXT_FIELD)
        .ok_or_else(|| ThreadError::missing(0, TEXT_FIELD))?;
    let body_idx = match headers.iter().position(|h| h == BODY_FIELD) {
        Some(i) => i,
        None => {
            headers.push_field(BODY_FIELD);
            headers.len() - 1
        }
    };

    let tmp = tmp_path_for(&output.path);
    let sink = TableSink::create(&tmp, output.compressed, write_buf)?;
    let mut w = csv::Writer::from_writer(sink);
    let n = match write_cleaned_rows(&mut rdr, &mut w, &headers, text_idx, body_idx) {
        Ok(n) => n,
        Err(e) => {
            drop(w);
            remove_with_backoff(&tmp, 16, 50)?;
            return Err(e).with_context(|| format!("cleaning {}", input.path.display()));
        }
    };

    let sink = w.into_inner().map_err(|e| e.into_error())?;
    sink.finish().with_context(|| format!("flush {}", tmp.display()))?;
    replace_file_atomic_backoff(&tmp, &output.path)?;
    tracing::info!(input = %input.path.display(), output = %output.path.display(), rows = n, "cleaned comment text");
    Ok(n)
}

fn write_cleaned_rows<R: Read>(
    rdr: &mut csv::Reader<R>,
    w: &mut csv::Writer<TableSink>,
    headers: &csv::StringRecord,
    text_idx: usize,
    body_idx: usize,
) -> Result<u64> {
    w.write_record(headers)?;
    let mut n = 0u64;
    for (i, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| ThreadError::invalid(i + 1, "record", e.to_string()))?;
        let cleaned = clean_text(row.get(text_idx).unwrap_or_default());
        let mut fields: Vec<&str> = row.iter().collect();
        if body_idx < fields.len() {
            fields[body_idx] = &cleaned;
        } else {
            fields.push(&cleaned);
        }
        w.write_record(&fields)?;
        n += 1;
    }
    Ok(n)
}
