//! Table files on disk: format detection by extension, directory discovery,
//! and buffered (optionally zstd-compressed) readers and writers.

use crate::util::{create_with_backoff, open_with_backoff};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zstd::stream::write::Encoder as ZstdEncoder;

/// Row encoding of a comment or window table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Jsonl,
}

impl TableFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Jsonl => "jsonl",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(TableFormat::Csv),
            "jsonl" | "ndjson" => Some(TableFormat::Jsonl),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableFile {
    pub path: PathBuf,
    pub format: TableFormat,
    pub compressed: bool, // trailing .zst
}

impl TableFile {
    /// Recognises `x.csv`, `x.jsonl`, `x.ndjson`, and each of those with `.zst` appended.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let (inner, compressed) = match name.strip_suffix(".zst") {
            Some(rest) => (rest, true),
            None => (name, false),
        };
        let ext = Path::new(inner).extension()?.to_str()?;
        let format = TableFormat::from_extension(ext)?;
        Some(Self { path: path.to_path_buf(), format, compressed })
    }

    /// Detect from the path, falling back to an uncompressed `fallback` table.
    pub fn detect_or(path: &Path, fallback: TableFormat) -> Self {
        Self::detect(path).unwrap_or_else(|| Self { path: path.to_path_buf(), format: fallback, compressed: false })
    }

    /// File name without the table extensions: `thread_1.csv.zst` -> `thread_1`.
    pub fn stem(&self) -> String {
        let name = self.path.file_name().and_then(|s| s.to_str()).unwrap_or("table");
        let name = name.strip_suffix(".zst").unwrap_or(name);
        Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name)
            .to_string()
    }
}

/// Tables directly inside `dir` (no recursion), sorted by path.
pub fn discover_tables(dir: &Path) -> Vec<TableFile> {
    let mut out = Vec::new();
    if !dir.exists() {
        return out;
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(t) = TableFile::detect(entry.path()) {
            out.push(t);
        }
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

/// Buffered reader over the decoded table bytes.
pub fn open_table(table: &TableFile, buf_bytes: usize) -> Result<Box<dyn BufRead>> {
    let f = open_with_backoff(&table.path, 16, 50).with_context(|| format!("open {}", table.path.display()))?;
    let cap = buf_bytes.max(8 * 1024);
    if table.compressed {
        let dec = zstd::stream::read::Decoder::new(f)
            .with_context(|| format!("zstd decoder for {}", table.path.display()))?;
        Ok(Box::new(BufReader::with_capacity(cap, dec)))
    } else {
        Ok(Box::new(BufReader::with_capacity(cap, f)))
    }
}

/// Output byte sink: plain buffered file, or a zstd stream that must be finished.
pub enum TableSink {
    Plain(BufWriter<File>),
    Zst(ZstdEncoder<'static, BufWriter<File>>),
}

impl TableSink {
    pub fn create(path: &Path, compressed: bool, buf_bytes: usize) -> Result<Self> {
        let f = create_with_backoff(path, 16, 50).with_context(|| format!("create {}", path.display()))?;
        let w = BufWriter::with_capacity(buf_bytes.max(8 * 1024), f);
        if compressed {
            Ok(TableSink::Zst(ZstdEncoder::new(w, 3)?))
        } else {
            Ok(TableSink::Plain(w))
        }
    }

    /// Flush everything, writing the zstd frame epilogue when compressed.
    pub fn finish(self) -> io::Result<()> {
        match self {
            TableSink::Plain(mut w) => w.flush(),
            TableSink::Zst(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for TableSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TableSink::Plain(w) => w.write(buf),
            TableSink::Zst(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TableSink::Plain(w) => w.flush(),
            TableSink::Zst(w) => w.flush(),
        }
    }
}
