//! Result Writer: window rows to CSV or NDJSON, written to a temp file and
//! promoted into place only once complete.

use crate::table::{TableFile, TableFormat, TableSink};
use crate::util::{remove_with_backoff, replace_file_atomic_backoff, tmp_path_for};
use crate::window::Window;
use anyhow::{Context, Result};
use std::io::Write;

/// Column order of the output table.
pub const WINDOW_COLUMNS: [&str; 6] = ["id", "length", "comment0", "comment1", "comment2", "comment3"];

enum Rows {
    Csv(csv::Writer<TableSink>),
    Jsonl(TableSink),
}

/// Streams windows into `table`'s temp sibling. Absent comments are empty in
/// CSV and `null` in NDJSON.
pub struct WindowWriter {
    table: TableFile,
    rows: Rows,
    written: u64,
}

impl WindowWriter {
    pub fn create(table: &TableFile, buf_bytes: usize) -> Result<Self> {
        let tmp = tmp_path_for(&table.path);
        let sink = TableSink::create(&tmp, table.compressed, buf_bytes)?;
        let rows = match table.format {
            TableFormat::Csv => {
                let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
                w.write_record(WINDOW_COLUMNS)?;
                Rows::Csv(w)
            }
            TableFormat::Jsonl => Rows::Jsonl(sink),
        };
        Ok(Self { table: table.clone(), rows, written: 0 })
    }

    pub fn write(&mut self, w: &Window) -> Result<()> {
        match &mut self.rows {
            Rows::Csv(csv) => csv.serialize(w)?,
            Rows::Jsonl(sink) => {
                serde_json::to_writer(&mut *sink, w)?;
                sink.write_all(b"\n")?;
            }
        }
        self.written += 1;
        Ok(())
    }

    /// Flush and move the temp file over the destination. Returns rows written.
    pub fn finish(self) -> Result<u64> {
        let tmp = tmp_path_for(&self.table.path);
        let sink = match self.rows {
            Rows::Csv(csv) => csv.into_inner().map_err(|e| e.into_error())?,
            Rows::Jsonl(sink) => sink,
        };
        sink.finish().with_context(|| format!("flush {}", tmp.display()))?;
        replace_file_atomic_backoff(&tmp, &self.table.path)?;
        Ok(self.written)
    }

    /// Drop the partial temp file.
    pub fn abandon(self) -> Result<()> {
        let tmp = tmp_path_for(&self.table.path);
        drop(self.rows);
        remove_with_backoff(&tmp, 16, 50)
    }
}

/// Write all windows to `table` in order.
pub fn write_windows(table: &TableFile, windows: &[Window], buf_bytes: usize) -> Result<u64> {
    let mut w = WindowWriter::create(table, buf_bytes)?;
    for win in windows {
        if let Err(e) = w.write(win) {
            w.abandon()?;
            return Err(e).with_context(|| format!("writing {}", table.path.display()));
        }
    }
    w.finish()
}
