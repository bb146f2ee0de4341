use crate::clean::clean_table;
use crate::config::PathOptions;
use crate::error::ThreadError;
use crate::paths::{inner_paths, InnerPath};
use crate::progress::{finish_progress, maybe_count_progress};
use crate::reader::read_records;
use crate::record::CommentRecord;
use crate::table::{discover_tables, TableFile, TableFormat};
use crate::tree::{build_tree, sort_by_depth, DepthOrder};
use crate::util::{apply_parallelism, init_tracing_once};
use crate::window::{decompose_all, Window};
use crate::writer::write_windows;
use ahash::AHashMap;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct ThreadPaths {
    pub(crate) opts: PathOptions,
}

/// Everything derived from one thread's records. The tree itself is dropped
/// once paths are extracted.
#[derive(Clone, Debug)]
pub struct Decomposition {
    pub root: String,
    pub records: usize,
    pub nodes: usize,
    pub orphans: Vec<CommentRecord>,
    pub paths: Vec<InnerPath>,
    pub windows: Vec<Window>,
}

impl Decomposition {
    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }
}

/// Operator-facing counts for one processed table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub records: usize,
    pub nodes: usize,
    pub orphans: usize,
    pub paths: usize,
    pub windows: usize,
}

/// Outcome of a directory run: per-file summaries and per-file failures,
/// both sorted by input path.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub summaries: Vec<RunSummary>,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total_orphans(&self) -> usize {
        self.summaries.iter().map(|s| s.orphans).sum()
    }
    pub fn total_windows(&self) -> usize {
        self.summaries.iter().map(|s| s.windows).sum()
    }
}

impl Default for ThreadPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadPaths {
    pub fn new() -> Self {
        Self { opts: PathOptions::default() }
    }

    pub fn with_options(opts: PathOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &PathOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn depth_order(mut self, order: DepthOrder) -> Self { self.opts = self.opts.with_depth_order(order); self }
    pub fn window_sizes<I>(mut self, sizes: I) -> Self where I: IntoIterator<Item = usize> { self.opts = self.opts.with_window_sizes(sizes); self }
    pub fn min_path_len(mut self, n: usize) -> Self { self.opts = self.opts.with_min_path_len(n); self }
    pub fn trim_prefix(mut self, n: usize) -> Self { self.opts = self.opts.with_trim_prefix(n); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn parallel_windows(mut self, yes: bool) -> Self { self.opts = self.opts.with_parallel_windows(yes); self }
    pub fn format(mut self, format: TableFormat) -> Self { self.opts = self.opts.with_format(format); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    // -------- Operations --------

    /// Sort, build, extract, and window one thread's records in memory.
    pub fn decompose(&self, mut records: Vec<CommentRecord>) -> Result<Decomposition, ThreadError> {
        if records.is_empty() {
            return Err(ThreadError::EmptyInput);
        }
        sort_by_depth(&mut records, self.opts.depth_order);

        let build = build_tree(&records)?;
        let root = build.tree.root().to_string();
        let nodes = build.tree.node_count();
        let paths = inner_paths(&build.tree, self.opts.min_path_len, self.opts.trim_prefix);
        drop(build.tree);

        let label = self.opts.progress_label.as_deref().unwrap_or("Decomposing paths");
        let pb = maybe_count_progress(self.opts.progress, paths.len() as u64, label);
        let windows = decompose_all(&paths, &self.opts.window_sizes, self.opts.parallel_windows, pb.as_ref());
        finish_progress(pb, label);

        tracing::debug!(
            root = %root,
            records = records.len(),
            nodes,
            orphans = build.orphans.len(),
            paths = paths.len(),
            windows = windows.len(),
            "decomposed thread"
        );
        Ok(Decomposition { root, records: records.len(), nodes, orphans: build.orphans, paths, windows })
    }

    /// Read `input`, decompose it, and write the window table to `output`.
    /// Nothing is written when reading or building fails.
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        init_tracing_once();
        apply_parallelism(self.opts.parallelism);
        self.run_one(input, output)
    }

    fn run_one(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let in_table = TableFile::detect_or(input, TableFormat::Csv);
        let out_table = TableFile::detect_or(output, self.opts.format);

        let records = read_records(&in_table, self.opts.read_buffer_bytes)?;
        let d = self
            .decompose(records)
            .with_context(|| format!("decomposing {}", input.display()))?;

        if let Some(dir) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        write_windows(&out_table, &d.windows, self.opts.write_buffer_bytes)?;

        let summary = RunSummary {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            records: d.records,
            nodes: d.nodes,
            orphans: d.orphan_count(),
            paths: d.paths.len(),
            windows: d.windows.len(),
        };
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            records = summary.records,
            orphans = summary.orphans,
            paths = summary.paths,
            windows = summary.windows,
            "wrote windows"
        );
        Ok(summary)
    }

    /// Run every comment table directly inside `in_dir`, writing
    /// `<stem>_paths.<ext>` into `out_dir`. Tables sharing a stem (`t.csv`,
    /// `t.jsonl.zst`) are named by their full file name instead
    /// (`t.csv_paths.<ext>`). A failing table is reported and skipped; the
    /// others still complete.
    pub fn run_dir(&self, in_dir: &Path, out_dir: &Path) -> Result<BatchReport> {
        init_tracing_once();
        apply_parallelism(self.opts.parallelism);
        fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;

        let tables = discover_tables(in_dir);
        if tables.is_empty() {
            tracing::warn!(dir = %in_dir.display(), "no comment tables found");
        } else {
            tracing::info!("Planned {} tables for processing.", tables.len());
        }

        let label = self.opts.progress_label.as_deref().unwrap_or("Threads");
        let pb = maybe_count_progress(self.opts.progress, tables.len() as u64, label);
        // Per-file bars would fight the batch bar.
        let per_file = self.clone().progress(false);
        let ext = self.opts.format.extension();
        let names = output_names(&tables);

        let results: Vec<(PathBuf, Result<RunSummary>)> = tables
            .par_iter()
            .zip(names.par_iter())
            .map(|(t, name)| {
                let out = out_dir.join(format!("{name}_paths.{ext}"));
                let res = per_file.run_one(&t.path, &out);
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                (t.path.clone(), res)
            })
            .collect();
        finish_progress(pb, label);

        let mut report = BatchReport::default();
        for (path, res) in results {
            match res {
                Ok(s) => report.summaries.push(s),
                Err(e) => {
                    let msg = format!("{e:#}");
                    tracing::warn!(path = %path.display(), error = %msg, "skipping table");
                    report.failures.push((path, msg));
                }
            }
        }
        tracing::info!(
            tables = report.summaries.len(),
            failed = report.failures.len(),
            orphans = report.total_orphans(),
            windows = report.total_windows(),
            "batch done"
        );
        Ok(report)
    }

    /// Fill the `body` column of a CSV comment table with cleaned `text`.
    pub fn clean_table(&self, input: &Path, output: &Path) -> Result<u64> {
        init_tracing_once();
        let in_table = TableFile::detect_or(input, TableFormat::Csv);
        let out_table = TableFile::detect_or(output, TableFormat::Csv);
        if in_table.format != TableFormat::Csv || out_table.format != TableFormat::Csv {
            anyhow::bail!("text cleaning reads and writes CSV tables only");
        }
        clean_table(&in_table, &out_table, self.opts.read_buffer_bytes, self.opts.write_buffer_bytes)
    }
}

/// Output base name per table: the stem, or the whole file name when another
/// table in the batch has the same stem.
fn output_names(tables: &[TableFile]) -> Vec<String> {
    let mut seen: AHashMap<String, usize> = AHashMap::new();
    for t in tables {
        *seen.entry(t.stem()).or_default() += 1;
    }
    tables
        .iter()
        .map(|t| {
            let stem = t.stem();
            if seen.get(&stem).copied().unwrap_or(0) > 1 {
                t.path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .unwrap_or(stem)
            } else {
                stem
            }
        })
        .collect()
}
