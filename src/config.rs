use crate::paths::{DEFAULT_MIN_PATH_LEN, DEFAULT_TRIM_PREFIX};
use crate::table::TableFormat;
use crate::tree::DepthOrder;
use crate::window::{DEFAULT_WINDOW_SIZES, MAX_WINDOW};

/// User-facing options with defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct PathOptions {
    pub depth_order: DepthOrder,
    pub window_sizes: Vec<usize>,     // ascending, deduped, within 1..=MAX_WINDOW
    pub min_path_len: usize,          // root-to-leaf ids required to keep a path
    pub trim_prefix: usize,           // ids dropped from the front of kept paths
    pub parallelism: Option<usize>,   // Some(N) to set rayon threads, None to use default
    pub parallel_windows: bool,       // decompose paths across the rayon pool
    pub format: TableFormat,          // output format when the path has no table extension
    pub progress: bool,
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            depth_order: DepthOrder::Numeric,
            window_sizes: DEFAULT_WINDOW_SIZES.to_vec(),
            min_path_len: DEFAULT_MIN_PATH_LEN,
            trim_prefix: DEFAULT_TRIM_PREFIX,
            parallelism: None,
            parallel_windows: true,
            format: TableFormat::Csv,
            progress: true,
            progress_label: None,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl PathOptions {
    pub fn with_depth_order(mut self, order: DepthOrder) -> Self {
        self.depth_order = order;
        self
    }
    /// Sizes outside `1..=MAX_WINDOW` are dropped; an empty result falls back to the defaults.
    pub fn with_window_sizes<I>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut v: Vec<usize> = sizes.into_iter().filter(|w| (1..=MAX_WINDOW).contains(w)).collect();
        v.sort_unstable();
        v.dedup();
        if v.is_empty() {
            v = DEFAULT_WINDOW_SIZES.to_vec();
        }
        self.window_sizes = v;
        self
    }
    pub fn with_min_path_len(mut self, n: usize) -> Self {
        self.min_path_len = n.max(1);
        self
    }
    pub fn with_trim_prefix(mut self, n: usize) -> Self {
        self.trim_prefix = n;
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_parallel_windows(mut self, yes: bool) -> Self {
        self.parallel_windows = yes;
        self
    }
    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = format;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    // IO buffers tuning
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
