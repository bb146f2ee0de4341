mod config;
mod error;
mod record;
mod table;
mod reader;
mod writer;

mod tree;
mod paths;
mod window;
mod pipeline;

mod clean;
mod progress;
mod util;

pub use crate::config::PathOptions;
pub use crate::error::ThreadError;
pub use crate::pipeline::{BatchReport, Decomposition, RunSummary, ThreadPaths};

// Engine stages, usable on in-memory records without touching disk.
pub use crate::record::{normalize_parent, CommentRecord};
pub use crate::tree::{build_tree, sort_by_depth, CommentTree, DepthOrder, TreeBuild};
pub use crate::paths::{inner_paths, paths_to_leaves, InnerPath, DEFAULT_MIN_PATH_LEN, DEFAULT_TRIM_PREFIX};
pub use crate::window::{decompose, decompose_all, window_count, Window, DEFAULT_WINDOW_SIZES, MAX_WINDOW};

// Table IO.
pub use crate::table::{discover_tables, TableFile, TableFormat};
pub use crate::reader::{parse_csv, parse_jsonl, read_records};
pub use crate::writer::{write_windows, WindowWriter, WINDOW_COLUMNS};

// Text cleaning.
pub use crate::clean::{clean_text, remove_quotes, remove_urls, strip_markdown};

pub use crate::util::{init_tracing_once, today_stamp};
