//! Window Decomposer: fixed-size contiguous slices of each inner path, emitted
//! as flat records with four comment columns.
//!
//! Output order is part of the contract: paths in extractor order, then
//! window size ascending, then start offset ascending. The parallel variant
//! collects per-path results in path order, so it produces the same sequence.

use crate::paths::InnerPath;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

/// Number of `commentN` columns in the output table.
pub const MAX_WINDOW: usize = 4;
pub const DEFAULT_WINDOW_SIZES: [usize; 3] = [2, 3, 4];

/// One output row. Unused trailing `commentN` fields are `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Window {
    pub id: String,
    pub length: usize,
    pub comment0: Option<String>,
    pub comment1: Option<String>,
    pub comment2: Option<String>,
    pub comment3: Option<String>,
}

impl Window {
    /// `slice` must hold between 1 and `MAX_WINDOW` ids.
    pub fn from_slice(slice: &[String]) -> Self {
        debug_assert!(!slice.is_empty() && slice.len() <= MAX_WINDOW);
        let first = slice.first().map(String::as_str).unwrap_or_default();
        let last = slice.last().map(String::as_str).unwrap_or_default();
        let at = |i: usize| slice.get(i).cloned();
        Self {
            id: format!("{first}-{last}"),
            length: slice.len(),
            comment0: at(0),
            comment1: at(1),
            comment2: at(2),
            comment3: at(3),
        }
    }

    /// Present comment ids in order.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        [&self.comment0, &self.comment1, &self.comment2, &self.comment3]
            .into_iter()
            .filter_map(|c| c.as_deref())
    }
}

/// Windows emitted for a path of `len` ids: the sum over sizes of `max(0, len - w + 1)`,
/// counting only sizes `1..=MAX_WINDOW`.
pub fn window_count(len: usize, sizes: &[usize]) -> usize {
    sizes
        .iter()
        .filter(|&&w| w > 0 && w <= MAX_WINDOW && w <= len)
        .map(|&w| len - w + 1)
        .sum()
}

/// All windows of one path. Sizes are taken in the given order; sizes larger
/// than the path contribute nothing, and sizes outside `1..=MAX_WINDOW` are skipped.
pub fn decompose(path: &[String], sizes: &[usize]) -> Vec<Window> {
    let mut out = Vec::with_capacity(window_count(path.len(), sizes));
    for &w in sizes {
        if w == 0 || w > MAX_WINDOW || w > path.len() {
            continue;
        }
        out.extend(path.windows(w).map(Window::from_slice));
    }
    out
}

/// Decompose every path, optionally across the rayon pool, keeping path order.
pub fn decompose_all(
    paths: &[InnerPath],
    sizes: &[usize],
    parallel: bool,
    pb: Option<&ProgressBar>,
) -> Vec<Window> {
    let one = |p: &InnerPath| {
        let w = decompose(p, sizes);
        if let Some(pb) = pb {
            pb.inc(1);
        }
        w
    };
    let per_path: Vec<Vec<Window>> = if parallel {
        paths.par_iter().map(one).collect()
    } else {
        paths.iter().map(one).collect()
    };
    per_path.into_iter().flatten().collect()
}
