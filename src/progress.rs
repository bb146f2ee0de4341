//! Progress reporting: count-style bars for paths decomposed and files processed.

use indicatif::{ProgressBar, ProgressStyle};

/// Items processed out of `total`, with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         it/s: {per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Bar only when `enabled`; callers hold `Option<ProgressBar>` like the rest of the pipeline.
pub fn maybe_count_progress(enabled: bool, total: u64, label: &str) -> Option<ProgressBar> {
    enabled.then(|| make_count_progress(total, label))
}

pub fn finish_progress(pb: Option<ProgressBar>, label: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(format!("{label} done"));
    }
}
