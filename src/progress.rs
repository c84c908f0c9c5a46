//! Byte-based progress bar over the compressed size of the planned chunks.

use crate::paths::Chunk;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;

pub fn make_progress_bar_labeled(total_bytes: u64, label: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if let Some(msg) = label {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub fn total_compressed_size(chunks: &[Chunk]) -> u64 {
    chunks
        .iter()
        .map(|c| fs::metadata(&c.path).map(|m| m.len()).unwrap_or(0))
        .sum()
}
