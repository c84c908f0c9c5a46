//! Deterministic per-chunk sampling: which record indices to examine.

use crate::paths::Chunk;
use crate::zstd_jsonl::count_records;
use ahash::RandomState;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

const COUNT_CACHE_DIR: &str = ".otacon_counts";

/// Ascending, duplicate-free record indices for one chunk, consumed head-first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SamplePlan {
    indices: VecDeque<u64>,
}

impl SamplePlan {
    pub fn from_sorted(indices: Vec<u64>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self { indices: indices.into() }
    }

    pub fn head(&self) -> Option<u64> {
        self.indices.front().copied()
    }

    /// Remove the head if it equals `index`. Returns whether it did.
    pub fn take_if_head(&mut self, index: u64) -> bool {
        if self.head() == Some(index) {
            self.indices.pop_front();
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.indices.iter().copied()
    }
}

/// Stable seed for a chunk name; identical across runs.
pub fn chunk_seed(chunk_name: &str) -> u64 {
    let state = RandomState::with_seeds(
        0x0ac0_7a5e_ed5a_3b1e,
        0x5eed_0f0c_4a11_d0c5,
        0x1234_5678_9abc_def0,
        0x0fed_cba9_8765_4321,
    );
    state.hash_one(chunk_name)
}

/// Draw `min(k, total)` distinct indices uniformly from `0..total`, sorted ascending.
pub fn select_indices(seed: u64, total: u64, k: usize) -> Vec<u64> {
    let amount = (k as u64).min(total) as usize;
    if amount == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked: Vec<u64> = rand::seq::index::sample(&mut rng, total as usize, amount)
        .into_iter()
        .map(|i| i as u64)
        .collect();
    picked.sort_unstable();
    picked
}

fn count_cache_path(archive_root: &Path, chunk: &Chunk) -> PathBuf {
    archive_root.join(COUNT_CACHE_DIR).join(format!("{}.count", chunk.name()))
}

/// Record count for a chunk: cached under the archive root, or counted once by streaming.
pub fn chunk_record_count(chunk: &Chunk, archive_root: &Path, read_buf_bytes: usize) -> Result<u64> {
    let cache = count_cache_path(archive_root, chunk);
    if let Ok(s) = fs::read_to_string(&cache) {
        if let Ok(n) = s.trim().parse::<u64>() {
            return Ok(n);
        }
        tracing::warn!(path = %cache.display(), "ignoring unreadable record-count cache");
    }

    tracing::info!("Counting records in {} for sampling", chunk.name());
    let n = count_records(&chunk.path, read_buf_bytes)
        .with_context(|| format!("counting records in {}", chunk.path.display()))?;

    // A read-only archive just means we count again next time.
    let written = cache
        .parent()
        .map(fs::create_dir_all)
        .transpose()
        .and_then(|_| fs::write(&cache, n.to_string()));
    if let Err(e) = written {
        tracing::debug!(path = %cache.display(), error = %e, "could not cache record count");
    }
    Ok(n)
}

/// Sample plan of at most `k` indices for `chunk`, deterministic for the same chunk and `k`.
pub fn get_sample_plan(chunk: &Chunk, k: usize, archive_root: &Path, read_buf_bytes: usize) -> Result<SamplePlan> {
    let total = chunk_record_count(chunk, archive_root, read_buf_bytes)?;
    let indices = select_indices(chunk_seed(&chunk.name()), total, k);
    tracing::debug!("sampling {} of {} records from {}", indices.len(), total, chunk.name());
    Ok(SamplePlan::from_sorted(indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_consumes_head_only() {
        let mut plan = SamplePlan::from_sorted(vec![2, 5]);
        assert!(!plan.take_if_head(0));
        assert!(plan.take_if_head(2));
        assert!(!plan.take_if_head(2));
        assert_eq!(plan.head(), Some(5));
        assert!(plan.take_if_head(5));
        assert!(plan.is_empty());
    }

    #[test]
    fn oversize_request_takes_everything() {
        assert_eq!(select_indices(7, 4, 10), vec![0, 1, 2, 3]);
        assert!(select_indices(7, 0, 10).is_empty());
    }
}
