//! Chunk discovery and timeframe planning over an archive directory of monthly dumps.

use crate::config::SearchMode;
use crate::date::{months_between, YearMonth};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One monthly archive file (`RC_YYYY-MM.zst` or `RS_YYYY-MM.zst`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub ym: YearMonth,
    pub path: PathBuf,
}

impl Chunk {
    /// File name of the chunk; also the identity used to seed sampling.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.ym.to_string())
    }
}

/// All chunks of the given kind found directly under `dir`, keyed by month.
pub fn discover_chunks(dir: &Path, mode: SearchMode) -> BTreeMap<YearMonth, PathBuf> {
    let mut map = BTreeMap::new();
    if !dir.exists() {
        return map;
    }
    for ent in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().flatten() {
        let Some(name) = ent.file_name().to_str() else { continue };
        if let Some(ym) = YearMonth::from_chunk_name(name, mode.file_prefix()) {
            map.insert(ym, ent.path().to_path_buf());
        }
    }
    map
}

/// Build the ordered list of chunks to process.
///
/// Open ends of the range clamp to what exists on disk; months inside the range
/// with no file are skipped silently. With `reverse`, the newest chunk comes first.
pub fn establish_timeframe(
    dir: &Path,
    mode: SearchMode,
    from: Option<YearMonth>,
    to: Option<YearMonth>,
    reverse: bool,
) -> Vec<Chunk> {
    let map = discover_chunks(dir, mode);
    let (Some(first), Some(last)) = (map.keys().next().copied(), map.keys().next_back().copied()) else {
        return Vec::new();
    };
    let lo = from.unwrap_or(first);
    let hi = to.unwrap_or(last);

    months_between(lo, hi, reverse)
        .filter_map(|ym| map.get(&ym).map(|p| Chunk { ym, path: p.clone() }))
        .collect()
}
