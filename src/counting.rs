//! Small reducers: relevant-record counts per subreddit, with a merge step across chunks.

use std::collections::BTreeMap;

/// Per-subreddit tally of relevant records. Built per chunk, merged per run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubredditStats {
    counts: BTreeMap<String, u64>,
}

impl SubredditStats {
    pub fn record(&mut self, subreddit: &str) {
        *self.counts.entry(subreddit.to_lowercase()).or_insert(0) += 1;
    }

    pub fn merge(&mut self, part: SubredditStats) {
        for (k, v) in part.counts {
            *self.counts.entry(k).or_insert(0) += v;
        }
    }

    pub fn get(&self, subreddit: &str) -> u64 {
        self.counts.get(&subreddit.to_lowercase()).copied().unwrap_or(0)
    }

    /// Subreddits by descending count, ties alphabetical.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut v: Vec<_> = self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        v
    }
}
