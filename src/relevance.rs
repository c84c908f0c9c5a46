//! Coarse relevance predicate, evaluated before any popularity or output work.

use crate::record::Record;

/// Broad inclusion criteria. Lists are matched case-insensitively
/// (stored normalized lowercase, sorted for binary search).
#[derive(Clone, Debug)]
pub struct RelevancePolicy {
    pub subreddits: Option<Vec<String>>,
    pub authors_out: Option<Vec<String>>,
    pub filter_pseudo_users: bool, // drop [deleted]/[removed]; default true
    pub filter_removed_text: bool, // drop bodies that are "[deleted]"/"[removed]"; default true
    pub min_text_chars: usize,
}

impl Default for RelevancePolicy {
    fn default() -> Self {
        Self {
            subreddits: None,
            authors_out: None,
            filter_pseudo_users: true,
            filter_removed_text: true,
            min_text_chars: 0,
        }
    }
}

impl RelevancePolicy {
    /// Accept every record.
    pub fn allow_all() -> Self {
        Self { filter_pseudo_users: false, filter_removed_text: false, ..Default::default() }
    }

    pub fn with_subreddits<I, S>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.subreddits = Some(iter.into_iter().map(|s| normalize_str(s.as_ref())).collect());
        self.normalize()
    }

    pub fn with_authors_out<I, S>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.authors_out = Some(iter.into_iter().map(|s| normalize_str(s.as_ref())).collect());
        self.normalize()
    }

    pub fn with_min_text_chars(mut self, n: usize) -> Self {
        self.min_text_chars = n;
        self
    }

    pub fn allow_pseudo_users(mut self) -> Self {
        self.filter_pseudo_users = false;
        self
    }

    /// Normalize to lowercase, then sort + dedup for binary_search-based checks.
    pub fn normalize(mut self) -> Self {
        for list in [&mut self.subreddits, &mut self.authors_out].into_iter().flatten() {
            for s in list.iter_mut() {
                *s = normalize_str(s);
            }
            list.retain(|s| !s.is_empty());
            list.sort();
            list.dedup();
        }
        self
    }
}

#[inline]
pub fn normalize_str(s: &str) -> String {
    let s = s.trim().to_lowercase();
    match s.strip_prefix("r/").or_else(|| s.strip_prefix("u/")) {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

fn is_pseudo(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s == "[deleted]" || s == "[removed]"
}

/// Pure predicate. Checks run from least to most likely to pass, so the common
/// reject exits early: subreddit allow-list, pseudo users, author deny-list,
/// removed bodies, then minimum text length.
pub fn relevant(record: &Record, policy: &RelevancePolicy) -> bool {
    if let Some(subs) = &policy.subreddits {
        if subs.binary_search(&record.subreddit.to_lowercase()).is_err() {
            return false;
        }
    }
    if policy.filter_pseudo_users && is_pseudo(&record.author) {
        return false;
    }
    if let Some(deny) = &policy.authors_out {
        if deny.binary_search(&record.author.to_lowercase()).is_ok() {
            return false;
        }
    }
    if policy.filter_removed_text && is_pseudo(&record.text) {
        return false;
    }
    if policy.min_text_chars > 0 && record.text.chars().count() < policy.min_text_chars {
        return false;
    }
    true
}
