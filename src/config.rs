use crate::date::YearMonth;
use crate::relevance::RelevancePolicy;
use std::path::{Path, PathBuf};

/// Which half of the archive is searched, and which text field is matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Comments,
    Posts,
}

impl SearchMode {
    /// Monthly file prefix: `RC` (comments) or `RS` (submissions).
    pub fn file_prefix(self) -> &'static str {
        match self {
            SearchMode::Comments => "RC",
            SearchMode::Posts => "RS",
        }
    }

    /// JSON field holding the searchable text.
    pub fn text_field(self) -> &'static str {
        match self {
            SearchMode::Comments => "body",
            SearchMode::Posts => "selftext",
        }
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub review_output: Option<PathBuf>, // None: derived from `output`
    pub mode: SearchMode,
    pub from: Option<YearMonth>,        // inclusive
    pub to: Option<YearMonth>,          // inclusive
    pub reverse_order: bool,

    pub pattern: Option<String>,
    pub include_quoted: bool,
    pub popularity_threshold: Option<i64>, // None disables the popularity filter
    pub dont_filter: bool,
    pub relevance: RelevancePolicy,

    pub sample: Option<usize>,
    pub count_only: bool,
    pub return_all: bool,

    pub progress: bool,
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
    pub human_readable_timestamps: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./pushshift"),
            output: PathBuf::from("./otacon_out.csv"),
            review_output: None,
            mode: SearchMode::Comments,
            from: None,
            to: None,
            reverse_order: false,
            pattern: None,
            include_quoted: false,
            popularity_threshold: None,
            dont_filter: false,
            relevance: RelevancePolicy::default(),
            sample: None,
            count_only: false,
            return_all: false,
            progress: false,
            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 64 * 1024,
            human_readable_timestamps: false,
        }
    }
}

impl ExtractOptions {
    pub fn with_input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.input_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_output(mut self, path: impl AsRef<Path>) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }
    pub fn with_review_output(mut self, path: impl AsRef<Path>) -> Self {
        self.review_output = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
    pub fn with_timeframe(mut self, from: Option<YearMonth>, to: Option<YearMonth>) -> Self {
        self.from = from;
        self.to = to;
        self
    }
    pub fn with_reverse_order(mut self, yes: bool) -> Self {
        self.reverse_order = yes;
        self
    }
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
    pub fn with_include_quoted(mut self, yes: bool) -> Self {
        self.include_quoted = yes;
        self
    }
    pub fn with_popularity_threshold(mut self, threshold: i64) -> Self {
        self.popularity_threshold = Some(threshold);
        self
    }
    pub fn with_dont_filter(mut self, yes: bool) -> Self {
        self.dont_filter = yes;
        self
    }
    pub fn with_relevance(mut self, policy: RelevancePolicy) -> Self {
        self.relevance = policy.normalize();
        self
    }
    pub fn with_sample(mut self, k: usize) -> Self {
        self.sample = Some(k);
        self
    }
    pub fn with_count_only(mut self, yes: bool) -> Self {
        self.count_only = yes;
        self
    }
    pub fn with_return_all(mut self, yes: bool) -> Self {
        self.return_all = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
    pub fn with_human_timestamps(mut self, yes: bool) -> Self {
        self.human_readable_timestamps = yes;
        self
    }

    /// Review stream path: explicit, or `<stem>_review.<ext>` next to the primary output.
    pub fn review_path(&self) -> PathBuf {
        if let Some(p) = &self.review_output {
            return p.clone();
        }
        let stem = self.output.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "otacon_out".into());
        let name = match self.output.extension() {
            Some(ext) => format!("{}_review.{}", stem, ext.to_string_lossy()),
            None => format!("{}_review", stem),
        };
        self.output.with_file_name(name)
    }
}
