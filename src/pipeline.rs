use crate::config::{ExtractOptions, SearchMode};
use crate::counting::SubredditStats;
use crate::date::YearMonth;
use crate::driver::{process_chunk, process_chunk_to_files, ChunkReport, ChunkSettings};
use crate::matcher::SpanMatcher;
use crate::paths::{establish_timeframe, Chunk};
use crate::progress::{make_progress_bar_labeled, total_compressed_size};
use crate::relevance::RelevancePolicy;
use crate::row::RowWriter;
use crate::sampling::get_sample_plan;
use crate::util::{default_bot_authors, init_tracing_once, is_empty_file, merge_extra_exclusions};
use crate::zstd_jsonl::RecordSource;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fluent entry point over `ExtractOptions`.
#[derive(Clone, Debug, Default)]
pub struct Otacon {
    pub(crate) opts: ExtractOptions,
}

/// Per-chunk outcome, in processing order.
#[derive(Clone, Debug)]
pub struct ChunkSummary {
    pub ym: YearMonth,
    pub path: PathBuf,
    pub relevant: u64,
    pub primary_rows: u64,
    pub review_rows: u64,
    pub skipped: u64,
    pub malformed: u64,
    pub stopped_early: bool,
}

/// Whole-run outcome: per-chunk summaries plus merged subreddit stats.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub chunks: Vec<ChunkSummary>,
    pub stats: SubredditStats,
}

impl RunSummary {
    pub fn relevant(&self) -> u64 {
        self.chunks.iter().map(|c| c.relevant).sum()
    }
    pub fn primary_rows(&self) -> u64 {
        self.chunks.iter().map(|c| c.primary_rows).sum()
    }
    pub fn review_rows(&self) -> u64 {
        self.chunks.iter().map(|c| c.review_rows).sum()
    }
    pub fn skipped(&self) -> u64 {
        self.chunks.iter().map(|c| c.skipped).sum()
    }
}

impl Otacon {
    pub fn new() -> Self {
        Self { opts: ExtractOptions::default() }
    }

    pub fn from_options(opts: ExtractOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn input_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input_dir(dir); self }
    pub fn output(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output(path); self }
    pub fn review_output(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_review_output(path); self }
    pub fn mode(mut self, mode: SearchMode) -> Self { self.opts = self.opts.with_mode(mode); self }
    pub fn timeframe(mut self, from: Option<YearMonth>, to: Option<YearMonth>) -> Self { self.opts = self.opts.with_timeframe(from, to); self }
    pub fn reverse_order(mut self, yes: bool) -> Self { self.opts = self.opts.with_reverse_order(yes); self }
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self { self.opts = self.opts.with_pattern(pattern); self }
    pub fn include_quoted(mut self, yes: bool) -> Self { self.opts = self.opts.with_include_quoted(yes); self }
    pub fn popularity(mut self, threshold: i64) -> Self { self.opts = self.opts.with_popularity_threshold(threshold); self }
    pub fn dont_filter(mut self, yes: bool) -> Self { self.opts = self.opts.with_dont_filter(yes); self }
    pub fn relevance(mut self, policy: RelevancePolicy) -> Self { self.opts = self.opts.with_relevance(policy); self }
    pub fn sample(mut self, k: usize) -> Self { self.opts = self.opts.with_sample(k); self }
    pub fn count_only(mut self, yes: bool) -> Self { self.opts = self.opts.with_count_only(yes); self }
    pub fn return_all(mut self, yes: bool) -> Self { self.opts = self.opts.with_return_all(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }
    pub fn timestamps_human_readable(mut self, yes: bool) -> Self { self.opts = self.opts.with_human_timestamps(yes); self }

    /// Exclude a default set of bot accounts plus any env/file augments.
    pub fn exclude_common_bots(mut self) -> Self {
        let mut v = default_bot_authors();
        if let Some(existing) = self.opts.relevance.authors_out.take() {
            v.extend(existing);
        }
        merge_extra_exclusions(&mut v);
        self.opts.relevance.authors_out = Some(v);
        self
    }

    /// Process every chunk of the timeframe in order. In count-only mode no file
    /// is opened and the summary carries the per-chunk relevant counts.
    pub fn run(self) -> Result<RunSummary> {
        init_tracing_once();
        let opts = &self.opts;

        let matcher = opts
            .pattern
            .as_deref()
            .map(|p| SpanMatcher::new(p, opts.include_quoted))
            .transpose()?;

        let chunks = establish_timeframe(&opts.input_dir, opts.mode, opts.from, opts.to, opts.reverse_order);
        let (Some(first), Some(last)) = (chunks.first(), chunks.last()) else {
            tracing::warn!("No archive files found for the timeframe. Check the input dir and dates.");
            return Ok(RunSummary::default());
        };
        tracing::info!("Searching from {} to {}", first.name(), last.name());

        let paths = if opts.count_only {
            None
        } else {
            Some(prepare_outputs(opts)?)
        };

        let settings = ChunkSettings {
            mode: opts.mode,
            matcher: matcher.as_ref(),
            relevance: &opts.relevance,
            popularity_threshold: opts.popularity_threshold,
            dont_filter: opts.dont_filter,
            return_all: opts.return_all,
            human_timestamps: opts.human_readable_timestamps,
        };

        let pb = opts
            .progress
            .then(|| make_progress_bar_labeled(total_compressed_size(&chunks), Some("Searching")));

        let mut summary = RunSummary::default();
        for chunk in &chunks {
            tracing::info!("Processing {:#}", chunk.ym);
            let (report, malformed) = run_one(chunk, opts, &settings, paths.as_ref(), pb.clone())
                .with_context(|| format!("processing {}", chunk.path.display()))?;

            if opts.count_only {
                tracing::info!("{} relevant records in {}", report.relevant, chunk.ym);
            }
            summary.chunks.push(ChunkSummary {
                ym: chunk.ym,
                path: chunk.path.clone(),
                relevant: report.relevant,
                primary_rows: report.primary_rows,
                review_rows: report.review_rows,
                skipped: report.skipped,
                malformed,
                stopped_early: report.stopped_early,
            });
            summary.stats.merge(report.stats);
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }
        tracing::info!(
            relevant = summary.relevant(),
            primary = summary.primary_rows(),
            review = summary.review_rows(),
            skipped = summary.skipped(),
            "Search finished"
        );
        Ok(summary)
    }

    /// Count-only run; relevant records per month.
    pub fn count_by_month(self) -> Result<BTreeMap<YearMonth, u64>> {
        let summary = self.count_only(true).run()?;
        let mut m = BTreeMap::new();
        for c in summary.chunks {
            *m.entry(c.ym).or_insert(0) += c.relevant;
        }
        Ok(m)
    }
}

/// Absolute primary/review paths; header row written once into empty CSV files.
fn prepare_outputs(opts: &ExtractOptions) -> Result<(PathBuf, PathBuf)> {
    let primary = absolutize(&opts.output)?;
    let review = absolutize(&opts.review_path())?;

    if !opts.return_all {
        for path in [&primary, &review] {
            if is_empty_file(path) {
                let mut w = RowWriter::append_csv(path, opts.write_buffer_bytes)
                    .with_context(|| format!("open {}", path.display()))?;
                w.write_header()?;
                w.finish()?;
            }
        }
    }
    Ok((primary, review))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn run_one(
    chunk: &Chunk,
    opts: &ExtractOptions,
    settings: &ChunkSettings<'_>,
    paths: Option<&(PathBuf, PathBuf)>,
    pb: Option<indicatif::ProgressBar>,
) -> Result<(ChunkReport, u64)> {
    let plan = match opts.sample {
        Some(k) => Some(get_sample_plan(chunk, k, &opts.input_dir, opts.read_buffer_bytes)?),
        None => None,
    };

    let mut source = RecordSource::open(&chunk.path, opts.read_buffer_bytes, pb)?;
    let report = match paths {
        None => process_chunk(&mut source, settings, plan, None)?,
        Some((primary, review)) => {
            process_chunk_to_files(&mut source, settings, plan, primary, review, opts.write_buffer_bytes)?
        }
    };
    Ok((report, source.malformed()))
}
