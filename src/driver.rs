//! Per-chunk driver: sampling check, relevance, popularity routing, matching, emission.

use crate::config::SearchMode;
use crate::counting::SubredditStats;
use crate::error::ExtractError;
use crate::matcher::SpanMatcher;
use crate::popularity::{classify, FilterOutcome};
use crate::record::Record;
use crate::relevance::{relevant, RelevancePolicy};
use crate::row::{assemble, RowWriter};
use crate::sampling::SamplePlan;
use serde_json::{Map, Value};
use std::path::Path;

/// Everything the driver needs besides the records themselves.
#[derive(Clone, Copy, Debug)]
pub struct ChunkSettings<'a> {
    pub mode: SearchMode,
    pub matcher: Option<&'a SpanMatcher>,
    pub relevance: &'a RelevancePolicy,
    pub popularity_threshold: Option<i64>,
    pub dont_filter: bool,
    pub return_all: bool,
    pub human_timestamps: bool,
}

/// The two per-chunk output streams. Independent writers, never shared.
pub struct ChunkOutputs {
    pub primary: RowWriter,
    pub review: RowWriter,
}

impl ChunkOutputs {
    /// `json_lines` picks the format of both streams for the whole chunk.
    pub fn open(primary: &Path, review: &Path, write_buf: usize, json_lines: bool) -> Result<Self, ExtractError> {
        let open = if json_lines { RowWriter::append_json_lines } else { RowWriter::append_csv };
        Ok(Self { primary: open(primary, write_buf)?, review: open(review, write_buf)? })
    }

    /// Flush and close both streams; both are attempted even if the first fails.
    pub fn finish(self) -> Result<(), ExtractError> {
        let primary = self.primary.finish();
        let review = self.review.finish();
        primary?;
        review
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChunkReport {
    pub scanned: u64,
    pub relevant: u64,
    pub primary_rows: u64,
    pub review_rows: u64,
    pub skipped: u64,
    pub stopped_early: bool,
    pub stats: SubredditStats,
}

/// Scan one chunk's records. With `outputs == None` this is count-only mode:
/// nothing is written and only `relevant`/`stats` are filled in.
pub fn process_chunk<I>(
    records: I,
    settings: &ChunkSettings<'_>,
    mut plan: Option<SamplePlan>,
    mut outputs: Option<&mut ChunkOutputs>,
) -> Result<ChunkReport, ExtractError>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    let mut report = ChunkReport::default();
    if plan.as_ref().is_some_and(SamplePlan::is_empty) {
        report.stopped_early = true;
        return Ok(report);
    }

    for (index, obj) in (0u64..).zip(records) {
        report.scanned += 1;
        if let Some(plan) = plan.as_mut() {
            if !plan.take_if_head(index) {
                continue;
            }
        }

        handle_record(obj, settings, outputs.as_deref_mut(), &mut report)?;

        if plan.as_ref().is_some_and(SamplePlan::is_empty) {
            report.stopped_early = true;
            break;
        }
    }
    Ok(report)
}

fn handle_record(
    obj: Map<String, Value>,
    settings: &ChunkSettings<'_>,
    outputs: Option<&mut ChunkOutputs>,
    report: &mut ChunkReport,
) -> Result<(), ExtractError> {
    let record = match Record::from_json(obj, settings.mode) {
        Ok(r) => r,
        Err(ExtractError::MissingField { field }) => {
            tracing::warn!(field, "skipping record with missing field");
            report.skipped += 1;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if !settings.dont_filter && !relevant(&record, settings.relevance) {
        return Ok(());
    }
    report.relevant += 1;
    report.stats.record(&record.subreddit);

    let Some(out) = outputs else { return Ok(()) };

    if settings.return_all {
        out.primary.write_raw(&record)?;
        report.primary_rows += 1;
        return Ok(());
    }

    let outcome = if settings.dont_filter {
        FilterOutcome::Accepted
    } else {
        classify(&record, settings.popularity_threshold)
    };
    let (writer, tally) = match &outcome {
        FilterOutcome::Accepted => (&mut out.primary, &mut report.primary_rows),
        FilterOutcome::Flagged(_) => (&mut out.review, &mut report.review_rows),
    };
    let reason = outcome.reason();

    match settings.matcher {
        None => {
            writer.write_row(&assemble(&record, None, reason, settings.human_timestamps))?;
            *tally += 1;
        }
        Some(matcher) => {
            for span in matcher.spans(&record.text) {
                writer.write_row(&assemble(&record, Some(span), reason, settings.human_timestamps))?;
                *tally += 1;
            }
        }
    }
    Ok(())
}

/// Open both streams in append mode, scan, and close them on every exit path.
pub fn process_chunk_to_files<I>(
    records: I,
    settings: &ChunkSettings<'_>,
    plan: Option<SamplePlan>,
    primary: &Path,
    review: &Path,
    write_buf: usize,
) -> Result<ChunkReport, ExtractError>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    let mut outputs = ChunkOutputs::open(primary, review, write_buf, settings.return_all)?;
    let scanned = process_chunk(records, settings, plan, Some(&mut outputs));
    let closed = outputs.finish();
    let report = scanned?;
    closed?;
    Ok(report)
}
