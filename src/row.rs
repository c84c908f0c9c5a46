//! Output rows: metadata assembly, permalink reconstruction, and the `;`-delimited writers.

use crate::error::ExtractError;
use crate::matcher::Span;
use crate::record::Record;
use crate::util::append_with_backoff;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const REDDIT: &str = "https://www.reddit.com";

pub const HEADER: [&str; 9] = [
    "text", "span", "subreddit", "score", "author", "flair", "date", "permalink", "filter_reason",
];

/// One output line; column order is fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    pub text: String,
    pub span: Option<Span>,
    pub subreddit: String,
    pub score: i64,
    pub author: String,
    pub flair: Option<String>,
    pub created_utc: String,
    pub permalink: Option<String>,
    pub reason: Option<String>,
}

impl OutputRow {
    pub fn fields(&self) -> [String; 9] {
        [
            self.text.clone(),
            self.span.map(|s| s.to_string()).unwrap_or_default(),
            self.subreddit.clone(),
            self.score.to_string(),
            self.author.clone(),
            self.flair.clone().unwrap_or_default(),
            self.created_utc.clone(),
            self.permalink.clone().unwrap_or_default(),
            self.reason.clone().unwrap_or_default(),
        ]
    }
}

/// Modern `permalink` wins; otherwise rebuild from `link_id` + `id`; otherwise none.
pub fn resolve_permalink(record: &Record) -> Option<String> {
    if let Some(p) = &record.permalink {
        return Some(format!("{REDDIT}{p}"));
    }
    let link_id = record.link_id.as_deref()?;
    let post = link_id.split('_').nth(1)?;
    let id = record.id.as_deref()?;
    Some(format!("{REDDIT}/r/{}/comments/{}//{}", record.subreddit, post, id))
}

fn render_created(record: &Record, human: bool) -> String {
    if human {
        let dt = record.created_epoch().and_then(|e| OffsetDateTime::from_unix_timestamp(e).ok());
        if let Some(s) = dt.and_then(|dt| dt.format(&Rfc3339).ok()) {
            return s;
        }
    }
    match &record.created_utc {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn assemble(record: &Record, span: Option<Span>, reason: Option<&str>, human_timestamps: bool) -> OutputRow {
    OutputRow {
        text: record.text.clone(),
        span,
        subreddit: record.subreddit.clone(),
        score: record.score,
        author: record.author.clone(),
        flair: record.author_flair_text.clone(),
        created_utc: render_created(record, human_timestamps),
        permalink: resolve_permalink(record),
        reason: reason.map(str::to_string),
    }
}

/// Append-mode writer for one output stream (primary or review).
///
/// The format is fixed when the stream is opened: `;`-separated rows, or whole
/// records as JSON lines when every record is returned verbatim.
pub enum RowWriter {
    Csv(csv::Writer<BufWriter<File>>),
    JsonLines(BufWriter<File>),
}

impl RowWriter {
    pub fn append_csv(path: &Path, write_buf: usize) -> Result<Self, ExtractError> {
        let file = append_with_backoff(path, 16, 50)?;
        let csv = csv::WriterBuilder::new()
            .delimiter(b';')
            .quote(b'"')
            .quote_style(csv::QuoteStyle::Necessary)
            .double_quote(true)
            .has_headers(false)
            .from_writer(BufWriter::with_capacity(write_buf, file));
        Ok(RowWriter::Csv(csv))
    }

    pub fn append_json_lines(path: &Path, write_buf: usize) -> Result<Self, ExtractError> {
        let file = append_with_backoff(path, 16, 50)?;
        Ok(RowWriter::JsonLines(BufWriter::with_capacity(write_buf, file)))
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<(), ExtractError> {
        match self {
            RowWriter::Csv(csv) => csv.write_record(row.fields())?,
            RowWriter::JsonLines(_) => return Err(wrong_format("column row")),
        }
        Ok(())
    }

    pub fn write_header(&mut self) -> Result<(), ExtractError> {
        match self {
            RowWriter::Csv(csv) => csv.write_record(HEADER)?,
            RowWriter::JsonLines(_) => return Err(wrong_format("header")),
        }
        Ok(())
    }

    /// Whole record as one JSON line, bypassing the column format.
    pub fn write_raw(&mut self, record: &Record) -> Result<(), ExtractError> {
        match self {
            RowWriter::JsonLines(w) => {
                serde_json::to_writer(&mut *w, &record.raw).map_err(io::Error::from)?;
                w.write_all(b"\n")?;
            }
            RowWriter::Csv(_) => return Err(wrong_format("raw record")),
        }
        Ok(())
    }

    pub fn finish(self) -> Result<(), ExtractError> {
        match self {
            RowWriter::Csv(mut csv) => csv.flush()?,
            RowWriter::JsonLines(mut w) => w.flush()?,
        }
        Ok(())
    }
}

fn wrong_format(what: &str) -> ExtractError {
    ExtractError::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{what} does not fit this output stream's format"),
    ))
}
