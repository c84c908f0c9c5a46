mod config;
mod date;
mod error;
mod paths;
mod record;
mod zstd_jsonl;

mod matcher;
mod relevance;
mod popularity;
mod row;
mod sampling;
mod driver;

mod counting;
mod progress;
mod util;
mod pipeline;

pub use crate::config::{ExtractOptions, SearchMode};
pub use crate::date::{months_between, YearMonth};
pub use crate::error::ExtractError;
pub use crate::pipeline::{ChunkSummary, Otacon, RunSummary};

// Core building blocks, usable without the archive layer.
pub use crate::matcher::{Span, SpanMatcher};
pub use crate::record::Record;
pub use crate::relevance::{relevant, RelevancePolicy};
pub use crate::popularity::{classify, FilterOutcome};
pub use crate::row::{assemble, resolve_permalink, OutputRow, RowWriter, HEADER};
pub use crate::sampling::{chunk_seed, get_sample_plan, select_indices, SamplePlan};
pub use crate::driver::{process_chunk, process_chunk_to_files, ChunkOutputs, ChunkReport, ChunkSettings};
pub use crate::counting::SubredditStats;

// Archive access.
pub use crate::paths::{discover_chunks, establish_timeframe, Chunk};
pub use crate::zstd_jsonl::{count_records, RecordSource};

pub use crate::util::{default_bot_authors, init_tracing_once};
