use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use otacon::{Otacon, RelevancePolicy, SearchMode, YearMonth};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Comments,
    Posts,
}

/// Extract pattern matches with metadata from offline Pushshift Reddit dumps.
#[derive(Debug, Parser)]
#[command(name = "otacon", version)]
struct Cli {
    /// Directory holding the RC_/RS_YYYY-MM.zst files
    #[arg(short, long)]
    input: PathBuf,
    /// Primary output file (`;`-separated)
    #[arg(short, long, default_value = "otacon_out.csv")]
    output: PathBuf,
    /// Review output file; defaults to <output>_review.<ext>
    #[arg(long)]
    review: Option<PathBuf>,
    /// First month, YYYY-MM (inclusive)
    #[arg(long)]
    from: Option<String>,
    /// Last month, YYYY-MM (inclusive)
    #[arg(long)]
    to: Option<String>,
    #[arg(long, value_enum, default_value = "comments")]
    mode: Mode,
    /// Regex to search for; without it whole records are extracted
    #[arg(short, long)]
    regex: Option<String>,
    /// Keep matches on quoted (`&gt;`) lines
    #[arg(long)]
    include_quoted: bool,
    /// Route records scoring below N to the review file
    #[arg(long, value_name = "N")]
    popularity: Option<i64>,
    /// Treat every record as relevant and accepted
    #[arg(long)]
    dont_filter: bool,
    /// Examine only N sampled records per month
    #[arg(long, value_name = "N")]
    sample: Option<usize>,
    /// Only count relevant records, write nothing
    #[arg(long)]
    count: bool,
    /// Write whole records as JSON lines
    #[arg(long)]
    return_all: bool,
    /// Process months newest first
    #[arg(long)]
    reverse_order: bool,
    /// Restrict to these subreddits (repeatable)
    #[arg(long = "subreddit")]
    subreddits: Vec<String>,
    /// Skip well-known bot accounts
    #[arg(long)]
    exclude_bots: bool,
    /// Minimum text length in characters
    #[arg(long, default_value_t = 0)]
    min_length: usize,
    #[arg(long)]
    progress: bool,
}

fn parse_month(s: Option<&str>) -> Result<Option<YearMonth>> {
    s.map(|v| v.parse::<YearMonth>().map_err(|e| anyhow!("{v}: {e}"))).transpose()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut policy = RelevancePolicy::default().with_min_text_chars(cli.min_length);
    if !cli.subreddits.is_empty() {
        policy = policy.with_subreddits(&cli.subreddits);
    }

    let mut run = Otacon::new()
        .input_dir(&cli.input)
        .output(&cli.output)
        .mode(match cli.mode {
            Mode::Comments => SearchMode::Comments,
            Mode::Posts => SearchMode::Posts,
        })
        .timeframe(parse_month(cli.from.as_deref())?, parse_month(cli.to.as_deref())?)
        .reverse_order(cli.reverse_order)
        .include_quoted(cli.include_quoted)
        .dont_filter(cli.dont_filter)
        .relevance(policy)
        .count_only(cli.count)
        .return_all(cli.return_all)
        .progress(cli.progress);

    if let Some(review) = &cli.review { run = run.review_output(review); }
    if let Some(re) = &cli.regex { run = run.pattern(re); }
    if let Some(n) = cli.popularity { run = run.popularity(n); }
    if let Some(k) = cli.sample { run = run.sample(k); }
    if cli.exclude_bots { run = run.exclude_common_bots(); }

    let summary = run.run()?;

    if cli.count {
        for c in &summary.chunks {
            println!("{}\t{}", c.ym, c.relevant);
        }
        println!("total\t{}", summary.relevant());
    } else {
        println!(
            "{} relevant records: {} rows accepted, {} rows for review",
            summary.relevant(),
            summary.primary_rows(),
            summary.review_rows()
        );
    }
    for (sub, n) in summary.stats.ranked().into_iter().take(10) {
        println!("  r/{sub}: {n}");
    }
    Ok(())
}
