use crate::relevance::normalize_str;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

// -------- Author exclusions: bot defaults + env/file augments --------

/// Normalized (lowercase) default list of high-volume bot/service authors.
pub fn default_bot_authors() -> Vec<String> {
    let defaults = [
        "automoderator",
        "imguralbumbot",
        "autowikibot",
        "remindmebot",
        "totesmessenger",
        "tweet_poster",
        "video_link_bot",
        "gifvbot",
        "helper-bot",
        "sneakpeekbot",
        "wikitextbot",
        "converter-bot",
    ];
    let mut v: Vec<String> = defaults.iter().map(|s| normalize_str(s)).collect();
    v.sort();
    v.dedup();
    v
}

/// Merge extra exclusions from env/file into `target` (in place), then sort + dedup.
/// - OTACON_EXCLUDE_AUTHORS: comma/semicolon/space separated names
/// - OTACON_EXCLUDE_AUTHORS_FILE: path to a newline-separated file of names
pub fn merge_extra_exclusions(target: &mut Vec<String>) {
    if let Ok(s) = std::env::var("OTACON_EXCLUDE_AUTHORS") {
        for raw in s.split(|c: char| c == ',' || c == ';' || c.is_whitespace()) {
            let n = normalize_str(raw);
            if !n.is_empty() {
                target.push(n);
            }
        }
    }

    if let Ok(path) = std::env::var("OTACON_EXCLUDE_AUTHORS_FILE") {
        if !path.trim().is_empty() {
            match File::open(&path) {
                Ok(f) => {
                    for line in BufReader::new(f).lines().map_while(Result::ok) {
                        let n = normalize_str(&line);
                        if !n.is_empty() {
                            target.push(n);
                        }
                    }
                }
                Err(e) => tracing::warn!("OTACON_EXCLUDE_AUTHORS_FILE is set but cannot be opened: {}: {}", path, e),
            }
        }
    }

    for s in target.iter_mut() {
        *s = normalize_str(s);
    }
    target.sort();
    target.dedup();
}

// -------- Robust open with backoff (Windows-friendly) --------

/// Transient I/O errors seen on Windows when AV/backup filter drivers or
/// network volumes hold a file briefly.
fn is_retriable_io_error(e: &io::Error) -> bool {
    // The same raw codes mean EISDIR, EPIPE etc. elsewhere.
    cfg!(windows)
        && matches!(
            e.raw_os_error(),
            // access denied, sharing/lock violation, AV block, device not ready,
            // volume altered, I/O device error, user-mapped section open
            Some(5) | Some(32) | Some(33) | Some(225) | Some(21) | Some(1006) | Some(1117) | Some(1224)
        )
}

fn with_backoff(tries: usize, delay_ms: u64, what: &str, mut op: impl FnMut() -> io::Result<File>) -> io::Result<File> {
    let mut last_err: Option<io::Error> = None;
    for i in 0..tries.max(1) {
        match op() {
            Ok(f) => return Ok(f),
            Err(e) if is_retriable_io_error(&e) => {
                last_err = Some(e);
                sleep(Duration::from_millis(delay_ms.saturating_mul((i + 1) as u64)));
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, format!("{what} failed"))))
}

/// Open a file for reading with retries/backoff for transient errors.
pub fn open_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    with_backoff(tries, delay_ms, "open", || File::open(path))
}

/// Open (creating if needed) a file in append mode, with retries/backoff.
pub fn append_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    with_backoff(tries, delay_ms, "append", || OpenOptions::new().create(true).append(true).open(path))
}

/// True if `path` is missing or has zero length.
pub fn is_empty_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}
