//! Lazy record source over one zstd-compressed JSONL chunk.

use anyhow::Result;
use indicatif::ProgressBar;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use zstd::stream::read::Decoder;

use crate::util::open_with_backoff;

#[inline]
fn warn_decode_stop(path: &Path, e: &io::Error) {
    let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    tracing::warn!(
        path = %abs.display(),
        error = %e,
        "Stopping chunk after decode error; rows already written are kept. \
         This usually means a truncated or corrupt download."
    );
}

/// A `Read` wrapper that reports compressed bytes read to an optional progress bar.
struct ProgressReader<R: Read> {
    inner: R,
    pb: Option<ProgressBar>,
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if let Some(pb) = &self.pb {
            pb.inc(n as u64);
        }
        Ok(n)
    }
}

type ChunkReader = BufReader<Decoder<'static, BufReader<ProgressReader<File>>>>;

/// Streams decoded JSON objects from a chunk, in file order.
///
/// Lines that are not JSON objects are skipped and counted in `malformed`.
/// A decode error ends the stream early after a warning. Dropping the source
/// stops decompression; nothing past the last yielded record is read.
pub struct RecordSource {
    path: PathBuf,
    reader: ChunkReader,
    buf: Vec<u8>,
    malformed: u64,
    done: bool,
}

impl RecordSource {
    pub fn open(path: &Path, read_buf_bytes: usize, pb: Option<ProgressBar>) -> Result<Self> {
        let file = open_with_backoff(path, 16, 50)?;
        let counted = ProgressReader { inner: file, pb };
        let mut decoder = Decoder::new(counted)?;
        // Pushshift dumps use long-distance windows.
        decoder.window_log_max(31)?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::with_capacity(read_buf_bytes.max(8 * 1024), decoder),
            buf: Vec::with_capacity(16 * 1024),
            malformed: 0,
            done: false,
        })
    }

    /// Number of lines skipped so far because they did not decode to a JSON object.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    fn next_line(&mut self) -> Option<&[u8]> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(self.buf.as_slice()),
            Err(e) => {
                warn_decode_stop(&self.path, &e);
                self.done = true;
                None
            }
        }
    }
}

impl Iterator for RecordSource {
    type Item = Map<String, Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.next_line()?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            // from_slice also rejects invalid UTF-8
            match serde_json::from_slice::<Value>(line) {
                Ok(Value::Object(obj)) => return Some(obj),
                Ok(_) | Err(_) => {
                    self.malformed += 1;
                    tracing::debug!(path = %self.path.display(), "skipping undecodable line");
                }
            }
        }
    }
}

/// Number of records a `RecordSource` over `path` yields, by streaming it once.
///
/// Sample indices address positions in that same stream, so blank and
/// malformed lines are excluded here exactly as the source skips them.
pub fn count_records(path: &Path, read_buf_bytes: usize) -> Result<u64> {
    Ok(RecordSource::open(path, read_buf_bytes, None)?.count() as u64)
}
