//! Pattern matching over record text, with exclusion of matches on quoted lines.
//!
//! Reddit stores quoted lines HTML-escaped, so a quote starts with `&gt;` and runs
//! to the next line break. A match counts as quoted when some `&gt;` on the line
//! where the match ends precedes the match end with at least one character between.

use crate::error::ExtractError;
use regex::{Matches, Regex};
use std::fmt;

const QUOTE_MARKER_RE: &str = r"&gt;[^\n]+$";

/// Half-open character-offset range of one match within a record's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// Compiled search pattern plus the quote-exclusion switch.
#[derive(Clone, Debug)]
pub struct SpanMatcher {
    pattern: Regex,
    quote: Regex,
    include_quoted: bool,
}

impl SpanMatcher {
    /// Compile `pattern`. Fails with `PatternSyntax` before any archive work starts.
    pub fn new(pattern: &str, include_quoted: bool) -> Result<Self, ExtractError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            quote: Regex::new(QUOTE_MARKER_RE)?,
            include_quoted,
        })
    }

    /// True if the text up to byte offset `end` sits on a quoted line.
    pub fn inside_quote(&self, text: &str, end: usize) -> bool {
        let head = &text[..end];
        // `$` in the quote test also accepts a single trailing line break.
        let head = head.strip_suffix('\n').unwrap_or(head);
        let line_start = head.rfind('\n').map_or(0, |i| i + 1);
        self.quote.is_match(&head[line_start..])
    }

    /// Non-overlapping matches in left-to-right order, quoted ones dropped unless
    /// `include_quoted` is set. Holds no state between calls.
    pub fn spans<'m, 't>(&'m self, text: &'t str) -> Spans<'m, 't> {
        Spans {
            matcher: self,
            text,
            inner: self.pattern.find_iter(text),
            byte_cursor: 0,
            char_cursor: 0,
        }
    }
}

/// Lazy span iterator; converts byte offsets to character offsets incrementally.
pub struct Spans<'m, 't> {
    matcher: &'m SpanMatcher,
    text: &'t str,
    inner: Matches<'m, 't>,
    byte_cursor: usize,
    char_cursor: usize,
}

impl Spans<'_, '_> {
    fn char_offset(&mut self, byte: usize) -> usize {
        self.char_cursor += self.text[self.byte_cursor..byte].chars().count();
        self.byte_cursor = byte;
        self.char_cursor
    }
}

impl Iterator for Spans<'_, '_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            let m = self.inner.next()?;
            if !self.matcher.include_quoted && self.matcher.inside_quote(self.text, m.end()) {
                continue;
            }
            let start = self.char_offset(m.start());
            let end = self.char_offset(m.end());
            return Some(Span { start, end });
        }
    }
}
