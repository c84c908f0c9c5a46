//! Archive months: parsing from CLI values and chunk file names, and walking a range.

use std::fmt;
use std::str::FromStr;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// The month a chunk covers, ordered chronologically.
///
/// `{}` renders the archive form `2006-01`; `{:#}` renders `January 2006`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8, // 1..=12
}

impl YearMonth {
    pub const fn new(year: u16, month: u8) -> Self {
        assert!(month >= 1 && month <= 12, "month must be 1..=12");
        Self { year, month }
    }

    pub fn checked(year: u16, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month of a dump file such as `RC_2006-01.zst`, if `name` carries `prefix`.
    pub fn from_chunk_name(name: &str, prefix: &str) -> Option<Self> {
        let stem = name.strip_prefix(prefix)?.strip_prefix('_')?.strip_suffix(".zst")?;
        let (y, m) = stem.split_once('-')?;
        if y.len() != 4 || m.len() != 2 {
            return None;
        }
        Self::checked(y.parse().ok()?, m.parse().ok()?)
    }

    fn months_since_epoch(self) -> u32 {
        self.year as u32 * 12 + (self.month as u32 - 1)
    }

    fn from_months_since_epoch(n: u32) -> Option<Self> {
        let year = u16::try_from(n / 12).ok()?;
        Some(Self { year, month: (n % 12) as u8 + 1 })
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[(self.month as usize).saturating_sub(1).min(11)]
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{} {}", self.month_name(), self.year)
        } else {
            write!(f, "{:04}-{:02}", self.year, self.month)
        }
    }
}

/// Accepts `YYYY-MM`, `YYYY/MM`, or a whole chunk name like `RS_2011-07.zst`.
impl FromStr for YearMonth {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        for prefix in ["RC", "RS"] {
            if let Some(ym) = Self::from_chunk_name(s, prefix) {
                return Ok(ym);
            }
        }
        let (y, m) = s
            .split_once(|c: char| c == '-' || c == '/')
            .ok_or_else(|| format!("expected YYYY-MM, got {s:?}"))?;
        let year: u16 = y.parse().map_err(|_| format!("invalid year {y:?}"))?;
        let month: u8 = m.parse().map_err(|_| format!("invalid month {m:?}"))?;
        Self::checked(year, month).ok_or_else(|| format!("month must be 01..12, got {month}"))
    }
}

/// Every month between `lo` and `hi` inclusive, oldest first or newest first.
/// Empty when `lo > hi`.
pub fn months_between(lo: YearMonth, hi: YearMonth, newest_first: bool) -> impl Iterator<Item = YearMonth> {
    let (a, b) = (lo.months_since_epoch(), hi.months_since_epoch());
    let span: Box<dyn Iterator<Item = u32>> = match (a <= b, newest_first) {
        (false, _) => Box::new(std::iter::empty()),
        (true, false) => Box::new(a..=b),
        (true, true) => Box::new((a..=b).rev()),
    };
    span.filter_map(YearMonth::from_months_since_epoch)
}
