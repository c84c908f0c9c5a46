use crate::record::Record;

/// Where a relevant record goes: the primary stream, or review with a reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    Accepted,
    Flagged(String),
}

impl FilterOutcome {
    pub fn reason(&self) -> Option<&str> {
        match self {
            FilterOutcome::Accepted => None,
            FilterOutcome::Flagged(r) => Some(r.as_str()),
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, FilterOutcome::Flagged(_))
    }
}

/// Records scoring below `threshold` are routed to review.
pub fn classify(record: &Record, threshold: Option<i64>) -> FilterOutcome {
    match threshold {
        Some(t) if record.score < t => {
            FilterOutcome::Flagged(format!("low score: {} < popularity threshold {}", record.score, t))
        }
        _ => FilterOutcome::Accepted,
    }
}
