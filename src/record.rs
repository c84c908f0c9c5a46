//! Typed view over one decoded comment/post, selected by search mode.

use crate::config::SearchMode;
use crate::error::ExtractError;
use serde_json::{Map, Value};

/// One comment or post with the fields the extractor needs.
/// `raw` keeps the whole object for return-all mode.
#[derive(Debug, Clone)]
pub struct Record {
    pub text: String,
    pub author: String,
    pub author_flair_text: Option<String>,
    pub subreddit: String,
    pub score: i64,
    pub created_utc: Value,
    pub id: Option<String>,
    pub permalink: Option<String>,
    pub link_id: Option<String>,
    pub raw: Map<String, Value>,
}

fn required_str(obj: &Map<String, Value>, field: &'static str) -> Result<String, ExtractError> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ExtractError::missing(field)),
    }
}

fn optional_str(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(|v| v.as_str()).map(str::to_string)
}

/// Dumps carry scores as numbers, some early months as numeric strings.
fn required_score(obj: &Map<String, Value>) -> Result<i64, ExtractError> {
    match obj.get("score") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or(ExtractError::missing("score")),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| ExtractError::missing("score")),
        _ => Err(ExtractError::missing("score")),
    }
}

impl Record {
    pub fn from_json(obj: Map<String, Value>, mode: SearchMode) -> Result<Self, ExtractError> {
        let text = required_str(&obj, mode.text_field())?;
        let author = required_str(&obj, "author")?;
        let subreddit = required_str(&obj, "subreddit")?;
        let score = required_score(&obj)?;
        let created_utc = match obj.get("created_utc") {
            Some(v @ (Value::Number(_) | Value::String(_))) => v.clone(),
            _ => return Err(ExtractError::missing("created_utc")),
        };

        Ok(Self {
            text,
            author,
            author_flair_text: optional_str(&obj, "author_flair_text"),
            subreddit,
            score,
            created_utc,
            id: optional_str(&obj, "id"),
            permalink: optional_str(&obj, "permalink"),
            link_id: optional_str(&obj, "link_id"),
            raw: obj,
        })
    }

    /// `created_utc` as epoch seconds, when it is numeric (or a numeric string).
    pub fn created_epoch(&self) -> Option<i64> {
        match &self.created_utc {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
