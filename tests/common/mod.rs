#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write a compressed `.zst` file containing the provided JSONL lines.
/// Mirrors the dump's RC_/RS_ monthly files with tiny content.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// A comment in the modern dump shape (with `permalink`).
pub fn comment(id: &str, body: &str, score: i64, subreddit: &str) -> Value {
    json!({
        "id": id, "body": body, "author": format!("user_{id}"), "author_flair_text": null,
        "subreddit": subreddit, "score": score, "created_utc": 1136074600,
        "link_id": "t3_post1", "parent_id": "t3_post1",
        "permalink": format!("/r/{subreddit}/comments/post1/_/{id}/"),
    })
}

/// A comment in the early dump shape (no `permalink`, only `link_id`).
pub fn old_comment(id: &str, body: &str, score: i64, subreddit: &str) -> Value {
    json!({
        "id": id, "body": body, "author": format!("user_{id}"), "author_flair_text": "flair",
        "subreddit": subreddit, "score": score, "created_utc": 1136074600,
        "link_id": "t3_abc", "parent_id": "t3_abc",
    })
}

pub fn as_object(v: Value) -> serde_json::Map<String, Value> {
    match v {
        Value::Object(m) => m,
        other => panic!("not an object: {other}"),
    }
}

/// Fresh temp dir holding `comments/RC_<ym>.zst` for each given month.
pub fn make_archive(months: &[(&str, Vec<Value>)]) -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    for (ym, records) in months {
        let lines: Vec<String> = records.iter().map(|v| v.to_string()).collect();
        write_zst_lines(&base.join("comments").join(format!("RC_{ym}.zst")), &lines);
    }
    base
}

/// Read a `;`-separated output file (header row skipped) into string records.
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_path(path)
        .unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
