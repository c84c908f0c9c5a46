#[path = "common/mod.rs"]
mod common;

use common::*;
use otacon::{Otacon, RelevancePolicy, YearMonth};

/// N records, K relevant (subreddit allow-list + a deleted author): count-only returns K
/// per month and leaves no output files behind.
#[test]
fn count_only_reports_relevant_and_writes_nothing() {
    let mut deleted = comment("d1", "gone", 5, "rust");
    deleted["author"] = "[deleted]".into();
    let base = make_archive(&[
        (
            "2006-01",
            vec![
                comment("a", "one", 5, "rust"),
                comment("b", "two", 5, "golang"),
                comment("c", "three", 5, "Rust"),
                deleted,
            ],
        ),
        ("2006-02", vec![comment("e", "four", 5, "rust")]),
    ]);
    let out = base.join("should_not_exist.csv");

    let counts = Otacon::new()
        .input_dir(base.join("comments"))
        .output(&out)
        .relevance(RelevancePolicy::default().with_subreddits(["r/rust"]))
        .count_by_month()
        .unwrap();

    assert_eq!(counts.get(&YearMonth::new(2006, 1)).copied(), Some(2));
    assert_eq!(counts.get(&YearMonth::new(2006, 2)).copied(), Some(1));
    assert!(!out.exists());
    assert!(!base.join("should_not_exist_review.csv").exists());
}

/// Per-subreddit stats are accumulated per month and merged across the run.
#[test]
fn subreddit_stats_merge_across_months() {
    let base = make_archive(&[
        ("2006-01", vec![comment("a", "one", 5, "rust"), comment("b", "two", 5, "golang")]),
        ("2006-02", vec![comment("c", "three", 5, "rust")]),
    ]);

    let summary = Otacon::new().input_dir(base.join("comments")).count_only(true).run().unwrap();

    assert_eq!(summary.relevant(), 3);
    assert_eq!(summary.stats.get("rust"), 2);
    assert_eq!(summary.stats.get("golang"), 1);
    assert_eq!(summary.stats.ranked()[0], ("rust", 2));
}

/// With filtering disabled every record counts, pseudo users included.
#[test]
fn dont_filter_counts_everything() {
    let mut deleted = comment("d1", "[removed]", 5, "x");
    deleted["author"] = "[deleted]".into();
    let base = make_archive(&[("2006-01", vec![deleted, comment("a", "one", 5, "x")])]);

    let summary = Otacon::new()
        .input_dir(base.join("comments"))
        .dont_filter(true)
        .count_only(true)
        .run()
        .unwrap();
    assert_eq!(summary.relevant(), 2);
}
