#[path = "common/mod.rs"]
mod common;

use common::*;
use otacon::{
    chunk_seed, establish_timeframe, get_sample_plan, process_chunk, select_indices, ChunkSettings,
    Otacon, RelevancePolicy, SamplePlan, SearchMode,
};

fn twenty_comments() -> Vec<serde_json::Value> {
    (0..20).map(|i| comment(&format!("s{i}"), &format!("comment number {i}"), 5, "x")).collect()
}

/// Plans never exceed the request, never repeat, stay ascending and in range.
#[test]
fn selected_indices_are_bounded_sorted_and_unique() {
    for total in [0u64, 1, 5, 100] {
        for k in [0usize, 1, 3, 10, 200] {
            let picked = select_indices(42, total, k);
            assert_eq!(picked.len() as u64, (k as u64).min(total));
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
            assert!(picked.iter().all(|&i| i < total));
            assert_eq!(picked, select_indices(42, total, k), "same seed, same plan");
        }
    }
}

#[test]
fn chunk_seed_is_stable_per_name() {
    assert_eq!(chunk_seed("RC_2006-01.zst"), chunk_seed("RC_2006-01.zst"));
    assert_ne!(chunk_seed("RC_2006-01.zst"), chunk_seed("RC_2006-02.zst"));
}

/// The record count is cached under the archive root and reused on the next plan.
#[test]
fn sample_plan_is_reproducible_and_cached() {
    let base = make_archive(&[("2006-01", twenty_comments())]);
    let root = base.join("comments");
    let chunk = establish_timeframe(&root, SearchMode::Comments, None, None, false).remove(0);

    let first = get_sample_plan(&chunk, 5, &root, 64 * 1024).unwrap();
    assert_eq!(first.len(), 5);
    assert!(first.iter().all(|i| i < 20));

    let cache = root.join(".otacon_counts").join("RC_2006-01.zst.count");
    assert_eq!(std::fs::read_to_string(&cache).unwrap().trim(), "20");

    let second = get_sample_plan(&chunk, 5, &root, 64 * 1024).unwrap();
    assert_eq!(first, second);
}

/// The driver stops reading the moment the plan runs out.
#[test]
fn driver_stops_when_plan_is_exhausted() {
    let policy = RelevancePolicy::default();
    let settings = ChunkSettings {
        mode: SearchMode::Comments,
        matcher: None,
        relevance: &policy,
        popularity_threshold: None,
        dont_filter: false,
        return_all: false,
        human_timestamps: false,
    };
    let records = twenty_comments().into_iter().map(as_object);
    let plan = SamplePlan::from_sorted(vec![1, 3]);

    let report = process_chunk(records, &settings, Some(plan), None).unwrap();

    assert_eq!(report.relevant, 2);
    assert_eq!(report.scanned, 4);
    assert!(report.stopped_early);
}

/// An empty plan means nothing is read at all.
#[test]
fn empty_plan_reads_nothing() {
    let policy = RelevancePolicy::default();
    let settings = ChunkSettings {
        mode: SearchMode::Comments,
        matcher: None,
        relevance: &policy,
        popularity_threshold: None,
        dont_filter: false,
        return_all: false,
        human_timestamps: false,
    };
    let records = twenty_comments().into_iter().map(as_object);

    let report = process_chunk(records, &settings, Some(SamplePlan::default()), None).unwrap();
    assert_eq!(report.scanned, 0);
    assert_eq!(report.relevant, 0);
}

/// End to end: sampling 5 of 20 relevant records counts 5; oversize requests count all.
#[test]
fn sampled_run_examines_only_the_sample() {
    let base = make_archive(&[("2006-01", twenty_comments())]);

    let sampled = Otacon::new().input_dir(base.join("comments")).sample(5).count_only(true).run().unwrap();
    assert_eq!(sampled.relevant(), 5);

    let oversize = Otacon::new().input_dir(base.join("comments")).sample(500).count_only(true).run().unwrap();
    assert_eq!(oversize.relevant(), 20);
}

/// Malformed lines are invisible to both the record count and the scan, so a
/// sample of every valid record still reaches all of them.
#[test]
fn malformed_lines_do_not_shift_sample_indices() {
    let base = tempfile::tempdir().unwrap().into_path();
    let root = base.join("comments");
    let lines: Vec<String> = (0..10)
        .map(|i| {
            if i % 2 == 0 {
                "not json".to_string()
            } else {
                comment(&format!("m{i}"), "a valid comment", 5, "x").to_string()
            }
        })
        .collect();
    write_zst_lines(&root.join("RC_2006-01.zst"), &lines);

    let summary = Otacon::new().input_dir(&root).sample(5).count_only(true).run().unwrap();
    assert_eq!(summary.relevant(), 5);

    let cached = std::fs::read_to_string(root.join(".otacon_counts").join("RC_2006-01.zst.count")).unwrap();
    assert_eq!(cached.trim(), "5");
}
