#[path = "common/mod.rs"]
mod common;

use common::*;
use otacon::{establish_timeframe, months_between, SearchMode, YearMonth};

#[test]
fn months_parse_from_cli_values_and_chunk_names() {
    let jan = YearMonth::new(2006, 1);
    assert_eq!("2006-01".parse::<YearMonth>().unwrap(), jan);
    assert_eq!("2006/1".parse::<YearMonth>().unwrap(), jan);
    assert_eq!("RC_2006-01.zst".parse::<YearMonth>().unwrap(), jan);
    assert_eq!(YearMonth::from_chunk_name("RS_2011-07.zst", "RS"), Some(YearMonth::new(2011, 7)));

    assert_eq!(YearMonth::from_chunk_name("RS_2011-07.zst", "RC"), None);
    assert_eq!(YearMonth::from_chunk_name("RC_2006-13.zst", "RC"), None);
    assert_eq!(YearMonth::from_chunk_name("RC_2006-01.zst.part", "RC"), None);
    assert!("2006-00".parse::<YearMonth>().is_err());
    assert!("2006".parse::<YearMonth>().is_err());
}

#[test]
fn months_render_short_and_long() {
    let ym = YearMonth::new(2007, 3);
    assert_eq!(ym.to_string(), "2007-03");
    assert_eq!(format!("{ym:#}"), "March 2007");
}

#[test]
fn ranges_walk_across_years_in_either_direction() {
    let lo = YearMonth::new(2006, 11);
    let hi = YearMonth::new(2007, 2);
    let forward: Vec<_> = months_between(lo, hi, false).map(|m| m.to_string()).collect();
    assert_eq!(forward, ["2006-11", "2006-12", "2007-01", "2007-02"]);

    let backward: Vec<_> = months_between(lo, hi, true).collect();
    assert_eq!(backward.first(), Some(&hi));
    assert_eq!(backward.last(), Some(&lo));
    assert_eq!(backward.len(), 4);

    assert_eq!(months_between(hi, lo, false).count(), 0);
    assert_eq!(months_between(lo, lo, true).collect::<Vec<_>>(), vec![lo]);
}

/// Gaps in the archive are skipped; unrelated files in the directory are ignored.
#[test]
fn timeframe_skips_missing_months_and_foreign_files() {
    let base = make_archive(&[
        ("2006-01", vec![comment("a", "x", 1, "s")]),
        ("2006-03", vec![comment("b", "x", 1, "s")]),
    ]);
    let root = base.join("comments");
    std::fs::write(root.join("RC_2006-02.zst.tmp"), b"").unwrap();
    write_zst_lines(&root.join("RS_2006-02.zst"), &[]);

    let months = |reverse| {
        establish_timeframe(&root, SearchMode::Comments, None, None, reverse)
            .into_iter()
            .map(|c| c.ym.to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(months(false), ["2006-01", "2006-03"]);
    assert_eq!(months(true), ["2006-03", "2006-01"]);

    let clamped = establish_timeframe(&root, SearchMode::Comments, Some(YearMonth::new(2006, 2)), None, false);
    assert_eq!(clamped.len(), 1);
    assert_eq!(clamped[0].name(), "RC_2006-03.zst");
}
