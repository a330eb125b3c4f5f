//! CsvSource against real files

use std::fs;
use std::io::Write;

use pretty_assertions::assert_eq;
use tagfix_core::{
    BuildError, Category, RecordSource, SearchOptions, SourceError, TagEngine, TagRecord,
};
use tagfix_csv::{CsvSource, CsvStats};
use tempfile::TempDir;

const DANBOORU: &str = r#"tag,type,count,aliases
1girl,0,2856234,"1girls,sole_female"
large_breasts,0,1464796,"large_breast,big_breasts,large_tits"
hatsune_miku,4,95000,"miku"
this line is broken
saber_(fate),4,40000,"saber"
blonde_hair 0 1200000 blond_hair,yellow_hair
"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

fn collect(source: &mut CsvSource) -> Vec<TagRecord> {
    source
        .records()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn test_reads_both_formats_and_skips_bad_lines() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "tags.csv", DANBOORU);

    let mut source = CsvSource::new([&path]);
    let records = collect(&mut source);

    let names: Vec<&str> = records.iter().map(|r| r.canonical_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "1girl",
            "large breasts",
            "hatsune miku",
            r"saber \(fate\)",
            "blonde hair"
        ]
    );
    assert_eq!(records[2].category, Category::Character);
    assert_eq!(records[4].aliases, vec!["blond hair", "yellow hair"]);
    assert_eq!(
        source.stats(),
        CsvStats {
            files: 1,
            parsed: 5,
            skipped: 1
        }
    );
}

#[test]
fn test_files_read_in_order() {
    let dir = TempDir::new().unwrap();
    let first = write_file(&dir, "a.csv", "cat,0,10,\"kitty\"\n");
    let second = write_file(&dir, "b.csv", "kitten,0,5,\"kitty\"\n");

    let engine = TagEngine::default();
    let mut source = CsvSource::new([&first, &second]);
    engine.reload(&mut source).unwrap();

    // Later file wins the shared alias
    assert_eq!(
        engine.search("kitty", 5, &SearchOptions::default()),
        vec!["kitten"]
    );
    assert_eq!(source.stats().files, 2);
}

#[test]
fn test_overlapping_files_merge_later_wins() {
    let dir = TempDir::new().unwrap();
    let base = write_file(
        &dir,
        "base.csv",
        "long_hair,0,900,\"longer_hair\"\nshort_hair,0,400\n",
    );
    let update = write_file(&dir, "update.csv", "long_hair,0,1200,\"long_locks\"\n");

    let engine = TagEngine::default();
    let summary = engine.reload(&mut CsvSource::new([&base, &update])).unwrap();
    assert_eq!(summary.total_tags, 2);

    let opts = SearchOptions::default();
    assert_eq!(engine.search("long_locks", 5, &opts), vec!["long hair"]);
    assert!(engine.search("longer hair", 5, &opts).is_empty());
    assert_eq!(engine.search("hair", 5, &opts), vec!["long hair", "short hair"]);
}

#[test]
fn test_missing_file_fails_build_and_keeps_snapshot() {
    let dir = TempDir::new().unwrap();
    let good = write_file(&dir, "good.csv", DANBOORU);
    let missing = dir.path().join("missing.csv");

    let engine = TagEngine::default();
    engine.reload(&mut CsvSource::new([&good])).unwrap();

    let err = engine
        .reload(&mut CsvSource::new([good.clone(), missing]))
        .unwrap_err();
    match err {
        BuildError::Source(SourceError::Io(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            assert!(e.to_string().contains("missing.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let stats = engine.stats();
    assert_eq!(stats.generation, 1);
    assert_eq!(
        engine.search("big_breasts", 5, &SearchOptions::default()),
        vec!["large breasts"]
    );
}

#[test]
fn test_stats_reset_between_passes() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "tags.csv", DANBOORU);
    let mut source = CsvSource::new([&path]);

    collect(&mut source);
    collect(&mut source);
    assert_eq!(source.stats().parsed, 5);
    assert_eq!(source.stats().skipped, 1);
}

#[test]
fn test_excluded_categories_dropped_after_parse() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "tags.csv", DANBOORU);

    let engine = TagEngine::default();
    let summary = engine.reload(&mut CsvSource::new([&path])).unwrap();

    // Character tags are excluded by default
    assert_eq!(summary.total_tags, 3);
    assert!(engine
        .search("hatsune miku", 5, &SearchOptions::default())
        .is_empty());
}

#[test]
fn test_invalid_utf8_line_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.csv");
    fs::write(&path, b"caf\xe9,0,3\nhat,0,9\n").unwrap();

    let records = collect(&mut CsvSource::new([&path]));
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].canonical_name, "hat");
}
