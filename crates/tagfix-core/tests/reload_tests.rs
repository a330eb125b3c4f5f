//! Snapshot publication under concurrent readers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tagfix_core::{
    BuildError, Category, RecordSource, RecordStream, SearchOptions, SourceError, SourceResult,
    TagEngine, TagRecord,
};

/// Generation `g`: every tag carries suffix `g` in its name and aliases.
fn generation(g: u32) -> Vec<TagRecord> {
    (0u32..200)
        .map(|i| {
            TagRecord::new(format!("tag{i} gen{g}"), Category::General, u64::from(i))
                .with_aliases([format!("alias{i}"), format!("other{i}")])
        })
        .collect()
}

struct FailAfter {
    records: Vec<TagRecord>,
    fail_at: usize,
}

impl RecordSource for FailAfter {
    fn records(&mut self) -> SourceResult<RecordStream<'_>> {
        let fail_at = self.fail_at;
        Ok(Box::new(self.records.iter().enumerate().map(move |(i, r)| {
            if i == fail_at {
                Err(SourceError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "truncated export",
                )))
            } else {
                Ok(r.clone())
            }
        })))
    }
}

#[test]
fn test_readers_see_whole_snapshots() {
    let engine = Arc::new(TagEngine::default());
    engine.load(generation(0)).unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let opts = SearchOptions::default();
                let mut checked = 0u64;
                while !done.load(Ordering::Relaxed) || checked == 0 {
                    // Both aliases of one tag must resolve within the same generation.
                    let snapshot = engine.snapshot().unwrap();
                    let a = snapshot.lookup_alias("alias7").map(|id| snapshot.name(id).to_string());
                    let b = snapshot.lookup_alias("other7").map(|id| snapshot.name(id).to_string());
                    assert_eq!(a, b);

                    let hits = engine.search("alias7", 5, &opts);
                    assert_eq!(hits.len(), 1);
                    assert!(hits[0].starts_with("tag7 gen"));
                    checked += 1;
                }
                checked
            })
        })
        .collect();

    for g in 1..=20 {
        engine.load(generation(g)).unwrap();
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(engine.stats().generation, 21);
    assert_eq!(
        engine.search("alias7", 5, &SearchOptions::default()),
        vec!["tag7 gen20"]
    );
}

#[test]
fn test_failed_build_is_atomic() {
    let engine = TagEngine::default();
    engine.load(generation(1)).unwrap();

    let mut source = FailAfter {
        records: generation(2),
        fail_at: 150,
    };
    let err = engine.reload(&mut source).unwrap_err();
    assert!(matches!(err, BuildError::Source(SourceError::Io(_))));

    let stats = engine.stats();
    assert_eq!(stats.generation, 1);
    assert_eq!(stats.total_tags, 200);
    assert_eq!(
        engine.search("alias3", 5, &SearchOptions::default()),
        vec!["tag3 gen1"]
    );
}

#[test]
fn test_concurrent_reloads_serialize() {
    let engine = Arc::new(TagEngine::default());

    thread::scope(|s| {
        for g in 0..8 {
            let engine = Arc::clone(&engine);
            s.spawn(move || engine.load(generation(g)).unwrap());
        }
    });

    let stats = engine.stats();
    assert_eq!(stats.generation, 8);
    assert_eq!(stats.total_tags, 200);
}

#[test]
fn test_reload_reports_unchanged_fingerprint() {
    let engine = TagEngine::default();
    let first = engine.load(generation(3)).unwrap();
    let second = engine.load(generation(3)).unwrap();
    let third = engine.load(generation(4)).unwrap();

    assert_eq!(first.fingerprint, second.fingerprint);
    assert_ne!(second.fingerprint, third.fingerprint);
    assert_eq!(third.generation, 3);
}
