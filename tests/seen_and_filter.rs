// tests/seen_and_filter.rs
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use job_radar::config::LocationConfig;
use job_radar::filter::{FilterPipeline, LocationPolicy};
use job_radar::{Classifier, PersistenceError, Posting, SeenStore};

fn devops(url: &str, description: &str) -> Posting {
    Posting::new("DevOps Engineer", "Acme", "Remote", url, "board").with_description(description)
}

fn pipeline(min_score: f64) -> FilterPipeline {
    FilterPipeline::new(
        Arc::new(Classifier::default()),
        LocationPolicy::new(&LocationConfig::default()),
        vec!["kubernetes".into(), "terraform".into(), "aws".into()],
        min_score,
    )
}

#[test]
fn save_then_load_reproduces_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("seen.json");

    let mut store = SeenStore::load(&path).unwrap();
    assert!(store.is_empty());
    let a = devops("https://acme.test/1", "");
    let b = Posting::new("SRE", "Globex", "", "", "api");
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    assert!(store.mark_seen_at(&a, ts));
    assert!(store.mark_seen_at(&b, ts));
    store.save().unwrap();

    let reloaded = SeenStore::load(&path).unwrap();
    assert_eq!(reloaded.records(), store.records());
    let rec = reloaded.get(&a.dedup_id()).unwrap();
    assert_eq!(rec.url, "https://acme.test/1");
    assert_eq!(rec.source, "board");
    assert_eq!(rec.seen_at, ts);
}

#[test]
fn marking_twice_keeps_one_record_and_first_timestamp() {
    let mut store = SeenStore::in_memory();
    let p = devops("https://acme.test/2", "");
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(store.mark_seen_at(&p, first));
    assert!(!store.mark_seen(&p));
    assert!(store.is_seen(&p));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&p.dedup_id()).unwrap().seen_at, first);
}

#[test]
fn corrupt_and_blank_files() {
    let dir = tempfile::tempdir().unwrap();
    let corrupt = dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "{ not json").unwrap();
    assert!(matches!(
        SeenStore::load(&corrupt),
        Err(PersistenceError::Corrupt { .. })
    ));

    let blank = dir.path().join("blank.json");
    std::fs::write(&blank, "  \n").unwrap();
    assert!(SeenStore::load(&blank).unwrap().is_empty());
}

#[test]
fn threshold_rejection_resurfaces_after_lowering_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");
    let posting = devops("https://acme.test/3", "Kubernetes shop");

    // 1/3 keywords → 0.33
    let mut store = SeenStore::load(&path).unwrap();
    let out = pipeline(0.5).filter(&mut store, &[posting.clone()]);
    assert!(out.matches.is_empty());
    assert_eq!(out.below_threshold, 1);
    store.save().unwrap();

    let mut store = SeenStore::load(&path).unwrap();
    assert!(!store.is_seen(&posting));
    let out = pipeline(0.3).filter(&mut store, &[posting.clone()]);
    assert_eq!(out.matches.len(), 1);
    assert!((out.matches[0].relevance_score - 1.0 / 3.0).abs() < 1e-9);
    store.save().unwrap();

    // Third run: nothing new.
    let mut store = SeenStore::load(&path).unwrap();
    let out = pipeline(0.0).filter(&mut store, &[posting]);
    assert!(out.matches.is_empty());
    assert_eq!(out.already_seen, 1);
}
