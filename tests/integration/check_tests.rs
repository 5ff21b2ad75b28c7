use chrono::{DateTime, TimeZone, Utc};
use pagestamp::cache::{format_timestamp, PageCache};
use pagestamp::check::{CheckSummary, FixedClock, PageChecker};
use pagestamp::report::CheckReporter;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::{tempdir, TempDir};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, day, 8, 30, 0).unwrap()
}

/// Collects every notice the checker emits.
#[derive(Clone, Default)]
struct Recorder {
    changed: Rc<RefCell<Vec<String>>>,
    completed: Rc<RefCell<Vec<CheckSummary>>>,
}

impl CheckReporter for Recorder {
    fn on_page_changed(&self, key: &str) {
        self.changed.borrow_mut().push(key.to_string());
    }

    fn on_complete(&self, summary: &CheckSummary) {
        self.completed.borrow_mut().push(summary.clone());
    }
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn cache_path(dir: &TempDir) -> PathBuf {
    dir.path().join(".page-hashes.json")
}

fn run(dir: &TempDir, now: DateTime<Utc>) -> (CheckSummary, Recorder) {
    let recorder = Recorder::default();
    let summary = PageChecker::new(dir.path(), &dir.path().join("src"), &cache_path(dir))
        .with_clock(FixedClock(now))
        .with_reporter(Box::new(recorder.clone()))
        .run()
        .unwrap();
    (summary, recorder)
}

#[test]
fn test_three_run_scenario() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/a/page.tsx", "X");
    write(dir.path(), "src/b/page.tsx", "Y");

    // Run 1: fresh start
    let (summary, recorder) = run(&dir, at(1));
    let mut changed = recorder.changed.borrow().clone();
    changed.sort();
    assert_eq!(changed, vec!["src/a/page.tsx", "src/b/page.tsx"]);
    assert_eq!(summary.pages, 2);
    let first_bytes = fs::read(cache_path(&dir)).unwrap();
    let first = PageCache::load(&cache_path(&dir)).unwrap();
    assert_eq!(first.len(), 2);

    // Run 2: no edits, byte-identical cache, nothing reported
    let (summary, recorder) = run(&dir, at(2));
    assert!(recorder.changed.borrow().is_empty());
    assert_eq!(summary.unchanged, 2);
    assert_eq!(fs::read(cache_path(&dir)).unwrap(), first_bytes);

    // Run 3: only a/page.tsx changes
    write(dir.path(), "src/a/page.tsx", "Z");
    let (summary, recorder) = run(&dir, at(3));
    assert_eq!(*recorder.changed.borrow(), vec!["src/a/page.tsx"]);
    assert_eq!(summary.unchanged, 1);

    let third = PageCache::load(&cache_path(&dir)).unwrap();
    let a = third.get("src/a/page.tsx").unwrap();
    assert_eq!(a.last_changed(), Some(format_timestamp(at(3)).as_str()));
    assert_ne!(a.hash(), first.get("src/a/page.tsx").unwrap().hash());
    assert_eq!(third.get("src/b/page.tsx"), first.get("src/b/page.tsx"));
}

#[test]
fn test_completion_notice_emitted_once() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "home");

    let (summary, recorder) = run(&dir, at(1));

    let completed = recorder.completed.borrow();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0], summary);
}

#[test]
fn test_discovery_scope() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "root");
    write(dir.path(), "src/a/b/c/d/e/page.tsx", "deep");
    write(dir.path(), "src/a/page.jsx", "jsx");
    write(dir.path(), "src/a/layout.tsx", "layout");
    write(dir.path(), "src/a/PAGE.TSX", "upper");
    write(dir.path(), "src/a/my-page.tsx", "prefixed");
    write(dir.path(), "page.tsx", "outside root");

    run(&dir, at(1));

    let cache = PageCache::load(&cache_path(&dir)).unwrap();
    let keys: Vec<_> = cache.keys().collect();
    assert_eq!(keys, vec!["src/a/b/c/d/e/page.tsx", "src/page.tsx"]);
}

#[test]
fn test_pruning_of_deleted_directory() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/keep/page.tsx", "keep");
    write(dir.path(), "src/drop/page.tsx", "drop");
    write(dir.path(), "src/drop/nested/page.tsx", "drop too");
    run(&dir, at(1));

    fs::remove_dir_all(dir.path().join("src/drop")).unwrap();
    let (summary, _) = run(&dir, at(2));

    assert_eq!(
        summary.removed,
        vec!["src/drop/nested/page.tsx", "src/drop/page.tsx"]
    );
    let cache = PageCache::load(&cache_path(&dir)).unwrap();
    assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["src/keep/page.tsx"]);
}

#[test]
fn test_prior_entries_from_other_roots_are_dropped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "home");
    fs::write(
        cache_path(&dir),
        r#"{
  "app/page.tsx": { "hash": "abc", "lastChanged": "2020-01-01T00:00:00.000Z" }
}
"#,
    )
    .unwrap();

    let (summary, _) = run(&dir, at(1));

    assert_eq!(summary.removed, vec!["app/page.tsx"]);
    let cache = PageCache::load(&cache_path(&dir)).unwrap();
    assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["src/page.tsx"]);
}

#[test]
fn test_foreign_timestamp_format_carried_forward() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "home");
    let hash = pagestamp::scanner::hash_bytes(b"home");
    fs::write(
        cache_path(&dir),
        format!(r#"{{"src/page.tsx":{{"hash":"{hash}","lastChanged":"2019-06-01T12:00:00+02:00"}}}}"#),
    )
    .unwrap();

    run(&dir, at(1));

    let cache = PageCache::load(&cache_path(&dir)).unwrap();
    assert_eq!(
        cache.get("src/page.tsx").unwrap().last_changed(),
        Some("2019-06-01T12:00:00+02:00")
    );
}

#[test]
fn test_root_outside_working_directory() {
    let site = tempdir().unwrap();
    let pages = tempdir().unwrap();
    write(pages.path(), "blog/page.tsx", "post");

    let cache = site.path().join(".page-hashes.json");
    PageChecker::new(site.path(), pages.path(), &cache)
        .with_clock(FixedClock(at(1)))
        .run()
        .unwrap();

    let loaded = PageCache::load(&cache).unwrap();
    let key = loaded.keys().next().unwrap().to_string();
    assert!(key.starts_with(".."), "unexpected key {key}");
    assert!(key.ends_with("blog/page.tsx"));
}

#[test]
fn test_empty_root_writes_empty_cache() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();

    let (summary, _) = run(&dir, at(1));

    assert_eq!(summary.pages, 0);
    assert_eq!(fs::read_to_string(cache_path(&dir)).unwrap(), "{}\n");
}

#[cfg(target_os = "linux")]
#[test]
fn test_pages_differing_only_in_unicode_form_are_distinct() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/caf\u{e9}/page.tsx", "X");
    write(dir.path(), "src/cafe\u{301}/page.tsx", "Y");

    let (summary, recorder) = run(&dir, at(1));
    assert_eq!(summary.pages, 2);
    assert_eq!(recorder.changed.borrow().len(), 2);
    let cache = PageCache::load(&cache_path(&dir)).unwrap();
    assert_eq!(cache.len(), 2);

    for day in [2, 3] {
        let (summary, recorder) = run(&dir, at(day));
        assert!(recorder.changed.borrow().is_empty(), "run on day {day}");
        assert_eq!(summary.unchanged, 2);
        assert!(summary.removed.is_empty());
    }
}

#[test]
fn test_extra_record_fields_carried_forward() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "home");
    let hash = pagestamp::scanner::hash_bytes(b"home");
    let original = format!(
        "{{\n  \"src/page.tsx\": {{\n    \"hash\": \"{hash}\",\n    \"lastChanged\": \"2020-01-01T00:00:00.000Z\",\n    \"reviewedBy\": \"sam\"\n  }}\n}}\n"
    );
    fs::write(cache_path(&dir), &original).unwrap();

    let (summary, recorder) = run(&dir, at(1));

    assert!(recorder.changed.borrow().is_empty());
    assert_eq!(summary.unchanged, 1);
    assert_eq!(fs::read_to_string(cache_path(&dir)).unwrap(), original);
}

#[test]
fn test_record_missing_last_changed_carried_forward() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "home");
    let hash = pagestamp::scanner::hash_bytes(b"home");
    fs::write(
        cache_path(&dir),
        format!(r#"{{"src/page.tsx":{{"hash":"{hash}"}}}}"#),
    )
    .unwrap();

    let (summary, recorder) = run(&dir, at(1));

    assert!(recorder.changed.borrow().is_empty());
    assert_eq!(summary.unchanged, 1);
    let record = PageCache::load(&cache_path(&dir)).unwrap();
    let record = record.get("src/page.tsx").unwrap();
    assert_eq!(record.hash(), Some(hash.as_str()));
    assert_eq!(record.last_changed(), None);
}

#[test]
fn test_stale_non_record_value_dropped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "home");
    fs::write(cache_path(&dir), r#"{"src/other.tsx": 5}"#).unwrap();

    let (summary, recorder) = run(&dir, at(1));

    assert_eq!(*recorder.changed.borrow(), vec!["src/page.tsx"]);
    assert_eq!(summary.removed, vec!["src/other.tsx"]);
    let cache = PageCache::load(&cache_path(&dir)).unwrap();
    assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["src/page.tsx"]);
}

#[test]
fn test_record_with_non_string_hash_is_replaced() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/page.tsx", "home");
    fs::write(cache_path(&dir), r#"{"src/page.tsx": {"hash": 5}}"#).unwrap();

    let (summary, recorder) = run(&dir, at(1));

    assert_eq!(*recorder.changed.borrow(), vec!["src/page.tsx"]);
    assert_eq!(summary.unchanged, 0);
    let cache = PageCache::load(&cache_path(&dir)).unwrap();
    let record = cache.get("src/page.tsx").unwrap();
    assert_eq!(
        record.hash(),
        Some(pagestamp::scanner::hash_bytes(b"home").as_str())
    );
    assert_eq!(record.last_changed(), Some(format_timestamp(at(1)).as_str()));
}
