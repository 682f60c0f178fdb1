//! Unit tests for the file-backed state store

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use goldwatch::models::TrackedState;
use goldwatch::state::FileStateStore;
use std::fs;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn taiwan_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 8, 26, 10, 30, 0)
        .unwrap()
}

#[test]
fn missing_file_loads_as_absent_state() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));
    let state = store.load(date(2026, 8, 26));
    assert_eq!(state, TrackedState::default());
}

#[test]
fn corrupt_file_loads_as_absent_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{ not json at all").unwrap();

    let store = FileStateStore::new(&path);
    let state = store.load(date(2026, 8, 26));
    assert_eq!(state, TrackedState::default());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));

    let now = taiwan_now();
    let today = now.date_naive();
    let mut state = TrackedState::default();
    state.observe(2345.67, now, today);
    state.mark_reported(now, today);

    store.save(&state).unwrap();
    assert_eq!(store.load(today), state);
}

#[test]
fn saving_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));

    let now = taiwan_now();
    let today = now.date_naive();
    let mut state = TrackedState::default();
    state.observe(2345.67, now, today);

    store.save(&state).unwrap();
    store.save(&state).unwrap();
    assert_eq!(store.load(today), state);
}

#[test]
fn stale_daily_date_is_dropped_on_load() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));

    let now = taiwan_now();
    let yesterday = date(2026, 8, 25);
    let mut state = TrackedState::default();
    state.observe(2345.67, now, yesterday);
    store.save(&state).unwrap();

    let loaded = store.load(date(2026, 8, 26));
    assert_eq!(loaded.daily_high, None);
    assert_eq!(loaded.daily_low, None);
    assert_eq!(loaded.daily_date, None);
    // Last price survives the day boundary; only daily extrema reset.
    assert_eq!(loaded.last_price, Some(2345.67));
}

#[test]
fn save_overwrites_rather_than_merging() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));

    let now = taiwan_now();
    let today = now.date_naive();
    let mut first = TrackedState::default();
    first.observe(2000.0, now, today);
    first.mark_reported(now, today);
    store.save(&first).unwrap();

    let mut second = TrackedState::default();
    second.observe(2100.0, now, today);
    store.save(&second).unwrap();

    let loaded = store.load(today);
    assert_eq!(loaded.last_price, Some(2100.0));
    assert_eq!(loaded.last_report_date, None);
}
