use chrono::{Duration, TimeZone, Utc};

use super::{chapter, test_db};
use crate::history::MAX_HISTORY;

#[test]
fn test_revisit_moves_entry_to_front() {
    let db = test_db();
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let x = chapter(1, "Al-Fatihah");
    let y = chapter(36, "Yasin");

    assert!(db.record_visit_at(&x, t0));
    assert!(db.record_visit_at(&y, t0 + Duration::minutes(1)));
    assert!(db.record_visit_at(&x, t0 + Duration::minutes(2)));

    let history = db.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].chapter, 1);
    assert_eq!(history[0].visited_at, t0 + Duration::minutes(2));
    assert_eq!(history[1].chapter, 36);
}

#[test]
fn test_history_is_capped() {
    let db = test_db();
    for n in 1..=114u16 {
        db.record_visit(&chapter(n, &format!("Surah {n}")));
    }

    let history = db.history();
    assert_eq!(history.len(), MAX_HISTORY);
    assert_eq!(history[0].chapter, 114);
    assert_eq!(history[MAX_HISTORY - 1].chapter, 65);
}

#[test]
fn test_clear_history() {
    let db = test_db();
    db.record_visit(&chapter(1, "Al-Fatihah"));
    assert!(db.clear_history());
    assert!(db.history().is_empty());
}
