use serde_json::json;

use super::{chapter, test_db, verse};
use crate::backup::DATA_FORMAT_VERSION;
use crate::{BookmarkKind, Database, DbError, FontSize, SettingsPatch, Theme};

fn seeded_db() -> Database {
    let db = test_db();
    db.add_chapter_bookmark(&chapter(1, "Al-Fatihah"));
    db.add_verse_bookmark(&verse(1, 1, "Dengan nama Allah"));
    db.record_visit(&chapter(1, "Al-Fatihah"));
    db.update_settings(SettingsPatch {
        font_size: Some(FontSize::Large),
        ..Default::default()
    });
    db.set_theme(Theme::Dark);
    db
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let source = seeded_db();
    let exported = source.export_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(value["version"], DATA_FORMAT_VERSION);
    assert!(value.get("exportDate").is_some());

    let target = test_db();
    let summary = target.import_data(&exported).unwrap();
    assert_eq!(summary.bookmarks, 2);
    assert_eq!(summary.history, Some(1));
    assert!(summary.settings);
    assert_eq!(summary.theme, Some(Theme::Dark));

    assert_eq!(target.list_bookmarks(), source.list_bookmarks());
    assert_eq!(target.history(), source.history());
    assert_eq!(target.settings().font_size, FontSize::Large);
    assert_eq!(target.theme(), Theme::Dark);
}

#[test]
fn test_import_missing_version_or_bookmarks_changes_nothing() {
    let db = seeded_db();
    let before = (db.list_bookmarks(), db.history(), db.settings(), db.theme());

    let no_version = json!({
        "bookmarks": {"surat": [], "ayat": []},
        "history": [],
        "theme": "light"
    });
    let no_bookmarks = json!({
        "version": "1.0",
        "history": [],
        "theme": "light"
    });

    for payload in [no_version, no_bookmarks] {
        let err = db.import_data(&payload.to_string()).unwrap_err();
        assert!(matches!(err, DbError::Format(_)));
    }

    let after = (db.list_bookmarks(), db.history(), db.settings(), db.theme());
    assert_eq!(before, after);
}

#[test]
fn test_import_rejects_invalid_category_without_partial_apply() {
    let db = seeded_db();
    let payload = json!({
        "version": "1.0",
        "bookmarks": {"surat": [], "ayat": []},
        "history": [],
        "theme": "sepia"
    });

    assert!(matches!(
        db.import_data(&payload.to_string()),
        Err(DbError::Format(_))
    ));
    assert!(db.is_bookmarked(BookmarkKind::Surat, "1"));
    assert_eq!(db.history().len(), 1);
    assert_eq!(db.theme(), Theme::Dark);
}

#[test]
fn test_import_rejects_non_json() {
    let db = test_db();
    assert!(matches!(db.import_data("not json"), Err(DbError::Format(_))));
    assert!(matches!(db.import_data("[1,2]"), Err(DbError::Format(_))));
}

#[test]
fn test_import_keeps_absent_optional_categories() {
    let db = seeded_db();
    let payload = json!({
        "version": "1.0",
        "bookmarks": {"surat": []}
    });

    let summary = db.import_data(&payload.to_string()).unwrap();
    assert_eq!(summary.bookmarks, 0);
    assert_eq!(summary.history, None);
    assert!(db.list_bookmarks().is_empty());
    assert_eq!(db.history().len(), 1);
    assert_eq!(db.theme(), Theme::Dark);
}

#[test]
fn test_backup_and_restore() {
    let source = seeded_db();
    let backup = source.backup_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&backup).unwrap();
    assert_eq!(value["metadata"]["version"], DATA_FORMAT_VERSION);
    assert!(value["metadata"].get("createdAt").is_some());
    assert!(value["data"]["bookmarks"].is_object());

    let target = test_db();
    target.restore_backup(&backup).unwrap();
    assert_eq!(target.list_bookmarks(), source.list_bookmarks());
    assert_eq!(target.theme(), Theme::Dark);
}

#[test]
fn test_restore_rejects_export_shape() {
    let source = seeded_db();
    let exported = source.export_json().unwrap();

    let target = test_db();
    assert!(matches!(
        target.restore_backup(&exported),
        Err(DbError::Format(_))
    ));
    assert!(target.list_bookmarks().is_empty());
}

#[test]
fn test_clear_all_data() {
    let db = seeded_db();
    db.set_json(crate::keys::ACCOUNTS, &json!([]));

    assert!(db.clear_all_data());
    assert!(db.list_bookmarks().is_empty());
    assert!(db.history().is_empty());
    assert_eq!(db.theme(), Theme::Light);
    assert!(db.get_raw(crate::keys::ACCOUNTS).is_some());
}

#[test]
fn test_import_normalizes_duplicate_history_and_bookmarks() {
    let db = test_db();
    let entry = |chapter: u16, minute: u32| {
        json!({
            "chapter": chapter,
            "name": format!("سورة {chapter}"),
            "name_latin": format!("Surah {chapter}"),
            "visited_at": format!("2024-03-11T08:{minute:02}:00Z")
        })
    };
    let surat = |chapter: u16| {
        json!({
            "number": chapter,
            "name": "سورة",
            "name_latin": "Al-Fatihah",
            "verse_count": 7,
            "created_at": "2024-03-11T08:00:00Z"
        })
    };
    let ayat = json!({
        "chapter": 1,
        "chapter_name": "Al-Fatihah",
        "verse": 1,
        "created_at": "2024-03-11T08:00:00Z"
    });
    let payload = json!({
        "version": "1.0",
        "bookmarks": {"surat": [surat(1), surat(1), surat(2)], "ayat": [ayat.clone(), ayat]},
        "history": [entry(1, 5), entry(2, 30), entry(1, 10)]
    });

    let summary = db.import_data(&payload.to_string()).unwrap();
    assert_eq!(summary.bookmarks, 3);
    assert_eq!(summary.history, Some(2));

    let chapters: Vec<u16> = db.history().iter().map(|e| e.chapter).collect();
    assert_eq!(chapters, vec![2, 1]);
    assert_eq!(db.history()[1].visited_at.to_rfc3339(), "2024-03-11T08:10:00+00:00");

    let bookmarks = db.list_bookmarks();
    assert_eq!(bookmarks.surat.len(), 2);
    assert_eq!(bookmarks.ayat.len(), 1);
    assert_eq!(db.stats().most_visited.map(|m| m.visits), Some(1));
}
