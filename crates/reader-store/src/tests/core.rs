use super::test_db;
use crate::keys;

#[test]
fn test_open_and_migrate() {
    let db = test_db();
    assert!(db.keys().is_empty());
}

#[test]
fn test_json_crud() {
    let db = test_db();
    assert!(db.set_json("k", &vec![1, 2, 3]));
    assert_eq!(db.get_json::<Vec<i32>>("k"), Some(vec![1, 2, 3]));

    assert!(db.set_json("k", &vec![4]));
    assert_eq!(db.get_json::<Vec<i32>>("k"), Some(vec![4]));

    assert!(db.remove("k"));
    assert_eq!(db.get_json::<Vec<i32>>("k"), None);
    // Removing a missing key is not an error.
    assert!(db.remove("k"));
}

#[test]
fn test_type_mismatch_reads_as_none() {
    let db = test_db();
    assert!(db.set_json("k", &"text"));
    assert_eq!(db.get_json::<Vec<i32>>("k"), None);
    assert_eq!(db.get_raw("k").as_deref(), Some("\"text\""));
}

#[test]
fn test_corrupt_key_does_not_affect_others() {
    let db = test_db();
    assert!(db.set_theme(crate::Theme::Dark));
    assert!(db.set_raw(keys::BOOKMARKS, "{not json"));

    assert!(db.list_bookmarks().is_empty());
    assert_eq!(db.theme(), crate::Theme::Dark);
    assert!(db.history().is_empty());
}

#[test]
fn test_file_backed_database_persists() {
    let dir = std::env::temp_dir().join(format!("reader-store-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("local.db");
    let _ = std::fs::remove_file(&path);

    {
        let db = crate::Database::open(&path).unwrap();
        assert!(db.set_theme_str("dark"));
    }
    let reopened = crate::Database::open(&path).unwrap();
    assert_eq!(reopened.theme(), crate::Theme::Dark);

    drop(reopened);
    let _ = std::fs::remove_dir_all(&dir);
}
