use crate::bookmarks::{ChapterSummary, VerseSnapshot};
use crate::Database;

fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to create test DB")
}

fn chapter(number: u16, name_latin: &str) -> ChapterSummary {
    ChapterSummary {
        number,
        name: format!("سورة {number}"),
        name_latin: name_latin.into(),
        verse_count: 7,
        revelation_place: "Mekah".into(),
        meaning: String::new(),
    }
}

fn verse(chapter: u16, verse: u16, translation: &str) -> VerseSnapshot {
    VerseSnapshot {
        chapter,
        chapter_name: "Al-Fatihah".into(),
        verse,
        arabic: "بِسْمِ اللّٰهِ".into(),
        latin: "Bismillāh".into(),
        translation: translation.into(),
    }
}

mod backup;
mod core;
mod history;
