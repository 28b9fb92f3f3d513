//! Reading statistics derived from bookmarks and history.

use serde::Serialize;

use crate::Database;
use crate::history::HistoryEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostVisited {
    pub chapter: u16,
    pub name_latin: String,
    pub visits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingStats {
    pub chapter_bookmarks: usize,
    pub verse_bookmarks: usize,
    pub total_bookmarks: usize,
    pub history_entries: usize,
    pub most_visited: Option<MostVisited>,
    pub last_activity: Option<HistoryEntry>,
}

/// Chapter with the most history entries; ties go to the chapter seen
/// first while scanning from the newest entry.
pub fn most_visited(history: &[HistoryEntry]) -> Option<MostVisited> {
    let mut counts: Vec<(&HistoryEntry, usize)> = Vec::new();
    for entry in history {
        match counts.iter_mut().find(|(e, _)| e.chapter == entry.chapter) {
            Some((_, n)) => *n += 1,
            None => counts.push((entry, 1)),
        }
    }

    let mut best: Option<(&HistoryEntry, usize)> = None;
    for (entry, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((entry, n));
        }
    }

    best.map(|(entry, visits)| MostVisited {
        chapter: entry.chapter,
        name_latin: entry.name_latin.clone(),
        visits,
    })
}

impl Database {
    pub fn stats(&self) -> ReadingStats {
        let bookmarks = self.list_bookmarks();
        let history = self.history();

        ReadingStats {
            chapter_bookmarks: bookmarks.surat.len(),
            verse_bookmarks: bookmarks.ayat.len(),
            total_bookmarks: bookmarks.len(),
            history_entries: history.len(),
            most_visited: most_visited(&history),
            last_activity: history.first().cloned(),
        }
    }
}
