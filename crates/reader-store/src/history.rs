//! Reading history: one entry per chapter, newest first, capped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bookmarks::ChapterSummary;
use crate::{Database, keys};

/// Maximum number of history entries kept.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub chapter: u16,
    pub name: String,
    pub name_latin: String,
    pub visited_at: DateTime<Utc>,
}

/// Move `chapter` to the front of `history`, dropping its stale entry and
/// anything past [`MAX_HISTORY`].
pub(crate) fn push_front(
    history: &mut Vec<HistoryEntry>,
    chapter: &ChapterSummary,
    now: DateTime<Utc>,
) {
    history.retain(|e| e.chapter != chapter.number);
    history.insert(
        0,
        HistoryEntry {
            chapter: chapter.number,
            name: chapter.name.clone(),
            name_latin: chapter.name_latin.clone(),
            visited_at: now,
        },
    );
    history.truncate(MAX_HISTORY);
}

impl Database {
    /// Reading history, most recent first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.get_json(keys::HISTORY).unwrap_or_default()
    }

    /// Record a visit to `chapter`.
    pub fn record_visit(&self, chapter: &ChapterSummary) -> bool {
        self.record_visit_at(chapter, Utc::now())
    }

    pub fn record_visit_at(&self, chapter: &ChapterSummary, now: DateTime<Utc>) -> bool {
        let mut history = self.history();
        push_front(&mut history, chapter, now);
        self.set_json(keys::HISTORY, &history)
    }

    pub fn clear_history(&self) -> bool {
        self.remove(keys::HISTORY)
    }
}
