//! Chapter and verse bookmarks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Database, keys};

/// Snapshot of a chapter's summary fields, as stored in bookmarks and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub number: u16,
    pub name: String,
    pub name_latin: String,
    pub verse_count: u16,
    #[serde(default)]
    pub revelation_place: String,
    #[serde(default)]
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterBookmark {
    #[serde(flatten)]
    pub chapter: ChapterSummary,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a verse and the chapter it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseSnapshot {
    pub chapter: u16,
    pub chapter_name: String,
    pub verse: u16,
    #[serde(default)]
    pub arabic: String,
    #[serde(default)]
    pub latin: String,
    #[serde(default)]
    pub translation: String,
}

impl VerseSnapshot {
    /// Bookmark identifier, `"{chapter}-{verse}"`.
    pub fn id(&self) -> String {
        verse_id(self.chapter, self.verse)
    }
}

/// Build the `"{chapter}-{verse}"` identifier used for verse bookmarks.
pub fn verse_id(chapter: u16, verse: u16) -> String {
    format!("{chapter}-{verse}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseBookmark {
    #[serde(flatten)]
    pub verse: VerseSnapshot,
    pub created_at: DateTime<Utc>,
}

/// All bookmarks, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmarks {
    #[serde(default)]
    pub surat: Vec<ChapterBookmark>,
    #[serde(default)]
    pub ayat: Vec<VerseBookmark>,
}

impl Bookmarks {
    pub fn len(&self) -> usize {
        self.surat.len() + self.ayat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surat.is_empty() && self.ayat.is_empty()
    }

    pub fn contains(&self, kind: BookmarkKind, id: &str) -> bool {
        match kind {
            BookmarkKind::Surat => parse_chapter_id(id)
                .is_some_and(|n| self.surat.iter().any(|b| b.chapter.number == n)),
            BookmarkKind::Ayat => self.ayat.iter().any(|b| b.verse.id() == id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    Surat,
    Ayat,
}

impl BookmarkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Surat => "surat",
            Self::Ayat => "ayat",
        }
    }
}

impl fmt::Display for BookmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "surat" => Ok(Self::Surat),
            "ayat" => Ok(Self::Ayat),
            other => Err(format!("unknown bookmark kind: {other}")),
        }
    }
}

fn parse_chapter_id(id: &str) -> Option<u16> {
    id.trim().parse().ok()
}

impl Database {
    pub fn list_bookmarks(&self) -> Bookmarks {
        self.get_json(keys::BOOKMARKS).unwrap_or_default()
    }

    /// Bookmark a chapter. Returns `false` if it was already bookmarked or
    /// the write failed.
    pub fn add_chapter_bookmark(&self, chapter: &ChapterSummary) -> bool {
        let mut bookmarks = self.list_bookmarks();
        if bookmarks.surat.iter().any(|b| b.chapter.number == chapter.number) {
            tracing::debug!(chapter = chapter.number, "Chapter already bookmarked");
            return false;
        }
        bookmarks.surat.push(ChapterBookmark {
            chapter: chapter.clone(),
            created_at: Utc::now(),
        });
        self.set_json(keys::BOOKMARKS, &bookmarks)
    }

    /// Bookmark a verse. Returns `false` if it was already bookmarked or
    /// the write failed.
    pub fn add_verse_bookmark(&self, verse: &VerseSnapshot) -> bool {
        let mut bookmarks = self.list_bookmarks();
        let id = verse.id();
        if bookmarks.ayat.iter().any(|b| b.verse.id() == id) {
            tracing::debug!(verse = %id, "Verse already bookmarked");
            return false;
        }
        bookmarks.ayat.push(VerseBookmark {
            verse: verse.clone(),
            created_at: Utc::now(),
        });
        self.set_json(keys::BOOKMARKS, &bookmarks)
    }

    /// Remove a bookmark by kind and identifier (`"2"` for chapters,
    /// `"2-255"` for verses). Returns `false` when nothing was removed.
    pub fn remove_bookmark(&self, kind: BookmarkKind, id: &str) -> bool {
        let mut bookmarks = self.list_bookmarks();
        let before = bookmarks.len();

        match kind {
            BookmarkKind::Surat => {
                let Some(number) = parse_chapter_id(id) else {
                    tracing::warn!(id, "Invalid chapter bookmark id");
                    return false;
                };
                bookmarks.surat.retain(|b| b.chapter.number != number);
            }
            BookmarkKind::Ayat => bookmarks.ayat.retain(|b| b.verse.id() != id),
        }

        if bookmarks.len() == before {
            return false;
        }
        self.set_json(keys::BOOKMARKS, &bookmarks)
    }

    pub fn is_bookmarked(&self, kind: BookmarkKind, id: &str) -> bool {
        self.list_bookmarks().contains(kind, id)
    }

    /// Case-insensitive search over bookmarked names, text and translations.
    pub fn search_bookmarks(&self, query: &str) -> Bookmarks {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Bookmarks::default();
        }
        let hit = |field: &str| field.to_lowercase().contains(&needle);

        let bookmarks = self.list_bookmarks();
        Bookmarks {
            surat: bookmarks
                .surat
                .into_iter()
                .filter(|b| {
                    hit(&b.chapter.name)
                        || hit(&b.chapter.name_latin)
                        || hit(&b.chapter.meaning)
                        || b.chapter.number.to_string() == needle
                })
                .collect(),
            ayat: bookmarks
                .ayat
                .into_iter()
                .filter(|b| {
                    hit(&b.verse.chapter_name)
                        || hit(&b.verse.arabic)
                        || hit(&b.verse.latin)
                        || hit(&b.verse.translation)
                        || b.verse.id() == needle
                })
                .collect(),
        }
    }

    pub fn clear_bookmarks(&self) -> bool {
        self.remove(keys::BOOKMARKS)
    }
}
