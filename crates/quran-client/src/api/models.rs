use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Wire types (upstream field names)
// ---------------------------------------------------------------------------

/// Envelope wrapping every upstream response: `{code, message, data}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawChapter {
    pub nomor: u16,
    pub nama: String,
    pub nama_latin: String,
    pub jumlah_ayat: u16,
    #[serde(default)]
    pub tempat_turun: String,
    #[serde(default)]
    pub arti: String,
    #[serde(default)]
    pub deskripsi: String,
    #[serde(default)]
    pub audio_full: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawVerse {
    pub nomor_ayat: u16,
    #[serde(default)]
    pub teks_arab: String,
    #[serde(default)]
    pub teks_latin: String,
    #[serde(default)]
    pub teks_indonesia: String,
    #[serde(default)]
    pub audio: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAdjacent {
    pub nomor: u16,
    pub nama: String,
    pub nama_latin: String,
    pub jumlah_ayat: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawChapterDetail {
    #[serde(flatten)]
    pub chapter: RawChapter,
    #[serde(default)]
    pub ayat: Vec<RawVerse>,
    #[serde(default, deserialize_with = "object_or_false")]
    pub surat_sebelumnya: Option<RawAdjacent>,
    #[serde(default, deserialize_with = "object_or_false")]
    pub surat_selanjutnya: Option<RawAdjacent>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCommentaryEntry {
    pub ayat: u16,
    #[serde(default)]
    pub teks: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCommentary {
    #[serde(default)]
    pub tafsir: Vec<RawCommentaryEntry>,
}

/// The upstream sends `false` instead of `null` for "no adjacent chapter".
fn object_or_false<'de, D>(deserializer: D) -> Result<Option<RawAdjacent>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_object() {
        serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom)
    } else {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Normalized types
// ---------------------------------------------------------------------------

/// A chapter (surah) summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u16,
    /// Name in Arabic script.
    pub name: String,
    pub name_latin: String,
    pub verse_count: u16,
    /// Revelation place tag, e.g. "Mekah" or "Madinah".
    pub revelation_place: String,
    /// Short gloss of the name.
    pub meaning: String,
    pub description: String,
    /// Reciter key -> full-chapter audio URL.
    pub full_audio: BTreeMap<String, String>,
}

/// A single verse (ayah).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub number: u16,
    pub arabic: String,
    pub latin: String,
    pub translation: String,
    /// Reciter key -> verse audio URL.
    pub audio: BTreeMap<String, String>,
}

/// Reference to a neighbouring chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentChapter {
    pub number: u16,
    pub name: String,
    pub name_latin: String,
    pub verse_count: u16,
}

/// A chapter together with all its verses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDetail {
    pub chapter: Chapter,
    pub verses: Vec<Verse>,
    pub previous: Option<AdjacentChapter>,
    pub next: Option<AdjacentChapter>,
}

impl ChapterDetail {
    pub fn verse(&self, number: u16) -> Option<&Verse> {
        self.verses.iter().find(|v| v.number == number)
    }

    /// Whether verse numbers run exactly `1..=verse_count` without gaps.
    pub fn is_contiguous(&self) -> bool {
        self.verses.len() == usize::from(self.chapter.verse_count)
            && self
                .verses
                .iter()
                .zip(1u16..)
                .all(|(verse, expected)| verse.number == expected)
    }
}

/// Commentary (tafsir) for one verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryEntry {
    pub verse: u16,
    pub text: String,
}

/// A chapter joined with its commentary, reconciled by verse number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterView {
    pub detail: ChapterDetail,
    pub commentary: Vec<CommentaryEntry>,
}

impl ChapterView {
    pub fn new(detail: ChapterDetail, commentary: Vec<CommentaryEntry>) -> Self {
        Self { detail, commentary }
    }

    /// Commentary for a verse. Missing entries are normal and yield `None`.
    pub fn commentary_for(&self, verse: u16) -> Option<&str> {
        self.commentary
            .iter()
            .find(|entry| entry.verse == verse)
            .map(|entry| entry.text.as_str())
    }

    /// Verse numbers that have no commentary entry.
    pub fn verses_without_commentary(&self) -> Vec<u16> {
        self.detail
            .verses
            .iter()
            .map(|v| v.number)
            .filter(|n| self.commentary_for(*n).is_none())
            .collect()
    }
}

/// Result of a partial-failure-tolerant batch fetch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub chapters: Vec<ChapterDetail>,
    pub failures: Vec<(u16, crate::QuranError)>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<RawChapter> for Chapter {
    fn from(raw: RawChapter) -> Self {
        Self {
            number: raw.nomor,
            name: raw.nama,
            name_latin: raw.nama_latin,
            verse_count: raw.jumlah_ayat,
            revelation_place: raw.tempat_turun,
            meaning: raw.arti,
            description: raw.deskripsi,
            full_audio: raw.audio_full,
        }
    }
}

impl From<RawVerse> for Verse {
    fn from(raw: RawVerse) -> Self {
        Self {
            number: raw.nomor_ayat,
            arabic: raw.teks_arab,
            latin: raw.teks_latin,
            translation: raw.teks_indonesia,
            audio: raw.audio,
        }
    }
}

impl From<RawAdjacent> for AdjacentChapter {
    fn from(raw: RawAdjacent) -> Self {
        Self {
            number: raw.nomor,
            name: raw.nama,
            name_latin: raw.nama_latin,
            verse_count: raw.jumlah_ayat,
        }
    }
}

impl From<RawChapterDetail> for ChapterDetail {
    fn from(raw: RawChapterDetail) -> Self {
        let mut verses: Vec<Verse> = raw.ayat.into_iter().map(Verse::from).collect();
        verses.sort_by_key(|v| v.number);
        Self {
            chapter: raw.chapter.into(),
            verses,
            previous: raw.surat_sebelumnya.map(Into::into),
            next: raw.surat_selanjutnya.map(Into::into),
        }
    }
}

impl From<RawCommentaryEntry> for CommentaryEntry {
    fn from(raw: RawCommentaryEntry) -> Self {
        Self {
            verse: raw.ayat,
            text: raw.teks,
        }
    }
}
