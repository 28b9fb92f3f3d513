//! Export / import and backup / restore of reader data.
//!
//! Two envelope shapes are supported:
//!
//! - export: `{bookmarks, history, settings, theme, exportDate, version}`
//! - backup: `{data: {bookmarks, history, settings, theme}, metadata: {createdAt, version}}`
//!
//! Payloads are validated completely before anything is written, and the
//! write itself is a single transaction.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bookmarks::Bookmarks;
use crate::history::{HistoryEntry, MAX_HISTORY};
use crate::settings::ReaderSettings;
use crate::theme::Theme;
use crate::{Database, DbError, keys};

/// Format version written into exports and backups.
pub const DATA_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub bookmarks: Bookmarks,
    pub history: Vec<HistoryEntry>,
    pub settings: ReaderSettings,
    pub theme: Theme,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupData {
    pub bookmarks: Bookmarks,
    pub history: Vec<HistoryEntry>,
    pub settings: ReaderSettings,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub created_at: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEnvelope {
    pub data: BackupData,
    pub metadata: BackupMetadata,
}

/// What an import or restore applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub bookmarks: usize,
    pub history: Option<usize>,
    pub settings: bool,
    pub theme: Option<Theme>,
}

/// Validated payload ready to be written. Optional categories absent from
/// the payload keep their current stored value.
struct Snapshot {
    bookmarks: Bookmarks,
    history: Option<Vec<HistoryEntry>>,
    settings: Option<ReaderSettings>,
    theme: Option<Theme>,
}

fn format_err(msg: impl Into<String>) -> DbError {
    DbError::Format(msg.into())
}

fn present<'a>(obj: &'a Value, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

/// Validate the category fields of an export body or a backup `data` object.
fn parse_categories(obj: &Value) -> Result<Snapshot, DbError> {
    let bookmarks = present(obj, "bookmarks").ok_or_else(|| format_err("missing bookmarks"))?;
    let mut bookmarks: Bookmarks = serde_json::from_value(bookmarks.clone())
        .map_err(|e| format_err(format!("invalid bookmarks: {e}")))?;
    dedup_bookmarks(&mut bookmarks);

    let history = present(obj, "history")
        .map(|v| {
            serde_json::from_value::<Vec<HistoryEntry>>(v.clone())
                .map_err(|e| format_err(format!("invalid history: {e}")))
        })
        .transpose()?
        .map(normalize_history);

    let settings = match present(obj, "settings") {
        Some(v) if v.is_object() => Some(ReaderSettings::merged_from_value(v.clone())),
        Some(_) => return Err(format_err("settings must be an object")),
        None => None,
    };

    let theme = present(obj, "theme")
        .map(|v| {
            v.as_str()
                .ok_or_else(|| format_err("theme must be a string"))?
                .parse::<Theme>()
                .map_err(format_err)
        })
        .transpose()?;

    Ok(Snapshot {
        bookmarks,
        history,
        settings,
        theme,
    })
}

/// Keep the first bookmark per chapter and per verse id.
fn dedup_bookmarks(bookmarks: &mut Bookmarks) {
    let mut chapters = HashSet::new();
    bookmarks.surat.retain(|b| chapters.insert(b.chapter.number));
    let mut verses = HashSet::new();
    bookmarks.ayat.retain(|b| verses.insert(b.verse.id()));
}

/// Newest first, one entry per chapter, capped at [`MAX_HISTORY`].
fn normalize_history(mut history: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    history.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
    let mut seen = HashSet::new();
    history.retain(|e| seen.insert(e.chapter));
    history.truncate(MAX_HISTORY);
    history
}

fn parse_json(raw: &str) -> Result<Value, DbError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| format_err(format!("not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(format_err("payload must be a JSON object"));
    }
    Ok(value)
}

fn require_version(obj: &Value) -> Result<(), DbError> {
    present(obj, "version")
        .map(|_| ())
        .ok_or_else(|| format_err("missing version"))
}

impl Database {
    pub fn export_data(&self) -> ExportEnvelope {
        ExportEnvelope {
            bookmarks: self.list_bookmarks(),
            history: self.history(),
            settings: self.settings(),
            theme: self.theme(),
            export_date: Utc::now(),
            version: DATA_FORMAT_VERSION.into(),
        }
    }

    /// Export as pretty-printed JSON.
    pub fn export_json(&self) -> Option<String> {
        serde_json::to_string_pretty(&self.export_data())
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to serialize export"))
            .ok()
    }

    /// Import an export envelope. Nothing is written unless the whole
    /// payload is valid.
    pub fn import_data(&self, raw: &str) -> Result<ImportSummary, DbError> {
        let value = parse_json(raw)?;
        require_version(&value)?;
        let snapshot = parse_categories(&value)?;
        let summary = self.apply_snapshot(snapshot)?;
        tracing::info!(bookmarks = summary.bookmarks, "Imported reader data");
        Ok(summary)
    }

    pub fn create_backup(&self) -> BackupEnvelope {
        BackupEnvelope {
            data: BackupData {
                bookmarks: self.list_bookmarks(),
                history: self.history(),
                settings: self.settings(),
                theme: self.theme(),
            },
            metadata: BackupMetadata {
                created_at: Utc::now(),
                version: DATA_FORMAT_VERSION.into(),
            },
        }
    }

    pub fn backup_json(&self) -> Option<String> {
        serde_json::to_string_pretty(&self.create_backup())
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to serialize backup"))
            .ok()
    }

    /// Restore a backup envelope, all-or-nothing.
    pub fn restore_backup(&self, raw: &str) -> Result<ImportSummary, DbError> {
        let value = parse_json(raw)?;
        let metadata = present(&value, "metadata").ok_or_else(|| format_err("missing metadata"))?;
        require_version(metadata)?;
        let data = present(&value, "data").ok_or_else(|| format_err("missing data"))?;
        let snapshot = parse_categories(data)?;
        let summary = self.apply_snapshot(snapshot)?;
        tracing::info!(bookmarks = summary.bookmarks, "Restored reader backup");
        Ok(summary)
    }

    fn apply_snapshot(&self, snapshot: Snapshot) -> Result<ImportSummary, DbError> {
        let mut entries: Vec<(&str, String)> = Vec::with_capacity(4);
        let mut summary = ImportSummary {
            bookmarks: snapshot.bookmarks.len(),
            ..Default::default()
        };

        entries.push((keys::BOOKMARKS, serde_json::to_string(&snapshot.bookmarks)?));
        if let Some(history) = &snapshot.history {
            entries.push((keys::HISTORY, serde_json::to_string(history)?));
            summary.history = Some(history.len());
        }
        if let Some(settings) = &snapshot.settings {
            entries.push((keys::SETTINGS, serde_json::to_string(settings)?));
            summary.settings = true;
        }
        if let Some(theme) = snapshot.theme {
            entries.push((keys::THEME, serde_json::to_string(&theme)?));
            summary.theme = Some(theme);
        }

        self.write_all(&entries)?;
        Ok(summary)
    }

    /// Remove bookmarks, history, settings and theme. Accounts and the
    /// session are left alone.
    pub fn clear_all_data(&self) -> bool {
        self.remove_all(&[keys::BOOKMARKS, keys::HISTORY, keys::SETTINGS, keys::THEME])
    }
}
