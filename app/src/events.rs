//! Intents emitted by the presentation layer and the views handed back.
//!
//! Presentation never calls into the gateway, store or accounts directly:
//! it sends an [`Intent`] to the controller and renders the [`View`].

use local_accounts::SessionUser;
use quran_client::Reciter;
use quran_client::api::{Chapter, ChapterView, Verse};
use reader_store::backup::ImportSummary;
use reader_store::{BookmarkKind, Theme};
use serde::Serialize;

use crate::audio::PlaybackHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ListChapters,
    NavigateToChapter(u16),
    ToggleChapterBookmark(u16),
    ToggleVerseBookmark { chapter: u16, verse: u16 },
    Search(String),
    /// Search inside the open chapter.
    SearchInChapter(String),
    PlayVerseAudio { chapter: u16, verse: u16 },
    StopAudio,
    SelectReciter(String),
    ToggleTheme,
    ToggleSidebar,
    SubmitLogin { username: String, password: String },
    SubmitRegister { username: String, password: String },
    Logout,
    ExportData,
    ImportData(String),
}

impl Intent {
    /// Variant name, for logs. Never includes credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListChapters => "list_chapters",
            Self::NavigateToChapter(_) => "navigate_to_chapter",
            Self::ToggleChapterBookmark(_) => "toggle_chapter_bookmark",
            Self::ToggleVerseBookmark { .. } => "toggle_verse_bookmark",
            Self::Search(_) => "search",
            Self::SearchInChapter(_) => "search_in_chapter",
            Self::PlayVerseAudio { .. } => "play_verse_audio",
            Self::StopAudio => "stop_audio",
            Self::SelectReciter(_) => "select_reciter",
            Self::ToggleTheme => "toggle_theme",
            Self::ToggleSidebar => "toggle_sidebar",
            Self::SubmitLogin { .. } => "submit_login",
            Self::SubmitRegister { .. } => "submit_register",
            Self::Logout => "logout",
            Self::ExportData => "export_data",
            Self::ImportData(_) => "import_data",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterPage {
    pub view: ChapterView,
    pub chapter_bookmarked: bool,
    pub bookmarked_verses: Vec<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Chapters {
        chapters: Vec<Chapter>,
    },
    Chapter(Box<ChapterPage>),
    Bookmark {
        kind: BookmarkKind,
        id: String,
        bookmarked: bool,
    },
    ChapterResults {
        query: String,
        chapters: Vec<Chapter>,
    },
    VerseResults {
        chapter: u16,
        query: String,
        verses: Vec<Verse>,
    },
    Playing(PlaybackHandle),
    Stopped {
        handle: Option<PlaybackHandle>,
    },
    Reciter {
        reciter: Reciter,
    },
    Theme {
        theme: Theme,
    },
    Sidebar {
        open: bool,
    },
    Session {
        user: Option<SessionUser>,
    },
    Exported {
        json: String,
    },
    Imported(ImportSummary),
    /// A navigation finished after a newer one had started; drop it.
    Stale {
        chapter: u16,
    },
}
