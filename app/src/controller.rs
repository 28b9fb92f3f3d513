//! Intent dispatch: turns presentation intents into calls on the gateway,
//! the store and the account service, and owns the transient reader state.

use std::sync::Arc;

use local_accounts::AccountError;
use quran_client::api::{Chapter, ChapterDetail};
use quran_client::{QuranError, Reciter, validate_chapter_id};
use reader_store::bookmarks::verse_id;
use reader_store::{BookmarkKind, ChapterSummary, DbError, SettingsPatch, VerseSnapshot, keys};
use tokio::sync::Mutex;

use crate::app::ReaderContext;
use crate::audio::{AudioError, AudioPlayer, AudioSink};
use crate::events::{ChapterPage, Intent, View};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Quran(#[from] QuranError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Store(#[from] DbError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("Invalid intent: {0}")]
    InvalidIntent(String),
}

impl ControllerError {
    /// Short message suitable for showing to the reader.
    pub fn user_message(&self) -> String {
        match self {
            Self::Quran(QuranError::Validation(msg)) => msg.clone(),
            Self::Quran(QuranError::NotFound(what)) => format!("{what} was not found"),
            Self::Quran(QuranError::Timeout) => "The server took too long to respond".into(),
            Self::Quran(_) => "Could not load content. Check your connection".into(),
            Self::Account(AccountError::Validation(msg)) => msg.clone(),
            Self::Account(AccountError::Conflict(_)) => "That username is already taken".into(),
            Self::Account(AccountError::NotFound(_) | AccountError::Auth(_)) => {
                "Wrong username or password".into()
            }
            Self::Account(AccountError::Forbidden(_)) => "This account is deactivated".into(),
            Self::Account(AccountError::Storage(_)) => "Could not save account data".into(),
            Self::Store(DbError::Format(msg)) => format!("Invalid file: {msg}"),
            Self::Store(_) => "Could not access local data".into(),
            Self::Audio(_) => "Audio could not be played".into(),
            Self::InvalidIntent(msg) => msg.clone(),
        }
    }
}

struct ControllerState {
    /// Last chapter whose navigation completed.
    open_chapter: Option<ChapterDetail>,
    /// Bumped on every navigation start; a result is current only if the
    /// counter has not moved since.
    navigation: u64,
    reciter: Reciter,
    query: String,
    sidebar_open: bool,
    player: AudioPlayer,
}

pub struct AppController {
    ctx: ReaderContext,
    state: Mutex<ControllerState>,
}

impl AppController {
    pub fn new(ctx: ReaderContext, sink: Arc<dyn AudioSink>) -> Self {
        let reciter = initial_reciter(&ctx);
        Self {
            ctx,
            state: Mutex::new(ControllerState {
                open_chapter: None,
                navigation: 0,
                reciter,
                query: String::new(),
                sidebar_open: false,
                player: AudioPlayer::new(sink),
            }),
        }
    }

    pub fn context(&self) -> &ReaderContext {
        &self.ctx
    }

    pub async fn reciter(&self) -> Reciter {
        self.state.lock().await.reciter
    }

    pub async fn query(&self) -> String {
        self.state.lock().await.query.clone()
    }

    pub async fn open_chapter(&self) -> Option<u16> {
        self.state
            .lock()
            .await
            .open_chapter
            .as_ref()
            .map(|d| d.chapter.number)
    }

    pub async fn dispatch(&self, intent: Intent) -> Result<View, ControllerError> {
        tracing::debug!(intent = intent.name(), "Dispatching intent");
        match intent {
            Intent::ListChapters => {
                let chapters = self.ctx.client().list_chapters().await?;
                Ok(View::Chapters { chapters })
            }
            Intent::NavigateToChapter(id) => self.navigate(id).await,
            Intent::ToggleChapterBookmark(id) => self.toggle_chapter_bookmark(id).await,
            Intent::ToggleVerseBookmark { chapter, verse } => {
                self.toggle_verse_bookmark(chapter, verse).await
            }
            Intent::Search(query) => {
                self.state.lock().await.query = query.clone();
                let chapters = self.ctx.client().search_chapters(&query).await?;
                Ok(View::ChapterResults { query, chapters })
            }
            Intent::SearchInChapter(query) => {
                let chapter = self.open_chapter().await.ok_or_else(|| {
                    ControllerError::InvalidIntent("no chapter is open".into())
                })?;
                self.state.lock().await.query = query.clone();
                let verses = self
                    .ctx
                    .client()
                    .search_verses_in_chapter(chapter, &query)
                    .await?;
                Ok(View::VerseResults {
                    chapter,
                    query,
                    verses,
                })
            }
            Intent::PlayVerseAudio { chapter, verse } => self.play_verse(chapter, verse).await,
            Intent::StopAudio => {
                let handle = self.state.lock().await.player.stop();
                Ok(View::Stopped { handle })
            }
            Intent::SelectReciter(key) => {
                let reciter: Reciter = key.parse()?;
                self.state.lock().await.reciter = reciter;
                let saved = self.ctx.db().update_settings(SettingsPatch {
                    preferred_reciter: Some(reciter.key().to_string()),
                    ..Default::default()
                });
                if !saved {
                    tracing::warn!(reciter = reciter.key(), "Reciter preference not persisted");
                }
                Ok(View::Reciter { reciter })
            }
            Intent::ToggleTheme => Ok(View::Theme {
                theme: self.ctx.db().toggle_theme(),
            }),
            Intent::ToggleSidebar => {
                let mut state = self.state.lock().await;
                state.sidebar_open = !state.sidebar_open;
                Ok(View::Sidebar {
                    open: state.sidebar_open,
                })
            }
            Intent::SubmitLogin { username, password } => {
                let user = self.ctx.accounts().login(&username, &password)?;
                Ok(View::Session { user: Some(user) })
            }
            Intent::SubmitRegister { username, password } => {
                let user = self.ctx.accounts().register(&username, &password)?;
                Ok(View::Session { user: Some(user) })
            }
            Intent::Logout => {
                self.ctx.accounts().logout();
                self.state.lock().await.player.stop();
                Ok(View::Session { user: None })
            }
            Intent::ExportData => {
                let json = self.ctx.db().export_json().ok_or_else(|| {
                    DbError::Format("export could not be serialized".into())
                })?;
                Ok(View::Exported { json })
            }
            Intent::ImportData(raw) => Ok(View::Imported(self.ctx.db().import_data(&raw)?)),
        }
    }

    async fn navigate(&self, id: u16) -> Result<View, ControllerError> {
        validate_chapter_id(id)?;
        let ticket = {
            let mut state = self.state.lock().await;
            state.navigation += 1;
            state.navigation
        };

        let view = self.ctx.client().get_chapter_view(id).await?;

        {
            let mut state = self.state.lock().await;
            if state.navigation != ticket {
                tracing::debug!(chapter = id, "Discarding superseded navigation");
                return Ok(View::Stale { chapter: id });
            }
            state.open_chapter = Some(view.detail.clone());
        }

        let chapter = &view.detail.chapter;
        if !self.ctx.db().record_visit(&chapter_summary(chapter)) {
            tracing::warn!(chapter = id, "Failed to record reading history");
        }

        let bookmarks = self.ctx.db().list_bookmarks();
        let chapter_bookmarked = bookmarks.contains(BookmarkKind::Surat, &id.to_string());
        let bookmarked_verses = bookmarks
            .ayat
            .iter()
            .filter(|b| b.verse.chapter == id)
            .map(|b| b.verse.verse)
            .collect();

        Ok(View::Chapter(Box::new(ChapterPage {
            view,
            chapter_bookmarked,
            bookmarked_verses,
        })))
    }

    async fn toggle_chapter_bookmark(&self, id: u16) -> Result<View, ControllerError> {
        validate_chapter_id(id)?;
        let db = self.ctx.db();
        let key = id.to_string();

        if db.is_bookmarked(BookmarkKind::Surat, &key) {
            db.remove_bookmark(BookmarkKind::Surat, &key);
        } else {
            let chapter = self
                .ctx
                .client()
                .list_chapters()
                .await?
                .into_iter()
                .find(|c| c.number == id)
                .ok_or_else(|| QuranError::NotFound(format!("chapter {id}")))?;
            db.add_chapter_bookmark(&chapter_summary(&chapter));
        }

        Ok(View::Bookmark {
            kind: BookmarkKind::Surat,
            bookmarked: db.is_bookmarked(BookmarkKind::Surat, &key),
            id: key,
        })
    }

    async fn toggle_verse_bookmark(
        &self,
        chapter: u16,
        verse: u16,
    ) -> Result<View, ControllerError> {
        validate_chapter_id(chapter)?;
        let db = self.ctx.db();
        let key = verse_id(chapter, verse);

        if db.is_bookmarked(BookmarkKind::Ayat, &key) {
            db.remove_bookmark(BookmarkKind::Ayat, &key);
        } else {
            let detail = self.ctx.client().get_chapter_detail(chapter).await?;
            let found = detail
                .verse(verse)
                .ok_or_else(|| QuranError::NotFound(format!("verse {key}")))?;
            db.add_verse_bookmark(&VerseSnapshot {
                chapter,
                chapter_name: detail.chapter.name_latin.clone(),
                verse,
                arabic: found.arabic.clone(),
                latin: found.latin.clone(),
                translation: found.translation.clone(),
            });
        }

        Ok(View::Bookmark {
            kind: BookmarkKind::Ayat,
            bookmarked: db.is_bookmarked(BookmarkKind::Ayat, &key),
            id: key,
        })
    }

    async fn play_verse(&self, chapter: u16, verse: u16) -> Result<View, ControllerError> {
        let reciter = self.reciter().await;
        let client = self.ctx.client();

        let url = match client
            .resolve_verse_audio_url(chapter, verse, reciter.key())
            .await
        {
            Ok(url) => url,
            Err(QuranError::NotFound(reason)) => {
                let detail = client.get_chapter_detail(chapter).await?;
                if detail.verse(verse).is_none() {
                    return Err(QuranError::NotFound(reason).into());
                }
                tracing::debug!(chapter, verse, "No direct audio URL, using CDN scheme");
                reciter.verse_audio_url(&self.ctx.config().audio_cdn, chapter, verse)
            }
            Err(e) => return Err(e.into()),
        };

        let handle = self
            .state
            .lock()
            .await
            .player
            .play(chapter, verse, reciter, url)?;
        Ok(View::Playing(handle))
    }
}

/// Stored preference first, then the configured default.
fn initial_reciter(ctx: &ReaderContext) -> Reciter {
    let configured = Reciter::from_key(&ctx.config().default_reciter);
    if ctx.db().get_raw(keys::SETTINGS).is_none() {
        return configured.unwrap_or_default();
    }
    Reciter::from_key(&ctx.db().settings().preferred_reciter)
        .or(configured)
        .unwrap_or_default()
}

fn chapter_summary(chapter: &Chapter) -> ChapterSummary {
    ChapterSummary {
        number: chapter.number,
        name: chapter.name.clone(),
        name_latin: chapter.name_latin.clone(),
        verse_count: chapter.verse_count,
        revelation_place: chapter.revelation_place.clone(),
        meaning: chapter.meaning.clone(),
    }
}
