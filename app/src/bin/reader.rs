//! Headless reader binary.
//!
//! Every subcommand is routed through the same intent controller the
//! graphical front end uses; results are printed as text or JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use quran_reader_lib::app::ReaderContext;
use quran_reader_lib::audio::NullAudioSink;
use quran_reader_lib::controller::{AppController, ControllerError};
use quran_reader_lib::events::{Intent, View};
use reader_store::Theme;

#[derive(Parser)]
#[command(name = "quran-reader", version, about = "Read the Qur'an from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List chapters, optionally filtered
    Chapters {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Print a chapter's verses
    Read {
        chapter: u16,
        /// Include commentary under each verse
        #[arg(long)]
        tafsir: bool,
    },
    /// Print commentary for a chapter or a single verse
    Tafsir { chapter: u16, verse: Option<u16> },
    /// Search chapters, or verses inside one chapter
    Search {
        query: String,
        #[arg(long, short)]
        chapter: Option<u16>,
    },
    /// Resolve the audio URL for a verse
    Audio {
        chapter: u16,
        verse: u16,
        #[arg(long, short)]
        reciter: Option<String>,
    },
    /// Toggle a chapter or verse bookmark
    Bookmark { chapter: u16, verse: Option<u16> },
    /// List bookmarks, optionally filtered
    Bookmarks { query: Option<String> },
    /// Show reading history
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Reading statistics
    Stats,
    /// Export reader data as JSON
    Export {
        path: Option<PathBuf>,
        /// Write the backup envelope instead of the export envelope
        #[arg(long)]
        backup: bool,
    },
    /// Import reader data from a JSON file
    Import {
        path: PathBuf,
        /// Read the backup envelope instead of the export envelope
        #[arg(long)]
        backup: bool,
    },
    /// Show, set or toggle the theme
    Theme {
        /// `light`, `dark` or `toggle`
        value: Option<String>,
    },
    Register { username: String, password: String },
    Login { username: String, password: String },
    Logout,
    Whoami,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (db, config, dir) = quran_reader_lib::init_foundation()?;
    let ctx = ReaderContext::new(db, config, dir)?;
    let controller = AppController::new(ctx, Arc::new(NullAudioSink));

    if let Err(e) = run(&controller, cli.command).await {
        match e.downcast_ref::<ControllerError>() {
            Some(ce) => eprintln!("error: {}", ce.user_message()),
            None => eprintln!("error: {e}"),
        }
        tracing::debug!(error = ?e, "Command failed");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(controller: &AppController, command: Command) -> anyhow::Result<()> {
    let ctx = controller.context();
    let db = ctx.db();

    match command {
        Command::Chapters { query } => {
            let intent = match query {
                Some(q) => Intent::Search(q),
                None => Intent::ListChapters,
            };
            let chapters = match controller.dispatch(intent).await? {
                View::Chapters { chapters } | View::ChapterResults { chapters, .. } => chapters,
                other => return unexpected(other),
            };
            for c in chapters {
                println!(
                    "{:>3}  {:<20} {:<24} {} ayat, {}",
                    c.number,
                    c.name_latin,
                    c.meaning,
                    c.verse_count,
                    c.revelation_place
                );
            }
        }
        Command::Read { chapter, tafsir } => {
            let View::Chapter(page) = controller
                .dispatch(Intent::NavigateToChapter(chapter))
                .await?
            else {
                anyhow::bail!("navigation was superseded");
            };
            let settings = db.settings();
            let detail = &page.view.detail;
            println!(
                "{}. {} ({}) - {}\n",
                detail.chapter.number,
                detail.chapter.name_latin,
                detail.chapter.name,
                detail.chapter.meaning
            );
            for verse in &detail.verses {
                let mark = if page.bookmarked_verses.contains(&verse.number) {
                    "*"
                } else {
                    " "
                };
                println!("{mark}[{}] {}", verse.number, verse.arabic);
                if settings.show_transliteration {
                    println!("     {}", verse.latin);
                }
                if settings.show_translation {
                    println!("     {}", verse.translation);
                }
                if tafsir {
                    if let Some(text) = page.view.commentary_for(verse.number) {
                        println!("     tafsir: {text}");
                    }
                }
                println!();
            }
        }
        Command::Tafsir { chapter, verse } => {
            let view = ctx.client().get_chapter_view(chapter).await?;
            let verses: Vec<u16> = match verse {
                Some(v) => vec![v],
                None => view.detail.verses.iter().map(|v| v.number).collect(),
            };
            for number in verses {
                match view.commentary_for(number) {
                    Some(text) => println!("[{number}] {text}\n"),
                    None => println!("[{number}] (no commentary)\n"),
                }
            }
        }
        Command::Search { query, chapter } => {
            let view = match chapter {
                Some(id) => {
                    controller.dispatch(Intent::NavigateToChapter(id)).await?;
                    controller.dispatch(Intent::SearchInChapter(query)).await?
                }
                None => controller.dispatch(Intent::Search(query)).await?,
            };
            print_json(&view)?;
        }
        Command::Audio {
            chapter,
            verse,
            reciter,
        } => {
            if let Some(key) = reciter {
                controller.dispatch(Intent::SelectReciter(key)).await?;
            }
            match controller
                .dispatch(Intent::PlayVerseAudio { chapter, verse })
                .await?
            {
                View::Playing(handle) => println!("{}", handle.url),
                other => return unexpected(other),
            }
        }
        Command::Bookmark { chapter, verse } => {
            let intent = match verse {
                Some(verse) => Intent::ToggleVerseBookmark { chapter, verse },
                None => Intent::ToggleChapterBookmark(chapter),
            };
            print_json(&controller.dispatch(intent).await?)?;
        }
        Command::Bookmarks { query } => {
            let bookmarks = match query {
                Some(q) => db.search_bookmarks(&q),
                None => db.list_bookmarks(),
            };
            print_json(&bookmarks)?;
        }
        Command::History { clear } => {
            if clear {
                ensure_written(db.clear_history(), "history")?;
            }
            for entry in db.history() {
                println!(
                    "{}  {:>3} {}",
                    entry.visited_at.format("%Y-%m-%d %H:%M"),
                    entry.chapter,
                    entry.name_latin
                );
            }
        }
        Command::Stats => print_json(&db.stats())?,
        Command::Export { path, backup } => {
            let json = if backup {
                db.backup_json()
                    .ok_or_else(|| anyhow::anyhow!("backup could not be serialized"))?
            } else {
                match controller.dispatch(Intent::ExportData).await? {
                    View::Exported { json } => json,
                    other => return unexpected(other),
                }
            };
            match path {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!(path = %path.display(), "Export written");
                }
                None => println!("{json}"),
            }
        }
        Command::Import { path, backup } => {
            let raw = std::fs::read_to_string(&path)?;
            let summary = if backup {
                db.restore_backup(&raw).map_err(ControllerError::from)?
            } else {
                match controller.dispatch(Intent::ImportData(raw)).await? {
                    View::Imported(summary) => summary,
                    other => return unexpected(other),
                }
            };
            print_json(&summary)?;
        }
        Command::Theme { value } => match value.as_deref() {
            None => println!("{}", db.theme()),
            Some("toggle") => print_json(&controller.dispatch(Intent::ToggleTheme).await?)?,
            Some(other) => {
                let theme: Theme = other.parse().map_err(anyhow::Error::msg)?;
                ensure_written(db.set_theme(theme), "theme")?;
                println!("{theme}");
            }
        },
        Command::Register { username, password } => {
            let view = controller
                .dispatch(Intent::SubmitRegister { username, password })
                .await?;
            print_json(&view)?;
        }
        Command::Login { username, password } => {
            let view = controller
                .dispatch(Intent::SubmitLogin { username, password })
                .await?;
            print_json(&view)?;
        }
        Command::Logout => print_json(&controller.dispatch(Intent::Logout).await?)?,
        Command::Whoami => match ctx.accounts().current_user() {
            Some(user) => print_json(&user)?,
            None => println!("not logged in"),
        },
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Store writes report failure as `false`; surface it as a command error.
fn ensure_written(ok: bool, what: &str) -> anyhow::Result<()> {
    if !ok {
        anyhow::bail!("{what} could not be saved");
    }
    Ok(())
}

fn unexpected(view: View) -> anyhow::Result<()> {
    anyhow::bail!("unexpected response: {}", serde_json::to_string(&view)?)
}
