use std::path::PathBuf;

use reader_store::Database;

use crate::config::AppConfig;

/// Foundation init: environment, config, data directory and database.
/// Any failure here is fatal.
pub fn init_foundation() -> Result<(Database, AppConfig, PathBuf), anyhow::Error> {
    load_dotenv();
    let config = AppConfig::load()?;

    let dir = data_dir(&config);
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("reader.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    tracing::info!(api = %config.api_base, "Configuration loaded");
    Ok((db, config, dir))
}

/// Determine the data directory for the application.
/// Priority: QURAN_READER_DATA_DIR > ~/.quran-reader
pub fn data_dir(config: &AppConfig) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return dir.clone();
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quran-reader")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
