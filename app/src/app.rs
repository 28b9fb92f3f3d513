use std::path::{Path, PathBuf};
use std::sync::Arc;

use local_accounts::AccountService;
use quran_client::{QuranApiClient, QuranError};
use reader_store::Database;

use crate::config::AppConfig;

/// Owning context for everything the controller talks to. Cheap to clone.
#[derive(Clone)]
pub struct ReaderContext {
    inner: Arc<ReaderContextInner>,
}

struct ReaderContextInner {
    db: Database,
    client: QuranApiClient,
    accounts: AccountService,
    config: AppConfig,
    data_dir: PathBuf,
}

impl ReaderContext {
    /// Build a context with an HTTP client configured from `config`.
    pub fn new(db: Database, config: AppConfig, data_dir: PathBuf) -> Result<Self, QuranError> {
        let client = QuranApiClient::new(&config.client_options())?;
        Ok(Self::with_client(db, client, config, data_dir))
    }

    pub fn with_client(
        db: Database,
        client: QuranApiClient,
        config: AppConfig,
        data_dir: PathBuf,
    ) -> Self {
        let accounts = AccountService::new(db.clone());
        Self::with_parts(db, client, accounts, config, data_dir)
    }

    pub fn with_parts(
        db: Database,
        client: QuranApiClient,
        accounts: AccountService,
        config: AppConfig,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            inner: Arc::new(ReaderContextInner {
                db,
                client,
                accounts,
                config,
                data_dir,
            }),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn client(&self) -> &QuranApiClient {
        &self.inner.client
    }

    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }
}
