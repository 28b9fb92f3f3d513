//! Account service: registration, authentication and the single active
//! session, persisted through the reader store.

mod accounts;
mod session;

use std::sync::Arc;

use reader_store::{Database, keys};

use crate::AccountError;
use crate::clock::{Clock, SystemClock};
use crate::models::Account;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const TEMP_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct AccountService {
    pub(super) db: Database,
    pub(super) clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub(super) fn load_accounts(&self) -> Vec<Account> {
        self.db.get_json(keys::ACCOUNTS).unwrap_or_default()
    }

    pub(super) fn save_accounts(&self, accounts: &[Account]) -> Result<(), AccountError> {
        if self.db.set_json(keys::ACCOUNTS, accounts) {
            Ok(())
        } else {
            Err(AccountError::Storage("failed to write accounts".into()))
        }
    }

    /// Look up an account by case-insensitive username.
    pub fn find_account(&self, username: &str) -> Option<Account> {
        self.load_accounts()
            .into_iter()
            .find(|a| a.matches_username(username))
    }

    pub fn account_count(&self) -> usize {
        self.load_accounts().len()
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<(), AccountError> {
    if username.is_empty() || password.is_empty() {
        return Err(AccountError::Validation(
            "username and password are required".into(),
        ));
    }
    Ok(())
}

fn validate_password_strength(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
