use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use uuid::Uuid;

use super::{
    AccountService, MIN_USERNAME_LEN, TEMP_PASSWORD_LEN, validate_credentials,
    validate_password_strength,
};
use crate::AccountError;
use crate::checksum::{password_checksum, verify_password};
use crate::models::{Account, Profile, ProfilePatch, SessionUser};

impl AccountService {
    /// Create an account and log straight into it.
    pub fn register(&self, username: &str, password: &str) -> Result<SessionUser, AccountError> {
        let username = username.trim();
        validate_credentials(username, password)?;
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(AccountError::Validation(format!(
                "username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
        validate_password_strength(password)?;

        let mut accounts = self.load_accounts();
        if accounts.iter().any(|a| a.matches_username(username)) {
            return Err(AccountError::Conflict(format!(
                "username {username} is already taken"
            )));
        }

        let now = self.clock.now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: password_checksum(password),
            created_at: now,
            last_login: Some(now),
            is_active: true,
            must_change_password: false,
            profile: Profile::for_username(username),
        };
        accounts.push(account.clone());
        self.save_accounts(&accounts)?;

        self.logout();
        let user = self.establish_session(&account)?;
        tracing::info!(username, "Registered account");
        Ok(user)
    }

    pub fn update_profile(&self, patch: ProfilePatch) -> Result<SessionUser, AccountError> {
        if patch
            .display_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(AccountError::Validation(
                "display name cannot be empty".into(),
            ));
        }

        let (mut accounts, index) = self.require_session()?;
        accounts[index].profile.apply(patch);
        self.save_accounts(&accounts)?;

        let user = SessionUser::from(&accounts[index]);
        self.cache_user(&user)?;
        Ok(user)
    }

    /// Replace the password. The current session stays valid.
    pub fn change_password(&self, old: &str, new: &str) -> Result<(), AccountError> {
        let (mut accounts, index) = self.require_session()?;
        if !verify_password(old, &accounts[index].password_hash) {
            return Err(AccountError::Auth("current password is incorrect".into()));
        }
        validate_password_strength(new)?;

        let account = &mut accounts[index];
        account.password_hash = password_checksum(new);
        account.must_change_password = false;
        let user = SessionUser::from(&*account);
        self.save_accounts(&accounts)?;
        self.cache_user(&user)?;
        tracing::info!(username = %user.username, "Password changed");
        Ok(())
    }

    /// Hard-delete the logged-in account and log out.
    pub fn delete_account(&self, password: &str) -> Result<(), AccountError> {
        let (mut accounts, index) = self.require_session()?;
        if !verify_password(password, &accounts[index].password_hash) {
            return Err(AccountError::Auth("password is incorrect".into()));
        }

        let removed = accounts.remove(index);
        self.save_accounts(&accounts)?;
        self.logout();
        tracing::info!(username = %removed.username, "Deleted account");
        Ok(())
    }

    /// Overwrite the password with a random temporary one and return it.
    /// The account must change it on next use.
    pub fn reset_password(&self, username: &str) -> Result<String, AccountError> {
        let mut accounts = self.load_accounts();
        let account = accounts
            .iter_mut()
            .find(|a| a.matches_username(username))
            .ok_or_else(|| {
                AccountError::NotFound(format!("no account named {}", username.trim()))
            })?;

        let temporary = temporary_password();
        account.password_hash = password_checksum(&temporary);
        account.must_change_password = true;
        let user = SessionUser::from(&*account);
        self.save_accounts(&accounts)?;

        if self.session().is_some_and(|s| s.user_id == user.id) {
            self.cache_user(&user)?;
        }
        tracing::info!(username = %user.username, "Password reset");
        Ok(temporary)
    }

    /// Activate or deactivate an account. Deactivating the logged-in
    /// account also ends its session.
    pub fn set_account_active(&self, username: &str, active: bool) -> Result<(), AccountError> {
        let mut accounts = self.load_accounts();
        let account = accounts
            .iter_mut()
            .find(|a| a.matches_username(username))
            .ok_or_else(|| {
                AccountError::NotFound(format!("no account named {}", username.trim()))
            })?;
        account.is_active = active;
        let id = account.id.clone();
        self.save_accounts(&accounts)?;

        if !active && self.session().is_some_and(|s| s.user_id == id) {
            self.logout();
        }
        tracing::info!(username, active, "Account activation changed");
        Ok(())
    }
}

fn temporary_password() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

