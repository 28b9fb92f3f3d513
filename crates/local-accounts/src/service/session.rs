use reader_store::keys;
use uuid::Uuid;

use super::{AccountService, validate_credentials};
use crate::AccountError;
use crate::checksum::verify_password;
use crate::models::{Account, Session, SessionUser, session_lifetime};

impl AccountService {
    /// Authenticate and replace any existing session with a new one.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionUser, AccountError> {
        let username = username.trim();
        validate_credentials(username, password)?;

        let mut accounts = self.load_accounts();
        let account = accounts
            .iter_mut()
            .find(|a| a.matches_username(username))
            .ok_or_else(|| AccountError::NotFound(format!("no account named {username}")))?;

        if !account.is_active {
            return Err(AccountError::Forbidden("account is deactivated".into()));
        }
        if !verify_password(password, &account.password_hash) {
            tracing::info!(username, "Rejected login with wrong password");
            return Err(AccountError::Auth("invalid username or password".into()));
        }

        account.last_login = Some(self.clock.now());
        let account = account.clone();
        self.save_accounts(&accounts)?;

        self.logout();
        let user = self.establish_session(&account)?;
        tracing::info!(username = %account.username, "Logged in");
        Ok(user)
    }

    /// Drop the session and the cached user. Always succeeds.
    pub fn logout(&self) {
        let session_cleared = self.db.remove(keys::SESSION);
        let user_cleared = self.db.remove(keys::CURRENT_USER);
        if !(session_cleared && user_cleared) {
            tracing::warn!("Logout could not clear every session key");
        }
    }

    /// The logged-in user, or `None`. A session that is invalid, expired,
    /// unreadable or points at a missing account is discarded, which logs
    /// the caller out.
    pub fn current_user(&self) -> Option<SessionUser> {
        let Some(session) = self.db.get_json::<Session>(keys::SESSION) else {
            if self.db.get_raw(keys::SESSION).is_some()
                || self.db.get_raw(keys::CURRENT_USER).is_some()
            {
                self.logout();
            }
            return None;
        };

        if !session.is_live_at(self.clock.now()) {
            tracing::info!(user_id = %session.user_id, "Session expired");
            self.logout();
            return None;
        }

        match self.db.get_json::<SessionUser>(keys::CURRENT_USER) {
            Some(user) if user.id == session.user_id => Some(user),
            _ => {
                let accounts = self.load_accounts();
                let Some(account) = accounts.iter().find(|a| a.id == session.user_id) else {
                    tracing::warn!(
                        user_id = %session.user_id,
                        "Session refers to a missing account"
                    );
                    self.logout();
                    return None;
                };
                let user = SessionUser::from(account);
                self.db.set_json(keys::CURRENT_USER, &user);
                Some(user)
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Stored session record, without expiry checks.
    pub fn session(&self) -> Option<Session> {
        self.db.get_json(keys::SESSION)
    }

    /// Push the session expiry to a full lifetime from now.
    pub fn extend_session(&self) -> Result<Session, AccountError> {
        if self.current_user().is_none() {
            return Err(AccountError::Auth("not logged in".into()));
        }
        let mut session = self
            .session()
            .ok_or_else(|| AccountError::Auth("not logged in".into()))?;
        session.expires_at = self.clock.now() + session_lifetime();
        self.write_session(&session)?;
        Ok(session)
    }

    pub(super) fn establish_session(&self, account: &Account) -> Result<SessionUser, AccountError> {
        let now = self.clock.now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: account.id.clone(),
            created_at: now,
            expires_at: now + session_lifetime(),
            is_valid: true,
        };
        self.write_session(&session)?;

        let user = SessionUser::from(account);
        self.cache_user(&user)?;
        Ok(user)
    }

    pub(super) fn cache_user(&self, user: &SessionUser) -> Result<(), AccountError> {
        if self.db.set_json(keys::CURRENT_USER, user) {
            Ok(())
        } else {
            Err(AccountError::Storage("failed to write current user".into()))
        }
    }

    /// Accounts list plus the index of the logged-in account.
    pub(super) fn require_session(&self) -> Result<(Vec<Account>, usize), AccountError> {
        let user = self
            .current_user()
            .ok_or_else(|| AccountError::Auth("not logged in".into()))?;
        let accounts = self.load_accounts();
        let index = accounts
            .iter()
            .position(|a| a.id == user.id)
            .ok_or_else(|| AccountError::NotFound(format!("account {}", user.id)))?;
        Ok((accounts, index))
    }

    fn write_session(&self, session: &Session) -> Result<(), AccountError> {
        if self.db.set_json(keys::SESSION, session) {
            Ok(())
        } else {
            Err(AccountError::Storage("failed to write session".into()))
        }
    }
}
