//! Local-only account and session simulation on top of `reader-store`.
//!
//! Accounts, the active session and the cached session user each live
//! under their own store key. Nothing here is a security boundary: the
//! password checksum is a non-cryptographic rolling hash kept for
//! compatibility with existing stored data.

pub mod checksum;
pub mod clock;
pub mod models;
pub mod service;

#[cfg(test)]
mod tests;

pub use checksum::password_checksum;
pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{Account, Profile, ProfilePatch, Session, SessionUser};
pub use service::AccountService;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("storage error: {0}")]
    Storage(String),
}
