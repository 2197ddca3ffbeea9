//! Session repository port.
//!
//! Sessions are written once and then only read, so the contract is small.

use crate::domain::foundation::{DomainError, SessionCode};
use crate::domain::session::Session;
use async_trait::async_trait;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session unless its code is already taken.
    ///
    /// Returns `false`, leaving the existing session untouched, when the code
    /// is in use.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, session: &Session) -> Result<bool, DomainError>;

    /// Find a session by its code.
    ///
    /// Returns `None` if not found.
    async fn find_by_code(&self, code: &SessionCode) -> Result<Option<Session>, DomainError>;

    /// Check if a session code is taken.
    async fn exists(&self, code: &SessionCode) -> Result<bool, DomainError>;

    /// All sessions, newest first.
    async fn list_all(&self) -> Result<Vec<Session>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
