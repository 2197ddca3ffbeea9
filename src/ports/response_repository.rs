//! Structured response repository port.
//!
//! Answers are append-only and never evicted.

use crate::domain::conversation::StructuredResponse;
use crate::domain::foundation::{DomainError, SessionCode};
use async_trait::async_trait;

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Append an answer.
    async fn append(&self, response: &StructuredResponse) -> Result<(), DomainError>;

    /// Every answer for a session, oldest first.
    async fn find_by_session(
        &self,
        session_code: &SessionCode,
    ) -> Result<Vec<StructuredResponse>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ResponseRepository) {}
    }
}
