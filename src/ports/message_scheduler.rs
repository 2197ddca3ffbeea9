//! Message scheduler port.
//!
//! Holds follow-up jobs until their not-before time. No durability is
//! promised: a scheduler may lose pending jobs when the process exits.

use crate::domain::conversation::ScheduledMessage;
use crate::domain::foundation::{DomainError, Timestamp};
use async_trait::async_trait;

#[async_trait]
pub trait MessageScheduler: Send + Sync {
    /// Enqueue a job.
    async fn schedule(&self, job: ScheduledMessage) -> Result<(), DomainError>;

    /// Remove and return up to `limit` jobs due at `now`, earliest first.
    async fn take_due(
        &self,
        now: Timestamp,
        limit: usize,
    ) -> Result<Vec<ScheduledMessage>, DomainError>;

    /// Number of jobs still waiting.
    async fn pending_count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_scheduler_is_object_safe() {
        fn _accepts_dyn(_scheduler: &dyn MessageScheduler) {}
    }
}
