//! In-memory delayed message queue.
//!
//! Jobs are held only in process memory. Anything still pending when the
//! process stops is lost.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::conversation::ScheduledMessage;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::MessageScheduler;

/// Queue of follow-up jobs ordered by not-before time.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageQueue {
    jobs: Arc<Mutex<Vec<ScheduledMessage>>>,
}

impl InMemoryMessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of pending jobs, soonest first.
    pub async fn pending(&self) -> Vec<ScheduledMessage> {
        self.jobs.lock().await.clone()
    }
}

#[async_trait]
impl MessageScheduler for InMemoryMessageQueue {
    async fn schedule(&self, job: ScheduledMessage) -> Result<(), DomainError> {
        let mut jobs = self.jobs.lock().await;
        let at = jobs.partition_point(|j| !job.not_before.is_before(&j.not_before));
        jobs.insert(at, job);
        Ok(())
    }

    async fn take_due(
        &self,
        now: Timestamp,
        limit: usize,
    ) -> Result<Vec<ScheduledMessage>, DomainError> {
        let mut jobs = self.jobs.lock().await;
        let due = jobs
            .iter()
            .take(limit)
            .take_while(|j| j.is_due(&now))
            .count();
        Ok(jobs.drain(..due).collect())
    }

    async fn pending_count(&self) -> Result<usize, DomainError> {
        Ok(self.jobs.lock().await.len())
    }
}
