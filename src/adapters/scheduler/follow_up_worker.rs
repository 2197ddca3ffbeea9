//! FollowUpWorker - Background service that posts deferred assistant messages.
//!
//! Turn processing schedules a follow-up (next question or thank-you) with a
//! not-before time. This worker polls the scheduler for due jobs, generates
//! the text, and appends it to the participant's transcript.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 250ms | How often to check for due jobs |
//! | `batch_size` | 50 | Max jobs to run per poll cycle |
//!
//! ## Shutdown
//!
//! The loop exits as soon as the shutdown signal arrives. Jobs still
//! pending at that point are dropped with the queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::application::handlers::conversation::{Addressee, AssistantMessages};
use crate::domain::conversation::{ChatMessage, FollowUpKind, ScheduledMessage};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{ChatMessageRepository, MessageScheduler};

/// Configuration for the FollowUpWorker service.
#[derive(Debug, Clone)]
pub struct FollowUpWorkerConfig {
    /// How often to poll for due jobs.
    pub poll_interval: Duration,

    /// Maximum jobs to process per poll cycle.
    pub batch_size: usize,
}

impl Default for FollowUpWorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            batch_size: 50,
        }
    }
}

impl FollowUpWorkerConfig {
    /// Create config with custom poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Background service that turns due jobs into transcript messages.
pub struct FollowUpWorker {
    scheduler: Arc<dyn MessageScheduler>,
    messages: Arc<dyn ChatMessageRepository>,
    assistant: AssistantMessages,
    config: FollowUpWorkerConfig,
}

impl FollowUpWorker {
    /// Create a new FollowUpWorker with default configuration.
    pub fn new(
        scheduler: Arc<dyn MessageScheduler>,
        messages: Arc<dyn ChatMessageRepository>,
        assistant: AssistantMessages,
    ) -> Self {
        Self::with_config(scheduler, messages, assistant, FollowUpWorkerConfig::default())
    }

    /// Create a new FollowUpWorker with custom configuration.
    pub fn with_config(
        scheduler: Arc<dyn MessageScheduler>,
        messages: Arc<dyn ChatMessageRepository>,
        assistant: AssistantMessages,
        config: FollowUpWorkerConfig,
    ) -> Self {
        Self {
            scheduler,
            messages,
            assistant,
            config,
        }
    }

    /// Run the worker loop until shutdown signal is received.
    ///
    /// A failed poll is logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Follow-up worker started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        let dropped = self.scheduler.pending_count().await.unwrap_or(0);
                        info!(dropped, "Follow-up worker stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.process_due(Timestamp::now()).await {
                        warn!(error = %e, "Failed to fetch due follow-ups, retrying next tick");
                    }
                }
            }
        }
    }

    /// Runs every job due at `now`. Returns how many messages were posted.
    ///
    /// Also useful in tests to drain the queue without the loop.
    pub async fn process_due(&self, now: Timestamp) -> Result<usize, DomainError> {
        let jobs = self.scheduler.take_due(now, self.config.batch_size).await?;
        let mut posted = 0;

        for job in jobs {
            let text = self.compose(&job).await;
            let message = ChatMessage::from_assistant(job.session_code.clone(), job.user_id.clone(), text);

            match self.messages.append(&message).await {
                Ok(()) => {
                    debug!(
                        job_id = %job.id,
                        session_code = %job.session_code,
                        user_id = %job.user_id,
                        "Follow-up posted"
                    );
                    posted += 1;
                }
                Err(e) => {
                    warn!(
                        job_id = %job.id,
                        session_code = %job.session_code,
                        user_id = %job.user_id,
                        error = %e,
                        "Failed to store follow-up message, dropping job"
                    );
                }
            }
        }

        Ok(posted)
    }

    async fn compose(&self, job: &ScheduledMessage) -> String {
        let to = Addressee {
            session_code: &job.session_code,
            session_name: &job.session_name,
            user_id: &job.user_id,
            user_name: &job.user_name,
        };

        match &job.kind {
            FollowUpKind::NextQuestion {
                question_text,
                position,
                total,
            } => {
                self.assistant
                    .rephrase_question(to, question_text, *position, *total)
                    .await
            }
            FollowUpKind::Completion => self.assistant.completion(to).await,
        }
    }
}
