//! Scheduler Adapters
//!
//! - **InMemoryMessageQueue** - Process-local queue of delayed follow-ups
//! - **FollowUpWorker** - Polls the queue and posts due messages

mod follow_up_worker;
mod in_memory_queue;

pub use follow_up_worker::{FollowUpWorker, FollowUpWorkerConfig};
pub use in_memory_queue::InMemoryMessageQueue;
