//! Per-participant serialisation of conversation turns.
//!
//! Every read-modify-write of a participant's conversation runs while
//! holding the lock for its (session, user) pair. Different participants
//! never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::{SessionCode, UserId};

type Key = (SessionCode, UserId);

/// Keyed async mutex over (session, user) pairs.
#[derive(Debug, Clone, Default)]
pub struct ParticipantLocks {
    locks: Arc<Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>>,
}

impl ParticipantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to one participant's conversation.
    pub async fn acquire(&self, session_code: &SessionCode, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries referenced only by the map are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry((session_code.clone(), user_id.clone()))
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tracked(locks: &ParticipantLocks) -> usize {
        locks.locks.lock().unwrap().len()
    }

    fn pair(user: &str) -> (SessionCode, UserId) {
        (SessionCode::parse("LOCK01").unwrap(), UserId::new(user).unwrap())
    }

    #[tokio::test]
    async fn same_participant_waits_for_holder() {
        let locks = ParticipantLocks::new();
        let (code, user) = pair("u1");

        let guard = locks.acquire(&code, &user).await;
        let waiting = {
            let locks = locks.clone();
            let (code, user) = (code.clone(), user.clone());
            tokio::spawn(async move {
                let _g = locks.acquire(&code, &user).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_participants_do_not_block() {
        let locks = ParticipantLocks::new();
        let (code, a) = pair("a");
        let (_, b) = pair("b");

        let _held = locks.acquire(&code, &a).await;
        tokio::time::timeout(Duration::from_millis(100), locks.acquire(&code, &b))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = ParticipantLocks::new();
        let (code, a) = pair("a");
        let (_, b) = pair("b");

        drop(locks.acquire(&code, &a).await);
        let _b = locks.acquire(&code, &b).await;

        assert_eq!(tracked(&locks), 1);
    }
}
