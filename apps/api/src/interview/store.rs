use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::info;
use uuid::Uuid;

use crate::interview::session::InterviewSession;

/// In-memory registry of independent sessions.
///
/// Each session sits behind its own mutex, held for the whole event, so a
/// session never has more than one LLM call in flight. Nothing is persisted;
/// sessions leave the store on explicit removal or once idle past the
/// configured limit.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<InterviewSession>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Arc<Mutex<InterviewSession>> {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(InterviewSession::new(id)));
        self.sessions.write().await.insert(id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<InterviewSession>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least `max_idle`, completed or not.
    /// Sessions currently handling an event are locked and are kept.
    /// Returns the number evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.idle_for() < max_idle,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(
                "Evicted {} idle interview session(s); {} remaining",
                evicted,
                sessions.len()
            );
        }
        evicted
    }

    /// Runs `evict_idle` every `every` on a background task.
    pub fn spawn_idle_sweeper(&self, max_idle: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                store.evict_idle(max_idle).await;
            }
        })
    }
}
