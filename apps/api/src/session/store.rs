use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Session;

struct Entry {
    session: Arc<Mutex<Session>>,
    last_active: Instant,
}

/// In-memory registry of live sessions.
///
/// Each session sits behind its own mutex, so events for one session run one
/// at a time while different sessions proceed independently. Every lookup
/// refreshes the session's last-active time; `sweep_idle` drops sessions that
/// have gone quiet.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Arc<Mutex<Session>> {
        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            Entry {
                session: handle.clone(),
                last_active: Instant::now(),
            },
        );
        info!("Session {id} created");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, AppError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_active = Instant::now();
        Ok(entry.session.clone())
    }

    /// Drops the session and everything it holds.
    pub async fn dispose(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Session {id} disposed"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes sessions untouched for at least `idle`. A session still held
    /// by an in-flight request is kept. Returns how many were removed.
    pub async fn sweep_idle(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.last_active.elapsed() < idle || Arc::strong_count(&entry.session) > 1;
            if !keep {
                info!("Session {id} expired after {}s idle", idle.as_secs());
            }
            keep
        });
        before - sessions.len()
    }

    /// Runs `sweep_idle` every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, idle: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = store.sweep_idle(idle).await;
                if removed > 0 {
                    info!("Idle sweep removed {removed} session(s)");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_returns_same_session() {
        let store = SessionStore::new();
        let id = store.create().await.lock().await.id;
        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.lock().await.id, id);
    }

    #[tokio::test]
    async fn test_dispose_removes_session() {
        let store = SessionStore::new();
        let id = store.create().await.lock().await.id;
        store.dispose(id).await.unwrap();

        assert_eq!(store.len().await, 0);
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.dispose(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;
        a.lock().await.history.append("hi", "hello", false);

        assert_eq!(a.lock().await.history.len(), 1);
        assert!(b.lock().await.history.is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_swept() {
        let store = SessionStore::new();
        let stale = store.create().await.lock().await.id;
        tokio::time::advance(Duration::from_secs(50)).await;
        let fresh = store.create().await.lock().await.id;
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(store.sweep_idle(Duration::from_secs(60)).await, 1);
        assert!(matches!(store.get(stale).await, Err(AppError::NotFound(_))));
        assert!(store.get(fresh).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_refreshes_last_active() {
        let store = SessionStore::new();
        let id = store.create().await.lock().await.id;
        tokio::time::advance(Duration::from_secs(50)).await;
        drop(store.get(id).await.unwrap());
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(store.sweep_idle(Duration::from_secs(60)).await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_in_use_survives_sweep() {
        let store = SessionStore::new();
        let held = store.create().await;
        tokio::time::advance(Duration::from_secs(120)).await;

        assert_eq!(store.sweep_idle(Duration::from_secs(60)).await, 0);
        drop(held);
        assert_eq!(store.sweep_idle(Duration::from_secs(60)).await, 1);
    }
}
