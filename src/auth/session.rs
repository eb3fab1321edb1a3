//! Session management

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID, carried in the session cookie
    pub id: String,
    /// Account the session is bound to
    pub user_id: i64,
    /// When the session was created
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the session was last accessed
    pub last_accessed: chrono::DateTime<chrono::Utc>,
}

impl Session {
    /// Create a new session
    pub fn new(user_id: i64) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: now,
            last_accessed: now,
        }
    }

    /// Check if session has been idle longer than `idle`
    pub fn is_expired(&self, idle: chrono::Duration) -> bool {
        chrono::Utc::now().signed_duration_since(self.last_accessed) > idle
    }

    /// Update last accessed time
    pub fn touch(&mut self) {
        self.last_accessed = chrono::Utc::now();
    }
}

/// Session manager for in-memory session storage
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    idle_timeout: chrono::Duration,
}

impl SessionManager {
    /// Create a new session manager with the given idle timeout
    pub fn new(idle_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: chrono::Duration::minutes(idle_minutes.max(1)),
        }
    }

    /// Create a new session for a user, returning its id
    pub async fn create_session(&self, user_id: i64) -> String {
        let session = Session::new(user_id);
        let session_id = session.id.clone();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), session);
        tracing::debug!(user_id, "Session created");
        session_id
    }

    /// Get a live session by ID, refreshing its idle timer
    pub async fn get_session(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if session.is_expired(self.idle_timeout) {
                sessions.remove(session_id);
                return None;
            }
            session.touch();
            return Some(session.clone());
        }
        None
    }

    /// Delete a session; unknown ids are ignored
    pub async fn delete_session(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Cleanup expired sessions, returning how many were dropped
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let idle = self.idle_timeout;
        sessions.retain(|_, session| !session.is_expired(idle));
        before - sessions.len()
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Periodically sweep expired sessions until the runtime shuts down
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = manager.cleanup_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired sessions");
                }
            }
        })
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_session() {
        let manager = SessionManager::default();
        let session_id = manager.create_session(42).await;

        let retrieved = manager.get_session(&session_id).await;
        assert_eq!(retrieved.map(|s| s.user_id), Some(42));
    }

    #[tokio::test]
    async fn test_delete_session() {
        let manager = SessionManager::default();
        let session_id = manager.create_session(1).await;

        assert!(manager.delete_session(&session_id).await);
        assert!(manager.get_session(&session_id).await.is_none());
        assert!(!manager.delete_session(&session_id).await);
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let manager = SessionManager::new(30);
        let session_id = manager.create_session(1).await;

        {
            let mut sessions = manager.sessions.write().await;
            if let Some(session) = sessions.get_mut(&session_id) {
                session.last_accessed = chrono::Utc::now() - chrono::Duration::minutes(31);
            }
        }

        assert!(manager.get_session(&session_id).await.is_none());
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_expired_keeps_live_sessions() {
        let manager = SessionManager::new(30);
        let live = manager.create_session(1).await;
        let stale = manager.create_session(2).await;

        {
            let mut sessions = manager.sessions.write().await;
            if let Some(session) = sessions.get_mut(&stale) {
                session.last_accessed = chrono::Utc::now() - chrono::Duration::hours(2);
            }
        }

        assert_eq!(manager.cleanup_expired().await, 1);
        assert!(manager.get_session(&live).await.is_some());
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let manager = SessionManager::default();
        let a = manager.create_session(1).await;
        let b = manager.create_session(1).await;
        assert_ne!(a, b);
        assert_eq!(manager.session_count().await, 2);
    }
}
