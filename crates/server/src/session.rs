//! Session Management
//!
//! One [`Session`] per visitor, each owning its [`Conversation`] behind an
//! async mutex. The chat handler holds that mutex for the whole turn,
//! typing delay included, so a second message from the same visitor queues
//! behind the first. Idle sessions are swept by a background task.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};

use concierge_agent::{Conversation, ConversationConfig};
use concierge_config::constants::sessions;

use crate::metrics;
use crate::sink::LeadQueue;
use crate::ServerError;

/// Visitor session
pub struct Session {
    /// Session ID
    pub id: String,
    /// Conversation controller; lock order is always this mutex alone
    pub conversation: Mutex<Conversation>,
    /// Creation time
    pub created_at: Instant,
    /// Last activity
    pub last_activity: RwLock<Instant>,
    /// Is active
    pub active: RwLock<bool>,
}

impl Session {
    pub fn new(id: impl Into<String>, conversation: Conversation) -> Self {
        Self {
            id: id.into(),
            conversation: Mutex::new(conversation),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
            active: RwLock::new(true),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Close session
    pub fn close(&self) {
        *self.active.write() = false;
    }

    pub fn is_active(&self) -> bool {
        *self.active.read()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    /// Create a manager with the default timeout and cleanup interval
    pub fn new(max_sessions: usize) -> Self {
        Self::with_config(
            max_sessions,
            Duration::from_secs(sessions::SESSION_TIMEOUT_SECS),
            Duration::from_secs(sessions::CLEANUP_INTERVAL_SECS),
        )
    }

    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Start the background cleanup task
    ///
    /// Returns a shutdown sender; send `true` to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                removed,
                                remaining = manager.count(),
                                "Session cleanup removed expired sessions"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a session seeded with the welcome entry
    pub fn create(
        &self,
        config: &ConversationConfig,
        leads: &LeadQueue,
    ) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                tracing::warn!(max_sessions = self.max_sessions, "Session capacity reached");
                return Err(ServerError::Capacity(self.max_sessions));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let conversation = Conversation::new(&id, config, leads.sink_for(&id));
        let session = Arc::new(Session::new(&id, conversation));
        sessions.insert(id.clone(), session.clone());
        metrics::set_active_sessions(sessions.len());

        tracing::info!(session_id = %id, "Created session");

        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session; returns whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.remove(id) {
            Some(session) => {
                session.close();
                metrics::set_active_sessions(sessions.len());
                tracing::info!(session_id = %id, "Removed session");
                true
            },
            None => false,
        }
    }

    /// Drop every session, releasing their lead sinks
    pub fn close_all(&self) {
        let mut sessions = self.sessions.write();
        for session in sessions.values() {
            session.close();
        }
        sessions.clear();
        metrics::set_active_sessions(0);
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Remove expired sessions; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions)
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) -> usize {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            if let Some(session) = sessions.remove(id) {
                session.close();
                tracing::info!(session_id = %id, "Expired session");
            }
        }
        if !expired.is_empty() {
            metrics::set_active_sessions(sessions.len());
        }
        expired.len()
    }

    /// List all session IDs
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> LeadQueue {
        LeadQueue::new(4, "chatbot").0
    }

    #[tokio::test]
    async fn test_session_creation() {
        let manager = SessionManager::new(10);
        let session = manager
            .create(&ConversationConfig::default(), &queue())
            .unwrap();

        assert!(session.is_active());
        assert!(!session.is_expired(Duration::from_secs(60)));
        assert_eq!(manager.count(), 1);

        let conversation = session.conversation.lock().await;
        assert_eq!(conversation.session_id(), session.id);
        assert_eq!(conversation.transcript().len(), 1);
    }

    #[test]
    fn test_session_get_and_remove() {
        let manager = SessionManager::new(10);
        let session = manager
            .create(&ConversationConfig::default(), &queue())
            .unwrap();

        assert!(manager.get(&session.id).is_some());
        assert!(manager.remove(&session.id));
        assert!(!session.is_active());
        assert!(manager.get(&session.id).is_none());
        assert!(!manager.remove(&session.id));
    }

    #[test]
    fn test_capacity() {
        let manager = SessionManager::new(2);
        let config = ConversationConfig::default();
        let leads = queue();
        manager.create(&config, &leads).unwrap();
        manager.create(&config, &leads).unwrap();
        assert!(matches!(
            manager.create(&config, &leads),
            Err(ServerError::Capacity(2))
        ));
    }

    #[test]
    fn test_expired_sessions_make_room() {
        let manager =
            SessionManager::with_config(1, Duration::from_millis(0), Duration::from_secs(60));
        let config = ConversationConfig::default();
        let leads = queue();
        let first = manager.create(&config, &leads).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let second = manager.create(&config, &leads).unwrap();
        assert!(!first.is_active());
        assert_eq!(manager.list(), vec![second.id.clone()]);
    }

    #[tokio::test]
    async fn test_cleanup_task_stops() {
        let manager = Arc::new(SessionManager::with_config(
            10,
            Duration::from_millis(0),
            Duration::from_millis(10),
        ));
        manager
            .create(&ConversationConfig::default(), &queue())
            .unwrap();

        let shutdown = manager.start_cleanup_task();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(manager.count(), 0);
        shutdown.send(true).unwrap();
    }
}
