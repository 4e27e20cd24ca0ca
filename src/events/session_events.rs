use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::auth::session_manager::AuthState;

/// Session lifecycle notifications. Screens subscribe on mount and drop the
/// receiver on teardown; there is no implicit cleanup to rely on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    Restored(AuthState),
    LoggedIn(AuthState),
    LoggedOut,
    LoginFailed(String),
    PushTokenRegistered(String),
}

#[derive(Debug, Clone)]
pub struct SessionEventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish to whoever is listening. No subscribers is not an error.
    pub fn publish(&self, event: SessionEvent) {
        if let Err(e) = self.sender.send(event) {
            debug!("Session event dropped (no subscribers): {}", e);
        }
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = SessionEventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::LoggedOut);

        match rx.recv().await.unwrap() {
            SessionEvent::LoggedOut => {}
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let bus = SessionEventBus::new();
        bus.publish(SessionEvent::LoginFailed("no one listening".to_string()));
    }

    #[tokio::test]
    async fn test_dropped_receiver_unsubscribes() {
        let bus = SessionEventBus::new();
        let rx = bus.subscribe();
        drop(rx);

        let mut rx2 = bus.subscribe();
        bus.publish(SessionEvent::LoggedOut);
        assert!(matches!(rx2.recv().await.unwrap(), SessionEvent::LoggedOut));
    }
}
