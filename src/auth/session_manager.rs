use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

use crate::api_clients::{AuthApiClient, NotificationApiClient};
use crate::auth::claims::decode_claims;
use crate::auth::secure_storage::SecureStorage;
use crate::config::RuntimeConfig;
use crate::constants::{MSG_LOGIN_FAILED, MSG_UNAUTHORIZED_ROLE};
use crate::error::AppError;
use crate::events::{SessionEvent, SessionEventBus};
use crate::models::LoginRequest;
use crate::push::{PushPlatform, PushRegistrationClient};

/// The one in-memory authentication state. Replaced wholesale on every
/// transition; the only partial update is the FCM token after a successful
/// push registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<i64>,
    pub token: Option<String>,
    pub role: Option<Vec<i64>>,
    pub error_login: Option<String>,
    pub fcm_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Restoring,
    Authenticated,
    LoggingOut,
}

/// Owns the session lifecycle: restart-time restoration, login, logout, and
/// the push-token linkage that rides along with authentication.
///
/// All mutating operations are serialized through a single in-flight lock, so
/// a logout issued while a login is running waits instead of racing it for
/// the state.
#[derive(Debug)]
pub struct SessionManager {
    storage: Arc<dyn SecureStorage>,
    push: PushRegistrationClient,
    auth_api: AuthApiClient,
    notification_api: NotificationApiClient,
    state: RwLock<AuthState>,
    phase: RwLock<SessionPhase>,
    ready: AtomicBool,
    op_lock: Mutex<()>,
    events: SessionEventBus,
}

impl SessionManager {
    pub fn new(
        config: &RuntimeConfig,
        storage: Arc<dyn SecureStorage>,
        push_platform: Arc<dyn PushPlatform>,
    ) -> Self {
        let http_client = reqwest::Client::new();
        Self {
            auth_api: AuthApiClient::new(http_client.clone(), &config.api_url),
            notification_api: NotificationApiClient::new(
                http_client,
                &config.api_url,
                Arc::clone(&storage),
            ),
            push: PushRegistrationClient::new(push_platform),
            storage,
            state: RwLock::new(AuthState::default()),
            phase: RwLock::new(SessionPhase::Unauthenticated),
            ready: AtomicBool::new(false),
            op_lock: Mutex::new(()),
            events: SessionEventBus::new(),
        }
    }

    pub async fn auth_state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> SessionPhase {
        *self.phase.read().await
    }

    /// Whether startup restoration has run to completion. Consumers must not
    /// route against the state before this is true.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Restart-time session restoration. Runs once at startup; marks the
    /// manager ready only after the whole sequence (including the best-effort
    /// push registration) has finished.
    pub async fn restore_session(&self) {
        let _guard = self.op_lock.lock().await;
        *self.phase.write().await = SessionPhase::Restoring;

        let stored = match self.storage.get().await {
            Ok(stored) => stored,
            Err(e) => {
                // A store that cannot be read is a store with no session in it
                warn!("Failed to read stored token, treating as logged out: {}", e);
                None
            }
        };

        let Some(token) = stored else {
            *self.phase.write().await = SessionPhase::Unauthenticated;
            self.ready.store(true, Ordering::SeqCst);
            return;
        };

        match decode_claims(&token) {
            Ok(claims) if claims.has_allowed_role() => {
                let user = claims.id_persona;
                let new_state = AuthState {
                    is_authenticated: true,
                    user: Some(user),
                    token: Some(token),
                    role: Some(claims.roles),
                    error_login: None,
                    fcm_token: None,
                };
                *self.state.write().await = new_state.clone();
                *self.phase.write().await = SessionPhase::Authenticated;
                info!("Session restored for persona {}", user);
                self.events.publish(SessionEvent::Restored(new_state));

                self.handle_push_registration().await;
            }
            result => {
                // Fail closed: an undecodable token and a token with the
                // wrong roles are both purged, never retried
                if let Err(decode_err) = &result {
                    warn!("Stored token rejected: {}", decode_err);
                } else {
                    warn!("Stored token rejected: no allowed role");
                }
                if let Err(e) = self.storage.delete().await {
                    error!("Failed to purge rejected token: {}", e);
                }
                *self.state.write().await = AuthState {
                    error_login: Some(MSG_UNAUTHORIZED_ROLE.to_string()),
                    ..AuthState::default()
                };
                *self.phase.write().await = SessionPhase::Unauthenticated;
            }
        }

        self.ready.store(true, Ordering::SeqCst);
    }

    /// Login against the backend. Returns `true` on success; on failure the
    /// human-readable reason lands in [`AuthState::error_login`] and on the
    /// event channel. Persisted state is only touched when the returned token
    /// passes the role check.
    pub async fn login(&self, credentials: LoginRequest) -> bool {
        let _guard = self.op_lock.lock().await;

        let token = match self.auth_api.login(&credentials).await {
            Ok(response) => response.token,
            Err(e) => {
                let message = match e {
                    AppError::AuthError(message) => message,
                    other => {
                        error!("Login transport failure: {}", other);
                        MSG_LOGIN_FAILED.to_string()
                    }
                };
                *self.state.write().await = AuthState {
                    error_login: Some(message.clone()),
                    ..AuthState::default()
                };
                *self.phase.write().await = SessionPhase::Unauthenticated;
                self.events.publish(SessionEvent::LoginFailed(message));
                return false;
            }
        };

        match decode_claims(&token) {
            Ok(claims) if claims.has_allowed_role() => {
                if let Err(e) = self.storage.set(&token).await {
                    // Session continues in memory; the user just logs in again
                    // after the next restart
                    warn!("Failed to persist session token: {}", e);
                }

                let user = claims.id_persona;
                let new_state = AuthState {
                    is_authenticated: true,
                    user: Some(user),
                    token: Some(token),
                    role: Some(claims.roles),
                    error_login: None,
                    fcm_token: None,
                };
                *self.state.write().await = new_state.clone();
                *self.phase.write().await = SessionPhase::Authenticated;
                info!("Login successful for persona {}", user);
                self.events.publish(SessionEvent::LoggedIn(new_state));

                self.handle_push_registration().await;
                true
            }
            _ => {
                warn!("Login returned a token without an allowed role");
                *self.state.write().await = AuthState {
                    error_login: Some(MSG_UNAUTHORIZED_ROLE.to_string()),
                    ..AuthState::default()
                };
                *self.phase.write().await = SessionPhase::Unauthenticated;
                self.events
                    .publish(SessionEvent::LoginFailed(MSG_UNAUTHORIZED_ROLE.to_string()));
                false
            }
        }
    }

    /// Logout. Unlinks the push token and clears the stored credential, both
    /// best-effort; the in-memory state is reset no matter what.
    pub async fn logout(&self) {
        let _guard = self.op_lock.lock().await;
        *self.phase.write().await = SessionPhase::LoggingOut;

        let (user, fcm_token) = {
            let state = self.state.read().await;
            (state.user, state.fcm_token.clone())
        };

        if let (Some(user), Some(fcm_token)) = (user, fcm_token) {
            if let Err(e) = self.notification_api.deregister_token(user, &fcm_token).await {
                warn!("Push token deregistration failed: {}", e);
            }
        }

        if let Err(e) = self.storage.delete().await {
            error!("Failed to delete stored token on logout: {}", e);
        }

        *self.state.write().await = AuthState::default();
        *self.phase.write().await = SessionPhase::Unauthenticated;
        info!("Session closed");
        self.events.publish(SessionEvent::LoggedOut);
    }

    /// Best-effort push registration and backend report. Runs after the
    /// authenticated transition; nothing here can revert authentication.
    async fn handle_push_registration(&self) {
        let Some(fcm_token) = self.push.register().await else {
            return;
        };

        if let Err(e) = self.notification_api.register_token(&fcm_token).await {
            warn!("Failed to report push token to backend: {}", e);
            return;
        }

        self.state.write().await.fcm_token = Some(fcm_token.clone());
        self.events.publish(SessionEvent::PushTokenRegistered(fcm_token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::secure_storage::MemoryStorage;
    use crate::push::testing::FakePushPlatform;
    use crate::push::{DisabledPushPlatform, HostEnvironment};
    use pretty_assertions::assert_eq;

    fn make_token(payload: &str) -> String {
        use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
        format!(
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.{}.firma",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    fn manager_for(
        server: &mockito::Server,
        storage: Arc<MemoryStorage>,
        push_platform: Arc<dyn PushPlatform>,
    ) -> SessionManager {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = RuntimeConfig {
            api_url: server.url(),
        };
        SessionManager::new(&config, storage, push_platform)
    }

    #[tokio::test]
    async fn test_restore_with_citizen_token_authenticates() {
        let mut server = mockito::Server::new_async().await;
        let fcm_mock = server
            .mock("POST", "/notificacion/token-fcm")
            .with_status(200)
            .create_async()
            .await;

        let token = make_token(r#"{"id_persona":42,"roles":[4]}"#);
        let storage = Arc::new(MemoryStorage::new());
        storage.set(&token).await.unwrap();

        let manager = manager_for(
            &server,
            Arc::clone(&storage),
            Arc::new(FakePushPlatform::granted("fcm-abc")),
        );
        manager.restore_session().await;

        let state = manager.auth_state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.user, Some(42));
        assert_eq!(state.role, Some(vec![4]));
        assert_eq!(state.token, Some(token));
        assert_eq!(state.fcm_token, Some("fcm-abc".to_string()));
        assert_eq!(manager.phase().await, SessionPhase::Authenticated);
        assert!(manager.is_ready());
        fcm_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_restore_with_disallowed_role_purges_storage() {
        let server = mockito::Server::new_async().await;
        let token = make_token(r#"{"id_persona":9,"roles":[1]}"#);
        let storage = Arc::new(MemoryStorage::new());
        storage.set(&token).await.unwrap();

        let manager = manager_for(&server, Arc::clone(&storage), Arc::new(DisabledPushPlatform));
        manager.restore_session().await;

        let state = manager.auth_state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.token, None);
        assert_eq!(state.error_login, Some(MSG_UNAUTHORIZED_ROLE.to_string()));
        assert_eq!(storage.get().await.unwrap(), None);
        assert!(manager.is_ready());
    }

    #[tokio::test]
    async fn test_restore_with_undecodable_token_purges_storage() {
        let server = mockito::Server::new_async().await;
        let storage = Arc::new(MemoryStorage::new());
        storage.set("garbage-not-a-token").await.unwrap();

        let manager = manager_for(&server, Arc::clone(&storage), Arc::new(DisabledPushPlatform));
        manager.restore_session().await;

        assert!(!manager.auth_state().await.is_authenticated);
        assert_eq!(storage.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_without_stored_token_is_ready_and_logged_out() {
        let server = mockito::Server::new_async().await;
        let manager = manager_for(
            &server,
            Arc::new(MemoryStorage::new()),
            Arc::new(DisabledPushPlatform),
        );

        assert!(!manager.is_ready());
        manager.restore_session().await;

        assert!(manager.is_ready());
        assert!(!manager.auth_state().await.is_authenticated);
        assert_eq!(manager.phase().await, SessionPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_push_failure_does_not_revert_restored_session() {
        let server = mockito::Server::new_async().await;
        let token = make_token(r#"{"id_persona":42,"roles":[4]}"#);
        let storage = Arc::new(MemoryStorage::new());
        storage.set(&token).await.unwrap();

        // Sandboxed host: push registration yields nothing, no backend call
        let platform = FakePushPlatform {
            environment: HostEnvironment::Sandboxed,
            ..FakePushPlatform::granted("fcm-abc")
        };
        let manager = manager_for(&server, storage, Arc::new(platform));
        manager.restore_session().await;

        let state = manager.auth_state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.fcm_token, None);
    }

    #[tokio::test]
    async fn test_login_with_police_token_succeeds_and_persists() {
        let mut server = mockito::Server::new_async().await;
        let token = make_token(r#"{"id_persona":7,"roles":[3]}"#);
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"token":"{}"}}"#, token))
            .create_async()
            .await;
        server
            .mock("POST", "/notificacion/token-fcm")
            .with_status(200)
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::new());
        let manager = manager_for(
            &server,
            Arc::clone(&storage),
            Arc::new(FakePushPlatform::granted("fcm-abc")),
        );

        let ok = manager
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
            .await;

        assert!(ok);
        let state = manager.auth_state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.user, Some(7));
        assert!(state.role.as_ref().is_some_and(|r| r.contains(&3)));
        assert_eq!(storage.get().await.unwrap(), Some(token));
    }

    #[tokio::test]
    async fn test_login_with_disallowed_role_persists_nothing() {
        let mut server = mockito::Server::new_async().await;
        let token = make_token(r#"{"id_persona":7,"roles":[1,2]}"#);
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"token":"{}"}}"#, token))
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::new());
        let manager = manager_for(&server, Arc::clone(&storage), Arc::new(DisabledPushPlatform));

        let ok = manager
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
            .await;

        assert!(!ok);
        let state = manager.auth_state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.error_login, Some(MSG_UNAUTHORIZED_ROLE.to_string()));
        assert_eq!(storage.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_backend_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::new());
        let manager = manager_for(&server, Arc::clone(&storage), Arc::new(DisabledPushPlatform));
        let mut events = manager.subscribe();

        let ok = manager
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(!ok);
        let state = manager.auth_state().await;
        assert_eq!(state.error_login, Some("Invalid credentials".to_string()));
        assert_eq!(storage.get().await.unwrap(), None);
        match events.recv().await.unwrap() {
            SessionEvent::LoginFailed(message) => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_network_failure_uses_generic_message() {
        // Point at a server that is not there
        let storage = Arc::new(MemoryStorage::new());
        let config = RuntimeConfig {
            api_url: "http://127.0.0.1:1".to_string(),
        };
        let manager = SessionManager::new(&config, storage, Arc::new(DisabledPushPlatform));

        let ok = manager
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
            .await;

        assert!(!ok);
        assert_eq!(
            manager.auth_state().await.error_login,
            Some(MSG_LOGIN_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_resets_state_and_deregisters_push_token() {
        let mut server = mockito::Server::new_async().await;
        let token = make_token(r#"{"id_persona":42,"roles":[4]}"#);
        server
            .mock("POST", "/notificacion/token-fcm")
            .with_status(200)
            .create_async()
            .await;
        let unlink_mock = server
            .mock("POST", "/notificacion/logout-fcm")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "id_persona": 42,
                "fcmToken": "fcm-abc"
            })))
            .with_status(200)
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::new());
        storage.set(&token).await.unwrap();

        let manager = manager_for(
            &server,
            Arc::clone(&storage),
            Arc::new(FakePushPlatform::granted("fcm-abc")),
        );
        manager.restore_session().await;
        assert!(manager.auth_state().await.is_authenticated);

        manager.logout().await;

        let state = manager.auth_state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.token, None);
        assert_eq!(state.fcm_token, None);
        assert_eq!(storage.get().await.unwrap(), None);
        assert_eq!(manager.phase().await, SessionPhase::Unauthenticated);
        unlink_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_logout_resets_state_even_when_deregistration_fails() {
        let mut server = mockito::Server::new_async().await;
        let token = make_token(r#"{"id_persona":42,"roles":[4]}"#);
        server
            .mock("POST", "/notificacion/token-fcm")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("POST", "/notificacion/logout-fcm")
            .with_status(500)
            .with_body(r#"{"message":"fcm service down"}"#)
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::new());
        storage.set(&token).await.unwrap();

        let manager = manager_for(
            &server,
            Arc::clone(&storage),
            Arc::new(FakePushPlatform::granted("fcm-abc")),
        );
        manager.restore_session().await;
        manager.logout().await;

        assert!(!manager.auth_state().await.is_authenticated);
        assert_eq!(storage.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_logout_waits_for_login() {
        let mut server = mockito::Server::new_async().await;
        let token = make_token(r#"{"id_persona":7,"roles":[3]}"#);
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"token":"{}"}}"#, token))
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::new());
        let manager = Arc::new(manager_for(
            &server,
            Arc::clone(&storage),
            Arc::new(DisabledPushPlatform),
        ));

        let login_manager = Arc::clone(&manager);
        let login = tokio::spawn(async move {
            login_manager
                .login(LoginRequest {
                    email: "a@b.com".to_string(),
                    password: "x".to_string(),
                })
                .await
        });
        let logout_manager = Arc::clone(&manager);
        let logout = tokio::spawn(async move { logout_manager.logout().await });

        let (login_result, _) = tokio::join!(login, logout);
        login_result.unwrap();

        // Whatever the interleaving, the op lock forces a total order: the
        // final state is one of the two operations' outcomes, never a blend
        let state = manager.auth_state().await;
        if state.is_authenticated {
            assert_eq!(state.user, Some(7));
            assert_eq!(storage.get().await.unwrap(), Some(token));
        } else {
            assert_eq!(state.token, None);
            assert_eq!(storage.get().await.unwrap(), None);
        }
    }
}
