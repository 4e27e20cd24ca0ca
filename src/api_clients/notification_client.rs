use log::debug;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;

use crate::api_clients::error_handling::map_backend_error;
use crate::auth::header_utils::apply_auth_header;
use crate::auth::secure_storage::SecureStorage;
use crate::error::{AppError, AppResult};
use crate::models::Notificacion;

/// Client for linking and unlinking the device push token with the backend.
///
/// Registration is bearer-authenticated; unlinking happens during logout and
/// identifies the subject explicitly instead.
#[derive(Debug, Clone)]
pub struct NotificationApiClient {
    http_client: Client,
    base_url: String,
    storage: Arc<dyn SecureStorage>,
}

impl NotificationApiClient {
    pub fn new(http_client: Client, base_url: &str, storage: Arc<dyn SecureStorage>) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
        }
    }

    /// `POST /notificacion/token-fcm` - registers (or overwrites) the device
    /// push token for the subject identified by the bearer token.
    pub async fn register_token(&self, fcm_token: &str) -> AppResult<()> {
        let url = format!("{}/notificacion/token-fcm", self.base_url);

        let request = apply_auth_header(
            self.http_client
                .post(&url)
                .json(&json!({ "fcmToken": fcm_token })),
            &self.storage,
        )
        .await;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        debug!("Push token registered with backend");
        Ok(())
    }

    /// `GET /notificaciones` - in-app notification feed for the subject
    /// identified by the bearer token.
    pub async fn notificaciones(&self) -> AppResult<Vec<Notificacion>> {
        let url = format!("{}/notificaciones", self.base_url);

        let request = apply_auth_header(self.http_client.get(&url), &self.storage).await;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        Ok(response.json::<Vec<Notificacion>>().await?)
    }

    /// `POST /notificacion/logout-fcm` - unlinks the push token from the
    /// subject if it matches the one currently stored server side.
    pub async fn deregister_token(&self, id_persona: i64, fcm_token: &str) -> AppResult<()> {
        let url = format!("{}/notificacion/logout-fcm", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "id_persona": id_persona, "fcmToken": fcm_token }))
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to reach backend: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        debug!("Push token unlinked from backend");
        Ok(())
    }
}
