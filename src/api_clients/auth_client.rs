use log::{error, info};
use reqwest::Client;

use crate::api_clients::error_handling::{extract_error_message, map_backend_error};
use crate::constants::MSG_LOGIN_FAILED;
use crate::error::{AppError, AppResult};
use crate::models::{ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest};

/// Dedicated client for the backend auth endpoints. Unauthenticated by
/// definition; the session token only exists after a successful login.
#[derive(Debug, Clone)]
pub struct AuthApiClient {
    http_client: Client,
    base_url: String,
}

impl AuthApiClient {
    pub fn new(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `POST /auth/login`. Non-2xx responses surface the backend `{message}`
    /// as an `AuthError`, falling back to a generic login failure message.
    pub async fn login(&self, credentials: &LoginRequest) -> AppResult<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach login endpoint: {}", e);
                AppError::NetworkError(format!("Failed to connect to server: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            info!("Login rejected by backend. Status: {}", status);
            return Err(AppError::AuthError(extract_error_message(
                &error_text,
                MSG_LOGIN_FAILED,
            )));
        }

        response.json::<LoginResponse>().await.map_err(|e| {
            error!("Failed to parse login response: {}", e);
            AppError::SerdeError(format!("Failed to parse login response: {}", e))
        })
    }

    /// `POST /auth/forgot-password` - requests a reset code for the account.
    pub async fn forgot_password(&self, email: &str) -> AppResult<MessageResponse> {
        let url = format!("{}/auth/forgot-password", self.base_url);
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };

        let response = self.http_client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        Ok(response.json::<MessageResponse>().await?)
    }

    /// `POST /auth/reset-password` - redeems the emailed code for a new password.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> AppResult<MessageResponse> {
        let url = format!("{}/auth/reset-password", self.base_url);

        let response = self.http_client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        Ok(response.json::<MessageResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_login_success_returns_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "email": "a@b.com",
                "password": "x"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"h.p.s"}"#)
            .create_async()
            .await;

        let client = AuthApiClient::new(Client::new(), &server.url());
        let response = client
            .login(&LoginRequest {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.token, "h.p.s");
        mock.assert_async().await;
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

        let client = AuthApiClient::new(Client::new(), &server.url());
        let err = client
            .login(&LoginRequest {
                email: "a@b.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            AppError::AuthError(message) => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_failure_without_message_uses_generic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(500)
            .with_body("")
            .create_async()
            .await;

        let client = AuthApiClient::new(Client::new(), &server.url());
        let err = client
            .login(&LoginRequest {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            AppError::AuthError(message) => assert_eq!(message, MSG_LOGIN_FAILED),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forgot_password_returns_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/forgot-password")
            .with_status(200)
            .with_body(r#"{"message":"Código enviado"}"#)
            .create_async()
            .await;

        let client = AuthApiClient::new(Client::new(), &server.url());
        let response = client.forgot_password("a@b.com").await.unwrap();
        assert_eq!(response.message, "Código enviado");
    }
}
