use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::ALLOWED_ROLES;
use crate::error::{AppError, AppResult};

/// Claims this client reads out of the session token payload. Everything else
/// in the payload is ignored; the signature is never verified here - the
/// backend re-validates it on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id_persona: i64,
    pub roles: Vec<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl SessionClaims {
    /// Whether any assigned role is one the client treats as authenticated.
    pub fn has_allowed_role(&self) -> bool {
        self.roles.iter().any(|r| ALLOWED_ROLES.contains(r))
    }

    /// Seconds until the `exp` claim, if present and in the future. Informational
    /// only; expiry is enforced server side.
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        let exp = self.exp?;
        let seconds = exp - Utc::now().timestamp();
        if seconds <= 0 { None } else { Some(seconds) }
    }
}

/// Decode the payload segment of a signed session token into [`SessionClaims`].
///
/// Splits on the structural `.` delimiter and base64url-decodes the middle
/// segment. Fails with `TokenDecodeError` for anything that is not a
/// three-segment token carrying a JSON payload.
pub fn decode_claims(token: &str) -> AppResult<SessionClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AppError::TokenDecodeError(format!(
            "Invalid token format: expected 3 segments, got {}",
            parts.len()
        )));
    }

    let payload = base64_url_decode(parts[1])?;

    serde_json::from_slice(&payload)
        .map_err(|e| AppError::TokenDecodeError(format!("Failed to parse token payload: {}", e)))
}

/// Decode base64url (tokens use base64url without padding, not standard base64)
fn base64_url_decode(input: &str) -> AppResult<Vec<u8>> {
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| AppError::TokenDecodeError(format!("Base64 decode error: {}", e)))
}
