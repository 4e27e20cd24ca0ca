use log::debug;
use serde_json::Value;

use crate::error::AppError;

/// Pull the human-readable `message` field out of a backend error body,
/// falling back to the raw text (or a caller-supplied default when the body
/// is empty).
pub fn extract_error_message(response_text: &str, fallback: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(response_text) {
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    if response_text.trim().is_empty() {
        fallback.to_string()
    } else {
        response_text.to_string()
    }
}

/// Map a non-2xx backend response to an [`AppError`].
pub fn map_backend_error(status_code: u16, response_text: &str) -> AppError {
    debug!(
        "Mapping backend error: status={}, response={}",
        status_code, response_text
    );

    let message = extract_error_message(response_text, "Unknown error");

    match status_code {
        400 => AppError::ValidationError(message),
        401 | 403 => AppError::AuthError(message),
        404 => AppError::NotFoundError(message),
        500..=599 => AppError::ExternalServiceError(format!("Server error: {}", message)),
        _ => AppError::ExternalServiceError(format!("Unexpected error ({}): {}", status_code, message)),
    }
}
