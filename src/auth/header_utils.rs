use log::error;
use reqwest::RequestBuilder;
use std::sync::Arc;

use super::secure_storage::SecureStorage;

/// Applies the bearer authorization header from the stored session token.
/// Requests go out unauthenticated when no token is stored or the store
/// cannot be read; the backend decides what that is allowed to reach.
pub async fn apply_auth_header(
    builder: RequestBuilder,
    storage: &Arc<dyn SecureStorage>,
) -> RequestBuilder {
    match storage.get().await {
        Ok(Some(token)) => builder.header("Authorization", format!("Bearer {}", token)),
        Ok(None) => builder,
        Err(e) => {
            error!("Could not read session token for request auth: {}", e);
            builder
        }
    }
}
