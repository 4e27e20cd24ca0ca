use reqwest::Client;
use std::sync::Arc;

use crate::api_clients::error_handling::map_backend_error;
use crate::auth::header_utils::apply_auth_header;
use crate::auth::secure_storage::SecureStorage;
use crate::error::AppResult;
use crate::models::{Canton, Parroquia, Subtipo, Subzona, Tipo};

/// Read-only catalogs feeding the cascading form pickers: report
/// tipo/subtipo, and the subzona -> canton -> parroquia hierarchy.
#[derive(Debug, Clone)]
pub struct CatalogApiClient {
    http_client: Client,
    base_url: String,
    storage: Arc<dyn SecureStorage>,
}

impl CatalogApiClient {
    pub fn new(http_client: Client, base_url: &str, storage: Arc<dyn SecureStorage>) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let request = apply_auth_header(self.http_client.get(&url), &self.storage).await;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        Ok(response.json::<T>().await?)
    }

    /// `GET /subtipos/tipos`
    pub async fn tipos(&self) -> AppResult<Vec<Tipo>> {
        self.get_json("/subtipos/tipos").await
    }

    /// `GET /subtipos/tipos/{id}/subtipos`
    pub async fn subtipos(&self, id_tipo: i64) -> AppResult<Vec<Subtipo>> {
        self.get_json(&format!("/subtipos/tipos/{}/subtipos", id_tipo)).await
    }

    /// `GET /circuitos/subzonas`
    pub async fn subzonas(&self) -> AppResult<Vec<Subzona>> {
        self.get_json("/circuitos/subzonas").await
    }

    /// `GET /circuitos/subzonas/{id}/cantones`
    pub async fn cantones(&self, id_subzona: i64) -> AppResult<Vec<Canton>> {
        self.get_json(&format!("/circuitos/subzonas/{}/cantones", id_subzona)).await
    }

    /// `GET /circuitos/cantones/{id}/parroquias`
    pub async fn parroquias(&self, id_canton: i64) -> AppResult<Vec<Parroquia>> {
        self.get_json(&format!("/circuitos/cantones/{}/parroquias", id_canton)).await
    }
}
