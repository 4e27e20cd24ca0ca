use reqwest::Client;
use std::sync::Arc;

use crate::api_clients::error_handling::map_backend_error;
use crate::auth::header_utils::apply_auth_header;
use crate::auth::secure_storage::SecureStorage;
use crate::error::AppResult;
use crate::models::{
    ActualizarPerfilRequest, CedulaInfo, Ciudadano, MensajeResponse, NuevoCiudadanoRequest,
    PerfilCiudadano, Policia,
};
use serde_json::json;

/// Client for persona endpoints: profiles with their report lists, citizen
/// registration, and the civil-registry cedula lookup.
#[derive(Debug, Clone)]
pub struct PersonaApiClient {
    http_client: Client,
    base_url: String,
    storage: Arc<dyn SecureStorage>,
}

impl PersonaApiClient {
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

    /// `GET /persona/ciudadano/{id}` - citizen profile with `solicitudes_creadas`.
    pub async fn ciudadano(&self, id_persona: i64) -> AppResult<Ciudadano> {
        self.get_json(&format!("/persona/ciudadano/{}", id_persona)).await
    }

    /// `GET /persona/policia/{id}` - police profile with `solicitudes_asignadas`.
    pub async fn policia(&self, id_persona: i64) -> AppResult<Policia> {
        self.get_json(&format!("/persona/policia/{}", id_persona)).await
    }

    /// `GET /persona/verificarCedula/{cedula}` - civil-registry lookup used to
    /// prefill the registration form.
    pub async fn verificar_cedula(&self, cedula: &str) -> AppResult<CedulaInfo> {
        self.get_json(&format!("/persona/verificarCedula/{}", cedula)).await
    }

    /// `POST /persona/nuevoCiudadano` - registers a citizen account.
    pub async fn nuevo_ciudadano(&self, request: &NuevoCiudadanoRequest) -> AppResult<()> {
        let url = format!("{}/persona/nuevoCiudadano", self.base_url);
        let response = self.http_client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }
        Ok(())
    }

    /// `GET /persona/ciudadanoUser/{id}` - editable profile for the profile
    /// screen (distinct from [`Self::ciudadano`], which carries the report list).
    pub async fn ciudadano_user(&self, id_persona: i64) -> AppResult<PerfilCiudadano> {
        self.get_json(&format!("/persona/ciudadanoUser/{}", id_persona)).await
    }

    /// `PUT /persona/{id}` - updates the editable profile fields.
    pub async fn actualizar_perfil(
        &self,
        id_persona: i64,
        request: &ActualizarPerfilRequest,
    ) -> AppResult<()> {
        let url = format!("{}/persona/{}", self.base_url, id_persona);
        let builder =
            apply_auth_header(self.http_client.put(&url).json(request), &self.storage).await;
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }
        Ok(())
    }

    /// `POST /persona/verificar-contrasena/{id}` - checks the current password
    /// before allowing a change. The backend answers in prose; the caller
    /// compares `mensaje` against "Contraseña correcta".
    pub async fn verificar_contrasena(
        &self,
        id_persona: i64,
        contrasena: &str,
    ) -> AppResult<MensajeResponse> {
        let url = format!("{}/persona/verificar-contrasena/{}", self.base_url, id_persona);
        let builder = apply_auth_header(
            self.http_client.post(&url).json(&json!({ "contrasena": contrasena })),
            &self.storage,
        )
        .await;
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        Ok(response.json::<MensajeResponse>().await?)
    }

    /// `PUT /persona/actualizar-contrasena/{id}` - sets the new password once
    /// the current one has been verified.
    pub async fn actualizar_contrasena(
        &self,
        id_persona: i64,
        nueva_contrasena: &str,
    ) -> AppResult<()> {
        let url = format!("{}/persona/actualizar-contrasena/{}", self.base_url, id_persona);
        let builder = apply_auth_header(
            self.http_client
                .put(&url)
                .json(&json!({ "nuevaContrasena": nueva_contrasena })),
            &self.storage,
        )
        .await;
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }
        Ok(())
    }
}
