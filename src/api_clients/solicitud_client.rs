use log::info;
use reqwest::Client;
use std::sync::Arc;

use crate::api_clients::error_handling::map_backend_error;
use crate::auth::header_utils::apply_auth_header;
use crate::auth::secure_storage::SecureStorage;
use crate::error::AppResult;
use crate::models::{
    AgregarObservacionRequest, CerrarSolicitudRequest, EmergenciaRequest, NuevaSolicitudRequest,
    Solicitud,
};

/// Client for the report ("solicitud") lifecycle: creation with geolocation,
/// detail retrieval, observations, closure, and the emergency button.
#[derive(Debug, Clone)]
pub struct SolicitudApiClient {
    http_client: Client,
    base_url: String,
    storage: Arc<dyn SecureStorage>,
}

impl SolicitudApiClient {
    pub fn new(http_client: Client, base_url: &str, storage: Arc<dyn SecureStorage>) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
        }
    }

    async fn post_empty(&self, path: &str, body: &impl serde::Serialize) -> AppResult<()> {
        let url = format!("{}{}", self.base_url, path);
        let request = apply_auth_header(self.http_client.post(&url).json(body), &self.storage).await;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }
        Ok(())
    }

    /// `POST /solicitud/nuevaSolicitud` - files a new report.
    pub async fn nueva_solicitud(&self, request: &NuevaSolicitudRequest) -> AppResult<()> {
        self.post_empty("/solicitud/nuevaSolicitud", request).await?;
        info!("Report filed for persona {}", request.id_persona);
        Ok(())
    }

    /// `GET /solicitud/{id}` - full report detail, including observations and
    /// lifecycle events.
    pub async fn detalle(&self, id_solicitud: i64) -> AppResult<Solicitud> {
        let url = format!("{}/solicitud/{}", self.base_url, id_solicitud);
        let request = apply_auth_header(self.http_client.get(&url), &self.storage).await;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_backend_error(status.as_u16(), &error_text));
        }

        Ok(response.json::<Solicitud>().await?)
    }

    /// `POST /solicitud/agregarObservacion` - appends an observation to an
    /// open report.
    pub async fn agregar_observacion(&self, request: &AgregarObservacionRequest) -> AppResult<()> {
        self.post_empty("/solicitud/agregarObservacion", request).await
    }

    /// `POST /solicitud/cerrarSolicitud` - closes a report with a final
    /// observation and closing state.
    pub async fn cerrar_solicitud(&self, request: &CerrarSolicitudRequest) -> AppResult<()> {
        self.post_empty("/solicitud/cerrarSolicitud", request).await?;
        info!("Report {} closed", request.id_solicitud);
        Ok(())
    }

    /// `POST /solicitud/nuevoBotonEmergencia` - emergency alert carrying the
    /// subject's current GPS point.
    pub async fn boton_emergencia(&self, request: &EmergenciaRequest) -> AppResult<()> {
        self.post_empty("/solicitud/nuevoBotonEmergencia", request).await?;
        info!("Emergency alert sent for persona {}", request.id_persona);
        Ok(())
    }
}
