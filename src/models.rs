use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Generic `{ message }` body returned by several backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// Solicitud (incident report) payloads. Field names follow the backend wire
// format, which mixes snake_case and the odd camelCase key.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuevaSolicitudRequest {
    pub id_persona: i64,
    pub id_tipo: i64,
    pub id_subtipo: i64,
    pub observacion: String,
    pub direccion: String,
    #[serde(rename = "puntoGPS")]
    pub punto_gps: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgregarObservacionRequest {
    pub id_solicitud: i64,
    pub observacion: String,
    pub id_persona: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CerrarSolicitudRequest {
    pub id_solicitud: i64,
    pub observacion: String,
    pub estado_cierre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergenciaRequest {
    pub id_persona: i64,
    #[serde(rename = "puntoGPS")]
    pub punto_gps: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaResumen {
    pub id_persona: i64,
    #[serde(default)]
    pub nombres: Option<String>,
    #[serde(default)]
    pub apellidos: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observacion {
    pub id_observacion: i64,
    pub observacion: String,
    pub fecha: String,
    #[serde(default)]
    pub persona: Option<PersonaResumen>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolicitudEvento {
    pub id_evento: i64,
    pub fecha: String,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub persona: Option<PersonaResumen>,
}

/// Full report detail as returned by `GET /solicitud/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solicitud {
    pub id_solicitud: i64,
    pub tipo_solicitud: String,
    pub subtipo: String,
    pub estado: String,
    pub fecha_creacion: String,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default, rename = "puntoGPS")]
    pub punto_gps: Option<String>,
    #[serde(default)]
    pub observacion: Option<String>,
    #[serde(default)]
    pub policia_asignado: Option<PersonaResumen>,
    #[serde(default, rename = "Observacions")]
    pub observaciones: Vec<Observacion>,
    #[serde(default, rename = "SolicitudEventoPersonas")]
    pub eventos: Vec<SolicitudEvento>,
}

/// Report summary as embedded in persona responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolicitudResumen {
    pub id_solicitud: i64,
    pub tipo_solicitud: String,
    pub subtipo: String,
    pub estado: String,
    pub fecha_creacion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ciudadano {
    pub id_persona: i64,
    pub nombres: String,
    pub apellidos: String,
    #[serde(default)]
    pub solicitudes_creadas: Vec<SolicitudResumen>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policia {
    pub id_persona: i64,
    pub nombres: String,
    pub apellidos: String,
    #[serde(default)]
    pub solicitudes_asignadas: Vec<SolicitudResumen>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuevoCiudadanoRequest {
    pub cedula: String,
    pub nombres: String,
    pub apellidos: String,
    pub id_parroquia: i64,
    pub telefono: String,
    pub email: String,
    pub password: String,
}

/// Spanish-keyed `{ mensaje }` body used by the persona endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MensajeResponse {
    pub mensaje: String,
}

/// Editable profile as returned by `GET /persona/ciudadanoUser/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfilCiudadano {
    pub cedula: String,
    pub nombres: String,
    pub apellidos: String,
    pub telefono: String,
    pub email: String,
    #[serde(default)]
    pub genero: Option<String>,
}

/// Editable subset sent to `PUT /persona/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualizarPerfilRequest {
    pub nombres: String,
    pub apellidos: String,
    pub telefono: String,
    pub email: String,
}

/// Entry in the in-app notification feed. The backend has emitted both
/// `titulo` and `title` for this field over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notificacion {
    #[serde(default, alias = "title")]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub fecha: Option<String>,
}

/// Civil-registry data returned by `GET /persona/verificarCedula/{cedula}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CedulaInfo {
    pub nombres: String,
    pub apellidos: String,
    #[serde(default)]
    pub fecha_nacimiento: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
}

// Catalog entries for the cascading form pickers

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tipo {
    pub id_tipo: i64,
    pub descripcion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtipo {
    pub id_subtipo: i64,
    pub descripcion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subzona {
    pub id_subzona: i64,
    pub nombre_subzona: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canton {
    pub id_canton: i64,
    pub nombre_canton: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parroquia {
    pub id_parroquia: i64,
    pub nombre_parroquia: String,
}
