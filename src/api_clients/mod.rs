// Root module for API clients
pub mod auth_client;
pub mod catalog_client;
pub mod error_handling;
pub mod notification_client;
pub mod persona_client;
pub mod solicitud_client;

// Re-export API client components
pub use auth_client::AuthApiClient;
pub use catalog_client::CatalogApiClient;
pub use notification_client::NotificationApiClient;
pub use persona_client::PersonaApiClient;
pub use solicitud_client::SolicitudApiClient;
