//! Client core for the UPC Móvil incident reporting app.
//!
//! Owns the session/token lifecycle (secure storage, token decode, role
//! gating, push registration), the session event channel, role-gated screen
//! resolution, and typed clients for the backend REST endpoints the screens
//! consume. Rendering and navigation wiring live in the UI layer on top of
//! this crate.

pub mod api_clients;
pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod models;
pub mod navigation;
pub mod push;

pub use crate::auth::{AuthState, SessionManager, SessionPhase};
pub use crate::config::RuntimeConfig;
pub use crate::error::{AppError, AppResult};
pub use crate::events::{SessionEvent, SessionEventBus};
pub use crate::navigation::{Screen, reachable_screens};
