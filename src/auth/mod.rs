pub mod claims;
pub mod header_utils;
pub mod secure_storage;
pub mod session_manager;

pub use claims::{SessionClaims, decode_claims};
pub use secure_storage::{KeyringStorage, MemoryStorage, SecureStorage};
pub use session_manager::{AuthState, SessionManager, SessionPhase};
