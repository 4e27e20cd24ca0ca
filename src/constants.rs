use once_cell::sync::Lazy;
use std::collections::HashSet;

// Keyring identity for the stored session token. The account name is the
// single fixed key under which the raw token is persisted.
pub const SERVICE_NAME_FOR_KEYRING: &str = "upc-movil";
pub const ACCOUNT_NAME_FOR_KEYRING: &str = "userToken";

// Default fallback URL for the backend API. Prefer environment variables.
pub const API_URL: &str = "http://localhost:3000";

// Generic user-facing messages (backend messages take precedence when present)
pub const MSG_LOGIN_FAILED: &str = "Error al iniciar sesión";
pub const MSG_UNAUTHORIZED_ROLE: &str = "Acceso no autorizado";

// Role tags that this client accepts as authenticated.
// 3 = policía, 4 = ciudadano. Anything else is treated as no session.
pub static ALLOWED_ROLES: Lazy<HashSet<i64>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.insert(3);
    set.insert(4);
    set
});
