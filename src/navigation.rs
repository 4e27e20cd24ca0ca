//! Role-gated screen resolution.
//!
//! Pure mapping from [`AuthState`] to the set of reachable screens. The UI
//! layer owns rendering and wiring; this module only answers "what may this
//! subject reach right now" and is recomputed on every state change.

use serde::{Deserialize, Serialize};

use crate::auth::session_manager::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    // Unauthenticated
    Login,
    Registro,
    RecuperarCuenta,
    // Ciudadano (role 4)
    MainCitizen,
    MisDenuncias,
    DenunciaDetail,
    // Policía (role 3)
    MainPolice,
    DenunciasAsignadas,
    DenunciaDetailPolice,
    ResumenActividad,
    // Common to any authenticated subject
    Informacion,
    MiPerfil,
    ActualizarContrasena,
    Devs,
    Emergencia,
}

const AUTH_SCREENS: &[Screen] = &[Screen::Login, Screen::Registro, Screen::RecuperarCuenta];

const CITIZEN_SCREENS: &[Screen] = &[
    Screen::MainCitizen,
    Screen::MisDenuncias,
    Screen::DenunciaDetail,
];

// Police also see the citizen report list, titled differently by the UI
const POLICE_SCREENS: &[Screen] = &[
    Screen::MainPolice,
    Screen::DenunciasAsignadas,
    Screen::DenunciaDetailPolice,
    Screen::ResumenActividad,
    Screen::MisDenuncias,
];

const COMMON_SCREENS: &[Screen] = &[
    Screen::Informacion,
    Screen::MiPerfil,
    Screen::ActualizarContrasena,
    Screen::Devs,
    Screen::Emergencia,
];

/// Resolve the screens reachable from the given state. A subject holding both
/// role 3 and role 4 gets the union of both graphs, without duplicates.
pub fn reachable_screens(state: &AuthState) -> Vec<Screen> {
    if !state.is_authenticated {
        return AUTH_SCREENS.to_vec();
    }

    let roles = state.role.as_deref().unwrap_or(&[]);
    let mut screens: Vec<Screen> = Vec::new();

    if roles.contains(&4) {
        screens.extend_from_slice(CITIZEN_SCREENS);
    }
    if roles.contains(&3) {
        for screen in POLICE_SCREENS {
            if !screens.contains(screen) {
                screens.push(*screen);
            }
        }
    }
    screens.extend_from_slice(COMMON_SCREENS);
    screens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn authenticated_with(roles: Vec<i64>) -> AuthState {
        AuthState {
            is_authenticated: true,
            user: Some(1),
            token: Some("h.p.s".to_string()),
            role: Some(roles),
            error_login: None,
            fcm_token: None,
        }
    }

    #[test]
    fn test_unauthenticated_sees_only_auth_screens() {
        let screens = reachable_screens(&AuthState::default());
        assert_eq!(
            screens,
            vec![Screen::Login, Screen::Registro, Screen::RecuperarCuenta]
        );
    }

    #[test]
    fn test_citizen_sees_citizen_and_common_screens() {
        let screens = reachable_screens(&authenticated_with(vec![4]));
        assert!(screens.contains(&Screen::MainCitizen));
        assert!(screens.contains(&Screen::MisDenuncias));
        assert!(screens.contains(&Screen::Emergencia));
        assert!(!screens.contains(&Screen::MainPolice));
        assert!(!screens.contains(&Screen::Login));
    }

    #[test]
    fn test_police_sees_police_and_common_screens() {
        let screens = reachable_screens(&authenticated_with(vec![3]));
        assert!(screens.contains(&Screen::MainPolice));
        assert!(screens.contains(&Screen::ResumenActividad));
        assert!(screens.contains(&Screen::MisDenuncias));
        assert!(!screens.contains(&Screen::MainCitizen));
    }

    #[test]
    fn test_dual_role_gets_union_without_duplicates() {
        let screens = reachable_screens(&authenticated_with(vec![3, 4]));
        assert!(screens.contains(&Screen::MainCitizen));
        assert!(screens.contains(&Screen::MainPolice));
        assert_eq!(
            screens.iter().filter(|s| **s == Screen::MisDenuncias).count(),
            1
        );
    }

    #[test]
    fn test_screen_sets_are_recomputed_from_state() {
        let mut state = authenticated_with(vec![4]);
        assert!(reachable_screens(&state).contains(&Screen::MainCitizen));

        state.is_authenticated = false;
        state.role = None;
        state.token = None;
        assert_eq!(
            reachable_screens(&state),
            vec![Screen::Login, Screen::Registro, Screen::RecuperarCuenta]
        );
    }
}
