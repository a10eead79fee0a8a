//! Authentication gate and view routing.
//!
//! The gate is a two-state machine (`Unauthenticated` / `Authenticated`)
//! combined with the current navigation target. The admin route is guarded:
//! it resolves to the login form until an admin is authenticated.
//!
//! ```text
//!   Unauthenticated ──login ok──▶ Authenticated { user }
//!         ▲                              │
//!         └────────── logout ────────────┘   (also leaves the admin route)
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{AdminUserId, Email};

/// URL fragment that selects the admin route.
pub const ADMIN_FRAGMENT: &str = "#admin";

/// Identity of the logged-in admin.
///
/// Minimal data kept in the session to identify who is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
}

/// Authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No admin session.
    #[default]
    Unauthenticated,
    /// An admin session is present.
    Authenticated {
        /// The logged-in admin.
        user: CurrentAdmin,
    },
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The logged-in admin, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentAdmin> {
        match self {
            Self::Authenticated { user } => Some(user),
            Self::Unauthenticated => None,
        }
    }

    /// Resolve a navigation target to what should be rendered.
    ///
    /// The admin route renders the login form while unauthenticated.
    #[must_use]
    pub const fn view_for(&self, route: Route) -> View {
        match (route, self) {
            (Route::Public, _) => View::Public,
            (Route::Admin, Self::Unauthenticated) => View::Login,
            (Route::Admin, Self::Authenticated { .. }) => View::AdminDashboard,
        }
    }
}

impl From<Option<CurrentAdmin>> for AuthState {
    fn from(user: Option<CurrentAdmin>) -> Self {
        user.map_or(Self::Unauthenticated, |user| Self::Authenticated { user })
    }
}

/// Navigation target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public landing page.
    #[default]
    Public,
    /// Admin console.
    Admin,
}

impl Route {
    /// Parse a URL fragment. Only `#admin` (with or without `#`) selects the
    /// admin route; anything else is public.
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        let fragment = fragment.trim();
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Public
        }
    }

    /// The URL fragment for this route.
    #[must_use]
    pub const fn fragment(self) -> &'static str {
        match self {
            Self::Public => "",
            Self::Admin => ADMIN_FRAGMENT,
        }
    }
}

/// What the top-level view router renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Public landing page with the continue button.
    Public,
    /// Admin login form (admin route, unauthenticated).
    Login,
    /// Admin dashboard (admin route, authenticated).
    AdminDashboard,
}

/// Auth state plus current route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthGate {
    state: AuthState,
    route: Route,
}

impl AuthGate {
    #[must_use]
    pub fn new(state: AuthState, route: Route) -> Self {
        Self { state, route }
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    /// What to render for the current route and state.
    #[must_use]
    pub const fn view(&self) -> View {
        self.state.view_for(self.route)
    }

    /// Change the navigation target. Never alters the auth state.
    pub fn navigate(&mut self, route: Route) -> View {
        self.route = route;
        self.view()
    }

    /// Record a successful login.
    pub fn authenticated(&mut self, user: CurrentAdmin) -> View {
        self.state = AuthState::Authenticated { user };
        self.view()
    }

    /// Replace the state with whatever the backend reports (session reload).
    pub fn restore(&mut self, state: AuthState) -> View {
        self.state = state;
        self.view()
    }

    /// Log out, unconditionally, and leave any admin-only view.
    pub fn logout(&mut self) -> View {
        self.state = AuthState::Unauthenticated;
        self.route = Route::Public;
        self.view()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::new(1),
            email: Email::parse("admin@example.com").unwrap(),
            name: "Admin".to_owned(),
        }
    }

    #[test]
    fn test_route_from_fragment() {
        assert_eq!(Route::from_fragment("#admin"), Route::Admin);
        assert_eq!(Route::from_fragment("admin"), Route::Admin);
        assert_eq!(Route::from_fragment("#ADMIN"), Route::Admin);
        assert_eq!(Route::from_fragment(""), Route::Public);
        assert_eq!(Route::from_fragment("#settings"), Route::Public);
        assert_eq!(Route::Admin.fragment(), "#admin");
    }

    #[test]
    fn test_admin_route_is_guarded() {
        let mut gate = AuthGate::default();
        assert_eq!(gate.navigate(Route::Admin), View::Login);
        assert_eq!(gate.authenticated(admin()), View::AdminDashboard);
        assert_eq!(gate.logout(), View::Public);
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
        assert_eq!(gate.navigate(Route::Admin), View::Login);
    }

    #[test]
    fn test_navigating_away_keeps_session() {
        let mut gate = AuthGate::new(AuthState::Authenticated { user: admin() }, Route::Admin);
        assert_eq!(gate.navigate(Route::Public), View::Public);
        assert!(gate.state().is_authenticated());
        assert_eq!(gate.navigate(Route::Admin), View::AdminDashboard);
    }

    #[test]
    fn test_logout_when_already_logged_out() {
        let mut gate = AuthGate::new(AuthState::Unauthenticated, Route::Admin);
        assert_eq!(gate.logout(), View::Public);
        assert_eq!(gate.route(), Route::Public);
    }

    #[test]
    fn test_auth_state_from_option() {
        assert_eq!(AuthState::from(None), AuthState::Unauthenticated);
        let state = AuthState::from(Some(admin()));
        assert_eq!(state.user().map(|u| u.name.as_str()), Some("Admin"));
    }
}
