//! Route guard for the dashboard screens.
//!
//! Pure decision logic: given the current [`AuthState`] and the screen the
//! operator asked for, say whether to render it, wait, or send them to the
//! login screen. Hosts re-evaluate it whenever the state changes.

use std::fmt;
use std::str::FromStr;

use crate::session::AuthState;

/// Path of the login screen.
pub const LOGIN_PATH: &str = "/login";

/// A screen of the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Overview,
    Dashboard,
    Pharmacies,
    Medicines,
    Users,
    Data,
    Reports,
    Settings,
}

impl Screen {
    pub const ALL: [Self; 10] = [
        Self::Login,
        Self::Register,
        Self::Overview,
        Self::Dashboard,
        Self::Pharmacies,
        Self::Medicines,
        Self::Users,
        Self::Data,
        Self::Reports,
        Self::Settings,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => LOGIN_PATH,
            Self::Register => "/register",
            Self::Overview => "/",
            Self::Dashboard => "/dashboard",
            Self::Pharmacies => "/pharmacies",
            Self::Medicines => "/medicines",
            Self::Users => "/users",
            Self::Data => "/data",
            Self::Reports => "/reports",
            Self::Settings => "/settings",
        }
    }

    /// Screens reachable without a session.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Look a screen up by its path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|screen| screen.path() == path)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error for an unknown screen path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no screen at path '{0}'")]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

/// What to do with a request for a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still loading: render nothing and do not redirect yet.
    Pending,
    /// Navigate to this path instead.
    Redirect(&'static str),
    /// Render the requested screen.
    Render,
}

/// Decide whether `screen` may be shown in `state`.
#[must_use]
pub const fn guard(state: &AuthState, screen: Screen) -> GuardDecision {
    if screen.is_public() {
        return GuardDecision::Render;
    }
    match state {
        AuthState::Loading => GuardDecision::Pending,
        AuthState::Unauthenticated => GuardDecision::Redirect(LOGIN_PATH),
        AuthState::Authenticated(_) => GuardDecision::Render,
    }
}
