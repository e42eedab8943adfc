//! Which screen is shown, and the guard that keeps signed-out users on the
//! login screen.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Upload,
    Manage,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Upload, Tab::Manage];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Upload => "Upload Invoice",
            Tab::Manage => "Manage Expenses",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Login,
    Dashboard(Tab),
}

/// Where a successful login lands.
pub const AFTER_LOGIN: Route = Route::Dashboard(Tab::Manage);

impl Route {
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard(_))
    }

    /// The route actually shown for a requested one.
    ///
    /// Protected routes fall back to [Route::Login] without a session, and
    /// the login screen is skipped when already signed in.
    pub fn resolve(self, authenticated: bool) -> Route {
        match (self, authenticated) {
            (route, false) if route.is_protected() => Route::Login,
            (Route::Login, true) => AFTER_LOGIN,
            (route, _) => route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, Tab, AFTER_LOGIN};

    #[test]
    fn dashboard_requires_session() {
        for tab in Tab::ALL {
            assert_eq!(Route::Dashboard(tab).resolve(false), Route::Login);
            assert_eq!(Route::Dashboard(tab).resolve(true), Route::Dashboard(tab));
        }
    }

    #[test]
    fn login_is_skipped_when_signed_in() {
        assert_eq!(Route::Login.resolve(false), Route::Login);
        assert_eq!(Route::Login.resolve(true), Route::Dashboard(Tab::Manage));
    }

    #[test]
    fn login_lands_on_expense_management() {
        assert_eq!(AFTER_LOGIN, Route::Dashboard(Tab::Manage));
        assert!(AFTER_LOGIN.is_protected());
        assert!(!Route::Login.is_protected());
    }
}
