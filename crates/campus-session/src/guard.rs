//! Route gating. Protected content never renders while the session is
//! still loading or when nobody is logged in.

use campus_core::models::{Route, SessionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
    /// Session still initializing; render nothing yet.
    Wait,
}

/// Decide what to show for a browser path.
pub fn resolve_route(path: &str, snapshot: &SessionSnapshot) -> RouteDecision {
    if snapshot.loading {
        return RouteDecision::Wait;
    }
    let authenticated = snapshot.state.is_authenticated();
    match Route::from_path(path) {
        None => RouteDecision::Redirect(Route::LANDING),
        Some(route) if route.requires_auth() && !authenticated => {
            RouteDecision::Redirect(Route::Login)
        }
        Some(Route::Login) if authenticated => RouteDecision::Redirect(Route::LANDING),
        Some(route) => RouteDecision::Render(route),
    }
}
