//! Route guard for authenticated pages
//!
//! The guard only checks that an auth cookie is present. The backend still
//! validates the token on every call.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::state::session_token;

/// Pages reachable without signing in
const AUTH_ROUTES: [&str; 4] = ["/login", "/register", "/forgot-password", "/reset-password"];

/// Path prefixes the guard never looks at
const EXCLUDED_PREFIXES: [&str; 4] = ["/api", "/static", "/assets", "/images"];

/// Outcome of the guard for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(&'static str),
}

pub fn is_auth_route(path: &str) -> bool {
    AUTH_ROUTES.iter().any(|route| path.starts_with(route))
}

pub fn is_excluded(path: &str) -> bool {
    path == "/favicon.ico"
        || path == "/health"
        || EXCLUDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Decide what to do with a request for `path`
pub fn classify(path: &str, has_session: bool) -> GuardDecision {
    if is_excluded(path) {
        return GuardDecision::Pass;
    }
    let auth_route = is_auth_route(path);
    if has_session && auth_route {
        return GuardDecision::Redirect("/dashboard");
    }
    if !has_session && !auth_route && path != "/" {
        return GuardDecision::Redirect("/login");
    }
    GuardDecision::Pass
}

/// Redirects anonymous visitors to the login page and signed-in visitors
/// away from the auth pages
pub async fn route_guard(jar: CookieJar, req: Request, next: Next) -> Response {
    let has_session = session_token(&jar).is_some();
    match classify(req.uri().path(), has_session) {
        GuardDecision::Pass => next.run(req).await,
        GuardDecision::Redirect(to) => {
            debug!("Redirecting {} {} to {}", req.method(), req.uri().path(), to);
            // Form posts are followed up with a GET of the target page
            if req.method() == Method::GET || req.method() == Method::HEAD {
                Redirect::temporary(to).into_response()
            } else {
                Redirect::to(to).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_visitors_are_sent_to_login() {
        assert_eq!(classify("/dashboard", false), GuardDecision::Redirect("/login"));
        assert_eq!(classify("/users/42", false), GuardDecision::Redirect("/login"));
    }

    #[test]
    fn signed_in_visitors_skip_auth_pages() {
        assert_eq!(classify("/login", true), GuardDecision::Redirect("/dashboard"));
        assert_eq!(
            classify("/reset-password?token=x", true),
            GuardDecision::Redirect("/dashboard")
        );
        assert_eq!(classify("/dashboard", true), GuardDecision::Pass);
    }

    #[test]
    fn landing_and_auth_pages_are_open() {
        assert_eq!(classify("/", false), GuardDecision::Pass);
        assert_eq!(classify("/", true), GuardDecision::Pass);
        assert_eq!(classify("/register", false), GuardDecision::Pass);
        assert_eq!(classify("/forgot-password", false), GuardDecision::Pass);
    }

    #[test]
    fn excluded_paths_bypass_the_guard() {
        for path in [
            "/api/users",
            "/static/app.css",
            "/favicon.ico",
            "/assets/logo.svg",
            "/images/avatar.png",
            "/health",
        ] {
            assert_eq!(classify(path, false), GuardDecision::Pass, "{path}");
        }
    }
}
