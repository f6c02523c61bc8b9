// gate/mod.rs - Request authorization gate
//
// Decides, per navigation request, whether to let it through or redirect it.
// The decision only looks at the path and whether a session cookie is present.
// Whether that credential is actually valid is checked later by the API layer
// (see middleware::auth).

use serde::Serialize;

/// Cookie carrying the session credential
pub const SESSION_COOKIE: &str = "token";

/// Login surface that unauthenticated visitors are sent to
pub const LOGIN_PATH: &str = "/login";

/// Landing page for visitors who already hold a session
pub const HOME_PATH: &str = "/";

/// Paths reachable without a session. Any path starting with one of these is public.
///
/// `/auth` and `/api` are matched as whole namespaces, so every nested route
/// under them skips the gate. `/_next` is the frontend build's asset namespace
/// and must stay reachable or the pages cannot load their own bundles.
pub const PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/auth",
    "/_next",
    "/api",
    "/favicon.ico",
];

/// Paths the gate never sees: static bundles, optimised images, the favicon.
pub const EXCLUDED_PREFIXES: &[&str] = &["/_next/static", "/_next/image", "/favicon.ico"];

/// Outcome of running the gate over one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingDecision {
    Continue,
    RedirectToLogin,
    RedirectToHome,
}

impl RoutingDecision {
    /// Redirect location, or `None` when the request proceeds unmodified
    pub fn target(&self) -> Option<&'static str> {
        match self {
            RoutingDecision::Continue => None,
            RoutingDecision::RedirectToLogin => Some(LOGIN_PATH),
            RoutingDecision::RedirectToHome => Some(HOME_PATH),
        }
    }
}

/// Matcher stage: false for paths that bypass the gate entirely.
pub fn is_intercepted(path: &str) -> bool {
    !EXCLUDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// True when `path` falls under any public prefix. Case-sensitive.
pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Pure routing decision for a path and the presence of a session credential.
pub fn evaluate(path: &str, has_credential: bool) -> RoutingDecision {
    if !is_public(path) && !has_credential {
        RoutingDecision::RedirectToLogin
    } else if path == LOGIN_PATH && has_credential {
        RoutingDecision::RedirectToHome
    } else {
        RoutingDecision::Continue
    }
}
