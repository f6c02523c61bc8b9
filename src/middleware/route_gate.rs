use axum::{
    extract::Request,
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::gate::{self, SESSION_COOKIE};

/// Outermost request stage: applies the matcher exclusion, then the gate.
///
/// Never fails. A request either passes through untouched or is answered with a
/// 307 redirect to the login page or the home page.
pub async fn route_gate_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if !gate::is_intercepted(&path) {
        return next.run(request).await;
    }

    let has_credential = cookie_value(request.headers(), SESSION_COOKIE).is_some();
    let decision = gate::evaluate(&path, has_credential);

    match decision.target() {
        None => next.run(request).await,
        Some(target) => {
            tracing::debug!(
                "Gate {:?}: {} (credential present: {}) -> {}",
                decision,
                path,
                has_credential,
                target
            );
            Redirect::temporary(target).into_response()
        }
    }
}

/// Value of the named cookie across all `Cookie` headers.
///
/// Pairs without `=`, headers that are not valid UTF-8 and empty values are
/// all treated as absent.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::LOCATION, HeaderValue, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn router() -> Router {
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/dashboard/assets", get(|| async { "assets" }))
            .route("/login", get(|| async { "login" }))
            .route("/_next/static/app.js", get(|| async { "bundle" }))
            .route("/api/health", get(|| async { "ok" }))
            .layer(middleware::from_fn(route_gate_middleware))
    }

    async fn send(path: &str, cookie: Option<&str>) -> Response {
        let mut builder = axum::http::Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        router()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> Option<&str> {
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn protected_page_without_cookie_redirects_to_login() {
        let res = send("/dashboard/assets", None).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), Some("/login"));
    }

    #[tokio::test]
    async fn protected_page_with_cookie_passes() {
        let res = send("/dashboard/assets", Some("theme=dark; token=abc")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_with_cookie_redirects_home() {
        let res = send("/login", Some("token=whatever")).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), Some("/"));
    }

    #[tokio::test]
    async fn login_without_cookie_passes() {
        let res = send("/login", None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_token_counts_as_absent() {
        let res = send("/", Some("token=")).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), Some("/login"));
    }

    #[tokio::test]
    async fn excluded_and_public_paths_pass() {
        assert_eq!(send("/_next/static/app.js", None).await.status(), StatusCode::OK);
        assert_eq!(send("/api/health", None).await.status(), StatusCode::OK);
    }

    #[test]
    fn parses_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1; b=2"));
        headers.append(COOKIE, HeaderValue::from_static("token=\"xyz\""));
        assert_eq!(cookie_value(&headers, "b"), Some("2"));
        assert_eq!(cookie_value(&headers, "token"), Some("xyz"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn empty_duplicate_does_not_hide_later_token() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("token=; theme=dark; token=abc"));
        assert_eq!(cookie_value(&headers, "token"), Some("abc"));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("token=; token=\"\""));
        assert_eq!(cookie_value(&headers, "token"), None);
    }

    #[tokio::test]
    async fn path_scoped_empty_token_still_passes() {
        let res = send("/dashboard/assets", Some("token=; token=abc")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn malformed_cookies_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("garbage;;token; tokenx=1"));
        assert_eq!(cookie_value(&headers, "token"), None);
    }
}
