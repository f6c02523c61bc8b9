use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::{route_gate_middleware, session_auth_middleware};

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Full application router.
///
/// Request order: trace -> route gate -> CORS -> body limit -> handler. Anything
/// not matched by an API route is served from the frontend build directory.
pub fn app(state: AppState) -> Router {
    let frontend = ServeDir::new(&state.config.server.frontend_dir).append_index_html_on_directories(true);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback_service(frontend)
        .layer(DefaultBodyLimit::max(state.config.server.max_request_size_bytes))
        .layer(cors_layer(&state.config.security))
        .layer(middleware::from_fn(route_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(public::api_root))
        .route("/api/health", get(public::health))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/users", get(protected::list_users).post(protected::create_user))
        .route("/api/users/me", get(protected::current_user))
        .route(
            "/api/users/:id",
            get(protected::get_user)
                .put(protected::update_user)
                .delete(protected::delete_user),
        )
        .route("/api/assets", get(protected::list_assets).post(protected::create_asset))
        .route(
            "/api/assets/:id",
            get(protected::get_asset)
                .put(protected::update_asset)
                .delete(protected::delete_asset),
        )
        .route("/api/summary", get(protected::portfolio_summary))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
