use axum::{
    body::{to_bytes, Body, Bytes},
    http::{
        header::{CONTENT_TYPE, COOKIE},
        HeaderMap, Request, StatusCode,
    },
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use crate::app::{app, AppState};
use crate::auth::Claims;
use crate::config::AppConfig;
use crate::database::models::NewUser;
use crate::database::MemoryStore;

pub const TEST_SECRET: &str = "test-secret";

/// In-process router over a fresh in-memory store
pub struct TestContext {
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn header(&self, name: impl axum::http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

impl TestContext {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.jwt_secret = TEST_SECRET.to_string();
        // Never exists, so page requests that pass the gate end in 404
        config.server.frontend_dir = std::env::temp_dir()
            .join(format!("networth-no-frontend-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned();

        Self {
            state: AppState::new(Arc::new(MemoryStore::new()), config),
        }
    }

    fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// Sign a session token the way the external auth service would
    pub fn mint_token(user_id: Uuid) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes()))
            .expect("token encodes")
    }

    /// Create a user directly in the store and return it with a session token
    pub async fn user_with_token(&self, email: &str) -> (Uuid, String) {
        let user = self
            .state
            .store
            .create_user(NewUser {
                name: "Test User".to_string(),
                email: email.to_string(),
            })
            .await
            .expect("user created");
        (user.id, Self::mint_token(user.id))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send("GET", path, token, None).await
    }

    pub async fn send(&self, method: &str, path: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let body = body.map(|b| b.to_string());
        self.dispatch(method, path, token, body).await
    }

    pub async fn send_raw(&self, method: &str, path: &str, token: Option<&str>, body: &str) -> TestResponse {
        self.dispatch(method, path, token, Some(body.to_string())).await
    }

    async fn dispatch(&self, method: &str, path: &str, token: Option<&str>, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("token={}", token));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };

        let response = self
            .router()
            .oneshot(builder.body(body).expect("request builds"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");

        TestResponse { status, headers, body }
    }
}
