#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{redirect, Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use networth_api::auth::Claims;

pub const JWT_SECRET: &str = "integration-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let missing_frontend = std::env::temp_dir().join(format!("networth-it-{}", Uuid::new_v4()));

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_networth-api"));
        cmd.args(["--memory", "--host", "127.0.0.1", "--port", &port.to_string()])
            .env("JWT_SECRET", JWT_SECRET)
            .env("FRONTEND_DIR", missing_frontend)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/api/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client that reports redirects instead of following them
pub fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("client builds")
}

/// Sign a session token for `user_id` with the server's secret
pub fn token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + 3600,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes()))
        .expect("token encodes")
}

pub fn session_cookie(token: &str) -> String {
    format!("token={}", token)
}

/// Register a fresh user through the API and return its id with a session token
pub async fn register_user(server: &TestServer, name: &str) -> Result<(Uuid, String)> {
    let bootstrap = token_for(Uuid::new_v4());
    let email = format!("{}-{}@example.com", name, Uuid::new_v4().simple());

    let res = client()
        .post(server.url("/api/users"))
        .header("cookie", session_cookie(&bootstrap))
        .json(&json!({ "name": name, "email": email }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

    let body: Value = res.json().await?;
    let id = body["data"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .context("created user has no id")?;
    Ok((id, token_for(id)))
}
