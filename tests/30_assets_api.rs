mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = common::client().get(server.url("/api/health")).send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn forged_token_is_rejected_by_api() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = common::client()
        .get(server.url("/api/users/me"))
        .header("cookie", "token=forged.token.value")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn bearer_header_is_accepted() -> Result<()> {
    let server = common::ensure_server().await?;
    let (user_id, token) = common::register_user(server, "bearer").await?;

    let res = common::client()
        .get(server.url("/api/users/me"))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["id"], user_id.to_string());
    Ok(())
}

#[tokio::test]
async fn asset_lifecycle_and_summary() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();
    let (_, token) = common::register_user(server, "owner").await?;
    let cookie = common::session_cookie(&token);

    let mut ids = Vec::new();
    for payload in [
        json!({"name": "Checking", "category": "cash", "value": "2500.00"}),
        json!({"name": "Index fund", "category": "investment", "value": "10000.50"}),
        json!({"name": "Mortgage", "category": "liability", "value": "7000.00"}),
        json!({"name": "Pension", "category": "retirement", "value": "300", "currency": "eur"}),
    ] {
        let res = client
            .post(server.url("/api/assets"))
            .header("cookie", &cookie)
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = res.json::<Value>().await?;
        ids.push(body["data"]["id"].as_str().unwrap_or_default().to_string());
    }

    let summary = client
        .get(server.url("/api/summary"))
        .header("cookie", &cookie)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(summary["data"]["asset_count"], 4);
    let currencies = summary["data"]["currencies"].as_array().cloned().unwrap_or_default();
    assert_eq!(currencies.len(), 2);
    assert_eq!(currencies[0]["currency"], "EUR");
    assert_eq!(currencies[1]["currency"], "USD");
    assert_eq!(currencies[1]["net_worth"], "5500.50");

    let res = client
        .put(server.url(&format!("/api/assets/{}", ids[2])))
        .header("cookie", &cookie)
        .json(&json!({"value": "6500.00", "notes": "refinanced"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["notes"], "refinanced");

    let res = client
        .delete(server.url(&format!("/api/assets/{}", ids[0])))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let listed = client
        .get(server.url("/api/assets"))
        .header("cookie", &cookie)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn assets_are_private_to_their_owner() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();
    let (_, alice) = common::register_user(server, "alice").await?;
    let (_, bob) = common::register_user(server, "bob").await?;

    let created = client
        .post(server.url("/api/assets"))
        .header("cookie", common::session_cookie(&alice))
        .json(&json!({"name": "Bike", "category": "vehicle", "value": 800}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["data"]["id"].as_str().unwrap_or_default().to_string();

    let res = client
        .delete(server.url(&format!("/api/assets/{}", id)))
        .header("cookie", common::session_cookie(&bob))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn oversized_values_are_rejected_and_summary_stays_up() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();
    let (_, token) = common::register_user(server, "whale").await?;
    let cookie = common::session_cookie(&token);

    for _ in 0..2 {
        let res = client
            .post(server.url("/api/assets"))
            .header("cookie", &cookie)
            .json(&json!({"name": "Max", "category": "cash", "value": "79228162514264337593543950335"}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let res = client
        .get(server.url("/api/summary"))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
