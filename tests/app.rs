use reachout::{
    app::AppState,
    config::{Config, Environment, SmtpConfig},
    db, http,
    mail::Mailer,
};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::task::JoinHandle;

fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".to_string(),
        database: "sqlite://:memory:".to_string(),
        db_pool: 5,
        smtp: SmtpConfig {
            host: "127.0.0.1".to_string(),
            // Nothing listens here, so both sends fail; HTTP outcomes must
            // not change because of that.
            port: 1,
            secure: false,
            user: None,
            pass: None,
            from: "no-reply@example.test".to_string(),
        },
        recipient: "owner@example.test".to_string(),
        site_name: "Example".to_string(),
        allowed_origins: Vec::new(),
        body_limit: 1024 * 1024,
        rate_max: 10_000,
        rate_window_secs: 60,
        submit_rate_max: 10_000,
        submit_rate_window_secs: 60,
        admin_token: None,
        environment: Environment::Development,
    }
}

async fn start_server_with(config: Config) -> (String, JoinHandle<()>) {
    let db_url = db::ensure_sqlite_path(&config.database);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .expect("connect memory sqlite");
    db::run_migrations(&pool).await.expect("migrate");
    let config = Arc::new(config);
    let mailer = Mailer::from_config(&config).expect("mailer");
    let state = AppState {
        db: pool,
        config,
        mailer,
        started: Instant::now(),
    };
    let app = http::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    (format!("http://{}", addr), handle)
}

async fn start_server() -> (String, JoinHandle<()>) {
    start_server_with(test_config()).await
}

async fn submit(
    client: &reqwest::Client,
    base: &str,
    body: &serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{}/api/contact/submit", base))
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn submit_and_fetch_round_trip() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = submit(
        &client,
        &base,
        &json!({ "name": "Alice", "email": "alice@example.com", "message": "Hello" }),
    )
    .await;
    // Mail transport is unreachable in tests; persistence alone decides.
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["success"], json!(true));
    let id = v["contactId"].as_i64().expect("numeric contactId");

    let res = client
        .get(format!("{}/api/contact/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["success"], json!(true));
    assert_eq!(v["data"]["id"].as_i64(), Some(id));
    assert_eq!(v["data"]["name"], json!("Alice"));
    assert_eq!(v["data"]["email"], json!("alice@example.com"));
    assert!(v["data"]["company"].is_null());
    assert!(v["data"]["created_at"].is_string());
}

#[tokio::test]
async fn invalid_submissions_write_nothing() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let bad_payloads = [
        json!({ "email": "alice@example.com", "message": "Hello" }),
        json!({ "name": "Alice", "message": "Hello" }),
        json!({ "name": "Alice", "email": "alice@example.com" }),
        json!({ "name": "Alice", "email": "not-an-email", "message": "Hello" }),
        json!({ "name": "Alice", "email": "alice@example.com", "message": "x".repeat(6000) }),
    ];
    for payload in &bad_payloads {
        let res = submit(&client, &base, payload).await;
        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        let v: serde_json::Value = res.json().await.unwrap();
        assert_eq!(v["success"], json!(false));
        assert!(!v["errors"].as_array().unwrap().is_empty());
    }

    let res = client
        .get(format!("{}/api/contact", base))
        .send()
        .await
        .unwrap();
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["pagination"]["total"], json!(0));
}

#[tokio::test]
async fn oversized_message_names_the_field() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = submit(
        &client,
        &base,
        &json!({ "name": "Alice", "email": "alice@example.com", "message": "x".repeat(6000) }),
    )
    .await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let v: serde_json::Value = res.json().await.unwrap();
    let errors = v["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], json!("message"));
}

#[tokio::test]
async fn repeat_submissions_get_distinct_increasing_ids() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let payload = json!({ "name": "Bob", "email": "bob@example.com", "message": "Hi" });
    let first: serde_json::Value = submit(&client, &base, &payload).await.json().await.unwrap();
    let second: serde_json::Value = submit(&client, &base, &payload).await.json().await.unwrap();
    let a = first["contactId"].as_i64().unwrap();
    let b = second["contactId"].as_i64().unwrap();
    assert!(b > a, "expected {b} > {a}");
}

#[tokio::test]
async fn listing_paginates_newest_first() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    for name in ["One", "Two", "Three"] {
        let res = submit(
            &client,
            &base,
            &json!({ "name": name, "email": "n@example.com", "message": "m" }),
        )
        .await;
        assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/api/contact?page=1&limit=2", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: serde_json::Value = res.json().await.unwrap();
    let data = v["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], json!("Three"));
    assert_eq!(data[1]["name"], json!("Two"));
    assert_eq!(v["pagination"]["page"], json!(1));
    assert_eq!(v["pagination"]["limit"], json!(2));
    assert_eq!(v["pagination"]["total"], json!(3));
    assert_eq!(v["pagination"]["totalPages"], json!(2));

    let res = client
        .get(format!("{}/api/contact?page=2&limit=2", base))
        .send()
        .await
        .unwrap();
    let v: serde_json::Value = res.json().await.unwrap();
    let data = v["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], json!("One"));
}

#[tokio::test]
async fn listing_rows_omit_request_metadata() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    submit(
        &client,
        &base,
        &json!({ "name": "Alice", "email": "alice@example.com", "message": "Hello" }),
    )
    .await;

    let res = client
        .get(format!("{}/api/contact", base))
        .send()
        .await
        .unwrap();
    let v: serde_json::Value = res.json().await.unwrap();
    let row = &v["data"].as_array().unwrap()[0];
    assert!(row.get("ip_address").is_none());
    assert!(row.get("user_agent").is_none());
}

#[tokio::test]
async fn unknown_contact_id_is_404() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/contact/9999", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["success"], json!(false));
    assert_eq!(v["message"], json!("Contact not found"));
}

#[tokio::test]
async fn unknown_route_echoes_path() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/unknown", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["success"], json!(false));
    assert_eq!(v["path"], json!("/api/unknown"));
}

#[tokio::test]
async fn health_reports_uptime_and_timestamp() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["success"], json!(true));
    assert!(v["uptime"].as_f64().unwrap() >= 0.0);
    assert!(v["timestamp"].is_string());
}

#[tokio::test]
async fn root_lists_endpoints() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["success"], json!(true));
    assert_eq!(v["endpoints"]["contact"], json!("/api/contact"));
}

#[tokio::test]
async fn submit_rate_limit_blocks_excess() {
    let mut config = test_config();
    config.submit_rate_max = 2;
    let (base, _srv) = start_server_with(config).await;
    let client = reqwest::Client::new();

    let payload = json!({ "name": "Eve", "email": "eve@example.com", "message": "Hi" });
    for _ in 0..2 {
        let res = submit(&client, &base, &payload).await;
        assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    }
    let res = submit(&client, &base, &payload).await;
    assert_eq!(res.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);

    // The gated request left no row behind.
    let res = client
        .get(format!("{}/api/contact", base))
        .send()
        .await
        .unwrap();
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["pagination"]["total"], json!(2));
}

#[tokio::test]
async fn admin_token_guards_listing_endpoints() {
    let mut config = test_config();
    config.admin_token = Some("sekrit".to_string());
    let (base, _srv) = start_server_with(config).await;
    let client = reqwest::Client::new();

    // Submission stays public.
    let res = submit(
        &client,
        &base,
        &json!({ "name": "Alice", "email": "alice@example.com", "message": "Hello" }),
    )
    .await;
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let res = client
        .get(format!("{}/api/contact", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/contact/1", base))
        .header("authorization", "Bearer wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/contact", base))
        .header("authorization", "Bearer sekrit")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["pagination"]["total"], json!(1));
}

#[tokio::test]
async fn submission_captures_request_metadata() {
    let (base, _srv) = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/contact/submit", base))
        .header("user-agent", "integration-suite/1.0")
        .header("x-forwarded-for", "203.0.113.50")
        .json(&json!({ "name": "Alice", "email": "alice@example.com", "message": "Hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let v: serde_json::Value = res.json().await.unwrap();
    let id = v["contactId"].as_i64().unwrap();

    let res = client
        .get(format!("{}/api/contact/{}", base, id))
        .send()
        .await
        .unwrap();
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["data"]["ip_address"], json!("203.0.113.50"));
    assert_eq!(v["data"]["user_agent"], json!("integration-suite/1.0"));
}
