//! Integration tests for the calmind-web server.
//!
//! These tests start a real axum server on a random port, backed by a stub
//! generator, and exercise the REST endpoints and static files.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use calmind::prelude::*;
use calmind_web::{GENERIC_FAILURE, WebConfig, spawn_web};

/// Answers each stage with its role name; fails everything when `broken`.
struct RoleEcho {
    broken: bool,
    calls: AtomicUsize,
}

impl TextGenerator for RoleEcho {
    fn generate<'a>(&'a self, context: &'a str, _prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(ClientError::Http {
                    status: 500,
                    body: "upstream exploded".into(),
                });
            }
            let stage = StageKind::ALL
                .into_iter()
                .find(|s| context.contains(s.persona().role))
                .expect("context names a persona");
            Ok(format!("<{stage}>"))
        })
    }
}

/// Helper: spawn a test server on port 0 (random available port).
async fn spawn_test_server(broken: bool) -> (Arc<RoleEcho>, String) {
    let stub = Arc::new(RoleEcho {
        broken,
        calls: AtomicUsize::new(0),
    });
    let generator: Arc<dyn TextGenerator> = stub.clone();
    let companion = Arc::new(Companion::with_generator(generator));

    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
    };

    let addr = spawn_web(companion, config).await.unwrap();
    (stub, format!("http://{addr}"))
}

async fn submit(base: &str, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/submit"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

// ── REST Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn submit_returns_reply_and_audio() {
    let (stub, base) = spawn_test_server(false).await;

    let resp = submit(
        &base,
        serde_json::json!({"message": "I feel really anxious about tomorrow", "sound": "Rain Sounds"}),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        json["reply"],
        "<emotion><coping><affirmation><engagement>😰"
    );
    assert_eq!(json["audio"], "static/rain.mp3");
    assert_eq!(json["mood"], "anxious");
    assert_eq!(json["clarification"], false);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn submit_without_sound_has_no_audio() {
    let (_stub, base) = spawn_test_server(false).await;

    for body in [
        serde_json::json!({"message": "a quiet evening at home"}),
        serde_json::json!({"message": "a quiet evening at home", "sound": "None"}),
    ] {
        let json: serde_json::Value = submit(&base, body).await.json().await.unwrap();
        assert!(json["audio"].is_null());
        assert_eq!(json["mood"], "neutral");
        assert!(json["reply"].as_str().unwrap().ends_with("🌿"));
    }
}

#[tokio::test]
async fn short_message_asks_for_more() {
    let (stub, base) = spawn_test_server(false).await;

    let resp = submit(&base, serde_json::json!({"message": "  hm ", "sound": "Cat Purring"})).await;
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["reply"], CLARIFICATION_PROMPT);
    assert_eq!(json["clarification"], true);
    assert!(json["mood"].is_null());
    assert_eq!(json["audio"], "static/cat.mp3");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generation_failure_is_502_without_details() {
    let (_stub, base) = spawn_test_server(true).await;

    let resp = submit(&base, serde_json::json!({"message": "I can't focus on anything"})).await;
    assert_eq!(resp.status(), 502);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"], GENERIC_FAILURE);
    assert!(json.get("reply").is_none());
    assert!(!json.to_string().contains("upstream exploded"));
}

#[tokio::test]
async fn sounds_lists_choices_in_order() {
    let (_stub, base) = spawn_test_server(false).await;

    let resp = reqwest::get(format!("{base}/api/sounds")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    let labels: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        [
            "None",
            "Nature Sounds",
            "Rain Sounds",
            "Ocean Waves",
            "Cat Purring",
            "Violin Music"
        ]
    );
    assert!(json[0]["audio"].is_null());
    assert_eq!(json[5]["audio"], "static/violin.mp3");
}

#[tokio::test]
async fn health_and_index_are_served() {
    let (_stub, base) = spawn_test_server(false).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("How are you feeling today?"));
    assert!(html.contains("/api/submit"));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (stub, base) = spawn_test_server(false).await;

    let resp = submit(&base, serde_json::json!({"text": "wrong field"})).await;
    assert!(resp.status().is_client_error());
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}
