//! Integration tests for the screening REST API.
//!
//! Each test spins up an Axum server on a random port and exercises the
//! real HTTP contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use talent_scout::screening::{
    Driver, FieldSpec, QuestionBank, QuestionSelector, ScreeningRouteState, SessionManager,
    screening_routes,
};
use talent_scout::store::{CandidateStore, JsonFileStore};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const PROFILE: [&str; 7] = [
    "Grace Hopper",
    "grace@example.com",
    "+1 (415) 555-2671",
    "12 years",
    "Staff Engineer",
    "Arlington, VA",
    "Python, django",
];

/// Start an Axum server on a random port, return (base url, store).
async fn start_server(dir: &tempfile::TempDir) -> (String, Arc<JsonFileStore>) {
    let bank = QuestionBank::from_entries([
        ("python", vec!["Q1".to_string(), "Q2".to_string()]),
        ("django", vec!["Q3".to_string()]),
    ]);
    let driver = Driver::new(FieldSpec::default(), QuestionSelector::new(Arc::new(bank)));
    let store = Arc::new(JsonFileStore::new(dir.path().join("data.json")));
    let manager = Arc::new(SessionManager::new(Arc::new(driver), store.clone()));
    let app = screening_routes(ScreeningRouteState { manager });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), store)
}

async fn create_session(client: &reqwest::Client, base: &str) -> String {
    let resp = client
        .post(format!("{base}/api/sessions"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    body["session_id"].as_str().unwrap().to_string()
}

async fn answer(client: &reqwest::Client, base: &str, id: &str, text: &str) -> (u16, Value) {
    let resp = client
        .post(format!("{base}/api/sessions/{id}/answers"))
        .json(&json!({ "text": text }))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn full_screening_over_http() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let (base, store) = start_server(&dir).await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        let mut last = Value::Null;
        for text in PROFILE {
            let (status, turn) = answer(&client, &base, &id, text).await;
            assert_eq!(status, 200);
            last = turn;
        }
        assert_eq!(last["type"], "question");
        assert_eq!(last["tech"], "python");
        assert_eq!(last["question"], "Q1");
        assert_eq!(last["total"], 3);

        for (i, text) in ["immutability", "laziness", "select_related"].iter().enumerate() {
            let (_, turn) = answer(&client, &base, &id, text).await;
            if i < 2 {
                assert_eq!(turn["type"], "question");
            } else {
                assert_eq!(turn["type"], "interview_finished");
            }
        }

        let status: Value = client
            .get(format!("{base}/api/sessions/{id}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["phase"], "completed");
        assert_eq!(status["interview_finished"], true);
        assert_eq!(status["progress"], 1.0);

        let resp = client
            .post(format!("{base}/api/sessions/{id}/submit"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let record: Value = resp.json().await.unwrap();
        assert_eq!(record["basic_info"]["Email"], "grace@example.com");
        assert_eq!(record["basic_info"]["Phone Number"], "+14155552671");
        assert_eq!(record["technical_answers"][2]["question"], "Q3");
        assert_eq!(record["technical_answers"][2]["answer"], "select_related");

        let saved = store.list().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].basic_info.get("Tech Stack"), Some("Python, django"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn exit_keyword_over_http() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let (base, _) = start_server(&dir).await;
        let client = reqwest::Client::new();
        let id = create_session(&client, &base).await;

        answer(&client, &base, &id, "Grace").await;
        let (status, turn) = answer(&client, &base, &id, "  Bye ").await;
        assert_eq!(status, 200);
        assert_eq!(turn["type"], "exited");

        // The session is closed once the candidate leaves
        let (status, _) = answer(&client, &base, &id, "grace@example.com").await;
        assert_eq!(status, 404);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn returning_candidate_gets_conflict() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let (base, _) = start_server(&dir).await;
        let client = reqwest::Client::new();

        let first = create_session(&client, &base).await;
        for text in PROFILE.iter().chain(["a", "b", "c"].iter()) {
            answer(&client, &base, &first, text).await;
        }
        let resp = client
            .post(format!("{base}/api/sessions/{first}/submit"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);

        let second = create_session(&client, &base).await;
        answer(&client, &base, &second, "Grace Again").await;
        let (status, body) = answer(&client, &base, &second, "GRACE@example.com").await;
        assert_eq!(status, 409);
        assert!(body["error"].as_str().unwrap().contains("already been used"));

        let resp = client
            .get(format!("{base}/api/sessions/{second}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .expect("test timed out");
}
