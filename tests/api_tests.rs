use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use squash_score_back::{
    config::{AppConfig, StorageConfig},
    dao::store::file::FileScoreStore,
    routes,
    state::{AppState, SharedState, session::MatchRules},
};
use tempfile::TempDir;
use time::UtcOffset;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    data_dir: PathBuf,
    state: SharedState,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let path = data_dir.join("store.json");

        let config = AppConfig {
            rules: MatchRules::default(),
            tick_period: Duration::from_secs(1),
            history_offset: UtcOffset::UTC,
            storage: StorageConfig::File { path: path.clone() },
        };
        let state = AppState::new(&config);
        let store = FileScoreStore::open(path).await.unwrap();
        state.set_store(Arc::new(store)).await;

        let router = routes::router(state.clone());
        Self {
            _dir: dir,
            data_dir,
            state,
            router,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, None).await
    }

    async fn create_player(&self, name: &str) -> String {
        let (status, body) = self.post("/players", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_owned()
    }

    async fn play_to_finish(&self) -> (String, String) {
        let one = self.create_player("Ala").await;
        let two = self.create_player("Ola").await;
        self.send(
            Method::PUT,
            "/session/players",
            Some(json!({ "slot": "one", "playerId": one })),
        )
        .await;
        self.send(
            Method::PUT,
            "/session/players",
            Some(json!({ "slot": "two", "playerId": two })),
        )
        .await;

        let (status, body) = self.post_empty("/session/start").await;
        assert_eq!(status, StatusCode::OK, "{body}");
        for _ in 0..11 {
            self.post("/session/point", json!({ "slot": "one" })).await;
        }
        (one, two)
    }
}

#[tokio::test]
async fn health_reports_degraded_without_store() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/healthcheck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    app.state.clear_store().await;
    let (_, body) = app.get("/healthcheck").await;
    assert_eq!(body["status"], "degraded");

    let (status, body) = app.get("/players").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn players_are_trimmed_and_unique_ignoring_case() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/players", json!({ "name": "  Ala  " })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Ala");
    assert!(body["createdAt"].is_string());

    let (status, body) = app.post("/players", json!({ "name": "ALA" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let (status, body) = app.post("/players", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "player name is required");

    app.create_player("Ola").await;
    let (status, body) = app.get("/players").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|player| player["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ola", "Ala"]);
}

#[tokio::test]
async fn direct_match_recording_is_validated() {
    let app = TestApp::new().await;
    let one = app.create_player("Ala").await;
    let two = app.create_player("Ola").await;

    let record = |one_score: u32, two_score: u32, winner: &str| {
        json!({
            "playerOneId": one,
            "playerTwoId": two,
            "winnerId": winner,
            "playerOneScore": one_score,
            "playerTwoScore": two_score,
            "durationInSeconds": 300
        })
    };

    let (status, body) = app.post("/matches", record(11, 10, &one)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app.post("/matches", record(11, 5, &two)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stranger = uuid::Uuid::new_v4().to_string();
    let (status, _) = app.post("/matches", record(11, 5, &stranger)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = app.post("/matches", record(11, 5, &one)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["playerOneId"], one.as_str());
    assert_eq!(created["durationLabel"], "05:00");

    let (status, listed) = app.get("/matches").await;
    assert_eq!(status, StatusCode::OK);
    let first = &listed.as_array().unwrap()[0];
    assert_eq!(first["id"], created["id"]);
    assert_eq!(first["playerOne"]["name"], "Ala");
    assert_eq!(first["winner"]["id"], one.as_str());
}

#[tokio::test]
async fn malformed_bodies_are_rejected_with_a_message() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/players", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"), "{body}");

    let (status, body) = app.post("/players", json!({ "name": null })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let one = app.create_player("Ala").await;
    let two = app.create_player("Ola").await;
    let (status, body) = app
        .post(
            "/matches",
            json!({
                "playerOneId": one,
                "playerTwoId": two,
                "winnerId": one,
                "playerOneScore": 11,
                "playerTwoScore": 5
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"].as_str().unwrap().contains("durationInSeconds"),
        "{body}"
    );

    let (status, body) = app
        .send(
            Method::PUT,
            "/session/players",
            Some(json!({ "slot": "three" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = app.get("/matches").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn clearing_history_removes_matches_only() {
    let app = TestApp::new().await;
    app.play_to_finish().await;
    let (status, _) = app.post_empty("/session/finalize").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send(Method::DELETE, "/matches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (_, matches) = app.get("/matches").await;
    assert!(matches.as_array().unwrap().is_empty());
    let (_, players) = app.get("/players").await;
    assert_eq!(players.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn start_requires_two_distinct_players() {
    let app = TestApp::new().await;

    let (status, body) = app.post_empty("/session/start").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "players not selected");

    let (_, session) = app.get("/session").await;
    assert_eq!(session["phase"], "setup");

    let (status, _) = app
        .send(
            Method::PUT,
            "/session/players",
            Some(json!({ "slot": "one", "playerId": uuid::Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn selecting_the_same_player_moves_them() {
    let app = TestApp::new().await;
    let ala = app.create_player("Ala").await;

    app.send(
        Method::PUT,
        "/session/players",
        Some(json!({ "slot": "one", "playerId": ala })),
    )
    .await;
    let (status, session) = app
        .send(
            Method::PUT,
            "/session/players",
            Some(json!({ "slot": "two", "playerId": ala })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["playerOneId"], Value::Null);
    assert_eq!(session["playerTwoId"], ala.as_str());
}

#[tokio::test]
async fn finished_match_is_stored_and_session_reset() {
    let app = TestApp::new().await;
    let (one, _) = app.play_to_finish().await;

    let (_, session) = app.get("/session").await;
    assert_eq!(session["phase"], "finished");
    assert_eq!(session["winner"], "one");
    assert_eq!(session["playerOneScore"], 11);

    let (_, session) = app.post("/session/point", json!({ "slot": "two" })).await;
    assert_eq!(session["playerTwoScore"], 0);

    let (status, stored) = app.post_empty("/session/finalize").await;
    assert_eq!(status, StatusCode::CREATED, "{stored}");
    assert_eq!(stored["winnerId"], one.as_str());
    assert_eq!(stored["playerOneScore"], 11);

    let (_, session) = app.get("/session").await;
    assert_eq!(session["phase"], "setup");
    assert_eq!(session["playerOneId"], Value::Null);

    let (status, page) = app.get("/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["label"], "Today");
    assert_eq!(page["dayCount"], 1);
    assert_eq!(page["canGoOlder"], false);
    assert_eq!(page["matches"].as_array().unwrap().len(), 1);

    let (_, page) = app.post_empty("/history/older").await;
    assert_eq!(page["label"], "Today");
}

#[tokio::test]
async fn finalize_outside_finished_is_a_conflict() {
    let app = TestApp::new().await;
    let (status, body) = app.post_empty("/session/finalize").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn failed_finalize_keeps_the_result_for_a_retry() {
    let app = TestApp::new().await;
    app.play_to_finish().await;

    // Turn the data directory into a file so the next write fails.
    std::fs::remove_dir_all(&app.data_dir).unwrap();
    std::fs::write(&app.data_dir, b"blocked").unwrap();

    let (status, body) = app.post_empty("/session/finalize").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].is_string());

    let (_, session) = app.get("/session").await;
    assert_eq!(session["phase"], "finished");
    assert_eq!(session["playerOneScore"], 11);

    std::fs::remove_file(&app.data_dir).unwrap();
    let (status, _) = app.post_empty("/session/finalize").await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, session) = app.get("/session").await;
    assert_eq!(session["phase"], "setup");
}

#[tokio::test]
async fn empty_history_page() {
    let app = TestApp::new().await;
    let (status, page) = app.get("/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["label"], "No matches");
    assert_eq!(page["date"], Value::Null);
    assert!(page["matches"].as_array().unwrap().is_empty());
}
