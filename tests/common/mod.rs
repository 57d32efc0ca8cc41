//! Common test utilities.
//!
//! A scripted QueryQuest backend served over real HTTP on an ephemeral port.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

pub const USER_UUID: &str = "7c0e2f5a-1b7d-4c38-9a51-3f1d2e0b6a11";
pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "correct-horse";
pub const TOKEN: &str = "tok-alice-1";

/// Behavior knobs shared by all handlers.
#[derive(Default)]
pub struct MockState {
    /// Scripted `(delay_ms, status)` replies for `GET /users/{uuid}`, consumed
    /// in arrival order. Unscripted requests answer immediately with 200.
    pub user_script: Mutex<VecDeque<(u64, u16)>>,
    /// Delay (ms) applied to `POST /sessions`.
    pub login_delay_ms: Mutex<u64>,
    /// Answer `GET /statistics` with a plain-text 500.
    pub fail_statistics: AtomicBool,
    pub user_hits: AtomicUsize,
    pub logout_hits: AtomicUsize,
    /// Last JSON body received on `PATCH /statistics`.
    pub last_statistics_body: Mutex<Option<Value>>,
}

impl MockState {
    pub fn script_user(&self, replies: &[(u64, u16)]) {
        self.user_script.lock().unwrap().extend(replies);
    }

    pub fn set_login_delay(&self, ms: u64) {
        *self.login_delay_ms.lock().unwrap() = ms;
    }
}

/// Running mock backend.
pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Spawn the mock backend and return its `/api/v1` base URL.
pub async fn spawn_backend() -> MockServer {
    let state = Arc::new(MockState::default());

    let api_v1 = Router::new()
        .route("/sessions", post(create_session).delete(delete_session))
        .route("/users/{uuid}", get(get_user))
        .route("/statistics", get(get_statistics).patch(update_statistics))
        .route("/questions", get(list_questions))
        .with_state(state.clone());
    let app = Router::new().nest("/api/v1", api_v1);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        base_url: format!("http://{addr}/api/v1"),
        state,
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}

// ============================================================================
// Handlers
// ============================================================================

type Reply = (StatusCode, Json<Value>);

fn ok(data: Value) -> Reply {
    (
        StatusCode::OK,
        Json(json!({"code": 200, "message": "Ok", "data": data})),
    )
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Invalid or expired token"})),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn create_session(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    let delay = *state.login_delay_ms.lock().unwrap();
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if body["username"] == USERNAME && body["password"] == PASSWORD {
        ok(json!({
            "user_uuid": USER_UUID,
            "token": TOKEN,
            "created_at": "2026-01-05T10:00:00Z",
        }))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": 401, "message": "Invalid username or password"})),
        )
    }
}

async fn delete_session(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Reply {
    state.logout_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    ok(Value::Null)
}

async fn get_user(
    State(state): State<Arc<MockState>>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Reply {
    state.user_hits.fetch_add(1, Ordering::SeqCst);
    let (delay, status) = state
        .user_script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((0, 200));
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if status == 401 || !authorized(&headers) {
        return unauthorized();
    }
    if status != 200 {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, Json(json!({"detail": "scripted failure"})));
    }
    if uuid != USER_UUID {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "Cannot access other users"})),
        );
    }
    ok(json!({"uuid": USER_UUID, "username": USERNAME}))
}

async fn get_statistics(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    if state.fail_statistics.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "database unavailable".to_string(),
        );
    }
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Invalid or expired token"}).to_string(),
        );
    }
    (
        StatusCode::OK,
        json!({
            "code": 200,
            "message": "Ok",
            "data": {"user_uuid": USER_UUID, "xp": 42, "wins": 4, "losses": 1},
        })
        .to_string(),
    )
}

async fn update_statistics(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let correct = body["correct"].as_bool().unwrap_or(false);
    *state.last_statistics_body.lock().unwrap() = Some(body);
    let (xp, wins, losses) = if correct { (52, 5, 1) } else { (44, 4, 2) };
    ok(json!({"user_uuid": USER_UUID, "xp": xp, "wins": wins, "losses": losses}))
}

async fn list_questions() -> Reply {
    ok(json!([
        {
            "id": 1,
            "question": "Which keyword moves a value into a closure?",
            "difficulty": 1,
            "option1": "move",
            "option2": "ref",
            "option3": "box",
            "option4": null,
        },
        {
            "id": 2,
            "question": "What does `?` do on an Err?",
            "difficulty": 2,
            "option1": "Panics",
            "option2": "Returns early",
        },
    ]))
}
