//! In-process fake of the Q&A backend's HTTP API, served by axum on a random
//! port. Records every request so tests can assert on what was (not) sent.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const STARTUP_TIME: &str = "2024-12-09T12:00:00";

#[derive(Debug, Clone)]
pub struct FakeSession {
    pub id: String,
    pub title: String,
    pub created_at: String,
    /// `{type, content, timestamp}` entries, oldest first.
    pub messages: Vec<Value>,
}

impl FakeSession {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            created_at: "2024-12-09T09:30:00".to_string(),
            messages: Vec::new(),
        }
    }

    pub fn with_turn(mut self, question: &str, answer: &str) -> Self {
        self.messages.push(json!({
            "type": "user",
            "content": question,
            "timestamp": "2024-12-09T09:31:00"
        }));
        self.messages.push(json!({
            "type": "assistant",
            "content": answer,
            "timestamp": "2024-12-09T09:32:00"
        }));
        self
    }
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub ready: bool,
    pub fail_questions: bool,
    pub fail_summary: bool,
    pub fail_create: bool,
    pub sessions: Vec<FakeSession>,
    /// `"METHOD /path"` of every request, in arrival order.
    pub requests: Vec<String>,
    /// Bodies of `POST /api/question`.
    pub questions: Vec<Value>,
    pub next_id: u32,
}

impl BackendState {
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session: FakeSession) -> Self {
        self.sessions.push(session);
        self
    }

    fn new_session(&mut self, title: &str) -> String {
        self.next_id += 1;
        let id = format!("session-{}", self.next_id);
        self.sessions.push(FakeSession::new(&id, title));
        id
    }
}

type Shared = Arc<Mutex<BackendState>>;

#[derive(Clone)]
pub struct FakeBackend {
    pub state: Shared,
    pub addr: SocketAddr,
}

impl FakeBackend {
    pub async fn start(state: BackendState) -> Self {
        let shared = Arc::new(Mutex::new(state));
        let app = router(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            state: shared,
            addr,
        }
    }

    /// Serve from a background thread with its own runtime, for tests that
    /// drive the binary synchronously.
    pub fn spawn_in_thread(state: BackendState) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let backend = FakeBackend::start(state).await;
                tx.send(backend).unwrap();
                std::future::pending::<()>().await;
            });
        });
        rx.recv().unwrap()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == request).count()
    }

    pub fn questions(&self) -> Vec<Value> {
        self.state.lock().unwrap().questions.clone()
    }
}

/// A port with nothing listening on it.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/system/status", get(system_status))
        .route("/api/question", post(question))
        .route("/api/session/create", post(create_session))
        .route("/api/sessions", get(list_sessions))
        .route("/api/session/{id}/switch", post(switch_session))
        .route("/api/session/{id}/messages", get(session_messages))
        .route("/api/conversation/summary", get(summary))
        .route("/api/content/analyze", post(analyze))
        .with_state(state)
}

fn not_ready() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({"detail": "System not ready"})),
    )
        .into_response()
}

async fn health(State(state): State<Shared>) -> Json<Value> {
    let mut st = state.lock().unwrap();
    st.requests.push("GET /health".into());
    let status = if st.ready { "healthy" } else { "initializing" };
    Json(json!({
        "status": status,
        "timestamp": STARTUP_TIME,
        "system_ready": st.ready
    }))
}

async fn system_status(State(state): State<Shared>) -> Json<Value> {
    let mut st = state.lock().unwrap();
    st.requests.push("GET /api/system/status".into());
    if !st.ready {
        return Json(json!({
            "success": false,
            "status": "not_ready",
            "message": "Indexes still loading"
        }));
    }
    Json(json!({
        "success": true,
        "status": "ready",
        "data": {
            "ready": true,
            "llm_model": "qwen2.5",
            "embedding_model": "BAAI/bge-large-zh-v1.5",
            "vector_count": 4573,
            "tools_count": 2,
            "agents_status": true,
            "startup_time": STARTUP_TIME,
            "version": "2.0.0",
            "capabilities": ["multi-turn dialogue"]
        }
    }))
}

async fn question(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = state.lock().unwrap();
    st.requests.push("POST /api/question".into());
    st.questions.push(body.clone());
    if !st.ready {
        return not_ready();
    }
    if st.fail_questions {
        return Json(json!({"success": false, "message": "model offline"})).into_response();
    }

    let question = body["question"].as_str().unwrap_or_default().to_string();
    let session_id = match body["session_id"].as_str() {
        Some(id) => {
            if !st.sessions.iter().any(|s| s.id == id) {
                st.sessions.push(FakeSession::new(id, "Web conversation"));
            }
            id.to_string()
        }
        None => st.new_session("Web conversation"),
    };
    let answer = format!("Answer: {}", question);
    if let Some(session) = st.sessions.iter_mut().find(|s| s.id == session_id) {
        let turn = FakeSession::new("", "").with_turn(&question, &answer);
        session.messages.extend(turn.messages);
    }

    Json(json!({
        "success": true,
        "data": {
            "answer": answer,
            "session_id": session_id,
            "execution_time": 1.25,
            "answer_style": body["answer_style"].clone(),
            "timestamp": "2024-12-09T12:01:00"
        }
    }))
    .into_response()
}

async fn create_session(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = state.lock().unwrap();
    st.requests.push("POST /api/session/create".into());
    if !st.ready {
        return not_ready();
    }
    if st.fail_create {
        return Json(json!({"success": false, "message": "store unavailable"})).into_response();
    }
    let title = body["title"].as_str().unwrap_or("New conversation").to_string();
    let id = st.new_session(&title);
    Json(json!({"success": true, "data": {"session_id": id, "title": title}})).into_response()
}

async fn list_sessions(State(state): State<Shared>) -> Response {
    let mut st = state.lock().unwrap();
    st.requests.push("GET /api/sessions".into());
    if !st.ready {
        return not_ready();
    }
    let sessions: Vec<Value> = st
        .sessions
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "title": s.title,
                "created_at": s.created_at,
                "message_count": s.messages.len(),
                "last_activity": ""
            })
        })
        .collect();
    Json(json!({"success": true, "data": {"sessions": sessions}})).into_response()
}

async fn switch_session(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut st = state.lock().unwrap();
    st.requests.push(format!("POST /api/session/{}/switch", id));
    if !st.ready {
        return not_ready();
    }
    if st.sessions.iter().any(|s| s.id == id) {
        Json(json!({"success": true, "data": {"session_id": id}})).into_response()
    } else {
        Json(json!({"success": false, "message": "Session not found or switch failed"}))
            .into_response()
    }
}

async fn session_messages(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut st = state.lock().unwrap();
    st.requests.push(format!("GET /api/session/{}/messages", id));
    if !st.ready {
        return not_ready();
    }
    let messages = st
        .sessions
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.messages.clone())
        .unwrap_or_default();
    Json(json!({"success": true, "data": {"session_id": id, "messages": messages}}))
        .into_response()
}

async fn summary(State(state): State<Shared>) -> Response {
    let mut st = state.lock().unwrap();
    st.requests.push("GET /api/conversation/summary".into());
    if !st.ready {
        return not_ready();
    }
    if st.fail_summary {
        return Json(json!({"success": false, "message": "summary agent crashed"}))
            .into_response();
    }
    let asked = st.questions.len();
    Json(json!({
        "success": true,
        "data": {
            "success": true,
            "summary": format!("You asked {} question(s) about contract law.", asked),
            "message_count": asked * 2
        }
    }))
    .into_response()
}

async fn analyze(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = state.lock().unwrap();
    st.requests.push("POST /api/content/analyze".into());
    if !st.ready {
        return not_ready();
    }
    let content = body["content"].as_str().unwrap_or_default();
    if content.trim().is_empty() {
        return Json(json!({"success": false, "message": "Content must not be empty"}))
            .into_response();
    }
    let analysis_type = body["analysis_type"].as_str().unwrap_or("legal_content");
    Json(json!({
        "success": true,
        "data": {
            "success": true,
            "analysis": format!("[{}] reviewed {} characters", analysis_type, content.chars().count()),
            "analysis_type": analysis_type,
            "content_length": content.chars().count()
        }
    }))
    .into_response()
}
