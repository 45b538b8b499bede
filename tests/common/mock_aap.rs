//! Mock AAP controller
//!
//! A small axum app that stands in for the AAP controller API in e2e
//! tests. Supports scriptable failures (forced statuses, bad auth) and
//! records every request so tests can assert on attempt counts and
//! forwarded parameters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Job id the mock knows about (terminal state).
pub const KNOWN_JOB_ID: u64 = 123;
/// Job id the mock reports as still running.
pub const RUNNING_JOB_ID: u64 = 124;
/// Template/job id the mock always reports as unknown.
pub const UNKNOWN_ID: u64 = 999;
/// Stdout body served for the known job.
pub const KNOWN_JOB_STDOUT: &str = "PLAY [all]\n\nok: [web-01]\n\nPLAY RECAP\nweb-01 : ok=1\n";

pub struct MockAapBuilder {
    templates: Vec<Value>,
    auth_ok: bool,
    forced_failures: usize,
    failure_status: u16,
    failure_body: String,
}

impl MockAapBuilder {
    pub fn templates(mut self, templates: Vec<Value>) -> Self {
        self.templates = templates;
        self
    }

    pub fn auth_ok(mut self, auth_ok: bool) -> Self {
        self.auth_ok = auth_ok;
        self
    }

    /// Respond with `status` to the first `count` requests, then behave
    /// normally. Use `usize::MAX` to fail every request.
    pub fn fail_first(mut self, count: usize, status: u16) -> Self {
        self.forced_failures = count;
        self.failure_status = status;
        self
    }

    /// Body served with forced failures.
    pub fn failure_body(mut self, body: impl Into<String>) -> Self {
        self.failure_body = body.into();
        self
    }

    pub async fn spawn(self) -> MockAap {
        let state = MockState {
            inner: Arc::new(Inner {
                templates: self.templates,
                auth_ok: self.auth_ok,
                forced_failures: AtomicUsize::new(self.forced_failures),
                failure_status: self.failure_status,
                failure_body: self.failure_body,
                hits: AtomicUsize::new(0),
                seen_projects: Mutex::new(Vec::new()),
                last_launch_body: Mutex::new(None),
            }),
        };

        let app = Router::new()
            .route("/api/controller/v2/job_templates/", get(list_templates))
            .route(
                "/api/controller/v2/job_templates/{id}/launch/",
                post(launch_template),
            )
            .route("/api/controller/v2/jobs/{id}/", get(job_status))
            .route("/api/controller/v2/jobs/{id}/stdout/", get(job_stdout))
            .route("/api/controller/v2/me/", get(me))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock AAP port");
        let addr = listener.local_addr().expect("Mock AAP has no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock AAP crashed");
        });

        MockAap {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

pub struct MockAap {
    pub base_url: String,
    state: MockState,
}

impl MockAap {
    pub fn builder() -> MockAapBuilder {
        MockAapBuilder {
            templates: Vec::new(),
            auth_ok: true,
            forced_failures: 0,
            failure_status: 500,
            failure_body: "scripted failure".to_string(),
        }
    }

    /// Total requests received, including forced failures.
    pub fn hits(&self) -> usize {
        self.state.inner.hits.load(Ordering::SeqCst)
    }

    /// Project ids seen on template list requests, in order.
    pub fn seen_projects(&self) -> Vec<String> {
        self.state.inner.seen_projects.lock().unwrap().clone()
    }

    /// Body of the most recent launch request.
    pub fn last_launch_body(&self) -> Option<Value> {
        self.state.inner.last_launch_body.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    inner: Arc<Inner>,
}

struct Inner {
    templates: Vec<Value>,
    auth_ok: bool,
    forced_failures: AtomicUsize,
    failure_status: u16,
    failure_body: String,
    hits: AtomicUsize,
    seen_projects: Mutex<Vec<String>>,
    last_launch_body: Mutex<Option<Value>>,
}

impl MockState {
    /// Count the request and return an early response for scripted
    /// failure/auth states.
    fn gate(&self) -> Option<Response> {
        self.inner.hits.fetch_add(1, Ordering::SeqCst);

        let remaining = self
            .inner
            .forced_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if remaining.is_ok() {
            let status = StatusCode::from_u16(self.inner.failure_status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Some((status, self.inner.failure_body.clone()).into_response());
        }

        if !self.inner.auth_ok {
            return Some((
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Invalid token"})),
            )
                .into_response());
        }

        None
    }
}

async fn list_templates(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(early) = state.gate() {
        return early;
    }

    if let Some(project) = params.get("project") {
        state
            .inner
            .seen_projects
            .lock()
            .unwrap()
            .push(project.clone());
    }

    Json(json!({
        "count": state.inner.templates.len(),
        "results": state.inner.templates,
    }))
    .into_response()
}

async fn launch_template(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(early) = state.gate() {
        return early;
    }

    if id == UNKNOWN_ID {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Not found."})),
        )
            .into_response();
    }

    *state.inner.last_launch_body.lock().unwrap() = Some(body);

    Json(json!({
        "job": KNOWN_JOB_ID,
        "id": KNOWN_JOB_ID,
        "status": "pending",
        "type": "job",
        "url": format!("/api/controller/v2/jobs/{}/", KNOWN_JOB_ID),
    }))
    .into_response()
}

async fn job_status(State(state): State<MockState>, Path(id): Path<u64>) -> Response {
    if let Some(early) = state.gate() {
        return early;
    }

    let job = match id {
        KNOWN_JOB_ID => json!({
            "id": KNOWN_JOB_ID,
            "name": "deploy-web",
            "status": "successful",
            "failed": false,
            "started": "2024-01-01T00:00:00Z",
            "finished": "2024-01-01T00:01:30Z",
            "elapsed": 90.0,
            "job_template": 10,
            "playbook": "deploy.yml",
        }),
        RUNNING_JOB_ID => json!({
            "id": RUNNING_JOB_ID,
            "name": "deploy-web",
            "status": "running",
            "failed": false,
            "started": "2024-01-01T00:00:00Z",
        }),
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "Not found."})),
            )
                .into_response()
        }
    };

    Json(job).into_response()
}

async fn job_stdout(State(state): State<MockState>, Path(id): Path<u64>) -> Response {
    if let Some(early) = state.gate() {
        return early;
    }

    match id {
        KNOWN_JOB_ID => KNOWN_JOB_STDOUT.into_response(),
        // Partial output for a still-running job
        RUNNING_JOB_ID => "PLAY [all]\n".into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Not found."})),
        )
            .into_response(),
    }
}

async fn me(State(state): State<MockState>) -> Response {
    if let Some(early) = state.gate() {
        return early;
    }

    Json(json!({"results": [{"username": "svc-mcp"}]})).into_response()
}
