//! In-process fake yarGen server
//!
//! Runs axum on its own tokio runtime in a background thread so the blocking
//! reqwest transport can be driven from the test thread.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use yargen_core::application::SubmitService;
use yargen_core::port::observer::mocks::RecordingObserver;
use yargen_core::port::time_provider::mocks::FakeClock;
use yargen_core::port::{NoopObserver, TimeProvider};
use yargen_core::SubmitConfig;
use yargen_infra_http::{HttpTransport, HttpTransportConfig};

pub const RULES: &str = "/*\n   YARA Rule Set\n   Author: yarGen\n   Reference: https://github.com/Neo23x0/yarGen\n*/\n\nrule sample_bin {\n   strings:\n      $s1 = \"GetProcAddressForCaller\" fullword ascii\n   condition:\n      uint16(0) == 0x5a4d and $s1\n}\n";

/// How the fake server answers
#[derive(Clone)]
pub struct Behavior {
    pub health_status: StatusCode,
    pub upload_status: StatusCode,
    pub upload_body: Value,
    pub generate_status: StatusCode,
    /// Raw `/api/jobs/{id}` bodies, consumed in order; the last one repeats
    pub job_bodies: Vec<String>,
    pub rules_status: StatusCode,
    pub rules: Vec<u8>,
}

impl Behavior {
    pub fn completing(job_id: &str, statuses: &[&str]) -> Self {
        Self {
            health_status: StatusCode::OK,
            upload_status: StatusCode::OK,
            upload_body: json!({ "id": job_id, "filename": "sample" }),
            generate_status: StatusCode::OK,
            job_bodies: statuses
                .iter()
                .map(|s| json!({ "id": job_id, "status": s }).to_string())
                .collect(),
            rules_status: StatusCode::OK,
            rules: RULES.as_bytes().to_vec(),
        }
    }

    pub fn with_job_bodies(mut self, bodies: Vec<String>) -> Self {
        self.job_bodies = bodies;
        self
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

/// What the server saw
#[derive(Default)]
pub struct Recorded {
    pub health_hits: usize,
    pub uploads: Vec<UploadedFile>,
    pub generate_bodies: Vec<Value>,
    pub status_hits: Vec<String>,
    pub rules_hits: Vec<String>,
}

impl Recorded {
    pub fn total_requests(&self) -> usize {
        self.health_hits
            + self.uploads.len()
            + self.generate_bodies.len()
            + self.status_hits.len()
            + self.rules_hits.len()
    }
}

struct ServerState {
    behavior: Behavior,
    job_bodies: Mutex<VecDeque<String>>,
    last_job_body: Mutex<Option<String>>,
    recorded: Mutex<Recorded>,
}

type Shared = Arc<ServerState>;

pub struct FakeServer {
    pub base_url: String,
    state: Shared,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeServer {
    pub fn start(behavior: Behavior) -> Self {
        let state = Arc::new(ServerState {
            job_bodies: Mutex::new(behavior.job_bodies.clone().into()),
            last_job_body: Mutex::new(None),
            recorded: Mutex::new(Recorded::default()),
            behavior,
        });

        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let app = router(state.clone());

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                addr_tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });

        let addr = addr_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        Self {
            base_url: format!("http://{}", addr),
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.state.recorded.lock().unwrap()
    }

    pub fn transport(&self) -> HttpTransport {
        HttpTransport::new(HttpTransportConfig::new(&self.base_url)).unwrap()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/generate", post(generate))
        .route("/api/jobs/{id}", get(job_status))
        .route("/api/rules/{id}", get(rules))
        .with_state(state)
}

async fn health(State(state): State<Shared>) -> StatusCode {
    state.recorded.lock().unwrap().health_hits += 1;
    state.behavior.health_status
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().unwrap_or("").to_string();
        let content = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };
        state.recorded.lock().unwrap().uploads.push(UploadedFile {
            field: name,
            file_name,
            content,
        });
    }
    (
        state.behavior.upload_status,
        Json(state.behavior.upload_body.clone()),
    )
        .into_response()
}

async fn generate(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.recorded.lock().unwrap().generate_bodies.push(body);
    (state.behavior.generate_status, Json(json!({ "status": "started" }))).into_response()
}

async fn job_status(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    state.recorded.lock().unwrap().status_hits.push(id.clone());

    let next = state.job_bodies.lock().unwrap().pop_front();
    let body = match next {
        Some(body) => {
            *state.last_job_body.lock().unwrap() = Some(body.clone());
            body
        }
        None => state
            .last_job_body
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| json!({ "id": id, "status": "running" }).to_string()),
    };

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn rules(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    state.recorded.lock().unwrap().rules_hits.push(id);
    (state.behavior.rules_status, state.behavior.rules.clone()).into_response()
}

/// Small real sample on disk
pub fn sample_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("sample")
        .suffix(".bin")
        .tempfile()
        .unwrap();
    file.write_all(b"MZ\x90\x00\x03\x00\x00\x00GetProcAddressForCaller")
        .unwrap();
    file
}

/// Service wired to the real HTTP transport with a fast real clock
pub fn real_clock_service(server: &FakeServer, observer: Arc<RecordingObserver>) -> SubmitService {
    let config = SubmitConfig::default()
        .with_server_url(server.base_url.clone())
        .with_poll_interval(Duration::from_millis(20))
        .with_max_wait(Duration::from_secs(10));
    SubmitService::new(
        config,
        Arc::new(server.transport()),
        Arc::new(yargen_core::port::SystemTimeProvider::new()),
        observer,
    )
}

/// Service wired to the real HTTP transport with a virtual clock
pub fn fake_clock_service(
    server: &FakeServer,
    config: SubmitConfig,
    clock: Arc<FakeClock>,
) -> SubmitService {
    let clock: Arc<dyn TimeProvider> = clock;
    SubmitService::new(
        config.with_server_url(server.base_url.clone()),
        Arc::new(server.transport()),
        clock,
        Arc::new(NoopObserver),
    )
}
