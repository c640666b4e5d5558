#![allow(clippy::unwrap_used)]

use crate::{
    Presenter,
    ui::{EventDispatcher, Toast, UiEvent, UiState},
};

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use qr_attendance_core::{ApiClient, AttendanceEntry};
use serde_json::{Value, json};

/// Server timestamp given to every record the fake backend creates.
pub(crate) const BACKEND_TIMESTAMP: &str = "2024-01-01T09:30:00Z";

/// Dispatcher that keeps every event for later assertions.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingDispatcher {
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl RecordingDispatcher {
    pub(crate) fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn toasts(&self) -> Vec<Toast> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Toast(toast) => Some(toast),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn dispatch(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// In-process attendance backend.
#[derive(Debug, Clone, Default)]
pub(crate) struct Backend {
    /// Identifiers posted to `mark_attendance`, in order.
    pub(crate) marked: Arc<Mutex<Vec<String>>>,
    /// Records served by `get_attendance`.
    pub(crate) records: Arc<Mutex<Vec<AttendanceEntry>>>,
    /// When set, `mark_attendance` answers 400 with this message.
    pub(crate) reject_with: Option<&'static str>,
    /// When set, `get_attendance` answers 500.
    pub(crate) records_down: bool,
}

impl Backend {
    pub(crate) fn with_records(records: Vec<AttendanceEntry>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Self::default()
        }
    }

    pub(crate) fn marked(&self) -> Vec<String> {
        self.marked.lock().unwrap().clone()
    }

    pub(crate) fn router(&self) -> Router {
        Router::new()
            .route("/api/mark_attendance", post(mark_attendance))
            .route("/api/generate_qr", post(generate_qr))
            .route("/api/get_attendance", get(get_attendance))
            .with_state(self.clone())
    }
}

async fn mark_attendance(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    if let Some(message) = backend.reject_with {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response();
    }

    let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
    backend.marked.lock().unwrap().push(user_id.clone());
    backend.records.lock().unwrap().push(AttendanceEntry {
        user_id,
        timestamp: BACKEND_TIMESTAMP.to_string(),
    });

    Json(json!({ "message": "Attendance marked" })).into_response()
}

async fn generate_qr(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "QR code generated", "user_id": body["user_id"] }))
}

async fn get_attendance(State(backend): State<Backend>) -> Response {
    if backend.records_down {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let records = backend.records.lock().unwrap().clone();
    Json(records).into_response()
}

pub(crate) fn entry(user_id: &str, timestamp: &str) -> AttendanceEntry {
    AttendanceEntry {
        user_id: user_id.to_string(),
        timestamp: timestamp.to_string(),
    }
}

/// Serve `router` on an ephemeral port and return its `/api` base URL.
pub(crate) async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{}/api", addr)
}

/// API client for a local test backend, bypassing any proxy settings.
pub(crate) fn local_client(base_url: &str) -> ApiClient {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    ApiClient::from_client(client, base_url)
}

/// A scratch directory under the system temp dir.
pub(crate) fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "qr-attendance-app-{}-{}",
        label,
        uuid::Uuid::new_v4()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Presenter wired to `backend`, rendering times in UTC.
pub(crate) async fn presenter_for(
    backend: &Backend,
    ui: UiState,
) -> (Presenter<RecordingDispatcher, Utc>, RecordingDispatcher) {
    let api = local_client(&spawn_backend(backend.router()).await);
    let dispatcher = RecordingDispatcher::default();
    let presenter = Presenter::with_timezone(
        api,
        ui,
        dispatcher.clone(),
        scratch_dir("export"),
        Utc,
    );
    (presenter, dispatcher)
}
