//! In-process stand-in for the tracker backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use attack_tracker::config::EndpointPaths;
use attack_tracker::BackendClient;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::{json, Value};

/// Everything the fake backend has seen, plus the classification values it holds.
#[derive(Clone, Default)]
pub struct FakeState {
    pub requests: Arc<Mutex<Vec<(String, Value)>>>,
    classification: Arc<Mutex<HashMap<String, i64>>>,
}

impl FakeState {
    fn record(&self, path: &str, body: Value) {
        self.requests.lock().unwrap().push((path.to_string(), body));
    }

    pub fn requests_to(&self, path: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

async fn classification(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    state.record("/api/change-classification", body.clone());
    let mut values = state.classification.lock().unwrap();
    if let (Some(target), Some(value)) = (body["target"].as_str(), body["value"].as_i64()) {
        values.insert(target.to_string(), value);
    }

    // Every dimension: confidentiality + integrity + availability + own criticality
    let cia: i64 = ["confidentiality", "integrity", "availability"]
        .iter()
        .map(|k| values.get(*k).copied().unwrap_or(0))
        .sum();
    let sum = |dim: &str| cia + values.get(&format!("{dim}-criticality")).copied().unwrap_or(0);

    Json(json!({
        "message": "Updated database",
        "client_criticality_sum": sum("client"),
        "infra_criticality_sum": sum("infra"),
        "service_criticality_sum": sum("service"),
    }))
}

async fn status(State(state): State<FakeState>, Json(body): Json<Value>) -> StatusCode {
    state.record("/api/change-status", body);
    StatusCode::NO_CONTENT
}

async fn links(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    state.record("/api/links", body.clone());
    if body["filter"] == "Done" {
        Json(json!({ "prev_url": null, "next_url": "/change/v15.1/v16.0/T1059.003" }))
    } else {
        Json(json!({
            "prev_url": "/change/v15.1/v16.0/T1059",
            "next_url": "/change/v15.1/v16.0/T1059.002",
        }))
    }
}

async fn evaluation_status(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    state.record("/api/change-evaluation-status", body);
    Json(json!({ "message": "Updated evaluation status" }))
}

async fn reasoning(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    state.record("/api/change-reasoning-and-measures", body.clone());
    let target = body["target"].as_str().unwrap_or_default();
    let what = if target.ends_with("reasoning") { "Reasoning" } else { "Measures" };
    Json(json!({ "message": format!("{what} saved") }))
}

async fn upload(State(state): State<FakeState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap();
            fields.insert("file_name".into(), json!(file_name));
            fields.insert("content_type".into(), json!(content_type));
            fields.insert("size".into(), json!(bytes.len()));
        } else {
            fields.insert(name, json!(field.text().await.unwrap()));
        }
    }

    let file_name = fields["file_name"].as_str().unwrap_or_default().to_string();
    state.record("/api/file-upload", Value::Object(fields));

    if file_name.ends_with(".xlsx") || file_name.ends_with(".ods") {
        (StatusCode::OK, Json(json!({ "message": "Import successful" })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Wrong file format. Only .ods and .xlsx are allowed." })),
        )
    }
}

async fn export(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    state.record("/api/file-export", body.clone());
    let from = body["from_version"].as_str().unwrap_or_default();
    let to = body["to_version"].as_str().unwrap_or_default();
    Json(json!({
        "message": "Your export is ready.",
        "download_url": format!("/download/{from}-{to}.xlsx"),
    }))
}

async fn upgrade(
    State(state): State<FakeState>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let selected = form.get("version_select").cloned().unwrap_or_default();
    state.record("/upgrade/initiate", json!({ "version_select": selected }));

    if selected == "v15.1" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Upgrade from v15.1 to v16.0 already exists." })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "message": "Upgrade initiated.",
            "url": "/changes/v15.0/v15.1",
            "url_text": "v15.0 to v15.1",
        })),
    )
}

async fn bad_gateway() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, Html("<html><body>Bad Gateway</body></html>"))
}

async fn garbage() -> &'static str {
    "this is not json"
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({}))
}

/// Start the fake backend on an ephemeral port.
pub async fn spawn_backend() -> (SocketAddr, FakeState) {
    let state = FakeState::default();
    let app = Router::new()
        .route("/api/change-classification", post(classification))
        .route("/api/change-status", post(status))
        .route("/api/links", post(links))
        .route("/api/change-evaluation-status", post(evaluation_status))
        .route("/api/change-reasoning-and-measures", post(reasoning))
        .route("/api/file-upload", post(upload))
        .route("/api/file-export", post(export))
        .route("/upgrade/initiate", post(upgrade))
        .route("/broken", post(bad_gateway))
        .route("/garbage", post(garbage))
        .route("/slow", post(slow))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, state)
}

pub fn client_for(addr: SocketAddr) -> BackendClient {
    client_with(addr, EndpointPaths::default(), Duration::from_secs(5))
}

pub fn client_with(addr: SocketAddr, endpoints: EndpointPaths, timeout: Duration) -> BackendClient {
    BackendClient::with_options(&format!("http://{addr}"), endpoints, timeout, "atrack-tests")
        .expect("client")
}
