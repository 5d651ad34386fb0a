use std::sync::{mpsc, Arc, Mutex};

use assert_cmd::Command;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;

/// REST backend stand-in: numeric ids, timestamped dates, server-side balance.
#[derive(Clone, Default)]
pub struct Backend {
    state: Arc<Mutex<(u64, Vec<Value>)>>,
}

impl Backend {
    pub fn rows(&self) -> Vec<Value> {
        self.state.lock().unwrap().1.clone()
    }

    pub fn seed(&self, description: &str, kind: &str, amount: f64, date: &str) {
        let mut guard = self.state.lock().unwrap();
        guard.0 += 1;
        let row = stored(
            guard.0,
            &json!({ "description": description, "type": kind, "amount": amount, "date": date }),
        );
        guard.1.push(row);
    }
}

fn stored(id: u64, body: &Value) -> Value {
    json!({
        "id": id,
        "description": body["description"],
        "type": body["type"],
        "amount": body["amount"],
        "date": format!("{}T00:00:00.000+00:00", body["date"].as_str().unwrap_or_default()),
    })
}

async fn list(State(backend): State<Backend>) -> Json<Value> {
    Json(Value::Array(backend.rows()))
}

async fn create(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    let mut guard = backend.state.lock().unwrap();
    guard.0 += 1;
    let row = stored(guard.0, &body);
    guard.1.push(row.clone());
    (StatusCode::CREATED, Json(row)).into_response()
}

async fn update(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = backend.state.lock().unwrap();
    match guard.1.iter_mut().find(|row| row["id"] == json!(id)) {
        Some(row) => {
            *row = stored(id, &body);
            Json(row.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn remove(State(backend): State<Backend>, Path(id): Path<u64>) -> StatusCode {
    let mut guard = backend.state.lock().unwrap();
    let before = guard.1.len();
    guard.1.retain(|row| row["id"] != json!(id));
    if guard.1.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn balance(State(backend): State<Backend>) -> Json<f64> {
    let total = backend
        .rows()
        .iter()
        .map(|row| {
            let amount = row["amount"].as_f64().unwrap_or_default();
            if row["type"] == "REVENUE" {
                amount
            } else {
                -amount
            }
        })
        .sum();
    Json(total)
}

/// Serves the backend from its own thread so blocking CLI runs can reach it.
pub fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/transactions", get(list).post(create))
        .route("/transactions/balance", get(balance))
        .route("/transactions/:id", put(update).delete(remove))
        .with_state(backend);

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

/// `tally_cli` in script mode with an isolated config directory.
pub fn script_command(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally_cli").unwrap();
    cmd.env("TALLY_CLI_SCRIPT", "1")
        .env("TALLY_CONFIG_DIR", config_dir.path())
        .env("NO_COLOR", "1")
        .env_remove("TALLY_OFFLINE")
        .env_remove("TALLY_API_URL");
    cmd
}
