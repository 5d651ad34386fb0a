use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tally_domain::{NewTransaction, TransactionId, TransactionKind};
use tally_store::{HttpTransactionStore, StoreError, StoreOperation, TransactionStore};

/// Minimal backend mimicking the real one: numeric ids, timestamped dates.
#[derive(Clone, Default)]
struct Backend {
    rows: Arc<Mutex<(u64, Vec<Value>)>>,
}

fn stored_row(id: u64, body: &Value) -> Value {
    json!({
        "id": id,
        "description": body["description"],
        "type": body["type"],
        "amount": body["amount"],
        "date": format!("{}T00:00:00.000+00:00", body["date"].as_str().unwrap_or_default()),
    })
}

async fn list_rows(State(backend): State<Backend>) -> Json<Value> {
    let guard = backend.rows.lock().unwrap();
    Json(Value::Array(guard.1.clone()))
}

async fn create_row(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    if body["description"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::BAD_REQUEST, "description required").into_response();
    }
    let mut guard = backend.rows.lock().unwrap();
    guard.0 += 1;
    let row = stored_row(guard.0, &body);
    guard.1.push(row.clone());
    (StatusCode::CREATED, Json(row)).into_response()
}

async fn update_row(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = backend.rows.lock().unwrap();
    match guard.1.iter_mut().find(|row| row["id"] == json!(id)) {
        Some(row) => {
            *row = stored_row(id, &body);
            Json(row.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_row(State(backend): State<Backend>, Path(id): Path<u64>) -> StatusCode {
    let mut guard = backend.rows.lock().unwrap();
    let before = guard.1.len();
    guard.1.retain(|row| row["id"] != json!(id));
    if guard.1.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn balance(State(backend): State<Backend>) -> Json<f64> {
    let guard = backend.rows.lock().unwrap();
    let total = guard
        .1
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

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/transactions", get(list_rows).post(create_row))
        .route("/transactions/balance", get(balance))
        .route("/transactions/:id", put(update_row).delete(delete_row))
        .with_state(Backend::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn payload(description: &str, kind: TransactionKind, amount: f64, day: u32) -> NewTransaction {
    NewTransaction {
        description: description.into(),
        kind,
        amount,
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
    }
}

#[tokio::test]
async fn create_list_update_delete_round_trip() {
    let origin = spawn_backend().await;
    let store = HttpTransactionStore::new(&origin).unwrap();

    assert!(store.list().await.unwrap().is_empty());

    let created = store
        .create(&payload("Salaire", TransactionKind::Revenue, 50000.0, 5))
        .await
        .unwrap();
    assert_eq!(created.id, TransactionId::from(1));
    assert_eq!(created.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

    store
        .create(&payload("Courses", TransactionKind::Expense, 20.0, 6))
        .await
        .unwrap();
    assert_eq!(store.balance().await.unwrap(), 49980.0);

    let updated = store
        .update(
            &created.id,
            &payload("Salaire mars", TransactionKind::Revenue, 52000.0, 5),
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "Salaire mars");

    store.delete(&created.id).await.unwrap();
    let remaining = store.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].description, "Courses");
    assert_eq!(remaining[0].kind, TransactionKind::Expense);
}

#[tokio::test]
async fn missing_ids_map_to_not_found() {
    let origin = spawn_backend().await;
    let store = HttpTransactionStore::new(&origin).unwrap();
    let missing = TransactionId::from(404);

    let err = store.delete(&missing).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound { operation: StoreOperation::Delete, ref id } if *id == missing
    ));

    let err = store
        .update(&missing, &payload("Loyer", TransactionKind::Expense, 10.0, 1))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn rejected_requests_carry_status_and_body() {
    let origin = spawn_backend().await;
    let store = HttpTransactionStore::new(&origin).unwrap();

    let err = store
        .create(&payload("", TransactionKind::Revenue, 1.0, 1))
        .await
        .unwrap_err();
    match err {
        StoreError::Status {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, StoreOperation::Create);
            assert_eq!(status, 400);
            assert_eq!(body, "description required");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_surfaces_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpTransactionStore::new(&format!("http://{addr}")).unwrap();
    let err = store.list().await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Transport {
            operation: StoreOperation::List,
            ..
        }
    ));
}
