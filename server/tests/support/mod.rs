#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use archive::Store;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Stand-in for the managed row store, speaking just enough of its
/// dialect for the remote adapter to be none the wiser: `column=eq.value`
/// row filters, `order=column.asc|desc`, `limit=n`, bearer auth required.
pub fn fake_rest_router(store: Arc<Store>) -> Router {
    Router::new()
        .route("/rest/v1/{table}", get(rows_handler).post(insert_handler))
        .with_state(store)
}

fn table_rows(store: &Store, table: &str) -> Option<Vec<Value>> {
    let rows = match table {
        "faculties" => serde_json::to_value(&store.faculties),
        "departments" => serde_json::to_value(&store.departments),
        "subjects" => serde_json::to_value(&store.subjects),
        "professors" => serde_json::to_value(&store.professors),
        "past_exams" => serde_json::to_value(&store.exams),
        "questions" => serde_json::to_value(&store.questions),
        _ => return None,
    };

    match rows.expect("store rows serialize") {
        Value::Array(rows) => Some(rows),
        _ => None,
    }
}

async fn rows_handler(
    State(store): State<Arc<Store>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !headers.contains_key(AUTHORIZATION) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let Some(mut rows) = table_rows(&store, &table) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    for (column, condition) in &params {
        if let Some(expected) = condition.strip_prefix("eq.") {
            rows.retain(|row| row[column.as_str()] == json!(expected));
        }
    }

    if let Some(order) = params.get("order") {
        let (column, direction) = order.split_once('.').unwrap_or((order.as_str(), "asc"));
        rows.sort_by(|a, b| {
            let a = a[column].as_str().unwrap_or_default();
            let b = b[column].as_str().unwrap_or_default();
            if direction == "desc" { b.cmp(a) } else { a.cmp(b) }
        });
    }

    if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        rows.truncate(limit);
    }

    Json(rows).into_response()
}

async fn insert_handler(
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !headers.contains_key(AUTHORIZATION) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut row = body;
    row["id"] = json!(format!("{table}-remote-1"));
    row["created_at"] = json!("2025-01-01T00:00:00Z");

    (StatusCode::CREATED, Json(json!([row]))).into_response()
}
