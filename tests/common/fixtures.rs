//! Fixture payloads standing in for a backing file host.

#![allow(dead_code)]

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde_json::{json, Value};

/// Body served for `example.json`
pub fn example_body() -> Value {
    json!({
        "resourceType": "Bundle",
        "entry": [{ "resource": { "id": "example" } }]
    })
}

/// Share request body holding a single grant over the given locations
pub fn share_body(locations: &[&str], claims_limit: Option<u64>) -> Value {
    let mut body = json!({
        "access": [{
            "locations": locations,
            "type": "manifest"
        }]
    });
    if let Some(limit) = claims_limit {
        body["claimsLimit"] = json!(limit);
    }
    body
}

/// Fixture route. Answers 201 so tests can tell a relayed upstream status
/// from a locally generated 200.
pub async fn serve_fixture(Path(file): Path<String>) -> impl IntoResponse {
    match file.as_str() {
        "example.json" => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "application/json")],
            example_body().to_string(),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
