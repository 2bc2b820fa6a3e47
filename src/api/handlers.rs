// API handlers for the claimlink server
//
// This module implements the route handlers for the claimable link protocol.

use crate::alias;
use crate::api::AppState;
use crate::error::{ClaimLinkError, Result};
use crate::types::ShareRequest;
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Content type relayed when the upstream response carries none
const FALLBACK_CONTENT_TYPE: &str = "application/text";

/// Register handler: store a share request and hand back its claim URL
#[axum::debug_handler]
pub async fn register_share(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ShareRequest>,
) -> Result<impl IntoResponse> {
    info!("Registering share request");

    let id = state.store.register(request);
    let url = format!("{}/qr/{}/claim", state.public_url, id);

    Ok((StatusCode::OK, Json(serde_json::json!({ "url": url }))))
}

/// Claim handler: admit a claimant and redirect to its consumer-specific URL
#[axum::debug_handler]
pub async fn claim_share(
    State(state): State<Arc<AppState>>,
    Path(policy_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    info!("Claim attempt for policy {}", policy_id);

    let client_name = params.get("clientName").map(|name| name.as_str());
    let claim = state.claims.admit(&policy_id, client_name)?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, claim.client_specific_url)],
    ))
}

/// Claimed-view handler: render the aliased access views for one claim
#[axum::debug_handler]
pub async fn render_claimed(
    State(state): State<Arc<AppState>>,
    Path((policy_id, claim_token)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    info!("Rendering claimed access for policy {}", policy_id);

    let (policy, claim) = state.claims.lookup(&policy_id, &claim_token)?;
    let views = alias::render_access(&policy, &claim, &state.public_url);

    Ok((StatusCode::OK, Json(views)))
}

/// File handler: resolve an alias token and proxy the true location.
///
/// Lookup misses short-circuit before any network call; the upstream status,
/// content type, and body are relayed untouched.
#[axum::debug_handler]
pub async fn fetch_claimed_file(
    State(state): State<Arc<AppState>>,
    Path((policy_id, claim_token, alias_token)): Path<(String, String, String)>,
) -> Result<impl IntoResponse> {
    info!("Proxying aliased file fetch for policy {}", policy_id);

    let (_policy, claim) = state.claims.lookup(&policy_id, &claim_token)?;

    let location = alias::resolve_true_location(&claim, &alias_token).ok_or_else(|| {
        ClaimLinkError::NotFound("This QR has not been correctly claimed".to_string())
    })?;
    debug!("Alias resolved for policy {}", policy_id);

    let resource = state.fetcher.fetch(&location).await?;

    let status = StatusCode::from_u16(resource.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = resource
        .content_type
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    Ok((status, [(header::CONTENT_TYPE, content_type)], resource.body))
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "timestamp": std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
        })),
    )
}
