// API module for the claimlink server
//
// HTTP interface for the claimable link protocol, built on axum:
//
// * `POST /qr`: register a share request, returning the claim URL
// * `POST /qr/:policy_id/claim`: claim a policy, redirecting to the consumer URL
// * `GET /qr/:policy_id/claimed/:claim_token`: render the claimant's aliased views
// * `GET /qr/:policy_id/claimed/:claim_token/files/:alias_token`: proxy a file fetch
// * `GET /health`: liveness probe
//
// Rejections for unknown or exhausted identifiers all share one 403 shape;
// see the error module for the mapping.

use crate::claims::ClaimEngine;
use crate::error::{ClaimLinkError, Result};
use crate::proxy::FetchClient;
use crate::store::PolicyStore;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

mod handlers;

/// Application state shared with all routes.
///
/// Cloned per request; the components are Arc-backed so clones stay cheap.
#[derive(Clone)]
pub struct AppState {
    /// Policy table
    pub store: Arc<PolicyStore>,
    /// Admission control over the policy table
    pub claims: ClaimEngine,
    /// Client for outbound fetches of true locations
    pub fetcher: Arc<dyn FetchClient>,
    /// Base URL embedded in every issued link
    pub public_url: String,
}

/// The claimlink API server.
///
/// Wraps the router and bind address; construct with `new` and call `start`
/// to begin serving requests.
pub struct ApiServer {
    /// Application state shared with all request handlers
    app_state: Arc<AppState>,
    /// Server bind address in the format "IP:port"
    bind_address: String,
}

impl ApiServer {
    /// Create a new API server instance. Does not bind until `start` is called.
    pub fn new(app_state: Arc<AppState>, bind_address: String) -> Self {
        Self {
            app_state,
            bind_address,
        }
    }

    /// Bind the configured address and serve requests until shutdown.
    pub async fn start(&self) -> Result<()> {
        let app = create_router(self.app_state.clone());

        let addr = self
            .bind_address
            .parse()
            .map_err(|e| ClaimLinkError::Config(format!("Invalid bind address: {}", e)))?;

        info!("Starting API server on {}", self.bind_address);

        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ClaimLinkError::Config(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/qr", post(handlers::register_share))
        .route("/qr/:policy_id/claim", post(handlers::claim_share))
        .route(
            "/qr/:policy_id/claimed/:claim_token",
            get(handlers::render_claimed),
        )
        .route(
            "/qr/:policy_id/claimed/:claim_token/files/:alias_token",
            get(handlers::fetch_claimed_file),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
