//! Shared test utilities for the claimlink integration tests.

pub mod fixtures;

use claimlink::api::{create_router, AppState};
use claimlink::claims::ClaimEngine;
use claimlink::proxy::{FetchClient, HttpFetchClient};
use claimlink::store::{PolicyStore, RetentionPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Public URL configured for router-level tests
pub const PUBLIC_URL: &str = "http://localhost:3000";

/// A router wired to fresh in-memory state.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<PolicyStore>,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a test app without retention limits.
    pub fn new() -> Self {
        Self::with_store(Arc::new(PolicyStore::new()), PUBLIC_URL.to_string())
    }

    /// Create a test app whose store carries retention limits.
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self::with_store(
            Arc::new(PolicyStore::with_retention(retention)),
            PUBLIC_URL.to_string(),
        )
    }

    /// Create a test app over the given store and public URL.
    pub fn with_store(store: Arc<PolicyStore>, public_url: String) -> Self {
        let fetcher: Arc<dyn FetchClient> = Arc::new(
            HttpFetchClient::new(Duration::from_secs(5)).expect("Failed to build fetch client"),
        );

        let state = Arc::new(AppState {
            claims: ClaimEngine::new(store.clone()),
            store: store.clone(),
            fetcher,
            public_url,
        });

        Self {
            router: create_router(state),
            store,
        }
    }
}

/// Serve a fresh app on an ephemeral port, with the public URL matching the
/// bound address so issued links resolve against the running server.
/// Returns the base URL and the app's store.
#[allow(dead_code)]
pub fn spawn_app() -> (String, Arc<PolicyStore>) {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind app socket");
    let addr = listener.local_addr().expect("Failed to read app address");
    let base_url = format!("http://{}", addr);

    let app = TestApp::with_store(Arc::new(PolicyStore::new()), base_url.clone());
    let store = app.store.clone();
    let router = app.router;

    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .expect("Failed to adopt app socket")
            .serve(router.into_make_service())
            .await
            .expect("app server error");
    });

    (base_url, store)
}

/// Serve fixture files the way a backing file host would, on an ephemeral
/// port. Returns the host's base URL.
#[allow(dead_code)]
pub fn spawn_fixture_server() -> String {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind fixture socket");
    let addr = listener.local_addr().expect("Failed to read fixture address");

    let router = axum::Router::new().route("/:file", axum::routing::get(fixtures::serve_fixture));

    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .expect("Failed to adopt fixture socket")
            .serve(router.into_make_service())
            .await
            .expect("fixture server error");
    });

    format!("http://{}", addr)
}
