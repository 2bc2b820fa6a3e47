// Claimlink Server
//
// This crate implements the server side of a "claimable link" protocol: a producer
// registers a share policy describing access grants over backing file locations and
// receives a single opaque, QR-encodable claim URL. A consumer claims that URL once
// (or up to a configured limit), receiving a private consumer-specific URL whose
// rendered grants expose only per-claim alias tokens. File fetches through those
// aliases are proxied to the true locations, which are never revealed directly.
//
// # Architecture
//
// The server is built around a small set of components:
//
// * **API Layer**: Axum HTTP endpoints for registration, claiming, and aliased fetches
// * **Policy Store**: In-memory table of share policies with optional retention limits
// * **Claim Engine**: Admission control and claim materialization
// * **Alias Resolver**: Rendering of aliased grant views and reverse alias lookup
// * **Proxy Fetcher**: Outbound retrieval of true locations with bounded timeouts

/// HTTP API for the claimlink server.
///
/// Provides the router, shared application state, and the `ApiServer` wrapper
/// that binds the configured address and serves requests.
pub mod api;

/// Claim admission and lookup.
///
/// Decides whether a claim attempt against a share policy is accepted and, on
/// admission, materializes the claim with a fresh consumer-specific URL and a
/// fresh alias mapping.
pub mod claims;

/// Rendering of aliased access views and reverse alias resolution.
pub mod alias;

/// Configuration loading and validation.
pub mod config;

/// Opaque token generation for policy ids, claim URLs, and location aliases.
pub mod crypto;

/// Error types for claimlink operations.
pub mod error;

/// Outbound fetching of true file locations.
pub mod proxy;

/// In-memory policy storage with optional TTL and capacity retention.
pub mod store;

/// Core data model: share requests, access grants, policies, and claims.
pub mod types;
