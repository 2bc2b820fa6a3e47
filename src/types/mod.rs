// Types module for the claimlink server
//
// Core data model: producer-supplied share requests and the policies and
// claims the server builds from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Producer-supplied share request: an ordered sequence of access grants plus
/// an optional claim-count limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Access grants exposed by this share
    pub access: Vec<AccessGrant>,

    /// Maximum number of claims admitted against this policy. Absent means
    /// unlimited; a present 0 means the policy is never claimable.
    #[serde(
        rename = "claimsLimit",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub claims_limit: Option<u64>,

    /// Remaining producer-supplied fields, passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A producer-declared bundle of backing locations plus pass-through metadata.
///
/// Only `locations` is interpreted by the server; everything else is opaque
/// manifest metadata that reappears unchanged in rendered access views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGrant {
    /// True location URIs the grant exposes; may be absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,

    /// Remaining producer-supplied fields, passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A registered share policy and its accumulated claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Opaque policy identifier, generated at registration, immutable
    pub id: String,

    /// The request this policy was registered with
    pub request: ShareRequest,

    /// Claims admitted against this policy, append-only
    pub claims: Vec<Claim>,

    /// Registration time in seconds since the epoch, consulted by retention
    pub registered_at: u64,
}

/// One consumer's successful redemption of a policy.
///
/// Immutable once admitted; the `client_specific_url` path is the claim's
/// identity for all subsequent lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// Caller-supplied label for the claimant
    pub client_name: String,

    /// Consumer-specific path issued on admission
    pub client_specific_url: String,

    /// Human-readable audit lines, append-only, seeded with the claim time
    pub query_log: Vec<String>,

    /// Mapping from true location URI to this claim's alias token
    pub location_alias: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn share_request_keeps_unknown_fields() {
        let body = json!({
            "access": [{
                "locations": ["https://files.example/a.json"],
                "type": "manifest",
                "version": 2
            }],
            "claimsLimit": 3,
            "issuer": "lab-42"
        });

        let request: ShareRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.claims_limit, Some(3));
        assert_eq!(request.extra.get("issuer"), Some(&json!("lab-42")));

        let grant = &request.access[0];
        assert_eq!(
            grant.locations.as_deref(),
            Some(&["https://files.example/a.json".to_string()][..])
        );
        assert_eq!(grant.extra.get("type"), Some(&json!("manifest")));
        assert_eq!(grant.extra.get("version"), Some(&json!(2)));

        let round = serde_json::to_value(&request).unwrap();
        assert_eq!(round["issuer"], json!("lab-42"));
        assert_eq!(round["claimsLimit"], json!(3));
        assert_eq!(round["access"][0]["type"], json!("manifest"));
    }

    #[test]
    fn grant_without_locations_stays_without_locations() {
        let grant: AccessGrant =
            serde_json::from_value(json!({ "note": "metadata only" })).unwrap();
        assert!(grant.locations.is_none());

        let round = serde_json::to_value(&grant).unwrap();
        assert!(round.get("locations").is_none());
        assert_eq!(round["note"], json!("metadata only"));
    }

    #[test]
    fn absent_claims_limit_is_unlimited() {
        let request: ShareRequest = serde_json::from_value(json!({ "access": [] })).unwrap();
        assert!(request.claims_limit.is_none());

        let round = serde_json::to_value(&request).unwrap();
        assert!(round.get("claimsLimit").is_none());
    }
}
