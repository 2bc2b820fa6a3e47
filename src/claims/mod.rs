// Claims module for the claimlink server
//
// Admission control over share policies: decides whether a claim attempt is
// accepted, materializes the claim record on admission, and resolves claims
// back from their consumer-specific URLs.

use crate::crypto;
use crate::error::{ClaimLinkError, Result};
use crate::store::PolicyStore;
use crate::types::{Claim, Policy, ShareRequest};
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Path of the consumer-specific URL issued to a claimant
pub fn claimed_path(policy_id: &str, claim_token: &str) -> String {
    format!("/qr/{}/claimed/{}", policy_id, claim_token)
}

/// Uniform rejection line for claim attempts.
///
/// Unknown and exhausted policies share this message on purpose: callers must
/// not be able to tell a spent link from one that never existed.
fn claim_rejection(policy_id: &str) -> String {
    format!("QR {} is not valid or has already been claimed", policy_id)
}

/// Admission control and claim lookup over the policy store
#[derive(Clone)]
pub struct ClaimEngine {
    store: Arc<PolicyStore>,
}

impl ClaimEngine {
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self { store }
    }

    /// Attempt to claim a policy.
    ///
    /// The limit check and the claim append run as one indivisible unit under
    /// the policy's store entry, so two racing claims against a limit of one
    /// can never both be admitted. An absent limit admits unconditionally; a
    /// limit of zero never admits. An absent or empty client name is recorded
    /// as "unknown".
    pub fn admit(&self, policy_id: &str, client_name: Option<&str>) -> Result<Claim> {
        let client_name = client_name
            .filter(|name| !name.is_empty())
            .unwrap_or("unknown");

        let admitted = self.store.with_policy_mut(policy_id, |policy| {
            if let Some(limit) = policy.request.claims_limit {
                if policy.claims.len() as u64 >= limit {
                    return Err(ClaimLinkError::LimitExhausted(claim_rejection(policy_id)));
                }
            }

            let claim = issue_claim(policy_id, client_name, &policy.request);
            policy.claims.push(claim.clone());
            Ok(claim)
        });

        match admitted {
            Some(Ok(claim)) => {
                debug!("Admitted claim for policy {}", policy_id);
                Ok(claim)
            }
            Some(Err(err)) => Err(err),
            None => Err(ClaimLinkError::NotFound(claim_rejection(policy_id))),
        }
    }

    /// Look up a claim by policy id and claim token.
    ///
    /// The claim is matched by exact comparison against its consumer-specific
    /// URL. Returns owned snapshots so no store guard is held afterwards.
    pub fn lookup(&self, policy_id: &str, claim_token: &str) -> Result<(Policy, Claim)> {
        let policy = self.store.get(policy_id).ok_or_else(|| {
            ClaimLinkError::NotFound(format!("QR {} is no longer valid", policy_id))
        })?;

        let wanted = claimed_path(policy_id, claim_token);
        let claim = policy
            .claims
            .iter()
            .find(|claim| claim.client_specific_url == wanted)
            .cloned()
            .ok_or_else(|| {
                ClaimLinkError::NotFound("This QR has not been correctly claimed".to_string())
            })?;

        Ok((policy, claim))
    }
}

/// Materialize a claim: fresh consumer URL, seeded audit log, and a fresh
/// alias for every distinct location across the request's grants.
fn issue_claim(policy_id: &str, client_name: &str, request: &ShareRequest) -> Claim {
    let token = crypto::new_token();
    let client_specific_url = claimed_path(policy_id, &token);

    let mut location_alias = HashMap::new();
    for grant in &request.access {
        if let Some(locations) = &grant.locations {
            for location in locations {
                location_alias
                    .entry(location.clone())
                    .or_insert_with(crypto::new_token);
            }
        }
    }

    Claim {
        client_name: client_name.to_string(),
        client_specific_url,
        query_log: vec![format!(
            "Claimed: {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        )],
        location_alias,
    }
}
