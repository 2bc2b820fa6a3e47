// Alias module for the claimlink server
//
// Renders the externally visible access views for a claim and resolves alias
// tokens back to true locations. True locations only ever leave the server
// through the views rendered here, and only in aliased form.

use crate::types::{AccessGrant, Claim, Policy};

/// Render the access views a claimant receives on its claimed URL.
///
/// Every true location is replaced by an absolute URL under the claim's own
/// files namespace; all other grant fields pass through untouched. A grant
/// without locations renders without locations.
pub fn render_access(policy: &Policy, claim: &Claim, public_url: &str) -> Vec<AccessGrant> {
    policy
        .request
        .access
        .iter()
        .map(|grant| AccessGrant {
            locations: grant.locations.as_ref().map(|locations| {
                locations
                    .iter()
                    .filter_map(|location| claim.location_alias.get(location))
                    .map(|alias| aliased_url(public_url, &claim.client_specific_url, alias))
                    .collect()
            }),
            extra: grant.extra.clone(),
        })
        .collect()
}

/// Absolute aliased URL for one location under a claim's files namespace
fn aliased_url(public_url: &str, client_specific_url: &str, alias: &str) -> String {
    format!("{}{}/files/{}", public_url, client_specific_url, alias)
}

/// Reverse lookup from alias token to true location.
///
/// The token is caller-controlled input, so a miss is a normal outcome to be
/// handled as data, never a failure that aborts the request.
pub fn resolve_true_location(claim: &Claim, alias_token: &str) -> Option<String> {
    claim
        .location_alias
        .iter()
        .find(|(_, alias)| alias.as_str() == alias_token)
        .map(|(location, _)| location.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShareRequest;
    use serde_json::json;
    use std::collections::HashMap;

    const PUBLIC_URL: &str = "http://localhost:3000";

    fn fixture() -> (Policy, Claim) {
        let request: ShareRequest = serde_json::from_value(json!({
            "access": [
                {
                    "locations": ["http://files/a.json", "http://files/b.json"],
                    "type": "manifest"
                },
                { "note": "metadata only" }
            ]
        }))
        .unwrap();

        let claim = Claim {
            client_name: "unknown".to_string(),
            client_specific_url: "/qr/pid/claimed/ctoken".to_string(),
            query_log: vec!["Claimed: 2024-01-01T00:00:00.000Z".to_string()],
            location_alias: HashMap::from([
                ("http://files/a.json".to_string(), "alias-a".to_string()),
                ("http://files/b.json".to_string(), "alias-b".to_string()),
            ]),
        };

        let policy = Policy {
            id: "pid".to_string(),
            request,
            claims: vec![claim.clone()],
            registered_at: 0,
        };

        (policy, claim)
    }

    #[test]
    fn rendering_aliases_locations_in_grant_order() {
        let (policy, claim) = fixture();
        let views = render_access(&policy, &claim, PUBLIC_URL);

        assert_eq!(views.len(), 2);
        assert_eq!(
            views[0].locations.as_deref(),
            Some(
                &[
                    format!("{}/qr/pid/claimed/ctoken/files/alias-a", PUBLIC_URL),
                    format!("{}/qr/pid/claimed/ctoken/files/alias-b", PUBLIC_URL),
                ][..]
            )
        );
        // metadata passes through untouched
        assert_eq!(views[0].extra.get("type"), Some(&json!("manifest")));
    }

    #[test]
    fn rendering_leaves_location_free_grants_alone() {
        let (policy, claim) = fixture();
        let views = render_access(&policy, &claim, PUBLIC_URL);

        assert!(views[1].locations.is_none());
        assert_eq!(views[1].extra.get("note"), Some(&json!("metadata only")));
    }

    #[test]
    fn rendered_views_never_contain_true_locations() {
        let (policy, claim) = fixture();
        let rendered = serde_json::to_string(&render_access(&policy, &claim, PUBLIC_URL)).unwrap();
        assert!(!rendered.contains("http://files/"));
    }

    #[test]
    fn every_alias_resolves_back_to_its_location() {
        let (_policy, claim) = fixture();

        for (location, alias) in &claim.location_alias {
            assert_eq!(
                resolve_true_location(&claim, alias).as_deref(),
                Some(location.as_str())
            );
        }
    }

    #[test]
    fn unknown_alias_resolves_to_none() {
        let (_policy, claim) = fixture();
        assert!(resolve_true_location(&claim, "fabricated-token").is_none());
    }
}
