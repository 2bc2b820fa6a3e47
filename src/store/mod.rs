// Policy store module for the claimlink server
//
// In-memory table of share policies. All mutation of policy state goes
// through this store; the per-entry guards of the sharded map give every
// policy its own critical section, which is what makes the claim limit
// check-and-append indivisible.

use crate::config::RetentionConfig;
use crate::crypto;
use crate::types::{Policy, ShareRequest};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Retention limits owned by the policy store
///
/// Both limits default to disabled, in which case policies live for the
/// process lifetime.
#[derive(Debug, Clone, Default)]
pub struct RetentionPolicy {
    /// Drop policies older than this
    pub policy_ttl: Option<Duration>,
    /// Evict oldest-registered policies beyond this count
    pub max_policies: Option<usize>,
}

impl RetentionPolicy {
    /// Build retention limits from the config section (0 = disabled)
    pub fn from_config(config: &RetentionConfig) -> Self {
        Self {
            policy_ttl: if config.policy_ttl_secs > 0 {
                Some(Duration::from_secs(config.policy_ttl_secs))
            } else {
                None
            },
            max_policies: if config.max_policies > 0 {
                Some(config.max_policies)
            } else {
                None
            },
        }
    }
}

/// In-memory policy table with optional retention limits
pub struct PolicyStore {
    policies: DashMap<String, Policy>,
    // registration order, consulted by capacity eviction
    order: Mutex<VecDeque<String>>,
    retention: RetentionPolicy,
}

impl PolicyStore {
    /// Create a store without retention limits
    pub fn new() -> Self {
        Self::with_retention(RetentionPolicy::default())
    }

    /// Create a store with the given retention limits
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            policies: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            retention,
        }
    }

    /// Register a share request, returning the fresh policy id.
    ///
    /// Never fails: when a capacity cap is set, the oldest policies are
    /// evicted to make room.
    pub fn register(&self, request: ShareRequest) -> String {
        self.enforce_capacity();

        let id = crypto::new_token();
        let policy = Policy {
            id: id.clone(),
            request,
            claims: Vec::new(),
            registered_at: unix_now(),
        };

        self.policies.insert(id.clone(), policy);
        self.order.lock().push_back(id.clone());
        debug!("Registered policy {}", id);
        id
    }

    /// Fetch an owned snapshot of a policy
    pub fn get(&self, id: &str) -> Option<Policy> {
        self.policies.get(id).map(|entry| entry.clone())
    }

    /// Run `f` against one policy under its entry guard.
    ///
    /// The closure observes and mutates the policy as a single indivisible
    /// unit; concurrent callers targeting the same policy serialize here.
    /// The closure must not block on I/O or touch other store entries.
    pub fn with_policy_mut<T>(&self, id: &str, f: impl FnOnce(&mut Policy) -> T) -> Option<T> {
        self.policies.get_mut(id).map(|mut entry| f(&mut entry))
    }

    /// Number of live policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Drop policies older than the configured TTL, returning how many went
    pub fn prune_expired(&self) -> usize {
        let ttl = match self.retention.policy_ttl {
            Some(ttl) => ttl,
            None => return 0,
        };

        let cutoff = unix_now().saturating_sub(ttl.as_secs());

        // count inside the scan: registrations may land while it runs, so
        // comparing len() snapshots taken around it is not reliable
        let mut removed = 0;
        self.policies.retain(|_, policy| {
            let keep = policy.registered_at >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            self.order.lock().retain(|id| self.policies.contains_key(id));
            debug!("Pruned {} expired policies", removed);
        }

        removed
    }

    fn enforce_capacity(&self) {
        let max = match self.retention.max_policies {
            Some(max) => max,
            None => return,
        };

        while self.policies.len() >= max {
            let oldest = self.order.lock().pop_front();
            match oldest {
                Some(id) => {
                    self.policies.remove(&id);
                    debug!("Evicted policy {} to stay under capacity", id);
                }
                None => break,
            }
        }
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Spawn the background task that prunes expired policies on an interval
pub fn spawn_pruner(store: Arc<PolicyStore>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = store.prune_expired();
            if removed > 0 {
                info!("Retention pass removed {} expired policies", removed);
            }
        }
    })
}
