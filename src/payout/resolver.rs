//! Payout address resolution
//!
//! Resolves the donation address of every project in a list by looking the
//! projects up concurrently. Each call to [`PayoutAddressResolver::resolve`]
//! opens a new round; results of a superseded round, or of any round after
//! [`PayoutAddressResolver::dispose`], are dropped instead of written.

use super::pure::{resolve_payout_address, PayoutAddressMap, PayoutItem};
use crate::abstractions::{AddressValidator, Notifier, ProjectLookup};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const PAYOUT_LOAD_WARNING: &str = "Unable to load payout addresses";

#[derive(Debug, Default)]
struct ResolverState {
    generation: u64,
    disposed: bool,
    payout_addresses: PayoutAddressMap,
    missing_payouts: BTreeSet<String>,
    is_fetching: bool,
}

/// Point-in-time view of the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutSnapshot {
    pub payout_addresses: PayoutAddressMap,
    pub missing_payouts: BTreeSet<String>,
    pub is_fetching: bool,
}

/// Result of one resolution round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRound {
    pub generation: u64,
    /// False when the round was superseded or the resolver disposed
    pub applied: bool,
    pub failed_lookups: usize,
}

pub struct PayoutAddressResolver {
    lookup: Arc<dyn ProjectLookup>,
    validator: Arc<dyn AddressValidator>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<ResolverState>>,
}

impl PayoutAddressResolver {
    pub fn new(
        lookup: Arc<dyn ProjectLookup>,
        validator: Arc<dyn AddressValidator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            lookup,
            validator,
            notifier,
            state: Arc::new(Mutex::new(ResolverState::default())),
        }
    }

    /// Resolve payout addresses for `items`, superseding any running round.
    ///
    /// Failed lookups mark their item missing and produce one aggregate
    /// warning for the round.
    pub async fn resolve(&self, items: &[PayoutItem], community_id: Option<&str>) -> ResolutionRound {
        let generation = {
            let mut state = self.state.lock().await;
            if state.disposed {
                return ResolutionRound {
                    generation: state.generation,
                    applied: false,
                    failed_lookups: 0,
                };
            }
            state.generation += 1;
            state.is_fetching = true;
            state.generation
        };
        debug!("Payout round {} resolving {} items", generation, items.len());

        let lookups = items.iter().map(|item| async move {
            let result = self.lookup.fetch_project(item.lookup_key()).await;
            (item, result)
        });
        let results = join_all(lookups).await;

        let mut addresses = PayoutAddressMap::new();
        let mut missing = BTreeSet::new();
        let mut failed_lookups = 0;
        for (item, result) in results {
            let address = match result {
                Ok(Some(project)) => {
                    resolve_payout_address(&project, community_id, self.validator.as_ref())
                }
                Ok(None) => {
                    debug!("Project {} not found", item.lookup_key());
                    None
                }
                Err(e) => {
                    warn!("Payout lookup failed for {}: {}", item.lookup_key(), e);
                    failed_lookups += 1;
                    None
                }
            };
            if address.is_none() {
                missing.insert(item.uid.clone());
            }
            addresses.insert(item.uid.clone(), address);
        }

        {
            let mut state = self.state.lock().await;
            if state.disposed || state.generation != generation {
                debug!(
                    "Discarding payout round {} (current {}, disposed {})",
                    generation, state.generation, state.disposed
                );
                return ResolutionRound {
                    generation,
                    applied: false,
                    failed_lookups,
                };
            }
            state.payout_addresses = addresses;
            state.missing_payouts = missing;
            state.is_fetching = false;
            info!(
                "Payout round {}: {} resolved, {} missing",
                generation,
                state.payout_addresses.len() - state.missing_payouts.len(),
                state.missing_payouts.len()
            );
        }

        if failed_lookups > 0 {
            self.notifier.warning(PAYOUT_LOAD_WARNING);
        }

        ResolutionRound {
            generation,
            applied: true,
            failed_lookups,
        }
    }

    /// Stop accepting results; later and in-flight rounds are discarded
    pub async fn dispose(&self) {
        let mut state = self.state.lock().await;
        state.disposed = true;
        state.generation += 1;
        state.is_fetching = false;
    }

    pub async fn snapshot(&self) -> PayoutSnapshot {
        let state = self.state.lock().await;
        PayoutSnapshot {
            payout_addresses: state.payout_addresses.clone(),
            missing_payouts: state.missing_payouts.clone(),
            is_fetching: state.is_fetching,
        }
    }

    pub async fn payout_addresses(&self) -> PayoutAddressMap {
        self.state.lock().await.payout_addresses.clone()
    }

    pub async fn missing_payouts(&self) -> BTreeSet<String> {
        self.state.lock().await.missing_payouts.clone()
    }

    pub async fn is_fetching(&self) -> bool {
        self.state.lock().await.is_fetching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstractions::{EvmAddressValidator, ProjectRecord, RecordingNotifier, StaticProjectLookup};
    use serde_json::json;

    const A: &str = "0x1111111111111111111111111111111111111111";

    fn record(value: serde_json::Value) -> ProjectRecord {
        serde_json::from_value(value).unwrap()
    }

    fn resolver(lookup: StaticProjectLookup, notifier: RecordingNotifier) -> PayoutAddressResolver {
        PayoutAddressResolver::new(
            Arc::new(lookup),
            Arc::new(EvmAddressValidator),
            Arc::new(notifier),
        )
    }

    #[tokio::test]
    async fn test_resolves_and_classifies() {
        let lookup = StaticProjectLookup::new()
            .with_project("alpha-slug", record(json!({ "payoutAddress": A })))
            .with_project("uid-b", record(json!({ "recipient": "bogus" })));
        let notifier = RecordingNotifier::new();
        let resolver = resolver(lookup.clone(), notifier.clone());

        let items = vec![
            PayoutItem::new("uid-a").with_slug("alpha-slug"),
            PayoutItem::new("uid-b"),
            PayoutItem::new("uid-c"),
        ];
        let round = resolver.resolve(&items, None).await;

        assert!(round.applied);
        assert_eq!(round.failed_lookups, 0);
        let snapshot = resolver.snapshot().await;
        assert_eq!(snapshot.payout_addresses["uid-a"], Some(A.to_string()));
        assert_eq!(snapshot.payout_addresses["uid-b"], None);
        assert_eq!(
            snapshot.missing_payouts.into_iter().collect::<Vec<_>>(),
            vec!["uid-b", "uid-c"]
        );
        assert!(!snapshot.is_fetching);
        assert!(notifier.all().is_empty());

        let mut keys = lookup.requested_keys().await;
        keys.sort();
        assert_eq!(keys, vec!["alpha-slug", "uid-b", "uid-c"]);
    }

    #[tokio::test]
    async fn test_failures_warn_once() {
        let lookup = StaticProjectLookup::new()
            .with_project("ok", record(json!({ "payoutAddress": A })))
            .with_failure("down-1")
            .with_failure("down-2");
        let notifier = RecordingNotifier::new();
        let resolver = resolver(lookup, notifier.clone());

        let items = vec![PayoutItem::new("ok"), PayoutItem::new("down-1"), PayoutItem::new("down-2")];
        let round = resolver.resolve(&items, None).await;

        assert_eq!(round.failed_lookups, 2);
        assert_eq!(notifier.warnings(), vec![PAYOUT_LOAD_WARNING]);
        assert_eq!(resolver.payout_addresses().await["ok"], Some(A.to_string()));
        assert!(resolver.missing_payouts().await.contains("down-1"));
        assert!(!resolver.is_fetching().await);
    }

    #[tokio::test]
    async fn test_disposed_resolver_ignores_rounds() {
        let lookup = StaticProjectLookup::new().with_failure("down");
        let notifier = RecordingNotifier::new();
        let resolver = resolver(lookup, notifier.clone());

        resolver.dispose().await;
        let round = resolver.resolve(&[PayoutItem::new("down")], None).await;

        assert!(!round.applied);
        assert!(resolver.payout_addresses().await.is_empty());
        assert!(notifier.all().is_empty());
    }

    #[tokio::test]
    async fn test_empty_items() {
        let resolver = resolver(StaticProjectLookup::new(), RecordingNotifier::new());
        let round = resolver.resolve(&[], None).await;
        assert!(round.applied);
        assert_eq!(resolver.snapshot().await, PayoutSnapshot::default());
    }
}
