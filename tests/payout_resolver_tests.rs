//! Integration tests for payout address resolution

mod common;

use async_trait::async_trait;
use common::{payment, PAYOUT_A, PAYOUT_B};
use gap_core::abstractions::{
    EvmAddressValidator, ProjectLookup, ProjectRecord, RecordingNotifier, StaticProjectLookup,
};
use gap_core::checkout::pure::find_missing_payouts;
use gap_core::payout::{
    chain_payout_addresses, format_address, PayoutAddressResolver, PayoutItem,
    PAYOUT_LOAD_WARNING,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Lookup whose `gated_key` request blocks until the gate opens
struct GatedLookup {
    inner: StaticProjectLookup,
    gated_key: String,
    started: Arc<Notify>,
    gate: Arc<Notify>,
}

#[async_trait]
impl ProjectLookup for GatedLookup {
    async fn fetch_project(&self, slug_or_uid: &str) -> anyhow::Result<Option<ProjectRecord>> {
        if slug_or_uid == self.gated_key {
            self.started.notify_one();
            self.gate.notified().await;
        }
        self.inner.fetch_project(slug_or_uid).await
    }
}

fn record(value: serde_json::Value) -> ProjectRecord {
    serde_json::from_value(value).unwrap()
}

fn projects() -> StaticProjectLookup {
    StaticProjectLookup::new()
        .with_project("slow", record(json!({ "payoutAddress": PAYOUT_A })))
        .with_project("fast", record(json!({ "payoutAddress": PAYOUT_B })))
}

fn gated(inner: StaticProjectLookup) -> (Arc<GatedLookup>, Arc<Notify>, Arc<Notify>) {
    let started = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let lookup = Arc::new(GatedLookup {
        inner,
        gated_key: "slow".to_string(),
        started: started.clone(),
        gate: gate.clone(),
    });
    (lookup, started, gate)
}

#[tokio::test]
async fn test_superseded_round_is_discarded() {
    let (lookup, started, gate) = gated(projects());
    let notifier = RecordingNotifier::new();
    let resolver = Arc::new(PayoutAddressResolver::new(
        lookup,
        Arc::new(EvmAddressValidator),
        Arc::new(notifier.clone()),
    ));

    let first = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve(&[PayoutItem::new("slow")], None).await })
    };
    started.notified().await;

    let second = resolver.resolve(&[PayoutItem::new("fast")], None).await;
    assert!(second.applied);
    assert!(!resolver.is_fetching().await);

    gate.notify_one();
    let first = first.await.unwrap();
    assert!(!first.applied);
    assert!(first.generation < second.generation);

    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.payout_addresses.len(), 1);
    assert_eq!(snapshot.payout_addresses["fast"], Some(PAYOUT_B.to_string()));
    assert!(!snapshot.payout_addresses.contains_key("slow"));
}

#[tokio::test]
async fn test_dispose_discards_in_flight_round() {
    let (lookup, started, gate) = gated(projects().with_failure("broken"));
    let notifier = RecordingNotifier::new();
    let resolver = Arc::new(PayoutAddressResolver::new(
        lookup,
        Arc::new(EvmAddressValidator),
        Arc::new(notifier.clone()),
    ));

    let round = {
        let resolver = resolver.clone();
        tokio::spawn(async move {
            let items = [PayoutItem::new("slow"), PayoutItem::new("broken")];
            resolver.resolve(&items, None).await
        })
    };
    started.notified().await;
    resolver.dispose().await;
    gate.notify_one();

    let round = round.await.unwrap();
    assert!(!round.applied);
    assert_eq!(round.failed_lookups, 1);
    assert!(resolver.payout_addresses().await.is_empty());
    assert!(!resolver.is_fetching().await);
    assert!(notifier.warnings().is_empty());
}

#[tokio::test]
async fn test_lookups_run_concurrently() {
    let inner = projects();
    let (lookup, started, gate) = gated(inner.clone());
    let resolver = Arc::new(PayoutAddressResolver::new(
        lookup,
        Arc::new(EvmAddressValidator),
        Arc::new(RecordingNotifier::new()),
    ));

    let round = {
        let resolver = resolver.clone();
        tokio::spawn(async move {
            let items = [PayoutItem::new("slow"), PayoutItem::new("fast")];
            resolver.resolve(&items, None).await
        })
    };
    started.notified().await;
    assert!(resolver.is_fetching().await);

    tokio::time::timeout(Duration::from_secs(5), async {
        while !inner.requested_keys().await.contains(&"fast".to_string()) {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("fast lookup should start while slow lookup is pending");

    gate.notify_one();
    assert!(round.await.unwrap().applied);
    assert_eq!(resolver.missing_payouts().await.len(), 0);
}

#[tokio::test]
async fn test_community_preference_and_failure_warning() {
    let lookup = StaticProjectLookup::new()
        .with_project(
            "multi",
            record(json!({ "payoutAddress": { "gitcoin": PAYOUT_A, "optimism": PAYOUT_B } })),
        )
        .with_failure("offline");
    let notifier = RecordingNotifier::new();
    let resolver = PayoutAddressResolver::new(
        Arc::new(lookup),
        Arc::new(EvmAddressValidator),
        Arc::new(notifier.clone()),
    );

    let items = vec![
        PayoutItem::new("uid-multi").with_slug("multi"),
        PayoutItem::new("offline"),
    ];
    resolver.resolve(&items, Some("optimism")).await;

    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.payout_addresses["uid-multi"], Some(PAYOUT_B.to_string()));
    assert!(snapshot.missing_payouts.contains("offline"));
    assert_eq!(notifier.warnings(), vec![PAYOUT_LOAD_WARNING]);

    resolver.resolve(&items, None).await;
    assert_eq!(
        resolver.payout_addresses().await["uid-multi"],
        Some(PAYOUT_A.to_string())
    );
    assert_eq!(notifier.warnings().len(), 2);
}

#[tokio::test]
async fn test_resolved_addresses_feed_checkout() {
    let lookup = StaticProjectLookup::new()
        .with_project("alpha", record(json!({ "payoutAddress": PAYOUT_A })))
        .with_project("beta", record(json!({ "recipient": "" })));
    let resolver = PayoutAddressResolver::new(
        Arc::new(lookup),
        Arc::new(EvmAddressValidator),
        Arc::new(RecordingNotifier::new()),
    );
    resolver
        .resolve(&[PayoutItem::new("alpha"), PayoutItem::new("beta")], None)
        .await;

    let payments = vec![payment("alpha", 10), payment("beta", 10)];
    let by_chain = chain_payout_addresses(&payments, &resolver.payout_addresses().await);
    let missing = find_missing_payouts(&payments, &by_chain);

    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].project_id, "beta");
    assert_eq!(format_address(by_chain["alpha"].get(&10).map(String::as_str)), "0x1111…1111");
}
