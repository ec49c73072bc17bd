//! End-to-end tests for the ecosystem service over a live broker.
//!
//! These tests require a live NATS broker. Run with:
//!
//! ```bash
//! docker compose up -d
//! cargo test -p veldt-service -- --ignored
//! docker compose down
//! ```
//!
//! All tests are marked `#[ignore]` so they are skipped during normal
//! `cargo test` runs.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::items_after_statements,
    clippy::missing_panics_doc
)]

use std::time::Duration;

use futures::StreamExt as _;
use veldt_rpc::events::{decode_notice, subscribe_consumed};
use veldt_rpc::{
    EcosystemClient, EventPublisher, RpcClientConfig, RpcDispatcher, Topology, TransportBinding,
};
use veldt_service::tick::{TickTiming, run_tick_loop};
use veldt_service::EcosystemService;
use veldt_types::{ClientId, EntityKind, PreyDesc};
use veldt_world::{EcosystemState, SharedEcosystem, WorldRules};

/// NATS connection URL for the local Docker instance.
const NATS_URL: &str = "nats://localhost:4222";

/// A fresh subject namespace so concurrent test runs cannot cross-talk.
fn test_topology() -> Topology {
    let ns = ClientId::new();
    Topology {
        request_subject: format!("veldt-test.{ns}.requests"),
        queue_group: format!("veldt-test.{ns}.service"),
        reply_prefix: format!("veldt-test.{ns}.reply"),
        events_prefix: format!("veldt-test.{ns}.events"),
    }
}

/// Start a full service (dispatcher plus fast tick loop) for `topology`.
async fn start_service(topology: Topology, rules: WorldRules) -> SharedEcosystem {
    let shared = SharedEcosystem::new(EcosystemState::new(rules));
    let binding = TransportBinding::connect(NATS_URL, topology)
        .await
        .expect("service connect");

    let publisher = EventPublisher::new(binding.client(), binding.topology().clone());
    let timing = TickTiming {
        interval: Duration::from_millis(100),
        cooldown: Duration::from_millis(200),
    };
    tokio::spawn(run_tick_loop(shared.clone(), publisher, timing));

    let handler = EcosystemService::new(shared.clone());
    tokio::spawn(async move {
        let dispatcher = RpcDispatcher::new(binding, handler);
        let _ = dispatcher.run().await;
    });
    // The queue subscription must be live before the first call.
    tokio::time::sleep(Duration::from_millis(200)).await;
    shared
}

#[tokio::test]
#[ignore = "requires live NATS instance (docker compose up -d)"]
async fn prey_within_reach_is_consumed_and_announced() {
    let topology = test_topology();
    start_service(topology.clone(), WorldRules::default()).await;

    let mut client = EcosystemClient::connect(NATS_URL, topology, RpcClientConfig::default())
        .await
        .expect("client connect");

    let prey = PreyDesc {
        name: "Hazel Burrows".to_owned(),
        weight: 4,
        distance: 1000,
    };
    let id = client.enter_area(&prey).await.expect("enter area");
    assert!(client.is_prey_alive(id).await.expect("alive after entry"));

    let nats = client.binding().client();
    let mut notices = subscribe_consumed(&nats, client.binding().topology(), id)
        .await
        .expect("subscribe");

    // Step inside the consumption radius; the next tick must eat it.
    assert!(client.update_distance(id, 10).await.expect("update"));

    let message = tokio::time::timeout(Duration::from_secs(5), notices.next())
        .await
        .expect("notice within five seconds")
        .expect("subscription open");
    let notice = decode_notice(&message.payload).expect("decodable notice");
    assert_eq!(notice.id, id);
    assert_eq!(notice.kind, EntityKind::Prey);
    assert_eq!(notice.weight, 4);

    assert!(!client.is_prey_alive(id).await.expect("alive after consumption"));
    assert!(!client.update_distance(id, 10).await.expect("update after consumption"));
}

#[tokio::test]
#[ignore = "requires live NATS instance (docker compose up -d)"]
async fn fullness_triggers_the_cooldown_and_resets_weight() {
    let topology = test_topology();
    let rules = WorldRules {
        max_weight: 5,
        ..WorldRules::default()
    };
    let shared = start_service(topology.clone(), rules).await;

    let mut client = EcosystemClient::connect(NATS_URL, topology, RpcClientConfig::default())
        .await
        .expect("client connect");

    let prey = PreyDesc {
        name: "Juniper Fallow".to_owned(),
        weight: 9,
        distance: 1000,
    };
    let id = client.enter_area(&prey).await.expect("enter area");

    let nats = client.binding().client();
    let mut notices = subscribe_consumed(&nats, client.binding().topology(), id)
        .await
        .expect("subscribe");

    assert!(client.update_distance(id, 1).await.expect("update"));
    tokio::time::timeout(Duration::from_secs(5), notices.next())
        .await
        .expect("notice within five seconds")
        .expect("subscription open");

    // The single meal crossed the threshold, so the weight is put back
    // to zero before the cooldown starts.
    assert_eq!(shared.with(|state| state.weight()), 0);
}
