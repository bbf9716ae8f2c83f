use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::{sleep, Instant};

use crate::*;
use crate::testing::FakeHost;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn bridge_for(host: &Arc<FakeHost>) -> HostStoreBridge {
    init_logging();
    HostStoreBridge::new(HostSlot::with_host(host.clone()))
}

#[test]
fn test_probe_order() {
    let all = Arc::new(FakeHost::new().with_subscribe().with_event_target().with_emitter(true));
    let events = Arc::new(FakeHost::new().with_event_target().with_emitter(true));
    let emitter = Arc::new(FakeHost::new().with_emitter(false));
    let read_only = Arc::new(FakeHost::new());

    assert_eq!(bridge_for(&all).probe(), Capability::Subscribe);
    assert_eq!(bridge_for(&events).probe(), Capability::EventTarget);
    assert_eq!(bridge_for(&emitter).probe(), Capability::Emitter);
    assert_eq!(bridge_for(&read_only).probe(), Capability::Poll);
    assert_eq!(HostStoreBridge::new(HostSlot::new()).probe(), Capability::Poll);
}

#[tokio::test(start_paused = true)]
async fn test_initial_value_is_read_on_subscribe() {
    let host = Arc::new(
        FakeHost::new()
            .with_subscribe()
            .with_value(HostKey::ToolOutput, json!({ "type": "chess_snapshot" })),
    );
    let subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    assert_eq!(subscription.key(), HostKey::ToolOutput);
    assert_eq!(subscription.current(), Some(json!({ "type": "chess_snapshot" })));
}

#[tokio::test(start_paused = true)]
async fn test_change_while_attaching_is_not_lost() {
    let host = Arc::new(
        FakeHost::new()
            .with_subscribe()
            .with_value(HostKey::ToolOutput, json!({ "state": "T:player" }))
            .with_value_on_register(HostKey::ToolOutput, json!({ "state": "T:opponent" })),
    );
    let subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    assert_eq!(host.listener_count(), 1);
    assert_eq!(subscription.current(), Some(json!({ "state": "T:opponent" })));
}

#[tokio::test(start_paused = true)]
async fn test_subscribe_delivers_changes() {
    let host = Arc::new(FakeHost::new().with_subscribe());
    let mut subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    assert_eq!(subscription.capability(), Some(Capability::Subscribe));
    assert_eq!(subscription.current(), None);

    host.set(HostKey::ToolOutput, json!({ "type": "slot_snapshot" }));

    assert_eq!(subscription.changed().await, Some(json!({ "type": "slot_snapshot" })));
}

#[tokio::test(start_paused = true)]
async fn test_event_target_delivers_changes() {
    let host = Arc::new(FakeHost::new().with_event_target());
    let mut subscription = bridge_for(&host).subscribe(HostKey::WidgetState);

    assert_eq!(subscription.capability(), Some(Capability::EventTarget));

    host.set(HostKey::WidgetState, json!({ "flipped": true }));

    assert_eq!(subscription.changed().await, Some(json!({ "flipped": true })));
}

#[tokio::test(start_paused = true)]
async fn test_emitter_delivers_changes() {
    let host = Arc::new(FakeHost::new().with_emitter(true));
    let mut subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    assert_eq!(subscription.capability(), Some(Capability::Emitter));

    host.set(HostKey::ToolOutput, json!(1));

    assert_eq!(subscription.changed().await, Some(json!(1)));
}

#[tokio::test(start_paused = true)]
async fn test_structurally_equal_values_do_not_notify() {
    let host = Arc::new(FakeHost::new().with_subscribe());
    let subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);
    let mut receiver = subscription.watch();

    host.set(HostKey::ToolOutput, json!({ "type": "x", "state": "a" }));
    assert!(receiver.has_changed().unwrap());
    receiver.borrow_and_update();

    host.set(HostKey::ToolOutput, json!({ "state": "a", "type": "x" }));
    assert!(!receiver.has_changed().unwrap());

    host.set(HostKey::ToolOutput, json!({ "type": "x", "state": "b" }));
    assert!(receiver.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_poll_picks_up_silent_changes_on_tick() {
    let host = Arc::new(FakeHost::new());
    let mut subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    assert_eq!(subscription.capability(), Some(Capability::Poll));

    let start = Instant::now();
    host.set_silently(HostKey::ToolOutput, json!({ "type": "mancala_snapshot" }));

    assert_eq!(subscription.changed().await, Some(json!({ "type": "mancala_snapshot" })));
    let elapsed = start.elapsed();
    assert!(elapsed >= DEFAULT_POLL_INTERVAL);
    assert!(elapsed < DEFAULT_POLL_INTERVAL * 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_poll_interval() {
    let host = Arc::new(FakeHost::new());
    let bridge = bridge_for(&host).with_poll_interval(Duration::from_secs(2));
    let mut subscription = bridge.subscribe(HostKey::ToolOutput);

    host.set_silently(HostKey::ToolOutput, json!("late"));
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(subscription.current(), None);

    assert_eq!(subscription.changed().await, Some(json!("late")));
}

#[tokio::test(start_paused = true)]
async fn test_refresh_reads_immediately() {
    let host = Arc::new(FakeHost::new().with_subscribe());
    let subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    host.set_silently(HostKey::ToolOutput, json!("quiet"));

    assert!(subscription.refresh());
    assert!(!subscription.refresh());
    assert_eq!(subscription.current(), Some(json!("quiet")));
}

#[tokio::test(start_paused = true)]
async fn test_drop_removes_listener() {
    let subscribing = Arc::new(FakeHost::new().with_subscribe());
    let targeting = Arc::new(FakeHost::new().with_event_target());
    let emitting = Arc::new(FakeHost::new().with_emitter(true));

    for host in [&subscribing, &targeting, &emitting] {
        let subscription = bridge_for(host).subscribe(HostKey::ToolOutput);
        assert_eq!(host.listener_count(), 1);

        drop(subscription);
        assert_eq!(host.listener_count(), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_emitter_without_off_keeps_listener() {
    let host = Arc::new(FakeHost::new().with_emitter(false));
    let mut subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    subscription.unsubscribe();

    assert!(!subscription.is_active());
    assert_eq!(host.listener_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe_stops_polling() {
    let host = Arc::new(FakeHost::new());
    let mut subscription = bridge_for(&host).subscribe(HostKey::ToolOutput);

    subscription.unsubscribe();
    host.set_silently(HostKey::ToolOutput, json!("ignored"));
    sleep(Duration::from_secs(1)).await;

    assert_eq!(subscription.current(), None);
}

#[tokio::test(start_paused = true)]
async fn test_absent_host_polls_until_attached() {
    let slot = HostSlot::new();
    let mut subscription = HostStoreBridge::new(slot.clone()).subscribe(HostKey::ToolOutput);

    assert_eq!(subscription.capability(), Some(Capability::Poll));
    assert_eq!(subscription.current(), None);

    let host = Arc::new(
        FakeHost::new()
            .with_subscribe()
            .with_value(HostKey::ToolOutput, json!({ "type": "blackjack_snapshot" })),
    );
    slot.attach(host.clone());

    assert_eq!(subscription.changed().await, Some(json!({ "type": "blackjack_snapshot" })));

    assert!(subscription.reprobe());
    assert!(!subscription.reprobe());
    assert_eq!(subscription.capability(), Some(Capability::Subscribe));
    assert_eq!(host.listener_count(), 1);

    host.set(HostKey::ToolOutput, json!({ "type": "blackjack_snapshot", "state": "T:dealer" }));

    assert_eq!(
        subscription.changed().await,
        Some(json!({ "type": "blackjack_snapshot", "state": "T:dealer" }))
    );
}

#[tokio::test(start_paused = true)]
async fn test_detached_host_reads_none() {
    let host = Arc::new(FakeHost::new().with_value(HostKey::ToolOutput, json!("x")));
    let slot = HostSlot::with_host(host);
    let mut subscription = HostStoreBridge::new(slot.clone()).subscribe(HostKey::ToolOutput);

    assert_eq!(subscription.current(), Some(json!("x")));

    slot.detach();

    assert_eq!(subscription.changed().await, None);
}
