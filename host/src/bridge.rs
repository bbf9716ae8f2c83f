use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::{HostGlobal, HostKey, HostSlot, Listener, STATE_CHANGE_EVENT};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How a bridge learns that host values changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Subscribe,
    EventTarget,
    Emitter,
    Poll,
}

/// Live registration with the host. Dropping it unregisters the listener or
/// stops the poll timer.
pub struct Subscription {
    capability: Capability,
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new(capability: Capability, teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            capability,
            teardown: Some(Box::new(teardown)),
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn release(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            debug!("Releasing {:?} subscription", self.capability);
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("capability", &self.capability)
            .field("active", &self.teardown.is_some())
            .finish()
    }
}

/// One entry of the capability negotiation: detects whether the host supports
/// a notification style and attaches a listener through it.
trait CapabilityAdapter: Send + Sync {
    fn capability(&self) -> Capability;

    fn detect(&self, host: Option<&dyn HostGlobal>) -> bool;

    fn attach(
        &self,
        host: Option<Arc<dyn HostGlobal>>,
        listener: Listener,
        poll_interval: Duration,
    ) -> Subscription;
}

struct SubscribeAdapter;

impl CapabilityAdapter for SubscribeAdapter {
    fn capability(&self) -> Capability {
        Capability::Subscribe
    }

    fn detect(&self, host: Option<&dyn HostGlobal>) -> bool {
        host.is_some_and(|host| host.subscribe_api().is_some())
    }

    fn attach(&self, host: Option<Arc<dyn HostGlobal>>, listener: Listener, _: Duration) -> Subscription {
        let unsubscribe = host
            .as_deref()
            .and_then(|host| host.subscribe_api())
            .map(|api| api.subscribe(listener));

        Subscription::new(Capability::Subscribe, move || {
            if let Some(unsubscribe) = unsubscribe {
                unsubscribe();
            }
        })
    }
}

struct EventTargetAdapter;

impl CapabilityAdapter for EventTargetAdapter {
    fn capability(&self) -> Capability {
        Capability::EventTarget
    }

    fn detect(&self, host: Option<&dyn HostGlobal>) -> bool {
        host.is_some_and(|host| host.event_target().is_some())
    }

    fn attach(&self, host: Option<Arc<dyn HostGlobal>>, listener: Listener, _: Duration) -> Subscription {
        if let Some(target) = host.as_deref().and_then(|host| host.event_target()) {
            target.add_event_listener(STATE_CHANGE_EVENT, Arc::clone(&listener));
        }

        Subscription::new(Capability::EventTarget, move || {
            if let Some(target) = host.as_deref().and_then(|host| host.event_target()) {
                target.remove_event_listener(STATE_CHANGE_EVENT, &listener);
            }
        })
    }
}

struct EmitterAdapter;

impl CapabilityAdapter for EmitterAdapter {
    fn capability(&self) -> Capability {
        Capability::Emitter
    }

    fn detect(&self, host: Option<&dyn HostGlobal>) -> bool {
        host.is_some_and(|host| host.emitter().is_some())
    }

    fn attach(&self, host: Option<Arc<dyn HostGlobal>>, listener: Listener, _: Duration) -> Subscription {
        if let Some(emitter) = host.as_deref().and_then(|host| host.emitter()) {
            emitter.on(STATE_CHANGE_EVENT, Arc::clone(&listener));
        }

        Subscription::new(Capability::Emitter, move || {
            if let Some(emitter) = host.as_deref().and_then(|host| host.emitter()) {
                if !emitter.off(STATE_CHANGE_EVENT, &listener) {
                    debug!("Host emitter has no off(); listener stays registered");
                }
            }
        })
    }
}

struct PollAdapter;

impl CapabilityAdapter for PollAdapter {
    fn capability(&self) -> Capability {
        Capability::Poll
    }

    fn detect(&self, _: Option<&dyn HostGlobal>) -> bool {
        true
    }

    fn attach(&self, _: Option<Arc<dyn HostGlobal>>, listener: Listener, poll_interval: Duration) -> Subscription {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available; host values will not be polled");
            return Subscription::new(Capability::Poll, || {});
        };

        let period = poll_interval.max(Duration::from_millis(1));
        let task = runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;
                listener();
            }
        });

        Subscription::new(Capability::Poll, move || task.abort())
    }
}

/// Turns the host-owned global object into reactive per-key values.
///
/// The capability probe runs in a fixed order, first match wins: a
/// `subscribe` API, an `addEventListener` pair, an `on`/`off` pair, and finally
/// unconditional polling, which also covers a host that is not attached yet.
#[derive(Clone)]
pub struct HostStoreBridge {
    slot: HostSlot,
    poll_interval: Duration,
    adapters: Arc<Vec<Box<dyn CapabilityAdapter>>>,
}

impl HostStoreBridge {
    pub fn new(slot: HostSlot) -> Self {
        let adapters: Vec<Box<dyn CapabilityAdapter>> = vec![
            Box::new(SubscribeAdapter),
            Box::new(EventTargetAdapter),
            Box::new(EmitterAdapter),
            Box::new(PollAdapter),
        ];

        Self {
            slot,
            poll_interval: DEFAULT_POLL_INTERVAL,
            adapters: Arc::new(adapters),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn slot(&self) -> &HostSlot {
        &self.slot
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// The capability a subscription opened right now would use.
    pub fn probe(&self) -> Capability {
        let host = self.slot.current();
        self.select(host.as_deref()).capability()
    }

    pub fn subscribe(&self, key: HostKey) -> StoreSubscription {
        StoreSubscription::open(self.clone(), key)
    }

    fn select(&self, host: Option<&dyn HostGlobal>) -> &dyn CapabilityAdapter {
        self.adapters
            .iter()
            .map(|adapter| &**adapter)
            .find(|adapter| adapter.detect(host))
            .unwrap_or(&PollAdapter)
    }
}

impl Debug for HostStoreBridge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostStoreBridge")
            .field("slot", &self.slot)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// The latest value of one host key plus the registration keeping it fresh.
///
/// Every notification or poll tick re-reads `host[key]`; receivers only wake
/// when the value changed structurally.
pub struct StoreSubscription {
    key: HostKey,
    bridge: HostStoreBridge,
    sender: Arc<watch::Sender<Option<Value>>>,
    receiver: watch::Receiver<Option<Value>>,
    link: Option<Subscription>,
}

impl StoreSubscription {
    fn open(bridge: HostStoreBridge, key: HostKey) -> Self {
        let (sender, receiver) = watch::channel(bridge.slot.read(key));

        let mut subscription = Self {
            key,
            bridge,
            sender: Arc::new(sender),
            receiver,
            link: None,
        };
        subscription.link = Some(subscription.attach());
        subscription.refresh();
        subscription
    }

    pub fn key(&self) -> HostKey {
        self.key
    }

    pub fn capability(&self) -> Option<Capability> {
        self.link.as_ref().map(Subscription::capability)
    }

    pub fn is_active(&self) -> bool {
        self.link.is_some()
    }

    /// Current value; `None` when the host or the key is absent.
    pub fn current(&self) -> Option<Value> {
        self.receiver.borrow().clone()
    }

    /// A receiver that observes every change of this key.
    pub fn watch(&self) -> watch::Receiver<Option<Value>> {
        self.receiver.clone()
    }

    /// Waits for the next change and returns the new value.
    pub async fn changed(&mut self) -> Option<Value> {
        if self.receiver.changed().await.is_err() {
            return self.current();
        }

        self.receiver.borrow_and_update().clone()
    }

    /// Re-reads the host value immediately.
    pub fn refresh(&self) -> bool {
        publish(&self.bridge.slot, self.key, &self.sender)
    }

    /// Runs the capability probe again and re-attaches when the answer differs,
    /// e.g. once a host attaches while the bridge was polling.
    pub fn reprobe(&mut self) -> bool {
        let next = self.bridge.probe();
        if self.capability() == Some(next) {
            return false;
        }

        info!("Host capability for {} changed to {:?}", self.key, next);
        if let Some(link) = self.link.take() {
            link.release();
        }
        self.link = Some(self.attach());
        self.refresh();

        true
    }

    /// Releases the host registration; the last value stays readable.
    pub fn unsubscribe(&mut self) {
        if let Some(link) = self.link.take() {
            link.release();
        }
    }

    fn attach(&self) -> Subscription {
        let host = self.bridge.slot.current();
        let adapter = self.bridge.select(host.as_deref());
        debug!("Bridging {} through {:?}", self.key, adapter.capability());

        adapter.attach(host, self.listener(), self.bridge.poll_interval)
    }

    fn listener(&self) -> Listener {
        let slot = self.bridge.slot.clone();
        let key = self.key;
        let sender = Arc::clone(&self.sender);

        Arc::new(move || {
            publish(&slot, key, &sender);
        })
    }
}

impl Debug for StoreSubscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSubscription")
            .field("key", &self.key)
            .field("link", &self.link)
            .finish()
    }
}

fn publish(slot: &HostSlot, key: HostKey, sender: &watch::Sender<Option<Value>>) -> bool {
    let next = slot.read(key);

    sender.send_if_modified(move |current| {
        if *current == next {
            return false;
        }

        *current = next;
        true
    })
}

