use log::debug;
use serde_json::{Map, Value};

use crate::{HostKey, HostSlot, HostStoreBridge, StoreSubscription};

/// Widget-scoped state persisted by the host, layered over local defaults.
pub struct WidgetStateStore {
    slot: HostSlot,
    subscription: StoreSubscription,
    defaults: Map<String, Value>,
}

impl WidgetStateStore {
    pub fn new(bridge: &HostStoreBridge, defaults: Map<String, Value>) -> Self {
        Self {
            slot: bridge.slot().clone(),
            subscription: bridge.subscribe(HostKey::WidgetState),
            defaults,
        }
    }

    /// Defaults overlaid with the host's keys. A non-object host value is ignored.
    pub fn merged(&self) -> Map<String, Value> {
        merge(&self.defaults, self.subscription.current().as_ref())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.merged().remove(key)
    }

    /// Hands `next` to the host. Returns `false` when there is no host or the
    /// host cannot persist widget state.
    pub fn set(&self, next: Value) -> bool {
        let Some(host) = self.slot.current() else {
            debug!("No host attached; widget state not persisted");
            return false;
        };

        let Some(sink) = host.widget_state_sink() else {
            debug!("Host cannot persist widget state");
            return false;
        };

        sink.set_widget_state(next);
        true
    }

    /// Computes the next state from the current merged state.
    pub fn update(&self, updater: impl FnOnce(&Map<String, Value>) -> Value) -> bool {
        let next = updater(&self.merged());
        self.set(next)
    }

    /// Waits for the host value to change and returns the new merged state.
    pub async fn changed(&mut self) -> Map<String, Value> {
        let next = self.subscription.changed().await;
        merge(&self.defaults, next.as_ref())
    }

    pub fn subscription_mut(&mut self) -> &mut StoreSubscription {
        &mut self.subscription
    }
}

fn merge(defaults: &Map<String, Value>, host: Option<&Value>) -> Map<String, Value> {
    let mut merged = defaults.clone();
    if let Some(Value::Object(values)) = host {
        for (key, value) in values {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
