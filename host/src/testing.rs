//! A scriptable in-memory host for exercising bridges, controllers and widgets.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    DisplayModeApi, Emitter, EventTarget, HostGlobal, HostKey, Listener, ModeMethod, SubscribeApi, Unsubscribe,
    WidgetStateSink,
};

/// How the fake host answers one display-mode setter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodBehavior {
    Accept,
    Reject,
    /// Accepts `{"mode": ..}` and rejects the bare string.
    AcceptObjectOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModeCall {
    pub method: ModeMethod,
    pub argument: Value,
}

type Registry = Arc<Mutex<Vec<(u64, Listener)>>>;

#[derive(Default)]
pub struct FakeHost {
    values: Mutex<HashMap<HostKey, Value>>,
    listeners: Registry,
    next_id: AtomicU64,
    subscribe: bool,
    event_target: bool,
    emitter: Option<bool>,
    widget_state_sink: bool,
    mode_methods: HashMap<ModeMethod, MethodBehavior>,
    mode_latency: Duration,
    mode_calls: Mutex<Vec<ModeCall>>,
    widget_states: Mutex<Vec<Value>>,
    on_register: Mutex<Option<(HostKey, Value)>>,
}

impl FakeHost {
    /// A host that only exposes readable values, so bridges fall back to polling.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscribe(mut self) -> Self {
        self.subscribe = true;
        self
    }

    pub fn with_event_target(mut self) -> Self {
        self.event_target = true;
        self
    }

    /// `removable` controls whether the emitter offers `off`.
    pub fn with_emitter(mut self, removable: bool) -> Self {
        self.emitter = Some(removable);
        self
    }

    pub fn with_widget_state_sink(mut self) -> Self {
        self.widget_state_sink = true;
        self
    }

    pub fn with_mode_method(mut self, method: ModeMethod, behavior: MethodBehavior) -> Self {
        self.mode_methods.insert(method, behavior);
        self
    }

    /// Every display-mode call takes this long to settle.
    pub fn with_mode_latency(mut self, latency: Duration) -> Self {
        self.mode_latency = latency;
        self
    }

    pub fn with_value(self, key: HostKey, value: Value) -> Self {
        self.values.lock().insert(key, value);
        self
    }

    /// Silently stores `value` while the next listener registers, before it
    /// could hear about the change.
    pub fn with_value_on_register(self, key: HostKey, value: Value) -> Self {
        *self.on_register.lock() = Some((key, value));
        self
    }

    /// Stores `value` and notifies every registered listener.
    pub fn set(&self, key: HostKey, value: Value) {
        self.set_silently(key, value);
        self.notify();
    }

    /// Stores `value` without notifying; only polling observes it.
    pub fn set_silently(&self, key: HostKey, value: Value) {
        self.values.lock().insert(key, value);
    }

    pub fn remove(&self, key: HostKey) {
        self.values.lock().remove(&key);
        self.notify();
    }

    pub fn notify(&self) {
        let listeners = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect::<Vec<_>>();

        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn mode_calls(&self) -> Vec<ModeCall> {
        self.mode_calls.lock().clone()
    }

    pub fn widget_states(&self) -> Vec<Value> {
        self.widget_states.lock().clone()
    }

    fn register(&self, listener: Listener) -> u64 {
        if let Some((key, value)) = self.on_register.lock().take() {
            self.set_silently(key, value);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().push((id, listener));
        id
    }

    fn unregister(&self, listener: &Listener) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(_, registered)| !same_listener(registered, listener));
        listeners.len() != before
    }
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl HostGlobal for FakeHost {
    fn read(&self, key: HostKey) -> Option<Value> {
        self.values.lock().get(&key).cloned()
    }

    fn subscribe_api(&self) -> Option<&dyn SubscribeApi> {
        self.subscribe.then_some(self as &dyn SubscribeApi)
    }

    fn event_target(&self) -> Option<&dyn EventTarget> {
        self.event_target.then_some(self as &dyn EventTarget)
    }

    fn emitter(&self) -> Option<&dyn Emitter> {
        self.emitter.map(|_| self as &dyn Emitter)
    }

    fn widget_state_sink(&self) -> Option<&dyn WidgetStateSink> {
        self.widget_state_sink.then_some(self as &dyn WidgetStateSink)
    }

    fn display_mode_api(&self) -> Option<&dyn DisplayModeApi> {
        (!self.mode_methods.is_empty()).then_some(self as &dyn DisplayModeApi)
    }
}

impl SubscribeApi for FakeHost {
    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let id = self.register(listener);
        let listeners = Arc::clone(&self.listeners);

        Box::new(move || listeners.lock().retain(|(registered, _)| *registered != id))
    }
}

impl EventTarget for FakeHost {
    fn add_event_listener(&self, _event: &str, listener: Listener) {
        self.register(listener);
    }

    fn remove_event_listener(&self, _event: &str, listener: &Listener) {
        self.unregister(listener);
    }
}

impl Emitter for FakeHost {
    fn on(&self, _event: &str, listener: Listener) {
        self.register(listener);
    }

    fn off(&self, _event: &str, listener: &Listener) -> bool {
        match self.emitter {
            Some(true) => {
                self.unregister(listener);
                true
            }
            _ => false,
        }
    }
}

impl WidgetStateSink for FakeHost {
    fn set_widget_state(&self, state: Value) {
        self.widget_states.lock().push(state.clone());
        self.set(HostKey::WidgetState, state);
    }
}

impl DisplayModeApi for FakeHost {
    fn call(&self, method: ModeMethod, argument: Value) -> Option<BoxFuture<'static, anyhow::Result<()>>> {
        let behavior = *self.mode_methods.get(&method)?;

        self.mode_calls.lock().push(ModeCall {
            method,
            argument: argument.clone(),
        });

        let verdict = match behavior {
            MethodBehavior::Accept => Ok(()),
            MethodBehavior::AcceptObjectOnly if argument.is_object() => Ok(()),
            MethodBehavior::AcceptObjectOnly | MethodBehavior::Reject => {
                Err(anyhow!("{} rejected {}", method, argument))
            }
        };

        let latency = self.mode_latency;
        Some(Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            verdict
        }))
    }
}
