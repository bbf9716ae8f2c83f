use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;

use crate::{DisplayMode, ModeMethod};

/// Event name hosts fire when any global value changes.
pub const STATE_CHANGE_EVENT: &str = "statechange";

/// Notification callback handed to the host. Identity (`Arc::ptr_eq`) is what
/// removal APIs match on.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Returned by a host `subscribe` registration; calling it unregisters.
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostKey {
    ToolOutput,
    WidgetState,
}

impl HostKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostKey::ToolOutput => "toolOutput",
            HostKey::WidgetState => "widgetState",
        }
    }
}

impl Display for HostKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The externally owned global object a widget is embedded in.
///
/// Only [`HostGlobal::read`] is mandatory. Every other capability is optional
/// and detected by returning `Some` adapter.
pub trait HostGlobal: Send + Sync {
    fn read(&self, key: HostKey) -> Option<Value>;

    fn subscribe_api(&self) -> Option<&dyn SubscribeApi> {
        None
    }

    fn event_target(&self) -> Option<&dyn EventTarget> {
        None
    }

    fn emitter(&self) -> Option<&dyn Emitter> {
        None
    }

    fn widget_state_sink(&self) -> Option<&dyn WidgetStateSink> {
        None
    }

    fn display_mode_api(&self) -> Option<&dyn DisplayModeApi> {
        None
    }
}

/// `host.subscribe(cb) -> unsubscribe`.
pub trait SubscribeApi: Send + Sync {
    fn subscribe(&self, listener: Listener) -> Unsubscribe;
}

/// `host.addEventListener(event, cb)` / `host.removeEventListener(event, cb)`.
pub trait EventTarget: Send + Sync {
    fn add_event_listener(&self, event: &str, listener: Listener);

    fn remove_event_listener(&self, event: &str, listener: &Listener);
}

/// `host.on(event, cb)` / `host.off(event, cb)`.
pub trait Emitter: Send + Sync {
    fn on(&self, event: &str, listener: Listener);

    /// Returns `false` when the host has no way to unregister.
    fn off(&self, _event: &str, _listener: &Listener) -> bool {
        false
    }
}

/// `host.setWidgetState(next)`, fire and forget.
pub trait WidgetStateSink: Send + Sync {
    fn set_widget_state(&self, state: Value);
}

/// Display-mode setters. Each call returns `None` when the host does not expose
/// `method`, otherwise a future resolving to the host's verdict.
pub trait DisplayModeApi: Send + Sync {
    fn call(&self, method: ModeMethod, argument: Value) -> Option<BoxFuture<'static, anyhow::Result<()>>>;
}

/// Injectable handle to the possibly absent host object.
///
/// Cloning shares the slot, so a host attached mid-session becomes visible to
/// every bridge and controller holding a clone.
#[derive(Clone, Default)]
pub struct HostSlot {
    inner: Arc<RwLock<Option<Arc<dyn HostGlobal>>>>,
}

impl HostSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(host: Arc<dyn HostGlobal>) -> Self {
        let slot = Self::new();
        slot.attach(host);
        slot
    }

    pub fn attach(&self, host: Arc<dyn HostGlobal>) {
        *self.inner.write() = Some(host);
    }

    pub fn detach(&self) -> Option<Arc<dyn HostGlobal>> {
        self.inner.write().take()
    }

    pub fn current(&self) -> Option<Arc<dyn HostGlobal>> {
        self.inner.read().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Reads `host[key]`; an absent host reads as `None`.
    pub fn read(&self, key: HostKey) -> Option<Value> {
        self.current().and_then(|host| host.read(key))
    }
}

impl Debug for HostSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Argument shape for a display-mode setter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArgument {
    /// `"pip"`
    Bare,
    /// `{"mode": "pip"}`
    Object,
}

impl ModeArgument {
    pub fn encode(&self, mode: DisplayMode) -> Value {
        match self {
            ModeArgument::Bare => Value::String(mode.as_str().to_string()),
            ModeArgument::Object => serde_json::json!({ "mode": mode }),
        }
    }
}
