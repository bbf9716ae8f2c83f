use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::anyhow;
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::{HostSlot, ModeArgument};

const STATUS_IN_PROGRESS: &str = "in_progress";

/// Presentation the widget asks the host for. Requests are fire and forget;
/// the host's actual mode is never read back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Inline,
    Pip,
}

impl DisplayMode {
    /// A game in progress floats; every other status, including none, is inline.
    pub fn for_status(status: Option<&str>) -> Self {
        if status == Some(STATUS_IN_PROGRESS) {
            DisplayMode::Pip
        } else {
            DisplayMode::Inline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Inline => "inline",
            DisplayMode::Pip => "pip",
        }
    }
}

impl Display for DisplayMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeMethod {
    RequestDisplayMode,
    SetDisplayMode,
    DisplayMode,
}

impl ModeMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ModeMethod::RequestDisplayMode => "requestDisplayMode",
            ModeMethod::SetDisplayMode => "setDisplayMode",
            ModeMethod::DisplayMode => "displayMode",
        }
    }
}

impl Display for ModeMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One candidate way of asking the host for a mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeStrategy {
    pub method: ModeMethod,
    pub argument: ModeArgument,
}

/// Tried in order; the first call that resolves successfully ends the chain.
pub const MODE_STRATEGIES: [ModeStrategy; 5] = [
    ModeStrategy {
        method: ModeMethod::RequestDisplayMode,
        argument: ModeArgument::Bare,
    },
    ModeStrategy {
        method: ModeMethod::RequestDisplayMode,
        argument: ModeArgument::Object,
    },
    ModeStrategy {
        method: ModeMethod::SetDisplayMode,
        argument: ModeArgument::Bare,
    },
    ModeStrategy {
        method: ModeMethod::SetDisplayMode,
        argument: ModeArgument::Object,
    },
    ModeStrategy {
        method: ModeMethod::DisplayMode,
        argument: ModeArgument::Bare,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The host accepted the request through this strategy.
    Applied(ModeStrategy),
    /// Every setter the host exposes failed.
    Rejected,
    /// No host, or no setter at all.
    Unsupported,
}

/// Walks [`MODE_STRATEGIES`] against whatever host is currently attached.
pub async fn request_display_mode(slot: &HostSlot, mode: DisplayMode) -> RequestOutcome {
    let Some(host) = slot.current() else {
        return RequestOutcome::Unsupported;
    };

    let mut attempted = false;
    for strategy in MODE_STRATEGIES {
        let call = match host.display_mode_api() {
            Some(api) => api.call(strategy.method, strategy.argument.encode(mode)),
            None => return RequestOutcome::Unsupported,
        };

        let Some(call) = call else {
            continue;
        };

        attempted = true;
        match call.await {
            Ok(()) => return RequestOutcome::Applied(strategy),
            Err(err) => debug!("{} ({:?}) failed for {}: {:#}", strategy.method, strategy.argument, mode, err),
        }
    }

    if attempted {
        RequestOutcome::Rejected
    } else {
        RequestOutcome::Unsupported
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPolicy {
    /// Float while the game is in progress, inline otherwise.
    #[default]
    AutoOnInProgress,
    /// Never request a mode.
    Manual,
}

impl FromStr for DisplayPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto_on_in_progress" => Ok(DisplayPolicy::AutoOnInProgress),
            "manual" => Ok(DisplayPolicy::Manual),
            other => Err(anyhow!("Unknown display policy '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Observation {
    status: Option<String>,
    game_key: String,
}

#[derive(Debug, Default)]
struct ModeMemory {
    game_key: Option<String>,
    last_requested: Option<DisplayMode>,
    last_observed: Option<Observation>,
    generation: u64,
}

/// An issued request. Dropping it does not cancel the host call.
#[derive(Debug)]
pub struct ModeRequest {
    mode: DisplayMode,
    task: JoinHandle<RequestOutcome>,
}

impl ModeRequest {
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub async fn completion(self) -> Option<RequestOutcome> {
        self.task.await.ok()
    }
}

/// Decides when to ask the host for inline vs. picture-in-picture.
///
/// Memory is per game key: a new key forgets the last requested mode so the
/// first observation of a new game always issues a request. Any observation
/// that differs from the previous one supersedes requests still in flight;
/// those complete without touching the memory.
pub struct DisplayModeController {
    slot: HostSlot,
    policy: DisplayPolicy,
    session_game: bool,
    memory: Arc<Mutex<ModeMemory>>,
}

impl DisplayModeController {
    pub fn new(slot: HostSlot) -> Self {
        Self {
            slot,
            policy: DisplayPolicy::default(),
            session_game: true,
            memory: Arc::new(Mutex::new(ModeMemory::default())),
        }
    }

    pub fn with_policy(mut self, policy: DisplayPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_session_game(mut self, session_game: bool) -> Self {
        self.session_game = session_game;
        self
    }

    pub fn policy(&self) -> DisplayPolicy {
        self.policy
    }

    /// The last mode whose request completed without being superseded.
    pub fn last_requested(&self) -> Option<DisplayMode> {
        self.memory.lock().last_requested
    }

    pub fn observe(&self, status: Option<&str>, game_key: &str) -> Option<ModeRequest> {
        let mut memory = self.memory.lock();

        let observation = Observation {
            status: status.map(str::to_string),
            game_key: game_key.to_string(),
        };
        if memory.last_observed.as_ref() == Some(&observation) {
            return None;
        }
        memory.last_observed = Some(observation);
        memory.generation += 1;

        if !self.session_game || self.policy != DisplayPolicy::AutoOnInProgress {
            return None;
        }

        if memory.game_key.as_deref() != Some(game_key) {
            memory.game_key = Some(game_key.to_string());
            memory.last_requested = None;
        }

        let target = DisplayMode::for_status(status);
        if memory.last_requested == Some(target) {
            return None;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available; skipping display mode request");
            memory.last_observed = None;
            return None;
        };

        let generation = memory.generation;
        drop(memory);

        debug!("Requesting {} display mode for {}", target, game_key);
        let slot = self.slot.clone();
        let shared = Arc::clone(&self.memory);
        let task = runtime.spawn(async move {
            let outcome = request_display_mode(&slot, target).await;

            let mut memory = shared.lock();
            if memory.generation == generation {
                memory.last_requested = Some(target);
            } else {
                debug!("Display mode request for {} was superseded", target);
            }

            outcome
        });

        Some(ModeRequest { mode: target, task })
    }

    /// Marks every in-flight request as superseded.
    pub fn cancel(&self) {
        self.memory.lock().generation += 1;
    }
}

impl Drop for DisplayModeController {
    fn drop(&mut self) {
        self.cancel();
    }
}

