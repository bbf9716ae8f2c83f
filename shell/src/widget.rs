use host::{DisplayModeController, HostKey, HostSlot, HostStoreBridge, ModeRequest, StoreSubscription};
use log::debug;
use serde_json::Value;
use snapshot::{normalize, Classification, SnapshotDecoder};

use crate::{
    announcement, default_status_items, GameView, ShellBody, ShellView, WidgetOptions, DEFAULT_WAITING_MESSAGE,
};

/// One render pass: the view plus the display-mode request it triggered, if any.
#[derive(Debug)]
pub struct Frame {
    pub view: ShellView,
    pub mode_request: Option<ModeRequest>,
}

/// A view composed from a payload, before any host side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composition {
    pub view: ShellView,
    pub status: Option<String>,
    pub game_key: String,
}

/// Mounted widget: bridge subscription on `toolOutput`, decoder, shell and
/// display-mode controller wired together.
pub struct Widget<V: GameView> {
    view: V,
    options: WidgetOptions,
    tool_output: StoreSubscription,
    controller: DisplayModeController,
}

impl<V: GameView> Widget<V> {
    pub fn mount(view: V, slot: HostSlot, options: WidgetOptions) -> Self {
        let bridge = HostStoreBridge::new(slot.clone()).with_poll_interval(options.poll_interval);
        let tool_output = bridge.subscribe(HostKey::ToolOutput);

        let controller = DisplayModeController::new(slot)
            .with_policy(options.display_policy)
            .with_session_game(options.session_game && view.session_game());

        debug!("Mounted {} widget", view.title());

        Self {
            view,
            options,
            tool_output,
            controller,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn controller(&self) -> &DisplayModeController {
        &self.controller
    }

    pub fn tool_output(&self) -> &StoreSubscription {
        &self.tool_output
    }

    /// Renders the current host value and lets the controller react to it.
    pub fn render(&self) -> Frame {
        let raw = self.tool_output.current();
        let composition = self.compose(raw.as_ref());
        let mode_request = self
            .controller
            .observe(composition.status.as_deref(), &composition.game_key);

        Frame {
            view: composition.view,
            mode_request,
        }
    }

    /// Waits for `toolOutput` to change, re-runs the capability probe and renders.
    pub async fn next_frame(&mut self) -> Frame {
        self.tool_output.changed().await;
        self.tool_output.reprobe();
        self.render()
    }

    /// Re-runs the capability probe, e.g. after the host attached.
    pub fn reactivate(&mut self) -> bool {
        let changed = self.tool_output.reprobe();
        self.tool_output.refresh();
        changed
    }

    pub fn unmount(mut self) {
        self.tool_output.unsubscribe();
        self.controller.cancel();
    }

    /// Pure composition of the shell for a raw host value.
    pub fn compose(&self, raw: Option<&Value>) -> Composition {
        let decoder = self.view.decoder();
        let classification = decoder.shape().classify(normalize(raw));
        let snapshot = classification.snapshot();
        let decoded = decoder.decode_snapshot(snapshot);

        let status = snapshot.and_then(|s| self.view.status(s));
        let turn = snapshot.and_then(|s| self.view.turn(s));
        let error = snapshot.and_then(|s| s.rejection());

        let body = match &classification {
            Classification::Waiting => ShellBody::Waiting(self.waiting_message()),
            Classification::Empty | Classification::Snapshot(_) => {
                ShellBody::Board(self.view.render_board(snapshot, &decoded))
            }
        };

        let status_items = self
            .view
            .status_items(snapshot, &decoded)
            .unwrap_or_else(|| default_status_items(status, turn));

        let view = ShellView {
            title: self.view.title().to_string(),
            subtitle: self.view.subtitle().map(str::to_string),
            announcement: announcement(status, turn, error),
            status_items,
            error: error.map(str::to_string),
            body,
            instructions: self.view.instructions(),
        };

        Composition {
            view,
            status: status.map(str::to_string),
            game_key: self.view.game_key(snapshot),
        }
    }

    fn waiting_message(&self) -> String {
        self.options
            .waiting_message
            .as_deref()
            .or_else(|| self.view.waiting_message())
            .unwrap_or(DEFAULT_WAITING_MESSAGE)
            .to_string()
    }
}
