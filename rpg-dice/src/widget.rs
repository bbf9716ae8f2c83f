use shell::{GameView, StatusItem};
use snapshot::{Snapshot, SENTINEL};

use crate::{DiceDecoder, DiceRoll};

#[derive(Clone, Copy, Debug, Default)]
pub struct DiceView {
    decoder: DiceDecoder,
}

fn positive(value: u64) -> String {
    if value == 0 {
        SENTINEL.to_string()
    } else {
        value.to_string()
    }
}

/// Single rolls rather than a session, so the widget never asks for a display mode.
impl GameView for DiceView {
    type Decoder = DiceDecoder;

    fn decoder(&self) -> &DiceDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "RPG Dice MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type a roll in chat (e.g., roll 2d6). The widget updates only from tool output.")
    }

    fn waiting_message(&self) -> Option<&str> {
        Some("Waiting for the next roll...")
    }

    fn instructions(&self) -> Vec<String> {
        vec![
            "Supported dice: d4, d6, d8, d10, d12, d20, d100.".to_string(),
            "One tool call can roll multiple dice of a type.".to_string(),
        ]
    }

    fn session_game(&self) -> bool {
        false
    }

    fn status_items(&self, _snapshot: Option<&Snapshot>, decoded: &DiceRoll) -> Option<Vec<StatusItem>> {
        let total = decoded.total.map_or_else(|| SENTINEL.to_string(), |total| total.to_string());

        Some(vec![
            StatusItem::new("Sides", positive(decoded.sides)),
            StatusItem::new("Count", positive(decoded.count)),
            StatusItem::new("Total", total),
        ])
    }

    fn render_board(&self, _snapshot: Option<&Snapshot>, decoded: &DiceRoll) -> String {
        decoded.to_string()
    }
}
