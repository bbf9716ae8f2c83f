use shell::{GameView, StatusItem};
use snapshot::Snapshot;

use crate::{GameState, SeaBattleDecoder};

#[derive(Clone, Copy, Debug, Default)]
pub struct SeaBattleView {
    decoder: SeaBattleDecoder,
}

impl GameView for SeaBattleView {
    type Decoder = SeaBattleDecoder;

    fn decoder(&self) -> &SeaBattleDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Sea Battle MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type a coordinate like A1 or J10. The boards update only from tool output.")
    }

    fn instructions(&self) -> Vec<String> {
        vec![
            "Coordinates: A1-J10. Hits and misses are tracked for both sides.".to_string(),
            "The opponent move is selected from a legal list by the model.".to_string(),
        ]
    }

    fn status_items(&self, _snapshot: Option<&Snapshot>, decoded: &GameState) -> Option<Vec<StatusItem>> {
        Some(vec![
            StatusItem::new("Status", decoded.status.as_str()),
            StatusItem::new("Turn", decoded.turn.as_str()),
            StatusItem::new("Last", decoded.last_action.as_str()),
            StatusItem::or_missing("Winner", Some(decoded.winner.as_str())),
        ])
    }

    fn render_board(&self, _snapshot: Option<&Snapshot>, decoded: &GameState) -> String {
        decoded.to_string()
    }
}
