use shell::{GameView, StatusItem};
use snapshot::Snapshot;

use crate::{FourInARowDecoder, GameState};

#[derive(Clone, Copy, Debug, Default)]
pub struct FourInARowView {
    decoder: FourInARowDecoder,
}

impl GameView for FourInARowView {
    type Decoder = FourInARowDecoder;

    fn decoder(&self) -> &FourInARowDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Four-in-a-Row MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Choose a column (1-7) in chat. The board updates only from tool output.")
    }

    fn instructions(&self) -> Vec<String> {
        vec![
            "Columns are labeled 1-7 above the board.".to_string(),
            "Red = player, Yellow = opponent. Drop tokens by column number.".to_string(),
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
