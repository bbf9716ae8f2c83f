use shell::{GameView, StatusItem};
use snapshot::Snapshot;

use crate::{GameState, TicTacToeDecoder};

#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToeView {
    decoder: TicTacToeDecoder,
}

impl GameView for TicTacToeView {
    type Decoder = TicTacToeDecoder;

    fn decoder(&self) -> &TicTacToeDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Tic-Tac-Toe MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type a coordinate like A1, B2, or C3. The board updates only from tool output.")
    }

    fn instructions(&self) -> Vec<String> {
        vec!["Coordinates are A1-C3 with column letters and row numbers.".to_string()]
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
        format!(
            "{}Player symbol: {} | Opponent symbol: {}\n",
            decoded, decoded.player_symbol, decoded.opponent_symbol
        )
    }
}
