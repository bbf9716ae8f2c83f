use serde_json::Value;
use shell::{GameView, StatusItem};
use snapshot::Snapshot;

use crate::{ChessDecoder, GameState};

#[derive(Clone, Copy, Debug, Default)]
pub struct ChessView {
    decoder: ChessDecoder,
}

pub fn status_label(snapshot: Option<&Snapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return "No game".to_string();
    };

    match snapshot.status() {
        Some("in_progress") => "In progress".to_string(),
        Some("check") => "Check".to_string(),
        Some("checkmate") => "Checkmate".to_string(),
        Some("stalemate") => "Stalemate".to_string(),
        Some(other) => other.to_string(),
        None => "Unknown".to_string(),
    }
}

/// SAN when the engine supplied it, UCI otherwise.
pub fn last_move(snapshot: Option<&Snapshot>) -> Option<&str> {
    let last = snapshot?.last_move()?;
    ["san", "uci"]
        .iter()
        .filter_map(|key| last.get(*key).and_then(Value::as_str))
        .find(|notation| !notation.is_empty())
}

impl GameView for ChessView {
    type Decoder = ChessDecoder;

    fn decoder(&self) -> &ChessDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Chess MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type your move in chat. The board updates only from verified tool results.")
    }

    fn instructions(&self) -> Vec<String> {
        vec![
            "Type your move in chat (UCI like e2e4 or SAN like Nf3).".to_string(),
            "For promotions, include the piece letter (e.g., e7e8q).".to_string(),
            "Need the opponent to retry? Ask in chat and the model will rerun the opponent turn loop.".to_string(),
        ]
    }

    fn status_items(&self, snapshot: Option<&Snapshot>, _decoded: &GameState) -> Option<Vec<StatusItem>> {
        let check = snapshot
            .and_then(|s| s.field("check"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Some(vec![
            StatusItem::new("Status", status_label(snapshot)),
            StatusItem::or_missing("Turn", snapshot.and_then(Snapshot::turn)),
            StatusItem::or_missing("Last move", last_move(snapshot)),
            StatusItem::new("Check", if check { "Yes" } else { "No" }),
        ])
    }

    fn render_board(&self, _snapshot: Option<&Snapshot>, decoded: &GameState) -> String {
        decoded.to_string()
    }
}
