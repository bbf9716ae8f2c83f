use serde_json::Value;
use shell::{GameView, StatusItem};
use snapshot::Snapshot;

use crate::{CheckersDecoder, GameState, BLACK, WHITE};

#[derive(Clone, Copy, Debug, Default)]
pub struct CheckersView {
    decoder: CheckersDecoder,
}

/// Shared by the turn and winner labels.
pub fn side_label(side: Option<&str>) -> &'static str {
    match side {
        Some(WHITE) => "White",
        Some(BLACK) => "Black",
        _ => "-",
    }
}

pub fn status_label(snapshot: Option<&Snapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return "No game".to_string();
    };

    match snapshot.status() {
        Some("in_progress") => "In progress".to_string(),
        Some("game_over") => "Game over".to_string(),
        Some(other) => other.to_string(),
        None => "Unknown".to_string(),
    }
}

impl GameView for CheckersView {
    type Decoder = CheckersDecoder;

    fn decoder(&self) -> &CheckersDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Checkers MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type your move in chat. The board updates only from verified tool results.")
    }

    fn instructions(&self) -> Vec<String> {
        vec![
            "Type your move in chat (e.g., b6a5 or b6d4f2).".to_string(),
            "Captures are mandatory when available.".to_string(),
            "Multi-jump captures chain squares together.".to_string(),
        ]
    }

    fn status_items(&self, snapshot: Option<&Snapshot>, _decoded: &GameState) -> Option<Vec<StatusItem>> {
        let last_move = snapshot
            .and_then(Snapshot::last_move)
            .and_then(|last| last.get("notation"))
            .and_then(Value::as_str);

        Some(vec![
            StatusItem::new("Status", status_label(snapshot)),
            StatusItem::new("Turn", side_label(snapshot.and_then(Snapshot::turn))),
            StatusItem::or_missing("Last move", last_move),
            StatusItem::new("Winner", side_label(snapshot.and_then(|s| s.text("winner")))),
        ])
    }

    fn render_board(&self, _snapshot: Option<&Snapshot>, decoded: &GameState) -> String {
        decoded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use snapshot::SnapshotDecoder;

    #[test]
    fn test_status_items_use_payload_fields() {
        let payload = json!({
            "type": "checkers_snapshot",
            "state": "......../......../......../......../......../......../......../........ b",
            "status": "game_over",
            "turn": "b",
            "winner": "w",
            "lastMove": { "notation": "b6d4f2" }
        });
        let snapshot = Snapshot::from_payload(&payload, &crate::SHAPE);
        let view = CheckersView::default();
        let decoded = view.decoder().decode_snapshot(snapshot.as_ref());

        let items = view.status_items(snapshot.as_ref(), &decoded).unwrap();

        assert_eq!(
            items,
            vec![
                StatusItem::new("Status", "Game over"),
                StatusItem::new("Turn", "Black"),
                StatusItem::new("Last move", "b6d4f2"),
                StatusItem::new("Winner", "White"),
            ]
        );
    }

    #[test]
    fn test_no_snapshot_labels() {
        let view = CheckersView::default();
        let items = view.status_items(None, &GameState::default()).unwrap();

        assert_eq!(items[0].value, "No game");
        assert_eq!(items[1].value, "-");
        assert_eq!(items[3].value, "-");
    }
}
