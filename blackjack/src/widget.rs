use shell::{GameView, StatusItem};
use snapshot::Snapshot;

use crate::{hides_hole_card, BlackjackDecoder, GameState, Table};

#[derive(Clone, Copy, Debug, Default)]
pub struct BlackjackView {
    decoder: BlackjackDecoder,
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

impl GameView for BlackjackView {
    type Decoder = BlackjackDecoder;

    fn decoder(&self) -> &BlackjackDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Blackjack"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type actions in chat. The table updates only from validated tool output.")
    }

    fn instructions(&self) -> Vec<String> {
        vec![
            "Dealer hole card remains hidden in chat until reveal conditions are met.".to_string(),
            "Splits and doubles are available when legal; insurance and surrender are disabled.".to_string(),
        ]
    }

    fn status_items(&self, snapshot: Option<&Snapshot>, decoded: &GameState) -> Option<Vec<StatusItem>> {
        let last_action = snapshot
            .and_then(|s| s.text("lastAction"))
            .or(decoded.last_action.as_deref());

        Some(vec![
            StatusItem::new("Status", status_label(snapshot)),
            StatusItem::or_missing("Turn", snapshot.and_then(Snapshot::turn)),
            StatusItem::new("Stack", decoded.stack.to_string()),
            StatusItem::new("Table Bet", decoded.bet.to_string()),
            StatusItem::or_missing("Last Action", last_action),
        ])
    }

    fn render_board(&self, snapshot: Option<&Snapshot>, decoded: &GameState) -> String {
        let turn = snapshot.and_then(Snapshot::turn);
        let status = snapshot.and_then(Snapshot::status);

        Table {
            state: decoded,
            turn,
            hide_hole_card: hides_hole_card(turn, status),
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use snapshot::SnapshotDecoder;

    #[test]
    fn test_player_to_act_hides_hole_card() {
        let payload = json!({
            "type": "blackjack_snapshot",
            "state": "P:AS,7D@active@0@25|D:KH,6C|BK:975|B:25|T:player|H:0|ST:in_progress|LA:deal",
            "status": "in_progress",
            "turn": "player",
        });
        let snapshot = Snapshot::from_payload(&payload, &crate::SHAPE);
        let view = BlackjackView::default();
        let decoded = view.decoder().decode_snapshot(snapshot.as_ref());

        let board = view.render_board(snapshot.as_ref(), &decoded);
        let items = view.status_items(snapshot.as_ref(), &decoded).unwrap();

        assert!(board.starts_with("Dealer: K♥ [??]\nDealer Total: ?\n"));
        assert!(board.contains("Hand 1 *: A♠ 7♦\n"));
        assert_eq!(
            items,
            vec![
                StatusItem::new("Status", "In progress"),
                StatusItem::new("Turn", "player"),
                StatusItem::new("Stack", "975"),
                StatusItem::new("Table Bet", "25"),
                StatusItem::new("Last Action", "deal"),
            ]
        );
    }

    #[test]
    fn test_no_snapshot() {
        let view = BlackjackView::default();
        let decoded = GameState::default();

        let board = view.render_board(None, &decoded);
        let items = view.status_items(None, &decoded).unwrap();

        assert_eq!(board, "Dealer: -\nDealer Total: 0\nPlayer: -\n");
        assert_eq!(items[0].value, "No game");
        assert_eq!(items[1].value, "-");
        assert_eq!(items[4].value, "-");
    }
}
