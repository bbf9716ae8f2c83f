use serde_json::Value;
use shell::{game_key, GameView, StatusItem};
use snapshot::{encode_amount, Snapshot, SnapshotDecoder, SENTINEL};

use crate::{GameState, ReelStrip, SlotDecoder, REELS};

#[derive(Clone, Copy, Debug, Default)]
pub struct SlotView {
    decoder: SlotDecoder,
}

/// Payload amounts may arrive as numbers or as preformatted text.
fn amount_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(number) => number.as_f64().map(encode_amount),
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Reels reported on the payload win over the decoded state.
pub fn reels(snapshot: Option<&Snapshot>, decoded: &GameState) -> Vec<String> {
    let reported = snapshot
        .and_then(|s| s.field("reels"))
        .and_then(Value::as_array)
        .map(|reels| {
            reels
                .iter()
                .map(|symbol| symbol.as_str().unwrap_or(SENTINEL).to_string())
                .collect::<Vec<_>>()
        })
        .filter(|reels| !reels.is_empty());

    match reported {
        Some(reels) => reels,
        None if !decoded.reels.is_empty() => decoded.reels.clone(),
        None => vec![SENTINEL.to_string(); REELS],
    }
}

impl GameView for SlotView {
    type Decoder = SlotDecoder;

    fn decoder(&self) -> &SlotDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Slot Machine MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type spin in chat. The reels update only from tool output.")
    }

    fn waiting_message(&self) -> Option<&str> {
        Some("Waiting for the next spin...")
    }

    fn instructions(&self) -> Vec<String> {
        vec!["Matching all three symbols pays a multiplier.".to_string()]
    }

    fn turn<'a>(&self, _snapshot: &'a Snapshot) -> Option<&'a str> {
        None
    }

    /// Every spin produces a new state string, so it stands in for a game id.
    fn game_key(&self, snapshot: Option<&Snapshot>) -> String {
        match snapshot {
            Some(snapshot) if snapshot.game_id().is_none() && !snapshot.state().is_empty() => {
                snapshot.state().to_string()
            }
            _ => game_key(self.decoder.shape().discriminant, snapshot),
        }
    }

    fn status_items(&self, snapshot: Option<&Snapshot>, decoded: &GameState) -> Option<Vec<StatusItem>> {
        let Some(snapshot) = snapshot else {
            return Some(vec![
                StatusItem::new("Stack", SENTINEL),
                StatusItem::new("Bet", SENTINEL),
                StatusItem::new("Payout", "0"),
            ]);
        };
        let field = |name: &str| amount_text(snapshot.field(name));

        Some(vec![
            StatusItem::new("Stack", field("stack").unwrap_or_else(|| encode_amount(decoded.stack))),
            StatusItem::new("Bet", field("bet").unwrap_or_else(|| encode_amount(decoded.bet))),
            StatusItem::new("Payout", field("payout").unwrap_or_else(|| encode_amount(decoded.payout))),
        ])
    }

    fn render_board(&self, snapshot: Option<&Snapshot>, decoded: &GameState) -> String {
        let symbols = reels(snapshot, decoded);
        ReelStrip { symbols: &symbols }.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spin(payload: Value) -> (SlotView, Option<Snapshot>, GameState) {
        let view = SlotView::default();
        let snapshot = Snapshot::from_payload(&payload, &crate::SHAPE);
        let decoded = view.decoder().decode_snapshot(snapshot.as_ref());
        (view, snapshot, decoded)
    }

    #[test]
    fn test_payload_amounts_win() {
        let (view, snapshot, decoded) = spin(json!({
            "type": "slot_snapshot",
            "state": "R:7,7,BAR|BK:90|B:10|P:0|ST:in_progress|LA:spin",
            "stack": 95.5,
            "bet": "10",
            "reels": ["7", "7", "7"],
        }));

        assert_eq!(
            view.status_items(snapshot.as_ref(), &decoded).unwrap(),
            vec![
                StatusItem::new("Stack", "95.5"),
                StatusItem::new("Bet", "10"),
                StatusItem::new("Payout", "0"),
            ]
        );
        assert_eq!(reels(snapshot.as_ref(), &decoded), vec!["7", "7", "7"]);
    }

    #[test]
    fn test_reels_fall_back_to_state_then_blanks() {
        let (view, snapshot, decoded) = spin(json!({
            "type": "slot_snapshot",
            "state": "R:LEMON,BELL,7|BK:100|B:5|P:0",
            "reels": [],
        }));

        assert_eq!(reels(snapshot.as_ref(), &decoded), vec!["LEMON", "BELL", "7"]);
        assert!(view.render_board(None, &GameState::default()).contains("|   -    |   -    |   -    |"));
    }

    #[test]
    fn test_game_key_uses_state_without_game_id() {
        let (view, snapshot, _) = spin(json!({ "type": "slot_snapshot", "state": "R:7,7,7|BK:10" }));
        assert_eq!(view.game_key(snapshot.as_ref()), "R:7,7,7|BK:10");

        let (view, snapshot, _) = spin(json!({ "type": "slot_snapshot", "state": "R:7", "gameId": "slot-9" }));
        assert_eq!(view.game_key(snapshot.as_ref()), "slot-9");

        assert_eq!(view.game_key(None), "slot_snapshot:unknown");
    }

    #[test]
    fn test_no_turn_and_no_snapshot_items() {
        let (view, snapshot, _) = spin(json!({ "type": "slot_snapshot", "state": "R:7", "turn": "player" }));
        assert_eq!(snapshot.as_ref().and_then(|s| view.turn(s)), None);

        let items = view.status_items(None, &GameState::default()).unwrap();
        assert_eq!(items[0].value, "-");
        assert_eq!(items[2].value, "0");
    }
}
