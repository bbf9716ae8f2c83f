use std::fmt::{self, Display, Formatter};

use snapshot::{
    encode_list, encode_segments, Segments, SnapshotDecoder, SnapshotShape, StateEncoder, StateField, COMPONENT_SEPARATOR,
    LIST_SEPARATOR, RECORD_SEPARATOR, SENTINEL,
};

use crate::{card_label, hand_value, Hand};

pub const SHAPE: SnapshotShape = SnapshotShape::new("blackjack_snapshot", StateField::State);
pub const PLAYER: &str = "player";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub dealer: Vec<String>,
    pub player_hands: Vec<Hand>,
    pub stack: u64,
    pub bet: u64,
    pub turn: String,
    pub hand_index: usize,
    pub status: String,
    pub last_action: Option<String>,
    pub results: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            dealer: Vec::new(),
            player_hands: Vec::new(),
            stack: 0,
            bet: 0,
            turn: PLAYER.to_string(),
            hand_index: 0,
            status: "in_progress".to_string(),
            last_action: None,
            results: Vec::new(),
        }
    }
}

/// The dealer's second card stays face down while the player is still acting.
pub fn hides_hole_card(turn: Option<&str>, status: Option<&str>) -> bool {
    turn == Some(PLAYER) && status == Some("in_progress")
}

impl GameState {
    pub fn visible_dealer_cards(&self, hide_hole_card: bool) -> &[String] {
        if hide_hole_card {
            &self.dealer[..self.dealer.len().min(1)]
        } else {
            &self.dealer
        }
    }

    pub fn is_active_hand(&self, turn: Option<&str>, index: usize) -> bool {
        turn == Some(PLAYER)
            && self.hand_index == index
            && self.player_hands.get(index).is_some_and(Hand::is_active)
    }

    pub fn result(&self, index: usize) -> Option<&str> {
        self.results
            .get(index)
            .map(String::as_str)
            .filter(|result| !result.is_empty())
    }
}

/// Text rendering of the table for one moment of play.
#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    pub state: &'a GameState,
    pub turn: Option<&'a str>,
    pub hide_hole_card: bool,
}

fn cards_line<S: AsRef<str>>(cards: &[S]) -> String {
    cards
        .iter()
        .map(|card| card_label(card.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Display for Table<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.state;

        if state.dealer.is_empty() {
            writeln!(f, "Dealer: -")?;
        } else {
            let visible = cards_line(state.visible_dealer_cards(self.hide_hole_card));
            if self.hide_hole_card {
                writeln!(f, "Dealer: {} [??]", visible)?;
            } else {
                writeln!(f, "Dealer: {}", visible)?;
            }
        }

        if self.hide_hole_card {
            writeln!(f, "Dealer Total: ?")?;
        } else {
            writeln!(f, "Dealer Total: {}", hand_value(&state.dealer))?;
        }

        if state.player_hands.is_empty() {
            writeln!(f, "Player: -")?;
        }

        for (index, hand) in state.player_hands.iter().enumerate() {
            let marker = if state.is_active_hand(self.turn, index) { " *" } else { "" };
            writeln!(f, "Hand {}{}: {}", index + 1, marker, cards_line(&hand.cards))?;
            write!(
                f,
                "  Total: {} | Bet: {} | State: {} | Doubled: {}",
                hand.value(),
                hand.bet,
                hand.state,
                if hand.doubled { "Yes" } else { "No" }
            )?;
            if let Some(result) = state.result(index) {
                write!(f, " | Result: {}", result)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Decodes `P:<hands>|D:<cards>|BK:n|B:n|T:..|H:n|ST:..|LA:..|R:<results>`.
///
/// Hands are `;`-separated `cards@state@doubled@bet` records. Unknown keys,
/// such as the engine's opaque shoe token, are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlackjackDecoder;

impl SnapshotDecoder for BlackjackDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, state: Option<&str>) -> GameState {
        let defaults = GameState::default();
        let segments = Segments::parse(state.unwrap_or_default());
        let bet = segments.count("B");

        GameState {
            dealer: segments.list("D"),
            player_hands: segments
                .records("P")
                .iter()
                .filter(|record| (0..record.len()).any(|index| record.component(index).is_some()))
                .map(|record| Hand::from_record(record, bet))
                .collect(),
            stack: segments.count("BK"),
            bet,
            turn: segments.text("T", &defaults.turn),
            hand_index: segments.count("H") as usize,
            status: segments.text("ST", &defaults.status),
            last_action: segments.optional_text("LA"),
            results: segments.list("R"),
        }
    }
}

fn encode_hand(hand: &Hand) -> String {
    [
        hand.cards.join(&LIST_SEPARATOR.to_string()),
        hand.state.clone(),
        if hand.doubled { "1" } else { "0" }.to_string(),
        hand.bet.to_string(),
    ]
    .join(&COMPONENT_SEPARATOR.to_string())
}

impl StateEncoder for BlackjackDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        let hands = if decoded.player_hands.is_empty() {
            SENTINEL.to_string()
        } else {
            decoded
                .player_hands
                .iter()
                .map(encode_hand)
                .collect::<Vec<_>>()
                .join(&RECORD_SEPARATOR.to_string())
        };

        encode_segments(&[
            ("P", hands),
            ("D", encode_list(&decoded.dealer)),
            ("BK", decoded.stack.to_string()),
            ("B", decoded.bet.to_string()),
            ("T", decoded.turn.clone()),
            ("H", decoded.hand_index.to_string()),
            ("ST", decoded.status.clone()),
            ("LA", decoded.last_action.clone().unwrap_or_else(|| SENTINEL.to_string())),
            ("R", encode_list(&decoded.results)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT_HANDS: &str = "P:8S,3D@active@0@10;8H,KC@stood@0|D:9C,7H|BK:480|B:10|T:player|H:0|ST:in_progress|LA:split|R:-|X:9f2a";

    #[test]
    fn test_decode_split_hands() {
        let state = BlackjackDecoder.decode(Some(SPLIT_HANDS));

        assert_eq!(state.player_hands.len(), 2);
        assert_eq!(state.player_hands[0].cards, vec!["8S", "3D"]);
        assert_eq!(state.player_hands[0].state, "active");
        assert_eq!(state.player_hands[1].bet, 10);
        assert_eq!(state.player_hands[1].value(), 18);
        assert_eq!(state.dealer, vec!["9C", "7H"]);
        assert_eq!(state.stack, 480);
        assert_eq!(state.last_action.as_deref(), Some("split"));
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_defaults() {
        let state = BlackjackDecoder.decode(Some("LA:-|BK:abc"));

        assert_eq!(state.last_action, None);
        assert_eq!(state.stack, 0);
        assert_eq!(state.turn, "player");
        assert_eq!(BlackjackDecoder.decode(None), GameState::default());
    }

    #[test]
    fn test_empty_hand_chunks_are_skipped() {
        let state = BlackjackDecoder.decode(Some("P:AS,KH@blackjack;;|B:5"));

        assert_eq!(state.player_hands.len(), 1);
        assert_eq!(state.player_hands[0].bet, 5);
    }

    #[test]
    fn test_hole_card_rules() {
        assert!(hides_hole_card(Some("player"), Some("in_progress")));
        assert!(!hides_hole_card(Some("dealer"), Some("in_progress")));
        assert!(!hides_hole_card(Some("player"), Some("game_over")));
        assert!(!hides_hole_card(None, None));

        let state = BlackjackDecoder.decode(Some(SPLIT_HANDS));
        assert_eq!(state.visible_dealer_cards(true), ["9C".to_string()]);
        assert_eq!(state.visible_dealer_cards(false).len(), 2);
        assert!(GameState::default().visible_dealer_cards(true).is_empty());
    }

    #[test]
    fn test_table_hides_dealer_total() {
        let state = BlackjackDecoder.decode(Some(SPLIT_HANDS));
        let table = Table {
            state: &state,
            turn: Some("player"),
            hide_hole_card: true,
        }
        .to_string();
        let lines = table.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Dealer: 9♣ [??]");
        assert_eq!(lines[1], "Dealer Total: ?");
        assert_eq!(lines[2], "Hand 1 *: 8♠ 3♦");
        assert_eq!(lines[3], "  Total: 11 | Bet: 10 | State: active | Doubled: No");
        assert_eq!(lines[4], "Hand 2: 8♥ K♣");
    }

    #[test]
    fn test_table_reveals_after_play() {
        let state = BlackjackDecoder.decode(Some("P:TS,9D@stood@0@10|D:9C,7H,5S|B:10|T:dealer|ST:game_over|R:win"));
        let table = Table {
            state: &state,
            turn: Some("dealer"),
            hide_hole_card: false,
        }
        .to_string();

        assert!(table.contains("Dealer: 9♣ 7♥ 5♠\n"));
        assert!(table.contains("Dealer Total: 21\n"));
        assert!(table.contains("| Result: win\n"));
    }

    #[test]
    fn test_reencode_is_fixed_point() {
        let decoder = BlackjackDecoder;
        let decoded = decoder.decode(Some(SPLIT_HANDS));
        let encoded = decoder.encode(&decoded);

        assert_eq!(
            encoded,
            "P:8S,3D@active@0@10;8H,KC@stood@0@10|D:9C,7H|BK:480|B:10|T:player|H:0|ST:in_progress|LA:split|R:-"
        );
        assert_eq!(decoder.decode(Some(&encoded)), decoded);
    }
}
