use std::fmt::{self, Display, Formatter};

use snapshot::{encode_amount, encode_list, encode_segments, Segments, SnapshotDecoder, SnapshotShape, StateEncoder, StateField, SENTINEL};

pub const REELS: usize = 3;
pub const SHAPE: SnapshotShape = SnapshotShape::new("slot_snapshot", StateField::State);

const REEL_WIDTH: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub reels: Vec<String>,
    pub stack: f64,
    pub bet: f64,
    pub payout: f64,
    pub status: String,
    pub last_action: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            reels: Vec::new(),
            stack: 0.0,
            bet: 0.0,
            payout: 0.0,
            status: "in_progress".to_string(),
            last_action: "-".to_string(),
        }
    }
}

/// A row of reel windows. Fewer than three symbols leave blank reels showing `-`.
#[derive(Clone, Copy, Debug)]
pub struct ReelStrip<'a> {
    pub symbols: &'a [String],
}

impl Display for ReelStrip<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let reels = self.symbols.len().max(REELS);
        let border = vec!["-".repeat(REEL_WIDTH); reels].join("+");

        writeln!(f, "+{}+", border)?;
        write!(f, "|")?;
        for index in 0..reels {
            let symbol = self.symbols.get(index).map_or(SENTINEL, String::as_str);
            write!(f, "{:^width$}|", symbol, width = REEL_WIDTH)?;
        }
        writeln!(f)?;
        writeln!(f, "+{}+", border)?;

        Ok(())
    }
}

/// Decodes `R:<reels>|BK:<amount>|B:<amount>|P:<amount>|ST:..|LA:..`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlotDecoder;

impl SnapshotDecoder for SlotDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, state: Option<&str>) -> GameState {
        let defaults = GameState::default();
        let segments = Segments::parse(state.unwrap_or_default());

        GameState {
            reels: segments.list("R"),
            stack: segments.amount("BK"),
            bet: segments.amount("B"),
            payout: segments.amount("P"),
            status: segments.text("ST", &defaults.status),
            last_action: segments.text("LA", &defaults.last_action),
        }
    }
}

impl StateEncoder for SlotDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        encode_segments(&[
            ("R", encode_list(&decoded.reels)),
            ("BK", encode_amount(decoded.stack)),
            ("B", encode_amount(decoded.bet)),
            ("P", encode_amount(decoded.payout)),
            ("ST", decoded.status.clone()),
            ("LA", decoded.last_action.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFTER_SPIN: &str = "R:BELL,BELL,BELL|BK:137.5|B:2.5|P:40|ST:in_progress|LA:spin";

    #[test]
    fn test_decode_after_spin() {
        let state = SlotDecoder.decode(Some(AFTER_SPIN));

        assert_eq!(state.reels, vec!["BELL", "BELL", "BELL"]);
        assert_eq!(state.stack, 137.5);
        assert_eq!(state.bet, 2.5);
        assert_eq!(state.payout, 40.0);
        assert_eq!(state.last_action, "spin");
    }

    #[test]
    fn test_bad_amounts_are_zero() {
        let state = SlotDecoder.decode(Some("R:-|BK:lots|B:-5|P:inf"));

        assert!(state.reels.is_empty());
        assert_eq!(state.stack, 0.0);
        assert_eq!(state.bet, 0.0);
        assert_eq!(state.payout, 0.0);
    }

    #[test]
    fn test_reel_strip() {
        let reels = vec!["7".to_string(), "BAR".to_string()];
        let strip = ReelStrip { symbols: &reels }.to_string();

        assert_eq!(
            strip,
            "+--------+--------+--------+\n|   7    |  BAR   |   -    |\n+--------+--------+--------+\n"
        );
    }

    #[test]
    fn test_reencode_is_fixed_point() {
        let decoder = SlotDecoder;
        let decoded = decoder.decode(Some(AFTER_SPIN));
        let encoded = decoder.encode(&decoded);

        assert_eq!(encoded, AFTER_SPIN);
        assert_eq!(decoder.decode(Some(&encoded)), decoded);
    }

    #[test]
    fn test_large_stack_survives_reencode() {
        let decoder = SlotDecoder;
        let decoded = decoder.decode(Some("R:7,7,7|BK:1e20|B:10|P:0|ST:in_progress|LA:spin"));
        let encoded = decoder.encode(&decoded);

        assert_eq!(decoded.stack, 1e20);
        assert!(encoded.contains("BK:100000000000000000000|"));
        assert_eq!(decoder.decode(Some(&encoded)), decoded);
    }
}
