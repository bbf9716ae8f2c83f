use shell::{GameView, StatusItem};
use snapshot::Snapshot;

use crate::{pit_beads, store_beads, Bead, GameState, MancalaDecoder, PITS};

#[derive(Clone, Copy, Debug, Default)]
pub struct MancalaView {
    decoder: MancalaDecoder,
}

/// Bead positions for every well on the board, keyed the way they are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardBeads {
    pub opponent_store: Vec<Bead>,
    pub opponent_pits: Vec<Vec<Bead>>,
    pub player_pits: Vec<Vec<Bead>>,
    pub player_store: Vec<Bead>,
}

impl MancalaView {
    pub fn beads(&self, decoded: &GameState) -> BoardBeads {
        let row = |pits: &[u64; PITS]| {
            pits.iter()
                .enumerate()
                .map(|(index, count)| pit_beads(index + 1, *count))
                .collect::<Vec<_>>()
        };

        BoardBeads {
            opponent_store: store_beads(decoded.opponent_store),
            opponent_pits: row(&decoded.opponent_pits),
            player_pits: row(&decoded.player_pits),
            player_store: store_beads(decoded.player_store),
        }
    }
}

impl GameView for MancalaView {
    type Decoder = MancalaDecoder;

    fn decoder(&self) -> &MancalaDecoder {
        &self.decoder
    }

    fn title(&self) -> &str {
        "Mancala MCP"
    }

    fn subtitle(&self) -> Option<&str> {
        Some("Type a pit number 1-6 in chat. The board updates only from tool output.")
    }

    fn instructions(&self) -> Vec<String> {
        vec![
            "Player pits are 1-6 from left to right.".to_string(),
            "Opponent pits are mirrored.".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use snapshot::SnapshotDecoder;

    #[test]
    fn test_status_items() {
        let view = MancalaView::default();
        let decoded = view.decoder().decode(Some("P:0,5,5,5,5,4|O:4,4,4,4,4,4|PS:1|T:opponent|LA:pit1"));

        assert_eq!(
            view.status_items(None, &decoded).unwrap(),
            vec![
                StatusItem::new("Status", "in_progress"),
                StatusItem::new("Turn", "opponent"),
                StatusItem::new("Last", "pit1"),
                StatusItem::new("Winner", "-"),
            ]
        );
    }

    #[test]
    fn test_beads_follow_counts() {
        let view = MancalaView::default();
        let decoded = view.decoder().decode(Some("P:0,5,5,5,5,4|O:4,4,4,4,4,40|PS:1|OS:2"));

        let beads = view.beads(&decoded);

        assert!(beads.player_pits[0].is_empty());
        assert_eq!(beads.player_pits[1].len(), 5);
        assert_eq!(beads.opponent_pits[5].len(), 36);
        assert_eq!(beads.player_store.len(), 1);
        assert_eq!(beads.opponent_store.len(), 2);
        assert_eq!(beads.player_pits[1], pit_beads(2, 5));
    }
}
