use std::fmt::{self, Display, Formatter};

use log::debug;
use snapshot::{encode_segments, parse_count, present, Segments, SnapshotDecoder, SnapshotShape, StateEncoder, StateField, LIST_SEPARATOR};

pub const PITS: usize = 6;
pub const SHAPE: SnapshotShape = SnapshotShape::new("mancala_snapshot", StateField::State);

const CELL_WIDTH: usize = 5;

pub type PitRow = [u64; PITS];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub player_pits: PitRow,
    pub opponent_pits: PitRow,
    pub player_store: u64,
    pub opponent_store: u64,
    pub turn: String,
    pub status: String,
    pub last_action: String,
    pub winner: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            player_pits: [0; PITS],
            opponent_pits: [0; PITS],
            player_store: 0,
            opponent_store: 0,
            turn: "player".to_string(),
            status: "in_progress".to_string(),
            last_action: "-".to_string(),
            winner: "-".to_string(),
        }
    }
}

impl GameState {
    /// Pit label (1-6) of the last sowing move, read from `pitN[,...]`.
    pub fn last_pit(&self) -> Option<usize> {
        let base = self.last_action.split(LIST_SEPARATOR).next()?;
        let pit = base.strip_prefix("pit")?.parse::<usize>().ok()?;

        (1..=PITS).contains(&pit).then_some(pit)
    }

    pub fn seeds_in_play(&self) -> u64 {
        self.player_pits.iter().chain(self.opponent_pits.iter()).sum()
    }

    fn write_pit_row(&self, f: &mut Formatter<'_>, pits: impl Iterator<Item = (usize, u64)>) -> fmt::Result {
        let last_pit = self.last_pit();
        let cells = pits
            .map(|(label, count)| {
                if Some(label) == last_pit {
                    format!("<{:>3}>", count)
                } else {
                    format!("[{:>3}]", count)
                }
            })
            .collect::<Vec<_>>();

        writeln!(f, "      {}", cells.join(" "))
    }

    fn write_labels(f: &mut Formatter<'_>, labels: impl Iterator<Item = usize>) -> fmt::Result {
        let labels = labels
            .map(|label| format!("{:^width$}", label, width = CELL_WIDTH))
            .collect::<Vec<_>>();

        writeln!(f, "      {}", labels.join(" ").trim_end())
    }
}

/// Opponent pits run right to left across the top, stores sit at either end.
impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let middle = PITS * CELL_WIDTH + PITS - 1;

        Self::write_labels(f, (1..=PITS).rev())?;
        self.write_pit_row(f, (1..=PITS).rev().map(|label| (label, self.opponent_pits[label - 1])))?;
        writeln!(
            f,
            "({:>3}) {} ({:>3})",
            self.opponent_store,
            " ".repeat(middle),
            self.player_store
        )?;
        self.write_pit_row(f, (1..=PITS).map(|label| (label, self.player_pits[label - 1])))?;
        Self::write_labels(f, 1..=PITS)?;

        Ok(())
    }
}

/// Six non-negative counts or nothing: any other shape reads as an empty row.
pub fn parse_pit_row(value: Option<&str>) -> PitRow {
    let Some(value) = present(value) else {
        return [0; PITS];
    };

    let counts = value
        .split(LIST_SEPARATOR)
        .map(|token| token.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>();

    match counts.and_then(|counts| PitRow::try_from(counts).ok()) {
        Some(row) => row,
        None => {
            debug!("Ignoring malformed pit row {:?}", value);
            [0; PITS]
        }
    }
}

fn encode_pit_row(row: &PitRow) -> String {
    row.iter().map(u64::to_string).collect::<Vec<_>>().join(&LIST_SEPARATOR.to_string())
}

/// Decodes `P:<pits>|O:<pits>|PS:n|OS:n|T:..|ST:..|LA:..|W:..`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MancalaDecoder;

impl SnapshotDecoder for MancalaDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, state: Option<&str>) -> GameState {
        let defaults = GameState::default();
        let segments = Segments::parse(state.unwrap_or_default());

        GameState {
            player_pits: parse_pit_row(segments.get("P")),
            opponent_pits: parse_pit_row(segments.get("O")),
            player_store: parse_count(segments.get("PS")),
            opponent_store: parse_count(segments.get("OS")),
            turn: segments.text("T", &defaults.turn),
            status: segments.text("ST", &defaults.status),
            last_action: segments.text("LA", &defaults.last_action),
            winner: segments.text("W", &defaults.winner),
        }
    }
}

impl StateEncoder for MancalaDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        encode_segments(&[
            ("P", encode_pit_row(&decoded.player_pits)),
            ("O", encode_pit_row(&decoded.opponent_pits)),
            ("PS", decoded.player_store.to_string()),
            ("OS", decoded.opponent_store.to_string()),
            ("T", decoded.turn.clone()),
            ("ST", decoded.status.clone()),
            ("LA", decoded.last_action.clone()),
            ("W", decoded.winner.clone()),
        ])
    }
}
