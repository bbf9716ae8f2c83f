use std::fmt::{self, Display, Formatter};

use snapshot::{encode_segments, Grid, Segments, SnapshotDecoder, SnapshotShape, StateEncoder, StateField};

pub const SIZE: usize = 3;
pub const EMPTY: char = '.';
pub const SHAPE: SnapshotShape = SnapshotShape::new("tic_tac_toe_snapshot", StateField::State);

const COLUMN_LABELS: [char; SIZE] = ['A', 'B', 'C'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub grid: Grid,
    pub turn: String,
    pub status: String,
    pub last_action: String,
    pub winner: String,
    pub player_symbol: String,
    pub opponent_symbol: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            grid: Grid::filled(SIZE, SIZE, EMPTY),
            turn: "player".to_string(),
            status: "in_progress".to_string(),
            last_action: "-".to_string(),
            winner: "-".to_string(),
            player_symbol: "X".to_string(),
            opponent_symbol: "O".to_string(),
        }
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for label in COLUMN_LABELS {
            write!(f, "  {} ", label)?;
        }
        writeln!(f)?;
        writeln!(f, "   +---+---+---+")?;

        for (y, row) in self.grid.iter_rows().enumerate() {
            write!(f, " {} |", y + 1)?;
            for cell in row {
                let mark = if *cell == EMPTY { ' ' } else { *cell };
                write!(f, " {} |", mark)?;
            }
            writeln!(f)?;
            if y != SIZE - 1 {
                writeln!(f, "   |---+---+---|")?;
            }
        }

        writeln!(f, "   +---+---+---+")?;

        Ok(())
    }
}

/// Decodes `G:<rows>|T:..|ST:..|LA:..|W:..|P:<symbol>|O:<symbol>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToeDecoder;

impl SnapshotDecoder for TicTacToeDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, state: Option<&str>) -> GameState {
        let defaults = GameState::default();
        let segments = Segments::parse(state.unwrap_or_default());

        GameState {
            grid: segments.grid("G", SIZE, SIZE, EMPTY),
            turn: segments.text("T", &defaults.turn),
            status: segments.text("ST", &defaults.status),
            last_action: segments.text("LA", &defaults.last_action),
            winner: segments.text("W", &defaults.winner),
            player_symbol: segments.text("P", &defaults.player_symbol),
            opponent_symbol: segments.text("O", &defaults.opponent_symbol),
        }
    }
}

impl StateEncoder for TicTacToeDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        encode_segments(&[
            ("G", decoded.grid.to_string()),
            ("T", decoded.turn.clone()),
            ("ST", decoded.status.clone()),
            ("LA", decoded.last_action.clone()),
            ("W", decoded.winner.clone()),
            ("P", decoded.player_symbol.clone()),
            ("O", decoded.opponent_symbol.clone()),
        ])
    }
}
