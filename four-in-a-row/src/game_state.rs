use std::fmt::{self, Display, Formatter};

use snapshot::{encode_segments, Grid, Segments, SnapshotDecoder, SnapshotShape, StateEncoder, StateField};

pub const ROWS: usize = 6;
pub const COLUMNS: usize = 7;
pub const EMPTY: char = '.';
pub const RED: char = 'R';
pub const YELLOW: char = 'Y';
pub const SHAPE: SnapshotShape = SnapshotShape::new("four_in_a_row_snapshot", StateField::State);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub grid: Grid,
    pub turn: String,
    pub status: String,
    pub last_action: String,
    pub winner: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            grid: Grid::filled(ROWS, COLUMNS, EMPTY),
            turn: "player".to_string(),
            status: "in_progress".to_string(),
            last_action: "-".to_string(),
            winner: "-".to_string(),
        }
    }
}

impl GameState {
    /// Number of tokens dropped in `column` (1-based), counted from the bottom.
    pub fn column_height(&self, column: usize) -> usize {
        if column == 0 || column > COLUMNS {
            return 0;
        }

        (0..ROWS)
            .rev()
            .take_while(|row| self.grid.get(*row, column - 1).is_some_and(|c| c != EMPTY))
            .count()
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "     1   2   3   4   5   6   7  ")?;
        writeln!(f, "   +---+---+---+---+---+---+---+")?;

        for (y, row) in self.grid.iter_rows().enumerate() {
            write!(f, "   |")?;
            for cell in row {
                let p = match *cell {
                    RED => 'R',
                    YELLOW => 'Y',
                    _ => ' ',
                };
                write!(f, " {} |", p)?;
            }
            writeln!(f)?;
            if y != ROWS - 1 {
                writeln!(f, "   |---+---+---+---+---+---+---|")?;
            }
        }

        writeln!(f, "   +---+---+---+---+---+---+---+")?;

        Ok(())
    }
}

/// Decodes `G:<6 rows of 7>|T:..|ST:..|LA:..|W:..`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FourInARowDecoder;

impl SnapshotDecoder for FourInARowDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, state: Option<&str>) -> GameState {
        let defaults = GameState::default();
        let segments = Segments::parse(state.unwrap_or_default());

        GameState {
            grid: segments.grid("G", ROWS, COLUMNS, EMPTY),
            turn: segments.text("T", &defaults.turn),
            status: segments.text("ST", &defaults.status),
            last_action: segments.text("LA", &defaults.last_action),
            winner: segments.text("W", &defaults.winner),
        }
    }
}

impl StateEncoder for FourInARowDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        encode_segments(&[
            ("G", decoded.grid.to_string()),
            ("T", decoded.turn.clone()),
            ("ST", decoded.status.clone()),
            ("LA", decoded.last_action.clone()),
            ("W", decoded.winner.clone()),
        ])
    }
}
