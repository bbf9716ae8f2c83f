use std::fmt::{self, Display, Formatter};

use snapshot::{encode_segments, Grid, Segments, SnapshotDecoder, SnapshotShape, StateEncoder, StateField};

use crate::{segment_at, HIT, MISS, SHIP};

pub const SIZE: usize = 10;
pub const WATER: char = '.';
pub const SHAPE: SnapshotShape = SnapshotShape::new("sea_battle_snapshot", StateField::State);

const FILES: [char; SIZE] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];

/// Both fleets plus each side's view of the other. `fog` is what the player
/// knows of the opponent, `opponent_fog` what the opponent knows of the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub player: Grid,
    pub opponent: Grid,
    pub fog: Grid,
    pub opponent_fog: Grid,
    pub turn: String,
    pub status: String,
    pub last_action: String,
    pub winner: String,
}

impl Default for GameState {
    fn default() -> Self {
        let water = Grid::filled(SIZE, SIZE, WATER);
        Self {
            player: water.clone(),
            opponent: water.clone(),
            fog: water.clone(),
            opponent_fog: water,
            turn: "player".to_string(),
            status: "in_progress".to_string(),
            last_action: "-".to_string(),
            winner: "-".to_string(),
        }
    }
}

impl GameState {
    pub fn ship_cells_afloat(&self) -> usize {
        self.player.count(SHIP)
    }

    /// `(coordinate, result)` from a last action such as `A1:hit`.
    pub fn last_shot(&self) -> Option<(&str, &str)> {
        self.last_action.split_once(':')
    }
}

fn write_header(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    write!(f, "   ")?;
    let files = FILES.iter().map(char::to_string).collect::<Vec<_>>();
    writeln!(f, "{}", files.join(" "))
}

fn write_board(f: &mut Formatter<'_>, title: &str, cell: impl Fn(usize, usize) -> char) -> fmt::Result {
    write_header(f, title)?;
    for row in 0..SIZE {
        let cells = (0..SIZE).map(|col| cell(row, col).to_string()).collect::<Vec<_>>();
        writeln!(f, "{:>2} {}", row + 1, cells.join(" "))?;
    }

    Ok(())
}

fn shot_glyph(cell: Option<char>) -> Option<char> {
    match cell {
        Some(HIT) => Some('X'),
        Some(MISS) => Some('o'),
        _ => None,
    }
}

/// Player fleet with ships drawn end to end, then the opponent waters as far
/// as the player has uncovered them.
impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_board(f, "Player Fleet", |row, col| {
            let cell = self.player.get(row, col);
            shot_glyph(cell)
                .or_else(|| segment_at(&self.player, row, col).map(|segment| segment.glyph()))
                .unwrap_or(WATER)
        })?;
        writeln!(f)?;
        write_board(f, "Opponent Waters", |row, col| {
            shot_glyph(self.fog.get(row, col)).unwrap_or(WATER)
        })?;

        Ok(())
    }
}

/// Decodes `P:<grid>|O:<grid>|F:<grid>|OF:<grid>|T:..|ST:..|LA:..|W:..`.
///
/// Grids are ten `/`-separated rows of `.`, `S`, `H` and `M`. `OF` is absent
/// from older states and then reads as open water.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeaBattleDecoder;

impl SnapshotDecoder for SeaBattleDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, state: Option<&str>) -> GameState {
        let defaults = GameState::default();
        let segments = Segments::parse(state.unwrap_or_default());

        GameState {
            player: segments.grid("P", SIZE, SIZE, WATER),
            opponent: segments.grid("O", SIZE, SIZE, WATER),
            fog: segments.grid("F", SIZE, SIZE, WATER),
            opponent_fog: segments.grid("OF", SIZE, SIZE, WATER),
            turn: segments.text("T", &defaults.turn),
            status: segments.text("ST", &defaults.status),
            last_action: segments.text("LA", &defaults.last_action),
            winner: segments.text("W", &defaults.winner),
        }
    }
}

impl StateEncoder for SeaBattleDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        encode_segments(&[
            ("P", decoded.player.to_string()),
            ("O", decoded.opponent.to_string()),
            ("F", decoded.fog.to_string()),
            ("OF", decoded.opponent_fog.to_string()),
            ("T", decoded.turn.clone()),
            ("ST", decoded.status.clone()),
            ("LA", decoded.last_action.clone()),
            ("W", decoded.winner.clone()),
        ])
    }
}
