use std::fmt::{self, Display, Formatter};

use snapshot::{parse_grid, Grid, SnapshotDecoder, SnapshotShape, StateEncoder, StateField};

pub const SIZE: usize = 8;
pub const EMPTY: char = '.';
pub const WHITE: &str = "w";
pub const BLACK: &str = "b";
pub const SHAPE: SnapshotShape = SnapshotShape::new("checkers_snapshot", StateField::State);

const FILES: [char; SIZE] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Piece {
    White,
    WhiteKing,
    Black,
    BlackKing,
}

impl Piece {
    pub fn from_cell(cell: char) -> Option<Self> {
        match cell {
            'w' => Some(Piece::White),
            'W' => Some(Piece::WhiteKing),
            'b' => Some(Piece::Black),
            'B' => Some(Piece::BlackKing),
            _ => None,
        }
    }

    pub fn is_white(&self) -> bool {
        matches!(self, Piece::White | Piece::WhiteKing)
    }

    pub fn is_king(&self) -> bool {
        matches!(self, Piece::WhiteKing | Piece::BlackKing)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Grid,
    pub turn: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Grid::filled(SIZE, SIZE, EMPTY),
            turn: WHITE.to_string(),
        }
    }
}

impl GameState {
    /// Piece on an algebraic square such as `b6`; rank 8 is the top row.
    pub fn piece_at(&self, square: &str) -> Option<Piece> {
        let mut chars = square.chars();
        let file = chars.next()?;
        let file = FILES.iter().position(|f| *f == file)?;
        let rank = chars.as_str().parse::<usize>().ok().filter(|r| (1..=SIZE).contains(r))?;

        self.board.get(SIZE - rank, file).and_then(Piece::from_cell)
    }

    pub fn count(&self, white: bool) -> usize {
        self.board
            .iter_rows()
            .flatten()
            .filter_map(|cell| Piece::from_cell(*cell))
            .filter(|piece| piece.is_white() == white)
            .count()
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (y, row) in self.board.iter_rows().enumerate() {
            write!(f, "{} ", SIZE - y)?;
            for (x, cell) in row.iter().enumerate() {
                let dark = (x + y) % 2 == 1;
                let mark = match Piece::from_cell(*cell) {
                    Some(_) => *cell,
                    None if dark => ':',
                    None => ' ',
                };
                write!(f, "{}", mark)?;
            }
            writeln!(f)?;
        }

        write!(f, "  ")?;
        for file in FILES {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;

        Ok(())
    }
}

/// Decodes `<row>/<row>/.../<row> <turn>`, eight rows of eight cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckersDecoder;

impl SnapshotDecoder for CheckersDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, state: Option<&str>) -> GameState {
        let mut parts = state.unwrap_or_default().trim().split(' ');
        let board = parts.next().filter(|rows| !rows.is_empty());
        let turn = parts.next().filter(|turn| !turn.is_empty()).unwrap_or(WHITE);

        GameState {
            board: parse_grid(board, SIZE, SIZE, EMPTY),
            turn: turn.to_string(),
        }
    }
}

impl StateEncoder for CheckersDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        format!("{} {}", decoded.board, decoded.turn)
    }
}
