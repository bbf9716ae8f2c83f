use std::fmt::{self, Display, Formatter};

use snapshot::{parse_fen_placement, SnapshotDecoder, SnapshotShape, StateEncoder, StateField, ROW_SEPARATOR};

pub const SIZE: usize = 8;
pub const SHAPE: SnapshotShape = SnapshotShape::new("chess_snapshot", StateField::Fen);

const FILES: [char; SIZE] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Piece placement from a FEN string, rank 8 first. Always 8x8: short rows
/// and missing ranks are empty, extra squares and ranks are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub squares: [[Option<char>; SIZE]; SIZE],
    pub active_color: Option<char>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            squares: [[None; SIZE]; SIZE],
            active_color: None,
        }
    }
}

impl GameState {
    pub fn piece_at(&self, square: &str) -> Option<char> {
        let mut chars = square.chars();
        let file = chars.next()?;
        let file = FILES.iter().position(|f| *f == file)?;
        let rank = chars.as_str().parse::<usize>().ok().filter(|r| (1..=SIZE).contains(r))?;

        self.squares[SIZE - rank][file]
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().filter(|square| square.is_some()).count()
    }

    /// Placement field of a FEN string, with empty runs compressed.
    pub fn placement(&self) -> String {
        let mut ranks = Vec::with_capacity(SIZE);
        for rank in &self.squares {
            let mut text = String::new();
            let mut run = 0;
            for square in rank {
                match square {
                    Some(piece) => {
                        if run > 0 {
                            text.push_str(&run.to_string());
                            run = 0;
                        }
                        text.push(*piece);
                    }
                    None => run += 1,
                }
            }
            if run > 0 {
                text.push_str(&run.to_string());
            }
            ranks.push(text);
        }

        ranks.join(&ROW_SEPARATOR.to_string())
    }
}

pub fn piece_symbol(piece: char) -> char {
    match piece {
        'p' => '♟',
        'r' => '♜',
        'n' => '♞',
        'b' => '♝',
        'q' => '♛',
        'k' => '♚',
        'P' => '♙',
        'R' => '♖',
        'N' => '♘',
        'B' => '♗',
        'Q' => '♕',
        'K' => '♔',
        other => other,
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (y, rank) in self.squares.iter().enumerate() {
            write!(f, "{} ", SIZE - y)?;
            for (x, square) in rank.iter().enumerate() {
                let mark = match square {
                    Some(piece) => piece_symbol(*piece),
                    None if (x + y) % 2 == 1 => ':',
                    None => '.',
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

#[derive(Clone, Copy, Debug, Default)]
pub struct ChessDecoder;

impl SnapshotDecoder for ChessDecoder {
    type Decoded = GameState;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    fn decode(&self, fen: Option<&str>) -> GameState {
        let Some(fen) = fen.filter(|fen| !fen.is_empty()) else {
            return GameState::default();
        };

        let mut state = GameState::default();
        for (y, rank) in parse_fen_placement(fen).into_iter().take(SIZE).enumerate() {
            for (x, square) in rank.into_iter().take(SIZE).enumerate() {
                state.squares[y][x] = square;
            }
        }

        state.active_color = fen
            .split(' ')
            .nth(1)
            .and_then(|color| color.chars().next())
            .filter(|color| matches!(color, 'w' | 'b'));

        state
    }
}

impl StateEncoder for ChessDecoder {
    fn encode(&self, decoded: &GameState) -> String {
        match decoded.active_color {
            Some(color) => format!("{} {}", decoded.placement(), color),
            None => decoded.placement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";

    #[test]
    fn test_decode_after_e4() {
        let state = ChessDecoder.decode(Some(AFTER_E4));

        assert_eq!(state.piece_at("e4"), Some('P'));
        assert_eq!(state.piece_at("e2"), None);
        assert_eq!(state.piece_at("e8"), Some('k'));
        assert_eq!(state.piece_at("a1"), Some('R'));
        assert_eq!(state.piece_count(), 32);
        assert_eq!(state.active_color, Some('b'));
    }

    #[test]
    fn test_short_placement_is_padded() {
        let state = ChessDecoder.decode(Some("k/8/K"));

        assert_eq!(state.squares[0][0], Some('k'));
        assert_eq!(state.squares[2][0], Some('K'));
        assert_eq!(state.squares[7], [None; SIZE]);
        assert_eq!(state.active_color, None);
    }

    #[test]
    fn test_overlong_rank_is_truncated() {
        let state = ChessDecoder.decode(Some("ppppppppppp/8/8/8/8/8/8/8/8/PPPP"));

        assert_eq!(state.piece_count(), 8);
    }

    #[test]
    fn test_empty_fen_is_default() {
        assert_eq!(ChessDecoder.decode(Some("")), GameState::default());
        assert_eq!(ChessDecoder.decode(None), GameState::default());
    }

    #[test]
    fn test_reencode_is_fixed_point() {
        let decoder = ChessDecoder;
        let decoded = decoder.decode(Some(AFTER_E4));
        let encoded = decoder.encode(&decoded);

        assert_eq!(encoded, "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b");
        assert_eq!(decoder.decode(Some(&encoded)), decoded);
    }
}
