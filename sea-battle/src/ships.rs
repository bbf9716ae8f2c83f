use snapshot::Grid;

pub const SHIP: char = 'S';
pub const HIT: char = 'H';
pub const MISS: char = 'M';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Where a ship cell sits within its ship, so a board can draw end caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Single,
    Start(Orientation),
    Middle(Orientation),
    End(Orientation),
}

impl Segment {
    pub fn glyph(&self) -> char {
        match self {
            Segment::Single => '#',
            Segment::Start(Orientation::Horizontal) => '<',
            Segment::Middle(Orientation::Horizontal) => '=',
            Segment::End(Orientation::Horizontal) => '>',
            Segment::Start(Orientation::Vertical) => '^',
            Segment::Middle(Orientation::Vertical) => '|',
            Segment::End(Orientation::Vertical) => 'v',
        }
    }
}

/// Afloat and struck ship cells both belong to a ship.
pub fn is_ship(cell: Option<char>) -> bool {
    matches!(cell, Some(SHIP) | Some(HIT))
}

fn segment(before: bool, after: bool, orientation: Orientation) -> Segment {
    match (before, after) {
        (false, true) => Segment::Start(orientation),
        (true, true) => Segment::Middle(orientation),
        _ => Segment::End(orientation),
    }
}

/// `None` for water. Ships run in a straight line, so horizontal neighbours
/// take precedence over vertical ones.
pub fn segment_at(grid: &Grid, row: usize, col: usize) -> Option<Segment> {
    if !is_ship(grid.get(row, col)) {
        return None;
    }

    let neighbour = |row: Option<usize>, col: Option<usize>| match (row, col) {
        (Some(row), Some(col)) => is_ship(grid.get(row, col)),
        _ => false,
    };

    let left = neighbour(Some(row), col.checked_sub(1));
    let right = neighbour(Some(row), col.checked_add(1));
    let up = neighbour(row.checked_sub(1), Some(col));
    let down = neighbour(row.checked_add(1), Some(col));

    let segment = if left || right {
        segment(left, right, Orientation::Horizontal)
    } else if up || down {
        segment(up, down, Orientation::Vertical)
    } else {
        Segment::Single
    };

    Some(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows.iter().copied(), rows.len(), rows[0].len(), '.')
    }

    #[test]
    fn test_horizontal_ship() {
        let grid = grid(&["SHS.", "....", "...."]);

        assert_eq!(segment_at(&grid, 0, 0), Some(Segment::Start(Orientation::Horizontal)));
        assert_eq!(segment_at(&grid, 0, 1), Some(Segment::Middle(Orientation::Horizontal)));
        assert_eq!(segment_at(&grid, 0, 2), Some(Segment::End(Orientation::Horizontal)));
        assert_eq!(segment_at(&grid, 0, 3), None);
    }

    #[test]
    fn test_vertical_ship_and_single() {
        let grid = grid(&["S..S", "H...", "...."]);

        assert_eq!(segment_at(&grid, 0, 0).map(|s| s.glyph()), Some('^'));
        assert_eq!(segment_at(&grid, 1, 0).map(|s| s.glyph()), Some('v'));
        assert_eq!(segment_at(&grid, 0, 3), Some(Segment::Single));
    }

    #[test]
    fn test_misses_are_water() {
        let grid = grid(&["SM..", "....", "...."]);

        assert!(!is_ship(grid.get(0, 1)));
        assert_eq!(segment_at(&grid, 0, 0), Some(Segment::Single));
        assert_eq!(segment_at(&grid, 9, 9), None);
    }
}
