use std::fmt::{self, Display, Formatter};
use std::ops::Index;

/// Fixed-size board of single-character cell codes, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<char>,
}

impl Grid {
    pub fn filled(rows: usize, cols: usize, cell: char) -> Self {
        Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        }
    }

    /// Builds a grid from textual rows, padding or truncating each row to `cols`.
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = &'a str>,
        height: usize,
        cols: usize,
        empty: char,
    ) -> Self {
        let mut grid = Self::filled(height, cols, empty);

        for (row, text) in rows.into_iter().take(height).enumerate() {
            for (col, cell) in text.chars().take(cols).enumerate() {
                grid.cells[row * cols + col] = cell;
            }
        }

        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[char] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    pub fn count(&self, cell: char) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = char;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.cells[row * self.cols + col]
    }
}

/// Encodes rows separated by `/`, the inverse of [`crate::parse_grid`].
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, row) in self.iter_rows().enumerate() {
            if index > 0 {
                write!(f, "/")?;
            }
            for cell in row {
                write!(f, "{}", cell)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pads_and_truncates() {
        let grid = Grid::from_rows(["XO", "XOXO", ""], 3, 3, '.');

        assert_eq!(grid.row(0), &['X', 'O', '.']);
        assert_eq!(grid.row(1), &['X', 'O', 'X']);
        assert_eq!(grid.row(2), &['.', '.', '.']);
        assert_eq!(grid.to_string(), "XO./XOX/...");
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::filled(2, 2, '.');

        assert_eq!(grid.get(1, 1), Some('.'));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid[(0, 1)], '.');
        assert_eq!(grid.count('.'), 4);
    }
}
