//! Building blocks for the compact single-line state encoding.
//!
//! A state string is a `|`-separated list of `KEY:value` segments. Each field
//! has its own sub-grammar and a total default, so a malformed field never
//! prevents the rest of the snapshot from decoding.

use std::collections::HashMap;

use log::debug;

use crate::Grid;

/// Marks a field as explicitly empty.
pub const SENTINEL: &str = "-";

pub const SEGMENT_SEPARATOR: char = '|';
pub const KEY_SEPARATOR: char = ':';
pub const LIST_SEPARATOR: char = ',';
pub const ROW_SEPARATOR: char = '/';
pub const RECORD_SEPARATOR: char = ';';
pub const COMPONENT_SEPARATOR: char = '@';

/// Key/value view over a state string. The last occurrence of a key wins and
/// segments without a `:` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segments<'a> {
    parts: HashMap<&'a str, &'a str>,
}

impl<'a> Segments<'a> {
    pub fn parse(state: &'a str) -> Self {
        let parts = state
            .split(SEGMENT_SEPARATOR)
            .filter_map(|segment| segment.split_once(KEY_SEPARATOR))
            .collect();

        Self { parts }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.parts.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Raw text of `key`, or `default` when the key is absent or empty.
    pub fn text(&self, key: &str, default: &str) -> String {
        self.get(key)
            .filter(|value| !value.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    /// Like [`Segments::text`] but the sentinel also reads as absent.
    pub fn optional_text(&self, key: &str) -> Option<String> {
        present(self.get(key)).map(str::to_string)
    }

    pub fn list(&self, key: &str) -> Vec<String> {
        parse_list(self.get(key))
    }

    pub fn count(&self, key: &str) -> u64 {
        parse_count(self.get(key))
    }

    pub fn amount(&self, key: &str) -> f64 {
        parse_amount(self.get(key))
    }

    pub fn grid(&self, key: &str, rows: usize, cols: usize, empty: char) -> Grid {
        parse_grid(self.get(key), rows, cols, empty)
    }

    pub fn records(&self, key: &str) -> Vec<Record> {
        parse_records(self.get(key))
    }
}

/// `None` for an absent, empty or sentinel value.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty() && *value != SENTINEL)
}

/// Comma-separated tokens with empty tokens dropped.
pub fn parse_list(value: Option<&str>) -> Vec<String> {
    match present(value) {
        Some(value) => value
            .split(LIST_SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Non-negative integer; anything unparsable or negative reads as `0`.
pub fn parse_count(value: Option<&str>) -> u64 {
    let Some(value) = present(value) else {
        return 0;
    };

    match value.trim().parse::<i64>() {
        Ok(count) if count >= 0 => count as u64,
        Ok(_) => 0,
        Err(_) => {
            debug!("Ignoring malformed count {:?}", value);
            0
        }
    }
}

/// Non-negative decimal amount; anything unparsable, non-finite or negative
/// reads as `0.0`.
pub fn parse_amount(value: Option<&str>) -> f64 {
    let Some(value) = present(value) else {
        return 0.0;
    };

    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => {
            debug!("Ignoring malformed amount {:?}", value);
            0.0
        }
    }
}

/// `/`-separated rows of single-character cells.
///
/// A row count other than `rows` yields the all-empty grid. Rows of the wrong
/// width are padded or truncated so the dimensions always hold.
pub fn parse_grid(value: Option<&str>, rows: usize, cols: usize, empty: char) -> Grid {
    let Some(value) = present(value) else {
        return Grid::filled(rows, cols, empty);
    };

    let parts = value.split(ROW_SEPARATOR).collect::<Vec<_>>();
    if parts.len() != rows {
        debug!("Expected {} rows but found {}; using an empty grid", rows, parts.len());
        return Grid::filled(rows, cols, empty);
    }

    Grid::from_rows(parts, rows, cols, empty)
}

/// One `@`-delimited sub-record of a compound field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    components: Vec<String>,
}

impl Record {
    pub fn parse(chunk: &str) -> Self {
        Self {
            components: chunk
                .split(COMPONENT_SEPARATOR)
                .map(str::to_string)
                .collect(),
        }
    }

    /// Positional component, `None` when missing or empty.
    pub fn component(&self, index: usize) -> Option<&str> {
        self.components
            .get(index)
            .map(String::as_str)
            .filter(|component| !component.is_empty())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// `;`-separated records, each split on `@`.
pub fn parse_records(value: Option<&str>) -> Vec<Record> {
    match present(value) {
        Some(value) => value.split(RECORD_SEPARATOR).map(Record::parse).collect(),
        None => Vec::new(),
    }
}

/// Piece placement rows of a FEN string (the text before the first space).
///
/// A digit `1`-`9` expands to that many empty squares; any other character is
/// one occupied square. Run lengths are not validated.
pub fn parse_fen_placement(fen: &str) -> Vec<Vec<Option<char>>> {
    let placement = fen.split(' ').next().unwrap_or_default();

    placement
        .split(ROW_SEPARATOR)
        .map(|row| {
            let mut squares = Vec::new();
            for c in row.chars() {
                match c.to_digit(10) {
                    Some(run) if run > 0 => squares.extend((0..run).map(|_| None)),
                    _ => squares.push(Some(c)),
                }
            }
            squares
        })
        .collect()
}

/// Joins list tokens, writing the sentinel for an empty list.
pub fn encode_list<S: AsRef<str>>(values: &[S]) -> String {
    if values.is_empty() {
        return SENTINEL.to_string();
    }

    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

/// Joins `KEY:value` segments into a state string.
pub fn encode_segments<K: AsRef<str>, V: AsRef<str>>(segments: &[(K, V)]) -> String {
    segments
        .iter()
        .map(|(key, value)| format!("{}{}{}", key.as_ref(), KEY_SEPARATOR, value.as_ref()))
        .collect::<Vec<_>>()
        .join(&SEGMENT_SEPARATOR.to_string())
}

/// Formats an amount without a trailing `.0` for whole numbers.
pub fn encode_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        format!("{}", amount as i64)
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_split_on_first_colon() {
        let segments = Segments::parse("LA:pit3:capture|T:player");

        assert_eq!(segments.get("LA"), Some("pit3:capture"));
        assert_eq!(segments.get("T"), Some("player"));
    }

    #[test]
    fn test_segments_last_duplicate_wins_and_separatorless_ignored() {
        let segments = Segments::parse("T:player|garbage|T:opponent");

        assert_eq!(segments.len(), 1);
        assert_eq!(segments.get("T"), Some("opponent"));
    }

    #[test]
    fn test_segments_text_default() {
        let segments = Segments::parse("T:|ST:game_over|LA:-");

        assert_eq!(segments.text("T", "player"), "player");
        assert_eq!(segments.text("ST", "in_progress"), "game_over");
        assert_eq!(segments.text("LA", "-"), "-");
        assert_eq!(segments.optional_text("LA"), None);
        assert_eq!(segments.text("W", "-"), "-");
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(Some("AS,,KH,")), vec!["AS", "KH"]);
        assert!(parse_list(Some("-")).is_empty());
        assert!(parse_list(None).is_empty());
    }

    #[test]
    fn test_parse_count_is_total() {
        assert_eq!(parse_count(Some("120")), 120);
        assert_eq!(parse_count(Some("abc")), 0);
        assert_eq!(parse_count(Some("-5")), 0);
        assert_eq!(parse_count(Some("1.5")), 0);
        assert_eq!(parse_count(Some("-")), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn test_malformed_stack_segment_decodes_to_zero() {
        assert_eq!(Segments::parse("BK:abc|B:10").count("BK"), 0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Some("12.5")), 12.5);
        assert_eq!(parse_amount(Some("NaN")), 0.0);
        assert_eq!(parse_amount(Some("-3")), 0.0);
        assert_eq!(parse_amount(Some("x")), 0.0);
    }

    #[test]
    fn test_parse_grid_wrong_row_count_is_empty_grid() {
        let grid = parse_grid(Some("XO./..."), 3, 3, '.');

        assert_eq!(grid, Grid::filled(3, 3, '.'));
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
    }

    #[test]
    fn test_parse_grid() {
        let grid = parse_grid(Some("X../.O./..X"), 3, 3, '.');

        assert_eq!(grid[(0, 0)], 'X');
        assert_eq!(grid[(1, 1)], 'O');
        assert_eq!(grid[(2, 2)], 'X');
    }

    #[test]
    fn test_parse_records_missing_components() {
        let records = parse_records(Some("AS,KH@active@0@25;9C,9D@stood"));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].component(3), Some("25"));
        assert_eq!(records[1].component(1), Some("stood"));
        assert_eq!(records[1].component(2), None);
        assert_eq!(records[1].component(3), None);
    }

    #[test]
    fn test_parse_fen_placement() {
        let rows = parse_fen_placement("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0][0], Some('r'));
        assert!(rows[2].iter().all(Option::is_none));
        assert_eq!(rows[4], vec![None, None, None, None, Some('P'), None, None, None]);
        assert_eq!(rows[6][4], None);
    }

    #[test]
    fn test_encoders() {
        assert_eq!(encode_list::<&str>(&[]), "-");
        assert_eq!(encode_list(&["7", "BAR"]), "7,BAR");
        assert_eq!(encode_segments(&[("T", "player"), ("ST", "in_progress")]), "T:player|ST:in_progress");
        assert_eq!(encode_amount(10.0), "10");
        assert_eq!(encode_amount(2.5), "2.5");
        assert_eq!(encode_amount(1e20), "100000000000000000000");
    }
}
