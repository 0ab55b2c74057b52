//! Cell position and sheet size types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

const LETTERS: i32 = 26;
const MAX_POSITION_LENGTH: usize = 17;
const MAX_POS_LETTER_COUNT: usize = 3;

/// A cell position (0-based row and column)
///
/// Positions are displayed in A1 notation: column letters (A-XFD) followed
/// by a 1-based row number. [`Position::NONE`] stands for "no position" and
/// is never valid.
///
/// Ordering is lexicographic by row, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: i32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: i32,
}

impl Position {
    /// Sentinel for "no position"
    pub const NONE: Position = Position { row: -1, col: -1 };

    /// Create a new position
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Check whether the position lies inside the sheet bounds
    pub fn is_valid(&self) -> bool {
        (0..MAX_ROWS).contains(&self.row) && (0..MAX_COLS).contains(&self.col)
    }

    /// Parse a position from A1-style notation
    ///
    /// Returns [`Position::NONE`] on any malformed or out-of-range input.
    ///
    /// # Examples
    /// ```
    /// use sheetcalc_core::Position;
    ///
    /// assert_eq!(Position::parse("A1"), Position::new(0, 0));
    /// assert_eq!(Position::parse("AA27"), Position::new(26, 26));
    /// assert_eq!(Position::parse("a1"), Position::NONE);
    /// assert_eq!(Position::parse("A0"), Position::NONE);
    /// ```
    pub fn parse(s: &str) -> Position {
        Self::parse_a1(s).unwrap_or(Position::NONE)
    }

    fn parse_a1(s: &str) -> Option<Position> {
        if s.is_empty() || s.len() > MAX_POSITION_LENGTH {
            return None;
        }

        let bytes = s.as_bytes();
        let letter_count = bytes.iter().take_while(|b| b.is_ascii_uppercase()).count();
        if letter_count == 0 || letter_count > MAX_POS_LETTER_COUNT {
            return None;
        }

        let digits = &bytes[letter_count..];
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }

        let col = Self::letters_to_column(&s[..letter_count])?;
        let row: i64 = s[letter_count..].parse().ok()?;
        if row < 1 || row > i64::from(MAX_ROWS) {
            return None;
        }

        let pos = Position::new(row as i32 - 1, col);
        pos.is_valid().then_some(pos)
    }

    /// Convert uppercase column letters to an index (A = 0, Z = 25, AA = 26)
    fn letters_to_column(letters: &str) -> Option<i32> {
        let mut col: i32 = 0;
        for c in letters.bytes() {
            col = col
                .checked_mul(LETTERS)?
                .checked_add(i32::from(c - b'A') + 1)?;
        }
        Some(col - 1)
    }

    /// Convert a column index to letters (0 = A, 25 = Z, 26 = AA)
    ///
    /// Negative indices have no letters and yield an empty string.
    pub fn column_to_letters(col: i32) -> String {
        let letters = i64::from(LETTERS);
        let mut result = String::new();
        let mut n = i64::from(col) + 1;

        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % letters) as u8) as char);
            n /= letters;
        }

        result
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::NONE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_a1(s).ok_or(Error::InvalidPosition(Position::NONE))
    }
}

/// Dimensions of the printable area of a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Position::column_to_letters(0), "A");
        assert_eq!(Position::column_to_letters(25), "Z");
        assert_eq!(Position::column_to_letters(26), "AA");
        assert_eq!(Position::column_to_letters(701), "ZZ");
        assert_eq!(Position::column_to_letters(702), "AAA");
        assert_eq!(Position::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_column_to_letters_extremes() {
        assert_eq!(Position::column_to_letters(i32::MAX), "FXSHRXX");
        assert_eq!(Position::column_to_letters(-1), "");
        assert_eq!(Position::column_to_letters(i32::MIN), "");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Position::parse("A1"), Position::new(0, 0));
        assert_eq!(Position::parse("B12"), Position::new(11, 1));
        assert_eq!(Position::parse("Z1"), Position::new(0, 25));
        assert_eq!(Position::parse("AA1"), Position::new(0, 26));
        assert_eq!(Position::parse("XFD16384"), Position::new(16383, 16383));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "", "A", "1", "1A", "A1A", "a1", "A-1", "A 1", "A0", "ABCD1", "XFE1", "A16385",
            "A123456789012345678",
        ] {
            assert_eq!(Position::parse(input), Position::NONE, "input {input:?}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(0, 0).to_string(), "A1");
        assert_eq!(Position::new(99, 2).to_string(), "C100");
        assert_eq!(Position::NONE.to_string(), "");
        assert_eq!(Position::new(MAX_ROWS, 0).to_string(), "");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("C3".parse::<Position>().unwrap(), Position::new(2, 2));
        assert_eq!(
            "C".parse::<Position>(),
            Err(Error::InvalidPosition(Position::NONE))
        );
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 5), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_validity() {
        assert!(Position::new(0, 0).is_valid());
        assert!(!Position::NONE.is_valid());
        assert!(!Position::new(0, MAX_COLS).is_valid());
        assert!(!Position::new(-1, 0).is_valid());
    }
}
