//! Cell references and move labels.
//!
//! A cell is written as a row letter followed by a 1-based column number.
//! Rows run from `A` (bottom, 7 cells) to `G` (top, 1 cell), so `A1` is the
//! bottom-left card and `G1` the apex.
//!
//! Moves are pairs of endpoints. Besides cells there are four reserved tokens:
//!
//! - `DRAW` - advance the draw pile (used as both source and destination)
//! - `HOLD` - the hold slot
//! - `PILE` - the currently visible draw-pile card
//! - `DISCARD` - discard the source card on its own

use std::fmt;
use std::str::FromStr;

use crate::constants::{PYRAMID_CARDS, ROWS, ROW_SIZES};
use crate::error::SetupError;

/// A validated position in the pyramid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    row: u8,
    col: u8,
}

/// Every cell in row-major order, bottom row first.
pub const ALL_CELLS: [Cell; PYRAMID_CARDS] = {
    let mut cells = [Cell { row: 0, col: 0 }; PYRAMID_CARDS];
    let mut k = 0;
    let mut row = 0;
    while row < ROWS {
        let mut col = 0;
        while col < ROW_SIZES[row] {
            cells[k] = Cell {
                row: row as u8,
                col: col as u8,
            };
            k += 1;
            col += 1;
        }
        row += 1;
    }
    cells
};

impl Cell {
    /// Create a cell, or `None` if `(row, col)` lies outside the pyramid.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < ROWS && col < ROW_SIZES[row] {
            Some(Cell {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// The two cells this one rests on, or `None` for the bottom row.
    pub fn supports(self) -> Option<[Cell; 2]> {
        if self.row == 0 {
            return None;
        }
        let row = self.row - 1;
        Some([
            Cell { row, col: self.col },
            Cell {
                row,
                col: self.col + 1,
            },
        ])
    }

    /// Parse a reference such as `"A1"` or `"g1"`.
    pub fn parse(s: &str) -> Result<Self, SetupError> {
        let bytes = s.as_bytes();
        if bytes.len() < 2 || bytes.len() > 3 {
            return Err(SetupError::CellLength(s.to_string()));
        }

        let row_char = bytes[0].to_ascii_uppercase();
        if !(b'A'..b'A' + ROWS as u8).contains(&row_char) {
            return Err(SetupError::CellRow(s.to_string()));
        }
        let row = (row_char - b'A') as usize;

        let digits = &s[1..];
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SetupError::CellColumn(s.to_string()));
        }
        let col: usize = digits
            .parse()
            .map_err(|_| SetupError::CellColumn(s.to_string()))?;
        if col == 0 {
            return Err(SetupError::CellColumn(s.to_string()));
        }

        Cell::new(row, col - 1).ok_or_else(|| SetupError::CellColumn(s.to_string()))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.row) as char, self.col + 1)
    }
}

impl FromStr for Cell {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cell::parse(s)
    }
}

/// One side of a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// A pyramid cell.
    Cell(Cell),
    /// Advance-the-draw-pile token.
    Draw,
    /// The hold slot.
    Hold,
    /// The visible draw-pile card.
    Pile,
    /// Discard-alone token.
    Discard,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Cell(cell) => write!(f, "{cell}"),
            Endpoint::Draw => f.write_str("DRAW"),
            Endpoint::Hold => f.write_str("HOLD"),
            Endpoint::Pile => f.write_str("PILE"),
            Endpoint::Discard => f.write_str("DISCARD"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAW" => Ok(Endpoint::Draw),
            "HOLD" => Ok(Endpoint::Hold),
            "PILE" => Ok(Endpoint::Pile),
            "DISCARD" => Ok(Endpoint::Discard),
            _ if s.len() <= 3 => Cell::parse(s).map(Endpoint::Cell),
            _ => Err(SetupError::Endpoint(s.to_string())),
        }
    }
}

/// A move: a source endpoint and a destination endpoint.
///
/// Any pair of endpoints can be expressed, legal or not. Illegal moves are
/// rejected silently when applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: Endpoint,
    pub dest: Endpoint,
}

impl Move {
    /// Advance the draw pile to the next segment.
    pub const ADVANCE: Move = Move {
        source: Endpoint::Draw,
        dest: Endpoint::Draw,
    };

    pub const fn new(source: Endpoint, dest: Endpoint) -> Self {
        Move { source, dest }
    }

    /// Discard the card at `source` on its own.
    pub const fn discard(source: Endpoint) -> Self {
        Move {
            source,
            dest: Endpoint::Discard,
        }
    }

    /// Human-readable description of the step.
    ///
    /// `cleared` is the result of applying the move. It separates a pair
    /// with the held card from a placement into the hold.
    pub fn describe(&self, cleared: bool) -> String {
        match (self.source, self.dest) {
            (Endpoint::Draw, Endpoint::Draw) => "DRAW".into(),
            (src, Endpoint::Discard) => format!("Discard {src}"),
            (src, Endpoint::Hold) if !cleared => format!("Move {src} to HOLD"),
            (src, dst) => format!("Match {src} and {dst}"),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.dest)
    }
}

impl FromStr for Move {
    type Err = SetupError;

    /// Parse two whitespace-separated endpoints, e.g. `"A1 HOLD"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) => Ok(Move::new(a.parse()?, b.parse()?)),
            _ => Err(SetupError::MoveFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_cells_row_major() {
        assert_eq!(ALL_CELLS[0], Cell::new(0, 0).unwrap());
        assert_eq!(ALL_CELLS[6], Cell::new(0, 6).unwrap());
        assert_eq!(ALL_CELLS[7], Cell::new(1, 0).unwrap());
        assert_eq!(ALL_CELLS[PYRAMID_CARDS - 1], Cell::new(6, 0).unwrap());
        for pair in ALL_CELLS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_parse_label_roundtrip() {
        for cell in ALL_CELLS {
            let label = cell.to_string();
            assert_eq!(Cell::parse(&label), Ok(cell), "roundtrip failed for {label}");
        }
    }

    #[test]
    fn test_parse_a1_is_bottom_left() {
        let cell = Cell::parse("A1").unwrap();
        assert_eq!((cell.row(), cell.col()), (0, 0));
        assert!(cell.supports().is_none());
        assert_eq!(Cell::parse("g1").unwrap(), Cell::new(6, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Cell::parse("A"), Err(SetupError::CellLength("A".into())));
        assert_eq!(Cell::parse("A123"), Err(SetupError::CellLength("A123".into())));
        assert_eq!(Cell::parse("H1"), Err(SetupError::CellRow("H1".into())));
        assert_eq!(Cell::parse("A8"), Err(SetupError::CellColumn("A8".into())));
        assert_eq!(Cell::parse("B7"), Err(SetupError::CellColumn("B7".into())));
        assert_eq!(Cell::parse("G2"), Err(SetupError::CellColumn("G2".into())));
        assert_eq!(Cell::parse("A0"), Err(SetupError::CellColumn("A0".into())));
        assert_eq!(Cell::parse("Ax"), Err(SetupError::CellColumn("Ax".into())));
        assert_eq!(Cell::parse("A+1"), Err(SetupError::CellColumn("A+1".into())));
        assert_eq!(Cell::parse("B 1"), Err(SetupError::CellColumn("B 1".into())));
    }

    #[test]
    fn test_supports() {
        let cell = Cell::parse("C2").unwrap();
        let [left, right] = cell.supports().unwrap();
        assert_eq!(left.to_string(), "B2");
        assert_eq!(right.to_string(), "B3");
    }

    #[test]
    fn test_move_parse_and_describe() {
        let mv: Move = "A1 hold".parse().unwrap();
        assert_eq!(mv.source, Endpoint::Cell(Cell::parse("A1").unwrap()));
        assert_eq!(mv.dest, Endpoint::Hold);
        assert_eq!(mv.describe(false), "Move A1 to HOLD");
        assert_eq!(mv.describe(true), "Match A1 and HOLD");
        assert_eq!(mv.to_string(), "A1 HOLD");

        let advance: Move = "DRAW DRAW".parse().unwrap();
        assert_eq!(advance, Move::ADVANCE);
        assert_eq!(advance.describe(false), "DRAW");

        assert_eq!(Move::discard(Endpoint::Pile).describe(true), "Discard PILE");
        assert!("A1".parse::<Move>().is_err());
        assert!("A1 B1 C1".parse::<Move>().is_err());
        assert!("A1 STOCK".parse::<Move>().is_err());
    }
}
