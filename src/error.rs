//! Errors raised while setting up a puzzle or parsing move labels.
//!
//! Once a [`GameState`](crate::game::GameState) exists nothing here is
//! produced: applying a move never fails.

use crate::constants::{DRAW_PILE_CARDS, EXEMPT_CARD, MIN_CARD, PYRAMID_CARDS};

/// Result of validating puzzle input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The pyramid needs exactly `PYRAMID_CARDS` cards.
    PyramidCount(usize),
    /// The draw pile holds at most `DRAW_PILE_CARDS` cards.
    DrawPileOverflow(usize),
    /// A card value outside `MIN_CARD..=EXEMPT_CARD`.
    CardValue(u32),
    /// A card key or token that does not decode to a value.
    CardKey(String),
    /// A cell label with the wrong length.
    CellLength(String),
    /// A cell label whose row letter is outside `A..=G`.
    CellRow(String),
    /// A cell label whose column is not a number or exceeds the row.
    CellColumn(String),
    /// A move endpoint that is neither a cell nor a reserved token.
    Endpoint(String),
    /// A move that is not two endpoints.
    MoveFormat(String),
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::PyramidCount(n) => {
                write!(f, "pyramid must have {PYRAMID_CARDS} cards, got {n}")
            }
            SetupError::DrawPileOverflow(n) => {
                write!(f, "draw pile must have at most {DRAW_PILE_CARDS} cards, got {n}")
            }
            SetupError::CardValue(v) => {
                write!(f, "card value {v} out of range ({MIN_CARD}-{EXEMPT_CARD})")
            }
            SetupError::CardKey(s) => write!(f, "invalid card '{s}'"),
            SetupError::CellLength(s) => write!(f, "invalid cell reference length: '{s}'"),
            SetupError::CellRow(s) => write!(f, "invalid row in cell reference: '{s}'"),
            SetupError::CellColumn(s) => {
                write!(f, "column out of pyramid bounds in cell reference: '{s}'")
            }
            SetupError::Endpoint(s) => write!(f, "unknown move endpoint: '{s}'"),
            SetupError::MoveFormat(s) => {
                write!(f, "a move needs a source and a destination: '{s}'")
            }
        }
    }
}

impl std::error::Error for SetupError {}
