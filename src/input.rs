//! Card list decoding for the command line.
//!
//! Two formats are accepted:
//!
//! - Numbers separated by whitespace or commas: `"12 10 11 6"`
//! - One keyboard key per card, no separators: `"yrth"`
//!
//! Keys map to values along the home row and then the row above:
//! `a s d f g h j k l` = 1..9, `r t y u` = 10..13.

use crate::constants::{EXEMPT_CARD, MIN_CARD};
use crate::error::SetupError;
use crate::game::Card;

const KEYS: [char; 13] = ['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'r', 't', 'y', 'u'];

/// Decode a single keyboard key.
pub fn key_to_card(key: char) -> Option<Card> {
    let key = key.to_ascii_lowercase();
    KEYS.iter().position(|&k| k == key).map(|i| i as Card + 1)
}

/// Parse a list of cards in either supported format.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, SetupError> {
    if s.chars().any(|c| c.is_ascii_digit()) {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(parse_number)
            .collect()
    } else {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| key_to_card(c).ok_or_else(|| SetupError::CardKey(c.to_string())))
            .collect()
    }
}

fn parse_number(token: &str) -> Result<Card, SetupError> {
    let value: u32 = token
        .parse()
        .map_err(|_| SetupError::CardKey(token.to_string()))?;
    if !(u32::from(MIN_CARD)..=u32::from(EXEMPT_CARD)).contains(&value) {
        return Err(SetupError::CardValue(value));
    }
    Ok(value as Card)
}
