//! Candidate move generation.
//!
//! Moves are produced in a fixed order so that a rollout driven by a seeded
//! RNG is reproducible:
//!
//! 1. `DRAW DRAW` (always present)
//! 2. Discards of accessible exempt cards, row-major
//! 3. For each accessible ordinary card, row-major: pairs with later
//!    accessible cards, a pair with the hold, a pair with the visible draw
//!    card, then a move into an empty hold
//! 4. Hold with visible draw card, visible draw card into an empty hold,
//!    discard of an exempt visible draw card

use crate::constants::{EXEMPT_CARD, PYRAMID_CARDS};
use crate::coord::{ALL_CELLS, Endpoint, Move};
use crate::game::{Card, GameState, is_match};

/// Fill `out` with every candidate move for `state`.
///
/// `out` is cleared first so the same buffer can be reused across calls.
pub fn generate_moves(state: &GameState, out: &mut Vec<Move>) {
    out.clear();
    out.push(Move::ADVANCE);

    let mut cells = [(ALL_CELLS[0], 0 as Card); PYRAMID_CARDS];
    let mut n = 0;
    for cell in state.accessible_cells() {
        if let Some(card) = state.card(cell) {
            cells[n] = (cell, card);
            n += 1;
        }
    }
    let accessible = &cells[..n];

    for &(cell, card) in accessible {
        if card == EXEMPT_CARD {
            out.push(Move::discard(Endpoint::Cell(cell)));
        }
    }

    let hold = state.hold();
    let visible = state.visible_card();

    for (i, &(cell, card)) in accessible.iter().enumerate() {
        if card == EXEMPT_CARD {
            continue;
        }
        let from = Endpoint::Cell(cell);

        for &(other, other_card) in &accessible[i + 1..] {
            if is_match(card, other_card) {
                out.push(Move::new(from, Endpoint::Cell(other)));
            }
        }
        if hold.is_some_and(|h| is_match(card, h)) {
            out.push(Move::new(from, Endpoint::Hold));
        }
        if visible.is_some_and(|v| is_match(card, v)) {
            out.push(Move::new(from, Endpoint::Pile));
        }
        if hold.is_none() {
            out.push(Move::new(from, Endpoint::Hold));
        }
    }

    if let (Some(h), Some(v)) = (hold, visible) {
        if is_match(h, v) {
            out.push(Move::new(Endpoint::Hold, Endpoint::Pile));
        }
    }
    match visible {
        Some(EXEMPT_CARD) => out.push(Move::discard(Endpoint::Pile)),
        Some(_) if hold.is_none() => out.push(Move::new(Endpoint::Pile, Endpoint::Hold)),
        _ => {}
    }
}

/// Convenience wrapper returning a fresh vector.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    generate_moves(state, &mut moves);
    moves
}
