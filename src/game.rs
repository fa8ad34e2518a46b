//! Puzzle state and move execution.
//!
//! This module provides the core game logic, including:
//! - The pyramid stored as a fixed grid with a row-length table
//! - The hold slot and the segmented draw pile
//! - Move application with silent rejection of illegal moves
//! - Streak tracking and scoring
//!
//! A [`GameState`] is built once per puzzle and then used as a read-only
//! template. Search workers copy it into long-lived buffers with
//! [`GameState::reset_from`], which never reallocates.

use std::fmt;

use crate::constants::*;
use crate::coord::{ALL_CELLS, Cell, Endpoint, Move};
use crate::draw_pile::DrawPile;
use crate::error::SetupError;

/// A card value in `MIN_CARD..=EXEMPT_CARD`.
pub type Card = u8;

/// Check whether two cards form a matching pair.
///
/// Ordinary cards pair when their values add up to `PAIR_SUM`. The exempt
/// card never pairs.
#[inline]
pub fn is_match(a: Card, b: Card) -> bool {
    let ordinary = MIN_CARD..EXEMPT_CARD;
    ordinary.contains(&a) && ordinary.contains(&b) && a + b == PAIR_SUM
}

/// Cards in a full deck; exactly enough for the pyramid and the draw pile.
pub const DECK_CARDS: usize = PYRAMID_CARDS + DRAW_PILE_CARDS;

const _: () = assert!(COPIES_PER_VALUE * EXEMPT_CARD as usize == DECK_CARDS);

/// A full deck: four copies of every value, exempt cards included, in value order.
pub fn full_deck() -> [Card; DECK_CARDS] {
    std::array::from_fn(|i| MIN_CARD + (i / COPIES_PER_VALUE) as Card)
}

/// The puzzle state: pyramid, hold, draw pile, score counters and move log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Card per cell, `None` once cleared. Only `ROW_SIZES[row]` columns are used.
    pyramid: [[Option<Card>; MAX_COLS]; ROWS],
    hold: Option<Card>,
    pile: DrawPile,
    matches: u32,
    streak: u32,
    streak_bonus: i64,
    redraws: u32,
    time_remaining: i64,
    /// Every move applied since setup or the last reset.
    history: Vec<Move>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// An empty state: no cards anywhere.
    pub fn new() -> Self {
        GameState {
            pyramid: [[None; MAX_COLS]; ROWS],
            hold: None,
            pile: DrawPile::new(),
            matches: 0,
            streak: 0,
            streak_bonus: 0,
            redraws: 0,
            time_remaining: TIME_REMAINING,
            history: Vec::new(),
        }
    }

    /// Set up a puzzle from explicit card lists.
    ///
    /// `pyramid` fills the cells row by row, bottom row first. `draw` is packed
    /// into segments of `SEGMENT_CAPACITY` in the order given.
    ///
    /// # Errors
    /// - [`SetupError::PyramidCount`] unless exactly `PYRAMID_CARDS` are given
    /// - [`SetupError::DrawPileOverflow`] if `draw` exceeds `DRAW_PILE_CARDS`
    /// - [`SetupError::CardValue`] for any value outside `1..=13`
    pub fn from_cards(pyramid: &[Card], draw: &[Card]) -> Result<Self, SetupError> {
        if pyramid.len() != PYRAMID_CARDS {
            return Err(SetupError::PyramidCount(pyramid.len()));
        }
        if draw.len() > DRAW_PILE_CARDS {
            return Err(SetupError::DrawPileOverflow(draw.len()));
        }
        if let Some(&bad) = pyramid
            .iter()
            .chain(draw)
            .find(|&&v| !(MIN_CARD..=EXEMPT_CARD).contains(&v))
        {
            return Err(SetupError::CardValue(u32::from(bad)));
        }

        let mut state = GameState::new();
        for (cell, &card) in ALL_CELLS.iter().zip(pyramid) {
            state.pyramid[cell.row()][cell.col()] = Some(card);
        }
        state.pile = DrawPile::from_cards(draw)?;
        Ok(state)
    }

    /// Deal a shuffled full deck: `PYRAMID_CARDS` to the pyramid, the rest to the pile.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        let mut deck = full_deck();
        rng.shuffle(&mut deck);

        let mut state = GameState::new();
        for (cell, &card) in ALL_CELLS.iter().zip(&deck) {
            state.pyramid[cell.row()][cell.col()] = Some(card);
        }
        let draw: [Card; DRAW_PILE_CARDS] = std::array::from_fn(|i| deck[PYRAMID_CARDS + i]);
        state.pile = DrawPile::deal(&draw);
        state
    }

    /// Copy every field of `template` into `self`, keeping `self`'s allocations.
    ///
    /// The move log is cleared, not copied.
    pub fn reset_from(&mut self, template: &GameState) {
        self.pyramid = template.pyramid;
        self.hold = template.hold;
        self.pile = template.pile;
        self.matches = template.matches;
        self.streak = template.streak;
        self.streak_bonus = template.streak_bonus;
        self.redraws = template.redraws;
        self.time_remaining = template.time_remaining;
        self.history.clear();
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// Card at `cell`, or `None` if cleared.
    #[inline]
    pub fn card(&self, cell: Cell) -> Option<Card> {
        self.pyramid[cell.row()][cell.col()]
    }

    #[inline]
    pub fn hold(&self) -> Option<Card> {
        self.hold
    }

    pub fn pile(&self) -> &DrawPile {
        &self.pile
    }

    pub fn redraws(&self) -> u32 {
        self.redraws
    }

    pub fn active_segments(&self) -> usize {
        self.pile.active_segments()
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn streak_bonus(&self) -> i64 {
        self.streak_bonus
    }

    /// Moves applied since setup or the last reset.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The playable draw-pile card. Never mutates the pile.
    #[inline]
    pub fn visible_card(&self) -> Option<Card> {
        self.pile.visible()
    }

    /// A cell is accessible if it holds a card and nothing rests on its supports.
    pub fn is_accessible(&self, cell: Cell) -> bool {
        if self.card(cell).is_none() {
            return false;
        }
        match cell.supports() {
            None => true,
            Some([left, right]) => self.card(left).is_none() && self.card(right).is_none(),
        }
    }

    /// Accessible cells in row-major order.
    pub fn accessible_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        ALL_CELLS.into_iter().filter(|&c| self.is_accessible(c))
    }

    /// Number of cleared pyramid cells.
    pub fn cleared_cells(&self) -> usize {
        ALL_CELLS.iter().filter(|&&c| self.card(c).is_none()).count()
    }

    /// The puzzle is solved once the pyramid is empty.
    pub fn is_solved(&self) -> bool {
        ALL_CELLS.iter().all(|&c| self.card(c).is_none())
    }

    /// Compute the current score.
    ///
    /// - `MATCH_POINTS` per clearing move
    /// - `LEFTOVER_POINTS` per card left in hold and pile, only when solved
    /// - minus `REDRAW_PENALTY` per redraw
    /// - the accumulated streak bonus
    /// - `COMPLETION_BONUS` when solved
    /// - `floor(time_remaining * cleared / PYRAMID_CARDS * TIME_MULTIPLIER)`
    ///
    /// The total is clamped at zero.
    pub fn score(&self) -> u32 {
        let cleared = self.cleared_cells() as i64;
        let mut total = MATCH_POINTS * self.matches as i64
            - REDRAW_PENALTY * self.redraws as i64
            + self.streak_bonus
            + self.time_remaining * TIME_MULTIPLIER * cleared / PYRAMID_CARDS as i64;

        if cleared == PYRAMID_CARDS as i64 {
            let leftovers = self.pile.len() as i64 + self.hold.is_some() as i64;
            total += LEFTOVER_POINTS * leftovers + COMPLETION_BONUS;
        }

        total.max(0) as u32
    }

    // =========================================================================
    // Move execution
    // =========================================================================

    /// Apply a move. Returns `true` if it cleared at least one card.
    ///
    /// Illegal moves never fail: they leave cards and counters alone (apart
    /// from the streak reset of the fallback case) and return `false`.
    ///
    /// - `DRAW DRAW` advances the pile, redrawing past the last segment, and
    ///   breaks the streak.
    /// - `X DISCARD` removes an exempt card on its own.
    /// - Two endpoints whose cards pair are both removed.
    /// - `X HOLD` with an empty hold moves the card into the hold without
    ///   touching the streak.
    /// - Anything else breaks the streak.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        self.history.push(mv);

        match (mv.source, mv.dest) {
            (Endpoint::Draw, Endpoint::Draw) => {
                if self.pile.advance() {
                    self.redraws += 1;
                }
                self.streak = 0;
                false
            }
            (src, Endpoint::Discard) => {
                if self.playable(src) != Some(EXEMPT_CARD) {
                    return false;
                }
                self.take(src);
                self.record_clear();
                true
            }
            (src, dst) => {
                let source_card = self.playable(src);
                if let (Some(a), Some(b)) = (source_card, self.playable(dst)) {
                    if is_match(a, b) {
                        self.take(src);
                        self.take(dst);
                        self.record_clear();
                        return true;
                    }
                }

                if dst == Endpoint::Hold && src != Endpoint::Hold && self.hold.is_none() {
                    if let Some(card) = source_card {
                        self.take(src);
                        self.hold = Some(card);
                        return false;
                    }
                }

                self.streak = 0;
                false
            }
        }
    }

    /// Card that can currently be played from `endpoint`.
    ///
    /// Covered pyramid cards and the two tokens yield `None`.
    fn playable(&self, endpoint: Endpoint) -> Option<Card> {
        match endpoint {
            Endpoint::Cell(cell) if self.is_accessible(cell) => self.card(cell),
            Endpoint::Hold => self.hold,
            Endpoint::Pile => self.pile.visible(),
            _ => None,
        }
    }

    /// Remove the card at `endpoint`.
    fn take(&mut self, endpoint: Endpoint) {
        match endpoint {
            Endpoint::Cell(cell) => self.pyramid[cell.row()][cell.col()] = None,
            Endpoint::Hold => self.hold = None,
            Endpoint::Pile => {
                self.pile.take_visible();
            }
            Endpoint::Draw | Endpoint::Discard => {}
        }
    }

    /// Bump match and streak counters and add the streak bonus.
    fn record_clear(&mut self) {
        self.matches += 1;
        self.streak += 1;
        self.streak_bonus += match self.streak {
            0 | 1 => 0,
            s if s >= STREAK_CAP => STREAK_CAP_BONUS,
            s => (s - 1) as i64 * STREAK_STEP,
        };
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pyramid:")?;
        for row in (0..ROWS).rev() {
            write!(f, "{}{} ", (b'A' + row as u8) as char, "  ".repeat(row))?;
            for col in 0..ROW_SIZES[row] {
                match self.pyramid[row][col] {
                    Some(card) => write!(f, "{card:2}  ")?,
                    None => write!(f, "--  ")?,
                }
            }
            writeln!(f)?;
        }

        match self.hold {
            Some(card) => writeln!(f, "\nHold: {card}")?,
            None => writeln!(f, "\nHold: -")?,
        }

        writeln!(f, "\nDraw pile:")?;
        for (i, seg) in self.pile.segments()[..self.active_segments()].iter().enumerate() {
            write!(f, "Segment {}: ", i + 1)?;
            for card in seg.cards() {
                write!(f, "{card:2} ")?;
            }
            if i == self.pile.current() {
                write!(f, "(current)")?;
            }
            writeln!(f)?;
        }
        if let Some(card) = self.visible_card() {
            writeln!(f, "Visible: {card}")?;
        }

        writeln!(f, "\nMatches: {}", self.matches)?;
        writeln!(f, "Streak: {}", self.streak)?;
        writeln!(f, "Streak bonus: {}", self.streak_bonus)?;
        writeln!(f, "Redraws: {}", self.redraws)?;
        writeln!(f, "Score: {}", self.score())?;
        writeln!(f, "Solved: {}", self.is_solved())
    }
}
