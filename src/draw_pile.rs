//! The segmented draw pile.
//!
//! The pile is a fixed array of `MAX_SEGMENTS` small stacks holding up to
//! `SEGMENT_CAPACITY` cards each. The last card of a segment is its top. A
//! cursor selects the current segment; the visible card is the top of the
//! current segment, or of the nearest non-empty segment before it.
//!
//! Storage is inline, so copying a pile never allocates.

use crate::constants::{DRAW_PILE_CARDS, MAX_SEGMENTS, SEGMENT_CAPACITY};
use crate::error::SetupError;

/// A bounded stack of at most `SEGMENT_CAPACITY` cards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    cards: [u8; SEGMENT_CAPACITY],
    len: u8,
}

impl Segment {
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cards from bottom to top.
    pub fn cards(&self) -> &[u8] {
        &self.cards[..self.len()]
    }

    #[inline]
    pub fn top(&self) -> Option<u8> {
        self.cards().last().copied()
    }

    /// Push a card; returns `false` if the segment is full.
    pub fn push(&mut self, card: u8) -> bool {
        if self.len() == SEGMENT_CAPACITY {
            return false;
        }
        self.cards[self.len()] = card;
        self.len += 1;
        true
    }

    pub fn pop(&mut self) -> Option<u8> {
        let card = self.top()?;
        self.len -= 1;
        Some(card)
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// The draw pile: segments, cursor and active-segment count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawPile {
    segments: [Segment; MAX_SEGMENTS],
    current: usize,
    active: usize,
}

impl DrawPile {
    /// An empty pile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack `cards` into segments of `SEGMENT_CAPACITY`, front to back.
    pub fn from_cards(cards: &[u8]) -> Result<Self, SetupError> {
        if cards.len() > DRAW_PILE_CARDS {
            return Err(SetupError::DrawPileOverflow(cards.len()));
        }
        let mut pile = DrawPile::new();
        pile.pack(cards);
        Ok(pile)
    }

    /// Pack a full pile. The array length makes this infallible.
    pub fn deal(cards: &[u8; DRAW_PILE_CARDS]) -> Self {
        let mut pile = DrawPile::new();
        pile.pack(cards);
        pile
    }

    /// Index of the current segment.
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of segments up to and including the last non-empty one.
    #[inline]
    pub fn active_segments(&self) -> usize {
        self.active
    }

    pub fn segments(&self) -> &[Segment; MAX_SEGMENTS] {
        &self.segments
    }

    /// Total number of cards left in the pile.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Segment::is_empty)
    }

    /// Index of the segment the visible card comes from.
    ///
    /// This is a pure lookup: it never re-trims the active-segment count.
    fn visible_segment(&self) -> Option<usize> {
        let current = self.current.min(MAX_SEGMENTS - 1);
        (0..=current).rev().find(|&i| !self.segments[i].is_empty())
    }

    /// The currently playable card, if any.
    pub fn visible(&self) -> Option<u8> {
        self.visible_segment().and_then(|i| self.segments[i].top())
    }

    /// Remove and return the visible card.
    ///
    /// Popping from the current segment leaves the active-segment count alone.
    /// Popping from an earlier segment (backfill) re-trims it immediately.
    pub fn take_visible(&mut self) -> Option<u8> {
        let seg = self.visible_segment()?;
        let card = self.segments[seg].pop();
        if seg != self.current {
            self.trim();
        }
        card
    }

    /// Move the cursor to the next segment, redrawing past the last active one.
    ///
    /// Returns `true` if a redraw happened.
    pub fn advance(&mut self) -> bool {
        self.current += 1;
        if self.current >= self.active {
            self.redraw();
            return true;
        }
        false
    }

    /// Repack the remaining cards front to back and rewind the cursor.
    fn redraw(&mut self) {
        let mut remaining = [0u8; DRAW_PILE_CARDS];
        let mut n = 0;
        for seg in &self.segments {
            for &card in seg.cards() {
                remaining[n] = card;
                n += 1;
            }
        }
        self.pack(&remaining[..n]);
    }

    /// Refill all segments from `cards`, reset the cursor and re-trim.
    fn pack(&mut self, cards: &[u8]) {
        for seg in &mut self.segments {
            seg.clear();
        }
        for (i, chunk) in cards.chunks(SEGMENT_CAPACITY).take(MAX_SEGMENTS).enumerate() {
            for &card in chunk {
                self.segments[i].push(card);
            }
        }
        self.current = 0;
        self.trim();
    }

    /// Recount active segments by dropping trailing empties.
    fn trim(&mut self) {
        self.active = MAX_SEGMENTS;
        while self.active > 0 && self.segments[self.active - 1].is_empty() {
            self.active -= 1;
        }
    }
}
