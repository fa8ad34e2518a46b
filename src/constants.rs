//! Constants for the pyramid layout, draw pile, scoring and search parameters.
//!
//! The pyramid is stored as a fixed 7x7 grid. Only the first `ROW_SIZES[row]`
//! columns of each row are part of the layout; row 0 is the bottom row.

// =============================================================================
// Pyramid Geometry
// =============================================================================

/// Number of rows in the pyramid.
pub const ROWS: usize = 7;

/// Width of the widest (bottom) row, used to size the backing grid.
pub const MAX_COLS: usize = 7;

/// Number of cells in each row, bottom (row 0) to top (row 6).
pub const ROW_SIZES: [usize; ROWS] = [7, 6, 5, 4, 3, 2, 1];

/// Total number of cards dealt onto the pyramid.
pub const PYRAMID_CARDS: usize = 28;

// =============================================================================
// Draw Pile
// =============================================================================

/// Maximum number of draw-pile segments.
pub const MAX_SEGMENTS: usize = 8;

/// Cards per draw-pile segment.
pub const SEGMENT_CAPACITY: usize = 3;

/// Maximum number of cards in the draw pile.
pub const DRAW_PILE_CARDS: usize = MAX_SEGMENTS * SEGMENT_CAPACITY;

// =============================================================================
// Cards
// =============================================================================

/// Lowest card value.
pub const MIN_CARD: u8 = 1;

/// The exempt card. It never pairs and can only be discarded on its own.
pub const EXEMPT_CARD: u8 = 13;

/// Two ordinary cards pair when their values add up to this.
pub const PAIR_SUM: u8 = 13;

/// Copies of each value in a full deck.
pub const COPIES_PER_VALUE: usize = 4;

// =============================================================================
// Scoring
// =============================================================================

/// Points per clearing move.
pub const MATCH_POINTS: i64 = 50;

/// Points per card left in hold and draw pile, only once the pyramid is cleared.
pub const LEFTOVER_POINTS: i64 = 50;

/// Penalty per redraw.
pub const REDRAW_PENALTY: i64 = 50;

/// Bonus for clearing the whole pyramid.
pub const COMPLETION_BONUS: i64 = 500;

/// Streak bonus step for streaks 2..=4 (bonus is `(streak - 1) * STREAK_STEP`).
pub const STREAK_STEP: i64 = 50;

/// Streak length from which the bonus is flat.
pub const STREAK_CAP: u32 = 5;

/// Flat bonus per clearing move once the streak reaches `STREAK_CAP`.
pub const STREAK_CAP_BONUS: i64 = 200;

/// Time remaining, fixed for scoring purposes.
pub const TIME_REMAINING: i64 = 120;

/// Multiplier applied to `TIME_REMAINING * completion`.
pub const TIME_MULTIPLIER: i64 = 6;

// =============================================================================
// Rollout Policy
// =============================================================================

/// Maximum number of moves in a single rollout.
pub const MAX_ROLLOUT_MOVES: usize = 200;

/// Probability of restricting the choice to clearing moves when any exist.
pub const PROB_PREFER_CLEARING: f64 = 0.8;

/// Default rollout budget for the command line.
pub const DEFAULT_ITERATIONS: usize = 100_000;
