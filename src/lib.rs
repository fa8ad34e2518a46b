//! Pyramid-Solver: a Monte Carlo solver for a pyramid card-matching puzzle.
//!
//! Twenty-eight cards are laid out in a seven-row pyramid and the remaining
//! cards form a segmented draw pile. Cards pair when their values add up to
//! 13; the 13s are discarded on their own. The solver plays many randomized
//! playouts in parallel and keeps the highest-scoring move sequence.
//!
//! ## Modules
//!
//! - [`constants`] - Layout, scoring and policy parameters
//! - [`coord`] - Cell references and move labels
//! - [`draw_pile`] - Segmented draw pile with redraw and backfill rules
//! - [`game`] - Puzzle state, move execution and scoring
//! - [`movegen`] - Candidate move enumeration
//! - [`playout`] - Biased random playouts with reusable buffers
//! - [`search`] - Parallel playout search
//! - [`input`] - Card list decoding for the command line
//! - [`error`] - Setup errors
//!
//! ## Example
//!
//! ```
//! use pyramid_solver::game::GameState;
//! use pyramid_solver::search::{search, SearchConfig};
//!
//! let mut rng = fastrand::Rng::with_seed(1);
//! let puzzle = GameState::random(&mut rng);
//!
//! let config = SearchConfig::new(200).with_workers(2).with_seed(7);
//! let best = search(&puzzle, &config);
//! println!("Best score: {} in {} moves", best.score, best.moves.len());
//! ```

pub mod constants;
pub mod coord;
pub mod draw_pile;
pub mod error;
pub mod game;
pub mod input;
pub mod movegen;
pub mod playout;
pub mod search;

/// Pyramid cards of the built-in example puzzle, bottom row first.
pub const EXAMPLE_PYRAMID: [u8; 28] = [
    12, 10, 11, 6, 11, 7, 12, 11, 5, 1, 4, 1, 4, 5, 10, 8, 11, 9, 7, 2, 9, 6, 2, 13, 9, 10, 12, 13,
];

/// Draw-pile cards of the built-in example puzzle.
pub const EXAMPLE_DRAW: [u8; 24] = [
    6, 3, 8, 9, 3, 10, 2, 13, 6, 7, 1, 13, 12, 4, 1, 2, 3, 8, 5, 3, 5, 7, 3, 8,
];
