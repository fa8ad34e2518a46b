//! Randomized playouts.
//!
//! A playout starts from the template position and keeps choosing candidate
//! moves until the pyramid is cleared, no candidates remain, or
//! `MAX_ROLLOUT_MOVES` moves have been played. The policy is biased towards
//! clearing moves:
//!
//! - While the running score is exactly zero, pick uniformly among all candidates.
//! - Otherwise classify every candidate by trial-applying it to a scratch copy.
//!   With probability `PROB_PREFER_CLEARING` pick among the clearing ones (if
//!   any), else among all candidates.
//!
//! Each [`Simulator`] owns its rollout and scratch states for its whole
//! lifetime and resets them in place, so the inner loop does not allocate once
//! the move buffers have grown.

use crate::constants::{MAX_ROLLOUT_MOVES, PROB_PREFER_CLEARING};
use crate::coord::Move;
use crate::game::GameState;
use crate::movegen::generate_moves;

/// Outcome of a playout: final score and the moves that led to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rollout {
    pub score: u32,
    pub moves: Vec<Move>,
}

/// Per-worker playout engine with reusable buffers and its own RNG.
pub struct Simulator {
    /// State the playout is performed on.
    rollout: GameState,
    /// Disposable copy used to classify candidates.
    scratch: GameState,
    candidates: Vec<Move>,
    clearing: Vec<Move>,
    rng: fastrand::Rng,
}

impl Simulator {
    /// Allocate both state buffers from `template` and seed the RNG.
    pub fn new(template: &GameState, seed: u64) -> Self {
        Self {
            rollout: template.clone(),
            scratch: template.clone(),
            candidates: Vec::new(),
            clearing: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Restart the RNG stream.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    /// State at the end of the last playout.
    pub fn state(&self) -> &GameState {
        &self.rollout
    }

    /// Moves of the last playout.
    pub fn moves(&self) -> &[Move] {
        self.rollout.history()
    }

    /// Play one playout from `template` and return its final score.
    ///
    /// The move sequence is available from [`Simulator::moves`] until the next
    /// call.
    pub fn run(&mut self, template: &GameState) -> u32 {
        self.rollout.reset_from(template);

        while !self.rollout.is_solved() && self.rollout.history().len() < MAX_ROLLOUT_MOVES {
            generate_moves(&self.rollout, &mut self.candidates);
            if self.candidates.is_empty() {
                break;
            }
            let mv = self.choose();
            self.rollout.apply_move(mv);
        }

        self.rollout.score()
    }

    /// Run `count` playouts and keep the best one.
    ///
    /// Only a strictly higher score replaces the current best, so ties keep
    /// the earliest playout. Returns `None` when `count` is zero.
    pub fn best_of(&mut self, template: &GameState, count: usize) -> Option<Rollout> {
        let mut best: Option<Rollout> = None;
        for _ in 0..count {
            let score = self.run(template);
            match &mut best {
                Some(b) if score <= b.score => {}
                Some(b) => {
                    b.score = score;
                    b.moves.clear();
                    b.moves.extend_from_slice(self.rollout.history());
                }
                None => {
                    best = Some(Rollout {
                        score,
                        moves: self.rollout.history().to_vec(),
                    })
                }
            }
        }
        best
    }

    /// Pick the next move from `self.candidates`.
    fn choose(&mut self) -> Move {
        let all = &self.candidates;
        if self.rollout.score() == 0 {
            return all[self.rng.usize(..all.len())];
        }

        self.clearing.clear();
        for &mv in all {
            self.scratch.reset_from(&self.rollout);
            if self.scratch.apply_move(mv) {
                self.clearing.push(mv);
            }
        }

        if !self.clearing.is_empty() && self.rng.f64() < PROB_PREFER_CLEARING {
            self.clearing[self.rng.usize(..self.clearing.len())]
        } else {
            all[self.rng.usize(..all.len())]
        }
    }
}
