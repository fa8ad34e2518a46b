//! Integration tests for pyramid-solver
//!
//! These exercise the public API end to end: puzzle setup, move execution,
//! move generation, playouts and the parallel search.

use pyramid_solver::constants::{MAX_ROLLOUT_MOVES, PYRAMID_CARDS};
use pyramid_solver::coord::{ALL_CELLS, Cell, Endpoint, Move};
use pyramid_solver::error::SetupError;
use pyramid_solver::game::{Card, GameState, is_match};
use pyramid_solver::movegen::legal_moves;
use pyramid_solver::playout::Simulator;
use pyramid_solver::search::{SearchConfig, search};
use pyramid_solver::{EXAMPLE_DRAW, EXAMPLE_PYRAMID};

// =============================================================================
// Helper functions
// =============================================================================

fn cell(s: &str) -> Cell {
    Cell::parse(s).unwrap()
}

fn at(s: &str) -> Endpoint {
    Endpoint::Cell(cell(s))
}

fn example() -> GameState {
    GameState::from_cards(&EXAMPLE_PYRAMID, &EXAMPLE_DRAW).unwrap()
}

/// Apply random candidate moves, calling `check(before, after, move, cleared)` after each.
fn random_walk(seed: u64, steps: usize, mut check: impl FnMut(&GameState, &GameState, Move, bool)) {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut state = GameState::random(&mut rng);
    for _ in 0..steps {
        if state.is_solved() {
            break;
        }
        let moves = legal_moves(&state);
        let mv = moves[rng.usize(..moves.len())];
        let before = state.clone();
        let cleared = state.apply_move(mv);
        check(&before, &state, mv, cleared);
    }
}

/// Accessibility computed directly from the support rule.
fn expected_accessible(state: &GameState, row: usize, col: usize) -> bool {
    let occupied = |r: usize, c: usize| state.card(Cell::new(r, c).unwrap()).is_some();
    occupied(row, col) && (row == 0 || (!occupied(row - 1, col) && !occupied(row - 1, col + 1)))
}

// =============================================================================
// Setup
// =============================================================================

#[test]
fn test_example_puzzle_setup() {
    let state = example();
    assert_eq!(state.card(cell("A1")), Some(12));
    assert_eq!(state.card(cell("G1")), Some(13));
    assert_eq!(state.hold(), None);
    assert_eq!(state.active_segments(), 8);
    assert_eq!(state.visible_card(), Some(8));
    assert_eq!(state.redraws(), 0);
    assert!(!state.is_solved());
    assert_eq!(state.score(), 0);
}

#[test]
fn test_setup_errors_are_descriptive() {
    let err = GameState::from_cards(&EXAMPLE_PYRAMID[..27], &[]).unwrap_err();
    assert_eq!(err, SetupError::PyramidCount(27));
    assert_eq!(err.to_string(), "pyramid must have 28 cards, got 27");

    let draw = [1u8; 25];
    let err = GameState::from_cards(&EXAMPLE_PYRAMID, &draw).unwrap_err();
    assert_eq!(err.to_string(), "draw pile must have at most 24 cards, got 25");
}

#[test]
fn test_short_draw_pile() {
    let state = GameState::from_cards(&EXAMPLE_PYRAMID, &[1, 2, 3, 4]).unwrap();
    assert_eq!(state.active_segments(), 2);
    assert_eq!(state.visible_card(), Some(3));
}

// =============================================================================
// Accessibility and matching
// =============================================================================

#[test]
fn test_accessibility_rule_holds_during_play() {
    for seed in 0..10 {
        random_walk(seed, 150, |_, after, _, _| {
            for c in ALL_CELLS {
                assert_eq!(
                    after.is_accessible(c),
                    expected_accessible(after, c.row(), c.col()),
                    "accessibility mismatch at {c}"
                );
            }
        });
    }
}

#[test]
fn test_a1_accessible_whenever_occupied() {
    random_walk(3, 200, |_, after, _, _| {
        let a1 = cell("A1");
        assert_eq!(after.is_accessible(a1), after.card(a1).is_some());
    });
}

#[test]
fn test_match_examples() {
    assert!(is_match(6, 7));
    assert!(!is_match(13, 13));
    assert!(!is_match(13, 5));
    for a in 1..=13u8 {
        for b in 1..=13u8 {
            assert_eq!(is_match(a, b), a != 13 && b != 13 && a + b == 13);
        }
    }
}

// =============================================================================
// Draw pile
// =============================================================================

#[test]
fn test_redraw_when_last_segment_runs_out() {
    let mut state = GameState::from_cards(&[1; PYRAMID_CARDS], &[5, 6, 7, 8]).unwrap();
    assert_eq!(state.active_segments(), 2);

    state.apply_move(Move::ADVANCE);
    assert_eq!(state.pile().current(), 1);
    // Pull the only card of the last segment into the hold.
    state.apply_move(Move::new(Endpoint::Pile, Endpoint::Hold));
    assert_eq!(state.hold(), Some(8));
    assert_eq!(state.visible_card(), Some(7));

    state.apply_move(Move::ADVANCE);
    assert_eq!(state.redraws(), 1);
    assert_eq!(state.pile().current(), 0);
    assert_eq!(state.active_segments(), 1);
    assert_eq!(state.pile().segments()[0].cards(), &[5, 6, 7]);
}

#[test]
fn test_backfill_match_from_previous_segment() {
    // Bottom row has a 6 to pair with the 7 sitting in segment 1.
    let mut pyramid = [1u8; PYRAMID_CARDS];
    pyramid[0] = 6;
    let mut state = GameState::from_cards(&pyramid, &[2, 3, 7, 9]).unwrap();
    state.apply_move(Move::ADVANCE);
    state.apply_move(Move::new(Endpoint::Pile, Endpoint::Hold));
    assert_eq!(state.hold(), Some(9));
    assert_eq!(state.active_segments(), 2);

    assert!(state.apply_move(Move::new(at("A1"), Endpoint::Pile)));
    assert_eq!(state.visible_card(), Some(3));
    assert_eq!(state.active_segments(), 1);
}

#[test]
fn test_hold_pairs_with_backfilled_card() {
    // Segment 0 is [3, 5, 6], segment 1 is [7].
    let mut state = GameState::from_cards(&[1; PYRAMID_CARDS], &[3, 5, 6, 7]).unwrap();
    state.apply_move(Move::ADVANCE);
    state.apply_move(Move::new(Endpoint::Pile, Endpoint::Hold));
    assert_eq!(state.hold(), Some(7));
    assert_eq!(state.visible_card(), Some(6));
    assert_eq!(state.active_segments(), 2);

    let pair = Move::new(Endpoint::Hold, Endpoint::Pile);
    assert!(legal_moves(&state).contains(&pair));
    assert!(state.apply_move(pair));
    assert_eq!(state.hold(), None);
    assert_eq!(state.visible_card(), Some(5));
    assert_eq!(state.active_segments(), 1);
    assert_eq!(state.matches(), 1);
    assert_eq!(state.streak(), 1);
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_clearing_never_lowers_score() {
    for seed in 0..20 {
        random_walk(seed, MAX_ROLLOUT_MOVES, |before, after, _, cleared| {
            if cleared {
                assert!(after.score() >= before.score());
            }
        });
    }
}

#[test]
fn test_non_clearing_moves_keep_match_count() {
    random_walk(8, MAX_ROLLOUT_MOVES, |before, after, _, cleared| {
        if cleared {
            assert_eq!(after.matches(), before.matches() + 1);
        } else {
            assert_eq!(after.matches(), before.matches());
            assert_eq!(after.streak_bonus(), before.streak_bonus());
        }
    });
}

// =============================================================================
// Illegal moves
// =============================================================================

#[test]
fn test_illegal_moves_are_silent() {
    let mut state = example();
    let before = state.clone();
    let illegal = [
        // Covered cell.
        Move::new(at("G1"), Endpoint::Hold),
        // Non-exempt discard.
        Move::discard(at("A1")),
        // Empty hold as a source.
        Move::new(Endpoint::Hold, Endpoint::Pile),
        Move::new(Endpoint::Hold, Endpoint::Hold),
        Move::discard(Endpoint::Hold),
        // Tokens used as card endpoints.
        Move::new(Endpoint::Discard, Endpoint::Pile),
        Move::new(Endpoint::Draw, at("A1")),
    ];
    for mv in illegal {
        assert!(!state.apply_move(mv), "{mv} should not clear");
    }
    for c in ALL_CELLS {
        assert_eq!(state.card(c), before.card(c));
    }
    assert_eq!(state.hold(), before.hold());
    assert_eq!(state.pile(), before.pile());
    assert_eq!(state.matches(), 0);
    assert_eq!(state.redraws(), 0);
    assert_eq!(state.history().len(), illegal.len());
}

#[test]
fn test_matching_cleared_cell_is_noop() {
    let mut pyramid = [1u8; PYRAMID_CARDS];
    pyramid[0] = 6;
    pyramid[1] = 7;
    let mut state = GameState::from_cards(&pyramid, &[]).unwrap();
    assert!(state.apply_move(Move::new(at("A1"), at("A2"))));
    assert!(!state.apply_move(Move::new(at("A1"), at("A2"))));
    assert_eq!(state.matches(), 1);
}

// =============================================================================
// Clone and reset
// =============================================================================

#[test]
fn test_clone_and_reset_are_independent() {
    let template = example();
    let mut cloned = template.clone();
    let mut reset = GameState::new();
    reset.reset_from(&template);

    assert_eq!(cloned, template);
    assert_eq!(reset, template);

    let moves = legal_moves(&template);
    let mv = *moves.last().unwrap();
    cloned.apply_move(mv);
    cloned.apply_move(Move::ADVANCE);

    assert_eq!(reset, template);
    assert_ne!(cloned, template);

    reset.apply_move(Move::ADVANCE);
    reset.apply_move(Move::ADVANCE);
    assert_eq!(template.pile().current(), 0);
    assert_eq!(reset.pile().current(), 2);
}

// =============================================================================
// Move generation
// =============================================================================

#[test]
fn test_movegen_unpaired_cell_goes_to_hold() {
    // 4 + 8 does not pair, so only the hold moves are offered.
    let mut pyramid: Vec<Card> = vec![1; PYRAMID_CARDS];
    pyramid[2] = 4;
    let state = GameState::from_cards(&pyramid, &[8]).unwrap();
    let moves = legal_moves(&state);

    assert!(moves.contains(&Move::new(at("A3"), Endpoint::Hold)));
    assert!(!moves.contains(&Move::new(at("A3"), Endpoint::Pile)));
    assert!(!moves.contains(&Move::new(Endpoint::Hold, Endpoint::Pile)));
    assert!(moves.contains(&Move::new(Endpoint::Pile, Endpoint::Hold)));
}

#[test]
fn test_movegen_is_deterministic() {
    let state = example();
    assert_eq!(legal_moves(&state), legal_moves(&state.clone()));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_single_worker_search_is_reproducible() {
    let template = example();
    let config = SearchConfig::new(300).with_workers(1).with_seed(2024);
    let a = search(&template, &config);
    let b = search(&template, &config);
    assert_eq!(a, b);
    assert_eq!(a.rollouts, 300);
}

#[test]
fn test_multi_worker_search_is_reproducible_with_fixed_seed() {
    let template = example();
    let config = SearchConfig::new(400).with_workers(4).with_seed(99);
    let a = search(&template, &config);
    let b = search(&template, &config);
    assert_eq!(a.score, b.score);
    assert_eq!(a.moves, b.moves);
}

#[test]
fn test_search_result_replays_to_its_score() {
    let template = example();
    let config = SearchConfig::new(500).with_workers(3).with_seed(5);
    let best = search(&template, &config);

    assert!(best.moves.len() <= MAX_ROLLOUT_MOVES);
    let mut replay = template.clone();
    for &mv in &best.moves {
        replay.apply_move(mv);
    }
    assert_eq!(replay.score(), best.score);
    assert!(best.score > 0);
}

#[test]
fn test_search_matches_single_simulator() {
    // One worker with seed S runs exactly one job seeded S.
    let template = example();
    let config = SearchConfig::new(50).with_workers(1).with_seed(31);
    let best = search(&template, &config);

    let mut sim = Simulator::new(&template, 31);
    let expected = sim.best_of(&template, 50).unwrap();
    assert_eq!(best.score, expected.score);
    assert_eq!(best.moves, expected.moves);
}

#[test]
fn test_search_never_mutates_template() {
    let template = example();
    let before = template.clone();
    search(&template, &SearchConfig::new(100).with_workers(4).with_seed(1));
    assert_eq!(template, before);
}
