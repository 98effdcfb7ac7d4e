//! Integration tests for the Tally-Ho engine
//!
//! Plays complete games through the public API and checks the rules hold
//! at every step.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tallyho_core::{
    tile_counts, Action, Board, Direction, EngineError, GameConfig, GameState, GreedyAi, Outcome, Phase,
    Position, ScoringPolicy, Status, Team, Tile, TileType, EXITS, TILE_COUNTS,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn pos(row: i8, col: i8) -> Position {
    Position::new(row, col)
}

fn seeded_game(seed: u64) -> GameState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    GameState::new(GameConfig::default(), &mut rng)
}

/// Non-empty, non-exit tiles on the board
fn piece_count(board: &Board) -> usize {
    board
        .tiles()
        .filter(|(_, t)| !t.is_empty() && !t.is_exit())
        .count()
}

/// Drive a game with two AIs, calling `check` before and after every action
fn play_checked<F>(seed: u64, mut check: F) -> GameState
where
    F: FnMut(&GameState, &GameState, Outcome),
{
    let mut state = seeded_game(seed);
    let mut deal_rng = ChaCha8Rng::seed_from_u64(seed ^ 0xdead_beef);
    let mut seats = [
        GreedyAi::with_seed(ScoringPolicy::default(), seed),
        GreedyAi::with_seed(ScoringPolicy::default(), seed + 1),
    ];

    for _ in 0..5_000 {
        match state.status() {
            Status::GameOver => return state,
            Status::RoundOver => {
                state.start_next_round(&mut deal_rng).unwrap();
                continue;
            }
            Status::InProgress => {}
        }

        let seat = if state.current_team() == state.user_team() { 0 } else { 1 };
        let decision = seats[seat].decide(&state).unwrap();
        assert!(
            state.legal_actions().contains(&decision.action),
            "AI chose {:?}, which is not a legal action",
            decision.action
        );
        let before = state.clone();
        let outcome = state.apply_decision(decision).unwrap();
        check(&before, &state, outcome);
    }
    panic!("game with seed {} did not finish", seed);
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_full_games_finish() {
    for seed in 0..8 {
        let state = play_checked(seed, |_, _, _| {});
        assert!(state.is_game_over());
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].user_team, Team::Humans);
        assert_eq!(state.history()[1].user_team, Team::Animals);
        assert!(state.final_scores().is_some());
    }
}

#[test]
fn test_every_action_is_turn_consuming() {
    play_checked(3, |_, _, outcome| {
        assert!(outcome.ends_turn(), "AI produced {:?}", outcome);
    });
}

#[test]
fn test_tile_count_never_grows() {
    play_checked(11, |before, after, _| {
        if before.round() != after.round() {
            return;
        }
        let (b, a) = (piece_count(before.board()), piece_count(after.board()));
        assert!(a <= b && b - a <= 1, "piece count went from {} to {}", b, a);
    });
}

#[test]
fn test_phase_is_one_way() {
    play_checked(21, |before, after, _| {
        if before.round() == after.round() && before.phase() == Phase::Final {
            assert_eq!(after.phase(), Phase::Final);
        }
        if after.phase() == Phase::Final {
            assert!(after.board().all_revealed());
        }
    });
}

#[test]
fn test_exits_and_cabin_fixed() {
    play_checked(5, |_, after, _| {
        for exit in EXITS {
            assert_eq!(after.board()[exit], Tile::EXIT);
        }
        assert_eq!(after.board()[pos(4, 4)], Tile::CABIN);
    });
}

#[test]
fn test_scores_match_history() {
    let state = play_checked(8, |_, _, _| {});
    let totals = state.final_scores().unwrap();
    let sum: i32 = state
        .history()
        .iter()
        .map(|r| r.scores.humans + r.scores.animals)
        .sum();
    assert_eq!(totals.user + totals.ai, sum);
}

#[test]
fn test_round_over_needs_next_round() {
    let config = GameConfig {
        final_phase_moves: 1,
        ..Default::default()
    };
    let mut board = Board::empty();
    board.set(pos(3, 3), Tile::revealed(TileType::Duck));
    let mut state = GameState::with_board(board, config);

    state.apply_action(Action::Pass).unwrap();
    state.apply_action(Action::Pass).unwrap();
    assert_eq!(state.status(), Status::RoundOver);
    assert_eq!(state.apply_action(Action::Pass), Err(EngineError::RoundOver(1)));

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    state.start_next_round(&mut rng).unwrap();
    assert_eq!(state.status(), Status::InProgress);
    assert_eq!(state.phase(), Phase::Normal);
    assert_eq!(state.user_team(), Team::Animals);

    let counts = tile_counts(state.board());
    for (tile_type, expected) in TILE_COUNTS {
        assert_eq!(counts[&tile_type], expected);
    }
}

// ============================================================================
// SCRIPTED SCENARIOS
// ============================================================================

#[test]
fn test_click_flow_hunter_capture() {
    let mut board = Board::empty();
    board.set(pos(3, 3), Tile::hunter(Direction::Right));
    board.set(pos(3, 6), Tile::revealed(TileType::Fox));
    board.set(pos(6, 6), Tile::hidden(TileType::Tree));
    let mut state = GameState::with_board(board, GameConfig::default());

    assert_eq!(state.on_tile_click(pos(3, 3)).unwrap(), Outcome::Selected(pos(3, 3)));
    let outcome = state.on_tile_click(pos(3, 6)).unwrap();
    assert!(matches!(outcome, Outcome::Moved { captured: Some(TileType::Fox), points: 5, .. }));
    assert_eq!(state.scores().humans, 5);
    assert_eq!(state.current_team(), Team::Animals);
}

#[test]
fn test_stale_decision_after_round_change() {
    let config = GameConfig {
        final_phase_moves: 1,
        ..Default::default()
    };
    let mut board = Board::empty();
    board.set(pos(3, 3), Tile::revealed(TileType::Duck));
    let mut state = GameState::with_board(board, config);
    state.apply_action(Action::Pass).unwrap();

    let mut ai = GreedyAi::new(ScoringPolicy::default());
    let decision = ai.decide(&state).unwrap();
    state.apply_action(Action::Pass).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    state.start_next_round(&mut rng).unwrap();

    assert!(matches!(state.apply_decision(decision), Err(EngineError::StaleDecision { .. })));
}
