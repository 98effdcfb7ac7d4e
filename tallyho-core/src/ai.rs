//! Greedy single-ply AI

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::Position;
use crate::error::Result;
use crate::eval::ScoringPolicy;
use crate::game::{Action, Decision, GameState, Status};
use crate::movement::{legal_destinations, Phase};
use crate::tiles::{Team, Tile};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Safety net for `play_game`; real rounds end far sooner
const MAX_TURNS_PER_ROUND: usize = 1_000;

// ============================================================================
// GREEDY AI
// ============================================================================

/// Heuristic player: capture, escape, reveal, reposition, pass, in that order
pub struct GreedyAi {
    pub policy: ScoringPolicy,
    rng: ChaCha8Rng,
}

impl GreedyAi {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self::with_seed(policy, 42)
    }

    pub fn with_seed(policy: ScoringPolicy, seed: u64) -> Self {
        Self {
            policy,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick an action for `team` on the current state
    pub fn choose_action(&mut self, state: &GameState, team: Team) -> Action {
        let own = own_tiles(state, team);

        if let Some(action) = self.best_capture(state, team, &own) {
            return action;
        }

        if state.phase() == Phase::Final {
            if let Some(action) = self.best_escape(state, team, &own) {
                return action;
            }
        }

        let hidden = state.board().hidden_positions();
        if let Some(&pos) = hidden.choose(&mut self.rng) {
            return Action::Reveal(pos);
        }

        if let Some(action) = self.best_positional(state, team, &own) {
            return action;
        }

        Action::Pass
    }

    /// Choose for the team to move, stamped with the state's epoch.
    /// `None` unless the round is in progress.
    pub fn decide(&mut self, state: &GameState) -> Option<Decision> {
        if state.status() != Status::InProgress {
            return None;
        }
        let team = state.current_team();
        Some(Decision {
            team,
            action: self.choose_action(state, team),
            epoch: state.epoch(),
        })
    }

    /// Play a complete game. `self` takes the user's seat, `opponent` the
    /// other; seats swap teams with the round. Round 2 is dealt from `self`.
    pub fn play_game(&mut self, opponent: &mut GreedyAi, initial: GameState) -> Result<GameState> {
        let mut state = initial;
        let mut turns = 0;

        loop {
            match state.status() {
                Status::GameOver => return Ok(state),
                Status::RoundOver => {
                    state.start_next_round(&mut self.rng)?;
                    turns = 0;
                    continue;
                }
                Status::InProgress => {}
            }

            if turns >= MAX_TURNS_PER_ROUND {
                tracing::warn!(round = state.round(), turns, "round did not finish, abandoning game");
                return Ok(state);
            }

            let player = if state.current_team() == state.user_team() {
                &mut *self
            } else {
                &mut *opponent
            };
            if let Some(decision) = player.decide(&state) {
                state.apply_decision(decision)?;
            }
            turns += 1;
        }
    }

    fn best_capture(&self, state: &GameState, team: Team, own: &[(Position, Tile)]) -> Option<Action> {
        let board = state.board();
        let mut best: Option<(Action, f32)> = None;

        for &(from, tile) in own {
            for to in legal_destinations(from, board, team, state.phase()) {
                let target = board[to];
                if target.is_empty() || target.is_exit() {
                    continue;
                }
                let value = self.policy.capture_value(&tile, &target);
                if best.map_or(true, |(_, v)| value > v) {
                    best = Some((Action::Move { from, to }, value));
                }
            }
        }

        best.filter(|&(_, v)| v > 0.0).map(|(action, _)| action)
    }

    fn best_escape(&self, state: &GameState, team: Team, own: &[(Position, Tile)]) -> Option<Action> {
        let board = state.board();
        let mut best: Option<(Action, f32)> = None;

        for &(from, tile) in own {
            for to in legal_destinations(from, board, team, state.phase()) {
                if !board[to].is_exit() {
                    continue;
                }
                let value = self.policy.escape_value(tile.tile_type);
                if best.map_or(true, |(_, v)| value > v) {
                    best = Some((Action::Move { from, to }, value));
                }
            }
        }

        best.filter(|&(_, v)| v > 0.0).map(|(action, _)| action)
    }

    fn best_positional(&self, state: &GameState, team: Team, own: &[(Position, Tile)]) -> Option<Action> {
        let board = state.board();
        let mut best: Option<(Action, f32)> = None;

        for &(from, _) in own {
            for to in legal_destinations(from, board, team, state.phase()) {
                if !board[to].is_empty() {
                    continue;
                }
                let value = self.policy.positional_value(board, from, to, team, state.phase());
                if best.map_or(true, |(_, v)| value > v) {
                    best = Some((Action::Move { from, to }, value));
                }
            }
        }

        best.map(|(action, _)| action)
    }
}

/// Face-up tiles owned by `team`, in board order
fn own_tiles(state: &GameState, team: Team) -> Vec<(Position, Tile)> {
    state
        .board()
        .tiles()
        .filter(|(_, tile)| tile.is_revealed && tile.owner == team && tile.is_movable_by(team))
        .map(|(pos, tile)| (pos, *tile))
        .collect()
}
