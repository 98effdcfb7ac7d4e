//! Game state machine: turns, reveals, moves, scoring, rounds

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Position};
use crate::config::GameConfig;
use crate::error::{EngineError, Result};
use crate::generator::generate_board;
use crate::movement::{is_valid_move, legal_destinations, Phase};
use crate::tiles::{Team, Tile, TileType};

/// Rounds per game. Teams swap sides between them.
pub const ROUNDS_PER_GAME: u8 = 2;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A value per playing team. Neutral reads as the default and ignores writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTeam<T> {
    pub humans: T,
    pub animals: T,
}

impl<T: Copy + Default> PerTeam<T> {
    pub fn splat(value: T) -> Self {
        Self {
            humans: value,
            animals: value,
        }
    }

    pub fn get(&self, team: Team) -> T {
        match team {
            Team::Humans => self.humans,
            Team::Animals => self.animals,
            Team::Neutral => T::default(),
        }
    }

    pub fn set(&mut self, team: Team, value: T) {
        match team {
            Team::Humans => self.humans = value,
            Team::Animals => self.animals = value,
            Team::Neutral => {}
        }
    }
}

impl PerTeam<i32> {
    /// Team with the higher score, `None` on a tie
    pub fn leader(&self) -> Option<Team> {
        match self.humans.cmp(&self.animals) {
            std::cmp::Ordering::Greater => Some(Team::Humans),
            std::cmp::Ordering::Less => Some(Team::Animals),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Where the game is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    /// Round finished; waiting for [`GameState::start_next_round`]
    RoundOver,
    GameOver,
}

/// One turn action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Reveal(Position),
    Move { from: Position, to: Position },
    Pass,
}

/// An action chosen for a specific state, see [`GameState::apply_decision`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub team: Team,
    pub action: Action,
    pub epoch: u64,
}

/// What an operation did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing to do for this click or reveal
    Ignored,
    Selected(Position),
    Deselected,
    /// Illegal move; selection cleared, nothing else changed
    Rejected,
    Revealed { pos: Position, tile_type: TileType },
    Moved {
        from: Position,
        to: Position,
        captured: Option<TileType>,
        points: i32,
    },
    Escaped {
        from: Position,
        exit: Position,
        tile_type: TileType,
        points: i32,
    },
    Passed,
}

impl Outcome {
    /// Whether the action consumed the turn
    pub fn ends_turn(&self) -> bool {
        matches!(
            self,
            Outcome::Revealed { .. } | Outcome::Moved { .. } | Outcome::Escaped { .. } | Outcome::Passed
        )
    }
}

/// Scores of one finished round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u8,
    pub scores: PerTeam<i32>,
    /// Team the human user played this round
    pub user_team: Team,
}

/// Game totals from the human user's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScores {
    pub user: i32,
    pub ai: i32,
}

impl FinalScores {
    /// Sum every round with team roles reconciled
    pub fn from_history(history: &[RoundRecord]) -> Self {
        history.iter().fold(FinalScores { user: 0, ai: 0 }, |acc, record| FinalScores {
            user: acc.user + record.scores.get(record.user_team),
            ai: acc.ai + record.scores.get(record.user_team.opponent()),
        })
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Complete game state (clone to branch, serialize to snapshot)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    config: GameConfig,
    current_team: Team,
    user_team: Team,
    scores: PerTeam<i32>,
    selected: Option<Position>,
    phase: Phase,
    remaining_moves: PerTeam<u8>,
    round: u8,
    status: Status,
    history: Vec<RoundRecord>,
    log: VecDeque<String>,
    /// Bumped on every committed action or round change
    epoch: u64,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game with a freshly dealt board
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        Self::with_board(generate_board(rng), config)
    }

    /// New game on a prepared board
    pub fn with_board(board: Board, config: GameConfig) -> Self {
        let mut state = Self {
            board,
            current_team: config.first_team,
            user_team: config.user_team,
            scores: PerTeam::default(),
            selected: None,
            phase: Phase::Normal,
            remaining_moves: PerTeam::splat(config.final_phase_moves),
            round: 1,
            status: Status::InProgress,
            history: Vec::new(),
            log: VecDeque::with_capacity(config.log_capacity),
            epoch: 0,
            config,
        };
        state.push_log(format!("Round 1 begins; {} move first", state.current_team.name()));
        state.check_final_phase();
        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Team whose turn it is
    pub fn current_team(&self) -> Team {
        self.current_team
    }

    /// Team the human user plays this round
    pub fn user_team(&self) -> Team {
        self.user_team
    }

    /// Team the computer plays this round
    pub fn ai_team(&self) -> Team {
        self.user_team.opponent()
    }

    pub fn scores(&self) -> PerTeam<i32> {
        self.scores
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_final_phase(&self) -> bool {
        self.phase == Phase::Final
    }

    pub fn remaining_moves(&self) -> PerTeam<u8> {
        self.remaining_moves
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    /// Finished rounds, oldest first
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Newest log entries, oldest first
    pub fn log(&self) -> impl Iterator<Item = &str> + '_ {
        self.log.iter().map(String::as_str)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// User vs. AI totals, available once the game is over
    pub fn final_scores(&self) -> Option<FinalScores> {
        (self.status == Status::GameOver).then(|| FinalScores::from_history(&self.history))
    }

    /// Every action the current team could take right now
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.status != Status::InProgress {
            return vec![];
        }

        let mut actions: Vec<Action> = self
            .board
            .hidden_positions()
            .into_iter()
            .map(Action::Reveal)
            .collect();

        for (from, tile) in self.board.tiles() {
            if !tile.is_revealed || !tile.is_movable_by(self.current_team) {
                continue;
            }
            for to in legal_destinations(from, &self.board, self.current_team, self.phase) {
                actions.push(Action::Move { from, to });
            }
        }

        actions.push(Action::Pass);
        actions
    }

    // ========================================================================
    // CLICK DISPATCH
    // ========================================================================

    /// Handle a click on `pos` for the team to move.
    ///
    /// With a tile selected, clicking it again deselects and clicking any
    /// other cell attempts the move. With nothing selected, a face-down cell
    /// is revealed and a movable face-up tile is selected.
    pub fn on_tile_click(&mut self, pos: Position) -> Result<Outcome> {
        check_bounds(pos)?;
        self.ensure_in_progress()?;

        if let Some(selected) = self.selected {
            if selected == pos {
                self.selected = None;
                return Ok(Outcome::Deselected);
            }
            return self.move_tile(selected, pos);
        }

        let tile = self.board[pos];
        if !tile.is_revealed {
            return self.reveal(pos);
        }
        if tile.is_movable_by(self.current_team) {
            self.selected = Some(pos);
            return Ok(Outcome::Selected(pos));
        }
        Ok(Outcome::Ignored)
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Apply an action in place
    pub fn apply_action(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::Reveal(pos) => self.reveal(pos),
            Action::Move { from, to } => self.move_tile(from, to),
            Action::Pass => self.pass_turn(),
        }
    }

    /// Apply action, return new state
    pub fn apply(&self, action: Action) -> Result<(Self, Outcome)> {
        let mut new_state = self.clone();
        let outcome = new_state.apply_action(action)?;
        Ok((new_state, outcome))
    }

    /// Apply a decision made for this exact state.
    ///
    /// Decisions computed before the last committed action (or before a
    /// new round) are refused.
    pub fn apply_decision(&mut self, decision: Decision) -> Result<Outcome> {
        if decision.epoch != self.epoch || decision.team != self.current_team {
            return Err(EngineError::StaleDecision {
                decided: decision.epoch,
                current: self.epoch,
            });
        }
        self.apply_action(decision.action)
    }

    /// Flip a face-down tile. Always ends the turn.
    pub fn reveal(&mut self, pos: Position) -> Result<Outcome> {
        check_bounds(pos)?;
        self.ensure_in_progress()?;

        let team = self.current_team;
        let tile = match self.board.get_mut(pos) {
            Some(tile) if !tile.is_revealed => tile,
            _ => return Ok(Outcome::Ignored),
        };
        tile.is_revealed = true;
        let revealed = *tile;

        self.selected = None;
        self.push_log(format!("{} revealed {} at {}", team.name(), revealed.label(), pos));
        self.check_final_phase();
        self.end_turn();

        Ok(Outcome::Revealed {
            pos,
            tile_type: revealed.tile_type,
        })
    }

    /// Move the tile at `from` to `to` for the team to move.
    ///
    /// Illegal moves clear the selection and return [`Outcome::Rejected`]
    /// without touching anything else.
    pub fn move_tile(&mut self, from: Position, to: Position) -> Result<Outcome> {
        check_bounds(from)?;
        check_bounds(to)?;
        self.ensure_in_progress()?;

        self.selected = None;
        let team = self.current_team;
        if !is_valid_move(from, to, &self.board, team, self.phase) {
            return Ok(Outcome::Rejected);
        }

        let mover = self.board[from];
        let target = self.board[to];

        let outcome = if target.is_exit() {
            // Escapers leave the board; the exit stays open
            let points = mover.tile_type.escape_score();
            self.board.set(from, Tile::EMPTY);
            self.add_score(team, points);
            self.push_log(format!(
                "{} {} escaped through {} (+{})",
                team.name(),
                mover.label(),
                to,
                points
            ));
            Outcome::Escaped {
                from,
                exit: to,
                tile_type: mover.tile_type,
                points,
            }
        } else {
            let captured = (!target.is_empty()).then_some(target.tile_type);
            let points = captured.map_or(0, TileType::capture_score);
            self.board.set(to, mover);
            self.board.set(from, Tile::EMPTY);
            self.add_score(team, points);
            match captured {
                Some(victim) => self.push_log(format!(
                    "{} {} captured {} at {} (+{})",
                    team.name(),
                    mover.label(),
                    victim.name(),
                    to,
                    points
                )),
                None => self.push_log(format!("{} moved {} {} -> {}", team.name(), mover.label(), from, to)),
            }
            Outcome::Moved {
                from,
                to,
                captured,
                points,
            }
        };

        self.finish_action(team);
        Ok(outcome)
    }

    /// End the turn without acting. Counts against the final-phase budget.
    pub fn pass_turn(&mut self) -> Result<Outcome> {
        self.ensure_in_progress()?;

        let team = self.current_team;
        self.selected = None;
        self.push_log(format!("{} passed", team.name()));
        self.finish_action(team);
        Ok(Outcome::Passed)
    }

    /// Deal round 2 with teams swapped
    pub fn start_next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.ensure_round_over()?;
        self.begin_round(generate_board(rng));
        Ok(())
    }

    /// Like [`GameState::start_next_round`] on a prepared board
    pub fn start_next_round_with_board(&mut self, board: Board) -> Result<()> {
        self.ensure_round_over()?;
        self.begin_round(board);
        Ok(())
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn ensure_in_progress(&self) -> Result<()> {
        match self.status {
            Status::InProgress => Ok(()),
            Status::RoundOver => Err(EngineError::RoundOver(self.round)),
            Status::GameOver => Err(EngineError::GameOver),
        }
    }

    fn ensure_round_over(&self) -> Result<()> {
        match self.status {
            Status::RoundOver => Ok(()),
            Status::InProgress => Err(EngineError::RoundInProgress(self.round)),
            Status::GameOver => Err(EngineError::GameOver),
        }
    }

    fn add_score(&mut self, team: Team, points: i32) {
        self.scores.set(team, self.scores.get(team) + points);
    }

    fn push_log(&mut self, entry: String) {
        tracing::debug!(round = self.round, "{}", entry);
        while self.log.len() >= self.config.log_capacity.max(1) {
            self.log.pop_front();
        }
        self.log.push_back(entry);
    }

    /// Enter the final phase once every tile is face-up. One-way.
    fn check_final_phase(&mut self) {
        if self.phase == Phase::Final || !self.board.all_revealed() {
            return;
        }
        self.phase = Phase::Final;
        self.remaining_moves = PerTeam::splat(self.config.final_phase_moves);
        tracing::debug!(round = self.round, "final phase entered");
        self.push_log(format!(
            "All tiles revealed: exits are open, {} moves each",
            self.config.final_phase_moves
        ));
        if self.config.final_phase_moves == 0 {
            self.finish_round();
        }
    }

    /// Bookkeeping after a move or pass by `team`
    fn finish_action(&mut self, team: Team) {
        if self.phase == Phase::Final {
            let left = self.remaining_moves.get(team).saturating_sub(1);
            self.remaining_moves.set(team, left);
            if self.remaining_moves.humans == 0 && self.remaining_moves.animals == 0 {
                self.finish_round();
                return;
            }
        }
        self.end_turn();
    }

    fn end_turn(&mut self) {
        self.epoch += 1;
        if self.status != Status::InProgress {
            return;
        }
        let next = self.current_team.opponent();
        // A team with no final-phase moves left is skipped
        let exhausted = self.phase == Phase::Final && self.remaining_moves.get(next) == 0;
        if !exhausted {
            self.current_team = next;
        }
    }

    fn finish_round(&mut self) {
        self.epoch += 1;
        self.selected = None;
        let record = RoundRecord {
            round: self.round,
            scores: self.scores,
            user_team: self.user_team,
        };
        self.history.push(record);
        self.status = if self.round >= ROUNDS_PER_GAME {
            Status::GameOver
        } else {
            Status::RoundOver
        };

        tracing::debug!(
            round = self.round,
            humans = self.scores.humans,
            animals = self.scores.animals,
            "round over"
        );
        self.push_log(format!(
            "Round {} over: Humans {} - Animals {}",
            self.round, self.scores.humans, self.scores.animals
        ));

        if let Some(totals) = self.final_scores() {
            self.push_log(format!("Game over: you {} - AI {}", totals.user, totals.ai));
        }
    }

    fn begin_round(&mut self, board: Board) {
        self.board = board;
        self.round += 1;
        self.user_team = self.user_team.opponent();
        self.current_team = self.config.first_team;
        self.scores = PerTeam::default();
        self.selected = None;
        self.phase = Phase::Normal;
        self.remaining_moves = PerTeam::splat(self.config.final_phase_moves);
        self.status = Status::InProgress;
        self.epoch += 1;
        self.push_log(format!(
            "Round {} begins; you play {}",
            self.round,
            self.user_team.name()
        ));
        self.check_final_phase();
    }
}

fn check_bounds(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(EngineError::OutOfBounds(pos))
    }
}

// ============================================================================
// TESTS
// ============================================================================
