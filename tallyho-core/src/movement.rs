//! Move validation and destination generation

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, BOARD_SIZE};
use crate::capture::can_capture;
use crate::tiles::{Mobility, Team, TileType};

/// Round phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Tiles are still being revealed; exits are closed
    Normal,
    /// Everything is face-up; exits are open and move budgets count down
    Final,
}

/// Check whether `moving_team` may move the tile at `from` to `to`.
///
/// Side-effect free; an illegal move is simply `false`.
pub fn is_valid_move(
    from: Position,
    to: Position,
    board: &Board,
    moving_team: Team,
    phase: Phase,
) -> bool {
    let (from_tile, to_tile) = match (board.get(from), board.get(to)) {
        (Some(f), Some(t)) => (f, t),
        _ => return false,
    };

    // Exit line: ring cells other than the four exits
    if to.is_on_ring() && !to_tile.is_exit() {
        return false;
    }

    if !from_tile.is_revealed || !to_tile.is_revealed {
        return false;
    }

    if !from_tile.is_movable_by(moving_team) {
        return false;
    }

    if to_tile.tile_type == TileType::Cabin {
        return false;
    }

    if to_tile.is_exit() {
        if phase != Phase::Final || !moving_team.escapers().contains(&from_tile.tile_type) {
            return false;
        }
    } else if !to_tile.is_empty() && !can_capture(from_tile, to_tile, from, to) {
        return false;
    }

    let (step_row, step_col) = match from.step_toward(to) {
        Some(step) => step,
        None => return false,
    };

    match from_tile.tile_type.mobility() {
        Mobility::Short => from.manhattan(to) == 1,
        Mobility::Long => is_path_clear(board, from, to, step_row, step_col),
        Mobility::Fixed => false,
    }
}

/// Every cell strictly between `from` and `to` is empty
fn is_path_clear(board: &Board, from: Position, to: Position, step_row: i8, step_col: i8) -> bool {
    let mut current = from.offset(step_row, step_col);
    while current != to {
        match board.get(current) {
            Some(tile) if tile.is_empty() => {}
            _ => return false,
        }
        current = current.offset(step_row, step_col);
    }
    true
}

/// All legal destinations for the tile at `from`.
///
/// Candidates are every other cell in the same row and column; each one
/// goes through [`is_valid_move`].
pub fn legal_destinations(from: Position, board: &Board, team: Team, phase: Phase) -> Vec<Position> {
    let mut moves = Vec::new();
    if !from.is_valid() {
        return moves;
    }

    for i in 0..BOARD_SIZE as i8 {
        for to in [Position::new(from.row, i), Position::new(i, from.col)] {
            if to != from && is_valid_move(from, to, board, team, phase) {
                moves.push(to);
            }
        }
    }

    moves
}
