//! Capture rules

use crate::board::Position;
use crate::tiles::{Tile, TileType};

/// Whether `attacker` moving from `from` may take `target` standing on `to`.
///
/// Pure: only the two tiles and the displacement matter. The board path is
/// the move validator's concern.
pub fn can_capture(attacker: &Tile, target: &Tile, from: Position, to: Position) -> bool {
    if !target.is_revealed {
        return false;
    }

    match attacker.tile_type {
        TileType::Hunter => {
            let direction = match attacker.direction {
                Some(d) => d,
                None => return false,
            };
            if !is_hunter_prey(target.tile_type) {
                return false;
            }
            let d_row = to.row - from.row;
            let d_col = to.col - from.col;
            let (step_row, step_col) = direction.delta();
            // Displacement must be a positive multiple of the aim vector
            if step_row == 0 {
                d_row == 0 && d_col.signum() == step_col
            } else {
                d_col == 0 && d_row.signum() == step_row
            }
        }
        TileType::Lumberjack => target.tile_type == TileType::Tree,
        TileType::Fox => matches!(target.tile_type, TileType::Duck | TileType::Pheasant),
        TileType::Bear => matches!(target.tile_type, TileType::Hunter | TileType::Lumberjack),
        _ => false,
    }
}

/// Types a hunter can shoot
pub fn is_hunter_prey(tile_type: TileType) -> bool {
    matches!(
        tile_type,
        TileType::Fox | TileType::Bear | TileType::Duck | TileType::Pheasant
    )
}
