//! Move scoring policy for the heuristic AI

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, BOARD_SIZE};
use crate::movement::{is_valid_move, Phase};
use crate::tiles::{Team, Tile, TileType};

/// Named weights for every factor the AI scores a move by
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Multiplier on the captured tile's capture score
    pub capture_weight: f32,
    /// Extra multiplier when a priority attacker takes a priority target
    pub priority_capture_multiplier: f32,
    /// Multiplier on the escaping tile's escape score
    pub escape_weight: f32,
    /// Per adjacent enemy, for the aggressor type
    pub enemy_attraction: f32,
    /// Per adjacent enemy, for every other type (usually negative)
    pub enemy_repulsion: f32,
    /// Per enemy able to capture the moved tile on its next turn
    pub threat_penalty: f32,
    /// Per step of closeness to the nearest exit, final phase escapers only
    pub exit_proximity_weight: f32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            capture_weight: 1.0,
            priority_capture_multiplier: 2.0,
            escape_weight: 1.0,
            enemy_attraction: 5.0,
            enemy_repulsion: -3.0,
            threat_penalty: -100.0,
            exit_proximity_weight: 2.0,
        }
    }
}

impl ScoringPolicy {
    /// Load from JSON file; missing fields fall back to defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Value of `attacker` taking `target`
    pub fn capture_value(&self, attacker: &Tile, target: &Tile) -> f32 {
        let base = target.tile_type.capture_score() as f32 * self.capture_weight;
        if is_priority_capture(attacker.tile_type, target.tile_type) {
            base * self.priority_capture_multiplier
        } else {
            base
        }
    }

    /// Value of escaping a tile of this type
    pub fn escape_value(&self, tile_type: TileType) -> f32 {
        tile_type.escape_score() as f32 * self.escape_weight
    }

    /// Positional score of a non-capturing move by `team`
    pub fn positional_value(
        &self,
        board: &Board,
        from: Position,
        to: Position,
        team: Team,
        phase: Phase,
    ) -> f32 {
        let mover = board[from];
        let mut after = board.clone();
        after.set(to, mover);
        after.set(from, Tile::EMPTY);

        let mut score = 0.0;

        let enemies = adjacent_enemies(&after, to, team) as f32;
        score += if is_aggressor(mover.tile_type) {
            enemies * self.enemy_attraction
        } else {
            enemies * self.enemy_repulsion
        };

        score += threats(&after, to, team, phase) as f32 * self.threat_penalty;

        if phase == Phase::Final && team.escapers().contains(&mover.tile_type) {
            let closeness = BOARD_SIZE as f32 - to.distance_to_nearest_exit() as f32;
            score += closeness * self.exit_proximity_weight;
        }

        score
    }
}

/// The team's strongest attacker hitting the other side's most valuable defenders
pub fn is_priority_capture(attacker: TileType, target: TileType) -> bool {
    matches!(
        (attacker, target),
        (TileType::Bear, TileType::Hunter)
            | (TileType::Bear, TileType::Lumberjack)
            | (TileType::Hunter, TileType::Bear)
    )
}

/// Types that want to stand next to enemies
pub fn is_aggressor(tile_type: TileType) -> bool {
    tile_type == TileType::Bear
}

/// Revealed enemy tiles in the 8 cells around `pos`
fn adjacent_enemies(board: &Board, pos: Position, team: Team) -> usize {
    let enemy = team.opponent();
    let mut count = 0;
    for d_row in -1..=1 {
        for d_col in -1..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            if let Some(tile) = board.get(pos.offset(d_row, d_col)) {
                if tile.is_revealed && tile.owner == enemy {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Enemy tiles that could legally capture whatever stands on `pos`.
/// Covers a hunter's line of fire as well as adjacent bears and foxes.
fn threats(board: &Board, pos: Position, team: Team, phase: Phase) -> usize {
    let enemy = team.opponent();
    board
        .tiles()
        .filter(|(_, tile)| tile.is_revealed && tile.owner == enemy)
        .filter(|&(from, _)| is_valid_move(from, pos, board, enemy, phase))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_capture_value_priority() {
        let policy = ScoringPolicy::default();
        let bear = Tile::revealed(TileType::Bear);
        let fox = Tile::revealed(TileType::Fox);
        let hunter = Tile::hunter(Direction::Up);
        let lumberjack = Tile::revealed(TileType::Lumberjack);

        assert_eq!(policy.capture_value(&bear, &hunter), 10.0);
        assert_eq!(policy.capture_value(&bear, &lumberjack), 10.0);
        assert_eq!(policy.capture_value(&fox, &Tile::revealed(TileType::Duck)), 2.0);
        assert_eq!(policy.capture_value(&hunter, &bear), 20.0);
        assert_eq!(policy.capture_value(&hunter, &fox), 5.0);
    }

    #[test]
    fn test_escape_value() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.escape_value(TileType::Bear), 10.0);
        assert_eq!(policy.escape_value(TileType::Fox), 5.0);
        assert_eq!(policy.escape_value(TileType::Duck), 0.0);
    }

    #[test]
    fn test_hunter_line_of_fire_penalized() {
        let policy = ScoringPolicy::default();
        let mut board = Board::empty();
        board.set(pos(2, 2), Tile::hunter(Direction::Right));
        board.set(pos(5, 5), Tile::revealed(TileType::Fox));

        // (2,5) is in the hunter's lane, (6,5) is not
        let exposed = policy.positional_value(&board, pos(5, 5), pos(2, 5), Team::Animals, Phase::Normal);
        let safe = policy.positional_value(&board, pos(5, 5), pos(6, 5), Team::Animals, Phase::Normal);
        assert!(exposed < safe);
        assert!(exposed <= -100.0);
    }

    #[test]
    fn test_blocked_hunter_lane_is_safe() {
        let policy = ScoringPolicy::default();
        let mut board = Board::empty();
        board.set(pos(2, 2), Tile::hunter(Direction::Right));
        board.set(pos(2, 4), Tile::revealed(TileType::Tree));
        board.set(pos(5, 5), Tile::revealed(TileType::Fox));

        // the tree stops the shot, so (2,5) scores like a cell off the lane
        let behind_tree = policy.positional_value(&board, pos(5, 5), pos(2, 5), Team::Animals, Phase::Normal);
        let off_lane = policy.positional_value(&board, pos(5, 5), pos(3, 5), Team::Animals, Phase::Normal);
        assert_eq!(behind_tree, 0.0);
        assert_eq!(behind_tree, off_lane);

        board.set(pos(2, 4), Tile::EMPTY);
        let open = policy.positional_value(&board, pos(5, 5), pos(2, 5), Team::Animals, Phase::Normal);
        assert_eq!(open, policy.threat_penalty);
    }

    #[test]
    fn test_bear_attracted_fox_repelled() {
        let policy = ScoringPolicy::default();
        let mut board = Board::empty();
        board.set(pos(3, 3), Tile::revealed(TileType::Lumberjack));
        board.set(pos(3, 5), Tile::revealed(TileType::Bear));
        board.set(pos(5, 3), Tile::revealed(TileType::Fox));

        let bear_near = policy.positional_value(&board, pos(3, 5), pos(3, 4), Team::Animals, Phase::Normal);
        let bear_far = policy.positional_value(&board, pos(3, 5), pos(3, 6), Team::Animals, Phase::Normal);
        assert_eq!(bear_near, 5.0);
        assert_eq!(bear_far, 0.0);

        let fox_near = policy.positional_value(&board, pos(5, 3), pos(4, 3), Team::Animals, Phase::Normal);
        let fox_far = policy.positional_value(&board, pos(5, 3), pos(6, 3), Team::Animals, Phase::Normal);
        assert!(fox_near < fox_far);
    }

    #[test]
    fn test_exit_proximity_final_phase() {
        let policy = ScoringPolicy::default();
        let mut board = Board::empty();
        board.set(pos(4, 3), Tile::revealed(TileType::Fox));

        let toward = policy.positional_value(&board, pos(4, 3), pos(4, 1), Team::Animals, Phase::Final);
        let away = policy.positional_value(&board, pos(4, 3), pos(6, 3), Team::Animals, Phase::Final);
        assert!(toward > away);

        let normal = policy.positional_value(&board, pos(4, 3), pos(4, 1), Team::Animals, Phase::Normal);
        assert_eq!(normal, 0.0);
    }

    #[test]
    fn test_round_trip_file() {
        let path = std::env::temp_dir().join("tallyho_policy_test.json");
        let policy = ScoringPolicy {
            threat_penalty: -50.0,
            enemy_attraction: 8.0,
            ..Default::default()
        };
        policy.save(&path).unwrap();
        let loaded = ScoringPolicy::load(&path).unwrap();
        assert_eq!(loaded, policy);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_policy_json() {
        let policy: ScoringPolicy = serde_json::from_str(r#"{"threat_penalty": -10.0}"#).unwrap();
        assert_eq!(policy.threat_penalty, -10.0);
        assert_eq!(policy.capture_weight, 1.0);
    }
}
