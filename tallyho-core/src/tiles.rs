//! Tile type definitions and score tables

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Direction;

/// Team a tile belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Humans,
    Animals,
    Neutral,
}

impl Team {
    /// The other playing side. Neutral has no opponent.
    pub fn opponent(self) -> Self {
        match self {
            Team::Humans => Team::Animals,
            Team::Animals => Team::Humans,
            Team::Neutral => Team::Neutral,
        }
    }

    /// Tile types this team may move onto an exit during the final phase
    pub fn escapers(self) -> &'static [TileType] {
        match self {
            Team::Humans => &[TileType::Hunter, TileType::Lumberjack],
            Team::Animals => &[TileType::Fox, TileType::Bear],
            Team::Neutral => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Humans => "Humans",
            Team::Animals => "Animals",
            Team::Neutral => "Neutral",
        }
    }
}

/// How a tile type moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mobility {
    /// Exactly one orthogonal step
    Short,
    /// Any distance in a straight orthogonal line, blocked by tiles
    Long,
    /// Never moves
    Fixed,
}

/// Tile type (closed set)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Hunter,
    Lumberjack,
    Fox,
    Bear,
    Duck,
    Pheasant,
    Tree,
    Cabin,
    Exit,
    Empty,
}

impl TileType {
    /// Team that owns tiles of this type
    pub fn owner(self) -> Team {
        match self {
            TileType::Hunter | TileType::Lumberjack => Team::Humans,
            TileType::Fox | TileType::Bear => Team::Animals,
            _ => Team::Neutral,
        }
    }

    pub fn mobility(self) -> Mobility {
        match self {
            TileType::Bear | TileType::Lumberjack => Mobility::Short,
            TileType::Hunter | TileType::Fox | TileType::Duck | TileType::Pheasant => {
                Mobility::Long
            }
            TileType::Tree | TileType::Cabin | TileType::Exit | TileType::Empty => Mobility::Fixed,
        }
    }

    /// Neutral animals either team may move on its turn
    pub fn is_shared_neutral(self) -> bool {
        matches!(self, TileType::Duck | TileType::Pheasant)
    }

    /// Points awarded for capturing a tile of this type
    pub fn capture_score(self) -> i32 {
        match self {
            TileType::Hunter => 5,
            TileType::Fox => 5,
            TileType::Bear => 10,
            TileType::Duck => 2,
            TileType::Pheasant => 3,
            TileType::Tree => 2,
            TileType::Lumberjack => 5,
            TileType::Cabin | TileType::Empty | TileType::Exit => 0,
        }
    }

    /// Points awarded for escaping a tile of this type
    pub fn escape_score(self) -> i32 {
        match self {
            TileType::Hunter | TileType::Lumberjack | TileType::Fox => 5,
            TileType::Bear => 10,
            _ => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileType::Hunter => "Hunter",
            TileType::Lumberjack => "Lumberjack",
            TileType::Fox => "Fox",
            TileType::Bear => "Bear",
            TileType::Duck => "Duck",
            TileType::Pheasant => "Pheasant",
            TileType::Tree => "Tree",
            TileType::Cabin => "Cabin",
            TileType::Exit => "Exit",
            TileType::Empty => "Empty",
        }
    }
}

/// Face-down tiles dealt into the game area at the start of each round
pub const TILE_COUNTS: [(TileType, usize); 7] = [
    (TileType::Hunter, 8),
    (TileType::Lumberjack, 2),
    (TileType::Bear, 2),
    (TileType::Fox, 6),
    (TileType::Pheasant, 8),
    (TileType::Duck, 7),
    (TileType::Tree, 15),
];

/// A single board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    pub is_revealed: bool,
    pub owner: Team,
    /// Only hunters carry a direction
    pub direction: Option<Direction>,
}

impl Tile {
    /// Revealed empty cell
    pub const EMPTY: Tile = Tile {
        tile_type: TileType::Empty,
        is_revealed: true,
        owner: Team::Neutral,
        direction: None,
    };

    pub const EXIT: Tile = Tile {
        tile_type: TileType::Exit,
        is_revealed: true,
        owner: Team::Neutral,
        direction: None,
    };

    pub const CABIN: Tile = Tile {
        tile_type: TileType::Cabin,
        is_revealed: true,
        owner: Team::Neutral,
        direction: None,
    };

    /// Face-down tile with owner derived from its type. Hunters get no
    /// direction here; use [`Tile::hidden_with_rng`] or [`Tile::hunter`].
    pub fn hidden(tile_type: TileType) -> Self {
        Self {
            tile_type,
            is_revealed: false,
            owner: tile_type.owner(),
            direction: None,
        }
    }

    /// Face-down tile; hunters draw a uniformly random direction
    pub fn hidden_with_rng<R: Rng + ?Sized>(tile_type: TileType, rng: &mut R) -> Self {
        let mut tile = Self::hidden(tile_type);
        if tile_type == TileType::Hunter {
            tile.direction = Some(Direction::random(rng));
        }
        tile
    }

    /// Face-up tile
    pub fn revealed(tile_type: TileType) -> Self {
        Self {
            is_revealed: true,
            ..Self::hidden(tile_type)
        }
    }

    /// Face-up hunter aiming in `direction`
    pub fn hunter(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Self::revealed(TileType::Hunter)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tile_type == TileType::Empty
    }

    pub fn is_exit(&self) -> bool {
        self.tile_type == TileType::Exit
    }

    /// Whether `team` may pick this tile up on its turn
    pub fn is_movable_by(&self, team: Team) -> bool {
        if self.tile_type.mobility() == Mobility::Fixed {
            return false;
        }
        self.owner == team || (self.owner == Team::Neutral && self.tile_type.is_shared_neutral())
    }

    /// Short label for logs and terminal rendering
    pub fn label(&self) -> String {
        match (self.tile_type, self.direction) {
            (TileType::Hunter, Some(dir)) => format!("Hunter{}", dir.arrow()),
            (tile_type, _) => tile_type.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owners() {
        assert_eq!(TileType::Hunter.owner(), Team::Humans);
        assert_eq!(TileType::Lumberjack.owner(), Team::Humans);
        assert_eq!(TileType::Fox.owner(), Team::Animals);
        assert_eq!(TileType::Bear.owner(), Team::Animals);
        for t in [TileType::Duck, TileType::Pheasant, TileType::Tree, TileType::Cabin, TileType::Exit, TileType::Empty] {
            assert_eq!(t.owner(), Team::Neutral, "{:?} should be neutral", t);
        }
    }

    #[test]
    fn test_tile_counts_fill_game_area() {
        let total: usize = TILE_COUNTS.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 48); // 7x7 minus the cabin
    }

    #[test]
    fn test_score_tables() {
        assert_eq!(TileType::Bear.capture_score(), 10);
        assert_eq!(TileType::Pheasant.capture_score(), 3);
        assert_eq!(TileType::Cabin.capture_score(), 0);
        assert_eq!(TileType::Bear.escape_score(), 10);
        assert_eq!(TileType::Duck.escape_score(), 0);
    }

    #[test]
    fn test_movable_by() {
        assert!(Tile::revealed(TileType::Duck).is_movable_by(Team::Humans));
        assert!(Tile::revealed(TileType::Pheasant).is_movable_by(Team::Animals));
        assert!(!Tile::revealed(TileType::Tree).is_movable_by(Team::Humans));
        assert!(!Tile::revealed(TileType::Fox).is_movable_by(Team::Humans));
        assert!(!Tile::CABIN.is_movable_by(Team::Neutral));
    }
}
