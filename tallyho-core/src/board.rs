//! Square board geometry and the tile grid

use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tiles::{Tile, TileType};

/// Full board width and height, including the exit ring
pub const BOARD_SIZE: usize = 9;

/// First row/column of the playable area
pub const GAME_AREA_START: i8 = 1;

/// Playable area width and height
pub const GAME_AREA_SIZE: i8 = 7;

/// Cabin cell at the center of the game area
pub const CABIN_POS: Position = Position::new(
    GAME_AREA_START + GAME_AREA_SIZE / 2,
    GAME_AREA_START + GAME_AREA_SIZE / 2,
);

/// Exits at the midpoint of each edge: top, bottom, left, right
pub const EXITS: [Position; 4] = [
    Position::new(0, 4),
    Position::new(8, 4),
    Position::new(4, 0),
    Position::new(4, 8),
];

/// Board coordinates (row, col), 0-indexed from the top-left corner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this position is on the 9x9 board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE as i8).contains(&self.row) && (0..BOARD_SIZE as i8).contains(&self.col)
    }

    /// Outer ring (exit line and exits)
    pub fn is_on_ring(&self) -> bool {
        let last = BOARD_SIZE as i8 - 1;
        self.is_valid() && (self.row == 0 || self.row == last || self.col == 0 || self.col == last)
    }

    pub fn is_in_game_area(&self) -> bool {
        let end = GAME_AREA_START + GAME_AREA_SIZE;
        (GAME_AREA_START..end).contains(&self.row) && (GAME_AREA_START..end).contains(&self.col)
    }

    pub fn is_exit(&self) -> bool {
        EXITS.contains(self)
    }

    pub fn manhattan(&self, other: Position) -> i8 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Distance to the closest exit
    pub fn distance_to_nearest_exit(&self) -> i8 {
        EXITS.iter().map(|&exit| self.manhattan(exit)).min().unwrap_or(0)
    }

    pub fn offset(&self, d_row: i8, d_col: i8) -> Position {
        Position::new(self.row + d_row, self.col + d_col)
    }

    /// Row and column step toward `to` if the two share a line
    pub fn step_toward(&self, to: Position) -> Option<(i8, i8)> {
        let d_row = to.row - self.row;
        let d_col = to.col - self.col;
        if (d_row == 0) == (d_col == 0) {
            return None; // diagonal or same cell
        }
        Some((d_row.signum(), d_col.signum()))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Hunter aim
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step as (d_row, d_col)
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        }
    }
}

/// 9x9 grid of tiles
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Tile; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Board with every cell revealed and empty, exits included
    pub fn empty() -> Self {
        let mut board = Self {
            cells: [[Tile::EMPTY; BOARD_SIZE]; BOARD_SIZE],
        };
        for exit in EXITS {
            board.set(exit, Tile::EXIT);
        }
        board
    }

    /// Get tile at position
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        if !pos.is_valid() {
            return None;
        }
        Some(&self.cells[pos.row as usize][pos.col as usize])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !pos.is_valid() {
            return None;
        }
        Some(&mut self.cells[pos.row as usize][pos.col as usize])
    }

    /// Overwrite a cell. Out-of-board positions are ignored.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if let Some(cell) = self.get_mut(pos) {
            *cell = tile;
        }
    }

    /// Iterate every cell in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, tile)| (Position::new(r as i8, c as i8), tile))
        })
    }

    /// Iterate the 7x7 playable area
    pub fn game_area(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles().filter(|(pos, _)| pos.is_in_game_area())
    }

    /// Face-down cells in the game area
    pub fn hidden_positions(&self) -> Vec<Position> {
        self.game_area()
            .filter(|(_, tile)| !tile.is_revealed)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Every tile other than exits and empties is face-up
    pub fn all_revealed(&self) -> bool {
        self.tiles()
            .all(|(_, tile)| tile.is_revealed || tile.is_exit() || tile.is_empty())
    }

    /// Cells holding something other than EMPTY or EXIT
    pub fn occupied_count(&self) -> usize {
        self.tiles()
            .filter(|(_, tile)| !tile.is_empty() && !tile.is_exit())
            .count()
    }

    pub fn count_type(&self, tile_type: TileType) -> usize {
        self.tiles().filter(|(_, t)| t.tile_type == tile_type).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<Position> for Board {
    type Output = Tile;

    fn index(&self, pos: Position) -> &Tile {
        &self.cells[pos.row as usize][pos.col as usize]
    }
}
