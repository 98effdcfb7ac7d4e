//! Randomized board setup

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::board::{Board, CABIN_POS, EXITS};
use crate::tiles::{Tile, TileType, TILE_COUNTS};

/// Deal a fresh board using the thread-local RNG
pub fn create_initial_board() -> Board {
    generate_board(&mut rand::thread_rng())
}

/// Deal a fresh board from the given RNG.
///
/// The cabin sits at the center, the 48 face-down tiles are shuffled
/// uniformly into the remaining game-area cells, every hunter gets an
/// independent random direction, and the four exits are stamped last.
pub fn generate_board<R: Rng + ?Sized>(rng: &mut R) -> Board {
    let mut board = Board::empty();

    let mut deck: Vec<TileType> = TILE_COUNTS
        .iter()
        .flat_map(|&(tile_type, count)| std::iter::repeat(tile_type).take(count))
        .collect();
    deck.shuffle(rng);

    let cells: Vec<_> = board
        .game_area()
        .map(|(pos, _)| pos)
        .filter(|&pos| pos != CABIN_POS)
        .collect();
    debug_assert_eq!(cells.len(), deck.len());

    for (pos, tile_type) in cells.into_iter().zip(deck) {
        board.set(pos, Tile::hidden_with_rng(tile_type, rng));
    }
    board.set(CABIN_POS, Tile::CABIN);

    for exit in EXITS {
        board.set(exit, Tile::EXIT);
    }

    board
}

/// Count tiles on the board by type
pub fn tile_counts(board: &Board) -> FxHashMap<TileType, usize> {
    let mut counts = FxHashMap::default();
    for (_, tile) in board.tiles() {
        *counts.entry(tile.tile_type).or_insert(0) += 1;
    }
    counts
}
