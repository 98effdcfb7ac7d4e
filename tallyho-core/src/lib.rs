//! Tally-Ho Core - Rules engine and AI
//!
//! This crate provides the core game logic for Tally-Ho:
//! - Board geometry (9x9 grid, 7x7 game area, exit ring)
//! - Tile types, teams and score tables
//! - Randomized board setup
//! - Move validation and capture rules
//! - Game state machine with rounds and a final phase
//! - Greedy heuristic AI with a tunable scoring policy

pub mod board;
pub mod tiles;
pub mod generator;
pub mod capture;
pub mod movement;
pub mod game;
pub mod eval;
pub mod ai;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Direction, Position, BOARD_SIZE, CABIN_POS, EXITS};
pub use tiles::{Mobility, Team, Tile, TileType, TILE_COUNTS};
pub use generator::{create_initial_board, generate_board, tile_counts};
pub use capture::can_capture;
pub use movement::{is_valid_move, legal_destinations, Phase};
pub use game::{Action, Decision, FinalScores, GameState, Outcome, PerTeam, RoundRecord, Status};
pub use eval::ScoringPolicy;
pub use ai::GreedyAi;
pub use config::GameConfig;
pub use error::{EngineError, Result};
