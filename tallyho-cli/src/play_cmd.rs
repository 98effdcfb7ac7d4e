//! Play command - interactive game against the AI
//!
//! The user plays Humans in round 1 and Animals in round 2. Each prompt takes
//! `row col` to click a cell, `pass`, `help` or `quit`.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use rand::Rng;

use tallyho_core::{
    legal_destinations, EngineError, GameState, GreedyAi, Outcome, Phase, Position, Status, Tile, TileType,
    BOARD_SIZE,
};

use crate::{create_rng, load_settings};

/// Log lines shown under the board
const RECENT_LOG_LINES: usize = 4;

#[derive(Args)]
pub struct PlayArgs {
    /// Seed for board dealing and AI choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause before each AI action, in milliseconds
    #[arg(long, default_value = "600")]
    pub ai_delay_ms: u64,

    /// Scoring policy JSON for the AI
    #[arg(long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Game config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// One line of user input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Click(Position),
    Pass,
    Help,
    Quit,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let (config, policy) = load_settings(args.config.as_deref(), args.policy.as_deref())?;
    let mut rng = create_rng(args.seed);
    let mut state = GameState::new(config, &mut rng);
    let mut ai = GreedyAi::with_seed(policy, rng.gen());
    let delay = Duration::from_millis(args.ai_delay_ms);

    tracing::info!(seed = ?args.seed, "new game; you play {}", state.user_team().name());
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match state.status() {
            Status::GameOver => {
                print!("{}", render(&state));
                print_final(&state);
                return Ok(());
            }
            Status::RoundOver => {
                print!("{}", render(&state));
                println!("Round {} is over. Press Enter to swap sides and deal round 2.", state.round());
                if lines.next().transpose()?.is_none() {
                    return Ok(());
                }
                state.start_next_round(&mut rng)?;
                println!("You now play {}.", state.user_team().name());
                continue;
            }
            Status::InProgress => {}
        }

        if state.current_team() == state.ai_team() {
            play_ai_turn(&mut state, &mut ai, delay)?;
            continue;
        }

        print!("{}", render(&state));
        print!("{} > ", state.current_team().name());
        io::stdout().flush()?;

        let line = match lines.next().transpose()? {
            Some(line) => line,
            None => return Ok(()),
        };

        match parse_command(&line) {
            Some(Command::Quit) => return Ok(()),
            Some(Command::Help) => print_help(),
            Some(Command::Pass) => println!("{}", describe(&state.pass_turn()?)),
            Some(Command::Click(pos)) => match state.on_tile_click(pos) {
                Ok(outcome) => println!("{}", describe(&outcome)),
                Err(EngineError::OutOfBounds(pos)) => println!("{} is off the board", pos),
                Err(e) => return Err(e.into()),
            },
            None => println!("Type `row col`, `pass`, `help` or `quit`."),
        }
    }
}

/// Decide, wait, then apply unless the game moved on meanwhile
fn play_ai_turn(state: &mut GameState, ai: &mut GreedyAi, delay: Duration) -> Result<()> {
    let decision = match ai.decide(state) {
        Some(decision) => decision,
        None => return Ok(()),
    };

    std::thread::sleep(delay);

    match state.apply_decision(decision) {
        Ok(outcome) => {
            tracing::debug!(action = ?decision.action, "ai acted");
            println!("AI: {}", describe(&outcome));
        }
        Err(EngineError::StaleDecision { decided, current }) => {
            tracing::warn!(decided, current, "dropping stale AI decision");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "q" | "quit" | "exit" => return Some(Command::Quit),
        "p" | "pass" => return Some(Command::Pass),
        "h" | "help" | "?" => return Some(Command::Help),
        _ => {}
    }

    let mut parts = line.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
    let row = parts.next()?.parse::<i8>().ok()?;
    let col = parts.next()?.parse::<i8>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Command::Click(Position::new(row, col)))
}

/// Two-character cell code
fn cell_code(tile: &Tile) -> String {
    if !tile.is_revealed {
        return "##".to_string();
    }
    match tile.tile_type {
        TileType::Hunter => match tile.direction {
            Some(dir) => format!("H{}", dir.arrow()),
            None => "H ".to_string(),
        },
        TileType::Lumberjack => "LJ".to_string(),
        TileType::Fox => "Fx".to_string(),
        TileType::Bear => "Br".to_string(),
        TileType::Duck => "Dk".to_string(),
        TileType::Pheasant => "Ph".to_string(),
        TileType::Tree => "Tr".to_string(),
        TileType::Cabin => "Cb".to_string(),
        TileType::Exit => "<>".to_string(),
        TileType::Empty => " .".to_string(),
    }
}

/// Marker after a cell: `*` selected, `+` move, `x` capture, `!` escape
fn cell_marker(tile: &Tile, pos: Position, selected: Option<Position>, targets: &[Position]) -> char {
    if selected == Some(pos) {
        '*'
    } else if !targets.contains(&pos) {
        ' '
    } else if tile.is_exit() {
        '!'
    } else if tile.is_empty() {
        '+'
    } else {
        'x'
    }
}

/// Board, status line and recent log as text
fn render(state: &GameState) -> String {
    let mut out = String::new();
    let board = state.board();
    let targets = match state.selected() {
        Some(from) => legal_destinations(from, board, state.current_team(), state.phase()),
        None => Vec::new(),
    };

    out.push_str("\n    ");
    for col in 0..BOARD_SIZE {
        let _ = write!(out, " {} ", col);
    }
    out.push('\n');

    for row in 0..BOARD_SIZE as i8 {
        let _ = write!(out, " {}  ", row);
        for col in 0..BOARD_SIZE as i8 {
            let pos = Position::new(row, col);
            let tile = &board[pos];
            let marker = cell_marker(tile, pos, state.selected(), &targets);
            let _ = write!(out, "{}{}", cell_code(tile), marker);
        }
        out.push('\n');
    }

    let scores = state.scores();
    let _ = write!(
        out,
        "\nRound {} | Humans {} - Animals {} | {} to move",
        state.round(),
        scores.humans,
        scores.animals,
        state.current_team().name()
    );
    if state.phase() == Phase::Final {
        let left = state.remaining_moves();
        let _ = write!(out, " | final phase, moves left H{} A{}", left.humans, left.animals);
    }
    out.push('\n');

    let log: Vec<&str> = state.log().collect();
    for entry in &log[log.len().saturating_sub(RECENT_LOG_LINES)..] {
        let _ = writeln!(out, "  {}", entry);
    }
    out
}

fn describe(outcome: &Outcome) -> String {
    match *outcome {
        Outcome::Ignored => "Nothing to do there.".to_string(),
        Outcome::Selected(pos) => format!("Selected {}; pick a destination or click it again.", pos),
        Outcome::Deselected => "Selection cleared.".to_string(),
        Outcome::Rejected => "That move is not allowed.".to_string(),
        Outcome::Revealed { pos, tile_type } => format!("Revealed {} at {}.", tile_type.name(), pos),
        Outcome::Moved { from, to, captured: Some(victim), points } => {
            format!("{} -> {} captured {} (+{}).", from, to, victim.name(), points)
        }
        Outcome::Moved { from, to, captured: None, .. } => format!("{} -> {}.", from, to),
        Outcome::Escaped { tile_type, exit, points, .. } => {
            format!("{} escaped through {} (+{}).", tile_type.name(), exit, points)
        }
        Outcome::Passed => "Passed.".to_string(),
    }
}

fn print_help() {
    println!("Click a cell with `row col` (0-8). Face-down tiles (##) are revealed;");
    println!("click one of your tiles, then a destination, to move. `pass` skips, `quit` leaves.");
    println!("After selecting: `+` move, `x` capture, `!` escape.");
}

fn print_final(state: &GameState) {
    for record in state.history() {
        let leader = match record.scores.leader() {
            Some(team) if team == record.user_team => "you led",
            Some(_) => "AI led",
            None => "level",
        };
        println!(
            "Round {}: Humans {} - Animals {} (you played {}, {})",
            record.round,
            record.scores.humans,
            record.scores.animals,
            record.user_team.name(),
            leader
        );
    }
    if let Some(totals) = state.final_scores() {
        let verdict = match totals.user.cmp(&totals.ai) {
            std::cmp::Ordering::Greater => "You win!",
            std::cmp::Ordering::Less => "The AI wins.",
            std::cmp::Ordering::Equal => "It's a draw.",
        };
        println!("Final: you {} - AI {}. {}", totals.user, totals.ai, verdict);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tallyho_core::{Board, Direction, GameConfig};

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("3 4"), Some(Command::Click(Position::new(3, 4))));
        assert_eq!(parse_command(" 3,4 "), Some(Command::Click(Position::new(3, 4))));
        assert_eq!(parse_command("PASS"), Some(Command::Pass));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("?"), Some(Command::Help));
        assert_eq!(parse_command("3"), None);
        assert_eq!(parse_command("3 4 5"), None);
        assert_eq!(parse_command("a b"), None);
        // off-board cells parse; the engine reports them
        assert_eq!(parse_command("12 0"), Some(Command::Click(Position::new(12, 0))));
    }

    #[test]
    fn test_render_fresh_board() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = GameState::new(GameConfig::default(), &mut rng);
        let text = render(&state);
        assert_eq!(text.matches("##").count(), 48);
        assert_eq!(text.matches("<>").count(), 4);
        assert!(text.contains("Cb"));
        assert!(text.contains("Round 1"));
        assert!(!text.contains("final phase"));
    }

    #[test]
    fn test_render_marks_selection() {
        let mut board = Board::empty();
        board.set(Position::new(2, 2), Tile::hunter(Direction::Left));
        board.set(Position::new(6, 6), Tile::hidden(TileType::Tree));
        let mut state = GameState::with_board(board, GameConfig::default());
        state.on_tile_click(Position::new(2, 2)).unwrap();
        let text = render(&state);
        assert!(text.contains(&format!("H{}*", Direction::Left.arrow())));
    }

    #[test]
    fn test_render_marks_destinations() {
        let mut board = Board::empty();
        board.set(Position::new(2, 2), Tile::hunter(Direction::Right));
        board.set(Position::new(2, 5), Tile::revealed(TileType::Fox));
        board.set(Position::new(6, 6), Tile::hidden(TileType::Tree));
        let mut state = GameState::with_board(board, GameConfig::default());

        assert_eq!(render(&state).matches(" .+").count(), 0);
        state.on_tile_click(Position::new(2, 2)).unwrap();
        let text = render(&state);
        // fox in the aim lane is a capture target
        assert!(text.contains("Fxx"));
        // (2,1), (2,3), (2,4) and (1,2)..(7,2) except the hunter's own cell
        assert_eq!(text.matches(" .+").count(), 9);
        assert!(!text.contains("<>!"));
    }

    #[test]
    fn test_render_marks_exit_targets() {
        let mut board = Board::empty();
        board.set(Position::new(4, 1), Tile::revealed(TileType::Bear));
        let mut state = GameState::with_board(board, GameConfig::default());
        assert_eq!(state.phase(), Phase::Final);

        state.pass_turn().unwrap();
        state.on_tile_click(Position::new(4, 1)).unwrap();
        let text = render(&state);
        assert_eq!(text.matches("<>!").count(), 1);
        assert_eq!(text.matches(" .+").count(), 3);
        assert!(text.contains("Br*"));
    }

    #[test]
    fn test_cell_marker() {
        let targets = [Position::new(1, 1), Position::new(4, 0), Position::new(3, 3)];
        let selected = Some(Position::new(5, 5));
        assert_eq!(cell_marker(&Tile::EMPTY, Position::new(1, 1), selected, &targets), '+');
        assert_eq!(cell_marker(&Tile::EXIT, Position::new(4, 0), selected, &targets), '!');
        assert_eq!(cell_marker(&Tile::revealed(TileType::Tree), Position::new(3, 3), selected, &targets), 'x');
        assert_eq!(cell_marker(&Tile::EMPTY, Position::new(2, 2), selected, &targets), ' ');
        assert_eq!(cell_marker(&Tile::revealed(TileType::Bear), Position::new(5, 5), selected, &targets), '*');
    }

    #[test]
    fn test_describe() {
        let outcome = Outcome::Moved {
            from: Position::new(3, 3),
            to: Position::new(3, 6),
            captured: Some(TileType::Fox),
            points: 5,
        };
        assert_eq!(describe(&outcome), "(3, 3) -> (3, 6) captured Fox (+5).");
        assert_eq!(describe(&Outcome::Rejected), "That move is not allowed.");
    }

    #[test]
    fn test_ai_turn_applies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut state = GameState::new(GameConfig::default(), &mut rng);
        state.pass_turn().unwrap();
        assert_eq!(state.current_team(), state.ai_team());

        let mut ai = GreedyAi::with_seed(Default::default(), 4);
        play_ai_turn(&mut state, &mut ai, Duration::ZERO).unwrap();
        assert_eq!(state.current_team(), state.user_team());
    }
}
