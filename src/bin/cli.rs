use clap::{Parser, ValueEnum};
use draughts_engine::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MOVETIME_MS, DEFAULT_ZOBRIST_SEED};
use draughts_engine::engine::{Engine, SearchSettings};
use draughts_engine::game::Game;
use draughts_engine::search::SearchResult;
use draughts_engine::types::{Board, GameResult, Side, Square};
use rand::Rng;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "draughts-cli", version, about = "Play Spanish draughts against the engine")]
struct Args {
    /// Maximum search depth in plies
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: u8,

    /// Time per computer move in milliseconds
    #[arg(long, default_value_t = DEFAULT_MOVETIME_MS)]
    movetime: u64,

    /// Side played by the computer from the first move
    #[arg(long, value_enum)]
    computer: Option<SideArg>,

    /// Seed of the Zobrist keys
    #[arg(long, default_value_t = DEFAULT_ZOBRIST_SEED)]
    seed: u64,

    /// Log filter, e.g. `debug` or `draughts_engine=trace` (defaults to RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    Black,
    White,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Black => Side::Black,
            SideArg::White => Side::White,
        }
    }
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let len = s.len();

    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

/// Reads one line; `None` at end of input
fn read_line() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

fn flush() {
    let _ = io::stdout().flush();
}

struct Cli {
    engine: Engine,
    game: Game,
    display_enabled: bool,
}

impl Cli {
    fn new(args: &Args) -> Self {
        let mut engine = Engine::new(SearchSettings {
            max_depth: args.depth.max(1),
            movetime_ms: Some(args.movetime),
            zobrist_seed: args.seed,
            ..SearchSettings::default()
        });
        engine.computer_side = args.computer.map(Side::from);

        let game = engine.new_game();

        Self {
            engine,
            game,
            display_enabled: true,
        }
    }

    fn show_help(&self) {
        println!("\n======================= INFORMATION ======================");
        println!("h or help - Displays help on the commands");
        println!("d or dd   - Displays board and toggles display setting");
        println!("moves     - Displays the list of legal moves");
        println!("q or quit - Quits the program");
        println!("================= CONTROLLING THE ENGINE =================");
        println!("go        - Chooses sides and starts the engine");
        println!("new       - Starts a new game");
        println!("p or play - The computer plays a move");
        println!("off       - Turns the computer player off");
        println!("switch    - Switches the side to move");
        println!("undo      - Takes back the last move");
        println!("===================== CONFIGURATION ======================");
        println!("load         - Reads an 8-line board diagram (b B w W .)");
        println!("sd <depth>   - Sets the maximum search depth");
        println!("st <seconds> - Sets the time limit per move in seconds");
        println!("======================== MOVES ===========================");
        println!("c3d4 or c3 d4 - Moves the piece on c3 to d4");
        println!("c3            - Shows the moves of the piece on c3");
    }

    fn display_board(&self) {
        if self.display_enabled {
            println!("{}", self.game.board());
        }
    }

    /// Returns whether the game is over
    fn print_result(&mut self) -> bool {
        let message = match self.game.result() {
            GameResult::InProgress => return false,
            GameResult::Win(Side::White) => "{White wins}",
            GameResult::Win(Side::Black) => "{Black wins}",
            GameResult::DrawByRepetition => "{Draw by repetition}",
            GameResult::DrawByNoCaptureLimit => "{Draw by no-capture limit}",
            GameResult::DrawByLonePieces => "{Draw, one piece each}",
        };

        self.display_board();
        println!("\nGAME OVER");
        println!("{}", message);

        self.engine.computer_side = None;
        self.game = self.engine.new_game();
        true
    }

    fn display_legal_moves(&self) {
        let mut moves: Vec<String> = self
            .game
            .legal_moves()
            .iter()
            .map(ToString::to_string)
            .collect();
        moves.sort();

        for (index, move_str) in moves.iter().enumerate() {
            print!("{} ", move_str);
            if (index + 1) % 8 == 0 {
                println!();
            }
        }
        println!();
    }

    fn run_main_loop(&mut self) {
        self.display_board();

        loop {
            println!("\n-------------------------------");
            println!(
                "*   Ply: {} | To move: {:?}   *",
                self.game.ply(),
                self.game.turn()
            );
            println!("-------------------------------");

            // Computer's turn
            if self.engine.computer_side == Some(self.game.turn()) {
                println!("\nComputer is thinking...");
                println!("\n┌──────┬──────────────┬──────────┬────────────────────┐");
                println!("│ DEPTH│    NODES     │  SCORE   │     BEST MOVE      │");
                println!("├──────┼──────────────┼──────────┼────────────────────┤");

                if !self.make_computer_move() {
                    println!("(No legal moves)");
                    self.engine.computer_side = None;
                }

                if !self.print_result() {
                    self.display_board();
                }

                continue;
            }

            print!("\nFrom square OR command > ");
            flush();

            let Some(input) = read_line() else {
                return;
            };

            let command = input.trim().to_lowercase();

            // COMMANDS WITHOUT PARAMETERS
            match command.as_str() {
                "d" => {
                    println!("{}", self.game.board());
                    continue;
                }
                "dd" => {
                    self.display_enabled = !self.display_enabled;

                    if self.display_enabled {
                        println!("\nBoard display enabled");
                        self.display_board();
                    } else {
                        println!("\nBoard display disabled");
                    }
                    continue;
                }
                "go" => {
                    self.handle_go_command();
                    continue;
                }
                "h" | "help" => {
                    self.show_help();
                    continue;
                }
                "moves" => {
                    println!("\nLegal moves:");
                    self.display_legal_moves();
                    continue;
                }
                "new" => {
                    self.engine.computer_side = None;
                    self.game = self.engine.new_game();
                    self.display_board();
                    continue;
                }
                "p" | "play" => {
                    self.engine.computer_side = Some(self.game.turn());
                    continue;
                }
                "off" => {
                    self.engine.computer_side = None;
                    continue;
                }
                "q" | "quit" => {
                    println!("\nProgram exiting");
                    break;
                }
                "switch" => {
                    // The history cannot be replayed with the other side to move
                    self.game =
                        Game::from_board(self.game.board().clone(), self.game.turn().opponent());
                    continue;
                }
                "undo" => {
                    self.engine.computer_side = None;
                    match self.game.undo() {
                        Ok(_) => self.display_board(),
                        Err(e) => println!("\n{}", e),
                    }
                    continue;
                }
                "load" => {
                    self.handle_load_command();
                    continue;
                }
                _ => {}
            }

            // COMMANDS WITH PARAMETERS
            if let Some(depth) = command.strip_prefix("sd ") {
                if let Ok(depth) = depth.trim().parse::<u8>() {
                    self.engine.set_max_depth(depth);
                    println!("\nSearch maximum search depth set to {}", depth.max(1));
                }
                continue;
            }

            if let Some(time) = command.strip_prefix("st ") {
                if let Ok(time) = time.trim().parse::<u64>() {
                    self.engine.set_movetime(Some(time * 1000));
                    println!("\nSearch time set to {} seconds", time);
                }
                continue;
            }

            // PARSE "FROM" AND THEN "TO" SQUARE
            let cleaned_command = command.replace(' ', "");

            let Some(from_square) = cleaned_command
                .get(..2)
                .and_then(|from| from.parse::<Square>().ok())
            else {
                println!("\nINVALID COMMAND!");
                continue;
            };

            let to_input = match cleaned_command.len() {
                // Need to prompt for "to" square
                2 => {
                    match self.game.select(from_square) {
                        Ok(moves) => {
                            let moves: Vec<String> = moves.iter().map(ToString::to_string).collect();
                            println!("\nMoves: {}", moves.join(" "));
                        }
                        Err(e) => {
                            println!("\n{}", e);
                            continue;
                        }
                    }

                    print!("             To square > ");
                    flush();

                    let Some(to_input) = read_line() else {
                        return;
                    };

                    println!();
                    to_input
                }
                // "to" square is included in command
                4 => cleaned_command[2..].to_string(),
                _ => {
                    println!("\nINVALID COMMAND!");
                    continue;
                }
            };

            let Ok(to_square) = to_input.trim().parse::<Square>() else {
                println!("\nINVALID TO SQUARE!");
                continue;
            };

            match self.game.play(from_square, to_square) {
                Ok(_) => {
                    if !self.print_result() {
                        self.display_board();
                    }
                }
                Err(e) => println!("\nILLEGAL MOVE! {}", e),
            }
        }
    }

    fn handle_go_command(&mut self) {
        println!("\nChoose your side:");
        println!("1. White");
        println!("2. Black");
        println!("3. Random");
        print!("\nEnter choice (1-3) > ");
        flush();

        let Some(input) = read_line() else {
            return;
        };

        println!();

        let player_side = match input.trim() {
            "1" => Side::White,
            "2" => Side::Black,
            "3" => {
                let side = match rand::thread_rng().gen_bool(0.5) {
                    true => Side::White,
                    false => Side::Black,
                };
                println!("You are playing as {:?}", side);
                side
            }
            _ => {
                println!("Invalid choice. Defaulting to White.");
                Side::White
            }
        };

        self.engine.computer_side = Some(player_side.opponent());
    }

    fn handle_load_command(&mut self) {
        println!("\nEnter 8 rows (b B w W .), top row first, then the side to move (w/b):");

        let mut diagram = String::new();
        for _ in 0..8 {
            let Some(line) = read_line() else {
                return;
            };
            diagram.push_str(&line);
        }

        let Some(side) = read_line() else {
            return;
        };
        let side = match side.trim() {
            "b" => Side::Black,
            _ => Side::White,
        };

        match Board::from_diagram(Arc::clone(self.engine.keys()), &diagram) {
            Ok(board) => {
                self.engine.computer_side = None;
                self.game = Game::from_board(board, side);
                self.display_board();
                println!("Board loaded successfully");
            }
            Err(e) => println!("Error loading board: {}", e),
        }
    }

    fn make_computer_move(&mut self) -> bool {
        let result = self.engine.think(
            &self.game,
            Some(|result: &SearchResult| {
                let best_move = result
                    .best_move
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();

                println!(
                    "│ {:>4} │ {:>12} │ {:>8} │ {:^18} │",
                    result.depth,
                    format_with_commas((result.stats.nodes + result.stats.qnodes) as u64),
                    result.score,
                    best_move
                );
                flush();
            }),
        );

        println!("└──────┴──────────────┴──────────┴────────────────────┘");

        let Some(best_move) = result.best_move.clone() else {
            return false;
        };

        if let Err(e) = self.game.play_move(&best_move) {
            println!("\n{}", e);
            return false;
        }

        let stats = result.stats;
        let total_nodes = stats.nodes + stats.qnodes;
        let q_percent = if total_nodes > 0 {
            (stats.qnodes as f64 / total_nodes as f64 * 100.0) as u64
        } else {
            0
        };
        let cutoff_rate = if stats.nodes > 0 {
            (stats.cutoffs as f64 / stats.nodes as f64 * 100.0) as u64
        } else {
            0
        };

        // Display comprehensive statistics
        println!("\n┌─────────────────────── SEARCH STATISTICS ───────────────────────┐");
        println!(
            "│ Time:        {:>9} ms  │  Depth:  {:>4}     Max ply:    {:>3}  │",
            format_with_commas(result.time_ms),
            result.depth,
            stats.max_ply
        );
        println!(
            "│ Nodes:       {:>12}  │  Qui-Nodes:    {:>12} ({}%)  │",
            format_with_commas(total_nodes as u64),
            format_with_commas(stats.qnodes as u64),
            q_percent
        );
        println!(
            "│ NPS:         {:>12}  │  β-Cutoffs:    {:>12} ({}%)  │",
            format_with_commas(result.nodes_per_second()),
            format_with_commas(stats.cutoffs as u64),
            cutoff_rate
        );
        println!(
            "│ Hash hits:   {:>12}  │  Hash filled:  {:>12}       │",
            format_with_commas(stats.hash_hits as u64),
            format_with_commas(result.hash_occupancy as u64)
        );
        println!("└─────────────────────────────────────────────────────────────────┘");

        let line: Vec<String> = result
            .principal_variation
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("\nExpected line: {}", line.join(" "));

        if let Some(plies) = result.plies_to_result() {
            let verdict = if result.score > 0 { "Win" } else { "Loss" };
            println!("{} in {} plies", verdict, plies);
        }

        println!("\nComputer plays: \x1b[32m{}\x1b[0m", best_move);

        true
    }
}

fn main() {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    println!("\n==============================");
    println!("|  Spanish Draughts Engine   |");
    println!("==============================\n");
    println!("Version 0.1");
    println!("\n\"h or help\" displays a list of commands\n");

    let mut cli = Cli::new(&args);
    cli.run_main_loop();
}
