use std::io::{stdin, stdout};
use std::process::ExitCode;
use std::time::Instant;

use chess_arcade::chess_board::fen::INITIAL_POSITION;
use chess_arcade::chess_board::perft::divide;
use chess_arcade::engines::{Player, RandomPlayer};
use chess_arcade::ui::{Opponent, TerminalGame};
use chess_arcade::{ChessBoard, ChessError, ChessResult, Color, GameSession, Move};

use clap::arg;
use clap::command;
use clap::ArgMatches;
use clap::Command;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = command!()
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ).global(true))
        .subcommand(
            Command::new("play")
                .about("Play a game in the terminal")
                .arg(
                    arg!(
                    -o --opponent <OPPONENT> "Who plays the other side"
                            )
                    .value_parser(["random", "human"])
                    .default_value("random"),
                )
                .arg(
                    arg!(
                    -c --color <COLOR> "Your color against the computer"
                            )
                    .value_parser(["white", "black"])
                    .default_value("white"),
                )
                .arg(
                    arg!(
                    -s --seed <SEED> "Seed for the random opponent"
                            )
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                    -f --fen <FEN> "Start position"
                            )
                    .default_value(INITIAL_POSITION),
                ),
        )
        .subcommand(
            Command::new("perft")
                .about("Count the legal move tree of a position")
                .arg(
                    arg!(
                    -f --fen <FEN> "Board position"
                            )
                    .default_value(INITIAL_POSITION),
                )
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8).range(1..)),
                )
                .arg(
                    arg!(
                    -m --moves <moves> "List of moves"
                            )
                    .num_args(1..)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Show check, checkmate or stalemate for a position")
                .arg(
                    arg!(
                    -f --fen <FEN> "Board position"
                            )
                    .default_value(INITIAL_POSITION),
                ),
        )
        .subcommand(
            Command::new("benchmark")
                .about("Plays random games against itself")
                .arg(
                    arg!(
                    -g --games <N> "Number of games"
                            )
                    .default_value("5")
                    .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(
                    -s --seed <SEED> "First seed, game i uses seed + i"
                            )
                    .default_value("0")
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                    -p --"max-plies" <N> "Stop a game after this many plies"
                            )
                    .default_value("200")
                    .value_parser(clap::value_parser!(usize)),
                ),
        )
        .get_matches();

    init_logging(matches.get_flag("debug"));

    let result = match matches.subcommand() {
        Some(("play", arg_matches)) => play(PlayOptions::from_matches(arg_matches)),
        Some(("perft", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").map(String::as_str).unwrap_or(INITIAL_POSITION);
            let depth = arg_matches.get_one::<u8>("depth").copied().unwrap_or(3);
            let moves = arg_matches
                .get_many::<String>("moves")
                .unwrap_or_default()
                .filter(|&v| !v.is_empty())
                .collect::<Vec<_>>();
            perft(fen, moves, depth)
        }
        Some(("status", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").map(String::as_str).unwrap_or(INITIAL_POSITION);
            status(fen)
        }
        Some(("benchmark", arg_matches)) => benchmark(
            arg_matches.get_one::<u32>("games").copied().unwrap_or(5),
            arg_matches.get_one::<u64>("seed").copied().unwrap_or(0),
            arg_matches.get_one::<usize>("max-plies").copied().unwrap_or(200),
        ),
        None => play(PlayOptions::default()),
        _ => unreachable!("Exhausted list of subcommands"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with the board on stdout. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct PlayOptions {
    random_opponent: bool,
    human_color: Color,
    seed: Option<u64>,
    fen: String,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            random_opponent: true,
            human_color: Color::White,
            seed: None,
            fen: INITIAL_POSITION.to_string(),
        }
    }
}

impl PlayOptions {
    fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();
        Self {
            random_opponent: matches.get_one::<String>("opponent").map_or(true, |o| o == "random"),
            human_color: match matches.get_one::<String>("color").map(String::as_str) {
                Some("black") => Color::Black,
                _ => Color::White,
            },
            seed: matches.get_one::<u64>("seed").copied(),
            fen: matches.get_one::<String>("fen").cloned().unwrap_or(defaults.fen),
        }
    }
}

fn play(options: PlayOptions) -> ChessResult<()> {
    let (board, active_color) = ChessBoard::from_fen(&options.fen)?;
    let opponent = if options.random_opponent {
        let player = match options.seed {
            Some(seed) => RandomPlayer::with_seed(seed),
            None => RandomPlayer::new(),
        };
        Some(Opponent {
            color: options.human_color.opposite(),
            player: Box::new(player),
        })
    } else {
        None
    };
    info!(fen = %options.fen, random_opponent = options.random_opponent, "starting game");

    let mut game = TerminalGame::new(GameSession::from_position(board, active_color), opponent);
    game.run(stdin().lock(), &mut stdout())
}

fn perft(fen: &str, moves: Vec<&String>, depth: u8) -> ChessResult<()> {
    println!("Perft test for {} moves {:?} with depth {}", fen, moves, depth);
    let (mut board, mut active_color) = ChessBoard::from_fen(fen)?;
    for m in moves {
        let mv = Move::from_algebraic(m)?;
        if !board.legal_moves(active_color).contains(&mv) {
            return Err(ChessError::IllegalMove { notation: m.clone() });
        }
        board = board.apply(mv);
        active_color = active_color.opposite();
    }

    let start_time = Instant::now();
    let mut num_nodes = 0;
    for (mv, count) in divide(&board, active_color, depth) {
        println!("{}: {}", mv, count);
        num_nodes += count;
    }
    println!("\nNodes searched: {}", num_nodes);
    println!("Time: {:.3}s", start_time.elapsed().as_secs_f32());
    Ok(())
}

fn status(fen: &str) -> ChessResult<()> {
    let (board, active_color) = ChessBoard::from_fen(fen)?;
    println!("{}", board.render_to_string());
    println!("Side to move: {}", active_color);
    println!("Status: {:?}", board.status(active_color));
    println!("Legal moves: {}", board.legal_moves(active_color).len());
    Ok(())
}

#[derive(Tabled)]
struct BenchmarkRow {
    game: u32,
    seed: u64,
    plies: usize,
    result: String,
    elapsed_time: f32,
    plies_per_sec: f32,
}

fn benchmark(games: u32, seed: u64, max_plies: usize) -> ChessResult<()> {
    let mut table_rows = Vec::new();
    for game in 0..games {
        let game_seed = seed.wrapping_add(game as u64);
        let mut players = [RandomPlayer::with_seed(game_seed), RandomPlayer::with_seed(game_seed.wrapping_add(1 << 32))];
        let mut session = GameSession::new();
        let start_time = Instant::now();

        while !session.is_over() && session.history().len() < max_plies {
            let side = session.current_player();
            let player = match side {
                Color::White => &mut players[0],
                Color::Black => &mut players[1],
            };
            match player.choose_move(session.board(), side) {
                Some(mv) => {
                    session.make_move(mv)?;
                }
                None => break,
            }
        }

        let elapsed = start_time.elapsed();
        let plies = session.history().len();
        let result = match session.outcome() {
            Some(outcome) => outcome.to_string(),
            None => "Ply limit".to_string(),
        };
        info!(game, plies, %result, "benchmark game finished");
        table_rows.push(BenchmarkRow {
            game,
            seed: game_seed,
            plies,
            result,
            elapsed_time: elapsed.as_secs_f32(),
            plies_per_sec: plies as f32 / elapsed.as_secs_f32().max(f32::EPSILON),
        });
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    Ok(())
}
