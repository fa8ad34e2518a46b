//! Pyramid-Solver: Monte Carlo solver for the pyramid card puzzle.
//!
//! ## Usage
//!
//! - `pyramid-solver` - Solve the built-in example puzzle
//! - `pyramid-solver demo` - Same as above
//! - `pyramid-solver solve --pyramid <cards> [--draw <cards>]` - Solve a given deal
//! - `pyramid-solver solve --random` - Solve a random deal

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

use pyramid_solver::constants::DEFAULT_ITERATIONS;
use pyramid_solver::coord::Move;
use pyramid_solver::game::GameState;
use pyramid_solver::input::parse_cards;
use pyramid_solver::search::{SearchConfig, search};
use pyramid_solver::{EXAMPLE_DRAW, EXAMPLE_PYRAMID};

/// Pyramid-Solver: parallel Monte Carlo search for the pyramid card puzzle
#[derive(Parser)]
#[command(name = "pyramid-solver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log per-worker progress
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a deal given on the command line, or a random one
    Solve {
        /// 28 pyramid cards, bottom row first (numbers, or keys a s d f g h j k l r t y u)
        #[arg(long, required_unless_present = "random")]
        pyramid: Option<String>,
        /// Up to 24 draw-pile cards in deal order
        #[arg(long, default_value = "")]
        draw: String,
        /// Deal a shuffled deck instead
        #[arg(long, conflicts_with = "pyramid")]
        random: bool,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Solve the built-in example puzzle
    Demo {
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Total number of playouts
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
    /// Worker threads (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,
    /// Base seed (defaults to the clock)
    #[arg(short, long)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn default_demo() -> Self {
        SearchArgs {
            iterations: DEFAULT_ITERATIONS,
            workers: None,
            seed: None,
        }
    }

    fn config(&self) -> SearchConfig {
        let mut config = SearchConfig::new(self.iterations);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Some(Commands::Solve {
            pyramid,
            draw,
            random,
            search,
        }) => {
            let config = search.config();
            let puzzle = if random {
                let seed = config.deal_seed();
                info!("Dealing a random puzzle with seed {seed}");
                GameState::random(&mut fastrand::Rng::with_seed(seed))
            } else {
                let Some(pyramid) = pyramid else {
                    bail!("either --pyramid or --random is required");
                };
                let pyramid = parse_cards(&pyramid).context("invalid pyramid cards")?;
                let draw = parse_cards(&draw).context("invalid draw-pile cards")?;
                GameState::from_cards(&pyramid, &draw).context("invalid puzzle")?
            };
            solve(&puzzle, &config);
        }
        Some(Commands::Demo { search }) => run_demo(&search.config())?,
        None => run_demo(&SearchArgs::default_demo().config())?,
    }
    Ok(())
}

fn run_demo(config: &SearchConfig) -> Result<()> {
    println!("Pyramid-Solver: example puzzle\n");
    let puzzle = GameState::from_cards(&EXAMPLE_PYRAMID, &EXAMPLE_DRAW)
        .context("example puzzle is invalid")?;
    solve(&puzzle, config);
    Ok(())
}

fn solve(puzzle: &GameState, config: &SearchConfig) {
    println!("Initial state:\n{puzzle}");

    let best = search(puzzle, config);
    println!(
        "Best solution found - Score: {}, Moves: {}\n",
        best.score,
        best.moves.len()
    );
    let (steps, replay) = format_solution(puzzle, &best.moves);
    println!("{steps}");
    println!("Final state:\n{replay}");
}

/// Replay `moves` from `puzzle` and render them as numbered steps.
///
/// Returns the text and the state reached at the end.
fn format_solution(puzzle: &GameState, moves: &[Move]) -> (String, GameState) {
    let mut replay = puzzle.clone();
    let mut out = String::from("Step-by-step solution:\n");
    for (i, &mv) in moves.iter().enumerate() {
        let cleared = replay.apply_move(mv);
        out.push_str(&format!("{:3}. {}\n", i + 1, mv.describe(cleared)));
    }
    (out, replay)
}
