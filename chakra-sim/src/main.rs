//! Chakra Simulator
//!
//! Plays batches of computer-only games and reports who wins, how, and how
//! long games last.

mod simulate;
mod stats;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chakra_core::PlayerCount;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Play computer-only Chakra games and summarize the outcomes.
#[derive(Parser)]
#[command(name = "chakra-sim", about = "Play computer-only Chakra games")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Players per game: 2, 3 or 4
    #[arg(long, default_value_t = 2)]
    players: u8,

    /// Base seed; game i uses seed + i. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Turns after which a game counts as unfinished
    #[arg(long, default_value_t = 1000)]
    max_turns: usize,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let count = PlayerCount::try_from(cli.players).context("invalid --players")?;
    let seed = cli.seed.unwrap_or_else(rand::random);

    println!("Chakra Simulator");
    println!("================");
    println!(
        "Players: {}  Games: {}  Seed: {}  Turn limit: {}",
        count.get(),
        cli.games,
        seed,
        cli.max_turns
    );
    println!();

    // Set up SIGINT handler to stop after the current game
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, finishing current game...");
        r.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl-C handler")?;

    let stats = simulate::simulate(count, cli.games, seed, cli.max_turns, &running)
        .context("simulation failed")?;

    println!("\n================");
    if running.load(Ordering::SeqCst) {
        println!("Simulation complete!");
    } else {
        println!("Simulation interrupted.");
    }
    println!("================");
    stats.print_summary();
    Ok(())
}
