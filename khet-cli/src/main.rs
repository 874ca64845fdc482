//! Khet CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single AI-vs-AI game
//! - laser: Show a laser trace on the classic board
//! - match: Play many AI-vs-AI games in parallel

mod laser_cmd;
mod match_cmd;
mod play_cmd;
mod render;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "khet")]
#[command(about = "Khet 2.0 laser-chess rules engine")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game between two AIs
    Play(play_cmd::PlayArgs),
    /// Print a laser trace
    Laser(laser_cmd::LaserArgs),
    /// Play a batch of games and report win counts
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Laser(args) => laser_cmd::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}

/// Create RNG from seed or random
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_cli_parses_match() {
        let cli = Cli::try_parse_from(["khet", "--seed", "7", "match", "--games", "4", "--red", "easy"]).unwrap();
        assert_eq!(cli.seed, Some(7));
        assert!(matches!(cli.command, Commands::Match(ref args) if args.games == 4));
    }

    #[test]
    fn test_cli_rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["khet", "play", "--red", "grandmaster"]).is_err());
    }
}
