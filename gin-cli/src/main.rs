//! Gin CLI - Command-line interface
//!
//! Commands:
//! - evolve: Evolve a population of gin rummy strategies
//! - exhibit: Play the two best stored strategies against each other

mod evolve;
mod exhibit;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gin")]
#[command(about = "Evolve neural gin rummy strategies")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the genetic algorithm
    Evolve(evolve::EvolveArgs),
    /// Play the top two genomes of a stored population
    Exhibit(exhibit::ExhibitArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Evolve(args) => evolve::run(args, cli.seed),
        Commands::Exhibit(args) => exhibit::run(args, cli.seed),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Create RNG from optional seed
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rand::Rng;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_rng_with_seed() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gin", "evolve", "--generations", "3", "--seed", "7", "-v"])
            .unwrap();
        assert_eq!(cli.seed, Some(7));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Evolve(ref a) if a.generations == 3));
    }

    #[test]
    fn test_zero_decided_hands_is_rejected() {
        assert!(Cli::try_parse_from(["gin", "evolve", "--decided-hands", "0"]).is_err());
        assert!(Cli::try_parse_from(["gin", "evolve", "--decided-hands", "2"]).is_ok());
    }
}
