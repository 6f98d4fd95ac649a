//! Evolution command - run the genetic algorithm over gin strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_population(), run_generations(), save_population()
//! - Level 3: append_tally(), print_leaderboard()
//! - Level 4: path and formatting utilities

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use gin_core::MatchRules;
use gin_evolve::{EvolutionConfig, Leaderboard, Population, DEFAULT_PERSIST_EVERY};
use gin_tournament::TournamentConfig;

use crate::create_rng;
use crate::exhibit::exhibit_top;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct EvolveArgs {
    /// Population size
    #[arg(long, default_value = "30")]
    pub population: usize,

    /// Number of generations to run
    #[arg(long, default_value = "100")]
    pub generations: u32,

    /// Survivors per generation (default: 10% of the population, at least 2)
    #[arg(long)]
    pub retain_best: Option<usize>,

    /// Population file; loaded if it exists, written on exit
    #[arg(long, value_name = "FILE")]
    pub storage: Option<PathBuf>,

    /// Autosave interval in generations
    #[arg(long, default_value_t = DEFAULT_PERSIST_EVERY)]
    pub persist_every: u32,

    /// Play tournament pairings in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Leaderboard rows to print
    #[arg(long, default_value = "5")]
    pub show_top: usize,

    /// Decided hands needed to end a match
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub decided_hands: u32,

    /// Exhibit the two best genomes when done
    #[arg(long)]
    pub exhibit: bool,

    /// Matches to play when exhibiting
    #[arg(long, default_value = "2")]
    pub matches: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run evolution command
///
/// 1. Build or restore the population
/// 2. Step through the generations until done or interrupted
/// 3. Store the result
/// 4. Optionally exhibit the winners
pub fn run(args: EvolveArgs, seed: Option<u64>) -> Result<()> {
    let mut population = setup_population(&args, seed)?;
    let interrupted = install_interrupt_handler()?;

    tracing::info!(
        "Starting evolution: pop={}, gen={}, retain={}, from generation {}",
        population.config().population_size,
        args.generations,
        population.config().retain_count(),
        population.generation()
    );

    let board = run_generations(&mut population, &args, &interrupted)?;
    print_leaderboard(&board, args.show_top);

    save_population(&population);

    if args.exhibit {
        exhibit_top(&population, args.matches, seed)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Create the population, restoring it from storage when the file exists.
///
/// A storage file that cannot be loaded is reported and evolution starts from
/// the freshly seeded population.
fn setup_population(args: &EvolveArgs, seed: Option<u64>) -> Result<Population> {
    let config = build_evolution_config(args);
    let mut population =
        Population::new(config, create_rng(seed)).context("Invalid evolution settings")?;

    if let Some(path) = args.storage.as_deref().filter(|p| p.exists()) {
        if !population.load(path) {
            tracing::warn!(
                "Could not restore {}, starting from a fresh population",
                path.display()
            );
        }
    }

    Ok(population)
}

/// Step the population until all generations ran or `interrupted` is set,
/// returning the last leaderboard
fn run_generations(
    population: &mut Population,
    args: &EvolveArgs,
    interrupted: &AtomicBool,
) -> Result<Leaderboard> {
    let pb = ProgressBar::new(u64::from(args.generations));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut board = population.leaderboard();
    for _ in 0..args.generations {
        if interrupted.load(Ordering::SeqCst) {
            pb.suspend(|| {
                tracing::warn!("Interrupted, stopping at generation {}", population.generation())
            });
            break;
        }
        let report = population.step();
        let summary = report.leaderboard.summary;

        tracing::info!(
            "Generation {}: max_score={:.1}, max_winrate={:.3}, max_age={}, failed={}",
            summary.generation,
            summary.max_score,
            summary.max_winrate,
            summary.max_age,
            report.failed_pairings
        );
        for entry in report.leaderboard.top(args.show_top) {
            tracing::debug!(
                "  {:>2}. {} score={:.1} {}W/{}L/{}D depth={}",
                entry.rank,
                entry.id,
                entry.score,
                entry.wins,
                entry.losses,
                entry.draws,
                entry.mutation_depth
            );
        }
        if report.persisted == Some(false) {
            tracing::warn!("Autosave failed at generation {}", population.generation());
        }

        if let Some(storage) = &args.storage {
            append_tally(&tally_path(storage), &summary.tally_line())?;
        }

        board = report.leaderboard;
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(board)
}

/// Write the population to its storage target, if any
fn save_population(population: &Population) {
    let Some(path) = population.config().storage.as_deref() else {
        return;
    };
    if population.store(path) {
        println!("\nPopulation saved to: {}", path.display());
    } else {
        tracing::warn!("Population was not saved to {}", path.display());
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// First Ctrl-C finishes the running generation, then stores and exhibits
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("Failed to install Ctrl-C handler")?;
    Ok(interrupted)
}

/// Map command arguments onto the evolution config
fn build_evolution_config(args: &EvolveArgs) -> EvolutionConfig {
    let rules = MatchRules::default().with_decided_hands(args.decided_hands);
    let tournament = TournamentConfig::default()
        .with_rules(rules)
        .with_parallel(args.parallel);

    let mut config = EvolutionConfig::new(args.population)
        .with_tournament(tournament)
        .with_persist_every(args.persist_every);
    if let Some(retain) = args.retain_best {
        config = config.with_retain_best(retain);
    }
    if let Some(storage) = &args.storage {
        config = config.with_storage(storage);
    }
    config
}

/// Append one line to the tally file
fn append_tally(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open tally file: {}", path.display()))?;
    writeln!(file, "{}", line).context("Failed to write tally line")?;
    Ok(())
}

/// Print the leaderboard table
fn print_leaderboard(board: &Leaderboard, rows: usize) {
    println!("\n=== Leaderboard (generation {}) ===", board.generation);
    println!(
        "{:>4}  {:>8}  {:>10}  {:>7}  {:>5}  {:>5}  {:>5}  {:>7}  {:>4}  {:>5}",
        "rank", "genome", "score", "winrate", "W", "L", "D", "points", "age", "depth"
    );
    for e in board.top(rows) {
        println!(
            "{:>4}  {:>8}  {:>10.1}  {:>7.3}  {:>5}  {:>5}  {:>5}  {:>7}  {:>4}  {:>5}",
            e.rank,
            e.id.to_string(),
            e.score,
            e.winrate,
            e.wins,
            e.losses,
            e.draws,
            e.points,
            e.age,
            e.mutation_depth
        );
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// `<storage>.tally` next to the population file
fn tally_path(storage: &Path) -> PathBuf {
    let mut name = storage.as_os_str().to_os_string();
    name.push(".tally");
    PathBuf::from(name)
}

// ============================================================================
// TESTS
// ============================================================================
