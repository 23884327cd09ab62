use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use crate::core::config::{Config, DEFAULT_LOG_FILE, DEFAULT_RESULTS_PATH};
use crate::core::engine::Engine;
use crate::games::hangman::game::{DEFAULT_MAX_WRONG_GUESSES, DEFAULT_WIN_REWARD};
use crate::games::hangman::RoundRules;
use crate::results::{JsonlStore, Leaderboard};
use crate::snippets::SnippetProvider;

#[derive(Parser)]
#[command(name = "codeman")]
#[command(about = "Guess the hidden keyword in programming code snippets, hangman style")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub options: Options,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct Options {
    /// Player name; results are only saved when set
    #[arg(short, long, global = true)]
    pub player: Option<String>,

    /// File finished rounds are appended to
    #[arg(long, global = true, default_value = DEFAULT_RESULTS_PATH)]
    pub results: PathBuf,

    /// Snippet catalog JSON to use instead of the built-in one
    #[arg(long, global = true)]
    pub snippets: Option<PathBuf>,

    /// Wrong guesses allowed per round
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_WRONG_GUESSES, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_wrong: u32,

    /// Score awarded for a won round
    #[arg(long, global = true, default_value_t = DEFAULT_WIN_REWARD)]
    pub win_reward: u32,

    /// Seed for snippet selection
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Where logs go while the game is on screen
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[arg(long, global = true, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl From<Options> for Config {
    fn from(o: Options) -> Self {
        Config {
            player: o.player,
            results_path: o.results,
            snippets_path: o.snippets,
            rules: RoundRules {
                max_wrong_guesses: o.max_wrong,
                win_reward: o.win_reward,
            },
            seed: o.seed,
            log_file: o.log_file,
            log_level: o.log_level,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play in the terminal (default)
    Play,
    /// Print the leaderboard
    Leaderboard {
        /// Number of players to show
        #[arg(short = 'n', long, default_value_t = 10)]
        top: usize,
    },
    /// List languages, topics and how many snippets each has
    Catalog,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from(cli.options);

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            init_file_logging(&config)?;
            play(&config).await
        }
        Commands::Leaderboard { top } => {
            init_stderr_logging(&config);
            print_leaderboard(&config, top)
        }
        Commands::Catalog => {
            init_stderr_logging(&config);
            print_catalog(&config)
        }
    }
}

async fn play(config: &Config) -> Result<()> {
    let catalog = config.load_catalog()?;
    info!(snippets = catalog.len(), player = ?config.player, "starting game");

    let terminal = ratatui::init();
    let result = Engine::new(config, catalog).run(terminal).await;
    ratatui::restore();
    result
}

fn print_leaderboard(config: &Config, top: usize) -> Result<()> {
    let records = JsonlStore::new(&config.results_path).load()?;
    let board = Leaderboard::from_records(&records);

    if board.is_empty() {
        println!("No games recorded yet.");
        return Ok(());
    }

    println!("🏆 Leaderboard");
    println!();
    println!("{:<6} {:<20} {:>8} {:>8} {:>6}", "Rank", "Player", "Score", "Won", "Best");
    for e in board.top(top) {
        println!(
            "{:<6} {:<20} {:>8} {:>8} {:>6}",
            format!("#{}", e.rank),
            e.player,
            e.total_score,
            format!("{}/{}", e.games_won, e.games_played),
            e.best_score
        );
    }
    Ok(())
}

fn print_catalog(config: &Config) -> Result<()> {
    let catalog = config.load_catalog()?;
    println!("📚 Available snippets:");
    println!();

    for language in catalog.languages() {
        println!("📦 {}", language);
        for topic in catalog.topics(language) {
            println!("   {:<14} {} snippets", topic, catalog.count(language, topic));
        }
        println!();
    }
    Ok(())
}

/// The TUI owns stdout, so interactive runs log to a file.
fn init_file_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn init_stderr_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let cli = Cli::try_parse_from(["codeman"]).unwrap();
        assert!(cli.command.is_none());

        let config = Config::from(cli.options);
        assert_eq!(config.rules, RoundRules::default());
        assert_eq!(config.results_path, PathBuf::from(DEFAULT_RESULTS_PATH));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "codeman", "leaderboard", "-n", "3", "--player", "ada", "--max-wrong", "8",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Leaderboard { top: 3 })));

        let config = Config::from(cli.options);
        assert_eq!(config.player.as_deref(), Some("ada"));
        assert_eq!(config.rules.max_wrong_guesses, 8);
    }

    #[test]
    fn test_zero_max_wrong_is_rejected() {
        assert!(Cli::try_parse_from(["codeman", "--max-wrong", "0"]).is_err());
    }

    #[test]
    fn test_log_level_parses() {
        let cli = Cli::try_parse_from(["codeman", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.options.log_level, Level::DEBUG);
    }
}
