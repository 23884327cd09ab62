//! Runtime configuration shared by the CLI and the TUI.

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::Level;

use crate::games::hangman::RoundRules;
use crate::snippets::Catalog;

pub const DEFAULT_RESULTS_PATH: &str = "codeman-results.jsonl";
pub const DEFAULT_LOG_FILE: &str = "codeman.log";

#[derive(Debug, Clone)]
pub struct Config {
    /// Without a player name results are not saved
    pub player: Option<String>,
    pub results_path: PathBuf,
    /// Replaces the built-in catalog when set
    pub snippets_path: Option<PathBuf>,
    pub rules: RoundRules,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: None,
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
            snippets_path: None,
            rules: RoundRules::default(),
            seed: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: Level::INFO,
        }
    }
}

impl Config {
    pub fn load_catalog(&self) -> Result<Catalog> {
        let catalog = match &self.snippets_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
