pub mod cli;
pub mod core;
pub mod games;
pub mod results;
pub mod snippets;

// Re-export for convenience
pub use crate::core::config::Config;
pub use crate::games::hangman::{Round, RoundError, RoundRules, RoundStatus};
