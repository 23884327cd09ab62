/// Hangman game module - guess engine, session flow and screens
pub mod game;
pub mod renderer;
pub mod session;

pub use game::{GuessOutcome, Round, RoundError, RoundRules, RoundStatus};
pub use renderer::HangmanRenderer;
pub use session::{Screen, Session, SessionError};
