/// Menu, play and game-over flow around one round at a time
use rand::RngCore;
use thiserror::Error;
use tracing::info;

use crate::games::hangman::game::{Round, RoundError, RoundRules, RoundStatus};
use crate::results::{now_secs, GameRecord};
use crate::snippets::{CatalogError, Difficulty, Snippet, SnippetProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Last thing worth telling the player about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub kind: NoticeKind,
}

impl Notice {
    fn info(title: &str, body: impl Into<String>) -> Self {
        Self { title: title.to_string(), body: body.into(), kind: NoticeKind::Info }
    }

    fn error(title: &str, body: impl Into<String>) -> Self {
        Self { title: title.to_string(), body: body.into(), kind: NoticeKind::Error }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select language, topic, and difficulty level.")]
    MissingSelection,
    #[error("Please enter a single letter.")]
    InvalidGuess,
    #[error("no round is being played")]
    NoActiveRound,
    #[error(transparent)]
    Round(#[from] RoundError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub language: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone)]
pub struct ActiveRound {
    pub snippet: Snippet,
    pub round: Round,
}

#[derive(Debug)]
pub struct Session {
    screen: Screen,
    selection: Selection,
    current: Option<ActiveRound>,
    total_score: u32,
    input: String,
    notice: Option<Notice>,
    rules: RoundRules,
    player: Option<String>,
}

impl Session {
    pub fn new(rules: RoundRules, player: Option<String>) -> Self {
        Self {
            screen: Screen::Menu,
            selection: Selection::default(),
            current: None,
            total_score: 0,
            input: String::new(),
            notice: None,
            rules,
            player,
        }
    }

    pub fn select_language(&mut self, language: &str) {
        if self.selection.language.as_deref() != Some(language) {
            self.selection.topic = None;
        }
        self.selection.language = Some(language.to_string());
    }

    pub fn select_topic(&mut self, topic: &str) {
        self.selection.topic = Some(topic.to_string());
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.selection.difficulty = Some(difficulty);
    }

    /// Picks a snippet for the current selection and begins a fresh round.
    pub fn start_game(
        &mut self,
        provider: &dyn SnippetProvider,
        rng: &mut dyn RngCore,
    ) -> Result<(), SessionError> {
        let Selection { language: Some(language), topic: Some(topic), difficulty: Some(difficulty) } =
            &self.selection
        else {
            self.notice = Some(Notice::error("Missing Selection", SessionError::MissingSelection.to_string()));
            return Err(SessionError::MissingSelection);
        };

        let snippet = match provider.pick(language, topic, *difficulty, rng) {
            Ok(s) => s.clone(),
            Err(e) => {
                self.notice = Some(Notice::error("No Snippet", e.to_string()));
                return Err(e.into());
            }
        };
        let round = Round::start_with_rules(&snippet.answer, self.rules)?;

        info!(%language, %topic, %difficulty, len = round.answer_len(), "round started");
        self.current = Some(ActiveRound { snippet, round });
        self.screen = Screen::Playing;
        self.input.clear();
        self.notice = None;
        Ok(())
    }

    pub fn play_again(
        &mut self,
        provider: &dyn SnippetProvider,
        rng: &mut dyn RngCore,
    ) -> Result<(), SessionError> {
        self.start_game(provider, rng)
    }

    /// Replaces the pending input; guesses are a single character.
    pub fn set_input(&mut self, c: char) {
        self.input.clear();
        self.input.push(c);
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Guesses whatever is in the input buffer.
    pub fn submit_input(&mut self) -> Result<Option<GameRecord>, SessionError> {
        let input = std::mem::take(&mut self.input);
        self.make_guess(&input)
    }

    /// Applies a guess. Returns the record to persist when this guess ended
    /// the round and a player is set.
    pub fn make_guess(&mut self, input: &str) -> Result<Option<GameRecord>, SessionError> {
        if self.screen != Screen::Playing {
            return Err(SessionError::NoActiveRound);
        }
        let active = self.current.as_mut().ok_or(SessionError::NoActiveRound)?;

        self.input.clear();
        match active.round.guess(input) {
            Ok(_) => {}
            Err(RoundError::InvalidGuess { .. }) => {
                self.notice = Some(Notice::error("Invalid Guess", SessionError::InvalidGuess.to_string()));
                return Err(SessionError::InvalidGuess);
            }
            Err(e) => return Err(e.into()),
        }

        let round = &active.round;
        let Some(score) = round.score() else {
            return Ok(None);
        };

        let won = round.status() == RoundStatus::Won;
        self.total_score += score;
        self.screen = Screen::GameOver;
        self.notice = Some(if won {
            Notice::info("Congratulations!", "You won the game!")
        } else {
            Notice::error("Game Over", format!("The answer was: {}", round.answer()))
        });
        info!(won, score, wrong = round.wrong_guesses(), total = self.total_score, "round finished");

        let record = self.player.as_ref().map(|player| GameRecord {
            player: player.clone(),
            language: active.snippet.language.clone(),
            topic: active.snippet.topic.clone(),
            difficulty: active.snippet.difficulty,
            score,
            won,
            answer: round.answer(),
            wrong_guesses: round.wrong_guesses(),
            played_at: now_secs(),
        });
        Ok(record)
    }

    /// Reports how persisting a finished round went. The round itself is
    /// already final and is left untouched.
    pub fn record_save(&mut self, outcome: Result<(), String>) {
        self.notice = Some(match outcome {
            Ok(()) => Notice::info("Score Saved!", "Your game result has been saved to your profile."),
            Err(e) => Notice::error("Save Failed", e),
        });
    }

    /// Abandons any round and clears the selection; the running score stays.
    pub fn back_to_menu(&mut self) {
        self.screen = Screen::Menu;
        self.selection = Selection::default();
        self.current = None;
        self.input.clear();
    }

    pub fn show_leaderboard(&mut self) {
        self.screen = Screen::Leaderboard;
    }

    pub fn close_leaderboard(&mut self) {
        self.screen = Screen::Menu;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current(&self) -> Option<&ActiveRound> {
        self.current.as_ref()
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn rules(&self) -> RoundRules {
        self.rules
    }

    /// Masked answer with a space between characters, e.g. `l o o _`
    pub fn display_word(&self) -> String {
        self.current
            .as_ref()
            .map(|a| {
                let mask: Vec<String> = a.round.render_mask().chars().map(String::from).collect();
                mask.join(" ")
            })
            .unwrap_or_default()
    }

    pub fn letters_remaining(&self) -> usize {
        self.current.as_ref().map_or(0, |a| a.round.letters_remaining())
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.current.as_ref().map_or(0, |a| a.round.wrong_guesses())
    }

    pub fn won(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|a| a.round.status() == RoundStatus::Won)
    }
}
