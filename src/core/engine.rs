use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::StdRng;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::leaderboard::LeaderboardView;
use crate::core::menu::{MenuAction, MenuState};
use crate::core::renderer::GameRenderer;
use crate::games::hangman::{HangmanRenderer, Screen, Session};
use crate::results::{GameRecord, JsonlStore, ResultSink};
use crate::snippets::SnippetProvider;

const FRAME: Duration = Duration::from_millis(16);

/// Outcome of a background save, as shown to the player
pub type SaveOutcome = Result<(), String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Engine<P: SnippetProvider> {
    session: Session,
    provider: P,
    store: Arc<JsonlStore>,
    menu: MenuState,
    leaderboard: Option<LeaderboardView>,
    renderer: HangmanRenderer,
    rng: StdRng,
}

impl<P: SnippetProvider> Engine<P> {
    pub fn new(config: &Config, provider: P) -> Self {
        Self {
            session: Session::new(config.rules, config.player.clone()),
            provider,
            store: Arc::new(JsonlStore::new(config.results_path.clone())),
            menu: MenuState::new(),
            leaderboard: None,
            renderer: HangmanRenderer::new(config.player.clone()),
            rng: config.rng(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // finished rounds are saved off the UI loop; outcomes come back here
        let (saved_tx, mut saved_rx) = mpsc::unbounded_channel::<SaveOutcome>();

        loop {
            terminal.draw(|f| self.render(f))?;

            // INPUT (Non-blocking)
            if event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code, &saved_tx) == Flow::Quit {
                        break;
                    }
                }
            }

            tokio::select! {
                Some(outcome) = saved_rx.recv() => {
                    self.session.record_save(outcome);
                }
                _ = tokio::time::sleep(FRAME) => {}
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode, saved_tx: &UnboundedSender<SaveOutcome>) -> Flow {
        match self.session.screen() {
            Screen::Menu => match self.menu.handle_key(code, &mut self.session, &self.provider) {
                MenuAction::Start => {
                    if let Err(e) = self.session.start_game(&self.provider, &mut self.rng) {
                        debug!(error = %e, "round not started");
                    }
                }
                MenuAction::Leaderboard => {
                    self.leaderboard = Some(LeaderboardView::load(
                        &self.store,
                        self.session.player().map(String::from),
                    ));
                    self.session.show_leaderboard();
                }
                MenuAction::Quit => return Flow::Quit,
                MenuAction::None => {}
            },
            Screen::Playing => match code {
                KeyCode::Esc => self.back_to_menu(),
                KeyCode::Enter => match self.session.submit_input() {
                    Ok(Some(record)) => self.spawn_save(record, saved_tx.clone()),
                    Ok(None) => {}
                    Err(e) => debug!(error = %e, "guess rejected"),
                },
                KeyCode::Backspace => self.session.clear_input(),
                KeyCode::Char(c) => self.session.set_input(c),
                _ => {}
            },
            Screen::GameOver => match code {
                KeyCode::Enter => {
                    if let Err(e) = self.session.play_again(&self.provider, &mut self.rng) {
                        debug!(error = %e, "round not started");
                    }
                }
                KeyCode::Char('m') | KeyCode::Char('M') => self.back_to_menu(),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
                _ => {}
            },
            Screen::Leaderboard => {
                if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q')) {
                    self.leaderboard = None;
                    self.session.close_leaderboard();
                }
            }
        }
        Flow::Continue
    }

    fn back_to_menu(&mut self) {
        self.session.back_to_menu();
        self.session.dismiss_notice();
        self.menu = MenuState::new();
    }

    /// The round is already final; a failed save only produces a notice.
    fn spawn_save(&self, record: GameRecord, saved_tx: UnboundedSender<SaveOutcome>) {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let outcome = store.save(&record).map_err(|e| {
                warn!(error = %e, player = %record.player, "failed to save result");
                format!("{e:#}")
            });
            let _ = saved_tx.send(outcome);
        });
    }

    fn render(&self, f: &mut Frame) {
        match self.session.screen() {
            Screen::Menu => self.menu.render(f, &self.session, &self.provider),
            Screen::Playing | Screen::GameOver => self.renderer.render(f, &self.session),
            Screen::Leaderboard => {
                if let Some(view) = &self.leaderboard {
                    view.render(f);
                }
            }
        }
    }
}
