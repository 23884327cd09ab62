use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::games::hangman::renderer::notice_line;
use crate::games::hangman::Session;
use crate::snippets::{Difficulty, SnippetProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuField {
    Language,
    Topic,
    Difficulty,
}

impl MenuField {
    fn next(self) -> Self {
        match self {
            MenuField::Language => MenuField::Topic,
            MenuField::Topic => MenuField::Difficulty,
            MenuField::Difficulty => MenuField::Language,
        }
    }
}

pub enum MenuAction {
    None,
    Start,
    Leaderboard,
    Quit,
}

/// Cursor state of the selection menu. The chosen values live in the
/// session; this only tracks where the highlight is.
pub struct MenuState {
    pub field: MenuField,
    pub language_index: usize,
    pub topic_index: usize,
    pub difficulty_index: usize,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            field: MenuField::Language,
            language_index: 0,
            topic_index: 0,
            difficulty_index: 0,
        }
    }

    /// Moves the highlight and writes the highlighted value into the session.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        session: &mut Session,
        provider: &dyn SnippetProvider,
    ) -> MenuAction {
        match code {
            KeyCode::Tab => {
                self.field = self.field.next();
                self.apply(session, provider);
            }
            KeyCode::Up => {
                let index = self.index_mut();
                *index = index.saturating_sub(1);
                self.apply(session, provider);
            }
            KeyCode::Down => {
                let len = self.field_len(session, provider);
                let index = self.index_mut();
                *index = (*index + 1).min(len.saturating_sub(1));
                self.apply(session, provider);
            }
            KeyCode::Enter => {
                self.apply(session, provider);
                return MenuAction::Start;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => return MenuAction::Leaderboard,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return MenuAction::Quit,
            _ => {}
        }
        MenuAction::None
    }

    fn index_mut(&mut self) -> &mut usize {
        match self.field {
            MenuField::Language => &mut self.language_index,
            MenuField::Topic => &mut self.topic_index,
            MenuField::Difficulty => &mut self.difficulty_index,
        }
    }

    fn field_len(&self, session: &Session, provider: &dyn SnippetProvider) -> usize {
        match self.field {
            MenuField::Language => provider.languages().len(),
            MenuField::Topic => session
                .selection()
                .language
                .as_deref()
                .map_or(0, |l| provider.topics(l).len()),
            MenuField::Difficulty => Difficulty::ALL.len(),
        }
    }

    /// Selects the highlighted entry of the focused field, and the language
    /// too since topics depend on it.
    fn apply(&mut self, session: &mut Session, provider: &dyn SnippetProvider) {
        let languages = provider.languages();
        let Some(language) = languages.get(self.language_index) else {
            return;
        };
        if session.selection().language.as_deref() != Some(*language) {
            self.topic_index = 0;
        }
        session.select_language(language);

        // the highlighted topic row is always the selected one
        let topics = provider.topics(language);
        if session.selection().topic.is_none() || self.field == MenuField::Topic {
            if let Some(topic) = topics.get(self.topic_index) {
                session.select_topic(topic);
            }
        }

        match self.field {
            MenuField::Language | MenuField::Topic => {}
            MenuField::Difficulty => {
                session.select_difficulty(Difficulty::ALL[self.difficulty_index.min(Difficulty::ALL.len() - 1)]);
            }
        }
    }

    pub fn render(&self, f: &mut Frame, session: &Session, provider: &dyn SnippetProvider) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        f.render_widget(
            Paragraph::new(" PROGRAMMING HANGMAN ")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[0],
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
            .split(chunks[1]);

        let selection = session.selection();
        let languages = provider.languages();
        let topics = selection
            .language
            .as_deref()
            .map(|l| provider.topics(l))
            .unwrap_or_default();
        let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.label()).collect();

        self.render_list(f, columns[0], " LANGUAGE ", &languages, self.language_index, MenuField::Language);
        self.render_list(f, columns[1], " TOPIC ", &topics, self.topic_index, MenuField::Topic);
        self.render_list(f, columns[2], " DIFFICULTY ", &difficulties, self.difficulty_index, MenuField::Difficulty);

        let status = match session.notice() {
            Some(notice) => notice_line(notice),
            None => format!("Score: {}", session.total_score()).into(),
        };
        f.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[2]);

        let hint = match session.player() {
            Some(name) => format!("Playing as {name}"),
            None => "Start with --player <NAME> to save your scores and compete on the leaderboard!".to_string(),
        };
        f.render_widget(
            Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            chunks[3],
        );

        f.render_widget(
            Paragraph::new("[Tab] Field  [↑/↓] Choose  [Enter] Start  [L] Leaderboard  [Q] Quit")
                .alignment(Alignment::Center),
            chunks[4],
        );
    }

    fn render_list(
        &self,
        f: &mut Frame,
        area: ratatui::layout::Rect,
        title: &str,
        items: &[&str],
        highlighted: usize,
        field: MenuField,
    ) {
        let focused = self.field == field;
        let items: Vec<ListItem> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == highlighted && focused {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else if i == highlighted {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!(" » {item}")).style(style)
            })
            .collect();

        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        f.render_widget(
            List::new(items).block(Block::default().title(title.to_string()).borders(Borders::ALL).border_style(border)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hangman::{RoundRules, Screen};
    use crate::snippets::Catalog;
    use rand::SeedableRng;

    #[test]
    fn test_keys_fill_the_selection() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = Session::new(RoundRules::default(), None);
        let mut menu = MenuState::new();

        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        assert_eq!(session.selection().language.as_deref(), Some("Python"));

        menu.handle_key(KeyCode::Tab, &mut session, &catalog);
        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        assert_eq!(session.selection().topic.as_deref(), Some("Dictionaries"));

        menu.handle_key(KeyCode::Tab, &mut session, &catalog);
        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        assert_eq!(session.selection().difficulty, Some(Difficulty::Hard));

        assert!(matches!(
            menu.handle_key(KeyCode::Enter, &mut session, &catalog),
            MenuAction::Start
        ));
        assert_eq!(session.screen(), Screen::Menu);
    }

    #[test]
    fn test_changing_language_resets_topic_cursor() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = Session::new(RoundRules::default(), None);
        let mut menu = MenuState::new();

        menu.handle_key(KeyCode::Tab, &mut session, &catalog);
        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        assert_eq!(menu.topic_index, 1);

        menu.handle_key(KeyCode::Tab, &mut session, &catalog);
        menu.handle_key(KeyCode::Tab, &mut session, &catalog);
        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        assert_eq!(menu.topic_index, 0);
        assert_eq!(session.selection().language.as_deref(), Some("Python"));
        assert_eq!(session.selection().topic.as_deref(), Some("Lists"));
    }

    #[test]
    fn test_enter_after_language_change_starts_highlighted_topic() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = Session::new(RoundRules::default(), None);
        let mut menu = MenuState::new();

        // pick Python without ever focusing the topic column
        menu.handle_key(KeyCode::Down, &mut session, &catalog);
        menu.handle_key(KeyCode::Tab, &mut session, &catalog);
        menu.handle_key(KeyCode::Tab, &mut session, &catalog);
        assert!(matches!(
            menu.handle_key(KeyCode::Enter, &mut session, &catalog),
            MenuAction::Start
        ));

        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        session.start_game(&catalog, &mut rng).unwrap();
        assert_eq!(session.screen(), Screen::Playing);
        let snippet = &session.current().unwrap().snippet;
        assert_eq!(snippet.language, "Python");
        assert_eq!(snippet.topic, "Lists");
    }

    #[test]
    fn test_quit_and_leaderboard_keys() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = Session::new(RoundRules::default(), None);
        let mut menu = MenuState::new();

        assert!(matches!(menu.handle_key(KeyCode::Char('l'), &mut session, &catalog), MenuAction::Leaderboard));
        assert!(matches!(menu.handle_key(KeyCode::Esc, &mut session, &catalog), MenuAction::Quit));
    }
}
