/// Hangman-specific renderer for the playing and game-over screens
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::renderer::GameRenderer;
use crate::games::hangman::session::{ActiveRound, Notice, NoticeKind, Screen, Session};

/// Gallows drawings indexed by wrong guesses
pub const GALLOWS: [&str; 8] = [
    "  +---+\n      |\n      |\n      |\n      |\n      |\n=========",
    "  +---+\n  |   |\n      |\n      |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n      |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n  |   |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|   |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n /    |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n / \\  |\n      |\n=========",
];

/// Stays on the last drawing when more wrong guesses are allowed than there
/// are drawings
pub fn gallows(wrong_guesses: u32) -> &'static str {
    let stage = (wrong_guesses as usize).min(GALLOWS.len() - 1);
    GALLOWS[stage]
}

pub struct HangmanRenderer {
    player_name: Option<String>,
}

impl GameRenderer<Session> for HangmanRenderer {
    fn new(player_name: Option<String>) -> Self {
        Self { player_name }
    }

    fn render(&self, frame: &mut Frame, session: &Session) {
        let Some(active) = session.current() else {
            return;
        };
        match session.screen() {
            Screen::Playing => self.render_playing(frame, session, active),
            Screen::GameOver => self.render_game_over(frame, session, active),
            Screen::Menu | Screen::Leaderboard => {}
        }
    }
}

impl HangmanRenderer {
    fn render_playing(&self, frame: &mut Frame, session: &Session, active: &ActiveRound) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        let player = self.player_name.as_deref().unwrap_or("guest");
        frame.render_widget(
            Paragraph::new(format!(
                " PROGRAMMING HANGMAN  -  Player: {}  -  Score: {} ",
                player,
                session.total_score()
            ))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center),
            rows[0],
        );

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        self.render_board(frame, session, active, cols[0]);
        self.render_gallows(frame, session, active, cols[1]);

        let footer = match session.notice() {
            Some(notice) => notice_line(notice),
            None => Line::from("Type a letter, [Enter] guess, [Esc] back to menu"),
        };
        frame.render_widget(
            Paragraph::new(footer).block(Block::default().borders(Borders::ALL)),
            rows[2],
        );
    }

    fn render_board(&self, frame: &mut Frame, session: &Session, active: &ActiveRound, area: Rect) {
        let round = &active.round;
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3), Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let mut snippet = vec![
            Line::from(Span::styled(
                active.snippet.description.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
        ];
        snippet.extend(active.snippet.code.lines().map(|l| Line::from(l.to_string())));
        frame.render_widget(
            Paragraph::new(snippet)
                .block(Block::default().title(" Code Snippet ").borders(Borders::ALL))
                .wrap(Wrap { trim: false }),
            parts[0],
        );

        frame.render_widget(
            Paragraph::new(session.display_word())
                .style(Style::default().add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(Block::default().title(" Word to Guess ").borders(Borders::ALL)),
            parts[1],
        );

        frame.render_widget(
            Paragraph::new(format!(" > {}", session.input()))
                .block(Block::default().title(" Your Guess ").borders(Borders::ALL)),
            parts[2],
        );

        frame.render_widget(
            Paragraph::new(format!(
                " Wrong guesses: {}/{}    Letters remaining: {}",
                round.wrong_guesses(),
                round.max_wrong_guesses(),
                round.letters_remaining()
            )),
            parts[3],
        );
    }

    fn render_gallows(&self, frame: &mut Frame, session: &Session, active: &ActiveRound, area: Rect) {
        let mut lines: Vec<Line> = gallows(session.wrong_guesses())
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        lines.push(Line::from(""));
        let badge = Style::default().fg(Color::Cyan);
        lines.push(Line::from(Span::styled(format!("Language: {}", active.snippet.language), badge)));
        lines.push(Line::from(Span::styled(format!("Topic: {}", active.snippet.topic), badge)));
        lines.push(Line::from(Span::styled(format!("Difficulty: {}", active.snippet.difficulty), badge)));

        frame.render_widget(
            Paragraph::new(lines).block(Block::default().title(" Hangman ").borders(Borders::ALL)),
            area,
        );
    }

    fn render_game_over(&self, frame: &mut Frame, session: &Session, active: &ActiveRound) {
        let area = centered(frame.area(), 50, 12);
        let (title, color) = if session.won() {
            ("You Won!", Color::Green)
        } else {
            ("Game Over", Color::Red)
        };

        let mut lines = vec![
            Line::from(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(format!("The answer was: {}", active.round.answer())),
            Line::from(format!("Final Score: {}", session.total_score())),
            Line::from(""),
        ];
        if let Some(notice) = session.notice() {
            lines.push(notice_line(notice));
            lines.push(Line::from(""));
        }
        lines.push(Line::from("[Enter] Play again  [M] Back to menu  [Q] Quit"));

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}

pub fn notice_line(notice: &Notice) -> Line<'static> {
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    Line::from(vec![
        Span::styled(format!("{}: ", notice.title), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(notice.body.clone()),
    ])
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hangman::RoundRules;
    use crate::snippets::{Catalog, Difficulty};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn playing_session() -> Session {
        let catalog = Catalog::builtin().unwrap();
        let mut session = Session::new(RoundRules::default(), Some("ada".into()));
        session.select_language("Python");
        session.select_topic("Functions");
        session.select_difficulty(Difficulty::Easy);
        session.start_game(&catalog, &mut StdRng::seed_from_u64(0)).unwrap();
        session
    }

    #[test]
    fn test_gallows_clamps_to_last_stage() {
        assert_eq!(gallows(0), GALLOWS[0]);
        assert_eq!(gallows(6), GALLOWS[6]);
        assert_eq!(gallows(40), GALLOWS[7]);
    }

    #[test]
    fn test_centered_fits_small_area() {
        let r = centered(Rect::new(0, 0, 10, 4), 50, 12);
        assert_eq!(r, Rect::new(0, 0, 10, 4));
        let r = centered(Rect::new(0, 0, 100, 40), 50, 12);
        assert_eq!(r, Rect::new(25, 14, 50, 12));
    }

    #[test]
    fn test_renders_masked_word_and_counters() {
        let session = playing_session();
        let renderer = HangmanRenderer::new(Some("ada".into()));
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| renderer.render(f, &session)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("_ _ _"));
        assert!(text.contains("Wrong guesses: 0/6"));
        assert!(text.contains("Language: Python"));
    }

    #[test]
    fn test_renders_game_over() {
        let mut session = playing_session();
        for c in ["d", "e", "f"] {
            session.make_guess(c).unwrap();
        }
        let renderer = HangmanRenderer::new(None);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| renderer.render(f, &session)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("You Won!"));
        assert!(text.contains("The answer was: def"));
    }
}
