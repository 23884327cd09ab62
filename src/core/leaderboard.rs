use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::results::{JsonlStore, Leaderboard};

const SHOWN: usize = 20;

/// Leaderboard screen, loaded from the results store when opened
pub struct LeaderboardView {
    board: Leaderboard,
    error: Option<String>,
    player: Option<String>,
}

impl LeaderboardView {
    pub fn load(store: &JsonlStore, player: Option<String>) -> Self {
        match store.load() {
            Ok(records) => Self {
                board: Leaderboard::from_records(&records),
                error: None,
                player,
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to load leaderboard");
                Self {
                    board: Leaderboard::default(),
                    error: Some(format!("{e:#}")),
                    player,
                }
            }
        }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        f.render_widget(
            Paragraph::new(" LEADERBOARD ")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[0],
        );

        if let Some(error) = &self.error {
            f.render_widget(
                Paragraph::new(format!("Could not load results: {error}"))
                    .style(Style::default().fg(Color::Red)),
                chunks[1],
            );
        } else if self.board.is_empty() {
            f.render_widget(
                Paragraph::new("No games recorded yet.").alignment(Alignment::Center),
                chunks[1],
            );
        } else {
            let rows = self.board.top(SHOWN).iter().map(|e| {
                let style = if self.player.as_deref() == Some(e.player.as_str()) {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    format!("#{}", e.rank),
                    e.player.clone(),
                    e.total_score.to_string(),
                    format!("{}/{}", e.games_won, e.games_played),
                    e.best_score.to_string(),
                ])
                .style(style)
            });
            let widths = [
                Constraint::Length(6),
                Constraint::Min(12),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(6),
            ];
            let table = Table::new(rows, widths)
                .header(
                    Row::new(vec!["Rank", "Player", "Score", "Won", "Best"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(table, chunks[1]);
        }

        f.render_widget(
            Paragraph::new("[Esc] Back to game").alignment(Alignment::Center),
            chunks[2],
        );
    }
}
