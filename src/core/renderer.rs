/// Renderer trait for drawing one screen of the session
use ratatui::Frame;

pub trait GameRenderer<State> {
    /// Create a renderer for the given player, if one is identified
    fn new(player_name: Option<String>) -> Self
    where
        Self: Sized;

    /// Pure rendering function: draws `state`, never mutates it
    fn render(&self, frame: &mut Frame, state: &State);
}
