use crossterm::event::Event;
use ratatui::Frame;

/// Trait for TUI applications.
///
/// Applications executed by `tui::run()` must implement this trait.
pub trait App {
    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    ///
    /// An error ends the run and is returned from `tui::run()` after the terminal is
    /// restored.
    fn handle_event(&mut self, event: &Event) -> anyhow::Result<()>;

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);
}
