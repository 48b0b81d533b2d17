use crossterm::event;

use crate::tui::App;

/// Runs a turn-based application in the terminal.
///
/// The screen only changes in response to terminal events, so the loop draws with
/// `app.draw()` and then blocks until the next event for `app.handle_event()`. The
/// loop ends when `app.should_exit()` returns true or the app returns an error; the
/// terminal is restored either way.
pub fn run<A>(app: &mut A) -> anyhow::Result<()>
where
    A: App,
{
    ratatui::run(|terminal| {
        while !app.should_exit() {
            terminal.draw(|f| app.draw(f))?;
            let event = event::read()?;
            app.handle_event(&event)?;
        }
        Ok(())
    })
}
