//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use cmdkeys_core::Profile;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::info;

use super::app::App;
use super::event::{handle_key, handle_mouse, poll_event, HandleResult};
use super::ui;
use crate::config::CliConfig;
use crate::store::TomlProfileStore;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Term> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the editor until the user quits
pub fn run(
    store: TomlProfileStore,
    profile: Profile,
    macro_index: usize,
    config: &CliConfig,
) -> Result<()> {
    let mut app = App::new(store, profile, macro_index, config)?;

    let mut terminal = init_terminal()?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    if app.is_dirty() {
        eprintln!("Unsaved changes discarded");
    }
    result
}

/// Main event loop
fn run_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        app.fit(ui::screen(Rect::new(0, 0, size.width, size.height)).list);

        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events (with 100ms timeout for responsive UI)
        if let Some(event) = poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => match handle_key(app, key) {
                    HandleResult::Continue => {}
                    HandleResult::Quit => app.should_quit = true,
                    HandleResult::SaveAndQuit => {
                        app.save();
                        // A failed save leaves the editor open with the error shown
                        app.should_quit = !app.is_dirty();
                    }
                },
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                Event::Resize(_, _) => {
                    // Picked up by fit() before the next draw
                }
                _ => {}
            }
        }

        if app.should_quit {
            info!(dirty = app.is_dirty(), "editor closed");
            break;
        }
    }

    Ok(())
}
