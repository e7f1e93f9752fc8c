//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events and a periodic tick.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Timer resolution for debounced search, confirmations and the modal close delay.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex:
/// - **Signals**: SIGTERM/SIGINT on unix end the loop cleanly
/// - **Terminal input**: Key presses from crossterm's async event stream
/// - **Background tasks**: Trail loading via the `AppEvent` channel
/// - **Periodic tick**: drives every timer in the app
///
/// A panic hook restores the terminal before unwinding.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut shutdown = ShutdownSignals::install()?;
    let mut terminal = setup_terminal()?;
    let mut keys = crossterm::event::EventStream::new();
    let mut ticks = tokio::time::interval(TICK_INTERVAL);

    loop {
        if app.needs_redraw {
            let now = Instant::now();
            terminal.draw(|f| render(f, app, now))?;
            app.needs_redraw = false;
        }

        // A finished trail load is applied before the next key, even under
        // fast typing.
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event);
        }

        tokio::select! {
            biased;

            name = shutdown.recv() => {
                tracing::info!(signal = name, "Shutting down on signal");
                break;
            }

            maybe_event = keys.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    app.needs_redraw = true;
                    match handle_input(app, key, &event_tx).await {
                        Ok(Action::Quit) => break,
                        Ok(Action::Continue) => {}
                        Err(e) => app.set_status(format!("Error: {}", e)),
                    }
                }
                Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Terminal input failed");
                    break;
                }
                None => break,
            },

            Some(event) = event_rx.recv() => handle_app_event(app, event),

            _ = ticks.tick() => {
                if app.tick(Instant::now()) {
                    app.needs_redraw = true;
                }
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// SIGTERM and SIGINT. On other platforms `recv` never resolves and Ctrl+C
/// arrives as a key press instead.
struct ShutdownSignals {
    #[cfg(unix)]
    term: Signal,
    #[cfg(unix)]
    int: Signal,
}

impl ShutdownSignals {
    fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            term: signal(SignalKind::terminate())?,
            #[cfg(unix)]
            int: signal(SignalKind::interrupt())?,
        })
    }

    #[cfg(unix)]
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.term.recv() => "SIGTERM",
            _ = self.int.recv() => "SIGINT",
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> &'static str {
        std::future::pending().await
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
