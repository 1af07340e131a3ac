//! Main application state and TUI event loop for the usage dashboard.
//!
//! [`App`] owns the loaded [`Session`], the theme and the
//! [`DashboardState`].  Every frame re-applies the filters and rebuilds the
//! active view from scratch.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::ViewMode;
use dashboard_data::session::Session;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::debug;

use crate::dashboard_view;
use crate::state::DashboardState;
use crate::themes::Theme;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// The immutable dataset loaded at startup.
    pub session: Session,
    /// Control values and focus.
    pub state: DashboardState,
}

impl App {
    /// Construct the application with every filter at its default.
    pub fn new(theme_name: &str, session: Session, view_mode: ViewMode) -> Self {
        let state = DashboardState::new(&session, view_mode);
        Self {
            theme: Theme::from_name(theme_name),
            session,
            state,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout on the current
    /// thread.  The terminal is restored even when drawing fails.  Any
    /// terminal I/O failure is reported as [`DashboardError::Terminal`].
    pub async fn run(mut self) -> Result<()> {
        self.run_terminal().map_err(DashboardError::Terminal)
    }

    fn run_terminal(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Runs whether or not the loop failed.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Loop ──────────────────────────────────────────────────────────────────

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    // Windows reports releases as well as presses.
                    if key.kind == KeyEventKind::Press {
                        self.state.handle_key(key, &self.session);
                        debug!("key {:?} -> focus {:?}", key.code, self.state.focus);
                    }
                }
            }

            if self.state.should_quit {
                return Ok(());
            }
        }
    }

    /// Draw one frame of the dashboard.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        dashboard_view::render_dashboard(frame, area, &self.session, &self.state, &self.theme);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
