//! Terminal User Interface Module
//!
//! Chat front end for the research pipeline, built with Ratatui.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              🔎 Research Chatbot  [gemma2-9b-it]                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ ┌─ Research Progress ─────────────────────────────────────────┐ │
//! │ │ ✓ Analyze → ✓ Search → ● Extract → ○ Draft → ○ Refine → ...  │ │
//! │ └─────────────────────────────────────────────────────────────┘ │
//! │ ┌─ Messages ──────────────────────────────────────────────────┐ │
//! │ │ You: What is the capital of France?                          │ │
//! │ └─────────────────────────────────────────────────────────────┘ │
//! │ ┌─ Input ─────────────────────────────────────────────────────┐ │
//! │ │ Ask me anything...                                           │ │
//! │ └─────────────────────────────────────────────────────────────┘ │
//! │ Ready │ [Enter] Send [Ctrl+N] New session [Ctrl+Q] Quit [F1]    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, PipelineStage, View};
pub use event::{AppAction, EventHandler};

use crate::agents::ResearchPipeline;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the chat UI until the user quits
pub async fn run(pipeline: Arc<ResearchPipeline>) -> anyhow::Result<()> {
    info!(model = pipeline.model(), "Starting TUI mode");

    let mut terminal = init_terminal()?;
    let mut app = App::new(pipeline);
    let mut events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    let transcript = app.session.end();
    info!(messages = transcript.len(), "TUI exited");

    result
}

async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    while !app.should_quit {
        let size = terminal.size()?;
        app.calculate_scroll_bounds(size.height, size.width);

        terminal.draw(|frame| ui::render(frame, app))?;

        // Replies and stage changes from the background run
        app.poll_events();

        match events.next().await {
            Some(AppAction::Quit) => {
                if app.confirm_quit() {
                    break;
                }
            }
            Some(AppAction::ForceQuit) | None => break,
            Some(action) => app.handle_action(action),
        }
    }

    Ok(())
}
