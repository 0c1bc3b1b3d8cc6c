//! Application State
//!
//! Contains the main application state and logic for the TUI.

use crate::agents::{ResearchPipeline, Stage};
use crate::chat::{self, ChatSession, MessageRole};
use crate::tui::event::AppAction;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tui_textarea::TextArea;

const WELCOME: &str = "Welcome to Research Chatbot!\n\n\
                       Ask any question below. Each answer is researched on the web,\n\
                       drafted, refined, and followed by suggested next questions.";

const PLACEHOLDER: &str = "Ask me anything...";

/// Research pipeline progress as shown in the UI
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineStage {
    /// Idle, waiting for input
    #[default]
    Idle,
    /// A stage is running
    Running(Stage),
    /// Research complete
    Complete,
    /// The run failed during a stage
    Error { stage: Option<Stage> },
}

impl PipelineStage {
    pub fn is_running(&self) -> bool {
        matches!(self, PipelineStage::Running(_))
    }
}

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Chat,
    Help,
}

/// Events from async research pipeline
#[derive(Debug)]
pub enum AppEvent {
    /// Pipeline moved to a new stage
    StageChanged(Stage),
    /// Rendered reply for the pending question
    ResponseComplete { content: String, succeeded: bool },
}

/// Main application state
pub struct App {
    pub model_label: String,

    // UI State
    pub view: View,
    pub should_quit: bool,

    // Chat State
    pub session: ChatSession,
    pub input: TextArea<'static>,
    pub scroll_offset: u16,
    pub max_scroll: u16,

    // Research State
    pub pipeline_stage: PipelineStage,
    pipeline: Arc<ResearchPipeline>,

    // Async communication
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    /// Create a new application instance
    pub fn new(pipeline: Arc<ResearchPipeline>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(100);

        let mut session = ChatSession::new();
        session.push_system(WELCOME);

        Self {
            model_label: pipeline.model().to_string(),
            view: View::Chat,
            should_quit: false,
            session,
            input: Self::new_input(),
            scroll_offset: 0,
            max_scroll: 0,
            pipeline_stage: PipelineStage::Idle,
            pipeline,
            event_rx,
            event_tx,
        }
    }

    fn new_input() -> TextArea<'static> {
        let mut input = TextArea::default();
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(PLACEHOLDER);
        input
    }

    /// Check if we should confirm quit
    pub fn confirm_quit(&self) -> bool {
        if self.pipeline_stage.is_running() {
            warn!("Quitting while research is in progress");
        }
        true
    }

    /// Poll for async events
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Handle an async event
    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::StageChanged(stage) => {
                self.pipeline_stage = PipelineStage::Running(stage);
            }
            AppEvent::ResponseComplete { content, succeeded } => {
                let failed_stage = match &self.pipeline_stage {
                    PipelineStage::Running(stage) => Some(*stage),
                    _ => None,
                };
                self.session.push_assistant(content);
                self.pipeline_stage = if succeeded {
                    PipelineStage::Complete
                } else {
                    PipelineStage::Error { stage: failed_stage }
                };
                self.scroll_to_bottom();
            }
        }
    }

    /// Handle a user action
    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => {
                if self.view == View::Chat {
                    self.submit_message();
                } else {
                    self.view = View::Chat;
                }
            }
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Chat
                } else {
                    View::Help
                };
            }
            AppAction::NewSession => {
                self.start_new_session();
            }
            AppAction::Escape => {
                self.view = View::Chat;
            }
            AppAction::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            AppAction::ScrollDown => {
                if self.scroll_offset < self.max_scroll {
                    self.scroll_offset += 1;
                }
            }
            AppAction::ScrollPageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            AppAction::ScrollPageDown => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll);
            }
            AppAction::Input(key_event) => {
                if self.view == View::Help {
                    self.view = View::Chat;
                } else {
                    self.input.input(key_event);
                }
            }
            AppAction::Tick => {}
        }
    }

    /// Submit the current message
    fn submit_message(&mut self) {
        if self.pipeline_stage.is_running() {
            return;
        }

        let content = self.input.lines().join("\n").trim().to_string();
        if content.is_empty() {
            return;
        }

        self.input = Self::new_input();
        self.session.push_user(content.clone());
        self.pipeline_stage = PipelineStage::Running(Stage::QueryAnalysis);

        let tx = self.event_tx.clone();
        let pipeline = Arc::clone(&self.pipeline);

        // Spawn async research task
        tokio::spawn(async move {
            Self::run_research_pipeline(pipeline, content, tx).await;
        });

        self.scroll_to_bottom();
    }

    /// Run the research pipeline in background
    async fn run_research_pipeline(
        pipeline: Arc<ResearchPipeline>,
        message: String,
        tx: mpsc::Sender<AppEvent>,
    ) {
        let progress_tx = tx.clone();
        let reply = chat::respond(&pipeline, &message, move |stage| {
            progress_tx.try_send(AppEvent::StageChanged(stage)).ok();
        })
        .await;

        tx.send(AppEvent::ResponseComplete {
            content: reply.content,
            succeeded: reply.succeeded,
        })
        .await
        .ok();
    }

    /// End the current conversation and start a fresh one
    fn start_new_session(&mut self) {
        if self.pipeline_stage.is_running() {
            return;
        }

        let previous = std::mem::take(&mut self.session);
        let transcript = previous.end();
        info!(messages = transcript.len(), "Started new chat session");

        self.session.push_system(WELCOME);
        self.pipeline_stage = PipelineStage::Idle;
        self.scroll_offset = 0;
        self.max_scroll = 0;
    }

    /// Number of transcript lines the messages panel will draw
    pub fn calculate_scroll_bounds(&mut self, terminal_height: u16, terminal_width: u16) {
        // header + progress + input + status bar + message block borders
        let viewport_height = terminal_height.saturating_sub(3 + 4 + 4 + 1 + 2);
        let width = terminal_width.saturating_sub(2) as usize;

        let content_height: usize = self
            .session
            .messages()
            .iter()
            .map(|m| {
                let body: usize = m
                    .content
                    .lines()
                    .map(|line| crate::tui::ui::wrap_line(line, width.saturating_sub(2)).len().max(1))
                    .sum();
                body + 2
            })
            .sum();

        self.update_scroll_bounds(content_height.min(u16::MAX as usize) as u16, viewport_height);
    }

    /// Scroll to bottom of messages
    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll;
    }

    /// Update max scroll based on content
    pub fn update_scroll_bounds(&mut self, content_height: u16, viewport_height: u16) {
        let at_bottom = self.scroll_offset >= self.max_scroll;
        self.max_scroll = content_height.saturating_sub(viewport_height);
        if at_bottom || self.scroll_offset > self.max_scroll {
            self.scroll_offset = self.max_scroll;
        }
    }

    pub fn last_role(&self) -> Option<MessageRole> {
        self.session.messages().last().map(|m| m.role)
    }
}
