//! Theme and Styling
//!
//! Colors and styles for the chat interface.

use ratatui::style::{Color, Modifier, Style};

/// Application theme
pub struct Theme;

impl Theme {
    pub const ACCENT: Color = Color::Rgb(56, 189, 248);
    pub const SUCCESS: Color = Color::Rgb(74, 222, 128);
    pub const WARNING: Color = Color::Rgb(250, 204, 21);
    pub const ERROR: Color = Color::Rgb(248, 113, 113);

    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);
    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);
    pub const TEXT_DIM: Color = Color::Rgb(96, 96, 96);

    pub const BORDER: Color = Color::Rgb(64, 64, 64);
    pub const BORDER_FOCUSED: Color = Color::Rgb(96, 165, 250);

    // Transcript roles
    pub const USER: Color = Color::Rgb(74, 222, 128);
    pub const ASSISTANT: Color = Color::Rgb(56, 189, 248);
    pub const SYSTEM: Color = Color::Rgb(250, 204, 21);

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    pub fn title() -> Style {
        Self::bold(Self::ACCENT)
    }

    pub fn heading() -> Style {
        Self::bold(Self::TEXT_PRIMARY)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    pub fn user_message() -> Style {
        Self::bold(Self::USER)
    }

    pub fn assistant_message() -> Style {
        Self::bold(Self::ASSISTANT)
    }

    pub fn system_message() -> Style {
        Self::bold(Self::SYSTEM)
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Self::bold(Self::ACCENT)
    }

    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Stage currently running
    pub fn active() -> Style {
        Self::bold(Self::WARNING)
    }

    pub fn complete() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn pending() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    fn bold(color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

/// Progress stage icons
pub struct Icons;

impl Icons {
    pub const COMPLETE: &'static str = "✓";
    pub const ACTIVE: &'static str = "●";
    pub const PENDING: &'static str = "○";
    pub const ERROR: &'static str = "✗";
    pub const ARROW: &'static str = "→";
    pub const CURSOR: &'static str = "▌";
}
