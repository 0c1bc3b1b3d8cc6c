//! Progress Widget
//!
//! Displays the research pipeline progress.

use crate::agents::Stage;
use crate::tui::app::PipelineStage;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the progress indicator
pub fn render_progress(frame: &mut Frame, area: Rect, stage: &PipelineStage) {
    let block = Block::default()
        .title(" Research Progress ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let caption = match stage {
        PipelineStage::Idle => Span::styled("Waiting for a question...", Theme::text_dim()),
        PipelineStage::Running(s) => Span::styled(
            format!("Step {}/{}: {}", s.index() + 1, Stage::ALL.len(), s),
            Theme::text_secondary(),
        ),
        PipelineStage::Complete => Span::styled("Answer ready", Theme::complete()),
        PipelineStage::Error { stage: Some(s) } => {
            Span::styled(format!("Failed during {}", s), Theme::error())
        }
        PipelineStage::Error { stage: None } => Span::styled("Failed", Theme::error()),
    };

    let lines = vec![Line::from(caption), Line::from(build_progress_line(stage))];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Build the progress line with stage indicators
fn build_progress_line(stage: &PipelineStage) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, s) in Stage::ALL.iter().enumerate() {
        let (icon, style) = match StageState::of(*s, stage) {
            StageState::Complete => (Icons::COMPLETE, Theme::complete()),
            StageState::Active => (Icons::ACTIVE, Theme::active()),
            StageState::Pending => (Icons::PENDING, Theme::pending()),
            StageState::Error => (Icons::ERROR, Theme::error()),
        };

        spans.push(Span::styled(format!("{} ", icon), style));
        spans.push(Span::styled(s.short_name(), style));

        if i < Stage::ALL.len() - 1 {
            spans.push(Span::styled(format!(" {} ", Icons::ARROW), Theme::text_dim()));
        }
    }

    spans
}

/// State of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq)]
enum StageState {
    Pending,
    Active,
    Complete,
    Error,
}

impl StageState {
    fn of(stage: Stage, progress: &PipelineStage) -> Self {
        match progress {
            PipelineStage::Idle => StageState::Pending,
            PipelineStage::Complete => StageState::Complete,
            PipelineStage::Running(current) => Self::relative_to(stage, *current, StageState::Active),
            PipelineStage::Error { stage: Some(failed) } => {
                Self::relative_to(stage, *failed, StageState::Error)
            }
            PipelineStage::Error { stage: None } => StageState::Error,
        }
    }

    fn relative_to(stage: Stage, current: Stage, at_current: StageState) -> Self {
        use std::cmp::Ordering;
        match stage.index().cmp(&current.index()) {
            Ordering::Less => StageState::Complete,
            Ordering::Equal => at_current,
            Ordering::Greater => StageState::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stage_splits_done_and_pending() {
        let progress = PipelineStage::Running(Stage::ContentExtraction);
        assert_eq!(StageState::of(Stage::QueryAnalysis, &progress), StageState::Complete);
        assert_eq!(StageState::of(Stage::Research, &progress), StageState::Complete);
        assert_eq!(StageState::of(Stage::ContentExtraction, &progress), StageState::Active);
        assert_eq!(StageState::of(Stage::FollowUps, &progress), StageState::Pending);
    }

    #[test]
    fn test_failed_stage_marked_as_error() {
        let progress = PipelineStage::Error { stage: Some(Stage::Refinement) };
        assert_eq!(StageState::of(Stage::Drafting, &progress), StageState::Complete);
        assert_eq!(StageState::of(Stage::Refinement, &progress), StageState::Error);
        assert_eq!(StageState::of(Stage::FollowUps, &progress), StageState::Pending);
    }

    #[test]
    fn test_progress_line_has_every_stage() {
        let spans = build_progress_line(&PipelineStage::Idle);
        // icon + name per stage, arrows between
        assert_eq!(spans.len(), Stage::ALL.len() * 2 + Stage::ALL.len() - 1);
        assert_eq!(spans[1].content, "Analyze");
    }
}
