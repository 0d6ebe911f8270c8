use crate::app::state::{InputState, SessionPhase};
use crate::app::util::text::char_width;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::constants::{INPUT_BG, INPUT_PROMPT};

pub(super) struct InputLayout {
    pub(super) line: String,
    pub(super) cursor_x: u16,
}

/// Lays out the single-line composer, scrolling horizontally so the cursor
/// stays visible.
pub(super) fn compute_input_layout(width: usize, input: &InputState) -> InputLayout {
    let prefix_width: usize = INPUT_PROMPT.chars().map(char_width).sum();
    let available = width.saturating_sub(prefix_width).max(1);
    let cursor = input.cursor.min(input.buffer.len());

    let mut start = 0_usize;
    let mut before_cursor: usize = input.buffer[..cursor].iter().copied().map(char_width).sum();
    while before_cursor >= available && start < cursor {
        before_cursor -= char_width(input.buffer[start]);
        start += 1;
    }

    let mut line = INPUT_PROMPT.to_string();
    let mut used = 0_usize;
    for &ch in &input.buffer[start..] {
        let ch_width = char_width(ch);
        if used + ch_width > available {
            break;
        }
        line.push(ch);
        used += ch_width;
    }

    let cursor_x = (prefix_width + before_cursor).min(width.saturating_sub(1));
    InputLayout {
        line,
        cursor_x: u16::try_from(cursor_x).unwrap_or(u16::MAX),
    }
}

fn placeholder(phase: SessionPhase) -> Option<&'static str> {
    if phase.is_closed() {
        return Some("Session ended. Press Ctrl+C to exit.");
    }
    (phase != SessionPhase::Open).then_some("Waiting for connection...")
}

pub(super) fn build_input_line(
    layout: &InputLayout,
    input: &InputState,
    phase: SessionPhase,
) -> Line<'static> {
    let base = Style::default().bg(INPUT_BG);
    if input.is_empty() {
        if let Some(hint) = placeholder(phase) {
            return Line::from(vec![
                Span::styled(INPUT_PROMPT.to_string(), base),
                Span::styled(hint.to_string(), base.add_modifier(Modifier::DIM)),
            ]);
        }
    }
    Line::from(Span::styled(layout.line.clone(), base))
}
