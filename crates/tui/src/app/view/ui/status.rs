use crate::app::state::{ConfirmPhase, Notification, SessionPhase};
use crate::app::AppState;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::constants::{APP_TITLE, BANNER_BG};
use super::text::{pad_to_width, truncate_to_width};

pub(super) fn build_title_line(width: usize) -> Line<'static> {
    Line::from(Span::styled(
        truncate_to_width(APP_TITLE, width),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn phase_style(phase: SessionPhase) -> Style {
    match phase {
        SessionPhase::Open => Style::default().fg(Color::Green),
        SessionPhase::Connecting => Style::default().fg(Color::Yellow),
        SessionPhase::ClosedError => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
        SessionPhase::Uninitialized | SessionPhase::ClosedClean => {
            Style::default().add_modifier(Modifier::DIM)
        }
    }
}

pub(super) fn build_status_line(app: &AppState, width: usize) -> Line<'static> {
    let phase = app.session.phase();
    let label = format!("● {}", phase.label());
    let mut segments = Vec::new();
    if app.session.confirmation.phase() == ConfirmPhase::AwaitingConfirmation {
        if let Some(pending) = app.session.confirmation.pending() {
            segments.push(format!("pending: {}", pending.file_path));
        }
    }
    if let Some(connection_id) = app.session.connection_id() {
        segments.push(format!("id: {connection_id}"));
    }
    if app.scroll_from_bottom > 0 {
        segments.push(format!("scrolled: {}", app.scroll_from_bottom));
    }
    segments.push("PgUp/PgDn scroll".to_string());
    segments.push("Ctrl+C quit".to_string());

    let rest = format!("  {}", segments.join(" · "));
    let label_width = label.chars().count();
    let rest = truncate_to_width(&rest, width.saturating_sub(label_width));
    Line::from(vec![
        Span::styled(label, phase_style(phase)),
        Span::styled(rest, Style::default().add_modifier(Modifier::DIM)),
    ])
}

pub(super) fn build_banner_line(notification: &Notification, width: usize) -> Line<'static> {
    let text = pad_to_width(
        truncate_to_width(&format!(" {notification}"), width),
        width,
    );
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .bg(BANNER_BG)
            .add_modifier(Modifier::BOLD),
    ))
}
