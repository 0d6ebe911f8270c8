use crate::app::state::{LineTone, LogEntry, LogKind, WrappedLine, WrappedLogCache};
use crate::app::util::text::{sanitize_for_tui, wrap_line};
use crate::app::AppState;
use ratatui::text::{Line, Span};

use super::style::style_for;
use super::text::pad_to_width;

fn tone_for_kind(kind: &LogKind) -> LineTone {
    match kind {
        LogKind::System => LineTone::System,
        LogKind::User => LineTone::User,
        LogKind::Error => LineTone::Error,
        LogKind::Diff => LineTone::DiffContext,
        LogKind::Other(_) => LineTone::Event,
    }
}

fn diff_line_tone(line: &str) -> LineTone {
    if line.starts_with("+++") || line.starts_with("---") || line.starts_with("diff ") {
        LineTone::DiffHeader
    } else if line.starts_with("@@") {
        LineTone::DiffHunk
    } else if line.starts_with('+') {
        LineTone::DiffAdded
    } else if line.starts_with('-') {
        LineTone::DiffRemoved
    } else {
        LineTone::DiffContext
    }
}

fn wrap_log_entries(entries: &[LogEntry], width: usize) -> Vec<WrappedLine> {
    let mut out = Vec::new();
    for entry in entries {
        let is_diff = *entry.kind() == LogKind::Diff;
        let is_user = *entry.kind() == LogKind::User;
        for raw in entry.text().split('\n') {
            let tone = if is_diff {
                diff_line_tone(raw)
            } else {
                tone_for_kind(entry.kind())
            };
            let clean = sanitize_for_tui(raw);
            for row in wrap_line(&clean, width) {
                // User rows carry a background, so they span the full width.
                let text = if is_user { pad_to_width(row, width) } else { row };
                out.push(WrappedLine { tone, text });
            }
        }
    }
    out
}

pub(super) fn cached_wrap_log_lines(app: &mut AppState, width: usize) -> &[WrappedLine] {
    if width == 0 {
        return &[];
    }
    let log_version = app.log_version();
    let cache_hit = matches!(
        app.wrapped_log_cache.as_ref(),
        Some(cache) if cache.width == width && cache.log_version == log_version
    );
    if !cache_hit {
        let wrapped = wrap_log_entries(app.session.log.snapshot(), width);
        app.wrapped_log_cache = Some(WrappedLogCache {
            width,
            log_version,
            wrapped,
        });
    }
    app.wrapped_log_cache
        .as_ref()
        .map(|cache| cache.wrapped.as_slice())
        .unwrap_or(&[])
}

pub(super) fn wrapped_lines_to_lines(lines: &[WrappedLine]) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|line| Line::from(Span::styled(line.text.clone(), style_for(line.tone))))
        .collect()
}
