mod constants;
mod input;
mod log;
mod status;
mod style;
mod text;

use crate::app::AppState;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use self::constants::{INPUT_HEIGHT, STATUS_HEIGHT, TITLE_HEIGHT};
use self::input::{build_input_line, compute_input_layout};
use self::log::{cached_wrap_log_lines, wrapped_lines_to_lines};
use self::status::{build_banner_line, build_status_line, build_title_line};

fn row(area: Rect, y: u16, height: u16) -> Rect {
    Rect {
        x: area.x,
        y,
        width: area.width,
        height,
    }
}

/// Title, scrollback, confirmation banner, status, composer; top to bottom.
pub fn draw_ui(f: &mut Frame, app: &mut AppState) {
    let size = f.area();
    if size.width == 0 || size.height == 0 {
        return;
    }
    f.render_widget(Clear, size);

    let width = size.width as usize;
    let notification = app.session.confirmation.notification();
    let banner_height = u16::from(notification.is_some());
    let chrome = TITLE_HEIGHT + banner_height + STATUS_HEIGHT + INPUT_HEIGHT;

    let input_area = row(size, size.y + size.height - INPUT_HEIGHT, INPUT_HEIGHT);
    let layout = compute_input_layout(width, &app.input);
    f.render_widget(
        Paragraph::new(build_input_line(&layout, &app.input, app.session.phase())),
        input_area,
    );
    f.set_cursor_position((input_area.x + layout.cursor_x, input_area.y));
    if size.height < chrome {
        return;
    }

    let log_height = size.height - chrome;
    let wrapped_total = cached_wrap_log_lines(app, width).len();

    // Hold the viewport in place while the operator reads scrollback.
    if app.scroll_from_bottom > 0 && app.last_wrap_width == width {
        let added = wrapped_total.saturating_sub(app.last_wrapped_total);
        app.scroll_from_bottom = app.scroll_from_bottom.saturating_add(added);
    }
    app.last_log_viewport_height = log_height as usize;
    let max_scroll = wrapped_total.saturating_sub(log_height as usize);
    app.scroll_from_bottom = app.scroll_from_bottom.min(max_scroll);

    let visible_end = wrapped_total.saturating_sub(app.scroll_from_bottom);
    let visible_start = visible_end.saturating_sub(log_height as usize);

    f.render_widget(
        Paragraph::new(build_title_line(width)),
        row(size, size.y, TITLE_HEIGHT),
    );

    let log_area = row(size, size.y + TITLE_HEIGHT, log_height);
    if log_area.height > 0 {
        let wrapped = cached_wrap_log_lines(app, width);
        let visible = wrapped_lines_to_lines(&wrapped[visible_start..visible_end]);
        f.render_widget(Paragraph::new(Text::from(visible)), log_area);
    }

    let mut y = log_area.y + log_height;
    if let Some(notification) = notification.as_ref() {
        f.render_widget(
            Paragraph::new(build_banner_line(notification, width)),
            row(size, y, banner_height),
        );
        y += banner_height;
    }

    f.render_widget(
        Paragraph::new(build_status_line(app, width)),
        row(size, y, STATUS_HEIGHT),
    );

    app.last_wrapped_total = wrapped_total;
    app.last_wrap_width = width;
}
