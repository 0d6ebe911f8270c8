use crate::app::state::LineTone;
use ratatui::style::{Color, Modifier, Style};

use super::constants::INPUT_BG;

const DIFF_ADDED_BG: Color = Color::Rgb(21, 45, 33);
const DIFF_REMOVED_BG: Color = Color::Rgb(53, 28, 31);

pub(super) fn style_for(tone: LineTone) -> Style {
    match tone {
        LineTone::System => Style::default().fg(Color::Cyan),
        LineTone::User => Style::default().fg(Color::White).bg(INPUT_BG),
        LineTone::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        LineTone::Event => Style::default().fg(Color::White),
        LineTone::DiffHeader => Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
        LineTone::DiffHunk => Style::default().fg(Color::Magenta),
        LineTone::DiffAdded => Style::default().fg(Color::Green).bg(DIFF_ADDED_BG),
        LineTone::DiffRemoved => Style::default().fg(Color::Red).bg(DIFF_REMOVED_BG),
        LineTone::DiffContext => Style::default().fg(Color::Gray),
    }
}

#[cfg(test)]
mod tests {
    use super::{style_for, DIFF_ADDED_BG, DIFF_REMOVED_BG};
    use crate::app::state::LineTone;

    #[test]
    fn diff_styles_use_background_emphasis() {
        assert_eq!(style_for(LineTone::DiffAdded).bg, Some(DIFF_ADDED_BG));
        assert_eq!(style_for(LineTone::DiffRemoved).bg, Some(DIFF_REMOVED_BG));
        assert_eq!(style_for(LineTone::DiffContext).bg, None);
    }
}
