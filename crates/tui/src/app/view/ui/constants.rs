use ratatui::style::Color;

pub(super) const APP_TITLE: &str = "Agentic Code Assistant";
pub(super) const INPUT_PROMPT: &str = "> ";
pub(super) const TITLE_HEIGHT: u16 = 1;
pub(super) const STATUS_HEIGHT: u16 = 1;
pub(super) const INPUT_HEIGHT: u16 = 1;
pub(super) const INPUT_BG: Color = Color::Rgb(40, 40, 40);
pub(super) const BANNER_BG: Color = Color::Rgb(70, 55, 10);
