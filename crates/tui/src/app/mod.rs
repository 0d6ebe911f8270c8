pub(crate) mod config;
pub(crate) mod handlers;
pub(crate) mod logging;
pub(crate) mod runtime;
pub(crate) mod state;
pub(crate) mod util;
pub(crate) mod view;

use crate::app::state::{AnswerPolicy, InputState, LogKind, Session, WrappedLogCache};

pub struct AppState {
    pub session: Session,
    pub input: InputState,
    pub confirm_policy: AnswerPolicy,
    pub scroll_from_bottom: usize,
    pub last_log_viewport_height: usize,
    pub last_wrapped_total: usize,
    pub last_wrap_width: usize,
    pub wrapped_log_cache: Option<WrappedLogCache>,
    pub should_exit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnswerPolicy::default())
    }
}

impl AppState {
    pub fn new(confirm_policy: AnswerPolicy) -> Self {
        Self {
            session: Session::default(),
            input: InputState::default(),
            confirm_policy,
            scroll_from_bottom: 0,
            last_log_viewport_height: 0,
            last_wrapped_total: 0,
            last_wrap_width: 0,
            wrapped_log_cache: None,
            should_exit: false,
        }
    }

    pub fn push_line(&mut self, kind: LogKind, text: impl Into<String>) {
        self.session.push(kind, text);
    }

    pub fn log_version(&self) -> u64 {
        self.session.log.version()
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_page_up(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_up(page);
    }

    pub fn scroll_page_down(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_down(page);
    }
}
