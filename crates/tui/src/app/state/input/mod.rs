/// Single-line composer with submission history.
#[derive(Default)]
pub struct InputState {
    pub buffer: Vec<char>,
    pub cursor: usize,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
    pub history_saved: Option<String>,
}

impl InputState {
    pub fn current(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn set_from(&mut self, value: &str) {
        self.buffer = value.chars().collect();
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_index = None;
        self.history_saved = None;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
        self.reset_history_nav();
    }

    pub fn insert_str(&mut self, value: &str) {
        for ch in value.chars() {
            self.buffer.insert(self.cursor, ch);
            self.cursor += 1;
        }
        self.reset_history_nav();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        self.reset_history_nav();
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.buffer.len() {
            return;
        }
        self.buffer.remove(self.cursor);
        self.reset_history_nav();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn kill_line(&mut self) {
        self.clear();
    }

    pub fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        while self.cursor > 0 && self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
        while self.cursor > 0 && !self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
        self.reset_history_nav();
    }

    fn reset_history_nav(&mut self) {
        if self.history_index.is_some() {
            self.history_index = None;
            self.history_saved = None;
        }
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next_index = match self.history_index {
            None => {
                self.history_saved = Some(self.current());
                self.history.len().saturating_sub(1)
            }
            Some(index) => index.saturating_sub(1),
        };
        self.history_index = Some(next_index);
        let value = self.history[next_index].clone();
        self.set_from(&value);
    }

    pub fn history_down(&mut self) {
        let Some(index) = self.history_index else {
            return;
        };
        if index + 1 < self.history.len() {
            let next = index + 1;
            self.history_index = Some(next);
            let value = self.history[next].clone();
            self.set_from(&value);
            return;
        }
        self.history_index = None;
        if let Some(saved) = self.history_saved.take() {
            self.set_from(&saved);
        }
    }

    pub fn record_history(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        if self.history.last().is_some_and(|last| last == value) {
            return;
        }
        self.history.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::InputState;

    #[test]
    fn insert_and_backspace_follow_cursor() {
        let mut input = InputState::default();
        input.insert_str("helo");
        input.move_left();
        input.insert_char('l');
        assert_eq!(input.current(), "hello");
        assert_eq!(input.cursor, 4);

        input.move_end();
        input.backspace();
        assert_eq!(input.current(), "hell");
        input.move_home();
        input.delete();
        assert_eq!(input.current(), "ell");
    }

    #[test]
    fn delete_word_back_removes_trailing_word() {
        let mut input = InputState::default();
        input.set_from("build the project  ");
        input.delete_word_back();
        assert_eq!(input.current(), "build the ");
    }

    #[test]
    fn history_walks_back_and_restores_draft() {
        let mut input = InputState::default();
        input.record_history("first");
        input.record_history("second");
        input.record_history("second");
        assert_eq!(input.history.len(), 2);

        input.set_from("draft");
        input.history_up();
        assert_eq!(input.current(), "second");
        input.history_up();
        assert_eq!(input.current(), "first");
        input.history_down();
        assert_eq!(input.current(), "second");
        input.history_down();
        assert_eq!(input.current(), "draft");
    }

    #[test]
    fn kill_line_clears_buffer_and_cursor() {
        let mut input = InputState::default();
        input.set_from("yes");
        input.kill_line();
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
    }
}
