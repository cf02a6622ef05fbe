use unicode_width::UnicodeWidthStr;

/// Search input state for the TUI.
///
/// `text` mirrors the controller's query; `cursor_pos` is a byte offset that
/// always sits on a char boundary.
pub struct SearchState {
    pub text: String,
    pub cursor_pos: usize,
    pub focused: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            text: String::new(),
            cursor_pos: 0,
            focused: true,
        }
    }
}

impl SearchState {
    /// Replace the text (e.g. after the controller cleared the query)
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.cursor_pos = self.text.len();
        }
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    /// Delete before the cursor. Returns false if there was nothing to delete.
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.text.remove(prev);
        self.cursor_pos = prev;
        true
    }

    /// Delete under the cursor. Returns false at end of text.
    pub fn delete(&mut self) -> bool {
        if self.cursor_pos >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor_pos);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.text.len() {
            let next = self.text[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.text.len());
            self.cursor_pos = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_pos = 0;
    }

    /// Terminal columns between the start of the text and the cursor
    pub fn cursor_column(&self) -> u16 {
        self.text[..self.cursor_pos].width() as u16
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> SearchState {
        let mut state = SearchState::default();
        for c in s.chars() {
            state.insert(c);
        }
        state
    }

    #[test]
    fn edits_at_cursor() {
        let mut state = typed("rck");
        state.move_left();
        state.move_left();
        state.insert('i');
        assert_eq!(state.text, "rick");
        assert_eq!(state.cursor_pos, 2);

        assert!(state.delete());
        assert_eq!(state.text, "rik");
        assert!(state.backspace());
        assert_eq!(state.text, "rk");
        assert_eq!(state.cursor_pos, 1);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut state = typed("añb");
        state.move_left();
        state.move_left();
        assert_eq!(state.cursor_pos, 1);
        state.move_right();
        assert_eq!(state.cursor_pos, 3);
        assert!(state.backspace());
        assert_eq!(state.text, "ab");
    }

    #[test]
    fn boundaries_are_noops() {
        let mut state = typed("ab");
        assert!(!state.delete());
        state.move_home();
        assert!(!state.backspace());
        state.move_left();
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn cursor_column_counts_display_width() {
        let mut state = typed("日本");
        assert_eq!(state.cursor_column(), 4);
        state.move_left();
        assert_eq!(state.cursor_column(), 2);
    }

    #[test]
    fn set_text_moves_cursor_to_end() {
        let mut state = typed("rick");
        state.move_home();
        state.set_text("");
        assert_eq!(state.cursor_pos, 0);
        state.set_text("morty");
        assert_eq!(state.cursor_pos, 5);
    }
}
