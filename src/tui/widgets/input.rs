//! Single-line text field with a cursor. The cursor is a char index,
//! not a byte index, so multi-byte input behaves.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
    cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in chars, for Frame::set_cursor_position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn handle_char(&mut self, c: char) {
        let index = self.byte_index();
        self.value.insert(index, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let index = self.byte_index();
        self.value.remove(index);
    }

    pub fn delete(&mut self) {
        let index = self.byte_index();
        if index < self.value.len() {
            self.value.remove(index);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut field = InputField::with_value("read");
        field.move_home();
        field.handle_char('r');
        field.handle_char('e');
        field.handle_char('-');
        assert_eq!(field.value(), "re-read");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_backspace_and_delete_with_multibyte_chars() {
        let mut field = InputField::with_value("café");
        field.backspace();
        assert_eq!(field.value(), "caf");

        field.set_value("naïve");
        field.move_home();
        field.move_right();
        field.move_right();
        field.delete();
        assert_eq!(field.value(), "nave");
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut field = InputField::new();
        field.move_left();
        field.move_right();
        assert_eq!(field.cursor(), 0);
        field.handle_char('x');
        field.move_right();
        assert_eq!(field.cursor(), 1);
    }
}
