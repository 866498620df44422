//! Caret movement. None of these touch the selection or the version.

use crate::editing::{Document, Position};

/// Word characters for word moves, word counts and whole-word search
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Document {
    pub fn move_left(&mut self) {
        let caret = self.caret;
        if caret.column > 0 {
            self.caret.column -= 1;
        } else if caret.row > 0 {
            self.caret = Position::new(caret.row - 1, self.lines.line_len(caret.row - 1));
        }
    }

    pub fn move_right(&mut self) {
        let caret = self.caret;
        if caret.column < self.lines.line_len(caret.row) {
            self.caret.column += 1;
        } else if caret.row + 1 < self.lines.line_count() {
            self.caret = Position::new(caret.row + 1, 0);
        }
    }

    pub fn move_up(&mut self) {
        if self.caret.row > 0 {
            self.set_caret(Position::new(self.caret.row - 1, self.caret.column));
        }
    }

    pub fn move_down(&mut self) {
        if self.caret.row + 1 < self.lines.line_count() {
            self.set_caret(Position::new(self.caret.row + 1, self.caret.column));
        }
    }

    /// Start of the next word, the line end, or the next line start when already at the end
    pub fn move_word_right(&mut self) {
        let Position { row, column } = self.caret;
        let chars: Vec<char> = self.line_chars(row);
        if column >= chars.len() {
            if row + 1 < self.lines.line_count() {
                self.caret = Position::new(row + 1, 0);
            }
            return;
        }

        let mut column = column;
        while column < chars.len() && is_word_char(chars[column]) {
            column += 1;
        }
        while column < chars.len() && !is_word_char(chars[column]) {
            column += 1;
        }
        self.caret.column = column;
    }

    /// Start of the current or previous word, or the previous line end at column 0
    pub fn move_word_left(&mut self) {
        let Position { row, column } = self.caret;
        if column == 0 {
            if row > 0 {
                self.caret = Position::new(row - 1, self.lines.line_len(row - 1));
            }
            return;
        }

        let chars: Vec<char> = self.line_chars(row);
        let mut column = column;
        while column > 0 && !is_word_char(chars[column - 1]) {
            column -= 1;
        }
        while column > 0 && is_word_char(chars[column - 1]) {
            column -= 1;
        }
        self.caret.column = column;
    }

    pub fn move_to_line_start(&mut self) {
        self.caret.column = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.caret.column = self.lines.line_len(self.caret.row);
    }

    pub fn move_to_document_start(&mut self) {
        self.caret = Position::default();
    }

    pub fn move_to_document_end(&mut self) {
        self.caret = self.lines.last_position();
    }

    pub fn move_page_up(&mut self, lines: usize) {
        let row = self.caret.row.saturating_sub(lines);
        self.set_caret(Position::new(row, self.caret.column));
    }

    pub fn move_page_down(&mut self, lines: usize) {
        let row = self.caret.row.saturating_add(lines);
        self.set_caret(Position::new(row, self.caret.column));
    }

    fn line_chars(&self, row: usize) -> Vec<char> {
        self.lines.line(row).unwrap_or_default().chars().collect()
    }
}
