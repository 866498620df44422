use crate::editing::{Document, ParagraphStyle, Patch, Position};

/// Points added or removed by the font size shortcuts
pub const FONT_SIZE_STEP: u32 = 2;

/// Lines moved by PageUp/PageDown when the front end does not say otherwise
pub const DEFAULT_PAGE_LINES: usize = 20;

/// Caret motions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
    PageUp(usize),
    PageDown(usize),
}

/// Edit intents produced by key bindings or issued directly by a front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText(String),
    NewLine,
    Backspace,
    Delete,
    DeleteSelection,
    DeleteRange { start: Position, end: Position },
    ReplaceRange { start: Position, end: Position, text: String },
    /// Move the caret; `extend` grows the selection instead of dropping it
    Move { motion: Motion, extend: bool },
    SelectAll,
    ClearSelection,
    Undo,
    Redo,
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleStrikethrough,
    IncreaseFontSize,
    DecreaseFontSize,
    SetParagraphStyle(ParagraphStyle),
}

impl Document {
    /// Dispatch a command and report what it did
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let changed = match cmd {
            Cmd::InsertText(text) => self.insert_text(&text),
            Cmd::NewLine => self.new_line(),
            Cmd::Backspace => self.backspace(),
            Cmd::Delete => self.delete(),
            Cmd::DeleteSelection => self.delete_selection(),
            Cmd::DeleteRange { start, end } => self.delete_range(start, end),
            Cmd::ReplaceRange { start, end, text } => self.replace_range(start, end, &text),
            Cmd::Move { motion, extend } => {
                self.move_caret(motion, extend);
                false
            }
            Cmd::SelectAll => {
                self.select_all();
                false
            }
            Cmd::ClearSelection => {
                self.clear_selection();
                false
            }
            Cmd::Undo => self.undo(),
            Cmd::Redo => self.redo(),
            Cmd::ToggleBold => self.toggle_bold(),
            Cmd::ToggleItalic => self.toggle_italic(),
            Cmd::ToggleUnderline => self.toggle_underline(),
            Cmd::ToggleStrikethrough => self.toggle_strikethrough(),
            Cmd::IncreaseFontSize => {
                let size = self.text_style.font_size.saturating_add(FONT_SIZE_STEP);
                self.set_font_size(size)
            }
            Cmd::DecreaseFontSize => {
                let size = self.text_style.font_size.saturating_sub(FONT_SIZE_STEP);
                self.set_font_size(size)
            }
            Cmd::SetParagraphStyle(style) => self.set_current_paragraph_style(style),
        };

        Patch {
            version: self.version,
            caret: self.caret,
            changed,
        }
    }

    fn move_caret(&mut self, motion: Motion, extend: bool) {
        if extend && self.selection.is_none() {
            self.set_selection_anchor(self.caret);
        }

        match motion {
            Motion::Left => self.move_left(),
            Motion::Right => self.move_right(),
            Motion::Up => self.move_up(),
            Motion::Down => self.move_down(),
            Motion::WordLeft => self.move_word_left(),
            Motion::WordRight => self.move_word_right(),
            Motion::LineStart => self.move_to_line_start(),
            Motion::LineEnd => self.move_to_line_end(),
            Motion::DocumentStart => self.move_to_document_start(),
            Motion::DocumentEnd => self.move_to_document_end(),
            Motion::PageUp(lines) => self.move_page_up(lines),
            Motion::PageDown(lines) => self.move_page_down(lines),
        }

        if extend {
            self.update_selection_to_caret();
        } else {
            self.clear_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::doc_with_caret;

    #[test]
    fn test_typing_through_commands() {
        let mut doc = Document::new();

        let patch = doc.apply(Cmd::InsertText("Hi".into()));
        assert!(patch.changed);
        assert_eq!(patch.version, 1);
        assert_eq!(patch.caret, Position::new(0, 2));

        let patch = doc.apply(Cmd::NewLine);
        assert_eq!(patch.caret, Position::new(1, 0));
        assert_eq!(doc.text(), "Hi\n");
    }

    #[test]
    fn test_shift_moves_extend_selection() {
        let mut doc = doc_with_caret("Hello World", Position::new(0, 0));

        doc.apply(Cmd::Move {
            motion: Motion::WordRight,
            extend: true,
        });
        let patch = doc.apply(Cmd::Move {
            motion: Motion::WordRight,
            extend: true,
        });

        assert!(!patch.changed);
        assert_eq!(doc.selected_text(), "Hello World");

        doc.apply(Cmd::Move {
            motion: Motion::Left,
            extend: false,
        });
        assert!(!doc.has_selection());
        assert_eq!(doc.caret(), Position::new(0, 10));
    }

    #[test]
    fn test_font_size_steps_and_clamps() {
        let mut doc = Document::new();

        doc.apply(Cmd::IncreaseFontSize);
        assert_eq!(doc.text_style().font_size, 14);

        for _ in 0..10 {
            doc.apply(Cmd::DecreaseFontSize);
        }
        assert_eq!(doc.text_style().font_size, 8);

        let patch = doc.apply(Cmd::DecreaseFontSize);
        assert!(!patch.changed);
    }

    #[test]
    fn test_undo_command() {
        let mut doc = Document::from_text("abc");
        doc.apply(Cmd::SetParagraphStyle(ParagraphStyle::Heading1));

        let patch = doc.apply(Cmd::Undo);

        assert!(patch.changed);
        assert_eq!(doc.current_paragraph_style(), ParagraphStyle::Normal);
    }
}
