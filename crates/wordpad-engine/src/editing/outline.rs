use crate::editing::{Document, ParagraphStyle, Position};

/// Characters of heading text kept in an outline entry before it is cut off
pub const OUTLINE_TEXT_LIMIT: usize = 60;

/// One heading line as shown in the navigation pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub text: String,
    pub style: ParagraphStyle,
    pub level: u8,
    pub line: usize,
}

impl Document {
    /// Every non-`Normal` line, in document order
    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.lines
            .lines()
            .iter()
            .zip(self.lines.paragraph_styles())
            .enumerate()
            .filter_map(|(line, (text, style))| {
                let level = style.outline_level()?;
                Some(OutlineEntry {
                    text: truncate(text),
                    style: *style,
                    level,
                    line,
                })
            })
            .collect()
    }

    /// Put the caret at the start of `line`; false when there is no such line
    pub fn go_to_outline_entry(&mut self, line: usize) -> bool {
        if line >= self.lines.line_count() {
            return false;
        }
        self.caret = Position::new(line, 0);
        self.selection = None;
        true
    }

    /// Plain-text table of contents, two spaces of indent per level below 1
    pub fn generate_table_of_contents(&self) -> String {
        self.outline()
            .iter()
            .map(|entry| {
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                format!("{indent}{}\n", entry.text)
            })
            .collect()
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(OUTLINE_TEXT_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
