use crate::annotations::{Annotations, Change};
use crate::editing::history::History;
use crate::editing::lines::{LineSpan, LineStore, normalize_newlines};
use crate::editing::{ParagraphStyle, Position, Selection, TextStyle};
use crate::models::PageLayout;

/// Settings a document is created with
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    /// Number of undo steps kept
    pub undo_limit: usize,
    pub text_style: TextStyle,
    pub page_layout: PageLayout,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            undo_limit: History::<DocumentState>::DEFAULT_CAPACITY,
            text_style: TextStyle::default(),
            page_layout: PageLayout::default(),
        }
    }
}

/// Everything undo/redo restores
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocumentState {
    lines: LineStore,
    caret: Position,
    selection: Option<Selection>,
    text_style: TextStyle,
    annotations: Annotations,
}

/// The editable document: lines, caret, selection, styles and annotations.
///
/// Every mutation goes through one of the methods here (or in the sibling
/// `annotate`, `search` and `commands` modules). A mutation that changes
/// anything records the previous state for undo and bumps [`Document::version`]
/// exactly once; a mutation that changes nothing does neither.
///
/// Text edits describe themselves as a [`Change`] so every annotation set is
/// rebased in the same step.
///
/// ```rust
/// # use wordpad_engine::editing::{Document, Position};
/// let mut doc = Document::from_text("Hello World");
/// doc.add_hyperlink(6, 11, "https://example.com", None).unwrap();
///
/// doc.set_caret(Position::new(0, 0));
/// doc.insert_text("Hi ");
///
/// let link = doc.annotations().hyperlinks.at(9).unwrap();
/// assert_eq!(link.range(), 9..14);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) lines: LineStore,
    pub(crate) caret: Position,
    pub(crate) selection: Option<Selection>,
    pub(crate) text_style: TextStyle,
    pub(crate) annotations: Annotations,
    pub(crate) page_layout: PageLayout,
    pub(crate) history: History<DocumentState>,
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            lines: LineStore::new(),
            caret: Position::default(),
            selection: None,
            text_style: options.text_style.clamped(),
            annotations: Annotations::default(),
            page_layout: options.page_layout,
            history: History::new(options.undo_limit),
            version: 0,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.lines = LineStore::from_text(text);
        doc
    }

    /// Replace the whole content. Annotations, history, caret and selection are reset.
    pub fn set_text(&mut self, text: &str) {
        self.lines = LineStore::from_text(text);
        self.annotations.clear();
        self.history.clear();
        self.caret = Position::default();
        self.selection = None;
        self.version += 1;
    }

    pub fn text(&self) -> String {
        self.lines.text()
    }

    pub fn lines(&self) -> &[String] {
        self.lines.lines()
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    pub fn line_span(&self, row: usize) -> LineSpan {
        self.lines.line_span(row)
    }

    /// Text of one line, empty for rows past the end
    pub fn line_string(&self, row: usize) -> String {
        self.lines.line(row).unwrap_or_default().to_string()
    }

    /// Length in characters, line breaks included
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn offset_of(&self, pos: Position) -> usize {
        self.lines.offset_of(pos)
    }

    pub fn position_of(&self, offset: usize) -> Position {
        self.lines.position_of(offset)
    }

    /// Monotonic counter bumped by every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn page_layout(&self) -> &PageLayout {
        &self.page_layout
    }

    pub fn set_page_layout(&mut self, layout: PageLayout) {
        self.page_layout = layout;
    }

    // ---- text edits ----

    pub fn insert_char(&mut self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut buf))
    }

    /// Type `text` at the caret, replacing the selection if there is one
    pub fn insert_text(&mut self, text: &str) -> bool {
        let text = normalize_newlines(text);
        if text.is_empty() && !self.has_selection() {
            return false;
        }
        self.edit(|doc| {
            if let Some((start, end)) = doc.selected_range() {
                doc.remove_between(start, end);
                doc.caret = start;
            }
            doc.selection = None;
            doc.caret = doc.insert_at(doc.caret, &text);
            true
        })
    }

    pub fn new_line(&mut self) -> bool {
        self.insert_char('\n')
    }

    /// Delete the character before the caret, joining lines at column 0
    pub fn backspace(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let caret = self.caret;
        let start = if caret.column > 0 {
            Position::new(caret.row, caret.column - 1)
        } else if caret.row > 0 {
            Position::new(caret.row - 1, self.lines.line_len(caret.row - 1))
        } else {
            return false;
        };
        self.edit(|doc| {
            doc.remove_between(start, caret);
            doc.caret = start;
            doc.selection = None;
            true
        })
    }

    /// Delete the character after the caret, joining lines at line end
    pub fn delete(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let caret = self.caret;
        let end = if caret.column < self.lines.line_len(caret.row) {
            Position::new(caret.row, caret.column + 1)
        } else if caret.row + 1 < self.lines.line_count() {
            Position::new(caret.row + 1, 0)
        } else {
            return false;
        };
        self.edit(|doc| {
            doc.remove_between(caret, end);
            doc.selection = None;
            true
        })
    }

    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selected_range() else {
            return false;
        };
        self.edit(|doc| {
            doc.remove_between(start, end);
            doc.caret = start;
            doc.selection = None;
            true
        })
    }

    /// Delete between two positions in either order; the caret follows the text
    pub fn delete_range(&mut self, start: Position, end: Position) -> bool {
        self.replace_range(start, end, "")
    }

    /// Replace the text between two positions, leaving the caret after the new text
    pub fn replace_range(&mut self, start: Position, end: Position, text: &str) -> bool {
        let (start, end) = self.ordered(start, end);
        let text = normalize_newlines(text);
        if start == end && text.is_empty() {
            return false;
        }
        self.edit(|doc| {
            let caret = doc.lines.offset_of(doc.caret);
            let removed = doc.lines.offset_of(start)..doc.lines.offset_of(end);
            doc.remove_between(start, end);
            doc.selection = None;
            if text.is_empty() {
                let caret = if caret >= removed.end {
                    caret - removed.len()
                } else {
                    caret.min(removed.start)
                };
                doc.caret = doc.lines.position_of(caret);
            } else {
                doc.caret = doc.insert_at(start, &text);
            }
            true
        })
    }

    // ---- caret & selection ----

    pub fn caret(&self) -> Position {
        self.caret
    }

    /// Move the caret, clamping to the document. The selection is left alone.
    pub fn set_caret(&mut self, pos: Position) {
        self.caret = self.lines.clamp(pos);
    }

    /// First phase of selecting: remember where the selection starts
    pub fn set_selection_anchor(&mut self, pos: Position) {
        self.selection = Some(Selection::collapsed(self.lines.clamp(pos)));
    }

    /// Second phase: stretch the selection from its anchor to the caret
    pub fn update_selection_to_caret(&mut self) {
        let caret = self.caret;
        match &mut self.selection {
            Some(selection) => selection.active = caret,
            None => self.selection = Some(Selection::collapsed(caret)),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some_and(|selection| !selection.is_empty())
    }

    /// Earlier end of the selection, or the caret without one
    pub fn selection_start(&self) -> Position {
        self.selected_range().map_or(self.caret, |(start, _)| start)
    }

    /// Later end of the selection, or the caret without one
    pub fn selection_end(&self) -> Position {
        self.selected_range().map_or(self.caret, |(_, end)| end)
    }

    pub fn select_all(&mut self) {
        let end = self.lines.last_position();
        self.selection = Some(Selection {
            anchor: Position::default(),
            active: end,
        });
        self.caret = end;
    }

    pub fn selected_text(&self) -> String {
        self.selected_range()
            .map(|(start, end)| self.lines.slice(start, end))
            .unwrap_or_default()
    }

    pub(crate) fn selected_range(&self) -> Option<(Position, Position)> {
        self.selection
            .filter(|selection| !selection.is_empty())
            .map(|selection| self.ordered(selection.start(), selection.end()))
    }

    // ---- styles ----

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    /// Set the active character style; the font size is clamped to 8..=72
    pub fn set_text_style(&mut self, style: TextStyle) -> bool {
        let style = style.clamped();
        if style == self.text_style {
            return false;
        }
        self.edit(|doc| {
            doc.text_style = style;
            true
        })
    }

    pub fn set_font_size(&mut self, size: u32) -> bool {
        self.update_text_style(|style| style.font_size = size)
    }

    pub fn toggle_bold(&mut self) -> bool {
        self.update_text_style(|style| style.bold = !style.bold)
    }

    pub fn toggle_italic(&mut self) -> bool {
        self.update_text_style(|style| style.italic = !style.italic)
    }

    pub fn toggle_underline(&mut self) -> bool {
        self.update_text_style(|style| style.underline = !style.underline)
    }

    pub fn toggle_strikethrough(&mut self) -> bool {
        self.update_text_style(|style| style.strikethrough = !style.strikethrough)
    }

    fn update_text_style(&mut self, update: impl FnOnce(&mut TextStyle)) -> bool {
        let mut style = self.text_style.clone();
        update(&mut style);
        self.set_text_style(style)
    }

    pub fn current_paragraph_style(&self) -> ParagraphStyle {
        self.lines.paragraph_style(self.caret.row)
    }

    pub fn set_current_paragraph_style(&mut self, style: ParagraphStyle) -> bool {
        self.set_paragraph_style(self.caret.row, style)
    }

    pub fn paragraph_style(&self, line: usize) -> ParagraphStyle {
        self.lines.paragraph_style(line)
    }

    pub fn paragraph_styles(&self) -> &[ParagraphStyle] {
        self.lines.paragraph_styles()
    }

    /// No-op for rows past the end or when the style is unchanged
    pub fn set_paragraph_style(&mut self, line: usize, style: ParagraphStyle) -> bool {
        if line >= self.lines.line_count() || self.lines.paragraph_style(line) == style {
            return false;
        }
        self.edit(|doc| doc.lines.set_paragraph_style(line, style))
    }

    // ---- history ----

    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        let current = self.state();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        let current = self.state();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- internals shared by the editing modules ----

    /// Run `change`; when it reports a change, record undo and bump the version
    pub(crate) fn edit(&mut self, change: impl FnOnce(&mut Self) -> bool) -> bool {
        let before = self.state();
        let changed = change(self);
        if changed {
            self.history.record(before);
            self.version += 1;
        }
        changed
    }

    /// Run a fallible mutation that leaves the document untouched on `Err`
    pub(crate) fn try_edit<T, E>(
        &mut self,
        change: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let before = self.state();
        let value = change(self)?;
        self.history.record(before);
        self.version += 1;
        Ok(value)
    }

    /// Insert at a position, rebasing annotations; returns the position after the text
    pub(crate) fn insert_at(&mut self, pos: Position, text: &str) -> Position {
        let text = normalize_newlines(text);
        let pos = self.lines.clamp(pos);
        if text.is_empty() {
            return pos;
        }
        let offset = self.lines.offset_of(pos);
        let end = self.lines.insert(pos, &text);
        self.annotations.rebase(&Change::Inserted {
            offset,
            len: text.chars().count(),
            at: pos,
            line_breaks: text.matches('\n').count(),
        });
        end
    }

    /// Remove between two positions, rebasing annotations
    pub(crate) fn remove_between(&mut self, start: Position, end: Position) {
        let (start, end) = self.ordered(start, end);
        if start == end {
            return;
        }
        let range = self.lines.offset_of(start)..self.lines.offset_of(end);
        self.lines.remove(start, end);
        self.annotations.rebase(&Change::Deleted { range, start, end });
    }

    pub(crate) fn ordered(&self, a: Position, b: Position) -> (Position, Position) {
        let (a, b) = (self.lines.clamp(a), self.lines.clamp(b));
        if a <= b { (a, b) } else { (b, a) }
    }

    fn state(&self) -> DocumentState {
        DocumentState {
            lines: self.lines.clone(),
            caret: self.caret,
            selection: self.selection,
            text_style: self.text_style.clone(),
            annotations: self.annotations.clone(),
        }
    }

    fn restore(&mut self, state: DocumentState) {
        let mut annotations = state.annotations;
        annotations.keep_ids_from(&self.annotations);
        self.lines = state.lines;
        self.caret = self.lines.clamp(state.caret);
        self.selection = state.selection;
        self.text_style = state.text_style;
        self.annotations = annotations;
    }
}
