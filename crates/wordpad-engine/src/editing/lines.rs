use crate::editing::{ParagraphStyle, Position};

/// Start offset and length (in characters) of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub len: usize,
}

/// Ordered lines of text plus the paragraph style of each line.
///
/// Invariants:
/// - there is always at least one line
/// - `styles.len() == lines.len()`
/// - no line contains `'\n'` or `'\r'`
#[derive(Debug, Clone, PartialEq)]
pub struct LineStore {
    lines: Vec<String>,
    styles: Vec<ParagraphStyle>,
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStore {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            styles: vec![ParagraphStyle::Normal],
        }
    }

    /// Split `text` on `\n`, dropping every `\r`
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = normalize_newlines(text)
            .split('\n')
            .map(str::to_string)
            .collect();
        let styles = vec![ParagraphStyle::Normal; lines.len()];
        Self { lines, styles }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Length of a line in characters, 0 for rows past the end
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| line.chars().count())
    }

    pub fn line_span(&self, row: usize) -> LineSpan {
        let row = row.min(self.lines.len() - 1);
        LineSpan {
            start: self.line_start(row),
            len: self.line_len(row),
        }
    }

    /// Total length in characters, counting one per line break
    pub fn len(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .sum::<usize>()
            + self.lines.len()
            - 1
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn last_position(&self) -> Position {
        let row = self.lines.len() - 1;
        Position::new(row, self.line_len(row))
    }

    pub fn clamp(&self, pos: Position) -> Position {
        let row = pos.row.min(self.lines.len() - 1);
        Position::new(row, pos.column.min(self.line_len(row)))
    }

    /// Absolute character offset of a (clamped) position
    pub fn offset_of(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        self.line_start(pos.row) + pos.column
    }

    /// Position of an absolute offset, clamped to the end of the document
    pub fn position_of(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (row, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                return Position::new(row, remaining);
            }
            remaining -= len + 1;
        }
        self.last_position()
    }

    fn line_start(&self, row: usize) -> usize {
        self.lines[..row]
            .iter()
            .map(|line| line.chars().count() + 1)
            .sum()
    }

    /// Text between two positions, joined with `\n`
    pub fn slice(&self, start: Position, end: Position) -> String {
        let (start, end) = self.ordered(start, end);
        if start.row == end.row {
            let line = &self.lines[start.row];
            return line[byte_index(line, start.column)..byte_index(line, end.column)].to_string();
        }

        let first = &self.lines[start.row];
        let last = &self.lines[end.row];
        let mut out = first[byte_index(first, start.column)..].to_string();
        for line in &self.lines[start.row + 1..end.row] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(&last[..byte_index(last, end.column)]);
        out
    }

    /// Insert text that is already free of `\r`; returns the position just after it.
    ///
    /// New lines created by the insert are `Normal`. Splitting a non-empty
    /// line at column 0 carries its paragraph style down with the content.
    pub(crate) fn insert(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.row];
        let tail = line.split_off(byte_index(line, pos.column));
        let moved_content = pos.column == 0 && !tail.is_empty();

        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        line.push_str(first);
        let rest: Vec<&str> = segments.collect();

        let Some((last, middle)) = rest.split_last() else {
            line.push_str(&tail);
            return Position::new(pos.row, pos.column + first.chars().count());
        };

        let mut new_lines: Vec<String> = middle.iter().map(|s| s.to_string()).collect();
        let end_column = last.chars().count();
        new_lines.push(format!("{last}{tail}"));

        let added = new_lines.len();
        let at = pos.row + 1;
        self.lines.splice(at..at, new_lines);
        self.styles
            .splice(at..at, std::iter::repeat_n(ParagraphStyle::Normal, added));

        if moved_content {
            let style = std::mem::take(&mut self.styles[pos.row]);
            self.styles[pos.row + added] = style;
        }

        Position::new(pos.row + added, end_column)
    }

    /// Remove the text between two positions, merging lines as needed
    pub(crate) fn remove(&mut self, start: Position, end: Position) {
        let (start, end) = self.ordered(start, end);
        if start == end {
            return;
        }

        if start.row == end.row {
            let line = &mut self.lines[start.row];
            let from = byte_index(line, start.column);
            let to = byte_index(line, end.column);
            line.replace_range(from..to, "");
            return;
        }

        let last = &self.lines[end.row];
        let tail = last[byte_index(last, end.column)..].to_string();
        let first = &mut self.lines[start.row];
        first.truncate(byte_index(first, start.column));
        first.push_str(&tail);

        self.lines.drain(start.row + 1..=end.row);
        self.styles.drain(start.row + 1..=end.row);
    }

    pub fn paragraph_style(&self, row: usize) -> ParagraphStyle {
        self.styles.get(row).copied().unwrap_or_default()
    }

    pub fn paragraph_styles(&self) -> &[ParagraphStyle] {
        &self.styles
    }

    pub(crate) fn set_paragraph_style(&mut self, row: usize, style: ParagraphStyle) -> bool {
        match self.styles.get_mut(row) {
            Some(slot) if *slot != style => {
                *slot = style;
                true
            }
            _ => false,
        }
    }

    /// Bulk-assign styles, padding with `Normal` or truncating to the line count
    pub(crate) fn load_paragraph_styles(&mut self, mut styles: Vec<ParagraphStyle>) {
        styles.resize(self.lines.len(), ParagraphStyle::Normal);
        self.styles = styles;
    }

    fn ordered(&self, a: Position, b: Position) -> (Position, Position) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if a <= b { (a, b) } else { (b, a) }
    }
}

/// Byte index of a character column, or the line length past the end
pub(crate) fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(index, _)| index)
}

pub(crate) fn normalize_newlines(text: &str) -> String {
    text.replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_text_strips_carriage_returns() {
        let store = LineStore::from_text("line1\r\nline2");
        assert_eq!(store.lines(), ["line1", "line2"]);
        assert_eq!(store.text(), "line1\nline2");
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let store = LineStore::from_text("");
        assert_eq!(store.line_count(), 1);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_offsets_round_trip() {
        let store = LineStore::from_text("ab\ncde\n\nf");

        assert_eq!(store.offset_of(Position::new(1, 0)), 3);
        assert_eq!(store.offset_of(Position::new(2, 0)), 7);
        assert_eq!(store.offset_of(Position::new(3, 1)), 9);
        assert_eq!(store.len(), 9);

        for offset in 0..=store.len() {
            assert_eq!(store.offset_of(store.position_of(offset)), offset);
        }
        assert_eq!(store.position_of(100), Position::new(3, 1));
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let store = LineStore::from_text("héllo\nwörld");
        assert_eq!(store.line_len(0), 5);
        assert_eq!(store.offset_of(Position::new(1, 2)), 8);
        assert_eq!(
            store.line_span(1),
            LineSpan { start: 6, len: 5 }
        );
    }

    #[test]
    fn test_insert_multiline_splits_line() {
        let mut store = LineStore::from_text("Hello World");

        let end = store.insert(Position::new(0, 5), ",\nbrave\nnew");

        assert_eq!(store.lines(), ["Hello,", "brave", "new World"]);
        assert_eq!(end, Position::new(2, 3));
        assert_eq!(store.paragraph_styles().len(), 3);
    }

    #[test]
    fn test_split_at_column_zero_moves_heading_down() {
        let mut store = LineStore::from_text("Intro");
        store.set_paragraph_style(0, ParagraphStyle::Heading1);

        store.insert(Position::new(0, 0), "\n");

        assert_eq!(store.lines(), ["", "Intro"]);
        assert_eq!(store.paragraph_style(0), ParagraphStyle::Normal);
        assert_eq!(store.paragraph_style(1), ParagraphStyle::Heading1);
    }

    #[test]
    fn test_split_mid_line_keeps_heading_on_top() {
        let mut store = LineStore::from_text("Intro text");
        store.set_paragraph_style(0, ParagraphStyle::Heading2);

        store.insert(Position::new(0, 5), "\n");

        assert_eq!(store.paragraph_style(0), ParagraphStyle::Heading2);
        assert_eq!(store.paragraph_style(1), ParagraphStyle::Normal);
    }

    #[test]
    fn test_remove_across_lines_merges() {
        let mut store = LineStore::from_text("one\ntwo\nthree");
        store.set_paragraph_style(0, ParagraphStyle::Title);
        store.set_paragraph_style(2, ParagraphStyle::Heading1);

        store.remove(Position::new(2, 2), Position::new(0, 1));

        assert_eq!(store.lines(), ["oree"]);
        assert_eq!(store.paragraph_styles(), [ParagraphStyle::Title]);
    }

    #[test]
    fn test_slice_spans_lines() {
        let store = LineStore::from_text("one\ntwo\nthree");
        assert_eq!(
            store.slice(Position::new(0, 1), Position::new(2, 2)),
            "ne\ntwo\nth"
        );
        assert_eq!(store.slice(Position::new(1, 1), Position::new(1, 3)), "wo");
    }

    #[test]
    fn test_clamp_out_of_range_position() {
        let store = LineStore::from_text("ab\nc");
        assert_eq!(store.clamp(Position::new(9, 9)), Position::new(1, 1));
        assert_eq!(store.clamp(Position::new(0, 9)), Position::new(0, 2));
    }
}
