//! Document-level annotation mutators.
//!
//! Each successful mutation is one undo step and one version bump. Rejected
//! ones return the collection's error and leave the document as it was.

use std::path::PathBuf;

use crate::annotations::{
    AnnotationError, AnnotationId, CellPos, Drawing, Equation, Image, Shape, Table, TableError,
    TableGrid,
};
use crate::editing::{Document, Selection};

impl Document {
    // ---- hyperlinks ----

    /// Link the characters `[start, end)`
    pub fn add_hyperlink(
        &mut self,
        start: usize,
        end: usize,
        url: &str,
        tooltip: Option<String>,
    ) -> Result<AnnotationId, AnnotationError> {
        let len = self.len();
        self.try_edit(|doc| doc.annotations.hyperlinks.add(start..end, url, tooltip, len))
    }

    /// Link the selected text
    pub fn link_selection(
        &mut self,
        url: &str,
        tooltip: Option<String>,
    ) -> Result<AnnotationId, AnnotationError> {
        let start = self.offset_of(self.selection_start());
        let end = self.offset_of(self.selection_end());
        self.add_hyperlink(start, end, url, tooltip)
    }

    pub fn set_hyperlink_url(&mut self, id: AnnotationId, url: &str) -> Result<(), AnnotationError> {
        self.try_edit(|doc| doc.annotations.hyperlinks.set_url(id, url))
    }

    pub fn remove_hyperlink(&mut self, id: AnnotationId) -> bool {
        self.edit(|doc| doc.annotations.hyperlinks.remove(id))
    }

    // ---- bookmarks ----

    pub fn add_bookmark(&mut self, name: &str, offset: usize) -> Result<AnnotationId, AnnotationError> {
        let len = self.len();
        self.try_edit(|doc| doc.annotations.bookmarks.add(name, offset, len))
    }

    /// Bookmark the caret position
    pub fn bookmark_caret(&mut self, name: &str) -> Result<AnnotationId, AnnotationError> {
        self.add_bookmark(name, self.offset_of(self.caret))
    }

    pub fn remove_bookmark(&mut self, id: AnnotationId) -> bool {
        self.edit(|doc| doc.annotations.bookmarks.remove(id))
    }

    /// Move the caret to a named bookmark and clear the selection
    pub fn go_to_bookmark(&mut self, name: &str) -> bool {
        let Some(offset) = self.annotations.bookmarks.find(name).map(|mark| mark.offset) else {
            return false;
        };
        self.caret = self.position_of(offset);
        self.selection = None;
        true
    }

    // ---- footnotes ----

    pub fn add_footnote(&mut self, offset: usize, text: &str) -> Result<AnnotationId, AnnotationError> {
        let len = self.len();
        self.try_edit(|doc| doc.annotations.footnotes.add(offset, text, len))
    }

    pub fn set_footnote_text(&mut self, id: AnnotationId, text: &str) -> Result<(), AnnotationError> {
        self.try_edit(|doc| doc.annotations.footnotes.set_text(id, text))
    }

    pub fn remove_footnote(&mut self, id: AnnotationId) -> bool {
        self.edit(|doc| doc.annotations.footnotes.remove(id))
    }

    // ---- tables ----

    /// Insert a `rows` x `cols` table anchored at the caret
    pub fn insert_table(&mut self, rows: usize, cols: usize) -> AnnotationId {
        let table = Table::new(self.caret.row, self.caret.column, rows, cols);
        self.add_entity(|doc| doc.annotations.tables.add(table))
    }

    pub fn remove_table(&mut self, id: AnnotationId) -> bool {
        self.edit(|doc| doc.annotations.tables.remove(id))
    }

    /// Apply a grid operation to a table as one undoable step.
    ///
    /// The closure works on a copy, so an `Err` leaves the table untouched. A
    /// closure that leaves every cell as it was records nothing.
    ///
    /// ```rust
    /// # use wordpad_engine::editing::Document;
    /// # use wordpad_engine::annotations::CellPos;
    /// let mut doc = Document::new();
    /// let id = doc.insert_table(2, 2);
    /// doc.edit_table(id, |grid| grid.merge(CellPos::new(0, 0), CellPos::new(0, 1)))
    ///     .unwrap();
    /// assert!(doc.undo());
    /// ```
    pub fn edit_table<R>(
        &mut self,
        id: AnnotationId,
        change: impl FnOnce(&mut TableGrid) -> Result<R, TableError>,
    ) -> Result<R, TableError> {
        let mut grid = self
            .annotations
            .tables
            .get(id)
            .ok_or(TableError::UnknownTable(id))?
            .grid
            .clone();
        let value = change(&mut grid)?;
        let stored = self.table_grid_mut(id)?;
        if grid.same_cells(stored) {
            // only the cell cursor moved
            *stored = grid;
            return Ok(value);
        }
        self.try_edit(|doc| {
            let table = doc
                .annotations
                .tables
                .get_mut(id)
                .ok_or(TableError::UnknownTable(id))?;
            table.grid = grid;
            Ok(value)
        })
    }

    /// Tab inside a table; moves the cell cursor without recording history
    pub fn table_next_cell(&mut self, id: AnnotationId) -> Result<CellPos, TableError> {
        self.table_grid_mut(id).map(TableGrid::move_to_next_cell)
    }

    /// Shift+Tab inside a table
    pub fn table_prev_cell(&mut self, id: AnnotationId) -> Result<CellPos, TableError> {
        self.table_grid_mut(id).map(TableGrid::move_to_prev_cell)
    }

    fn table_grid_mut(&mut self, id: AnnotationId) -> Result<&mut TableGrid, TableError> {
        self.annotations
            .tables
            .get_mut(id)
            .map(|table| &mut table.grid)
            .ok_or(TableError::UnknownTable(id))
    }

    // ---- images, drawings, equations ----

    pub fn insert_image(&mut self, path: impl Into<PathBuf>, width: f32, height: f32) -> AnnotationId {
        let image = Image::new(self.caret.row, self.caret.column, path, width, height);
        self.add_entity(|doc| doc.annotations.images.add(image))
    }

    pub fn set_image_alt_text(&mut self, id: AnnotationId, alt_text: &str) -> Result<(), AnnotationError> {
        self.try_edit(|doc| {
            let image = doc
                .annotations
                .images
                .get_mut(id)
                .ok_or(AnnotationError::UnknownId(id))?;
            image.alt_text = alt_text.to_string();
            Ok(())
        })
    }

    pub fn remove_image(&mut self, id: AnnotationId) -> bool {
        self.edit(|doc| doc.annotations.images.remove(id))
    }

    pub fn insert_drawing(&mut self, width: f32, height: f32) -> AnnotationId {
        let drawing = Drawing::new(self.caret.row, self.caret.column, width, height);
        self.add_entity(|doc| doc.annotations.drawings.add(drawing))
    }

    pub fn add_shape(&mut self, drawing: AnnotationId, shape: Shape) -> Result<(), AnnotationError> {
        self.try_edit(|doc| {
            let target = doc
                .annotations
                .drawings
                .get_mut(drawing)
                .ok_or(AnnotationError::UnknownId(drawing))?;
            target.shapes.push(shape);
            Ok(())
        })
    }

    pub fn remove_drawing(&mut self, id: AnnotationId) -> bool {
        self.edit(|doc| doc.annotations.drawings.remove(id))
    }

    pub fn insert_equation(&mut self, source: &str) -> AnnotationId {
        let equation = Equation::new(self.caret.row, self.caret.column, source);
        self.add_entity(|doc| doc.annotations.equations.add(equation))
    }

    pub fn set_equation_source(&mut self, id: AnnotationId, source: &str) -> Result<(), AnnotationError> {
        self.try_edit(|doc| {
            let equation = doc
                .annotations
                .equations
                .get_mut(id)
                .ok_or(AnnotationError::UnknownId(id))?;
            equation.source = source.to_string();
            Ok(())
        })
    }

    pub fn remove_equation(&mut self, id: AnnotationId) -> bool {
        self.edit(|doc| doc.annotations.equations.remove(id))
    }

    fn add_entity(&mut self, add: impl FnOnce(&mut Self) -> AnnotationId) -> AnnotationId {
        let mut id = 0;
        self.edit(|doc| {
            id = add(doc);
            true
        });
        id
    }

    /// Select the text a hyperlink covers
    pub fn select_hyperlink(&mut self, id: AnnotationId) -> bool {
        let Some(range) = self.annotations.hyperlinks.get(id).map(|link| link.range()) else {
            return false;
        };
        let anchor = self.position_of(range.start);
        let active = self.position_of(range.end);
        self.selection = Some(Selection { anchor, active });
        self.caret = active;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::annotations::{AnnotationError, CellPos, Shape, ShapeKind, TableError};
    use crate::editing::{Document, Position};
    use crate::tests::doc_with_caret;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejected_annotation_is_not_an_edit() {
        let mut doc = Document::from_text("Hello World");

        let result = doc.add_hyperlink(6, 40, "https://example.com", None);

        assert!(matches!(result, Err(AnnotationError::OffsetOutOfRange { .. })));
        assert_eq!(doc.version(), 0);
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_link_selection() {
        let mut doc = doc_with_caret("Hello World", Position::new(0, 11));
        doc.set_selection_anchor(Position::new(0, 6));
        doc.update_selection_to_caret();

        let id = doc.link_selection("https://world", None).unwrap();

        assert_eq!(doc.annotations().hyperlinks.get(id).map(|link| link.range()), Some(6..11));
    }

    #[test]
    fn test_link_selection_without_selection_is_rejected() {
        let mut doc = doc_with_caret("Hello", Position::new(0, 2));
        assert_eq!(
            doc.link_selection("https://a", None),
            Err(AnnotationError::InvalidRange { start: 2, end: 2 })
        );
    }

    #[test]
    fn test_go_to_bookmark_moves_caret() {
        let mut doc = Document::from_text("first\nsecond line");
        doc.add_bookmark("second", 9).unwrap();
        doc.select_all();

        assert!(doc.go_to_bookmark("second"));
        assert_eq!(doc.caret(), Position::new(1, 3));
        assert!(!doc.has_selection());
        assert!(!doc.go_to_bookmark("missing"));
    }

    #[test]
    fn test_annotation_add_is_undoable() {
        let mut doc = Document::from_text("Hello");
        let id = doc.add_footnote(5, "a note").unwrap();

        assert!(doc.undo());
        assert!(doc.annotations().footnotes.get(id).is_none());

        assert!(doc.redo());
        assert_eq!(
            doc.annotations().footnotes.get(id).map(|note| note.text.as_str()),
            Some("a note")
        );
    }

    #[test]
    fn test_table_is_anchored_at_caret() {
        let mut doc = doc_with_caret("a\nb\nc", Position::new(1, 1));

        let id = doc.insert_table(2, 3);

        let table = doc.annotations().tables.get(id).unwrap();
        assert_eq!((table.line, table.column), (1, 1));
        assert_eq!((table.grid.rows(), table.grid.cols()), (2, 3));
    }

    #[test]
    fn test_failed_table_edit_keeps_grid() {
        let mut doc = Document::new();
        let id = doc.insert_table(1, 1);
        let version = doc.version();

        let result = doc.edit_table(id, |grid| grid.delete_row(0));

        assert_eq!(result, Err(TableError::LastRow));
        assert_eq!(doc.version(), version);
        assert_eq!(
            doc.edit_table(99, |grid| grid.set_cell_text(CellPos::new(0, 0), "x")),
            Err(TableError::UnknownTable(99))
        );
    }

    #[test]
    fn test_table_edit_without_cell_changes_is_not_an_edit() {
        // Given a table with some text
        let mut doc = Document::new();
        let id = doc.insert_table(2, 2);
        doc.edit_table(id, |grid| grid.set_cell_text(CellPos::new(0, 0), "a"))
            .unwrap();
        let version = doc.version();

        // When an edit rewrites the same text and only moves the cursor
        doc.edit_table(id, |grid| grid.set_cell_text(CellPos::new(0, 0), "a"))
            .unwrap();
        doc.edit_table(id, |grid| grid.set_current_cell(CellPos::new(1, 1)))
            .unwrap();

        // Then nothing is recorded but the cursor still moved
        assert_eq!(doc.version(), version);
        let grid = &doc.annotations().tables.get(id).unwrap().grid;
        assert_eq!(grid.current_cell(), CellPos::new(1, 1));

        // And one undo reverts the real text edit
        assert!(doc.undo());
        let grid = &doc.annotations().tables.get(id).unwrap().grid;
        assert_eq!(grid.cell(CellPos::new(0, 0)).unwrap().text, "");
    }

    #[test]
    fn test_table_cell_navigation_is_not_an_edit() {
        let mut doc = Document::new();
        let id = doc.insert_table(1, 2);
        let version = doc.version();

        assert_eq!(doc.table_next_cell(id), Ok(CellPos::new(0, 1)));
        assert_eq!(doc.table_prev_cell(id), Ok(CellPos::new(0, 0)));
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_drawing_shapes_and_equation_source() {
        let mut doc = Document::new();
        let drawing = doc.insert_drawing(200.0, 100.0);
        let equation = doc.insert_equation("E = mc^2");

        doc.add_shape(drawing, Shape::new(ShapeKind::Line, vec![(0.0, 0.0), (10.0, 10.0)]))
            .unwrap();
        doc.set_equation_source(equation, "a^2 + b^2 = c^2").unwrap();

        assert_eq!(doc.annotations().drawings.get(drawing).map(|d| d.shapes.len()), Some(1));
        assert_eq!(
            doc.annotations().equations.get(equation).map(|e| e.source.as_str()),
            Some("a^2 + b^2 = c^2")
        );
        assert_eq!(
            doc.add_shape(42, Shape::new(ShapeKind::Ellipse, vec![])),
            Err(AnnotationError::UnknownId(42))
        );
    }

    #[test]
    fn test_image_follows_line_breaks_above_it() {
        let mut doc = doc_with_caret("a\nb", Position::new(1, 0));
        let image = doc.insert_image("photo.png", 32.0, 32.0);

        doc.set_caret(Position::new(0, 1));
        doc.new_line();

        assert_eq!(doc.annotations().images.get(image).map(|i| i.line), Some(2));
    }
}
