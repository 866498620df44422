//! Tables: a line-anchored entity wrapping a rectangular cell grid.
//!
//! Cells live in one row-major `Vec`. Merged cells point back at their master
//! by `(row, col)` rather than by reference, so row and column edits only need
//! to re-derive the merge flags from the surviving masters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationId, LineAnchored};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub text: String,
    pub row_span: usize,
    pub col_span: usize,
    /// Covered by a merged region whose master is `master`
    pub is_merged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<CellPos>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            text: String::new(),
            row_span: 1,
            col_span: 1,
            is_merged: false,
            master: None,
        }
    }
}

impl TableCell {
    /// Top-left cell of a merged region
    pub fn is_master(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} table")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("cannot delete the last row of a table")]
    LastRow,
    #[error("cannot delete the last column of a table")]
    LastColumn,
    #[error("cells {top_left}..{bottom_right} cannot be merged")]
    InvalidMerge {
        top_left: CellPos,
        bottom_right: CellPos,
    },
    #[error("cell {0} is not part of a merged region")]
    NotMerged(CellPos),
    #[error("no table with id {0}")]
    UnknownTable(AnnotationId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    rows: usize,
    cols: usize,
    cells: Vec<TableCell>,
    #[serde(skip)]
    current: CellPos,
}

impl TableGrid {
    /// Empty grid; both dimensions are at least 1
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cells: vec![TableCell::default(); rows * cols],
            current: CellPos::default(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, pos: CellPos) -> Result<usize, TableError> {
        if pos.row < self.rows && pos.col < self.cols {
            Ok(pos.row * self.cols + pos.col)
        } else {
            Err(TableError::OutOfRange {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn pos_of(&self, index: usize) -> CellPos {
        CellPos::new(index / self.cols, index % self.cols)
    }

    pub fn cell(&self, pos: CellPos) -> Result<&TableCell, TableError> {
        let index = self.index(pos)?;
        Ok(&self.cells[index])
    }

    pub fn cell_mut(&mut self, pos: CellPos) -> Result<&mut TableCell, TableError> {
        let index = self.index(pos)?;
        Ok(&mut self.cells[index])
    }

    /// Master of the region covering `pos`, or `pos` itself
    pub fn master_of(&self, pos: CellPos) -> Result<CellPos, TableError> {
        let cell = self.cell(pos)?;
        Ok(match (cell.is_merged, cell.master) {
            (true, Some(master)) => master,
            _ => pos,
        })
    }

    /// Text of a covered cell is written to its master
    pub fn set_cell_text(&mut self, pos: CellPos, text: &str) -> Result<(), TableError> {
        let master = self.master_of(pos)?;
        self.cell_mut(master)?.text = text.to_string();
        Ok(())
    }

    pub fn current_cell(&self) -> CellPos {
        self.current
    }

    /// Same size and cell contents, ignoring the cell cursor
    pub(crate) fn same_cells(&self, other: &TableGrid) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }

    pub fn set_current_cell(&mut self, pos: CellPos) -> Result<(), TableError> {
        self.current = self.master_of(pos)?;
        Ok(())
    }

    /// Insert an empty row before `at` (clamped to the row count)
    pub fn insert_row(&mut self, at: usize) {
        let at = at.min(self.rows);
        self.split_regions_where(|master, cell| master.row < at && at < master.row + cell.row_span);

        let index = at * self.cols;
        self.cells.splice(
            index..index,
            std::iter::repeat_with(TableCell::default).take(self.cols),
        );
        self.rows += 1;
        if self.current.row >= at {
            self.current.row += 1;
        }
        self.after_structural_edit();
    }

    /// Insert an empty column before `at` (clamped to the column count)
    pub fn insert_column(&mut self, at: usize) {
        let at = at.min(self.cols);
        self.split_regions_where(|master, cell| master.col < at && at < master.col + cell.col_span);

        for row in (0..self.rows).rev() {
            self.cells.insert(row * self.cols + at, TableCell::default());
        }
        self.cols += 1;
        if self.current.col >= at {
            self.current.col += 1;
        }
        self.after_structural_edit();
    }

    pub fn delete_row(&mut self, at: usize) -> Result<(), TableError> {
        self.index(CellPos::new(at, 0))?;
        if self.rows == 1 {
            return Err(TableError::LastRow);
        }
        self.split_regions_where(|master, cell| {
            master.row <= at && at < master.row + cell.row_span
        });

        let start = at * self.cols;
        self.cells.drain(start..start + self.cols);
        self.rows -= 1;
        if self.current.row > at {
            self.current.row -= 1;
        }
        self.current.row = self.current.row.min(self.rows - 1);
        self.after_structural_edit();
        Ok(())
    }

    pub fn delete_column(&mut self, at: usize) -> Result<(), TableError> {
        self.index(CellPos::new(0, at))?;
        if self.cols == 1 {
            return Err(TableError::LastColumn);
        }
        self.split_regions_where(|master, cell| {
            master.col <= at && at < master.col + cell.col_span
        });

        for row in (0..self.rows).rev() {
            self.cells.remove(row * self.cols + at);
        }
        self.cols -= 1;
        if self.current.col > at {
            self.current.col -= 1;
        }
        self.current.col = self.current.col.min(self.cols - 1);
        self.after_structural_edit();
        Ok(())
    }

    /// Whether the rectangle `top_left..=bottom_right` can become one merged cell.
    ///
    /// Every cell inside must be a plain 1x1 cell, so no existing region can
    /// stick out of the rectangle.
    pub fn can_merge(&self, top_left: CellPos, bottom_right: CellPos) -> bool {
        if self.index(top_left).is_err() || self.index(bottom_right).is_err() {
            return false;
        }
        if top_left.row > bottom_right.row
            || top_left.col > bottom_right.col
            || top_left == bottom_right
        {
            return false;
        }

        (top_left.row..=bottom_right.row).all(|row| {
            (top_left.col..=bottom_right.col).all(|col| {
                let cell = &self.cells[row * self.cols + col];
                !cell.is_merged && !cell.is_master()
            })
        })
    }

    pub fn merge(&mut self, top_left: CellPos, bottom_right: CellPos) -> Result<(), TableError> {
        if !self.can_merge(top_left, bottom_right) {
            return Err(TableError::InvalidMerge {
                top_left,
                bottom_right,
            });
        }

        let mut parts = Vec::new();
        for row in top_left.row..=bottom_right.row {
            for col in top_left.col..=bottom_right.col {
                let pos = CellPos::new(row, col);
                let cell = &mut self.cells[row * self.cols + col];
                let text = std::mem::take(&mut cell.text);
                if !text.is_empty() {
                    parts.push(text);
                }
                if pos != top_left {
                    cell.is_merged = true;
                    cell.master = Some(top_left);
                }
            }
        }

        let master = &mut self.cells[top_left.row * self.cols + top_left.col];
        master.text = parts.join(" ");
        master.row_span = bottom_right.row - top_left.row + 1;
        master.col_span = bottom_right.col - top_left.col + 1;

        let current = self.current;
        if (top_left.row..=bottom_right.row).contains(&current.row)
            && (top_left.col..=bottom_right.col).contains(&current.col)
        {
            self.current = top_left;
        }
        Ok(())
    }

    /// Undo a merge; `pos` may be the master or any cell it covers
    pub fn split(&mut self, pos: CellPos) -> Result<(), TableError> {
        let master = self.master_of(pos)?;
        if !self.cell(master)?.is_master() {
            return Err(TableError::NotMerged(pos));
        }
        self.reset_region(master);
        Ok(())
    }

    /// Tab: advance past the current cell's span, wrapping rows and the table end
    pub fn move_to_next_cell(&mut self) -> CellPos {
        let total = self.cells.len();
        let current = self.current.row * self.cols + self.current.col;
        let mut index = (current + self.cells[current].col_span.max(1)) % total;
        for _ in 0..total {
            if !self.cells[index].is_merged {
                break;
            }
            index = (index + 1) % total;
        }
        self.current = self.pos_of(index);
        self.current
    }

    /// Shift+Tab: step back one cell, landing on masters instead of covered cells
    pub fn move_to_prev_cell(&mut self) -> CellPos {
        let total = self.cells.len();
        let mut index = self.current.row * self.cols + self.current.col;
        for _ in 0..total {
            index = (index + total - 1) % total;
            let cell = &self.cells[index];
            let target = match (cell.is_merged, cell.master) {
                (true, Some(master)) => master,
                _ => self.pos_of(index),
            };
            if target != self.current {
                self.current = target;
                break;
            }
        }
        self.current
    }

    /// Rows of cell text, covered cells reading as empty
    pub fn text_rows(&self) -> Vec<Vec<&str>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.text.as_str()).collect())
            .collect()
    }

    /// Fix up a grid read from disk: spans and merge flags.
    ///
    /// Returns false when `rows * cols` does not match the stored cells.
    pub(crate) fn repair(&mut self) -> bool {
        let fits = self
            .rows
            .checked_mul(self.cols)
            .is_some_and(|count| count == self.cells.len());
        if !fits || self.cells.is_empty() {
            return false;
        }
        for index in 0..self.cells.len() {
            let pos = self.pos_of(index);
            let (rows_left, cols_left) = (self.rows - pos.row, self.cols - pos.col);
            let cell = &mut self.cells[index];
            cell.row_span = cell.row_span.clamp(1, rows_left);
            cell.col_span = cell.col_span.clamp(1, cols_left);
        }
        self.current = CellPos::default();
        self.rebuild_merge_info();
        true
    }

    fn split_regions_where(&mut self, crosses: impl Fn(CellPos, &TableCell) -> bool) {
        let masters: Vec<CellPos> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(index, cell)| cell.is_master() && crosses(self.pos_of(*index), cell))
            .map(|(index, _)| self.pos_of(index))
            .collect();
        for master in masters {
            self.reset_region(master);
        }
    }

    fn reset_region(&mut self, master: CellPos) {
        let index = master.row * self.cols + master.col;
        let row_end = master.row.saturating_add(self.cells[index].row_span).min(self.rows);
        let col_end = master.col.saturating_add(self.cells[index].col_span).min(self.cols);
        for row in master.row..row_end {
            for col in master.col..col_end {
                let cell = &mut self.cells[row * self.cols + col];
                cell.is_merged = false;
                cell.master = None;
            }
        }
        let cell = &mut self.cells[index];
        cell.row_span = 1;
        cell.col_span = 1;
    }

    fn after_structural_edit(&mut self) {
        self.rebuild_merge_info();
        let current = self.current;
        self.current = self.master_of(current).unwrap_or_default();
    }

    /// Re-derive `is_merged`/`master` from the spans of the masters
    fn rebuild_merge_info(&mut self) {
        for cell in &mut self.cells {
            cell.is_merged = false;
            cell.master = None;
        }
        for index in 0..self.cells.len() {
            if !self.cells[index].is_master() {
                continue;
            }
            let master = self.pos_of(index);
            let row_end = master.row.saturating_add(self.cells[index].row_span).min(self.rows);
            let col_end = master.col.saturating_add(self.cells[index].col_span).min(self.cols);
            self.cells[index].row_span = row_end - master.row;
            self.cells[index].col_span = col_end - master.col;

            for row in master.row..row_end {
                for col in master.col..col_end {
                    if (row, col) == (master.row, master.col) {
                        continue;
                    }
                    let cell = &mut self.cells[row * self.cols + col];
                    cell.is_merged = true;
                    cell.master = Some(master);
                }
            }
        }
    }
}

/// A table anchored at `line`/`column` of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: AnnotationId,
    pub line: usize,
    #[serde(default)]
    pub column: usize,
    pub grid: TableGrid,
}

impl Table {
    /// Unsaved table; the collection assigns the id
    pub fn new(line: usize, column: usize, rows: usize, cols: usize) -> Self {
        Self {
            id: 0,
            line,
            column,
            grid: TableGrid::new(rows, cols),
        }
    }
}

impl LineAnchored for Table {
    fn id(&self) -> AnnotationId {
        self.id
    }

    fn set_id(&mut self, id: AnnotationId) {
        self.id = id;
    }

    fn line(&self) -> usize {
        self.line
    }

    fn set_line(&mut self, line: usize) {
        self.line = line;
    }
}
