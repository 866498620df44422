//! Position-anchored document overlays.
//!
//! Every collection here is bound to the line store through anchors:
//!
//! - **offset anchored**: hyperlinks (`[start, end)`), bookmarks and footnotes
//!   (a single character offset)
//! - **line anchored**: tables, images, drawings and equations
//!
//! Edits never touch these collections directly. The document describes each
//! text mutation as a [`Change`] and hands it to [`Annotations::rebase`], which
//! fans it out to every set. Each set applies the same rules:
//!
//! - anchors at or after an insertion point move right by the inserted length
//! - anchors after a deleted range move left by the deleted length
//! - single offsets inside a deleted range are dropped
//! - hyperlinks grow when text is typed strictly inside them, shrink when
//!   partially deleted and disappear when fully deleted
//! - line anchors move by the net line delta and never drop below line 0
//!
//! Ids are collection-local, start at 1 and are never handed out twice in a
//! session, even after removal, `clear` or undo.

pub mod bookmarks;
pub mod footnotes;
pub mod hyperlinks;
pub mod media;
pub mod table;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::editing::Position;

pub use bookmarks::{Bookmark, Bookmarks};
pub use footnotes::{Footnote, Footnotes};
pub use hyperlinks::{Hyperlink, Hyperlinks};
pub use media::{Drawing, Equation, Image, Shape, ShapeKind};
pub use table::{CellPos, Table, TableCell, TableError, TableGrid};

/// Collection-local identifier
pub type AnnotationId = u32;

/// Reasons an annotation mutation is rejected. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("bookmark name must not be empty")]
    EmptyName,
    #[error("a bookmark named {0:?} already exists")]
    DuplicateName(String),
    #[error("offset {offset} is beyond the end of the document ({len} characters)")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("hyperlink url must not be empty")]
    EmptyUrl,
    #[error("range {start}..{end} is empty or inverted")]
    InvalidRange { start: usize, end: usize },
    #[error("footnote text must not be empty")]
    EmptyNote,
    #[error("no annotation with id {0}")]
    UnknownId(AnnotationId),
}

/// One primitive text mutation, described in both offset and line space
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// `len` characters containing `line_breaks` newlines were inserted at `offset`/`at`
    Inserted {
        offset: usize,
        len: usize,
        at: Position,
        line_breaks: usize,
    },
    /// The characters in `range` (between `start` and `end`) were removed
    Deleted {
        range: Range<usize>,
        start: Position,
        end: Position,
    },
}

impl Change {
    /// Rebase a single-offset anchor; `None` when the anchored character was deleted
    pub fn shift_offset(&self, offset: usize) -> Option<usize> {
        match self {
            Change::Inserted { offset: at, len, .. } => {
                Some(if offset >= *at { offset + len } else { offset })
            }
            Change::Deleted { range, .. } => {
                if offset < range.start {
                    Some(offset)
                } else if offset >= range.end {
                    Some(offset - range.len())
                } else {
                    None
                }
            }
        }
    }

    /// Rebase a `[start, end)` anchor; `None` once nothing of it is left
    pub fn shift_range(&self, anchored: &Range<usize>) -> Option<Range<usize>> {
        match self {
            Change::Inserted { offset, len, .. } => {
                if *offset <= anchored.start {
                    Some(anchored.start + len..anchored.end + len)
                } else if *offset < anchored.end {
                    Some(anchored.start..anchored.end + len)
                } else {
                    Some(anchored.clone())
                }
            }
            Change::Deleted { range, .. } => {
                let removed_before = range.end.min(anchored.start).saturating_sub(range.start);
                let removed_inside = range
                    .end
                    .min(anchored.end)
                    .saturating_sub(range.start.max(anchored.start));
                let start = anchored.start - removed_before;
                let end = anchored.end - removed_before - removed_inside;
                (start < end).then_some(start..end)
            }
        }
    }

    /// Rebase a line anchor by the net line delta of this change
    pub fn shift_line(&self, line: usize) -> usize {
        match self {
            Change::Inserted {
                at, line_breaks, ..
            } => {
                let moves = line > at.row || (line == at.row && at.column == 0);
                if moves { line + line_breaks } else { line }
            }
            Change::Deleted { start, end, .. } => {
                let removed = end.row - start.row;
                if line > end.row {
                    line - removed
                } else if line > start.row {
                    start.row
                } else {
                    line
                }
            }
        }
    }
}

/// Monotonic id source for one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: AnnotationId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn allocate(&mut self) -> AnnotationId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// Make sure ids at or below `id` are never handed out
    pub fn reserve_through(&mut self, id: AnnotationId) {
        self.next = self.next.max(id.saturating_add(1));
    }

    pub fn peek(&self) -> AnnotationId {
        self.next
    }
}

/// An entity bound to a line number (and a column within it)
pub trait LineAnchored {
    fn id(&self) -> AnnotationId;
    fn set_id(&mut self, id: AnnotationId);
    fn line(&self) -> usize;
    fn set_line(&mut self, line: usize);
}

/// Insertion-ordered collection of line anchored entities
#[derive(Debug, Clone, PartialEq)]
pub struct LineAnchoredSet<T> {
    items: Vec<T>,
    ids: IdAllocator,
}

impl<T> Default for LineAnchoredSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            ids: IdAllocator::default(),
        }
    }
}

impl<T: LineAnchored> LineAnchoredSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `item` under a fresh id and return that id
    pub fn add(&mut self, mut item: T) -> AnnotationId {
        let id = self.ids.allocate();
        item.set_id(id);
        self.items.push(item);
        id
    }

    pub fn get(&self, id: AnnotationId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// First entity anchored on `line`, in insertion order
    pub fn at(&self, line: usize) -> Option<&T> {
        self.items.iter().find(|item| item.line() == line)
    }

    pub fn in_range(&self, lines: Range<usize>) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .filter(move |item| lines.contains(&item.line()))
    }

    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the contents with loaded records, keeping their ids
    pub fn load(&mut self, items: Vec<T>) {
        for item in &items {
            self.ids.reserve_through(item.id());
        }
        self.items = items;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn rebase(&mut self, change: &Change) {
        for item in &mut self.items {
            let line = change.shift_line(item.line());
            item.set_line(line);
        }
    }

    /// Keep anchors inside a document of `line_count` lines
    pub(crate) fn clamp_lines(&mut self, line_count: usize) {
        let last = line_count.saturating_sub(1);
        for item in &mut self.items {
            if item.line() > last {
                item.set_line(last);
            }
        }
    }

    pub(crate) fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }
}

impl<'a, T> IntoIterator for &'a LineAnchoredSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Every annotation collection of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub hyperlinks: Hyperlinks,
    pub bookmarks: Bookmarks,
    pub footnotes: Footnotes,
    pub tables: LineAnchoredSet<Table>,
    pub images: LineAnchoredSet<Image>,
    pub drawings: LineAnchoredSet<Drawing>,
    pub equations: LineAnchoredSet<Equation>,
}

impl Annotations {
    /// Propagate one text mutation to every set
    pub fn rebase(&mut self, change: &Change) {
        self.hyperlinks.rebase(change);
        self.bookmarks.rebase(change);
        self.footnotes.rebase(change);
        self.tables.rebase(change);
        self.images.rebase(change);
        self.drawings.rebase(change);
        self.equations.rebase(change);
    }

    /// Empty every set; id counters keep counting
    pub fn clear(&mut self) {
        self.hyperlinks.clear();
        self.bookmarks.clear();
        self.footnotes.clear();
        self.tables.clear();
        self.images.clear();
        self.drawings.clear();
        self.equations.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.hyperlinks.is_empty()
            && self.bookmarks.is_empty()
            && self.footnotes.is_empty()
            && self.tables.is_empty()
            && self.images.is_empty()
            && self.drawings.is_empty()
            && self.equations.is_empty()
    }

    /// Raise every id counter to at least the matching counter in `other`.
    ///
    /// Restoring an older snapshot must not rewind ids that were already issued.
    pub(crate) fn keep_ids_from(&mut self, other: &Annotations) {
        self.hyperlinks
            .ids_mut()
            .reserve_through(other.hyperlinks.ids().peek() - 1);
        self.bookmarks
            .ids_mut()
            .reserve_through(other.bookmarks.ids().peek() - 1);
        self.footnotes
            .ids_mut()
            .reserve_through(other.footnotes.ids().peek() - 1);
        self.tables
            .ids_mut()
            .reserve_through(other.tables.ids().peek() - 1);
        self.images
            .ids_mut()
            .reserve_through(other.images.ids().peek() - 1);
        self.drawings
            .ids_mut()
            .reserve_through(other.drawings.ids().peek() - 1);
        self.equations
            .ids_mut()
            .reserve_through(other.equations.ids().peek() - 1);
    }
}
