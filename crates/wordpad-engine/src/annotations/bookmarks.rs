use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationError, AnnotationId, Change, IdAllocator};

/// Named position in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: AnnotationId,
    pub name: String,
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bookmarks {
    marks: Vec<Bookmark>,
    ids: IdAllocator,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names are trimmed and must be unique within the document
    pub fn add(
        &mut self,
        name: &str,
        offset: usize,
        doc_len: usize,
    ) -> Result<AnnotationId, AnnotationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AnnotationError::EmptyName);
        }
        if offset > doc_len {
            return Err(AnnotationError::OffsetOutOfRange {
                offset,
                len: doc_len,
            });
        }
        if self.find(name).is_some() {
            return Err(AnnotationError::DuplicateName(name.to_string()));
        }

        let id = self.ids.allocate();
        self.marks.push(Bookmark {
            id,
            name: name.to_string(),
            offset,
        });
        Ok(id)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Bookmark> {
        self.marks.iter().find(|mark| mark.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&Bookmark> {
        self.marks.iter().find(|mark| mark.name == name)
    }

    pub fn at(&self, offset: usize) -> Option<&Bookmark> {
        self.marks.iter().find(|mark| mark.offset == offset)
    }

    pub fn in_range(&self, range: Range<usize>) -> impl Iterator<Item = &Bookmark> {
        self.marks
            .iter()
            .filter(move |mark| range.contains(&mark.offset))
    }

    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.marks.len();
        self.marks.retain(|mark| mark.id != id);
        self.marks.len() != before
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Replace the contents with loaded bookmarks; offsets are clamped to `doc_len`
    pub fn load(&mut self, marks: Vec<Bookmark>, doc_len: usize) {
        self.marks.clear();
        for mut mark in marks {
            self.ids.reserve_through(mark.id);
            if mark.name.trim().is_empty() || self.find(&mark.name).is_some() {
                continue;
            }
            mark.offset = mark.offset.min(doc_len);
            self.marks.push(mark);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bookmark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn rebase(&mut self, change: &Change) {
        self.marks
            .retain_mut(|mark| match change.shift_offset(mark.offset) {
                Some(offset) => {
                    mark.offset = offset;
                    true
                }
                None => false,
            });
    }

    pub(crate) fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }
}

impl<'a> IntoIterator for &'a Bookmarks {
    type Item = &'a Bookmark;
    type IntoIter = std::slice::Iter<'a, Bookmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}
