use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationError, AnnotationId, Change, IdAllocator};

/// Footnote reference at `offset` with its note text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    pub id: AnnotationId,
    pub offset: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Footnotes {
    notes: Vec<Footnote>,
    ids: IdAllocator,
}

impl Footnotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        offset: usize,
        text: &str,
        doc_len: usize,
    ) -> Result<AnnotationId, AnnotationError> {
        if text.trim().is_empty() {
            return Err(AnnotationError::EmptyNote);
        }
        if offset > doc_len {
            return Err(AnnotationError::OffsetOutOfRange {
                offset,
                len: doc_len,
            });
        }

        let id = self.ids.allocate();
        self.notes.push(Footnote {
            id,
            offset,
            text: text.to_string(),
        });
        Ok(id)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Footnote> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn at(&self, offset: usize) -> Option<&Footnote> {
        self.notes.iter().find(|note| note.offset == offset)
    }

    pub fn in_range(&self, range: Range<usize>) -> impl Iterator<Item = &Footnote> {
        self.notes
            .iter()
            .filter(move |note| range.contains(&note.offset))
    }

    pub fn set_text(&mut self, id: AnnotationId, text: &str) -> Result<(), AnnotationError> {
        if text.trim().is_empty() {
            return Err(AnnotationError::EmptyNote);
        }
        let note = self
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(AnnotationError::UnknownId(id))?;
        note.text = text.to_string();
        Ok(())
    }

    /// Notes in reading order; ties keep insertion order
    pub fn ordered(&self) -> Vec<&Footnote> {
        let mut notes: Vec<&Footnote> = self.notes.iter().collect();
        notes.sort_by_key(|note| note.offset);
        notes
    }

    /// 1-based display number of a note
    pub fn number_of(&self, id: AnnotationId) -> Option<usize> {
        self.ordered()
            .iter()
            .position(|note| note.id == id)
            .map(|index| index + 1)
    }

    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        self.notes.len() != before
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn load(&mut self, notes: Vec<Footnote>, doc_len: usize) {
        self.notes.clear();
        for mut note in notes {
            self.ids.reserve_through(note.id);
            if note.text.trim().is_empty() {
                continue;
            }
            note.offset = note.offset.min(doc_len);
            self.notes.push(note);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Footnote> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn rebase(&mut self, change: &Change) {
        self.notes
            .retain_mut(|note| match change.shift_offset(note.offset) {
                Some(offset) => {
                    note.offset = offset;
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

impl<'a> IntoIterator for &'a Footnotes {
    type Item = &'a Footnote;
    type IntoIter = std::slice::Iter<'a, Footnote>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_follow_document_order() {
        let mut notes = Footnotes::new();
        let late = notes.add(30, "second in text", 40).unwrap();
        let early = notes.add(4, "first in text", 40).unwrap();

        assert_eq!(notes.number_of(early), Some(1));
        assert_eq!(notes.number_of(late), Some(2));
        assert_eq!(notes.number_of(99), None);
    }

    #[test]
    fn test_empty_note_is_rejected() {
        let mut notes = Footnotes::new();
        assert_eq!(notes.add(0, " ", 5), Err(AnnotationError::EmptyNote));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_load_skips_empty_notes() {
        let mut notes = Footnotes::new();

        notes.load(
            vec![
                Footnote { id: 1, offset: 2, text: "kept".into() },
                Footnote { id: 4, offset: 3, text: "  ".into() },
            ],
            10,
        );

        assert_eq!(notes.len(), 1);
        assert!(notes.get(4).is_none());
        assert_eq!(notes.add(0, "next", 10), Ok(5));
    }

    #[test]
    fn test_set_text() {
        let mut notes = Footnotes::new();
        let id = notes.add(0, "draft", 5).unwrap();

        notes.set_text(id, "final").unwrap();

        assert_eq!(notes.get(id).map(|note| note.text.as_str()), Some("final"));
        assert_eq!(
            notes.set_text(42, "x"),
            Err(AnnotationError::UnknownId(42))
        );
    }
}
