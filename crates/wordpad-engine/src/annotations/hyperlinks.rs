use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationError, AnnotationId, Change, IdAllocator};

/// Link over the character range `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    pub id: AnnotationId,
    pub start: usize,
    pub end: usize,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Hyperlink {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.range().contains(&offset)
    }

    fn overlaps(&self, range: &Range<usize>) -> bool {
        self.start < range.end && range.start < self.end
    }
}

/// Hyperlinks of a document. At most one link covers any offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hyperlinks {
    links: Vec<Hyperlink>,
    ids: IdAllocator,
}

impl Hyperlinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link over `range` in a document of `doc_len` characters.
    ///
    /// Links overlapping the new range are replaced by it.
    pub fn add(
        &mut self,
        range: Range<usize>,
        url: &str,
        tooltip: Option<String>,
        doc_len: usize,
    ) -> Result<AnnotationId, AnnotationError> {
        if url.trim().is_empty() {
            return Err(AnnotationError::EmptyUrl);
        }
        if range.start >= range.end {
            return Err(AnnotationError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > doc_len {
            return Err(AnnotationError::OffsetOutOfRange {
                offset: range.end,
                len: doc_len,
            });
        }

        self.links.retain(|link| !link.overlaps(&range));
        let id = self.ids.allocate();
        self.links.push(Hyperlink {
            id,
            start: range.start,
            end: range.end,
            url: url.to_string(),
            tooltip,
        });
        Ok(id)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Hyperlink> {
        self.links.iter().find(|link| link.id == id)
    }

    /// Link covering `offset`
    pub fn at(&self, offset: usize) -> Option<&Hyperlink> {
        self.links.iter().find(|link| link.contains(offset))
    }

    /// Links overlapping `range`, in insertion order
    pub fn in_range(&self, range: Range<usize>) -> impl Iterator<Item = &Hyperlink> {
        self.links.iter().filter(move |link| link.overlaps(&range))
    }

    pub fn set_url(&mut self, id: AnnotationId, url: &str) -> Result<(), AnnotationError> {
        if url.trim().is_empty() {
            return Err(AnnotationError::EmptyUrl);
        }
        let link = self
            .links
            .iter_mut()
            .find(|link| link.id == id)
            .ok_or(AnnotationError::UnknownId(id))?;
        link.url = url.to_string();
        Ok(())
    }

    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.links.len();
        self.links.retain(|link| link.id != id);
        self.links.len() != before
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// Replace the contents with loaded links, dropping any that do not fit `doc_len`
    pub fn load(&mut self, links: Vec<Hyperlink>, doc_len: usize) {
        self.links.clear();
        for link in links {
            self.ids.reserve_through(link.id);
            let fits = link.start < link.end && link.end <= doc_len;
            if fits && !self.links.iter().any(|other| other.overlaps(&link.range())) {
                self.links.push(link);
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hyperlink> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn rebase(&mut self, change: &Change) {
        self.links.retain_mut(|link| match change.shift_range(&link.range()) {
            Some(range) => {
                link.start = range.start;
                link.end = range.end;
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

impl<'a> IntoIterator for &'a Hyperlinks {
    type Item = &'a Hyperlink;
    type IntoIter = std::slice::Iter<'a, Hyperlink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}
