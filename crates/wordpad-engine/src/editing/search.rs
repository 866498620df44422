use regex::{Regex, RegexBuilder};

use crate::editing::{Document, Selection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    /// Treat the query as a regular expression instead of literal text
    pub regex: bool,
}

/// A match as character offsets `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

fn build_regex(query: &str, options: SearchOptions) -> Result<Regex, SearchError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    let pattern = if options.whole_word {
        format!(r"\b(?:{pattern})\b")
    } else {
        pattern
    };
    Ok(RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()?)
}

/// Converts increasing byte offsets into character offsets in one pass
struct CharCounter<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCounter<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn advance_to(&mut self, byte: usize) -> usize {
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

impl Document {
    /// All non-empty matches, in document order
    pub fn find(&self, query: &str, options: SearchOptions) -> Result<Vec<Match>, SearchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let regex = build_regex(query, options)?;
        let text = self.text();
        let mut counter = CharCounter::new(&text);
        Ok(regex
            .find_iter(&text)
            .filter(|found| !found.is_empty())
            .map(|found| Match {
                start: counter.advance_to(found.start()),
                end: counter.advance_to(found.end()),
            })
            .collect())
    }

    /// Select the first match after the caret (or current selection), wrapping to the top
    pub fn find_next(&mut self, query: &str, options: SearchOptions) -> Result<Option<Match>, SearchError> {
        let matches = self.find(query, options)?;
        let from = self.offset_of(self.selection_end());
        let Some(found) = matches
            .iter()
            .find(|found| found.start >= from)
            .or_else(|| matches.first())
            .copied()
        else {
            return Ok(None);
        };

        let anchor = self.position_of(found.start);
        let active = self.position_of(found.end);
        self.selection = Some(Selection { anchor, active });
        self.caret = active;
        Ok(Some(found))
    }

    /// Replace every match as a single undo step; returns the number replaced.
    ///
    /// In regex mode `$1`/`${name}` in the replacement expand to capture groups.
    pub fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        options: SearchOptions,
    ) -> Result<usize, SearchError> {
        if query.is_empty() {
            return Ok(0);
        }
        let regex = build_regex(query, options)?;
        let text = self.text();
        let mut counter = CharCounter::new(&text);
        let mut edits = Vec::new();
        for captures in regex.captures_iter(&text) {
            let Some(found) = captures.get(0) else {
                continue;
            };
            if found.is_empty() {
                continue;
            }
            let with = if options.regex {
                let mut expanded = String::new();
                captures.expand(replacement, &mut expanded);
                expanded
            } else {
                replacement.to_string()
            };
            let start = counter.advance_to(found.start());
            let end = counter.advance_to(found.end());
            edits.push((start, end, with));
        }

        if edits.is_empty() {
            return Ok(0);
        }
        let count = edits.len();
        self.edit(|doc| {
            for (start, end, with) in edits.iter().rev() {
                let start = doc.lines.position_of(*start);
                let end = doc.lines.position_of(*end);
                doc.remove_between(start, end);
                doc.insert_at(start, with);
            }
            doc.selection = None;
            doc.caret = doc.lines.clamp(doc.caret);
            true
        });
        Ok(count)
    }
}
