use crate::editing::Document;
use crate::editing::navigation::is_word_char;

/// Counts shown in the word count dialog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub words: usize,
    /// Characters excluding line breaks
    pub characters: usize,
    pub characters_without_spaces: usize,
    pub lines: usize,
    /// Lines with any non-whitespace content
    pub paragraphs: usize,
}

impl Document {
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            lines: self.lines.line_count(),
            ..Statistics::default()
        };

        for line in self.lines.lines() {
            let mut in_word = false;
            for c in line.chars() {
                stats.characters += 1;
                if !c.is_whitespace() {
                    stats.characters_without_spaces += 1;
                }
                let word = is_word_char(c);
                if word && !in_word {
                    stats.words += 1;
                }
                in_word = word;
            }
            if !line.trim().is_empty() {
                stats.paragraphs += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics() {
        let doc = Document::from_text("Hello, world!\n\n  snake_case  and  more\n");

        assert_eq!(
            doc.statistics(),
            Statistics {
                words: 5,
                characters: 36,
                characters_without_spaces: 29,
                lines: 4,
                paragraphs: 2,
            }
        );
    }

    #[test]
    fn test_empty_document_statistics() {
        let stats = Document::new().statistics();
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.paragraphs, 0);
    }
}
