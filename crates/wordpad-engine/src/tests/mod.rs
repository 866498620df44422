use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::editing::{Document, Position};

/// Document with `text` and the caret already placed
pub fn doc_with_caret(text: &str, caret: Position) -> Document {
    let mut doc = Document::from_text(text);
    doc.set_caret(caret);
    doc
}

/// Create a temporary directory for document files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Write a test file with raw content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}
