pub mod annotations;
pub mod editing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use annotations::{AnnotationError, AnnotationId, Annotations, CellPos, TableError, TableGrid};
pub use editing::{
    Cmd, Document, EditorOptions, Keymap, OutlineEntry, ParagraphStyle, Patch, Position,
    SearchOptions, Statistics, TextStyle,
};
pub use io::{DocumentFile, IoError, LoadOutcome, load_document, save_document};
pub use models::{PageLayout, PageMode};
