//! Document file format seen from outside the crate

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wordpad_engine::editing::{Document, EditorOptions, ParagraphStyle, Position};
use wordpad_engine::io::{
    DocumentFile, FORMAT_VERSION, IoError, load_document, read_plain_text, save_document,
    write_plain_text,
};
use wordpad_engine::models::{PageLayout, PageMode};

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_malformed_json_imports_raw_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let raw = r#"{"version":1,"text":"trunc"#;
    let path = write(&dir, "doc.wpd", raw);

    let outcome = load_document(&path, &EditorOptions::default()).unwrap();

    assert!(outcome.used_fallback);
    assert_eq!(outcome.document.text(), raw);
}

#[test]
fn test_missing_text_field_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let raw = r#"{"version":2}"#;
    let path = write(&dir, "doc.wpd", raw);

    let outcome = load_document(&path, &EditorOptions::default()).unwrap();

    assert!(outcome.used_fallback);
    assert_eq!(outcome.document.text(), raw);
}

#[test]
fn test_saved_file_uses_camel_case_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.wpd");
    let mut doc = Document::from_text("Heading\nbody");
    doc.set_paragraph_style(0, ParagraphStyle::Heading1);
    doc.set_font_size(14);
    doc.set_page_layout(PageLayout {
        mode: PageMode::Paged,
        ..PageLayout::default()
    });

    save_document(&doc, &path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["version"], FORMAT_VERSION);
    assert_eq!(json["text"], "Heading\nbody");
    assert_eq!(json["style"]["fontSize"], 14);
    assert_eq!(json["pageLayout"]["mode"], "Paged");
    assert_eq!(json["pageLayout"]["pageWidth"], 816);
    assert_eq!(json["paragraphStyles"][0], "Heading1");
}

#[test]
fn test_round_trip_keeps_layout_and_styles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.wpd");
    let mut doc = Document::from_text("Title\ntext");
    doc.set_paragraph_style(0, ParagraphStyle::Title);
    doc.toggle_bold();
    doc.set_page_layout(PageLayout {
        margin: 48,
        line_width_limit: 600,
        ..PageLayout::default()
    });

    save_document(&doc, &path).unwrap();
    let loaded = load_document(&path, &EditorOptions::default()).unwrap().document;

    assert_eq!(loaded.paragraph_styles(), doc.paragraph_styles());
    assert_eq!(loaded.text_style(), doc.text_style());
    assert_eq!(loaded.page_layout(), doc.page_layout());
}

#[test]
fn test_options_apply_to_loaded_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "doc.wpd", r#"{"version":2,"text":"abc"}"#);
    let options = EditorOptions {
        undo_limit: 1,
        ..EditorOptions::default()
    };

    let mut doc = load_document(&path, &options).unwrap().document;
    doc.set_caret(Position::new(0, 3));
    doc.insert_char('d');
    doc.insert_char('e');

    assert!(doc.undo());
    assert!(!doc.undo());
    assert_eq!(doc.text(), "abcd");
}

#[test]
fn test_document_file_round_trip_through_serde() {
    let mut doc = Document::from_text("Hello World");
    doc.add_hyperlink(0, 5, "https://hello", None).unwrap();

    let json = serde_json::to_string(&DocumentFile::from_document(&doc)).unwrap();
    let file: DocumentFile = serde_json::from_str(&json).unwrap();
    let restored = file.into_document(&EditorOptions::default());

    assert_eq!(restored.text(), "Hello World");
    assert_eq!(restored.annotations(), doc.annotations());
}

#[test]
fn test_plain_text_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.txt");
    let doc = Document::from_text("first\nsecond");

    write_plain_text(&doc, &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond");
    let read = read_plain_text(&path, &EditorOptions::default()).unwrap();
    assert_eq!(read.lines(), ["first", "second"]);
    assert!(matches!(
        read_plain_text(&dir.path().join("missing.txt"), &EditorOptions::default()),
        Err(IoError::NotFound(_))
    ));
}
