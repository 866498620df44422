use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::annotations::{Bookmark, Drawing, Equation, Footnote, Hyperlink, Image, Table};
use crate::editing::{Document, EditorOptions, LineStore, ParagraphStyle, TextStyle};
use crate::models::PageLayout;

/// Newest document format this build reads and the one it writes
pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk JSON shape of a document.
///
/// Only `version` and `text` are required. Version 1 files carry neither
/// paragraph styles nor annotations and load through the same struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub version: u32,
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_layout: Option<PageLayout>,
    #[serde(default)]
    pub paragraph_styles: Vec<ParagraphStyle>,
    #[serde(default)]
    pub hyperlinks: Vec<Hyperlink>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub drawings: Vec<Drawing>,
    #[serde(default)]
    pub equations: Vec<Equation>,
}

impl DocumentFile {
    pub fn from_document(doc: &Document) -> Self {
        let annotations = doc.annotations();
        Self {
            version: FORMAT_VERSION,
            text: doc.text(),
            style: doc.text_style().clone(),
            page_layout: Some(doc.page_layout().clone()),
            paragraph_styles: doc.paragraph_styles().to_vec(),
            hyperlinks: annotations.hyperlinks.iter().cloned().collect(),
            bookmarks: annotations.bookmarks.iter().cloned().collect(),
            footnotes: annotations.footnotes.iter().cloned().collect(),
            tables: annotations.tables.iter().cloned().collect(),
            images: annotations.images.iter().cloned().collect(),
            drawings: annotations.drawings.iter().cloned().collect(),
            equations: annotations.equations.iter().cloned().collect(),
        }
    }

    /// Build a fresh document; anchors that no longer fit the text are clamped or dropped
    pub fn into_document(self, options: &EditorOptions) -> Document {
        let mut doc = Document::with_options(options.clone());
        doc.lines = LineStore::from_text(&self.text);
        doc.lines.load_paragraph_styles(self.paragraph_styles);
        doc.text_style = self.style.clamped();
        if let Some(layout) = self.page_layout {
            doc.page_layout = layout;
        }

        let len = doc.lines.len();
        let line_count = doc.lines.line_count();
        let annotations = &mut doc.annotations;
        annotations.hyperlinks.load(self.hyperlinks, len);
        annotations.bookmarks.load(self.bookmarks, len);
        annotations.footnotes.load(self.footnotes, len);

        let mut tables = self.tables;
        tables.retain_mut(|table| {
            let repaired = table.grid.repair();
            if !repaired {
                warn!("Dropping table {} with an inconsistent grid", table.id);
            }
            repaired
        });
        annotations.tables.load(tables);
        annotations.images.load(self.images);
        annotations.drawings.load(self.drawings);
        annotations.equations.load(self.equations);
        annotations.tables.clamp_lines(line_count);
        annotations.images.clamp_lines(line_count);
        annotations.drawings.clamp_lines(line_count);
        annotations.equations.clamp_lines(line_count);
        doc
    }
}

/// A loaded document and how it was obtained
#[derive(Debug)]
pub struct LoadOutcome {
    pub document: Document,
    /// The file could not be read as a document and was imported as plain text
    pub used_fallback: bool,
    pub diagnostic: Option<String>,
}

/// Load a document file, falling back to plain text when it cannot be parsed.
///
/// Files with a `.txt` extension are read as plain text without counting as a
/// fallback.
pub fn load_document(path: &Path, options: &EditorOptions) -> Result<LoadOutcome, IoError> {
    if is_plain_text(path) {
        return Ok(LoadOutcome {
            document: read_plain_text(path, options)?,
            used_fallback: false,
            diagnostic: None,
        });
    }

    let raw = read_raw(path)?;
    match parse_document(&raw) {
        Ok(file) => {
            debug!("Loaded {} (format version {})", path.display(), file.version);
            Ok(LoadOutcome {
                document: file.into_document(options),
                used_fallback: false,
                diagnostic: None,
            })
        }
        Err((diagnostic, text)) => {
            warn!(
                "Importing {} as plain text: {}",
                path.display(),
                diagnostic
            );
            Ok(LoadOutcome {
                document: plain_document(text.as_deref().unwrap_or(&raw), options),
                used_fallback: true,
                diagnostic: Some(diagnostic),
            })
        }
    }
}

/// Write `doc` as pretty-printed JSON, creating parent directories
pub fn save_document(doc: &Document, path: &Path) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(&DocumentFile::from_document(doc))?;
    create_parent_dirs(path)?;
    fs::write(path, json)?;
    debug!("Saved {}", path.display());
    Ok(())
}

/// Read a text file into a new document
pub fn read_plain_text(path: &Path, options: &EditorOptions) -> Result<Document, IoError> {
    let raw = read_raw(path)?;
    debug!("Read plain text {}", path.display());
    Ok(plain_document(&raw, options))
}

/// Write the document's text only
pub fn write_plain_text(doc: &Document, path: &Path) -> Result<(), IoError> {
    create_parent_dirs(path)?;
    fs::write(path, doc.text())?;
    debug!("Wrote plain text {}", path.display());
    Ok(())
}

fn read_raw(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn create_parent_dirs(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn is_plain_text(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

fn plain_document(text: &str, options: &EditorOptions) -> Document {
    let mut doc = Document::with_options(options.clone());
    doc.lines = LineStore::from_text(text);
    doc
}

/// Parse a document, or explain why not along with any text worth salvaging
fn parse_document(raw: &str) -> Result<DocumentFile, (String, Option<String>)> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| (format!("malformed document: {e}"), None))?;
    let salvaged = value
        .get("text")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    match value.get("version").and_then(serde_json::Value::as_u64) {
        None => return Err(("missing document version".to_string(), salvaged)),
        Some(version) if version > u64::from(FORMAT_VERSION) => {
            return Err((
                format!("unsupported document version {version} (newest supported is {FORMAT_VERSION})"),
                salvaged,
            ));
        }
        Some(_) => {}
    }

    serde_json::from_value(value).map_err(|e| (format!("invalid document: {e}"), salvaged))
}
