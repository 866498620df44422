/*!
 * # Editing Core
 *
 * The document model behind the word processor: a line store, a caret and
 * selection, character and paragraph styles, and the annotation sets that
 * hang off positions in the text.
 *
 * ## Architecture Overview
 *
 * ### 1. Lines are the source of truth
 * - Content is a `Vec` of lines with no stored line terminators
 * - Offsets and columns count characters, line breaks count as one
 * - Each line carries its paragraph style, so splits and merges move both
 *
 * ### 2. One mutation path
 * - Every edit runs through `Document` and describes itself as a `Change`
 * - The same `Change` rebases hyperlinks, bookmarks, footnotes and every
 *   line-anchored entity, so anchors never drift from the text
 * - A mutation that changes something records one undo entry and bumps the
 *   version once; no-ops do neither
 *
 * ### 3. Snapshot undo
 * - Undo entries are whole-document snapshots in a bounded history
 * - Restoring a snapshot never rewinds annotation id counters
 *
 * ### 4. Commands for front ends
 * - `Keymap` resolves an `InputState` into a `Cmd`
 * - `Document::apply` runs the `Cmd` and returns a `Patch`
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, text edits, caret/selection, styles, undo/redo
 * - **`lines`**: the line store and offset arithmetic
 * - **`navigation`**: caret motions
 * - **`annotate`**: document-level annotation mutators
 * - **`outline`**: heading outline and table of contents
 * - **`search`**: find, find-next and replace-all
 * - **`stats`**: word and character counts
 * - **`commands`** / **`keymap`** / **`patch`**: the command layer
 *
 * ## Usage Pattern
 *
 * ```rust
 * use wordpad_engine::editing::*;
 *
 * let mut doc = Document::from_text("Chapter\nBody text");
 * doc.set_paragraph_style(0, ParagraphStyle::Heading1);
 *
 * doc.set_caret(Position::new(1, 0));
 * let patch = doc.apply(Cmd::InsertText("More ".to_string()));
 * assert!(patch.changed);
 *
 * assert_eq!(doc.generate_table_of_contents(), "Chapter\n");
 * assert!(doc.undo());
 * ```
 */

pub mod annotate;
pub mod commands;
pub mod document;
pub mod history;
pub mod keymap;
pub mod lines;
pub mod navigation;
pub mod outline;
pub mod patch;
pub mod position;
pub mod search;
pub mod stats;
pub mod style;

pub use commands::{Cmd, FONT_SIZE_STEP, Motion};
pub use document::{Document, EditorOptions};
pub use history::History;
pub use keymap::{Chord, InputState, Key, Keymap, Modifiers};
pub use lines::{LineSpan, LineStore};
pub use outline::OutlineEntry;
pub use patch::Patch;
pub use position::{Position, Selection};
pub use search::{Match, SearchError, SearchOptions};
pub use stats::Statistics;
pub use style::{Color, ParagraphStyle, TextStyle, clamp_font_size};
