use crate::editing::Position;

/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    pub version: u64,
    pub caret: Position,
    /// Whether the command changed the document (caret moves do not count)
    pub changed: bool,
}
