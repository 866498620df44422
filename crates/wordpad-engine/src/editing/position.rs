use serde::{Deserialize, Serialize};

/// Caret location inside the line store.
///
/// `row` indexes a line and `column` counts characters (not bytes) within
/// that line. Positions order row-major, then by column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, column): (usize, usize)) -> Self {
        Self::new(row, column)
    }
}

/// Anchor/active pair built by the two-phase selection protocol.
///
/// The anchor is where selecting started, the active end follows the caret.
/// Either end may come first in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub const fn collapsed(at: Position) -> Self {
        Self {
            anchor: at,
            active: at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Earlier endpoint in document order
    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    /// Later endpoint in document order
    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }
}
