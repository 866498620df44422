//! Embedded objects anchored to a line: images, drawings and equations.
//!
//! The engine only tracks where these sit and what they carry; sizing and
//! painting belong to the front end.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationId, LineAnchored};
use crate::editing::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: AnnotationId,
    pub line: usize,
    #[serde(default)]
    pub column: usize,
    pub path: PathBuf,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub alt_text: String,
}

impl Image {
    pub fn new(line: usize, column: usize, path: impl Into<PathBuf>, width: f32, height: f32) -> Self {
        Self {
            id: 0,
            line,
            column,
            path: path.into(),
            width,
            height,
            alt_text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
    Freehand,
}

/// One stroke of a drawing, in drawing-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub kind: ShapeKind,
    pub points: Vec<(f32, f32)>,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Shape {
    pub fn new(kind: ShapeKind, points: Vec<(f32, f32)>) -> Self {
        Self {
            kind,
            points,
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: AnnotationId,
    pub line: usize,
    #[serde(default)]
    pub column: usize,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Drawing {
    pub fn new(line: usize, column: usize, width: f32, height: f32) -> Self {
        Self {
            id: 0,
            line,
            column,
            width,
            height,
            shapes: Vec::new(),
        }
    }
}

/// Equation source (LaTeX-style markup), rendered by the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    pub id: AnnotationId,
    pub line: usize,
    #[serde(default)]
    pub column: usize,
    pub source: String,
}

impl Equation {
    pub fn new(line: usize, column: usize, source: &str) -> Self {
        Self {
            id: 0,
            line,
            column,
            source: source.to_string(),
        }
    }
}

macro_rules! line_anchored {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl LineAnchored for $entity {
                fn id(&self) -> AnnotationId {
                    self.id
                }

                fn set_id(&mut self, id: AnnotationId) {
                    self.id = id;
                }

                fn line(&self) -> usize {
                    self.line
                }

                fn set_line(&mut self, line: usize) {
                    self.line = line;
                }
            }
        )+
    };
}

line_anchored!(Image, Drawing, Equation);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Change, LineAnchoredSet};
    use crate::editing::Position;

    #[test]
    fn test_ids_are_assigned_on_add() {
        let mut equations = LineAnchoredSet::new();
        let first = equations.add(Equation::new(0, 0, "x^2"));
        let second = equations.add(Equation::new(2, 0, "\\sqrt{y}"));

        assert_eq!((first, second), (1, 2));
        assert_eq!(equations.at(2).map(|eq| eq.source.as_str()), Some("\\sqrt{y}"));
    }

    #[test]
    fn test_line_break_above_moves_image_down() {
        let mut images = LineAnchoredSet::new();
        let id = images.add(Image::new(3, 0, "cat.png", 64.0, 48.0));

        images.rebase(&Change::Inserted {
            offset: 0,
            len: 1,
            at: Position::new(1, 2),
            line_breaks: 1,
        });

        assert_eq!(images.get(id).map(|image| image.line), Some(4));
    }

    #[test]
    fn test_drawing_on_removed_line_collapses_onto_merge_row() {
        let mut drawings = LineAnchoredSet::new();
        let id = drawings.add(Drawing::new(2, 0, 100.0, 100.0));

        drawings.rebase(&Change::Deleted {
            range: 4..12,
            start: Position::new(1, 0),
            end: Position::new(3, 1),
        });

        assert_eq!(drawings.get(id).map(|drawing| drawing.line), Some(1));
    }
}
