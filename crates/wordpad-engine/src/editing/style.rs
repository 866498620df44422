use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;
pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Clamp a font size into the supported point range
pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// RGBA color used for text and highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    u8::MAX
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Character style applied to newly typed text.
///
/// The model keeps a single active style rather than per-character runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font: String,
    pub font_size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            color: None,
            highlight: None,
        }
    }
}

impl TextStyle {
    /// Same style with the font size forced into range
    pub fn clamped(mut self) -> Self {
        self.font_size = clamp_font_size(self.font_size);
        self
    }
}

/// Per-line paragraph classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParagraphStyle {
    #[default]
    Normal,
    Title,
    Subtitle,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
}

impl ParagraphStyle {
    pub const ALL: [ParagraphStyle; 9] = [
        ParagraphStyle::Normal,
        ParagraphStyle::Title,
        ParagraphStyle::Subtitle,
        ParagraphStyle::Heading1,
        ParagraphStyle::Heading2,
        ParagraphStyle::Heading3,
        ParagraphStyle::Heading4,
        ParagraphStyle::Heading5,
        ParagraphStyle::Heading6,
    ];

    /// Heading style for a 1-based level, `None` outside 1..=6
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(ParagraphStyle::Heading1),
            2 => Some(ParagraphStyle::Heading2),
            3 => Some(ParagraphStyle::Heading3),
            4 => Some(ParagraphStyle::Heading4),
            5 => Some(ParagraphStyle::Heading5),
            6 => Some(ParagraphStyle::Heading6),
            _ => None,
        }
    }

    /// Point size the renderer uses for this paragraph, `None` for body text
    pub fn font_size(self) -> Option<u32> {
        match self {
            ParagraphStyle::Normal => None,
            ParagraphStyle::Title => Some(32),
            ParagraphStyle::Subtitle => Some(20),
            ParagraphStyle::Heading1 => Some(24),
            ParagraphStyle::Heading2 => Some(20),
            ParagraphStyle::Heading3 => Some(16),
            ParagraphStyle::Heading4 => Some(14),
            ParagraphStyle::Heading5 => Some(12),
            ParagraphStyle::Heading6 => Some(11),
        }
    }

    pub fn is_bold(self) -> bool {
        !matches!(self, ParagraphStyle::Normal | ParagraphStyle::Subtitle)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, ParagraphStyle::Subtitle | ParagraphStyle::Heading6)
    }

    /// Outline depth: titles are 0, headings 1..=6, body text has none
    pub fn outline_level(self) -> Option<u8> {
        match self {
            ParagraphStyle::Normal => None,
            ParagraphStyle::Title | ParagraphStyle::Subtitle => Some(0),
            ParagraphStyle::Heading1 => Some(1),
            ParagraphStyle::Heading2 => Some(2),
            ParagraphStyle::Heading3 => Some(3),
            ParagraphStyle::Heading4 => Some(4),
            ParagraphStyle::Heading5 => Some(5),
            ParagraphStyle::Heading6 => Some(6),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::Title => "Title",
            ParagraphStyle::Subtitle => "Subtitle",
            ParagraphStyle::Heading1 => "Heading 1",
            ParagraphStyle::Heading2 => "Heading 2",
            ParagraphStyle::Heading3 => "Heading 3",
            ParagraphStyle::Heading4 => "Heading 4",
            ParagraphStyle::Heading5 => "Heading 5",
            ParagraphStyle::Heading6 => "Heading 6",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 8)]
    #[case(8, 8)]
    #[case(12, 12)]
    #[case(72, 72)]
    #[case(400, 72)]
    fn test_font_size_is_clamped(#[case] requested: u32, #[case] expected: u32) {
        assert_eq!(clamp_font_size(requested), expected);
    }

    #[test]
    fn test_heading_sizes_descend() {
        let sizes: Vec<u32> = (1..=6)
            .filter_map(ParagraphStyle::heading)
            .filter_map(ParagraphStyle::font_size)
            .collect();

        assert_eq!(sizes.len(), 6);
        assert!(sizes.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(ParagraphStyle::Title.font_size() > ParagraphStyle::Heading1.font_size());
    }

    #[test]
    fn test_style_hints() {
        assert!(ParagraphStyle::Title.is_bold());
        assert!(!ParagraphStyle::Normal.is_bold());
        assert!(ParagraphStyle::Subtitle.is_italic());
        assert_eq!(ParagraphStyle::Normal.font_size(), None);
        assert_eq!(ParagraphStyle::Subtitle.outline_level(), Some(0));
        assert_eq!(ParagraphStyle::Heading4.outline_level(), Some(4));
    }

    #[test]
    fn test_text_style_deserializes_with_missing_fields() {
        let style: TextStyle = serde_json::from_str(r#"{"font":"Courier","fontSize":200}"#).unwrap();

        assert_eq!(style.font, "Courier");
        assert!(!style.bold);
        assert_eq!(style.clamped().font_size, MAX_FONT_SIZE);
    }
}
