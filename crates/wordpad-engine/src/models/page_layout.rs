use serde::{Deserialize, Serialize};

/// Whether the document is shown as one continuous sheet or as pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageMode {
    #[default]
    Pageless,
    Paged,
}

/// Page geometry in pixels at 96 dpi (US Letter by default)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageLayout {
    pub mode: PageMode,
    pub page_width: u32,
    pub page_height: u32,
    pub margin: u32,
    /// Maximum text width in pageless mode, 0 for no limit
    pub line_width_limit: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            mode: PageMode::Pageless,
            page_width: 816,
            page_height: 1056,
            margin: 96,
            line_width_limit: 0,
        }
    }
}

impl PageLayout {
    /// Width left for text between the side margins
    pub fn content_width(&self) -> u32 {
        self.page_width.saturating_sub(self.margin * 2)
    }

    /// Width text should wrap at, honouring the pageless limit
    pub fn text_width(&self) -> u32 {
        match (self.mode, self.line_width_limit) {
            (PageMode::Pageless, limit) if limit > 0 => limit.min(self.content_width()),
            _ => self.content_width(),
        }
    }
}
