use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wordpad_engine::editing::{EditorOptions, History, TextStyle, clamp_font_size};
use wordpad_engine::models::{PageLayout, PageMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// User settings from `~/.config/wordpad/config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory relative document paths are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_path: Option<PathBuf>,
    pub font: String,
    pub font_size: u32,
    pub undo_limit: usize,
    pub page_mode: PageMode,
    pub page_width: u32,
    pub page_height: u32,
    pub margin: u32,
    pub line_width_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        let style = TextStyle::default();
        let layout = PageLayout::default();
        Self {
            documents_path: None,
            font: style.font,
            font_size: style.font_size,
            undo_limit: History::<()>::DEFAULT_CAPACITY,
            page_mode: layout.mode,
            page_width: layout.page_width,
            page_height: layout.page_height,
            margin: layout.margin,
            line_width_limit: layout.line_width_limit,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the documents directory
        config.documents_path = config
            .documents_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/wordpad");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Engine options for new and loaded documents
    pub fn editor_defaults(&self) -> EditorOptions {
        EditorOptions {
            undo_limit: self.undo_limit,
            text_style: TextStyle {
                font: self.font.clone(),
                font_size: clamp_font_size(self.font_size),
                ..TextStyle::default()
            },
            page_layout: PageLayout {
                mode: self.page_mode,
                page_width: self.page_width,
                page_height: self.page_height,
                margin: self.margin,
                line_width_limit: self.line_width_limit,
            },
        }
    }

    /// Relative paths resolve against `documents_path` when one is configured
    pub fn resolve_document_path(&self, path: &Path) -> PathBuf {
        match &self.documents_path {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
