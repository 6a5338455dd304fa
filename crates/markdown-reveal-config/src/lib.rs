use markdown_reveal_engine::{EngineOptions, Extensions, Preset, StyleConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

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

/// User settings, read from `~/.config/markdown-reveal/config.toml`.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Preset,
    /// Document opened by `markdown-reveal view` when no path is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_file: Option<PathBuf>,
    pub extensions: ExtensionsConfig,
    pub incremental: IncrementalConfig,
}

/// The `[extensions]` table. Each flag defaults to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    pub highlight: bool,
    pub subscript: bool,
    pub superscript: bool,
    pub math: bool,
    pub footnotes: bool,
    pub emoji: bool,
    pub table_of_contents: bool,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Extensions::all().into()
    }
}

impl From<Extensions> for ExtensionsConfig {
    fn from(ext: Extensions) -> Self {
        Self {
            highlight: ext.highlight,
            subscript: ext.subscript,
            superscript: ext.superscript,
            math: ext.math,
            footnotes: ext.footnotes,
            emoji: ext.emoji,
            table_of_contents: ext.table_of_contents,
        }
    }
}

impl From<ExtensionsConfig> for Extensions {
    fn from(cfg: ExtensionsConfig) -> Self {
        Self {
            highlight: cfg.highlight,
            subscript: cfg.subscript,
            superscript: cfg.superscript,
            math: cfg.math,
            footnotes: cfg.footnotes,
            emoji: cfg.emoji,
            table_of_contents: cfg.table_of_contents,
        }
    }
}

/// The `[incremental]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncrementalConfig {
    pub debounce_threshold: usize,
    pub debounce_delay_ms: u64,
    pub cache_capacity: usize,
}

impl Default for IncrementalConfig {
    fn default() -> Self {
        let options = EngineOptions::default();
        Self {
            debounce_threshold: options.debounce_threshold,
            debounce_delay_ms: options.debounce_delay.as_millis() as u64,
            cache_capacity: options.cache_capacity,
        }
    }
}

impl From<IncrementalConfig> for EngineOptions {
    fn from(cfg: IncrementalConfig) -> Self {
        Self {
            debounce_threshold: cfg.debounce_threshold,
            debounce_delay: Duration::from_millis(cfg.debounce_delay_ms),
            cache_capacity: cfg.cache_capacity,
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

        // Expand shell variables and tilde in the default file path
        config.default_file = config
            .default_file
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
        let config_dir = shellexpand::tilde("~/.config/markdown-reveal");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn styles(&self) -> StyleConfig {
        StyleConfig::preset(self.theme)
    }

    pub fn extensions(&self) -> Extensions {
        self.extensions.into()
    }

    pub fn engine_options(&self) -> EngineOptions {
        self.incremental.into()
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
