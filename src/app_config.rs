use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the engine configuration including loading and
/// validating configuration settings. Caption styling is an opaque
/// pass-through block: the engine hands it to the renderer collaborator
/// unchanged and never interprets it.
/// Represents the engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code; selects `root/<language>/Text` and
    /// `root/<language>/Texture` subtrees
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Root directory holding per-language translation subtrees
    #[serde(default = "default_translation_root")]
    pub translation_root: PathBuf,

    /// Build translation snapshots on a background task instead of inline
    #[serde(default = "default_true")]
    pub enable_async_loading: bool,

    /// Maximum number of decoded textures kept in the replacement cache
    #[serde(default = "default_texture_cache_capacity")]
    pub texture_cache_capacity: usize,

    /// Voice monitor tuning
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Caption styling, passed through to the renderer
    #[serde(default)]
    pub style: CaptionStyle,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Per-speaker voice monitor tuning
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Polling interval between playback checks, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How many consecutive polls may report a missing playback handle
    /// before the voice is considered finished. Covers the window right
    /// after voice-start where the handle is not attached yet.
    #[serde(default = "default_missing_handle_tolerance")]
    pub missing_handle_tolerance: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            missing_handle_tolerance: default_missing_handle_tolerance(),
        }
    }
}

/// Caption styling parameters, owned by the host configuration and treated
/// as opaque by the engine
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionStyle {
    /// Font family name
    #[serde(default = "default_font")]
    pub font: String,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Text color as #RRGGBB
    #[serde(default = "default_text_color")]
    pub color: String,

    /// Outline color as #RRGGBB
    #[serde(default = "default_outline_color")]
    pub outline_color: String,

    /// Outline width in pixels
    #[serde(default = "default_outline_width")]
    pub outline_width: f32,

    /// Background opacity, 0.0 (transparent) to 1.0 (opaque)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Vertical position as a fraction of screen height from the bottom
    #[serde(default = "default_vertical_position")]
    pub vertical_position: f32,

    /// Fade-in duration in seconds
    #[serde(default = "default_fade_secs")]
    pub fade_in_secs: f32,

    /// Fade-out duration in seconds
    #[serde(default = "default_fade_secs")]
    pub fade_out_secs: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: default_font_size(),
            color: default_text_color(),
            outline_color: default_outline_color(),
            outline_width: default_outline_width(),
            opacity: default_opacity(),
            vertical_position: default_vertical_position(),
            fade_in_secs: default_fade_secs(),
            fade_out_secs: default_fade_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to a `log` crate level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_translation_root() -> PathBuf {
    PathBuf::from("translation")
}

fn default_true() -> bool {
    true
}

fn default_texture_cache_capacity() -> usize {
    30
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_missing_handle_tolerance() -> u32 {
    10
}

fn default_font() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_text_color() -> String {
    "#FFFFFF".to_string()
}

fn default_outline_color() -> String {
    "#000000".to_string()
}

fn default_outline_width() -> f32 {
    1.0
}

fn default_opacity() -> f32 {
    0.5
}

fn default_vertical_position() -> f32 {
    0.05
}

fn default_fade_secs() -> f32 {
    0.5
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Directory holding dictionary files for the current target language
    pub fn text_dir(&self) -> PathBuf {
        self.translation_root.join(&self.target_language).join("Text")
    }

    /// Directory holding replacement textures for the current target language
    pub fn texture_dir(&self) -> PathBuf {
        self.translation_root.join(&self.target_language).join("Texture")
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }

        if self.monitor.poll_interval_ms == 0 {
            return Err(anyhow!("Monitor poll interval must be positive"));
        }

        if self.style.fade_in_secs < 0.0 || self.style.fade_out_secs < 0.0 {
            return Err(anyhow!("Fade durations must not be negative"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation_root: default_translation_root(),
            enable_async_loading: default_true(),
            texture_cache_capacity: default_texture_cache_capacity(),
            monitor: MonitorConfig::default(),
            style: CaptionStyle::default(),
            log_level: LogLevel::default(),
        }
    }
}
