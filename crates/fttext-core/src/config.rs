use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Built-in display width when no geometry is given
pub const DEFAULT_WIDTH: i32 = 45;
/// Built-in layer; layer 0 is the background plane
pub const DEFAULT_LAYER: i32 = 1;
/// Built-in scroll delay per pixel
pub const DEFAULT_SCROLL_DELAY_MS: u64 = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Values used whenever the command line does not supply them
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// Display host, optionally `host:port`
    #[serde(default)]
    pub host: Option<String>,
    /// Path to a BDF font file
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Geometry spec, same syntax as `-g`
    #[serde(default)]
    pub geometry: Option<String>,
    /// Layer, same as `-l`
    #[serde(default)]
    pub layer: Option<i32>,
    /// Scroll delay in milliseconds (0 = static)
    #[serde(default = "default_scroll_delay_ms")]
    pub scroll_delay_ms: u64,
    /// Only run one sweep
    #[serde(default)]
    pub run_once: bool,
    /// Text color as RRGGBB
    #[serde(default = "default_foreground")]
    pub foreground: String,
    /// Background color as RRGGBB
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            host: None,
            font: None,
            geometry: None,
            layer: None,
            scroll_delay_ms: default_scroll_delay_ms(),
            run_once: false,
            foreground: default_foreground(),
            background: default_background(),
        }
    }
}

fn default_scroll_delay_ms() -> u64 {
    DEFAULT_SCROLL_DELAY_MS
}

fn default_foreground() -> String {
    "FFFFFF".to_string()
}

fn default_background() -> String {
    "000000".to_string()
}

/// Expand tilde (~) in path to user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/fttext/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("fttext")
            .join("config.toml")
    }

    /// Font path from the config file, with tilde expansion
    pub fn font_path(&self) -> Option<PathBuf> {
        self.defaults.font.as_deref().map(expand_tilde)
    }
}
