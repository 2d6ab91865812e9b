use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::buffer::{DEFAULT_GAP, GAP_SLACK};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Editor behavior settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// External region filter settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Failure log settings
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

fn default_gap_slack() -> usize {
    GAP_SLACK
}

fn default_initial_gap() -> usize {
    DEFAULT_GAP
}

fn default_true() -> bool {
    true
}

fn default_filter_command() -> String {
    r#"sed -E -f "$SCRIPT" "$INPUT" > "$OUTPUT" 2> "$ERROR""#.to_string()
}

/// Editor behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Bytes of slack added on every gap growth
    #[serde(default = "default_gap_slack")]
    pub gap_slack: usize,

    /// Gap size of a newly created or loaded buffer
    #[serde(default = "default_initial_gap")]
    pub initial_gap: usize,

    /// Keep the previous version of a file as `name~` when saving
    #[serde(default = "default_true")]
    pub backup_on_save: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            gap_slack: default_gap_slack(),
            initial_gap: default_initial_gap(),
            backup_on_save: true,
        }
    }
}

/// External filter configuration
///
/// The command runs under `sh -c` with `SCRIPT`, `INPUT`, `OUTPUT` and `ERROR`
/// set to paths in a scratch directory. It must write its result to `OUTPUT`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    #[serde(default = "default_filter_command")]
    pub command: String,

    /// Directory for scratch files (system temp dir if unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            command: default_filter_command(),
            temp_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Where failed commands are logged (a file in the system temp dir if unset)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DiagnosticsConfig {
    pub fn effective_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("gapedit-diagnostics.log"))
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gapedit").join("config.json"))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` (or the default location), falling back to defaults when the
    /// file is missing or invalid
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_config_path) else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = self.to_json()?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter.command.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "filter.command cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
