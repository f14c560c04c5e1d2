//! `tintbox.toml` loading and defaults.
//!
//! Everything is optional; a missing file or a partial file falls back to
//! stock defaults. Command-line flags override whatever the file says —
//! the file sets session defaults, the flags set this run.
//!
//! ```toml
//! [defaults]
//! filter = "gaussian-blur"
//! strength = 0.35
//!
//! [output]
//! format = "jpeg"
//! ```

use crate::filtering::{FilterKind, Strength};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Encoding format for saved images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Tiff,
}

impl OutputFormat {
    /// The file extension the disk store keys its encoder from.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
            OutputFormat::Tiff => "tiff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    /// Filter a session starts with.
    pub filter: FilterKind,
    /// Strength a session starts with, as written (clamped on use).
    pub strength: f32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            filter: FilterKind::default(),
            strength: Strength::default().value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub defaults: Defaults,
    pub output: OutputConfig,
}

impl Config {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `path` if given, stock defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// The default strength, clamped into range.
    pub fn default_strength(&self) -> Strength {
        Strength::new(self.defaults.strength)
    }
}
