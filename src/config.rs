//! Configuration loading.
//!
//! Reads `evergreen-matrix.toml` (or `$EVERGREEN_MATRIX_CONFIG`). A missing
//! file yields defaults. Environment variables override file values; command
//! line flags override both, applied by the binary.
//!
//! Precedence: CLI flags > env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::render::OutputFormat;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "EVERGREEN_MATRIX_CONFIG";

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "evergreen-matrix.toml";

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatrixConfig {
    /// Where and how the document is written.
    pub output: OutputConfig,
    /// Which variants are emitted.
    pub select: SelectConfig,
    /// Log filtering and optional file logging.
    pub logging: LoggingConfig,
}

impl MatrixConfig {
    /// Load configuration with precedence env vars > TOML file > defaults.
    ///
    /// `explicit` wins over `$EVERGREEN_MATRIX_CONFIG`, which wins over
    /// `./evergreen-matrix.toml`. Only the implicit default path may be
    /// missing; an explicitly named file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Load using a custom env resolver (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => match env(CONFIG_PATH_ENV) {
                Some(p) => (PathBuf::from(p), true),
                None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("failed to parse config at {}", path.display()))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                tracing::debug!("no config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "failed to read config at {}: {e}",
                    path.display()
                ))
            }
        };
        config.apply_overrides(env);
        Ok(config)
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids unsafe `set_var` in tests).
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("EVERGREEN_MATRIX_FORMAT") {
            match v.parse() {
                Ok(format) => self.output.format = format,
                Err(_) => tracing::warn!(
                    var = "EVERGREEN_MATRIX_FORMAT",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("EVERGREEN_MATRIX_OUTPUT") {
            self.output.path = Some(PathBuf::from(v));
        }
        if let Some(v) = env("EVERGREEN_MATRIX_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown keys.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: MatrixConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── Sections ────────────────────────────────────────────────────

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Rendering format.
    pub format: OutputFormat,
    /// Destination file; stdout when unset.
    pub path: Option<PathBuf>,
}

/// `[select]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectConfig {
    /// Variant names to emit. Empty emits all of them.
    pub variants: Vec<String>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for JSON log files. Console only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            dir: None,
        }
    }
}
