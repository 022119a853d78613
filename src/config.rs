//! Server configuration.
//!
//! Settings come from a TOML file, then environment overrides:
//!
//! ```toml
//! log = "./mcp-sqlite.log"
//! debug = false
//!
//! [sqlite]
//! path = "./sqlite.db"
//! ```
//!
//! A missing file is not an error; defaults are used instead. `LOG_PATH`,
//! `DEBUG` and `SQLITE_PATH` override the corresponding file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log file path. Empty means no log file.
    pub log: String,
    /// Human-readable debug logging instead of JSON at info level.
    pub debug: bool,
    pub sqlite: SqliteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    pub path: PathBuf,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_SQLITE_PATH),
        }
    }
}

impl Config {
    /// Load configuration from `path`, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML syntax or mistyped fields
    /// - `DEBUG` is set to something other than a boolean
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read `path` without environment overrides. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            },
        };

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if `DEBUG` is not a recognised boolean.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(log) = lookup(constants::ENV_LOG_PATH) {
            self.log = log;
        }

        if let Some(debug) = lookup(constants::ENV_DEBUG) {
            self.debug = parse_bool(&debug).with_context(|| {
                format!("Invalid value for {}: '{debug}'", constants::ENV_DEBUG)
            })?;
        }

        if let Some(path) = lookup(constants::ENV_SQLITE_PATH) {
            self.sqlite.path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Configured log file, if any.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        let log = self.log.trim();
        (!log.is_empty()).then(|| Path::new(log))
    }

    /// Validate configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Empty sqlite path
    /// - Sqlite path or log path pointing at a directory
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let db = &self.sqlite.path;
        if db.as_os_str().is_empty() {
            errors.push("sqlite.path cannot be empty".to_string());
        } else if db.is_dir() {
            errors.push(format!(
                "sqlite.path is a directory: {}\n  \
                 Expected a database file path such as {}",
                db.display(),
                constants::DEFAULT_SQLITE_PATH
            ));
        } else if let Some(parent) = db.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            warnings.push(format!(
                "Database directory does not exist: {}\n  \
                 It will be created on startup",
                parent.display()
            ));
        }

        if let Some(log) = self.log_path()
            && log.is_dir()
        {
            errors.push(format!("log path is a directory: {}", log.display()));
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => anyhow::bail!("expected true, false, 1 or 0 (got: '{other}')"),
    }
}
