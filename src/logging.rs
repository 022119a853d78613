//! Logging setup.
//!
//! Stdout carries protocol traffic, so logs go either to the configured log
//! file or, when there is none, to stderr at error level only.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::config::Config;

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stderr,
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Human-readable output at debug level.
    pub debug: bool,
    /// Ignore the log file and only report errors on stderr.
    pub no_logs: bool,
    pub log_path: Option<PathBuf>,
}

impl LogOptions {
    pub fn from_config(config: &Config, no_logs: bool) -> Self {
        Self {
            debug: config.debug,
            no_logs,
            log_path: config.log_path().map(Path::to_path_buf),
        }
    }

    pub fn destination(&self) -> Destination {
        match &self.log_path {
            Some(path) if !self.no_logs => Destination::File(path.clone()),
            _ => Destination::Stderr,
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> &'static str {
        match (self.destination(), self.debug) {
            (Destination::Stderr, _) => "error",
            (Destination::File(_), true) => "debug",
            (Destination::File(_), false) => "info",
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init(options: &LogOptions) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_filter()));

    let destination = options.destination();
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match &destination {
        Destination::File(path) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);
            if options.debug {
                layer.boxed()
            } else {
                layer.json().boxed()
            }
        },
        Destination::Stderr => fmt::layer().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(destination = ?destination, debug = options.debug, "Logger initialized");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
