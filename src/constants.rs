//! Shared constants: defaults, environment variable names and server identity.

/// Name reported to clients in `serverInfo`.
pub const SERVER_NAME: &str = "mcp-sqlite";

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Database file used when neither the config nor the environment names one.
pub const DEFAULT_SQLITE_PATH: &str = "./sqlite.db";

pub const ENV_LOG_PATH: &str = "LOG_PATH";
pub const ENV_DEBUG: &str = "DEBUG";
pub const ENV_SQLITE_PATH: &str = "SQLITE_PATH";
