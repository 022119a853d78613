use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

use mcp_sqlite::config::Config;
use mcp_sqlite::logging::{self, LogOptions};
use mcp_sqlite::{constants, server};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "mcp-sqlite")]
#[command(about = "SQLite tool server over stdio", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve tools for the configured database on stdin/stdout
    #[command(visible_alias = "s")]
    Server {
        /// Path to the TOML config file
        #[arg(short, long, default_value = constants::DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Disable the log file; only errors are written to stderr
        #[arg(long)]
        no_logs: bool,

        /// Log file path (overrides the config file and LOG_PATH)
        #[arg(long)]
        log: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            config,
            no_logs,
            log,
        } => {
            let mut config = Config::load_from(&config)
                .with_context(|| format!("Failed to load config: {}", config.display()))?;
            if let Some(log) = log {
                config.log = log;
            }
            let validation = config.validate()?;

            logging::init(&LogOptions::from_config(&config, no_logs))?;
            for warning in &validation.warnings {
                warn!("{warning}");
            }

            let version =
                server::version_string(env!("CARGO_PKG_VERSION"), option_env!("MCP_SQLITE_REVISION"));
            server::run(&config, &version).await
        },
    }
}
