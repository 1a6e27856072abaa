use anyhow::{Context, Result};
use clap::Parser;
use staffroll_core::db::open_db;
use staffroll_core::init_logging;
use staffroll_server::{serve, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    let log_dir = config
        .resolved_log_dir()
        .context("failed to resolve log directory")?;
    init_logging(config.log_level(), &log_dir, !config.quiet)
        .context("failed to initialize logging")?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let state = AppState::try_new(conn).context("database schema is not usable")?;

    serve(&config, state)
        .await
        .with_context(|| format!("server on {} failed", config.socket_addr()))?;
    Ok(())
}
