//! Server configuration.
//!
//! Every option can be given as a flag or an environment variable; flags win.

use clap::Parser;
use staffroll_core::default_log_level;
use std::path::PathBuf;

const DEFAULT_LOG_DIR: &str = "logs";

/// Runtime configuration for the employee REST service.
#[derive(Debug, Clone, Parser)]
#[command(name = "staffroll", version, about = "Employee records REST service")]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "STAFFROLL_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// SQLite database file; created on first start.
    #[arg(long, env = "STAFFROLL_DB_PATH", default_value = "employees.db")]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error. Defaults to debug in debug builds, info otherwise.
    #[arg(long, env = "STAFFROLL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files. Relative paths resolve against the
    /// working directory.
    #[arg(long, env = "STAFFROLL_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write logs to files only, without echoing to stderr.
    #[arg(long)]
    pub quiet: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            db_path: PathBuf::from("employees.db"),
            log_level: None,
            log_dir: None,
            quiet: false,
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Effective log level.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Absolute log directory, as required by the logging bootstrap.
    pub fn resolved_log_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(std::env::current_dir()?.join(dir))
        }
    }
}
