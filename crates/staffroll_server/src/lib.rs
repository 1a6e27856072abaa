//! HTTP surface for staffroll: routes, configuration and error mapping over
//! `staffroll_core`.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, Operation};
pub use server::{router, serve};
pub use state::AppState;
