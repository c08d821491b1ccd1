//! HTTP API over `chainage_core`.

pub mod config;
pub mod error;
pub mod routes;

pub use config::{Cli, ServerConfig};
pub use routes::router;
