pub mod config;
pub mod models;
pub mod scraping;
pub mod server;

pub use config::{Config, ConfigError};
pub use models::{EventRecord, Envelope};
