//! SQLite persistence adapters.

pub mod analytics_sink;
pub mod connection;
pub mod migrations;

pub use analytics_sink::{AnalyticsSummary, SqliteAnalyticsSink};
pub use connection::connect;
