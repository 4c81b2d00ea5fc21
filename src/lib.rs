pub mod compare;
pub mod config;
pub mod database;
pub mod extract;
pub mod grader;
pub mod report;

// Make test_utils available for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use compare::{Outcome, compare};
pub use crate::config::{Config, DatabaseConfig, Settings};
pub use database::SqlConnection;
pub use extract::{Query, extract_queries, read_queries};
pub use grader::{QueryPair, Report, Verdict, grade, pair_queries, run};
pub use report::Reporter;

#[derive(thiserror::Error, Debug)]
pub enum GraderError {
    #[error("Failed to read queries from {}: {source}", path.display())]
    ReadQueries {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse JSON configuration: {0}")]
    ConfigParse(#[source] ::config::ConfigError),

    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[source] ::config::ConfigError),

    #[error("Failed to connect to MySQL: {0}")]
    Connect(#[source] mysql_async::Error),

    #[error("{0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraderError>;
