use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "mysql-grader")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(
        value_name = "FILENAME",
        default_value = "input.sql",
        help = "Path to SQL file containing submission queries"
    )]
    pub filename: PathBuf,

    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "solution.sql",
        help = "Path to SQL file containing solution queries"
    )]
    pub solution: PathBuf,

    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.json",
        help = "Path to the MySQL database configuration file"
    )]
    pub config: PathBuf,

    #[arg(short, long, help = "Enable debug mode for verbose output on errors")]
    pub debug: bool,

    #[arg(
        long,
        default_value = "warn",
        help = "Set log level: debug, info, warn, error"
    )]
    pub log_level: String,
}

impl Config {
    pub fn init_logging(&self) -> anyhow::Result<()> {
        let log_level = if self.debug {
            "debug"
        } else {
            &self.log_level
        };

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(self.debug)
            .with_line_number(self.debug)
            .init();

        Ok(())
    }

    /// Resolves the database settings and bundles them with the file paths.
    pub fn into_settings(self) -> crate::Result<Settings> {
        let database = DatabaseConfig::load(&self.config)?;
        Ok(Settings {
            database,
            solution_file: self.solution,
            query_file: self.filename,
            debug: self.debug,
        })
    }
}

/// Everything a grading run needs, fully resolved.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub solution_file: PathBuf,
    pub query_file: PathBuf,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: Option<String>,
}

pub const ENV_PREFIX: &str = "MYSQL_GRADER";

impl DatabaseConfig {
    /// Loads defaults, then `MYSQL_GRADER_*` variables, then the JSON file.
    /// Values from the file win over the environment; empty variables are
    /// treated as unset.
    pub fn load(config_file: &Path) -> crate::Result<Self> {
        Self::load_with_env(
            config_file,
            ::config::Environment::with_prefix(ENV_PREFIX).ignore_empty(true),
        )
    }

    pub fn load_with_env(
        config_file: &Path,
        environment: ::config::Environment,
    ) -> crate::Result<Self> {
        if config_file.exists() {
            debug!("Reading database configuration from {}", config_file.display());
        } else {
            debug!(
                "No configuration file at {}, using environment only",
                config_file.display()
            );
        }

        let settings = ::config::Config::builder()
            .set_default("host", "localhost")
            .and_then(|b| b.set_default("port", 3306))
            .and_then(|b| b.set_default("user", "root"))
            .map_err(|e| crate::GraderError::Config(e.to_string()))?
            .add_source(environment.ignore_empty(true))
            .add_source(
                ::config::File::from(config_file)
                    .format(::config::FileFormat::Json)
                    .required(false),
            )
            .build()
            .map_err(|e| match e {
                ::config::ConfigError::FileParse { .. } => crate::GraderError::ConfigParse(e),
                e => crate::GraderError::ConfigRead(e),
            })?;

        let config: DatabaseConfig = settings
            .try_deserialize()
            .map_err(|e| crate::GraderError::Config(e.to_string()))?;
        if config.host.is_empty() {
            return Err(crate::GraderError::Config("host must not be empty".to_string()));
        }

        Ok(config)
    }
}
