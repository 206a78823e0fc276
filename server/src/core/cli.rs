use clap::{Parser, Subcommand};

use std::path::PathBuf;

use crate::data::sql::Backend;
use crate::domain::Resource;

use super::constants::{
    ENV_CONFIG, ENV_DATABASE, ENV_DIALECT, ENV_ESCAPE_WILDCARDS, ENV_EXPLICIT_PRESENCE,
};

#[derive(Parser)]
#[command(name = "clinica")]
#[command(version, about = "Clinic resource search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQLite database path (":memory:" for a throwaway database)
    #[arg(long, global = true, env = ENV_DATABASE)]
    pub database: Option<PathBuf>,

    /// SQL dialect for compiled output (sqlite or postgres)
    #[arg(long, global = true, env = ENV_DIALECT, value_parser = parse_backend)]
    pub dialect: Option<Backend>,

    /// Escape LIKE wildcards (% and _) in criteria values
    #[arg(
        long,
        global = true,
        env = ENV_ESCAPE_WILDCARDS,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub escape_wildcards: Option<bool>,

    /// Let empty strings and zero match instead of being ignored
    #[arg(
        long,
        global = true,
        env = ENV_EXPLICIT_PRESENCE,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub explicit_presence: Option<bool>,
}

/// Parse SQL dialect from CLI/env string
fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse()
}

/// Parse resource name from CLI string
fn parse_resource(s: &str) -> Result<Resource, String> {
    s.parse()
}

/// Parse a `key=value` criterion
fn parse_criterion(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid criterion '{}'. Expected key=value", s)),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile criteria into a parameterized predicate without running it
    Compile {
        /// Resource to filter (appointments, medical-history, persons, reference-persons)
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        /// Criteria as key=value pairs
        #[arg(value_parser = parse_criterion)]
        criteria: Vec<(String, String)>,
    },
    /// Search a resource in the configured database
    Search {
        /// Resource to search
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        /// Criteria as key=value pairs
        #[arg(value_parser = parse_criterion)]
        criteria: Vec<(String, String)>,
        /// Maximum rows to return
        #[arg(long)]
        limit: Option<u32>,
        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// List resources and the criteria keys they accept
    Resources,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub dialect: Option<Backend>,
    pub escape_wildcards: Option<bool>,
    pub explicit_presence: Option<bool>,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            database: cli.database.clone(),
            dialect: cli.dialect,
            escape_wildcards: cli.escape_wildcards,
            explicit_presence: cli.explicit_presence,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    (CliConfig::from(&cli), cli.command)
}
