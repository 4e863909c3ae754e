//! Command-line interface for mongo-reply
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading, validation and command-line overrides
//! - Translating subcommands into executor commands

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{Config, OutputFormat};
use crate::error::{ConfigError, Result};
use crate::executor::Command;
use crate::reply::ReplyCollection;
use crate::result::{IndexMap, ServerCapability};

/// Interpret captured MongoDB server replies
#[derive(Parser, Debug)]
#[command(
    name = "mongo-reply",
    version,
    about = "Interpret captured MongoDB write and aggregate replies",
    long_about = "Reads the replies of one logical operation from an extended JSON fixture and
reports matched/modified/upserted counts, remapped write errors, or the first
batch and cursor id of an aggregation."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Output format (json, json-pretty, table)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<String>,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for mongo-reply
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interpret the replies of an update operation
    Update {
        /// Replies fixture (JSON array of replies)
        #[arg(value_name = "REPLIES")]
        replies: PathBuf,

        /// Original-operation index of each batch-local item, e.g. "0,2,5"
        #[arg(long, value_name = "LIST", value_delimiter = ',')]
        indexes: Option<Vec<usize>>,

        /// Server version the replies came from
        #[arg(long, value_name = "VERSION")]
        server_version: Option<String>,

        /// Server maxWireVersion the replies came from
        #[arg(long, value_name = "N", conflicts_with = "server_version")]
        max_wire_version: Option<i32>,
    },

    /// Interpret the replies of an aggregation
    Aggregate {
        /// Replies fixture (JSON array of replies)
        #[arg(value_name = "REPLIES")]
        replies: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and apply argument overrides
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Effective configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Some(format) = &args.format {
            config.display.format =
                OutputFormat::parse(format).ok_or_else(|| ConfigError::InvalidValue {
                    field: "format".to_string(),
                    value: format.clone(),
                })?;
        }

        if let Commands::Update {
            server_version,
            max_wire_version,
            ..
        } = &args.command
        {
            if let Some(version) = server_version {
                config.server.version = Some(version.clone());
                config.server.max_wire_version = None;
            }
            if let Some(wire) = max_wire_version {
                config.server.max_wire_version = Some(*wire);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Get parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the executor command for the chosen subcommand
    ///
    /// # Returns
    /// * `Result<Option<Command>>` - Command to execute, or `None` for
    ///   subcommands handled by the CLI itself
    pub fn build_command(&self) -> Result<Option<Command>> {
        match &self.args.command {
            Commands::Update {
                replies, indexes, ..
            } => Ok(Some(Command::Update {
                replies: load_replies(replies)?,
                indexes: indexes.clone().map(IndexMap::new),
                capability: self.capability(),
            })),
            Commands::Aggregate { replies } => Ok(Some(Command::Aggregate {
                replies: load_replies(replies)?,
            })),
            Commands::Config => Ok(None),
        }
    }

    /// Reply shape expected from the configured server
    pub fn capability(&self) -> ServerCapability {
        self.config.server.capability()
    }

    /// Get the logging level implied by flags and configuration
    pub fn log_level(&self) -> tracing::Level {
        if self.args.very_verbose {
            tracing::Level::TRACE
        } else if self.args.verbose {
            tracing::Level::DEBUG
        } else {
            self.config.logging.level.to_tracing_level()
        }
    }
}

fn load_replies(path: &Path) -> Result<ReplyCollection> {
    ReplyCollection::from_json_file(path)
}
