use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::container::DEFAULT_NAMESPACE;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
    /// Show all available debugging information
    Debug,
}

impl VerbosityLevel {
    /// Default `tracing` filter directive for this level
    pub fn log_filter(self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::Debug => "debug",
        }
    }
}

/// Output format for the resolved wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Check markup validator configuration and show the resulting service wiring
#[derive(Parser, Debug, Clone)]
#[command(name = "markup-validator")]
#[command(about = "Merge layered markup validator configuration and check its wiring")]
#[command(version)]
pub struct Cli {
    /// Configuration files, lowest precedence first
    #[arg(short = 'c', long = "config", action = clap::ArgAction::Append)]
    pub config: Vec<PathBuf>,

    /// Override the default validator
    #[arg(short = 'd', long = "default-validator")]
    pub default_validator: Option<String>,

    /// Processor aliases available to validators
    #[arg(
        short = 'p',
        long = "processor",
        action = clap::ArgAction::Append,
        default_values_t = [String::from("tidy"), String::from("w3c")]
    )]
    pub processors: Vec<String>,

    /// Prefix of every declared service id
    #[arg(long = "namespace", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        match (self.quiet, self.verbose) {
            (true, _) => VerbosityLevel::Quiet,
            (false, 0) => VerbosityLevel::Normal,
            (false, 1) => VerbosityLevel::Verbose,
            (false, _) => VerbosityLevel::Debug,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = self.config.iter().find(|path| !path.exists()) {
            return Err(format!("Configuration file does not exist: {}", path.display()));
        }
        if self.namespace.trim().is_empty() {
            return Err("Namespace cannot be empty".to_string());
        }
        Ok(())
    }
}
