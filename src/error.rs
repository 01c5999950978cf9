use std::path::PathBuf;

use thiserror::Error;

/// Main error type that encompasses every failure mode of the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Configuration loading error: {0}")]
    Load(#[from] LoadError),

    #[error("Processor catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Registry construction errors.
///
/// All of these are fatal to startup: the registry is never returned in a
/// partially built state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("You must define a processor for the '{validator}' validator")]
    MissingProcessor { validator: String },

    #[error("Unknown processor '{processor}' for the '{validator}' validator")]
    UnknownProcessor { validator: String, processor: String },

    #[error("Invalid default validator: there is no '{name}' validator defined")]
    UnknownDefaultValidator { name: String },
}

/// Discriminant of a [`ConfigurationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationErrorKind {
    MissingProcessor,
    UnknownProcessor,
    UnknownDefaultValidator,
}

impl ConfigurationError {
    pub fn kind(&self) -> ConfigurationErrorKind {
        match self {
            ConfigurationError::MissingProcessor { .. } => ConfigurationErrorKind::MissingProcessor,
            ConfigurationError::UnknownProcessor { .. } => ConfigurationErrorKind::UnknownProcessor,
            ConfigurationError::UnknownDefaultValidator { .. } => {
                ConfigurationErrorKind::UnknownDefaultValidator
            }
        }
    }

    /// Name of the validator the error is about
    pub fn validator(&self) -> &str {
        match self {
            ConfigurationError::MissingProcessor { validator }
            | ConfigurationError::UnknownProcessor { validator, .. } => validator,
            ConfigurationError::UnknownDefaultValidator { name } => name,
        }
    }
}

/// Errors raised while turning configuration sources into fragments
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration format: {path} - {details}")]
    InvalidFormat { path: PathBuf, details: String },

    #[error("Environment variable error: {0}")]
    Environment(String),
}

/// Errors raised while collecting tagged processors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Processor alias cannot be empty")]
    EmptyAlias,

    #[error("Processor alias already registered: {alias}")]
    DuplicateAlias { alias: String },
}

/// Errors reported by processor implementations from
/// [`Processor::execute`](crate::processor::Processor::execute)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Processor '{alias}' is not available in this process")]
    Unavailable { alias: String },

    #[error("Processor failed: {details}")]
    Failed { details: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Registry build result type alias
pub type BuildResult<T> = std::result::Result<T, ConfigurationError>;

/// Loader result type alias
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Processor result type alias
pub type ProcessorResult<T> = std::result::Result<T, ProcessorError>;
