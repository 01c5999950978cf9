//! # markup-validator Library
//!
//! Wires named markup validators to processor implementations from layered
//! configuration, with an optional default validator alias.

pub mod cli;
pub mod config;
pub mod container;
pub mod error;
pub mod error_reporter;
pub mod loader;
pub mod output;
pub mod processor;
pub mod registry;

pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{ConfigFragment, ConfigMerger, NormalizedConfig, ValidatorSpec};
pub use container::{
    ContainerBuilder, DEFAULT_NAMESPACE, DEFAULT_VALIDATOR_ALIAS, Definition,
    MarkupValidatorExtension, Reference, ServiceContainer, processor_service_id,
    validator_service_id,
};
pub use error::{
    CatalogError, ConfigurationError, ConfigurationErrorKind, Error, LoadError, ProcessorError,
};
pub use error_reporter::ErrorReporter;
pub use loader::{ConfigLoader, EnvProvider, SystemEnvProvider};
pub use output::{Output, WiringSummary};
pub use processor::{
    ExternalProcessor, PROCESSOR_TAG, Processor, ProcessorCatalog, ProcessorHandle,
    ProcessorResolver, Violation,
};
pub use registry::{Registry, RegistryBuilder, ValidationReport, ValidatorHandle};
