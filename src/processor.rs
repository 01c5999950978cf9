//! Processor capability
//!
//! Processors are the markup validation implementations validators delegate
//! to. They live outside this crate; hosts make them available by tagging
//! them into a [`ProcessorCatalog`] (or any other [`ProcessorResolver`]).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, ProcessorError, ProcessorResult};

/// Tag under which processor implementations are collected
pub const PROCESSOR_TAG: &str = "markup_validator.processor";

/// One problem reported by a processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub message: String,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            column: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{}:{}: {}", line, column, self.message),
            (Some(line), None) => write!(f, "{}: {}", line, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// A markup validation implementation.
///
/// Violations found in the markup are returned as `Ok`; an `Err` means the
/// processor could not check the markup at all.
///
/// ```
/// use markup_validator::error::{ProcessorError, ProcessorResult};
/// use markup_validator::{Processor, Violation};
///
/// struct RequireDoctype;
///
/// impl Processor for RequireDoctype {
///     fn execute(&self, markup: &str) -> ProcessorResult<Vec<Violation>> {
///         if markup.trim().is_empty() {
///             return Err(ProcessorError::Failed {
///                 details: "empty document".to_string(),
///             });
///         }
///         if markup.trim_start().starts_with("<!DOCTYPE") {
///             Ok(Vec::new())
///         } else {
///             Ok(vec![Violation::new("missing doctype").at(1, 1)])
///         }
///     }
/// }
///
/// assert!(matches!(
///     RequireDoctype.execute(""),
///     Err(ProcessorError::Failed { .. })
/// ));
/// assert_eq!(RequireDoctype.execute("<p>hi</p>").unwrap().len(), 1);
/// ```
pub trait Processor: Send + Sync {
    /// Check `markup`, returning every violation found
    fn execute(&self, markup: &str) -> ProcessorResult<Vec<Violation>>;
}

/// Shared handle to a processor instance
pub type ProcessorHandle = Arc<dyn Processor>;

/// Resolves a processor alias to a processor handle
#[cfg_attr(test, mockall::automock)]
pub trait ProcessorResolver {
    fn resolve(&self, alias: &str) -> Option<ProcessorHandle>;
}

impl<F> ProcessorResolver for F
where
    F: Fn(&str) -> Option<ProcessorHandle>,
{
    fn resolve(&self, alias: &str) -> Option<ProcessorHandle> {
        self(alias)
    }
}

/// Processor declared by the host whose implementation runs elsewhere.
///
/// It resolves like any other processor so wiring can be checked, but
/// cannot execute in this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProcessor {
    alias: String,
}

impl ExternalProcessor {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl Processor for ExternalProcessor {
    fn execute(&self, _markup: &str) -> ProcessorResult<Vec<Violation>> {
        Err(ProcessorError::Unavailable {
            alias: self.alias.clone(),
        })
    }
}

/// Processors collected under [`PROCESSOR_TAG`], keyed by alias
#[derive(Default, Clone)]
pub struct ProcessorCatalog {
    processors: Vec<(String, ProcessorHandle)>,
}

impl fmt::Debug for ProcessorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorCatalog")
            .field("aliases", &self.aliases().collect::<Vec<_>>())
            .finish()
    }
}

impl ProcessorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of [`ExternalProcessor`]s for the given aliases
    pub fn external<I, S>(aliases: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::new();
        for alias in aliases {
            let alias = alias.into();
            let processor = ExternalProcessor::new(alias.clone());
            catalog.tag(alias, processor)?;
        }
        Ok(catalog)
    }

    /// Register `processor` under `alias`
    pub fn tag(
        &mut self,
        alias: impl Into<String>,
        processor: impl Processor + 'static,
    ) -> Result<(), CatalogError> {
        self.tag_handle(alias, Arc::new(processor))
    }

    /// Register an already shared processor under `alias`
    pub fn tag_handle(
        &mut self,
        alias: impl Into<String>,
        processor: ProcessorHandle,
    ) -> Result<(), CatalogError> {
        let alias = alias.into();
        if alias.trim().is_empty() {
            return Err(CatalogError::EmptyAlias);
        }
        if self.contains(&alias) {
            return Err(CatalogError::DuplicateAlias { alias });
        }

        debug!(alias = %alias, tag = PROCESSOR_TAG, "tagged processor");
        self.processors.push((alias, processor));
        Ok(())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.processors.iter().any(|(known, _)| known == alias)
    }

    /// Aliases in registration order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.processors.iter().map(|(alias, _)| alias.as_str())
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl ProcessorResolver for ProcessorCatalog {
    fn resolve(&self, alias: &str) -> Option<ProcessorHandle> {
        self.processors
            .iter()
            .find(|(known, _)| known == alias)
            .map(|(_, processor)| Arc::clone(processor))
    }
}
