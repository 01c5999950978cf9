//! Validator registry
//!
//! [`RegistryBuilder::build`] turns a [`NormalizedConfig`] into an immutable
//! [`Registry`], binding every configured validator to its processor and
//! checking the default validator against the bound names. The first
//! configuration problem aborts the build.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::NormalizedConfig;
use crate::error::{BuildResult, ConfigurationError, ProcessorResult};
use crate::processor::{ProcessorHandle, ProcessorResolver, Violation};

/// Outcome of running a validator over one markup document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub validator: String,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A validator bound to its processor
#[derive(Clone)]
pub struct ValidatorHandle {
    name: String,
    processor_alias: String,
    processor: ProcessorHandle,
    options: Value,
}

impl fmt::Debug for ValidatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorHandle")
            .field("name", &self.name)
            .field("processor", &self.processor_alias)
            .field("options", &self.options)
            .finish()
    }
}

impl ValidatorHandle {
    pub fn new(
        name: impl Into<String>,
        processor_alias: impl Into<String>,
        processor: ProcessorHandle,
        options: Value,
    ) -> Self {
        Self {
            name: name.into(),
            processor_alias: processor_alias.into(),
            processor,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor_alias(&self) -> &str {
        &self.processor_alias
    }

    /// Options as configured, including the `processor` key
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Validate `markup` with the bound processor
    pub fn validate(&self, markup: &str) -> ProcessorResult<ValidationReport> {
        let violations = self.processor.execute(markup)?;
        debug!(
            validator = %self.name,
            violations = violations.len(),
            "validated markup"
        );
        Ok(ValidationReport {
            validator: self.name.clone(),
            violations,
        })
    }
}

/// Immutable set of bound validators with an optional default
#[derive(Debug, Clone, Default)]
pub struct Registry {
    validators: Vec<ValidatorHandle>,
    index: HashMap<String, usize>,
    default: Option<String>,
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&ValidatorHandle> {
        self.index.get(name).map(|&position| &self.validators[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Name of the default validator, if one is configured
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The default validator, if one is configured
    pub fn default_validator(&self) -> Option<&ValidatorHandle> {
        self.default.as_deref().and_then(|name| self.get(name))
    }

    /// Validators in configuration order
    pub fn validators(&self) -> impl Iterator<Item = &ValidatorHandle> {
        self.validators.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.iter().map(ValidatorHandle::name)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Builds a [`Registry`] from a normalized configuration
pub struct RegistryBuilder;

impl RegistryBuilder {
    /// Bind every configured validator and resolve the default.
    ///
    /// The resolver is asked once per validator, in configuration order.
    pub fn build<R>(config: &NormalizedConfig, resolver: &R) -> BuildResult<Registry>
    where
        R: ProcessorResolver + ?Sized,
    {
        let mut registry = Registry::default();

        for spec in config.validators() {
            let alias = spec
                .processor()
                .ok_or_else(|| ConfigurationError::MissingProcessor {
                    validator: spec.name.to_string(),
                })?;

            let processor =
                resolver
                    .resolve(alias)
                    .ok_or_else(|| ConfigurationError::UnknownProcessor {
                        validator: spec.name.to_string(),
                        processor: alias.to_string(),
                    })?;

            debug!(validator = spec.name, processor = alias, "bound validator");

            registry
                .index
                .insert(spec.name.to_string(), registry.validators.len());
            registry.validators.push(ValidatorHandle::new(
                spec.name,
                alias,
                processor,
                spec.options.clone(),
            ));
        }

        if let Some(name) = config.effective_default_validator() {
            if !registry.contains(name) {
                return Err(ConfigurationError::UnknownDefaultValidator {
                    name: name.to_string(),
                });
            }
            registry.default = Some(name.to_string());
        }

        info!(
            validators = registry.len(),
            default = registry.default_name().unwrap_or("<none>"),
            "validator registry built"
        );

        Ok(registry)
    }
}
