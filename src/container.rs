//! Declarative service registration
//!
//! The host application owns a service container that instantiates and
//! wires objects. This module only decides names and bindings: one
//! definition per validator, each referencing its processor service, plus a
//! `default_validator` alias when a default is configured.
//!
//! ```text
//! markup_validator.{name}_validator  ->  markup_validator.{alias}_processor
//! default_validator                  ->  markup_validator.{default}_validator
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigFragment, ConfigMerger};
use crate::error::BuildResult;
use crate::processor::ProcessorResolver;
use crate::registry::{Registry, RegistryBuilder};

/// Namespace (and configuration alias) of the extension
pub const DEFAULT_NAMESPACE: &str = "markup_validator";

/// Alias registered for the default validator
pub const DEFAULT_VALIDATOR_ALIAS: &str = "default_validator";

/// Class used for validator definitions unless the host overrides it
pub const DEFAULT_VALIDATOR_CLASS: &str = "MarkupValidator";

/// `<namespace>.<name>_validator`
pub fn validator_service_id(namespace: &str, name: &str) -> String {
    format!("{}.{}_validator", namespace, name)
}

/// `<namespace>.<alias>_processor`
pub fn processor_service_id(namespace: &str, alias: &str) -> String {
    format!("{}.{}_processor", namespace, alias)
}

/// `<namespace>.validator.class`
pub fn validator_class_parameter(namespace: &str) -> String {
    format!("{}.validator.class", namespace)
}

/// Named reference to another service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Declarative description of a service to instantiate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub class: String,
    pub arguments: Vec<Reference>,
}

impl Definition {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: Reference) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Service container the registry is declared into
pub trait ServiceContainer {
    fn parameter(&self, name: &str) -> Option<&str>;
    fn set_parameter(&mut self, name: String, value: String);
    fn set_definition(&mut self, id: String, definition: Definition);
    fn set_alias(&mut self, alias: String, id: String);
}

/// In-memory [`ServiceContainer`] recording registrations in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerBuilder {
    parameters: BTreeMap<String, String>,
    definitions: Vec<(String, Definition)>,
    aliases: BTreeMap<String, String>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions
            .iter()
            .find(|(known, _)| known == id)
            .map(|(_, definition)| definition)
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions
            .iter()
            .map(|(id, definition)| (id.as_str(), definition))
    }

    pub fn alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, id)| (alias.as_str(), id.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.aliases.is_empty()
    }
}

impl ServiceContainer for ContainerBuilder {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    fn set_parameter(&mut self, name: String, value: String) {
        self.parameters.insert(name, value);
    }

    fn set_definition(&mut self, id: String, definition: Definition) {
        match self.definitions.iter_mut().find(|(known, _)| *known == id) {
            Some((_, existing)) => *existing = definition,
            None => self.definitions.push((id, definition)),
        }
    }

    fn set_alias(&mut self, alias: String, id: String) {
        self.aliases.insert(alias, id);
    }
}

/// Wires configured validators into a service container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupValidatorExtension {
    namespace: String,
}

impl Default for MarkupValidatorExtension {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl MarkupValidatorExtension {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Namespace, also the configuration key the extension reads
    pub fn alias(&self) -> &str {
        &self.namespace
    }

    /// Merge `fragments`, build the registry and declare its services.
    ///
    /// Nothing is declared when the build fails.
    pub fn load<C, R>(
        &self,
        fragments: &[ConfigFragment],
        resolver: &R,
        container: &mut C,
    ) -> BuildResult<Registry>
    where
        C: ServiceContainer + ?Sized,
        R: ProcessorResolver + ?Sized,
    {
        let config = ConfigMerger::merge(fragments);
        let registry = RegistryBuilder::build(&config, resolver)?;
        self.register(&registry, container);
        Ok(registry)
    }

    /// Declare one definition per validator and the default alias
    pub fn register<C>(&self, registry: &Registry, container: &mut C)
    where
        C: ServiceContainer + ?Sized,
    {
        let class_parameter = validator_class_parameter(&self.namespace);
        let class = match container.parameter(&class_parameter) {
            Some(class) => class.to_string(),
            None => {
                container.set_parameter(class_parameter, DEFAULT_VALIDATOR_CLASS.to_string());
                DEFAULT_VALIDATOR_CLASS.to_string()
            }
        };

        for validator in registry.validators() {
            let id = validator_service_id(&self.namespace, validator.name());
            let processor = processor_service_id(&self.namespace, validator.processor_alias());
            debug!(service = %id, processor = %processor, "declaring validator service");

            container.set_definition(
                id,
                Definition::new(class.clone()).with_argument(Reference::new(processor)),
            );
        }

        if let Some(name) = registry.default_name() {
            container.set_alias(
                DEFAULT_VALIDATOR_ALIAS.to_string(),
                validator_service_id(&self.namespace, name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::processor::ProcessorCatalog;

    fn catalog() -> ProcessorCatalog {
        ProcessorCatalog::external(["tidy", "w3c"]).unwrap()
    }

    #[test]
    fn test_service_ids() {
        assert_eq!(
            validator_service_id(DEFAULT_NAMESPACE, "tidy"),
            "markup_validator.tidy_validator"
        );
        assert_eq!(
            processor_service_id(DEFAULT_NAMESPACE, "w3c"),
            "markup_validator.w3c_processor"
        );
        assert_eq!(
            validator_class_parameter(DEFAULT_NAMESPACE),
            "markup_validator.validator.class"
        );
    }

    #[test]
    fn test_load_declares_services() {
        let fragments = vec![
            ConfigFragment::new()
                .validator("tidy", "tidy")
                .validator("strict", "w3c"),
            ConfigFragment::with_default_validator("tidy"),
        ];
        let mut container = ContainerBuilder::new();

        let registry = MarkupValidatorExtension::default()
            .load(&fragments, &catalog(), &mut container)
            .unwrap();

        assert_eq!(registry.len(), 2);

        let ids: Vec<_> = container.definitions().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            vec![
                "markup_validator.tidy_validator",
                "markup_validator.strict_validator"
            ]
        );

        let strict = container
            .definition("markup_validator.strict_validator")
            .unwrap();
        assert_eq!(strict.class, DEFAULT_VALIDATOR_CLASS);
        assert_eq!(
            strict.arguments,
            vec![Reference::new("markup_validator.w3c_processor")]
        );

        assert_eq!(
            container.alias(DEFAULT_VALIDATOR_ALIAS),
            Some("markup_validator.tidy_validator")
        );
    }

    #[test]
    fn test_load_without_default_declares_no_alias() {
        let fragments = vec![ConfigFragment::new().validator("tidy", "tidy")];
        let mut container = ContainerBuilder::new();

        MarkupValidatorExtension::default()
            .load(&fragments, &catalog(), &mut container)
            .unwrap();

        assert_eq!(container.aliases().count(), 0);
    }

    #[test]
    fn test_failed_load_declares_nothing() {
        let fragments = vec![
            ConfigFragment::new()
                .validator("tidy", "tidy")
                .validator("ghost", "ghost"),
        ];
        let mut container = ContainerBuilder::new();

        let err = MarkupValidatorExtension::default()
            .load(&fragments, &catalog(), &mut container)
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::UnknownProcessor { .. }));
        assert!(container.is_empty());
    }

    #[test]
    fn test_host_validator_class_is_kept() {
        let mut container = ContainerBuilder::new();
        container.set_parameter(
            "acme.validator.class".to_string(),
            "Acme\\Validator".to_string(),
        );

        MarkupValidatorExtension::new("acme")
            .load(
                &[ConfigFragment::new().validator("tidy", "tidy")],
                &catalog(),
                &mut container,
            )
            .unwrap();

        let definition = container.definition("acme.tidy_validator").unwrap();
        assert_eq!(definition.class, "Acme\\Validator");
        assert_eq!(
            definition.arguments,
            vec![Reference::new("acme.tidy_processor")]
        );
    }

    #[test]
    fn test_set_definition_replaces_in_place() {
        let mut container = ContainerBuilder::new();
        container.set_definition("a".to_string(), Definition::new("A"));
        container.set_definition("b".to_string(), Definition::new("B"));
        container.set_definition("a".to_string(), Definition::new("C"));

        let definitions: Vec<_> = container
            .definitions()
            .map(|(id, definition)| (id, definition.class.as_str()))
            .collect();
        assert_eq!(definitions, vec![("a", "C"), ("b", "B")]);
    }

    #[test]
    fn test_reference_display() {
        assert_eq!(
            Reference::new("markup_validator.tidy_processor").to_string(),
            "@markup_validator.tidy_processor"
        );
    }
}
