//! Configuration fragments and their merge into a normalized configuration
//!
//! A fragment is one partial configuration source (a file, the environment,
//! the command line). Fragments are merged in order, later ones overriding
//! earlier ones field by field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Key naming the processor a validator is bound to
pub const PROCESSOR_KEY: &str = "processor";

/// One partial configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConfigFragment {
    /// Default validator name (underscored spelling)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_validator: Option<String>,
    /// Default validator name (hyphenated spelling, wins over the underscored one)
    #[serde(
        default,
        rename = "default-validator",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_validator_hyphenated: Option<String>,
    /// Validator name -> options
    #[serde(
        default,
        deserialize_with = "mapping_or_skip",
        skip_serializing_if = "Option::is_none"
    )]
    pub validators: Option<Map<String, Value>>,
}

/// A `validators` value that is not a mapping is ignored
fn mapping_or_skip<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(validators)) => Ok(Some(validators)),
        None | Some(Value::Null) => Ok(None),
        Some(other) => {
            warn!(value = %other, "ignoring non-mapping validators entry");
            Ok(None)
        }
    }
}

impl ConfigFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment that only sets the default validator
    pub fn with_default_validator(name: impl Into<String>) -> Self {
        Self {
            default_validator: Some(name.into()),
            ..Self::default()
        }
    }

    /// Add a validator bound to `processor`
    pub fn validator(mut self, name: impl Into<String>, processor: impl Into<String>) -> Self {
        let mut options = Map::new();
        options.insert(PROCESSOR_KEY.to_string(), Value::String(processor.into()));
        self.validators
            .get_or_insert_with(Map::new)
            .insert(name.into(), Value::Object(options));
        self
    }

    /// Add a validator with raw options
    pub fn validator_options(mut self, name: impl Into<String>, options: Value) -> Self {
        self.validators
            .get_or_insert_with(Map::new)
            .insert(name.into(), options);
        self
    }

    /// Default validator defined by this fragment, if any.
    ///
    /// When both spellings are present the hyphenated one is used.
    pub fn defined_default_validator(&self) -> Option<&str> {
        self.default_validator_hyphenated
            .as_deref()
            .or(self.default_validator.as_deref())
    }
}

/// Result of merging every fragment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NormalizedConfig {
    pub default_validator: Option<String>,
    /// Insertion-ordered validator name -> options
    pub validators: Map<String, Value>,
}

impl NormalizedConfig {
    /// Validators in declaration order
    pub fn validators(&self) -> impl Iterator<Item = ValidatorSpec<'_>> {
        self.validators
            .iter()
            .map(|(name, options)| ValidatorSpec { name, options })
    }

    pub fn validator(&self, name: &str) -> Option<ValidatorSpec<'_>> {
        self.validators().find(|spec| spec.name == name)
    }

    /// Configured default validator, treating an empty name as unset
    pub fn effective_default_validator(&self) -> Option<&str> {
        self.default_validator
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// Borrowed view of one `validators` entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorSpec<'a> {
    pub name: &'a str,
    pub options: &'a Value,
}

impl<'a> ValidatorSpec<'a> {
    /// Processor alias, if present as a non-empty string
    pub fn processor(&self) -> Option<&'a str> {
        self.option(PROCESSOR_KEY)
            .and_then(Value::as_str)
            .filter(|alias| !alias.is_empty())
    }

    pub fn option(&self, key: &str) -> Option<&'a Value> {
        self.options.as_object().and_then(|options| options.get(key))
    }
}

/// Merges ordered configuration fragments
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge fragments from earliest to latest.
    ///
    /// The last fragment defining the default validator wins. Options of a
    /// validator seen in several fragments are merged key by key. Malformed
    /// entries are passed through for the registry builder to reject.
    pub fn merge<'a, I>(fragments: I) -> NormalizedConfig
    where
        I: IntoIterator<Item = &'a ConfigFragment>,
    {
        let mut merged = NormalizedConfig::default();

        for (index, fragment) in fragments.into_iter().enumerate() {
            if let Some(name) = fragment.defined_default_validator() {
                merged.default_validator = Some(name.to_string());
            }

            let Some(validators) = &fragment.validators else {
                debug!(fragment = index, "fragment defines no validators");
                continue;
            };

            debug!(
                fragment = index,
                validators = validators.len(),
                "merging configuration fragment"
            );

            for (name, options) in validators {
                match merged.validators.get_mut(name) {
                    Some(existing) => Self::merge_options(name, existing, options),
                    None => {
                        merged.validators.insert(name.clone(), options.clone());
                    }
                }
            }
        }

        merged
    }

    fn merge_options(name: &str, existing: &mut Value, options: &Value) {
        match (existing, options) {
            (Value::Object(existing), Value::Object(options)) => {
                for (key, value) in options {
                    existing.insert(key.clone(), value.clone());
                }
            }
            (existing, options) => {
                warn!(validator = name, "replacing non-mapping validator options");
                *existing = options.clone();
            }
        }
    }
}
