//! Wiring Output
//!
//! This module renders a built registry and its declared services.

use serde::Serialize;
use serde_json::Value;

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::container::{ContainerBuilder, DEFAULT_VALIDATOR_ALIAS, validator_service_id};
use crate::registry::Registry;

/// Serializable view of one wired validator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorSummary {
    pub name: String,
    pub service: String,
    pub processor: String,
    pub processor_service: String,
    pub options: Value,
}

/// Serializable view of the whole wiring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WiringSummary {
    pub default_validator: Option<String>,
    pub default_alias: Option<String>,
    pub validators: Vec<ValidatorSummary>,
}

impl WiringSummary {
    pub fn new(namespace: &str, registry: &Registry, container: &ContainerBuilder) -> Self {
        let validators = registry
            .validators()
            .map(|validator| {
                let service = validator_service_id(namespace, validator.name());
                let processor_service = container
                    .definition(&service)
                    .and_then(|definition| definition.arguments.first())
                    .map(|reference| reference.id().to_string())
                    .unwrap_or_default();

                ValidatorSummary {
                    name: validator.name().to_string(),
                    service,
                    processor: validator.processor_alias().to_string(),
                    processor_service,
                    options: validator.options().clone(),
                }
            })
            .collect();

        Self {
            default_validator: registry.default_name().map(str::to_string),
            default_alias: container.alias(DEFAULT_VALIDATOR_ALIAS).map(str::to_string),
            validators,
        }
    }
}

/// Simple output formatter for the resolved wiring
pub struct Output {
    verbosity: VerbosityLevel,
    format: OutputFormat,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel, format: OutputFormat) -> Self {
        Self {
            verbosity,
            format,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.show_colors = false;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_wiring(&self, summary: &WiringSummary) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary),
            OutputFormat::Human => Ok(self.format_human(summary)),
        }
    }

    fn format_human(&self, summary: &WiringSummary) -> String {
        let mut output = String::new();

        if self.verbosity == VerbosityLevel::Quiet {
            return output;
        }

        output.push_str(&format!(
            "{} {} validator{}\n",
            self.colorize("✓ WIRED", "32"),
            summary.validators.len(),
            if summary.validators.len() == 1 { "" } else { "s" }
        ));

        for validator in &summary.validators {
            output.push_str(&format!(
                "  {} -> {}\n",
                validator.service, validator.processor_service
            ));

            if self.verbosity >= VerbosityLevel::Verbose {
                output.push_str(&self.format_options(&validator.options));
            }
        }

        match &summary.default_alias {
            Some(service) => output.push_str(&format!(
                "  {} -> {}\n",
                self.colorize(DEFAULT_VALIDATOR_ALIAS, "36"),
                service
            )),
            None => output.push_str("  (no default validator)\n"),
        }

        output
    }

    fn format_options(&self, options: &Value) -> String {
        let mut output = String::new();
        match options.as_object() {
            Some(options) => {
                for (key, value) in options {
                    output.push_str(&format!("      {} = {}\n", key, value));
                }
            }
            None => output.push_str(&format!("      {}\n", options)),
        }
        output
    }
}
