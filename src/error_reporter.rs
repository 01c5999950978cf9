use crate::cli::VerbosityLevel;
use crate::error::{CatalogError, ConfigurationError, Error, LoadError};

/// Error reporter with configurable verbosity
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    /// Create a new error reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    /// Create a new error reporter that prefixes reports with a timestamp
    pub fn with_timestamps(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: true,
        }
    }

    /// Report an error to stderr
    pub fn report(&self, error: &Error) {
        eprintln!("{}", self.format_error(error));
    }

    /// Format an error with appropriate verbosity
    pub fn format_error(&self, error: &Error) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("ERROR: {}", error),
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                format!("{}{}\n{}", self.timestamp(), error, self.get_help(error))
            }
            VerbosityLevel::Debug => self.format_error_debug(error),
        }
    }

    fn timestamp(&self) -> String {
        if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }

    /// Format error for debug output
    fn format_error_debug(&self, error: &Error) -> String {
        let mut output = format!("{}{}\n{}", self.timestamp(), error, self.get_help(error));
        output.push_str(&format!("\nDebug Info: {:?}", error));

        output.push_str("\nError Chain:");
        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }

    /// Get helpful suggestions for an error
    fn get_help(&self, error: &Error) -> String {
        match error {
            Error::Configuration(err) => self.get_configuration_help(err),
            Error::Load(err) => self.get_load_help(err),
            Error::Catalog(CatalogError::EmptyAlias) => {
                "Give every tagged processor a non-empty alias".to_string()
            }
            Error::Catalog(CatalogError::DuplicateAlias { alias }) => {
                format!("Tag only one processor with the alias '{}'", alias)
            }
        }
    }

    fn get_configuration_help(&self, error: &ConfigurationError) -> String {
        match error {
            ConfigurationError::MissingProcessor { validator } => format!(
                "Add a 'processor' key to validators.{} in your configuration",
                validator
            ),
            ConfigurationError::UnknownProcessor { processor, .. } => format!(
                "Declare the '{}' processor (e.g. --processor {}) or fix the alias",
                processor, processor
            ),
            ConfigurationError::UnknownDefaultValidator { name } => format!(
                "Define a '{}' validator or change default_validator",
                name
            ),
        }
    }

    fn get_load_help(&self, error: &LoadError) -> String {
        match error {
            LoadError::Io(_) => "Check that the configuration file exists and is readable".to_string(),
            LoadError::TomlParsing(_) | LoadError::JsonParsing(_) => {
                "Check the configuration file syntax (TOML/JSON format expected)".to_string()
            }
            LoadError::UnsupportedFormat(_) => {
                "Use a .toml or .json configuration file".to_string()
            }
            LoadError::InvalidFormat { path, .. } => format!(
                "Expected default_validator and a validators table in {}",
                path.display()
            ),
            LoadError::Environment(_) => {
                "Fix or unset the MARKUP_VALIDATOR_* environment variables".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_processor() -> Error {
        ConfigurationError::MissingProcessor {
            validator: "tidy".to_string(),
        }
        .into()
    }

    #[test]
    fn test_quiet_report_is_one_line() {
        let reporter = ErrorReporter::new(VerbosityLevel::Quiet);
        let formatted = reporter.format_error(&missing_processor());

        assert_eq!(formatted.lines().count(), 1);
        assert!(formatted.starts_with("ERROR: Configuration error:"));
    }

    #[test]
    fn test_normal_report_includes_help() {
        let reporter = ErrorReporter::new(VerbosityLevel::Normal);
        let formatted = reporter.format_error(&missing_processor());

        assert!(formatted.contains("You must define a processor for the 'tidy' validator"));
        assert!(formatted.contains("validators.tidy"));
    }

    #[test]
    fn test_debug_report_includes_chain() {
        let reporter = ErrorReporter::new(VerbosityLevel::Debug);
        let formatted = reporter.format_error(&missing_processor());

        assert!(formatted.contains("Debug Info: Configuration(MissingProcessor"));
        assert!(formatted.contains("Error Chain:\n  1: You must define a processor"));
    }

    #[test]
    fn test_timestamps() {
        let reporter = ErrorReporter::with_timestamps(VerbosityLevel::Normal);
        let formatted = reporter.format_error(&missing_processor());

        assert!(formatted.starts_with('['));
    }

    #[test]
    fn test_unknown_processor_help() {
        let reporter = ErrorReporter::new(VerbosityLevel::Verbose);
        let error: Error = ConfigurationError::UnknownProcessor {
            validator: "x".to_string(),
            processor: "ghost".to_string(),
        }
        .into();

        assert!(reporter.format_error(&error).contains("--processor ghost"));
    }
}
