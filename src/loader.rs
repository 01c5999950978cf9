//! Loading configuration fragments from files, the environment and the CLI
//!
//! Sources are returned lowest precedence first, ready for
//! [`ConfigMerger::merge`](crate::config::ConfigMerger::merge).

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::ConfigFragment;
use crate::error::{LoadError, LoadResult};

/// Environment variable overriding the default validator
pub const DEFAULT_VALIDATOR_ENV: &str = "MARKUP_VALIDATOR_DEFAULT_VALIDATOR";

/// File names looked up in each configuration directory
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "markup-validator.toml",
    "markup-validator.json",
    ".markup-validator.toml",
    ".markup-validator.json",
];

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Turns configuration sources into fragments
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load every fragment with precedence: files -> environment -> CLI
    pub async fn load_fragments(cli: &Cli) -> LoadResult<Vec<ConfigFragment>> {
        Self::load_fragments_with(cli, &SystemEnvProvider, &Self::standard_config_dirs()).await
    }

    /// Same as [`load_fragments`](Self::load_fragments) with injected
    /// environment and discovery directories
    pub async fn load_fragments_with(
        cli: &Cli,
        env: &impl EnvProvider,
        search_dirs: &[PathBuf],
    ) -> LoadResult<Vec<ConfigFragment>> {
        let mut fragments = Vec::new();

        let paths = if cli.config.is_empty() {
            Self::find_config_files_in(search_dirs)
        } else {
            cli.config.clone()
        };

        for path in &paths {
            fragments.push(Self::load_from_file(path, &cli.namespace).await?);
        }

        if let Some(fragment) = Self::environment_fragment(env)? {
            fragments.push(fragment);
        }

        if let Some(name) = &cli.default_validator {
            debug!(default_validator = %name, "default validator set on the command line");
            fragments.push(ConfigFragment::with_default_validator(name.clone()));
        }

        Ok(fragments)
    }

    /// Load one fragment from a TOML or JSON file.
    ///
    /// A top-level table named after `namespace`, when present, is the fragment.
    pub async fn load_from_file(path: &Path, namespace: &str) -> LoadResult<ConfigFragment> {
        let content = tokio::fs::read_to_string(path).await?;

        let document: Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            Some(ext) => return Err(LoadError::UnsupportedFormat(ext.to_string())),
            None => match toml::from_str(&content) {
                Ok(document) => document,
                Err(_) => serde_json::from_str(&content)?,
            },
        };

        info!(path = %path.display(), "loaded configuration file");
        Self::fragment_from_document(path, namespace, document)
    }

    /// Parse a fragment out of a loaded document
    pub fn fragment_from_document(
        path: &Path,
        namespace: &str,
        document: Value,
    ) -> LoadResult<ConfigFragment> {
        let document = match document {
            Value::Object(mut table) => match table.remove(namespace) {
                Some(section) => section,
                None => Value::Object(table),
            },
            other => other,
        };

        serde_json::from_value(document).map_err(|e| LoadError::InvalidFormat {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Existing configuration files in `dirs`, in directory order
    pub fn find_config_files_in(dirs: &[PathBuf]) -> Vec<PathBuf> {
        let found: Vec<PathBuf> = dirs
            .iter()
            .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
            .filter(|path| path.is_file())
            .collect();

        debug!(files = found.len(), "discovered configuration files");
        found
    }

    /// User configuration directory first, then the working directory
    pub fn standard_config_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            dirs.push(config_dir.join("markup-validator"));
        }
        dirs.push(PathBuf::from("."));
        dirs
    }

    /// Fragment from environment variables, if any are set.
    ///
    /// An empty default validator clears the default.
    pub fn environment_fragment(env: &impl EnvProvider) -> LoadResult<Option<ConfigFragment>> {
        match env.get(DEFAULT_VALIDATOR_ENV) {
            Some(name) if name.trim() != name => Err(LoadError::Environment(format!(
                "Invalid {} value: '{}' has surrounding whitespace",
                DEFAULT_VALIDATOR_ENV, name
            ))),
            Some(name) => Ok(Some(ConfigFragment::with_default_validator(name))),
            None => Ok(None),
        }
    }
}
