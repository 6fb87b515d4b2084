//! Job configuration loading
//!
//! Loads the YAML job file, applies defaults and validates the target/process
//! graph. Credential environment variables are checked eagerly so a long run
//! cannot fail on its first request.

use iopairs_domain::{Process, Target};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML
    #[error("Failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("{field} is required for {entity}: {id}")]
    MissingField {
        /// "target" or "process"
        entity: &'static str,
        /// Name of the entity, or its position when the name itself is missing
        id: String,
        /// Missing field
        field: &'static str,
    },

    /// Two targets share a name
    #[error("Duplicate target name: {0}")]
    DuplicateTarget(String),

    /// A process references a target that is not defined
    #[error("Target not found: {target} (referenced by process {process})")]
    UnknownTarget {
        /// Referencing process
        process: String,
        /// Missing target name
        target: String,
    },

    /// Credential environment variable is not set
    #[error("api_key_env {env} of target {target} is not set in .env or the environment")]
    MissingCredential {
        /// Target name
        target: String,
        /// Environment variable name
        env: String,
    },
}

impl ConfigError {
    /// Whether the file could not be read or parsed
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ConfigError::Read { .. } | ConfigError::Parse(_))
    }

    /// Whether the file parsed but violates an invariant
    pub fn is_validation_error(&self) -> bool {
        !self.is_parse_error()
    }
}

/// Job configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Endpoints processes can call
    #[serde(default)]
    pub targets: Vec<Target>,

    /// Jobs, run in declaration order
    #[serde(default)]
    pub processes: Vec<Process>,

    /// Directory relative paths resolve against
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Config {
    /// Load, default and validate a configuration file
    ///
    /// Relative paths in the file resolve against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let config = Self::from_yaml_str(&contents)?.with_base_dir(base_dir);
        config.validate_with(|name| std::env::var(name).ok())?;

        debug!(
            "Loaded {} targets and {} processes from {}",
            config.targets.len(),
            config.processes.len(),
            path.display()
        );

        Ok(config)
    }

    /// Parse YAML and apply defaults, without validation
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_yaml::from_str(yaml)?;
        config.apply_defaults();
        Ok(config)
    }

    /// Set the directory relative paths resolve against
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Directory relative paths resolve against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Replace unset process values with their defaults
    pub fn apply_defaults(&mut self) {
        for process in &mut self.processes {
            process.apply_defaults();
        }
    }

    /// Validate invariants, looking up credentials with `env`
    pub fn validate_with<F>(&self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut names = HashSet::new();

        for (idx, target) in self.targets.iter().enumerate() {
            let id = entity_id(&target.name, idx);
            require("target", &id, "name", &target.name)?;
            require("target", &id, "api_url", &target.api_url)?;
            require("target", &id, "api_key_env", &target.api_key_env)?;

            if !names.insert(target.name.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.name.clone()));
            }

            if env(&target.api_key_env).map_or(true, |value| value.is_empty()) {
                return Err(ConfigError::MissingCredential {
                    target: target.name.clone(),
                    env: target.api_key_env.clone(),
                });
            }
        }

        for (idx, process) in self.processes.iter().enumerate() {
            let id = entity_id(&process.name, idx);
            require("process", &id, "name", &process.name)?;
            require("process", &id, "model", &process.model)?;
            require("process", &id, "target", &process.target)?;
            require("process", &id, "system_prompt", &process.system_prompt)?;
            require("process", &id, "user_prompt", &process.user_prompt)?;

            if self.target(&process.target).is_none() {
                return Err(ConfigError::UnknownTarget {
                    process: process.name.clone(),
                    target: process.target.clone(),
                });
            }
        }

        Ok(())
    }

    /// Look up a target by name
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|target| target.name == name)
    }
}

fn entity_id(name: &str, idx: usize) -> String {
    if name.is_empty() {
        format!("#{}", idx)
    } else {
        name.to_string()
    }
}

fn require(entity: &'static str, id: &str, field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField {
            entity,
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}
