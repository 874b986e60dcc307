//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `minipool.toml` in the working directory, or at the path given
//! by `MINIPOOL_CONFIG`. Every section has a default so the file is optional;
//! an empty configuration builds an empty pool.

use std::collections::BTreeSet;

use serde::Deserialize;

use minipool_domain::element::ElementType;
use minipool_domain::state::ElementState;

const DEFAULT_PATH: &str = "minipool.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Virtual controllers, by name.
    pub controllers: Vec<ControllerConfig>,
    /// Physical elements, each owned by one of `controllers`.
    pub elements: Vec<ElementConfig>,
    /// Groups, built in declaration order.
    pub groups: Vec<GroupConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    pub name: String,
}

/// A physical element declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementConfig {
    pub name: String,
    pub kind: ElementKind,
    /// Name of the owning controller.
    pub controller: String,
    /// State the element starts in.
    #[serde(default = "initial_state")]
    pub state: ElementState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Motor,
    Counter,
}

/// A group declaration. Members are element or group names declared before
/// this group.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub kind: GroupKind,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    MotorGroup,
    MeasurementGroup,
}

impl GroupKind {
    #[must_use]
    pub fn element_type(self) -> ElementType {
        match self {
            Self::MotorGroup => ElementType::MotorGroup,
            Self::MeasurementGroup => ElementType::MeasurementGroup,
        }
    }
}

fn initial_state() -> ElementState {
    ElementState::On
}

impl Config {
    /// Load configuration from `MINIPOOL_CONFIG` or `minipool.toml` (if
    /// present), then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed or fails
    /// validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MINIPOOL_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for inconsistent declarations.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MINIPOOL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut controllers = BTreeSet::new();
        for controller in &self.controllers {
            if controller.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "controller name must not be empty".to_string(),
                ));
            }
            if !controllers.insert(controller.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "controller {:?} is declared twice",
                    controller.name
                )));
            }
        }

        let mut names = BTreeSet::new();
        let declared = self
            .elements
            .iter()
            .map(|e| &e.name)
            .chain(self.groups.iter().map(|g| &g.name));
        for name in declared {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "element name must not be empty".to_string(),
                ));
            }
            if !names.insert(name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "element {name:?} is declared twice"
                )));
            }
        }

        for element in &self.elements {
            if !controllers.contains(element.controller.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "element {:?} references unknown controller {:?}",
                    element.name, element.controller
                )));
            }
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "minipoold=info,minipool=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
