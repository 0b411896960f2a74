//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::drivers::DialectImpl;
use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Resolve the SQL dialect for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedDialect` for backends without SQL.
    pub fn dialect(&self) -> Result<DialectImpl> {
        DialectImpl::from_db_type(self.db_type)
    }
}
