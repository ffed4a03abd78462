//! Command system configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! shared_context_name = "SharedContext"
//! protected_change_string = "***PROTECTED***"
//! exec_dir = "cfg"
//!
//! [format]
//! decimal_separator = "."
//!
//! [logging]
//! profile = "production"
//! ```

use crate::errors::Result;
use crate::format::FormatProvider;
use crate::logging_facility::Profile;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SHARED_CONTEXT_NAME: &str = "SharedContext";
pub const DEFAULT_PROTECTED_CHANGE_STRING: &str = "***PROTECTED***";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommandSystemConfig {
    /// Name of the root context every other context shares
    pub shared_context_name: String,
    /// Default text shown instead of protected values in change logs
    pub protected_change_string: String,
    /// Base directory `exec` resolves script names against
    pub exec_dir: PathBuf,
    pub format: FormatProvider,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
}

impl Default for CommandSystemConfig {
    fn default() -> Self {
        Self {
            shared_context_name: DEFAULT_SHARED_CONTEXT_NAME.to_string(),
            protected_change_string: DEFAULT_PROTECTED_CHANGE_STRING.to_string(),
            exec_dir: PathBuf::from("."),
            format: FormatProvider::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CommandSystemConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Config` when the text is not valid TOML, has
    /// fields of the wrong type, or gives equal decimal and group separators.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Io` when the file cannot be read and
    /// `CommandError::Config` when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
