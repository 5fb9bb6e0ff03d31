//! Configuration
//!
//! [`ClayConfig`] can be built in code with the `with_*` methods or parsed
//! from TOML:
//!
//! ```toml
//! to_string_member = "describe"
//!
//! [factory]
//! property_store = true
//! ```

use crate::error::{ClayError, Result};
use serde::{Deserialize, Serialize};

/// Member invoked for string conversion unless configured otherwise
pub const DEFAULT_TO_STRING_MEMBER: &str = "to_string";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClayConfig {
    /// Member invoked when an object is converted to text
    pub to_string_member: String,
    /// Auto-vivification settings
    pub factory: FactoryConfig,
}

impl ClayConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With string-conversion member
    #[inline]
    #[must_use]
    pub fn with_to_string_member(mut self, member: impl Into<String>) -> Self {
        self.to_string_member = member.into();
        self
    }

    /// With factory settings
    #[inline]
    #[must_use]
    pub fn with_factory(mut self, factory: FactoryConfig) -> Self {
        self.factory = factory;
        self
    }

    /// Parse from TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// [`ClayError::Config`] if the text is not valid TOML for this shape, or
    /// if the string-conversion member is empty.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ClayError::Config(e.to_string()))?;
        if config.to_string_member.is_empty() {
            return Err(ClayError::Config(
                "to_string_member must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

impl Default for ClayConfig {
    fn default() -> Self {
        Self {
            to_string_member: DEFAULT_TO_STRING_MEMBER.to_string(),
            factory: FactoryConfig::default(),
        }
    }
}

/// Settings for objects produced by [`DynamicFactory`](crate::DynamicFactory)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Give every new object its own property store
    pub property_store: bool,
}

impl FactoryConfig {
    /// Create default factory configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With or without a per-object property store
    #[inline]
    #[must_use]
    pub fn with_property_store(mut self, enabled: bool) -> Self {
        self.property_store = enabled;
        self
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            property_store: true,
        }
    }
}
