//! HAL host configuration, loaded from TOML or YAML.
//!
//! ```toml
//! [hal]
//! enabled = true
//! id_property_name = "id"
//! use_https_scheme = true
//!
//! [serializer]
//! naming_convention = "camel_case"
//! formatting = "indented"
//! ```

use std::path::Path;

use hal_core::SerializerOptions;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

/// Switches for how responses are turned into HAL documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalOptions {
    /// When false, responses pass through unchanged (paged results become a
    /// plain envelope).
    pub enabled: bool,
    /// State property that identifies an item and earns it a self link.
    pub id_property_name: String,
    /// `Some(true)` forces https links, `Some(false)` keeps the request's
    /// scheme, `None` uses https only in production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_https_scheme: Option<bool>,
}

impl Default for HalOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            id_property_name: "id".to_string(),
            use_https_scheme: None,
        }
    }
}

/// Everything a host needs: HAL switches plus serializer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalConfig {
    pub hal: HalOptions,
    pub serializer: SerializerOptions,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            hal: HalOptions::default(),
            serializer: SerializerOptions::web(),
        }
    }
}

impl HalConfig {
    /// # Errors
    ///
    /// Returns [`HostError::Config`] if the text is not valid TOML for this
    /// structure.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| HostError::Config(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`HostError::Config`] if the text is not valid YAML for this
    /// structure.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| HostError::Config(e.to_string()))
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Io`] if the file cannot be read and
    /// [`HostError::Config`] for an unknown extension or invalid content.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => {
                return Err(HostError::Config(format!(
                    "unsupported config format: {}",
                    path.display()
                )))
            }
        };

        let text = std::fs::read_to_string(path)?;
        let config = parse(&text)?;
        tracing::debug!(path = %path.display(), enabled = config.hal.enabled, "loaded HAL config");
        Ok(config)
    }
}
