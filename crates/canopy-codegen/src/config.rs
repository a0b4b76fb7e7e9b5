//! Conversion options.

use canopy_core::errors::ConfigError;
use canopy_core::tokens::DesignTokens;
use canopy_style::Backend;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Options for one conversion run.
///
/// Parsed from camelCase JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    pub backend: Backend,
    /// Reference tokens through a theme instead of inlining their values.
    pub themed: bool,
    /// Spaces per indentation level in generated markup.
    pub indent: usize,
    /// Emit `.tsx` with a props interface instead of `.jsx`.
    pub typescript: bool,
    /// Timestamp written into the `@generated` header.
    pub timestamp: Option<String>,
    /// Source node ids to convert. Empty means every top-level component.
    pub targets: Vec<String>,
    /// Directory of generated components, relative to the output root.
    pub components_dir: String,
    /// Public path images and icons are served from.
    pub asset_base: String,
    /// Asset file names by source node id.
    pub assets: IndexMap<String, String>,
    /// Token table; the built-in scale when absent.
    pub tokens: Option<DesignTokens>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            themed: false,
            indent: 2,
            typescript: true,
            timestamp: None,
            targets: Vec::new(),
            components_dir: "components".to_string(),
            asset_base: "/assets".to_string(),
            assets: IndexMap::new(),
            tokens: None,
        }
    }
}

impl ConvertOptions {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: ConvertOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent == 0 || self.indent > 8 {
            return Err(invalid("indent", format!("expected 1 to 8 spaces, got {}", self.indent)));
        }
        if self.components_dir.trim().is_empty() {
            return Err(invalid("componentsDir", "must not be empty"));
        }
        if let Some(tokens) = &self.tokens {
            tokens.validate().map_err(|e| invalid("tokens", e.to_string()))?;
        }
        Ok(())
    }

    /// One indentation level.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent)
    }

    pub fn component_ext(&self) -> &'static str {
        if self.typescript {
            "tsx"
        } else {
            "jsx"
        }
    }

    pub fn module_ext(&self) -> &'static str {
        if self.typescript {
            "ts"
        } else {
            "js"
        }
    }

    /// Public URL of an asset file.
    pub fn asset_url(&self, file: &str) -> String {
        format!("{}/{}", self.asset_base.trim_end_matches('/'), file.trim_start_matches('/'))
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue { field: field.to_string(), message: message.into() }
}
