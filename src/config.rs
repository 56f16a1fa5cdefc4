// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generator configuration.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.
//!
//! ```toml
//! [conventions]
//! entity_module = "entities"
//! service_module = "services"
//!
//! [ui]
//! output_dir = "frontend/src/app/generated"
//!
//! [api]
//! auth_guard = "crate::auth::CurrentUser"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ScaffoldError};

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Naming conventions used to classify discovered classes.
    pub conventions: Conventions,
    /// UI artifact settings.
    pub ui:          UiConfig,
    /// API artifact settings.
    pub api:         ApiConfig
}

impl ScaffoldConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] on malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Io`] when the file cannot be read and
    /// [`ScaffoldError::Config`] when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;
        Self::from_toml_str(&source)
    }
}

/// Module naming conventions.
///
/// A class's role is the last segment of its module path: `shop::entities`
/// holds entities, `shop::services` holds services.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Conventions {
    /// Last module segment of entity classes.
    pub entity_module:                    String,
    /// Last module segment of service classes.
    pub service_module:                   String,
    /// Last module segment of hand-written DTO classes.
    pub dto_module:                       String,
    /// Base type prefix marking an entity read-only.
    pub read_only_base:                   String,
    /// Base type substring marking a business service.
    pub business_service_marker:          String,
    /// Base type substring excluding a class from business service lookup.
    pub business_service_excluded_marker: String,
    /// Id type used when a base type carries no generic argument.
    pub default_id_type:                  String
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            entity_module:                    "entities".to_string(),
            service_module:                   "services".to_string(),
            dto_module:                       "dto".to_string(),
            read_only_base:                   "ReadonlyObject".to_string(),
            business_service_marker:          "BusinessServiceGenerated".to_string(),
            business_service_excluded_marker: "AuthorizationBusinessServiceGenerated".to_string(),
            default_id_type:                  "i64".to_string()
        }
    }
}

/// UI artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Generate UI artifacts at all.
    pub enabled:               bool,
    /// Fewer calling-project classes than this skip the UI pass.
    pub min_classes:           usize,
    /// Output directory, relative to the calling project.
    pub output_dir:            PathBuf,
    /// Fraction digits of decimal controls without a precision attribute.
    pub default_decimal_scale: u32
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            enabled:               true,
            min_classes:           2,
            output_dir:            PathBuf::from("ui/generated"),
            default_decimal_scale: 2
        }
    }
}

/// API artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Generate API artifacts at all.
    pub enabled:     bool,
    /// Fewer calling-project classes than this skip the API pass.
    pub min_classes: usize,
    /// Output directory, relative to the calling project.
    pub output_dir:  PathBuf,
    /// Extractor type required by authorized handlers.
    pub auth_guard:  String,
    /// Module holding `{Entity}Dto` and `{Entity}SaveBody` types.
    pub dto_path:    String,
    /// Path of the runtime support crate.
    pub core_path:   String
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled:     true,
            min_classes: 1,
            output_dir:  PathBuf::from("src/controllers"),
            auth_guard:  "crate::auth::AuthGuard".to_string(),
            dto_path:    "crate::dto".to_string(),
            core_path:   "entity_scaffold_core".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_defaults() {
        let config = ScaffoldConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScaffoldConfig::default());
        assert_eq!(config.ui.min_classes, 2);
        assert_eq!(config.api.min_classes, 1);
        assert_eq!(config.conventions.entity_module, "entities");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ScaffoldConfig::from_toml_str(
            r#"
            [ui]
            output_dir = "web/app/generated"
            default_decimal_scale = 4

            [api]
            auth_guard = "crate::auth::CurrentUser"
            "#
        )
        .unwrap();
        assert_eq!(config.ui.output_dir, PathBuf::from("web/app/generated"));
        assert_eq!(config.ui.default_decimal_scale, 4);
        assert!(config.ui.enabled);
        assert_eq!(config.api.auth_guard, "crate::auth::CurrentUser");
        assert_eq!(config.api.dto_path, "crate::dto");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ScaffoldConfig::from_toml_str("[ui]\ncolour = true\n").unwrap_err();
        assert!(matches!(err, ScaffoldError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScaffoldConfig::load("/definitely/not/here/scaffold.toml").unwrap_err();
        assert!(matches!(err, ScaffoldError::Io { .. }));
    }
}
