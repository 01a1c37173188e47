//! Configuration file support for bit-deps.
//!
//! Provides YAML-based configuration through `bit-deps.config.yml` files:
//! override rules, the workspace dependency policy and core aspects.

use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::dependency_resolution::domain::WorkspacePolicy;
use crate::dependency_resolution::policies::OverridesConfig;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "bit-deps.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Override rules keyed by component id or wildcard pattern
    pub overrides: Option<serde_yaml_ng::Value>,
    pub workspace_policy: Option<WorkspacePolicy>,
    /// Package name -> core aspect id
    pub core_aspects: Option<BTreeMap<String, String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Configuration ready to be injected into the resolver
#[derive(Debug, Default)]
pub struct ResolverConfig {
    pub overrides: OverridesConfig,
    pub workspace_policy: WorkspacePolicy,
    pub core_aspects: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Validates the override rules and builds the resolver configuration
    ///
    /// # Errors
    /// Returns `ResolverError::InvalidOverrides` for a malformed rule
    pub fn into_resolver_config(self) -> Result<ResolverConfig> {
        let overrides = match self.overrides {
            Some(value) => {
                let value = serde_json::to_value(value)
                    .context("Failed to read the overrides section of the config file")?;
                OverridesConfig::from_value(&value)?
            }
            None => OverridesConfig::default(),
        };
        Ok(ResolverConfig {
            overrides,
            workspace_policy: self.workspace_policy.unwrap_or_default(),
            core_aspects: self.core_aspects.unwrap_or_default(),
        })
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Loads the explicit config when given, otherwise the one discovered in
/// `discovery_dir`, and builds the resolver configuration
pub fn load_resolver_config(
    explicit: Option<&Path>,
    discovery_dir: &Path,
) -> Result<ResolverConfig> {
    let config = match explicit {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(discovery_dir)?.unwrap_or_default(),
    };
    config.into_resolver_config()
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
