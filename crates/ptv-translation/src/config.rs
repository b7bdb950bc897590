//! Engine configuration
//!
//! Configuration is loaded from YAML or JSON files (selected by extension) or
//! from strings, then validated before an engine is built from it.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::reference::{Language, ReferenceRow, ReferenceType};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use uuid::Uuid;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Copy unmapped same-named scalar fields unless a definition opts out
    pub auto_translation: bool,

    /// First order number used by ordered collections without an explicit origin
    pub order_origin: i32,

    /// Language used on single-language read paths when the request has none
    pub default_language: Option<String>,

    /// Warm the reference-data cache when the engine is built
    pub populate_on_start: bool,

    /// Seed rows for the static reference-data source: table -> code -> id
    pub reference_data: BTreeMap<String, BTreeMap<String, Uuid>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_translation: true,
            order_origin: 0,
            default_language: None,
            populate_on_start: true,
            reference_data: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a `.yaml`, `.yml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(Error::configuration(format!(
                "Unsupported configuration format for '{}'. Expected .yaml, .yml, or .json",
                path.display()
            ))),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        for (table, entries) in &self.reference_data {
            let mut seen = HashSet::new();
            for (code, id) in entries {
                if !seen.insert(*id) {
                    return Err(Error::configuration(format!(
                        "Reference table '{}' assigns id {} to more than one code (second: '{}')",
                        table, id, code
                    )));
                }
            }
        }

        if let Some(language) = &self.default_language {
            let known = self
                .reference_data
                .get(Language::TABLE)
                .map_or(false, |languages| languages.contains_key(language));
            if !known {
                return Err(Error::configuration(format!(
                    "Default language '{}' is not present in the '{}' table",
                    language,
                    Language::TABLE
                )));
            }
        }

        Ok(())
    }

    /// Add a reference row; mainly useful when building configuration in code
    pub fn with_reference(mut self, table: &str, code: &str, id: Uuid) -> Self {
        self.reference_data
            .entry(table.to_string())
            .or_default()
            .insert(code.to_string(), id);
        self
    }

    /// Flatten the seed tables into rows for the static source
    pub fn reference_rows(&self) -> Vec<ReferenceRow> {
        self.reference_data
            .iter()
            .flat_map(|(table, entries)| {
                entries.iter().map(move |(code, id)| ReferenceRow {
                    table: table.clone(),
                    code: code.clone(),
                    id: *id,
                })
            })
            .collect()
    }
}
