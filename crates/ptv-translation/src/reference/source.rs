//! Reference-data store collaborator
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub table: String,
    pub code: String,
    pub id: Uuid,
}

impl ReferenceRow {
    pub fn new(table: impl Into<String>, code: impl Into<String>, id: Uuid) -> Self {
        Self {
            table: table.into(),
            code: code.into(),
            id,
        }
    }
}

/// Bulk loader for every reference table
///
/// Called once when the cache is populated.
pub trait ReferenceDataSource: Send + Sync {
    fn load(&self) -> anyhow::Result<Vec<ReferenceRow>>;
}

/// Reference rows held in memory, typically seeded from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceData {
    rows: Vec<ReferenceRow>,
}

impl StaticReferenceData {
    pub fn new(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.reference_rows())
    }

    pub fn with_row(mut self, table: &str, code: &str, id: Uuid) -> Self {
        self.rows.push(ReferenceRow::new(table, code, id));
        self
    }
}

impl ReferenceDataSource for StaticReferenceData {
    fn load(&self) -> anyhow::Result<Vec<ReferenceRow>> {
        Ok(self.rows.clone())
    }
}
