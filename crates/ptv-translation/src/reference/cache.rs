//! Read-through cache over the reference tables
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use super::{ReferenceDataSource, ReferenceType};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use uuid::Uuid;

/// Both directions of one reference table
#[derive(Debug, Default)]
struct ReferenceTable {
    by_code: HashMap<String, Uuid>,
    by_id: HashMap<Uuid, String>,
}

/// Cache of every reference table, populated once per process
///
/// Population happens either explicitly through [`populate`](Self::populate)
/// or lazily on the first lookup. Concurrent first use is serialized by a
/// double-checked lock so the source is scanned exactly once; after that all
/// reads go to an immutable map without locking. Entries are never
/// invalidated.
pub struct ReferenceDataCache {
    source: Box<dyn ReferenceDataSource>,
    tables: OnceLock<HashMap<String, ReferenceTable>>,
    populate_lock: Mutex<()>,
    loads: AtomicUsize,
}

impl ReferenceDataCache {
    pub fn new(source: impl ReferenceDataSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            tables: OnceLock::new(),
            populate_lock: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Scan the backing tables now instead of on first use
    pub fn populate(&self) -> Result<()> {
        self.tables().map(|_| ())
    }

    pub fn is_populated(&self) -> bool {
        self.tables.get().is_some()
    }

    /// Number of times the source has been scanned
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Resolve a stable code to its generated id
    pub fn get<T: ReferenceType>(&self, code: &str) -> Result<Uuid> {
        self.table::<T>()?
            .and_then(|table| table.by_code.get(code).copied())
            .ok_or_else(|| Error::UnknownReferenceCode {
                table: T::TABLE,
                code: code.to_string(),
            })
    }

    /// Resolve a generated id back to its stable code
    pub fn get_by_value<T: ReferenceType>(&self, id: Uuid) -> Result<&str> {
        self.table::<T>()?
            .and_then(|table| table.by_id.get(&id))
            .map(String::as_str)
            .ok_or(Error::UnknownReferenceId { table: T::TABLE, id })
    }

    /// Check whether `id` is the id registered for `code`
    ///
    /// An unknown code is a configuration error, not a mismatch.
    pub fn compare<T: ReferenceType>(&self, id: Uuid, code: &str) -> Result<bool> {
        Ok(self.get::<T>(code)? == id)
    }

    /// All codes of a table, sorted
    pub fn codes<T: ReferenceType>(&self) -> Result<Vec<&str>> {
        let mut codes: Vec<&str> = self
            .table::<T>()?
            .map(|table| table.by_code.keys().map(String::as_str).collect())
            .unwrap_or_default();
        codes.sort_unstable();
        Ok(codes)
    }

    fn table<T: ReferenceType>(&self) -> Result<Option<&ReferenceTable>> {
        Ok(self.tables()?.get(T::TABLE))
    }

    fn tables(&self) -> Result<&HashMap<String, ReferenceTable>> {
        if let Some(tables) = self.tables.get() {
            return Ok(tables);
        }

        let _guard = self.populate_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tables) = self.tables.get() {
            return Ok(tables);
        }

        let loaded = self.load()?;
        Ok(self.tables.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<HashMap<String, ReferenceTable>> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let rows = self.source.load().map_err(|source| Error::ReferenceDataUnavailable {
            message: "reference-data source failed to load".to_string(),
            source: Some(source),
        })?;

        let mut tables: HashMap<String, ReferenceTable> = HashMap::new();
        for row in rows {
            let table = tables.entry(row.table.clone()).or_default();

            if table.by_code.insert(row.code.clone(), row.id).is_some() {
                return Err(Error::ReferenceDataUnavailable {
                    message: format!("code '{}' appears twice in table '{}'", row.code, row.table),
                    source: None,
                });
            }
            if table.by_id.insert(row.id, row.code.clone()).is_some() {
                return Err(Error::ReferenceDataUnavailable {
                    message: format!("id {} appears twice in table '{}'", row.id, row.table),
                    source: None,
                });
            }
        }

        log::info!(
            "Populated reference data cache: {} tables, {} entries",
            tables.len(),
            tables.values().map(|table| table.by_code.len()).sum::<usize>()
        );

        Ok(tables)
    }
}

impl fmt::Debug for ReferenceDataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceDataCache")
            .field("populated", &self.is_populated())
            .field("loads", &self.load_count())
            .finish()
    }
}
