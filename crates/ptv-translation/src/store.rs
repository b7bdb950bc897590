//! Persistence-side collaborators
//!
//! The engine never issues queries itself. It reads the current state of rows
//! it has to update through [`EntityStore`], asks an [`IdGenerator`] for new
//! identifiers and a [`Clock`] for publication timestamps.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::types::Entity;
use chrono::{DateTime, Utc};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Read access to persisted entities
pub trait EntityStore: Send + Sync {
    /// Look up a row of the given entity type by id
    fn find_erased(&self, entity: TypeId, id: Uuid) -> Option<Arc<dyn Any + Send + Sync>>;
}

impl<'s> dyn EntityStore + 's {
    /// Typed lookup returning an owned copy of the stored row
    pub fn find<E>(&self, id: Uuid) -> Option<E>
    where
        E: Clone + Send + Sync + 'static,
    {
        self.find_erased(TypeId::of::<E>(), id)
            .and_then(|row| row.downcast::<E>().ok())
            .map(|row| (*row).clone())
    }
}

/// A store with no rows; every update against it is an orphan
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyStore;

impl EntityStore for EmptyStore {
    fn find_erased(&self, _entity: TypeId, _id: Uuid) -> Option<Arc<dyn Any + Send + Sync>> {
        None
    }
}

/// Process-local store keyed by entity type and id
#[derive(Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<(TypeId, Uuid), Arc<dyn Any + Send + Sync>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a row
    pub fn insert<E>(&self, entity: E)
    where
        E: Entity + Send + Sync + 'static,
    {
        let key = (TypeId::of::<E>(), entity.id());
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::new(entity));
    }

    /// Builder-style insert
    pub fn with<E>(self, entity: E) -> Self
    where
        E: Entity + Send + Sync + 'static,
    {
        self.insert(entity);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityStore for InMemoryStore {
    fn find_erased(&self, entity: TypeId, id: Uuid) -> Option<Arc<dyn Any + Send + Sync>> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(entity, id))
            .cloned()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").field("rows", &self.len()).finish()
    }
}

/// Source of new identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random version 4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic, strictly increasing identifiers
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Start issuing ids from `start`; `0` is skipped because it is the nil id
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start.max(1)),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
