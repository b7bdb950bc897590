//! Versioning and identity resolution
//!
//! Decides whether translating a view model creates or updates an entity.
//! The only signal is whether the incoming identity is set. For versioned
//! entities an update never edits the existing snapshot: it produces a new
//! snapshot linked to the same root, carrying the previous language
//! availabilities forward.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::reference::{Language, ReferenceDataCache};
use crate::translation::changes::Change;
use crate::translation::TranslationContext;
use crate::types::{Entity, LanguageAvailability, PublishingStatus, VersionedEntity};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::any::type_name;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Create-or-update decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    /// No identity present: allocate a new one
    Create,
    /// Identity present: derive from the existing row
    Update,
}

impl VersionState {
    pub fn from_identity(identity: Option<Uuid>) -> Self {
        match identity {
            Some(_) => VersionState::Update,
            None => VersionState::Create,
        }
    }
}

/// A materialized target together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct VersionResolution<E> {
    pub state: VersionState,
    pub entity: E,
    /// Snapshot the new version was derived from
    pub previous_id: Option<Uuid>,
}

/// Resolves create/update targets against the persisted state of a unit of work
pub struct VersioningResolver<'c> {
    context: &'c TranslationContext,
}

impl<'c> VersioningResolver<'c> {
    pub fn new(context: &'c TranslationContext) -> Self {
        Self { context }
    }

    /// Resolve the snapshot a versioned translation writes into
    pub fn resolve_version<E>(&self, identity: Option<Uuid>) -> Result<VersionResolution<E>>
    where
        E: VersionedEntity + Send + Sync + 'static,
    {
        let entity_name = type_name::<E>();

        match identity {
            None => {
                let mut entity = E::default();
                let id = self.context.next_id();
                let root_id = self.context.next_id();
                entity.set_id(id);
                entity.set_root_id(root_id);
                entity.set_publishing_status(PublishingStatus::Draft);
                entity.language_availabilities_mut().clear();

                self.context.record(Change::RootCreated {
                    entity: entity_name,
                    root_id,
                });
                self.context.record(Change::VersionCreated {
                    entity: entity_name,
                    id,
                    root_id,
                    previous_id: None,
                });
                log::debug!("Creating {} {} under new root {}", entity_name, id, root_id);

                Ok(VersionResolution {
                    state: VersionState::Create,
                    entity,
                    previous_id: None,
                })
            }
            Some(previous_id) => {
                let existing: E = self
                    .context
                    .store()
                    .find(previous_id)
                    .ok_or(Error::EntityNotFound {
                        entity: entity_name,
                        id: previous_id,
                    })?;

                let mut entity = existing.clone();
                let id = self.context.next_id();
                entity.set_id(id);
                entity.set_publishing_status(existing.publishing_status().after_edit());

                self.context.record(Change::VersionCreated {
                    entity: entity_name,
                    id,
                    root_id: entity.root_id(),
                    previous_id: Some(previous_id),
                });
                log::debug!(
                    "Creating {} {} from {} under root {}",
                    entity_name,
                    id,
                    previous_id,
                    entity.root_id()
                );

                Ok(VersionResolution {
                    state: VersionState::Update,
                    entity,
                    previous_id: Some(previous_id),
                })
            }
        }
    }

    /// Resolve a non-versioned target: a fresh row or the stored row itself
    pub fn resolve_entity<E>(&self, identity: Option<Uuid>) -> Result<VersionResolution<E>>
    where
        E: Entity + Clone + Default + Send + Sync + 'static,
    {
        let entity_name = type_name::<E>();

        match identity {
            None => {
                let mut entity = E::default();
                let id = self.context.next_id();
                entity.set_id(id);
                self.context.record(Change::EntityCreated { entity: entity_name, id });

                Ok(VersionResolution {
                    state: VersionState::Create,
                    entity,
                    previous_id: None,
                })
            }
            Some(id) => {
                let entity: E = self
                    .context
                    .store()
                    .find(id)
                    .ok_or(Error::EntityNotFound { entity: entity_name, id })?;
                self.context.record(Change::EntityUpdated { entity: entity_name, id });

                Ok(VersionResolution {
                    state: VersionState::Update,
                    entity,
                    previous_id: Some(id),
                })
            }
        }
    }
}

/// Keep exactly one availability per content language
///
/// Languages that gained content get a draft entry, languages that lost all
/// content lose their entry, duplicates keep the first occurrence.
pub fn normalize_language_availabilities<E: VersionedEntity>(entity: &mut E) {
    let content = entity.content_languages();
    let availabilities = entity.language_availabilities_mut();

    let mut seen = HashSet::new();
    availabilities.retain(|availability| {
        content.contains(&availability.language_id) && seen.insert(availability.language_id)
    });

    for language_id in content {
        if !seen.contains(&language_id) {
            availabilities.push(LanguageAvailability::draft(language_id));
        }
    }
}

/// Apply requested per-language statuses onto an entity's availabilities
///
/// Languages not mentioned keep the entry carried forward from the previous
/// snapshot.
pub fn apply_language_statuses<E: VersionedEntity>(
    entity: &mut E,
    statuses: &BTreeMap<Uuid, PublishingStatus>,
    now: DateTime<Utc>,
) {
    let availabilities = entity.language_availabilities_mut();

    for (language_id, status) in statuses {
        match availabilities
            .iter_mut()
            .find(|availability| availability.language_id == *language_id)
        {
            Some(availability) => availability.transition(*status, now),
            None => {
                let mut availability = LanguageAvailability::draft(*language_id);
                availability.transition(*status, now);
                availabilities.push(availability);
            }
        }
    }
}

/// Per-language statuses keyed by language code
pub fn language_statuses<E: VersionedEntity>(
    entity: &E,
    cache: &ReferenceDataCache,
) -> Result<BTreeMap<String, PublishingStatus>> {
    entity
        .language_availabilities()
        .iter()
        .map(|availability| {
            let code = cache.get_by_value::<Language>(availability.language_id)?;
            Ok::<_, Error>((code.to_string(), availability.status))
        })
        .collect()
}
