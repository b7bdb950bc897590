//! Translation context for one unit of work
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use super::changes::{Change, ChangeSet};
use super::definition::{TranslationDefinition, TranslationDirection};
use super::registry::TranslatorRegistry;
use crate::config::EngineConfig;
use crate::reference::{Language, ReferenceDataCache};
use crate::store::{Clock, EntityStore, IdGenerator};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Context shared by every translator invoked within one unit of work
///
/// The TranslationContext gives translators access to the registry for
/// nested translations, the reference data cache, the persisted state of
/// rows being updated, and the request language. It also collects the
/// [`ChangeSet`] produced while building entities. A context belongs to one
/// in-flight translation and is not reused across requests.
pub struct TranslationContext {
    registry: Arc<TranslatorRegistry>,
    cache: Arc<ReferenceDataCache>,
    store: Arc<dyn EntityStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    config: Arc<EngineConfig>,
    request_language: Option<String>,
    changes: Mutex<ChangeSet>,
}

impl TranslationContext {
    /// Create a new translation context
    pub fn new(
        registry: Arc<TranslatorRegistry>,
        cache: Arc<ReferenceDataCache>,
        store: Arc<dyn EntityStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            registry,
            cache,
            store,
            ids,
            clock,
            config,
            request_language: None,
            changes: Mutex::new(ChangeSet::new()),
        }
    }

    /// Bind the context to the language of the current request
    pub fn with_request_language(mut self, language: impl Into<String>) -> Self {
        self.request_language = Some(language.into());
        self
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ReferenceDataCache {
        &self.cache
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Allocate a new identifier
    pub fn next_id(&self) -> Uuid {
        self.ids.next_id()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Request language, falling back to the configured default
    pub fn request_language(&self) -> Option<&str> {
        self.request_language
            .as_deref()
            .or(self.config.default_language.as_deref())
    }

    /// Language id for single-language read paths
    pub fn request_language_id(&self) -> Result<Uuid> {
        let code = self.request_language().ok_or_else(|| {
            Error::configuration("No request language and no default_language configured")
        })?;
        self.language_id(code)
    }

    /// Resolve a language code to its id
    pub fn language_id(&self, code: &str) -> Result<Uuid> {
        self.cache.get::<Language>(code)
    }

    /// Resolve a language id to its code
    pub fn language_code(&self, id: Uuid) -> Result<&str> {
        self.cache.get_by_value::<Language>(id)
    }

    /// Start a definition translating an entity into a view model
    pub fn entity_view_model_definition<'a, E, V>(
        &'a self,
        entity: &'a E,
        target: V,
    ) -> TranslationDefinition<'a, E, V>
    where
        E: Serialize,
        V: Serialize + DeserializeOwned + Default,
    {
        TranslationDefinition::new(entity, target, self, TranslationDirection::ToViewModel)
    }

    /// Start a definition translating a view model into an entity
    pub fn view_model_entity_definition<'a, V, E>(
        &'a self,
        view_model: &'a V,
        target: E,
    ) -> TranslationDefinition<'a, V, E>
    where
        V: Serialize,
        E: Serialize + DeserializeOwned + Default,
    {
        TranslationDefinition::new(view_model, target, self, TranslationDirection::ToEntity)
    }

    /// Translate through the registered translator for `A` and `B`
    pub fn translate<A, B>(&self, value: &A) -> Result<B>
    where
        A: 'static,
        B: Default + 'static,
    {
        self.registry.convert(value, B::default(), self)
    }

    /// Translate onto an existing target
    pub fn translate_onto<A, B>(&self, value: &A, target: B) -> Result<B>
    where
        A: 'static,
        B: 'static,
    {
        self.registry.convert(value, target, self)
    }

    pub(crate) fn record(&self, change: Change) {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change);
    }

    /// Changes recorded so far
    pub fn changes(&self) -> ChangeSet {
        self.changes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Take the recorded changes, leaving an empty set
    pub fn take_changes(&self) -> ChangeSet {
        std::mem::take(&mut *self.changes.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl std::fmt::Debug for TranslationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationContext")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .field("request_language", &self.request_language)
            .finish()
    }
}
