//! Translation engine
//!
//! Translators registered in a [`TranslatorRegistry`] build a
//! [`TranslationDefinition`] per call; the engine facade wires the registry
//! to the reference cache, the persisted state and the clock/id
//! collaborators, and creates one [`TranslationContext`] per unit of work.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

pub mod auto;
pub mod changes;
pub mod context;
pub mod definition;
pub mod dictionary;
pub mod mapping;
pub mod registry;

pub use changes::{Change, ChangeSet, CollectionChanges};
pub use context::TranslationContext;
pub use definition::{CollectionOptions, TranslationDefinition, TranslationDirection};
pub use dictionary::DictionaryRows;
pub use mapping::{FieldMapping, MappingKind};
pub use registry::{Translator, TranslatorRegistry};

use crate::config::EngineConfig;
use crate::reference::{ReferenceDataCache, ReferenceDataSource, StaticReferenceData};
use crate::store::{Clock, EmptyStore, EntityStore, IdGenerator, RandomIds, SystemClock};
use crate::Result;
use std::any::type_name;
use std::sync::Arc;

/// An entity produced from a view model, with the writes it implies
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTranslation<E> {
    pub entity: E,
    pub changes: ChangeSet,
}

/// Entry point for translating between entities and view models
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct TranslationEngine {
    registry: Arc<TranslatorRegistry>,
    cache: Arc<ReferenceDataCache>,
    store: Arc<dyn EntityStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    config: Arc<EngineConfig>,
}

impl TranslationEngine {
    pub fn builder() -> TranslationEngineBuilder {
        TranslationEngineBuilder::new()
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ReferenceDataCache {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Context for one unit of work
    pub fn context(&self) -> TranslationContext {
        TranslationContext::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.cache),
            Arc::clone(&self.store),
            Arc::clone(&self.ids),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    /// Context bound to the language of the current request
    pub fn context_for_language(&self, language: &str) -> TranslationContext {
        self.context().with_request_language(language)
    }

    /// Translate a persisted entity into its view model
    pub fn to_view_model<E, V>(&self, entity: &E) -> Result<V>
    where
        E: 'static,
        V: Default + 'static,
    {
        let _span = tracing::debug_span!(
            "to_view_model",
            entity = type_name::<E>(),
            view_model = type_name::<V>()
        )
        .entered();
        let translator = self.registry.get::<E, V>()?;
        translator.translate_to_view_model(entity, V::default(), &self.context())
    }

    /// Translate for a single-language read path
    pub fn to_view_model_in_language<E, V>(&self, entity: &E, language: &str) -> Result<V>
    where
        E: 'static,
        V: Default + 'static,
    {
        let _span = tracing::debug_span!(
            "to_view_model",
            entity = type_name::<E>(),
            view_model = type_name::<V>(),
            language
        )
        .entered();
        let translator = self.registry.get::<E, V>()?;
        let context = self.context_for_language(language);
        translator.translate_to_view_model(entity, V::default(), &context)
    }

    /// Translate a view model into the entity to persist
    pub fn to_entity<V, E>(&self, view_model: &V) -> Result<E>
    where
        V: 'static,
        E: Default + 'static,
    {
        self.to_entity_with_changes(view_model).map(|translation| translation.entity)
    }

    /// Translate a view model and return the change set alongside the entity
    pub fn to_entity_with_changes<V, E>(&self, view_model: &V) -> Result<EntityTranslation<E>>
    where
        V: 'static,
        E: Default + 'static,
    {
        let _span = tracing::debug_span!(
            "to_entity",
            view_model = type_name::<V>(),
            entity = type_name::<E>()
        )
        .entered();
        let translator = self.registry.get::<E, V>()?;
        let context = self.context();
        let entity = translator.translate_to_entity(view_model, E::default(), &context)?;
        let changes = context.take_changes();

        log::debug!(
            "Translated {} into {} with {} change(s)",
            type_name::<V>(),
            type_name::<E>(),
            changes.len()
        );
        Ok(EntityTranslation { entity, changes })
    }
}

impl std::fmt::Debug for TranslationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationEngine")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`TranslationEngine`]
///
/// Collaborators not supplied fall back to: reference data from the config,
/// an empty store, random ids and the system clock.
#[derive(Default)]
pub struct TranslationEngineBuilder {
    registry: Option<TranslatorRegistry>,
    cache: Option<Arc<ReferenceDataCache>>,
    store: Option<Arc<dyn EntityStore>>,
    ids: Option<Arc<dyn IdGenerator>>,
    clock: Option<Arc<dyn Clock>>,
    config: Option<EngineConfig>,
}

impl TranslationEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(mut self, registry: TranslatorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Register translators in place
    pub fn register(mut self, register: impl FnOnce(&mut TranslatorRegistry)) -> Self {
        register(self.registry.get_or_insert_with(TranslatorRegistry::new));
        self
    }

    pub fn reference_source(mut self, source: impl ReferenceDataSource + 'static) -> Self {
        self.cache = Some(Arc::new(ReferenceDataCache::new(source)));
        self
    }

    /// Share an already constructed cache
    pub fn cache(mut self, cache: Arc<ReferenceDataCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn store(mut self, store: impl EntityStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn shared_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the configuration and build the engine
    ///
    /// With `populate_on_start` the reference cache is warmed here, so a
    /// broken reference store fails startup instead of the first request.
    pub fn build(self) -> Result<TranslationEngine> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let cache = match self.cache {
            Some(cache) => cache,
            None => Arc::new(ReferenceDataCache::new(StaticReferenceData::from_config(&config))),
        };
        if config.populate_on_start {
            cache.populate()?;
        }

        let registry = self.registry.unwrap_or_default();
        log::info!("Translation engine ready with {} translator(s)", registry.len());

        Ok(TranslationEngine {
            registry: Arc::new(registry),
            cache,
            store: self.store.unwrap_or_else(|| Arc::new(EmptyStore)),
            ids: self.ids.unwrap_or_else(|| Arc::new(RandomIds)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            config: Arc::new(config),
        })
    }
}

impl std::fmt::Debug for TranslationEngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationEngineBuilder")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
