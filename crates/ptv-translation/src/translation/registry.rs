//! Typed translator registry
//!
//! Translators are registered once at startup under the `(entity, view model)`
//! type pair they convert. Nested mappings resolve them by type pair at
//! execution time; a missing registration is a configuration error.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use super::TranslationContext;
use crate::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts between one entity type and one view-model type, both ways
///
/// Both methods receive the target to build onto: a default value for a
/// fresh translation, or the object already being materialized when the
/// translator is composed into another one as a partial.
pub trait Translator<E, V>: Send + Sync {
    fn translate_to_view_model(
        &self,
        entity: &E,
        target: V,
        context: &TranslationContext,
    ) -> Result<V>;

    fn translate_to_entity(
        &self,
        view_model: &V,
        target: E,
        context: &TranslationContext,
    ) -> Result<E>;
}

type PairKey = (TypeId, TypeId);

struct Registration {
    /// `Arc<dyn Translator<E, V>>` behind `Any`
    translator: Box<dyn Any + Send + Sync>,
    entity: &'static str,
    view_model: &'static str,
}

/// Registry of translators keyed by `(entity, view model)` type pair
#[derive(Default)]
pub struct TranslatorRegistry {
    translators: HashMap<PairKey, Registration>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the translator for `(E, V)`, replacing any previous one
    pub fn register<E, V>(&mut self, translator: impl Translator<E, V> + 'static) -> &mut Self
    where
        E: 'static,
        V: 'static,
    {
        let translator: Arc<dyn Translator<E, V>> = Arc::new(translator);
        let previous = self.translators.insert(
            (TypeId::of::<E>(), TypeId::of::<V>()),
            Registration {
                translator: Box::new(translator),
                entity: type_name::<E>(),
                view_model: type_name::<V>(),
            },
        );

        if previous.is_some() {
            log::warn!(
                "Translator for {} <-> {} registered twice; keeping the latest",
                type_name::<E>(),
                type_name::<V>()
            );
        }
        self
    }

    /// Translator registered for `(E, V)`
    pub fn get<E, V>(&self) -> Result<Arc<dyn Translator<E, V>>>
    where
        E: 'static,
        V: 'static,
    {
        self.lookup::<E, V>().ok_or(Error::TranslatorNotRegistered {
            source_type: type_name::<E>(),
            target_type: type_name::<V>(),
        })
    }

    pub fn contains<E: 'static, V: 'static>(&self) -> bool {
        self.lookup::<E, V>().is_some()
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// Convert `value` into `B`, whichever side of a registered pair it is on
    ///
    /// `(A, B)` registered means `A` is the entity and the translation goes to
    /// the view model; `(B, A)` registered means the reverse.
    pub fn convert<A, B>(&self, value: &A, target: B, context: &TranslationContext) -> Result<B>
    where
        A: 'static,
        B: 'static,
    {
        if let Some(translator) = self.lookup::<A, B>() {
            return translator.translate_to_view_model(value, target, context);
        }
        if let Some(translator) = self.lookup::<B, A>() {
            return translator.translate_to_entity(value, target, context);
        }

        Err(Error::TranslatorNotRegistered {
            source_type: type_name::<A>(),
            target_type: type_name::<B>(),
        })
    }

    fn lookup<E: 'static, V: 'static>(&self) -> Option<Arc<dyn Translator<E, V>>> {
        self.translators
            .get(&(TypeId::of::<E>(), TypeId::of::<V>()))
            .and_then(|registration| {
                registration
                    .translator
                    .downcast_ref::<Arc<dyn Translator<E, V>>>()
            })
            .cloned()
    }
}

impl fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self
            .translators
            .values()
            .map(|registration| format!("{} <-> {}", registration.entity, registration.view_model))
            .collect();
        pairs.sort();
        f.debug_struct("TranslatorRegistry").field("translators", &pairs).finish()
    }
}
