//! Translation definition builder
//!
//! A [`TranslationDefinition`] accumulates the plan for translating one
//! source object into one target object. Each `add_*` call appends a
//! [`FieldMapping`]; [`get_final`](TranslationDefinition::get_final) executes
//! the plan once and hands back the materialized target.
//!
//! Execution order:
//! 1. target resolution (`use_versioning` / `use_create_or_update`)
//! 2. auto-translation of unmapped same-named scalar fields
//! 3. mappings, in append order
//! 4. propagations, in append order
//! 5. finalizers (language availability normalization)
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use super::auto::copy_unmapped;
use super::changes::Change;
use super::dictionary::{self, DictionaryRows};
use super::mapping::{execute_plan, Apply, FieldMapping};
use super::TranslationContext;
use crate::reconcile::{CollectionReconciler, Reconciliation};
use crate::types::{Entity, Identifiable, Orderable, PublishingStatus, VersionedEntity};
use crate::versioning::{self, VersioningResolver};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::mem;
use uuid::Uuid;

/// Which side of a translator pair a definition produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationDirection {
    ToViewModel,
    ToEntity,
}

impl fmt::Display for TranslationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationDirection::ToViewModel => write!(f, "entity -> view model"),
            TranslationDirection::ToEntity => write!(f, "view model -> entity"),
        }
    }
}

type Resolver<'a, T> = Box<dyn FnOnce(&TranslationContext) -> Result<T> + 'a>;
type Finalizer<'a, T> = Box<dyn FnOnce(&mut T) + 'a>;

/// Options for a collection reconciled against the target's persisted rows
pub struct CollectionOptions<'a, R> {
    scope: Option<Box<dyn Fn(&R) -> bool + 'a>>,
    removal: Option<Box<dyn Fn(&R) -> bool + 'a>>,
    check: Option<Box<dyn Fn(&mut R) -> Result<()> + 'a>>,
    ordering: Option<(Option<i32>, fn(&mut R, i32))>,
}

impl<'a, R> Default for CollectionOptions<'a, R> {
    fn default() -> Self {
        Self {
            scope: None,
            removal: None,
            check: None,
            ordering: None,
        }
    }
}

impl<'a, R> CollectionOptions<'a, R> {
    /// Remove every unreferenced row
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile only the rows matching `predicate`
    ///
    /// Rows outside the scope are kept as they are and cannot be referenced
    /// by incoming items; a reference to one is an orphan reference.
    pub fn within(mut self, predicate: impl Fn(&R) -> bool + 'a) -> Self {
        self.scope = Some(Box::new(predicate));
        self
    }

    /// Only remove unreferenced rows matching `predicate`
    pub fn remove_when(mut self, predicate: impl Fn(&R) -> bool + 'a) -> Self {
        self.removal = Some(Box::new(predicate));
        self
    }

    /// Never remove unreferenced rows
    pub fn keep_unreferenced(self) -> Self {
        self.remove_when(|_| false)
    }

    /// Run `check` on every translated row before it is placed
    ///
    /// The check may complete the row (for example a type implied by the
    /// collection) or reject it, failing the whole translation.
    pub fn check_each(mut self, check: impl Fn(&mut R) -> Result<()> + 'a) -> Self {
        self.check = Some(Box::new(check));
        self
    }
}

impl<'a, R: Orderable> CollectionOptions<'a, R> {
    /// Re-number rows in incoming order from the configured origin
    pub fn ordered(mut self) -> Self {
        self.ordering = Some((None, <R as Orderable>::set_order_number));
        self
    }

    /// Re-number rows in incoming order from `origin`
    pub fn ordered_from(mut self, origin: i32) -> Self {
        self.ordering = Some((Some(origin), <R as Orderable>::set_order_number));
        self
    }
}

/// Reconciler half of [`CollectionOptions`]; scope and check stay with the mapping
struct CollectionPlan<'a, R> {
    reconciler: CollectionReconciler<'a, R>,
    scope: Option<Box<dyn Fn(&R) -> bool + 'a>>,
    check: Option<Box<dyn Fn(&mut R) -> Result<()> + 'a>>,
}

impl<'a, R> CollectionOptions<'a, R>
where
    R: Entity + Clone + Default + PartialEq + 'a,
{
    fn into_plan(self, collection: &str, default_origin: i32) -> CollectionPlan<'a, R> {
        let mut reconciler = CollectionReconciler::new(collection);
        if let Some(removal) = self.removal {
            reconciler = reconciler.remove_when(removal);
        }
        if let Some((origin, assign)) = self.ordering {
            reconciler = reconciler.with_ordering(origin.unwrap_or(default_origin), assign);
        }
        CollectionPlan {
            reconciler,
            scope: self.scope,
            check: self.check,
        }
    }
}

impl<'a, R> fmt::Debug for CollectionOptions<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionOptions")
            .field("scoped", &self.scope.is_some())
            .field("removal_predicate", &self.removal.is_some())
            .field("checked", &self.check.is_some())
            .field("ordered", &self.ordering.map(|(origin, _)| origin))
            .finish()
    }
}

/// Ordered plan for translating one source into one target
///
/// A definition is consumed by [`get_final`](Self::get_final) and cannot be
/// executed twice.
pub struct TranslationDefinition<'a, S, T> {
    source: &'a S,
    target: T,
    context: &'a TranslationContext,
    direction: TranslationDirection,
    auto_translation: bool,
    mapped: HashSet<&'static str>,
    resolver: Option<Resolver<'a, T>>,
    mappings: Vec<FieldMapping<'a, S, T>>,
    finalizers: Vec<Finalizer<'a, T>>,
}

impl<'a, S, T> TranslationDefinition<'a, S, T>
where
    S: Serialize,
    T: Serialize + DeserializeOwned + Default,
{
    pub(crate) fn new(
        source: &'a S,
        target: T,
        context: &'a TranslationContext,
        direction: TranslationDirection,
    ) -> Self {
        Self {
            source,
            target,
            context,
            direction,
            auto_translation: context.config().auto_translation,
            mapped: HashSet::new(),
            resolver: None,
            mappings: Vec::new(),
            finalizers: Vec::new(),
        }
    }

    pub fn direction(&self) -> TranslationDirection {
        self.direction
    }

    pub fn context(&self) -> &'a TranslationContext {
        self.context
    }

    /// Every target field must be mapped explicitly
    pub fn disable_auto_translation(mut self) -> Self {
        self.auto_translation = false;
        self
    }

    pub fn auto_translation_enabled(&self) -> bool {
        self.auto_translation
    }

    /// Pending mappings, in append order
    pub fn mappings(&self) -> &[FieldMapping<'a, S, T>] {
        &self.mappings
    }

    fn push(mut self, mapping: FieldMapping<'a, S, T>) -> Self {
        if let Some(field) = mapping.field() {
            self.mapped.insert(field);
        }
        self.mappings.push(mapping);
        self
    }

    /// Copy or transform one scalar
    pub fn add_simple<X>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> X + 'a,
        assign: impl FnOnce(&mut T, X) + 'a,
    ) -> Self {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, _| {
            assign(target, extract(source));
            Ok(())
        });
        self.push(FieldMapping::Simple { field, apply })
    }

    /// Scalar mapping whose extractor consults the context and may fail
    ///
    /// Typically used to resolve reference codes to ids and back.
    pub fn add_simple_with<X>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S, &TranslationContext) -> Result<X> + 'a,
        assign: impl FnOnce(&mut T, X) + 'a,
    ) -> Self {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            assign(target, extract(source, context)?);
            Ok(())
        });
        self.push(FieldMapping::Simple { field, apply })
    }

    /// Copy a list of scalars
    pub fn add_simple_list<X, I>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> I + 'a,
        assign: impl FnOnce(&mut T, Vec<X>) + 'a,
    ) -> Self
    where
        I: IntoIterator<Item = X>,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, _| {
            assign(target, extract(source).into_iter().collect());
            Ok(())
        });
        self.push(FieldMapping::SimpleList { field, apply })
    }

    /// Pick the row in the request language
    ///
    /// Falls back to the configured default language when the context has no
    /// request language; neither being available is a configuration error.
    pub fn add_localized<R, X, I>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> I + 'a,
        language_of: impl Fn(&R) -> Uuid + 'a,
        value_of: impl FnOnce(&R) -> X + 'a,
        assign: impl FnOnce(&mut T, Option<X>) + 'a,
    ) -> Self
    where
        R: 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let language_id = context.request_language_id()?;
            let value = extract(source)
                .into_iter()
                .find(|row| language_of(*row) == language_id)
                .map(value_of);
            assign(target, value);
            Ok(())
        });
        self.push(FieldMapping::Simple { field, apply })
    }

    /// Group localized rows into a map keyed by language code
    pub fn add_dictionary<R, X, I>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> I + 'a,
        language_of: impl Fn(&R) -> Uuid + 'a,
        value_of: impl Fn(&R) -> X + 'a,
        assign: impl FnOnce(&mut T, BTreeMap<String, X>) + 'a,
    ) -> Self
    where
        R: 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let map = dictionary::group_by_language(
                field,
                extract(source),
                language_of,
                value_of,
                context,
            )?;
            assign(target, map);
            Ok(())
        });
        self.push(FieldMapping::Dictionary { field, apply })
    }

    /// Group localized rows into a map of lists keyed by language code
    pub fn add_dictionary_list<R, X, I>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> I + 'a,
        language_of: impl Fn(&R) -> Uuid + 'a,
        value_of: impl Fn(&R) -> X + 'a,
        assign: impl FnOnce(&mut T, BTreeMap<String, Vec<X>>) + 'a,
    ) -> Self
    where
        R: 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let rows = extract(source);
            let map = dictionary::group_list_by_language(rows, language_of, value_of, context)?;
            assign(target, map);
            Ok(())
        });
        self.push(FieldMapping::DictionaryList { field, apply })
    }

    /// Expand a language map into the target's localized rows
    ///
    /// `rows` points at the row collection on the target; rows already there
    /// are treated as the persisted state.
    pub fn add_dictionary_rows<X, R>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> &'a BTreeMap<String, X> + 'a,
        rows: impl FnOnce(&mut T) -> &mut Vec<R> + 'a,
        options: DictionaryRows<'a, R>,
        build: impl Fn(Uuid, &X, R) -> R + 'a,
    ) -> Self
    where
        X: 'a,
        R: Entity + Clone + Default + PartialEq + 'a,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let slot = rows(target);
            let outcome = dictionary::expand_by_language(
                extract(source),
                mem::take(slot),
                &options,
                build,
                context,
            )?;
            *slot = record(field, outcome, context);
            Ok(())
        });
        self.push(FieldMapping::Dictionary { field, apply })
    }

    /// Expand a language map of lists into the target's localized rows
    pub fn add_dictionary_list_rows<X, R>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> &'a BTreeMap<String, Vec<X>> + 'a,
        rows: impl FnOnce(&mut T) -> &mut Vec<R> + 'a,
        options: DictionaryRows<'a, R>,
        matches: impl Fn(&R, &X) -> bool + 'a,
        build: impl Fn(Uuid, &X, R) -> R + 'a,
    ) -> Self
    where
        X: 'a,
        R: Entity + Clone + Default + PartialEq + 'a,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let slot = rows(target);
            let outcome = dictionary::expand_list_by_language(
                extract(source),
                mem::take(slot),
                &options,
                matches,
                build,
                context,
            )?;
            *slot = record(field, outcome, context);
            Ok(())
        });
        self.push(FieldMapping::DictionaryList { field, apply })
    }

    /// Translate every element through the registered translator for `(I, R)`
    pub fn add_collection<I, R, It>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> It + 'a,
        assign: impl FnOnce(&mut T, Vec<R>) + 'a,
    ) -> Self
    where
        I: 'static,
        R: Default + 'static,
        It: IntoIterator<Item = &'a I>,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let items = extract(source)
                .into_iter()
                .map(|item| context.translate::<I, R>(item))
                .collect::<Result<Vec<R>>>()?;
            assign(target, items);
            Ok(())
        });
        self.push(FieldMapping::Collection { field, apply })
    }

    /// Reconcile incoming items against the target's persisted rows
    ///
    /// Each item is translated onto the row it refers to (or a default row)
    /// through the registered translator for `(I, R)`. The outcome is
    /// recorded in the context's change set under `field`. With a scope set,
    /// rows outside it are neither matched nor removed and stay ahead of the
    /// reconciled rows.
    pub fn add_collection_reconciled<I, R>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> &'a [I] + 'a,
        rows: impl FnOnce(&mut T) -> &mut Vec<R> + 'a,
        options: CollectionOptions<'a, R>,
    ) -> Self
    where
        I: Identifiable + 'static,
        R: Entity + Clone + Default + PartialEq + 'static,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let CollectionPlan {
                reconciler,
                scope,
                check,
            } = options.into_plan(field, context.config().order_origin);
            let slot = rows(target);
            let (existing, mut outside): (Vec<R>, Vec<R>) = match &scope {
                Some(scope) => mem::take(slot).into_iter().partition(|row| scope(row)),
                None => (mem::take(slot), Vec::new()),
            };
            let outcome = reconciler.reconcile(
                extract(source),
                existing,
                |item: &I, row: R| {
                    let mut row = context.translate_onto::<I, R>(item, row)?;
                    if let Some(check) = &check {
                        check(&mut row)?;
                    }
                    Ok(row)
                },
                || context.next_id(),
            )?;
            outside.extend(record(field, outcome, context));
            *slot = outside;
            Ok(())
        });
        self.push(FieldMapping::Collection { field, apply })
    }

    /// Translate one nested object through the registered translator for `(A, B)`
    pub fn add_navigation<A, B>(
        self,
        field: &'static str,
        extract: impl FnOnce(&'a S) -> Option<&'a A> + 'a,
        assign: impl FnOnce(&mut T, Option<B>) + 'a,
    ) -> Self
    where
        A: 'static,
        B: Default + 'static,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let nested = extract(source).map(|value| context.translate::<A, B>(value)).transpose()?;
            assign(target, nested);
            Ok(())
        });
        self.push(FieldMapping::Navigation { field, apply })
    }

    /// Project the source onto `P` and let the translator for `(T, P)` build
    /// onto the current target
    pub fn add_partial<P>(self, project: impl FnOnce(&'a S) -> &'a P + 'a) -> Self
    where
        P: 'static,
        T: 'static,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let current = mem::take(target);
            *target = context.translate_onto::<P, T>(project(source), current)?;
            Ok(())
        });
        self.push(FieldMapping::Partial {
            view: type_name::<P>(),
            apply,
        })
    }

    /// Translate the source into view `P` with the translator for `(S, P)`
    /// and merge it into the target
    pub fn add_partial_view<P>(self, merge: impl FnOnce(&mut T, P) + 'a) -> Self
    where
        S: 'static,
        P: Default + 'static,
    {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let view = context.translate::<S, P>(source)?;
            merge(target, view);
            Ok(())
        });
        self.push(FieldMapping::Partial {
            view: type_name::<P>(),
            apply,
        })
    }

    /// Run `propagate` once the target is fully materialized
    pub fn add_propagation(
        self,
        propagate: impl FnOnce(&mut T, &TranslationContext) -> anyhow::Result<()> + 'a,
    ) -> Self {
        self.push(FieldMapping::Propagation {
            apply: Box::new(propagate),
        })
    }

    /// Execute the plan and return the materialized target
    pub fn get_final(self) -> Result<T> {
        let Self {
            source,
            target,
            context,
            direction,
            auto_translation,
            mapped,
            resolver,
            mappings,
            finalizers,
        } = self;

        log::debug!(
            "Executing {} plan {} -> {} with {} mapping(s)",
            direction,
            type_name::<S>(),
            type_name::<T>(),
            mappings.len()
        );

        let mut target = match resolver {
            Some(resolve) => resolve(context)?,
            None => target,
        };
        if auto_translation {
            target = copy_unmapped(source, target, &mapped)?;
        }

        let mut target = execute_plan(source, target, context, mappings)?;
        for finalize in finalizers {
            finalize(&mut target);
        }
        Ok(target)
    }
}

impl<'a, S, T> TranslationDefinition<'a, S, T>
where
    S: Serialize,
    T: VersionedEntity + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Resolve the target through versioning
    ///
    /// No identity creates a new root and first version; an identity derives
    /// a new version from the stored snapshot with that id. The target handed
    /// to the definition is replaced. Language availabilities are normalized
    /// after every other step.
    pub fn use_versioning(mut self, identity: Option<Uuid>) -> Self {
        self.mapped.insert("id");
        self.resolver = Some(Box::new(move |context: &TranslationContext| {
            VersioningResolver::new(context)
                .resolve_version::<T>(identity)
                .map(|resolution| resolution.entity)
        }));
        self.finalizers
            .push(Box::new(|target: &mut T| versioning::normalize_language_availabilities(target)));
        self
    }

    /// Apply per-language publishing statuses keyed by language code
    pub fn add_language_availabilities(
        self,
        extract: impl FnOnce(&'a S) -> &'a BTreeMap<String, PublishingStatus> + 'a,
    ) -> Self {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            let statuses = extract(source)
                .iter()
                .map(|(code, status)| Ok::<_, crate::Error>((context.language_id(code)?, *status)))
                .collect::<Result<BTreeMap<Uuid, PublishingStatus>>>()?;
            versioning::apply_language_statuses(target, &statuses, context.now());
            Ok(())
        });
        self.push(FieldMapping::Dictionary {
            field: "language_availabilities",
            apply,
        })
    }
}

impl<'a, S, T> TranslationDefinition<'a, S, T>
where
    S: Serialize,
    T: Entity + Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// Resolve a non-versioned target: a new row, or the stored row to update
    pub fn use_create_or_update(mut self, identity: Option<Uuid>) -> Self {
        self.mapped.insert("id");
        self.resolver = Some(Box::new(move |context: &TranslationContext| {
            VersioningResolver::new(context)
                .resolve_entity::<T>(identity)
                .map(|resolution| resolution.entity)
        }));
        self
    }
}

impl<'a, S, T> TranslationDefinition<'a, S, T>
where
    S: VersionedEntity + Serialize,
    T: Serialize + DeserializeOwned + Default,
{
    /// Per-language publishing statuses keyed by language code
    pub fn add_language_statuses(
        self,
        assign: impl FnOnce(&mut T, BTreeMap<String, PublishingStatus>) + 'a,
    ) -> Self {
        let apply: Apply<'a, S, T> = Box::new(move |source, target, context| {
            assign(target, versioning::language_statuses(source, context.cache())?);
            Ok(())
        });
        self.push(FieldMapping::Dictionary {
            field: "language_availabilities",
            apply,
        })
    }
}

impl<'a, S, T> fmt::Debug for TranslationDefinition<'a, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationDefinition")
            .field("source", &type_name::<S>())
            .field("target", &type_name::<T>())
            .field("direction", &self.direction)
            .field("auto_translation", &self.auto_translation)
            .field("mappings", &self.mappings)
            .finish()
    }
}

fn record<R: Entity>(
    field: &str,
    outcome: Reconciliation<R>,
    context: &TranslationContext,
) -> Vec<R> {
    context.record(Change::CollectionReconciled(outcome.to_changes(field)));
    outcome.rows
}
