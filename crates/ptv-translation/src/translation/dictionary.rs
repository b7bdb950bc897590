//! Per-language dictionaries
//!
//! Entities store localized values as rows carrying a language id. View
//! models expose them as maps keyed by language code. Grouping goes from rows
//! to maps; expansion goes from maps back to rows, reusing the existing row
//! for a language wherever one exists.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use super::TranslationContext;
use crate::reconcile::Reconciliation;
use crate::types::Entity;
use crate::Result;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// How dictionary rows are matched against a language map
pub struct DictionaryRows<'a, R> {
    language_of: Box<dyn Fn(&R) -> Uuid + 'a>,
    scope: Option<Box<dyn Fn(&R) -> bool + 'a>>,
}

impl<'a, R> DictionaryRows<'a, R> {
    /// Rows are keyed by the language id `language_of` returns
    pub fn by_language(language_of: impl Fn(&R) -> Uuid + 'a) -> Self {
        Self {
            language_of: Box::new(language_of),
            scope: None,
        }
    }

    /// Only rows matching `scope` belong to this dictionary
    ///
    /// Needed when several dictionaries share one row collection, e.g. names
    /// and alternate names told apart by their type id.
    pub fn within(mut self, scope: impl Fn(&R) -> bool + 'a) -> Self {
        self.scope = Some(Box::new(scope));
        self
    }

    pub(crate) fn language_of(&self, row: &R) -> Uuid {
        (self.language_of)(row)
    }

    pub(crate) fn contains(&self, row: &R) -> bool {
        self.scope.as_ref().map_or(true, |scope| scope(row))
    }
}

impl<'a, R> fmt::Debug for DictionaryRows<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryRows")
            .field("scoped", &self.scope.is_some())
            .finish()
    }
}

/// Group rows into a map keyed by language code, first row per language wins
pub fn group_by_language<'r, R, X>(
    field: &str,
    rows: impl IntoIterator<Item = &'r R>,
    language_of: impl Fn(&R) -> Uuid,
    value_of: impl Fn(&R) -> X,
    context: &TranslationContext,
) -> Result<BTreeMap<String, X>>
where
    R: 'r,
{
    let mut map = BTreeMap::new();
    for row in rows {
        let code = context.language_code(language_of(row))?;
        if map.contains_key(code) {
            log::warn!("Duplicate '{}' row for language '{}'; keeping the first", field, code);
            continue;
        }
        map.insert(code.to_string(), value_of(row));
    }
    Ok(map)
}

/// Group rows into a map of lists keyed by language code, row order kept
pub fn group_list_by_language<'r, R, X>(
    rows: impl IntoIterator<Item = &'r R>,
    language_of: impl Fn(&R) -> Uuid,
    value_of: impl Fn(&R) -> X,
    context: &TranslationContext,
) -> Result<BTreeMap<String, Vec<X>>>
where
    R: 'r,
{
    let mut map: BTreeMap<String, Vec<X>> = BTreeMap::new();
    for row in rows {
        let code = context.language_code(language_of(row))?;
        map.entry(code.to_string()).or_default().push(value_of(row));
    }
    Ok(map)
}

/// Expand a language map into rows
///
/// Rows outside the dictionary scope are left untouched at the front. Inside
/// the scope, each language keeps its existing row (updated through `build`)
/// or gets a new one; languages absent from the map lose their rows.
pub fn expand_by_language<X, R>(
    values: &BTreeMap<String, X>,
    existing: Vec<R>,
    options: &DictionaryRows<'_, R>,
    build: impl Fn(Uuid, &X, R) -> R,
    context: &TranslationContext,
) -> Result<Reconciliation<R>>
where
    R: Entity + Clone + Default + PartialEq,
{
    let (mut outcome, mut pool) = split_scope(existing, options);

    for (code, value) in values {
        let language_id = context.language_id(code)?;
        let previous = take_first(&mut pool, |row| options.language_of(row) == language_id);
        let row = build(language_id, value, previous.clone().unwrap_or_default());
        place(&mut outcome, row, previous, context);
    }

    outcome.removed.extend(pool);
    Ok(outcome)
}

/// Expand a language map of lists into rows
///
/// An existing row is reused when it has the same language and `matches` the
/// incoming value; every other row in scope is removed.
pub fn expand_list_by_language<X, R>(
    values: &BTreeMap<String, Vec<X>>,
    existing: Vec<R>,
    options: &DictionaryRows<'_, R>,
    matches: impl Fn(&R, &X) -> bool,
    build: impl Fn(Uuid, &X, R) -> R,
    context: &TranslationContext,
) -> Result<Reconciliation<R>>
where
    R: Entity + Clone + Default + PartialEq,
{
    let (mut outcome, mut pool) = split_scope(existing, options);

    for (code, list) in values {
        let language_id = context.language_id(code)?;
        for value in list {
            let previous = take_first(&mut pool, |row| {
                options.language_of(row) == language_id && matches(row, value)
            });
            let row = build(language_id, value, previous.clone().unwrap_or_default());
            place(&mut outcome, row, previous, context);
        }
    }

    outcome.removed.extend(pool);
    Ok(outcome)
}

/// Rows outside the scope go straight to the outcome; the rest form the pool
fn split_scope<R: Entity>(
    existing: Vec<R>,
    options: &DictionaryRows<'_, R>,
) -> (Reconciliation<R>, Vec<R>) {
    let mut outcome = Reconciliation::empty();
    let mut pool = Vec::new();
    let mut seen = HashSet::new();

    for row in existing {
        if !options.contains(&row) {
            outcome.retained.push(row.id());
            outcome.rows.push(row);
        } else if seen.insert(row.id()) {
            pool.push(row);
        } else {
            outcome.removed.push(row);
        }
    }
    (outcome, pool)
}

fn take_first<R>(pool: &mut Vec<R>, predicate: impl Fn(&R) -> bool) -> Option<R> {
    let position = pool.iter().position(predicate)?;
    Some(pool.remove(position))
}

fn place<R>(
    outcome: &mut Reconciliation<R>,
    mut row: R,
    previous: Option<R>,
    context: &TranslationContext,
) where
    R: Entity + PartialEq,
{
    match previous {
        Some(previous) => {
            row.set_id(previous.id());
            if previous == row {
                outcome.unchanged.push(row.id());
            } else {
                outcome.updated.push(row.id());
            }
        }
        None => {
            if row.id().is_nil() {
                row.set_id(context.next_id());
            }
            outcome.added.push(row.id());
        }
    }
    outcome.rows.push(row);
}
