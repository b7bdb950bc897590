//! Field mapping variants and the plan executor
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use super::TranslationContext;
use crate::{Error, Result};
use std::any::type_name;
use std::fmt;

/// Step applied while the target is being built
pub(crate) type Apply<'a, S, T> =
    Box<dyn FnOnce(&'a S, &mut T, &TranslationContext) -> Result<()> + 'a>;

/// Callback run once the target is fully materialized
pub(crate) type SideEffect<'a, T> =
    Box<dyn FnOnce(&mut T, &TranslationContext) -> anyhow::Result<()> + 'a>;

/// One operation of a translation plan
pub enum FieldMapping<'a, S, T> {
    /// Scalar copy or transform
    Simple { field: &'static str, apply: Apply<'a, S, T> },
    /// List of scalars
    SimpleList { field: &'static str, apply: Apply<'a, S, T> },
    /// List of sub-objects, possibly reconciled against persisted rows
    Collection { field: &'static str, apply: Apply<'a, S, T> },
    /// Per-language map
    Dictionary { field: &'static str, apply: Apply<'a, S, T> },
    /// Per-language map of lists
    DictionaryList { field: &'static str, apply: Apply<'a, S, T> },
    /// Single nested object translated by another translator
    Navigation { field: &'static str, apply: Apply<'a, S, T> },
    /// The whole target projected through another translator
    Partial { view: &'static str, apply: Apply<'a, S, T> },
    /// Post-materialization fixup
    Propagation { apply: SideEffect<'a, T> },
}

/// Kind of a [`FieldMapping`], for logging and plan inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    Simple,
    SimpleList,
    Collection,
    Dictionary,
    DictionaryList,
    Navigation,
    Partial,
    Propagation,
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MappingKind::Simple => "simple",
            MappingKind::SimpleList => "simple list",
            MappingKind::Collection => "collection",
            MappingKind::Dictionary => "dictionary",
            MappingKind::DictionaryList => "dictionary list",
            MappingKind::Navigation => "navigation",
            MappingKind::Partial => "partial",
            MappingKind::Propagation => "propagation",
        };
        write!(f, "{}", name)
    }
}

impl<'a, S, T> FieldMapping<'a, S, T> {
    pub fn kind(&self) -> MappingKind {
        match self {
            FieldMapping::Simple { .. } => MappingKind::Simple,
            FieldMapping::SimpleList { .. } => MappingKind::SimpleList,
            FieldMapping::Collection { .. } => MappingKind::Collection,
            FieldMapping::Dictionary { .. } => MappingKind::Dictionary,
            FieldMapping::DictionaryList { .. } => MappingKind::DictionaryList,
            FieldMapping::Navigation { .. } => MappingKind::Navigation,
            FieldMapping::Partial { .. } => MappingKind::Partial,
            FieldMapping::Propagation { .. } => MappingKind::Propagation,
        }
    }

    /// Target field (or partial view type) the mapping writes
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FieldMapping::Simple { field, .. }
            | FieldMapping::SimpleList { field, .. }
            | FieldMapping::Collection { field, .. }
            | FieldMapping::Dictionary { field, .. }
            | FieldMapping::DictionaryList { field, .. }
            | FieldMapping::Navigation { field, .. } => Some(field),
            FieldMapping::Partial { view, .. } => Some(view),
            FieldMapping::Propagation { .. } => None,
        }
    }
}

impl<'a, S, T> fmt::Debug for FieldMapping<'a, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("kind", &self.kind())
            .field("field", &self.field())
            .finish()
    }
}

/// Run a plan against `target`
///
/// Mappings run strictly in append order. Propagations are deferred until
/// every other mapping has completed and then run once each, in their own
/// append order. Any failure drops the partially built target.
pub(crate) fn execute_plan<'a, S, T>(
    source: &'a S,
    mut target: T,
    context: &TranslationContext,
    mappings: Vec<FieldMapping<'a, S, T>>,
) -> Result<T> {
    let mut deferred = Vec::new();

    for mapping in mappings {
        let kind = mapping.kind();
        match mapping {
            FieldMapping::Propagation { apply } => deferred.push(apply),
            FieldMapping::Simple { field, apply }
            | FieldMapping::SimpleList { field, apply }
            | FieldMapping::Collection { field, apply }
            | FieldMapping::Dictionary { field, apply }
            | FieldMapping::DictionaryList { field, apply }
            | FieldMapping::Navigation { field, apply }
            | FieldMapping::Partial { view: field, apply } => {
                log::trace!("Applying {} mapping '{}' onto {}", kind, field, type_name::<T>());
                apply(source, &mut target, context)?;
            }
        }
    }

    let total = deferred.len();
    for (position, propagate) in deferred.into_iter().enumerate() {
        propagate(&mut target, context).map_err(|source| {
            let step = position + 1;
            let target_type = type_name::<T>();
            log::debug!("Propagation {}/{} on {} failed: {}", step, total, target_type, source);
            Error::Propagation {
                message: format!("propagation {} of {} on {}", step, total, target_type),
                source,
            }
        })?;
    }

    Ok(target)
}
