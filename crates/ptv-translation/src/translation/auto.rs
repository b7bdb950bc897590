//! Automatic copy of unmapped same-named fields
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::type_name;
use std::collections::HashSet;

/// Copy scalar fields of `source` onto same-named fields of `target`
///
/// Only string, number and boolean values are copied, and only onto target
/// fields that are null or already hold the same kind of scalar. Fields in
/// `mapped` are left to their explicit mappings.
pub fn copy_unmapped<S, T>(source: &S, target: T, mapped: &HashSet<&'static str>) -> Result<T>
where
    S: Serialize,
    T: Serialize + DeserializeOwned,
{
    let source_value = serde_json::to_value(source)?;
    let mut target_value = serde_json::to_value(&target)?;

    let (Value::Object(source_fields), Value::Object(target_fields)) =
        (&source_value, &mut target_value)
    else {
        return Ok(target);
    };

    let mut copied = 0;
    for (name, value) in source_fields {
        if mapped.contains(name.as_str()) || !is_scalar(value) {
            continue;
        }
        let Some(slot) = target_fields.get_mut(name) else {
            continue;
        };

        if slot.is_null() || same_kind(slot, value) {
            if slot != value {
                *slot = value.clone();
                copied += 1;
            }
        } else {
            log::warn!(
                "Skipping auto-translation of '{}' onto {}: incompatible value kinds",
                name,
                type_name::<T>()
            );
        }
    }

    if copied == 0 {
        return Ok(target);
    }
    log::trace!("Auto-translated {} field(s) onto {}", copied, type_name::<T>());

    serde_json::from_value(target_value).map_err(|err| Error::Configuration {
        message: format!("auto-translation produced an invalid {}: {}", type_name::<T>(), err),
        source: Some(err.into()),
    })
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn same_kind(left: &Value, right: &Value) -> bool {
    matches!(
        (left, right),
        (Value::String(_), Value::String(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::Bool(_), Value::Bool(_))
    )
}
