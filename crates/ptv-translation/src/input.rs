//! Parsing of upstream input values
//!
//! Identifier strings, language codes and enum names arrive from callers as
//! text. Failures are reported as [`Error::Validation`] carrying the list of
//! accepted values rather than a raw parser message.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use std::str::FromStr;
use uuid::Uuid;

/// Enums that can enumerate their accepted textual values
pub trait EnumValues {
    const VALUES: &'static [&'static str];
}

/// Parse a required identifier
pub fn parse_identifier(field: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| Error::Validation {
        field: field.to_string(),
        message: format!("'{}' is not a valid identifier", value),
        expected: Some("A UUID such as 3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string()),
    })
}

/// Parse an optional identifier; empty input means "not set"
pub fn parse_optional_identifier(field: &str, value: Option<&str>) -> Result<Option<Uuid>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_identifier(field, text).map(Some),
    }
}

/// Parse a two-letter language code, optionally with a region (`fi`, `en-GB`)
pub fn parse_language_code(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    let (language, region) = match trimmed.split_once('-') {
        Some((language, region)) => (language, Some(region)),
        None => (trimmed, None),
    };

    let language_ok = language.len() == 2 && language.chars().all(|c| c.is_ascii_lowercase());
    let region_ok =
        region.map_or(true, |r| r.len() == 2 && r.chars().all(|c| c.is_ascii_uppercase()));

    if language_ok && region_ok {
        Ok(trimmed.to_string())
    } else {
        Err(Error::Validation {
            field: field.to_string(),
            message: format!("'{}' is not a language code", value),
            expected: Some("A lowercase ISO 639-1 code such as 'fi' or 'en-GB'".to_string()),
        })
    }
}

/// Parse an enum value, reporting the valid names on failure
pub fn parse_enum<E>(field: &str, value: &str) -> Result<E>
where
    E: FromStr + EnumValues,
{
    value.trim().parse::<E>().map_err(|_| Error::Validation {
        field: field.to_string(),
        message: format!("'{}' is not a recognised value", value),
        expected: Some(format!("One of: {}", E::VALUES.join(", "))),
    })
}
