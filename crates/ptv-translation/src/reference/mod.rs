//! Reference data caches
//!
//! "Type" tables (name types, phone number types, languages, ...) map stable
//! string codes to generated identifiers. They are loaded once per process
//! from a [`ReferenceDataSource`] and served read-only afterwards.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

pub mod cache;
pub mod source;

pub use cache::ReferenceDataCache;
pub use source::{ReferenceDataSource, ReferenceRow, StaticReferenceData};

/// Marker for a reference table
///
/// Implemented by zero-sized marker types, usually through
/// [`reference_type!`](crate::reference_type).
pub trait ReferenceType: 'static {
    /// Name of the backing table
    const TABLE: &'static str;
}

/// Declare a reference table marker type
///
/// ```
/// ptv_translation::reference_type!(
///     /// Kinds of phone numbers
///     PhoneNumberType => "PhoneNumberType"
/// );
///
/// use ptv_translation::reference::ReferenceType;
/// assert_eq!(PhoneNumberType::TABLE, "PhoneNumberType");
/// ```
#[macro_export]
macro_rules! reference_type {
    ($(#[$meta:meta])* $name:ident => $table:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl $crate::reference::ReferenceType for $name {
            const TABLE: &'static str = $table;
        }
    };
}

reference_type!(
    /// Languages content can be localized into; codes are ISO 639-1
    Language => "Language"
);
