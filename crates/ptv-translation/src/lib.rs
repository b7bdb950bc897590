//! PTV Translation - Declarative entity <-> view model translation engine
//!
//! This crate converts between persisted, versioned, multi-language entities
//! of the PTV service registry and the flat view models consumed by the API,
//! in both directions, through declarative translation definitions.
//!
//! # Main Components
//!
//! - **Translation Definitions**: Ordered plans of field mappings built per call
//! - **Translator Registry**: Typed lookup of translators by `(entity, view model)` pair
//! - **Collection Reconciler**: Add/update/remove diff of child collections
//! - **Versioning Resolver**: Create-vs-update decisions for root/versioned entities
//! - **Reference Data Cache**: Stable codes to generated ids, populated once
//!
//! # Example
//!
//! ```no_run
//! use ptv_translation::{EngineConfig, Result, TranslationEngine, TranslatorRegistry};
//!
//! fn example() -> Result<()> {
//!     let config = EngineConfig::from_file("engine.yaml")?;
//!     let engine = TranslationEngine::builder()
//!         .registry(TranslatorRegistry::new())
//!         .config(config)
//!         .build()?;
//!     assert!(engine.cache().is_populated());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod reconcile;
pub mod reference;
pub mod store;
pub mod translation;
pub mod types;
pub mod versioning;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use error::{Error, ErrorCategory, Result, Severity};
pub use input::{
    parse_enum, parse_identifier, parse_language_code, parse_optional_identifier, EnumValues,
};
pub use reconcile::{CollectionReconciler, Reconciliation};
pub use reference::{
    Language, ReferenceDataCache, ReferenceDataSource, ReferenceRow, ReferenceType,
    StaticReferenceData,
};
pub use store::{
    Clock, EmptyStore, EntityStore, FixedClock, IdGenerator, InMemoryStore, RandomIds,
    SequentialIds, SystemClock,
};
pub use translation::{
    Change, ChangeSet, CollectionChanges, CollectionOptions, DictionaryRows, EntityTranslation,
    FieldMapping, MappingKind, TranslationContext, TranslationDefinition, TranslationDirection,
    TranslationEngine, TranslationEngineBuilder, Translator, TranslatorRegistry,
};
pub use types::{
    Entity, Identifiable, LanguageAvailability, Orderable, PublishingStatus, VersionedEntity,
};
pub use versioning::{VersionResolution, VersionState, VersioningResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
