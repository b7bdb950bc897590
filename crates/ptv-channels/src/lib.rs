//! PTV Channels - Service channel translators for the PTV service registry
//!
//! Entities, view models and translators of service channels, built on the
//! `ptv-translation` engine. Call [`register_translators`] while building the
//! engine:
//!
//! ```no_run
//! use ptv_translation::{EngineConfig, TranslationEngine};
//!
//! let engine = TranslationEngine::builder()
//!     .register(ptv_channels::register_translators)
//!     .config(EngineConfig::default())
//!     .build();
//! ```
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

pub mod entities;
pub mod error;
pub mod reference;
pub mod translators;
pub mod view_models;

pub use entities::{
    Address, AddressStreetName, ServiceChannelDescription, ServiceChannelKeyword,
    ServiceChannelName, ServiceChannelPhone, ServiceChannelVersioned,
};
pub use error::ChannelError;
pub use reference::{codes, AddressCharacter, DescriptionType, NameType, PhoneNumberType};
pub use translators::register_translators;
pub use view_models::{
    AddressVm, ChannelBaseVm, PhoneNumberVm, ServiceChannelListItemVm, ServiceChannelVm,
};
