//! Translators between service channel entities and view models
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

pub mod address;
pub mod base;
pub mod channel;
pub mod list_item;
pub mod phone;

pub use address::AddressTranslator;
pub use base::ChannelBaseTranslator;
pub use channel::ServiceChannelTranslator;
pub use list_item::ServiceChannelListItemTranslator;
pub use phone::PhoneNumberTranslator;

use ptv_translation::TranslatorRegistry;

/// Register every service channel translator
pub fn register_translators(registry: &mut TranslatorRegistry) {
    registry
        .register(ChannelBaseTranslator)
        .register(ServiceChannelTranslator)
        .register(ServiceChannelListItemTranslator)
        .register(PhoneNumberTranslator)
        .register(AddressTranslator);
}
