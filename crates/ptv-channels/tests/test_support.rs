//! Shared fixtures for the service channel tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use ptv_channels::codes;
use ptv_channels::{
    Address, AddressStreetName, ChannelBaseVm, PhoneNumberVm, ServiceChannelDescription,
    ServiceChannelName, ServiceChannelPhone, ServiceChannelVersioned,
};
use ptv_translation::{
    EngineConfig, FixedClock, InMemoryStore, LanguageAvailability, PublishingStatus, SequentialIds,
    TranslationEngine, TranslatorRegistry,
};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const FI: Uuid = Uuid::from_u128(0xf1);
pub const SV: Uuid = Uuid::from_u128(0x5f);
pub const EN: Uuid = Uuid::from_u128(0xe1);

pub const NAME: Uuid = Uuid::from_u128(0x100);
pub const ALTERNATE_NAME: Uuid = Uuid::from_u128(0x101);
pub const DESCRIPTION: Uuid = Uuid::from_u128(0x110);
pub const SHORT_DESCRIPTION: Uuid = Uuid::from_u128(0x111);
pub const PHONE: Uuid = Uuid::from_u128(0x120);
pub const SMS: Uuid = Uuid::from_u128(0x121);
pub const FAX: Uuid = Uuid::from_u128(0x122);
pub const VISITING: Uuid = Uuid::from_u128(0x130);
pub const POSTAL: Uuid = Uuid::from_u128(0x131);

/// Languages and every reference table the channel translators use
pub fn config() -> EngineConfig {
    let mut config = EngineConfig::default()
        .with_reference("Language", "fi", FI)
        .with_reference("Language", "sv", SV)
        .with_reference("Language", "en", EN)
        .with_reference("NameType", codes::NAME, NAME)
        .with_reference("NameType", codes::ALTERNATE_NAME, ALTERNATE_NAME)
        .with_reference("DescriptionType", codes::DESCRIPTION, DESCRIPTION)
        .with_reference("DescriptionType", codes::SHORT_DESCRIPTION, SHORT_DESCRIPTION)
        .with_reference("PhoneNumberType", codes::PHONE, PHONE)
        .with_reference("PhoneNumberType", codes::SMS, SMS)
        .with_reference("PhoneNumberType", codes::FAX, FAX)
        .with_reference("AddressCharacter", codes::VISITING, VISITING)
        .with_reference("AddressCharacter", codes::POSTAL, POSTAL);
    config.default_language = Some("fi".to_string());
    config
}

pub fn registry() -> TranslatorRegistry {
    let mut registry = TranslatorRegistry::new();
    ptv_channels::register_translators(&mut registry);
    registry
}

pub fn engine_with(registry: TranslatorRegistry, store: InMemoryStore) -> TranslationEngine {
    TranslationEngine::builder()
        .registry(registry)
        .store(store)
        .ids(SequentialIds::starting_at(1000))
        .clock(FixedClock(Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()))
        .config(config())
        .build()
        .unwrap()
}

/// Deterministic engine with every channel translator registered
pub fn engine(store: InMemoryStore) -> TranslationEngine {
    engine_with(registry(), store)
}

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn texts(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(code, text)| (code.to_string(), text.to_string()))
        .collect()
}

pub fn phone(n: u128, type_id: Uuid, number: &str, order: i32) -> ServiceChannelPhone {
    ServiceChannelPhone {
        id: id(n),
        service_channel_versioned_id: id(1),
        localization_id: FI,
        type_id,
        number: number.to_string(),
        prefix: None,
        additional_information: None,
        order_number: Some(order),
    }
}

/// Reference to an existing phone row with every other field omitted
pub fn existing_phone(n: u128) -> PhoneNumberVm {
    PhoneNumberVm {
        id: Some(id(n)),
        ..Default::default()
    }
}

pub fn new_phone(number: &str) -> PhoneNumberVm {
    PhoneNumberVm {
        number: Some(number.to_string()),
        ..Default::default()
    }
}

/// Published channel with phones A (order 0) and B (order 1) and one fax
pub fn stored_channel() -> ServiceChannelVersioned {
    ServiceChannelVersioned {
        id: id(1),
        unificated_root_id: id(2),
        organization_id: Some(id(3)),
        publishing_status: PublishingStatus::Published,
        names: vec![
            ServiceChannelName {
                id: id(4),
                service_channel_versioned_id: id(1),
                localization_id: FI,
                type_id: NAME,
                name: "Asiointipiste".to_string(),
            },
            ServiceChannelName {
                id: id(5),
                service_channel_versioned_id: id(1),
                localization_id: EN,
                type_id: NAME,
                name: "Service point".to_string(),
            },
        ],
        descriptions: vec![ServiceChannelDescription {
            id: id(6),
            service_channel_versioned_id: id(1),
            localization_id: FI,
            type_id: DESCRIPTION,
            description: "Palvelupiste keskustassa".to_string(),
        }],
        keywords: Vec::new(),
        phones: vec![
            phone(10, PHONE, "+358 9 111", 0),
            phone(11, PHONE, "+358 9 222", 1),
            phone(12, FAX, "+358 9 999", 0),
        ],
        area_ids: Vec::new(),
        address: None,
        language_availabilities: vec![
            LanguageAvailability::draft(FI),
            LanguageAvailability::draft(EN),
        ],
    }
}

/// Base view model matching the stored channel's texts
pub fn stored_base() -> ChannelBaseVm {
    ChannelBaseVm {
        id: Some(id(1)),
        organization_id: Some(id(3)),
        name: texts(&[("fi", "Asiointipiste"), ("en", "Service point")]),
        description: texts(&[("fi", "Palvelupiste keskustassa")]),
        ..Default::default()
    }
}

pub fn stored_address(owner: Option<Uuid>) -> Address {
    Address {
        id: id(50),
        character_type_id: VISITING,
        postal_code: "00100".to_string(),
        municipality: Some("Helsinki".to_string()),
        street_names: vec![AddressStreetName {
            id: id(51),
            address_id: id(50),
            localization_id: FI,
            name: "Mannerheimintie".to_string(),
        }],
        owner_reference_id: owner,
    }
}
