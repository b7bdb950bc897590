//! Persisted service channel entities
//!
//! A channel is stored as a versioned snapshot (`ServiceChannelVersioned`)
//! under a stable root id. Localized texts are child rows carrying a
//! localization id and, where several kinds share one table, a type id.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use ptv_translation::{Entity, LanguageAvailability, Orderable, PublishingStatus, VersionedEntity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

macro_rules! impl_entity {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl Entity for $entity {
                fn id(&self) -> Uuid {
                    self.id
                }

                fn set_id(&mut self, id: Uuid) {
                    self.id = id;
                }
            }
        )+
    };
}

/// One edit cycle of a service channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceChannelVersioned {
    pub id: Uuid,
    pub unificated_root_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub publishing_status: PublishingStatus,
    pub names: Vec<ServiceChannelName>,
    pub descriptions: Vec<ServiceChannelDescription>,
    pub keywords: Vec<ServiceChannelKeyword>,
    pub phones: Vec<ServiceChannelPhone>,
    pub area_ids: Vec<Uuid>,
    pub address: Option<Address>,
    pub language_availabilities: Vec<LanguageAvailability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceChannelName {
    pub id: Uuid,
    pub service_channel_versioned_id: Uuid,
    pub localization_id: Uuid,
    pub type_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceChannelDescription {
    pub id: Uuid,
    pub service_channel_versioned_id: Uuid,
    pub localization_id: Uuid,
    pub type_id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceChannelKeyword {
    pub id: Uuid,
    pub service_channel_versioned_id: Uuid,
    pub localization_id: Uuid,
    pub name: String,
}

/// Phone, SMS or fax number of a channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceChannelPhone {
    pub id: Uuid,
    pub service_channel_versioned_id: Uuid,
    pub localization_id: Uuid,
    pub type_id: Uuid,
    pub number: String,
    pub prefix: Option<String>,
    pub additional_information: Option<String>,
    pub order_number: Option<i32>,
}

/// Address shared by reference; owned by one channel root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub character_type_id: Uuid,
    pub postal_code: String,
    pub municipality: Option<String>,
    pub street_names: Vec<AddressStreetName>,
    pub owner_reference_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressStreetName {
    pub id: Uuid,
    pub address_id: Uuid,
    pub localization_id: Uuid,
    pub name: String,
}

impl_entity!(
    ServiceChannelVersioned,
    ServiceChannelName,
    ServiceChannelDescription,
    ServiceChannelKeyword,
    ServiceChannelPhone,
    Address,
    AddressStreetName,
);

impl Orderable for ServiceChannelPhone {
    fn order_number(&self) -> Option<i32> {
        self.order_number
    }

    fn set_order_number(&mut self, order: i32) {
        self.order_number = Some(order);
    }
}

impl VersionedEntity for ServiceChannelVersioned {
    fn root_id(&self) -> Uuid {
        self.unificated_root_id
    }

    fn set_root_id(&mut self, id: Uuid) {
        self.unificated_root_id = id;
    }

    fn publishing_status(&self) -> PublishingStatus {
        self.publishing_status
    }

    fn set_publishing_status(&mut self, status: PublishingStatus) {
        self.publishing_status = status;
    }

    fn language_availabilities(&self) -> &[LanguageAvailability] {
        &self.language_availabilities
    }

    fn language_availabilities_mut(&mut self) -> &mut Vec<LanguageAvailability> {
        &mut self.language_availabilities
    }

    /// Languages with any localized row: names, descriptions, keywords or phones
    fn content_languages(&self) -> BTreeSet<Uuid> {
        let names = self.names.iter().map(|name| name.localization_id);
        let descriptions = self.descriptions.iter().map(|description| description.localization_id);
        let keywords = self.keywords.iter().map(|keyword| keyword.localization_id);
        let phones = self.phones.iter().map(|phone| phone.localization_id);
        names
            .chain(descriptions)
            .chain(keywords)
            .chain(phones)
            .filter(|language_id| !language_id.is_nil())
            .collect()
    }
}

impl ServiceChannelVersioned {
    /// Phones of one type, in stored order
    pub fn phones_of_type(&self, type_id: Uuid) -> impl Iterator<Item = &ServiceChannelPhone> {
        self.phones.iter().filter(move |phone| phone.type_id == type_id)
    }
}
