//! Service channel view models
//!
//! Localized texts are exposed as maps keyed by language code. A missing
//! `id` means "create".
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use ptv_translation::{Identifiable, PublishingStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Fields shared by every channel kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelBaseVm {
    pub id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub name: BTreeMap<String, String>,
    pub alternate_name: BTreeMap<String, String>,
    pub short_description: BTreeMap<String, String>,
    pub description: BTreeMap<String, String>,
    pub keywords: BTreeMap<String, Vec<String>>,
    pub area_ids: Vec<Uuid>,
    pub language_statuses: BTreeMap<String, PublishingStatus>,
}

/// Service channel with its phone numbers and address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceChannelVm {
    #[serde(flatten)]
    pub base: ChannelBaseVm,
    pub root_id: Option<Uuid>,
    pub publishing_status: Option<PublishingStatus>,
    pub phone_numbers: Vec<PhoneNumberVm>,
    pub fax_numbers: Vec<PhoneNumberVm>,
    pub address: Option<AddressVm>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumberVm {
    pub id: Option<Uuid>,
    pub number: Option<String>,
    pub prefix: Option<String>,
    pub additional_information: Option<String>,
    pub type_code: Option<String>,
    pub language: Option<String>,
    pub order_number: Option<i32>,
}

impl Identifiable for PhoneNumberVm {
    fn identity(&self) -> Option<Uuid> {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressVm {
    pub id: Option<Uuid>,
    pub character: String,
    pub postal_code: String,
    pub municipality: Option<String>,
    pub street: BTreeMap<String, String>,
}

impl Identifiable for AddressVm {
    fn identity(&self) -> Option<Uuid> {
        self.id
    }
}

/// Search result row, rendered in the request language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceChannelListItemVm {
    pub id: Uuid,
    pub root_id: Uuid,
    pub name: Option<String>,
    pub publishing_status: PublishingStatus,
    pub language_statuses: BTreeMap<String, PublishingStatus>,
}
