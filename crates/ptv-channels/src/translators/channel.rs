//! Service channel translator
//!
//! Phone and fax numbers share one table. Each list reconciles only the rows
//! of its own kind, so an id from the other list is an orphan reference.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::entities::{Address, ServiceChannelPhone, ServiceChannelVersioned};
use crate::error::ChannelError;
use crate::reference::{codes, PhoneNumberType};
use crate::view_models::{AddressVm, ChannelBaseVm, PhoneNumberVm, ServiceChannelVm};
use ptv_translation::{CollectionOptions, Error, Result, TranslationContext, Translator};
use uuid::Uuid;

pub struct ServiceChannelTranslator;

/// Phones of the channel, fax numbers included or excluded, by order number
fn sorted_phones(
    channel: &ServiceChannelVersioned,
    fax: Uuid,
    faxes: bool,
) -> Vec<&ServiceChannelPhone> {
    let mut phones: Vec<_> = channel
        .phones
        .iter()
        .filter(|phone| (phone.type_id == fax) == faxes)
        .collect();
    phones.sort_by_key(|phone| phone.order_number.unwrap_or(i32::MAX));
    phones
}

/// Give an untyped row the list's type and reject one typed for the other list
fn settle_type(
    row: &mut ServiceChannelPhone,
    field: &str,
    default: Uuid,
    expected: &str,
    belongs: impl Fn(Uuid) -> bool,
) -> Result<()> {
    if row.type_id.is_nil() {
        row.type_id = default;
    }
    if belongs(row.type_id) {
        return Ok(());
    }
    Err(Error::Validation {
        field: field.to_string(),
        message: format!("phone {} has a type that belongs in the other number list", row.id),
        expected: Some(expected.to_string()),
    })
}

/// Stamp the channel's identity onto its children and claim the address
fn propagate_identity(
    channel: &mut ServiceChannelVersioned,
) -> std::result::Result<(), ChannelError> {
    if channel.id.is_nil() || channel.unificated_root_id.is_nil() {
        return Err(ChannelError::MissingIdentity);
    }

    let channel_id = channel.id;
    for phone in &mut channel.phones {
        phone.service_channel_versioned_id = channel_id;
    }
    for name in &mut channel.names {
        name.service_channel_versioned_id = channel_id;
    }
    for description in &mut channel.descriptions {
        description.service_channel_versioned_id = channel_id;
    }
    for keyword in &mut channel.keywords {
        keyword.service_channel_versioned_id = channel_id;
    }

    let root = channel.unificated_root_id;
    if let Some(address) = channel.address.as_mut() {
        match address.owner_reference_id {
            Some(owner) if owner != root => {
                return Err(ChannelError::AddressOwnedElsewhere {
                    address: address.id,
                    owner,
                    channel_root: root,
                });
            }
            Some(_) => {}
            None => {
                log::debug!("Address {} claimed by channel root {}", address.id, root);
                address.owner_reference_id = Some(root);
            }
        }
    }

    Ok(())
}

impl Translator<ServiceChannelVersioned, ServiceChannelVm> for ServiceChannelTranslator {
    fn translate_to_view_model(
        &self,
        entity: &ServiceChannelVersioned,
        target: ServiceChannelVm,
        ctx: &TranslationContext,
    ) -> Result<ServiceChannelVm> {
        let fax = ctx.cache().get::<PhoneNumberType>(codes::FAX)?;

        ctx.entity_view_model_definition(entity, target)
            .disable_auto_translation()
            .add_partial_view(|vm: &mut ServiceChannelVm, base: ChannelBaseVm| vm.base = base)
            .add_simple(
                "root_id",
                |channel: &ServiceChannelVersioned| Some(channel.unificated_root_id),
                |vm: &mut ServiceChannelVm, root| vm.root_id = root,
            )
            .add_simple(
                "publishing_status",
                |channel: &ServiceChannelVersioned| Some(channel.publishing_status),
                |vm: &mut ServiceChannelVm, status| vm.publishing_status = status,
            )
            .add_collection(
                "phone_numbers",
                move |channel: &ServiceChannelVersioned| sorted_phones(channel, fax, false),
                |vm: &mut ServiceChannelVm, phones: Vec<PhoneNumberVm>| vm.phone_numbers = phones,
            )
            .add_collection(
                "fax_numbers",
                move |channel: &ServiceChannelVersioned| sorted_phones(channel, fax, true),
                |vm: &mut ServiceChannelVm, faxes: Vec<PhoneNumberVm>| vm.fax_numbers = faxes,
            )
            .add_navigation(
                "address",
                |channel: &ServiceChannelVersioned| channel.address.as_ref(),
                |vm: &mut ServiceChannelVm, address: Option<AddressVm>| vm.address = address,
            )
            .get_final()
    }

    fn translate_to_entity(
        &self,
        vm: &ServiceChannelVm,
        target: ServiceChannelVersioned,
        ctx: &TranslationContext,
    ) -> Result<ServiceChannelVersioned> {
        let fax = ctx.cache().get::<PhoneNumberType>(codes::FAX)?;
        let phone = ctx.cache().get::<PhoneNumberType>(codes::PHONE)?;

        ctx.view_model_entity_definition(vm, target)
            .disable_auto_translation()
            .use_versioning(vm.base.id)
            .add_partial(|vm: &ServiceChannelVm| &vm.base)
            .add_collection_reconciled(
                "phone_numbers",
                |vm: &ServiceChannelVm| &vm.phone_numbers[..],
                |channel: &mut ServiceChannelVersioned| &mut channel.phones,
                CollectionOptions::new()
                    .within(move |row: &ServiceChannelPhone| row.type_id != fax)
                    .check_each(move |row: &mut ServiceChannelPhone| {
                        let belongs = |type_id: Uuid| type_id != fax;
                        settle_type(row, "phone_numbers", phone, "a non-fax type", belongs)
                    })
                    .ordered(),
            )
            .add_collection_reconciled(
                "fax_numbers",
                |vm: &ServiceChannelVm| &vm.fax_numbers[..],
                |channel: &mut ServiceChannelVersioned| &mut channel.phones,
                CollectionOptions::new()
                    .within(move |row: &ServiceChannelPhone| row.type_id == fax)
                    .check_each(move |row: &mut ServiceChannelPhone| {
                        let belongs = |type_id: Uuid| type_id == fax;
                        settle_type(row, "fax_numbers", fax, codes::FAX, belongs)
                    })
                    .ordered(),
            )
            .add_navigation(
                "address",
                |vm: &ServiceChannelVm| vm.address.as_ref(),
                |channel: &mut ServiceChannelVersioned, address: Option<Address>| {
                    channel.address = address
                },
            )
            .add_propagation(|channel: &mut ServiceChannelVersioned, _| {
                Ok(propagate_identity(channel)?)
            })
            .get_final()
    }
}
