//! Read-only search row for service channels
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::entities::{ServiceChannelName, ServiceChannelVersioned};
use crate::reference::{codes, NameType};
use crate::view_models::ServiceChannelListItemVm;
use ptv_translation::{Error, Result, TranslationContext, Translator};

pub struct ServiceChannelListItemTranslator;

impl Translator<ServiceChannelVersioned, ServiceChannelListItemVm>
    for ServiceChannelListItemTranslator
{
    fn translate_to_view_model(
        &self,
        entity: &ServiceChannelVersioned,
        target: ServiceChannelListItemVm,
        ctx: &TranslationContext,
    ) -> Result<ServiceChannelListItemVm> {
        let name_type = ctx.cache().get::<NameType>(codes::NAME)?;

        ctx.entity_view_model_definition(entity, target)
            .add_simple(
                "root_id",
                |channel: &ServiceChannelVersioned| channel.unificated_root_id,
                |vm: &mut ServiceChannelListItemVm, root| vm.root_id = root,
            )
            .add_localized(
                "name",
                move |channel: &ServiceChannelVersioned| {
                    channel.names.iter().filter(move |row| row.type_id == name_type)
                },
                |row: &ServiceChannelName| row.localization_id,
                |row: &ServiceChannelName| row.name.clone(),
                |vm: &mut ServiceChannelListItemVm, name| vm.name = name,
            )
            .add_language_statuses(|vm: &mut ServiceChannelListItemVm, statuses| {
                vm.language_statuses = statuses
            })
            .get_final()
    }

    fn translate_to_entity(
        &self,
        _vm: &ServiceChannelListItemVm,
        _target: ServiceChannelVersioned,
        _ctx: &TranslationContext,
    ) -> Result<ServiceChannelVersioned> {
        Err(Error::Configuration {
            message: "Service channel list items are read-only".to_string(),
            source: None,
        })
    }
}
