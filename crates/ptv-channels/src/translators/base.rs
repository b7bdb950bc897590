//! Translator for the fields every channel kind shares
//!
//! Composed into the concrete channel translators as a partial: it builds
//! onto the snapshot the outer translator has already resolved and never
//! decides create-vs-update itself.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::entities::{
    ServiceChannelDescription, ServiceChannelKeyword, ServiceChannelName, ServiceChannelVersioned,
};
use crate::reference::{codes, DescriptionType, NameType};
use crate::view_models::ChannelBaseVm;
use ptv_translation::{DictionaryRows, Result, TranslationContext, Translator};
use uuid::Uuid;

pub struct ChannelBaseTranslator;

/// Name and description type ids, resolved once per call
#[derive(Clone, Copy)]
struct TextTypes {
    name: Uuid,
    alternate_name: Uuid,
    description: Uuid,
    short_description: Uuid,
}

impl TextTypes {
    fn resolve(ctx: &TranslationContext) -> Result<Self> {
        let cache = ctx.cache();
        Ok(Self {
            name: cache.get::<NameType>(codes::NAME)?,
            alternate_name: cache.get::<NameType>(codes::ALTERNATE_NAME)?,
            description: cache.get::<DescriptionType>(codes::DESCRIPTION)?,
            short_description: cache.get::<DescriptionType>(codes::SHORT_DESCRIPTION)?,
        })
    }
}

fn names_of(type_id: Uuid) -> DictionaryRows<'static, ServiceChannelName> {
    DictionaryRows::by_language(|row: &ServiceChannelName| row.localization_id)
        .within(move |row: &ServiceChannelName| row.type_id == type_id)
}

fn build_name(type_id: Uuid) -> impl Fn(Uuid, &String, ServiceChannelName) -> ServiceChannelName {
    move |language_id, text, mut row| {
        row.localization_id = language_id;
        row.type_id = type_id;
        row.name.clone_from(text);
        row
    }
}

fn descriptions_of(type_id: Uuid) -> DictionaryRows<'static, ServiceChannelDescription> {
    DictionaryRows::by_language(|row: &ServiceChannelDescription| row.localization_id)
        .within(move |row: &ServiceChannelDescription| row.type_id == type_id)
}

fn build_description(
    type_id: Uuid,
) -> impl Fn(Uuid, &String, ServiceChannelDescription) -> ServiceChannelDescription {
    move |language_id, text, mut row| {
        row.localization_id = language_id;
        row.type_id = type_id;
        row.description.clone_from(text);
        row
    }
}

impl Translator<ServiceChannelVersioned, ChannelBaseVm> for ChannelBaseTranslator {
    fn translate_to_view_model(
        &self,
        entity: &ServiceChannelVersioned,
        target: ChannelBaseVm,
        ctx: &TranslationContext,
    ) -> Result<ChannelBaseVm> {
        let types = TextTypes::resolve(ctx)?;

        ctx.entity_view_model_definition(entity, target)
            .disable_auto_translation()
            .add_simple(
                "id",
                |channel: &ServiceChannelVersioned| Some(channel.id),
                |vm: &mut ChannelBaseVm, id| vm.id = id,
            )
            .add_simple(
                "organization_id",
                |channel: &ServiceChannelVersioned| channel.organization_id,
                |vm: &mut ChannelBaseVm, id| vm.organization_id = id,
            )
            .add_dictionary(
                "name",
                move |channel: &ServiceChannelVersioned| {
                    channel.names.iter().filter(move |row| row.type_id == types.name)
                },
                |row: &ServiceChannelName| row.localization_id,
                |row: &ServiceChannelName| row.name.clone(),
                |vm: &mut ChannelBaseVm, names| vm.name = names,
            )
            .add_dictionary(
                "alternate_name",
                move |channel: &ServiceChannelVersioned| {
                    channel.names.iter().filter(move |row| row.type_id == types.alternate_name)
                },
                |row: &ServiceChannelName| row.localization_id,
                |row: &ServiceChannelName| row.name.clone(),
                |vm: &mut ChannelBaseVm, names| vm.alternate_name = names,
            )
            .add_dictionary(
                "description",
                move |channel: &ServiceChannelVersioned| {
                    channel.descriptions.iter().filter(move |row| row.type_id == types.description)
                },
                |row: &ServiceChannelDescription| row.localization_id,
                |row: &ServiceChannelDescription| row.description.clone(),
                |vm: &mut ChannelBaseVm, descriptions| vm.description = descriptions,
            )
            .add_dictionary(
                "short_description",
                move |channel: &ServiceChannelVersioned| {
                    let short = types.short_description;
                    channel.descriptions.iter().filter(move |row| row.type_id == short)
                },
                |row: &ServiceChannelDescription| row.localization_id,
                |row: &ServiceChannelDescription| row.description.clone(),
                |vm: &mut ChannelBaseVm, descriptions| vm.short_description = descriptions,
            )
            .add_dictionary_list(
                "keywords",
                |channel: &ServiceChannelVersioned| channel.keywords.iter(),
                |row: &ServiceChannelKeyword| row.localization_id,
                |row: &ServiceChannelKeyword| row.name.clone(),
                |vm: &mut ChannelBaseVm, keywords| vm.keywords = keywords,
            )
            .add_simple_list(
                "area_ids",
                |channel: &ServiceChannelVersioned| channel.area_ids.iter().copied(),
                |vm: &mut ChannelBaseVm, ids| vm.area_ids = ids,
            )
            .add_language_statuses(|vm: &mut ChannelBaseVm, statuses| {
                vm.language_statuses = statuses
            })
            .get_final()
    }

    fn translate_to_entity(
        &self,
        vm: &ChannelBaseVm,
        target: ServiceChannelVersioned,
        ctx: &TranslationContext,
    ) -> Result<ServiceChannelVersioned> {
        let types = TextTypes::resolve(ctx)?;

        ctx.view_model_entity_definition(vm, target)
            .disable_auto_translation()
            .add_simple(
                "organization_id",
                |vm: &ChannelBaseVm| vm.organization_id,
                |channel: &mut ServiceChannelVersioned, id| channel.organization_id = id,
            )
            .add_dictionary_rows(
                "names",
                |vm: &ChannelBaseVm| &vm.name,
                |channel: &mut ServiceChannelVersioned| &mut channel.names,
                names_of(types.name),
                build_name(types.name),
            )
            .add_dictionary_rows(
                "alternate_names",
                |vm: &ChannelBaseVm| &vm.alternate_name,
                |channel: &mut ServiceChannelVersioned| &mut channel.names,
                names_of(types.alternate_name),
                build_name(types.alternate_name),
            )
            .add_dictionary_rows(
                "descriptions",
                |vm: &ChannelBaseVm| &vm.description,
                |channel: &mut ServiceChannelVersioned| &mut channel.descriptions,
                descriptions_of(types.description),
                build_description(types.description),
            )
            .add_dictionary_rows(
                "short_descriptions",
                |vm: &ChannelBaseVm| &vm.short_description,
                |channel: &mut ServiceChannelVersioned| &mut channel.descriptions,
                descriptions_of(types.short_description),
                build_description(types.short_description),
            )
            .add_dictionary_list_rows(
                "keywords",
                |vm: &ChannelBaseVm| &vm.keywords,
                |channel: &mut ServiceChannelVersioned| &mut channel.keywords,
                DictionaryRows::by_language(|row: &ServiceChannelKeyword| row.localization_id),
                |row: &ServiceChannelKeyword, keyword: &String| row.name == *keyword,
                |language_id, keyword: &String, mut row: ServiceChannelKeyword| {
                    row.localization_id = language_id;
                    row.name.clone_from(keyword);
                    row
                },
            )
            .add_simple_list(
                "area_ids",
                |vm: &ChannelBaseVm| vm.area_ids.iter().copied(),
                |channel: &mut ServiceChannelVersioned, ids| channel.area_ids = ids,
            )
            .add_language_availabilities(|vm: &ChannelBaseVm| &vm.language_statuses)
            .get_final()
    }
}
