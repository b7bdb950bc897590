//! Address translator
//!
//! Addresses are not versioned: an address view model with an id updates
//! the stored address in place, one without creates a new address.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::entities::{Address, AddressStreetName};
use crate::reference::AddressCharacter;
use crate::view_models::AddressVm;
use ptv_translation::{DictionaryRows, Result, TranslationContext, Translator};

pub struct AddressTranslator;

impl Translator<Address, AddressVm> for AddressTranslator {
    fn translate_to_view_model(
        &self,
        entity: &Address,
        target: AddressVm,
        ctx: &TranslationContext,
    ) -> Result<AddressVm> {
        ctx.entity_view_model_definition(entity, target)
            .add_simple_with(
                "character",
                |address: &Address, ctx| {
                    Ok(ctx
                        .cache()
                        .get_by_value::<AddressCharacter>(address.character_type_id)?
                        .to_string())
                },
                |vm: &mut AddressVm, character| vm.character = character,
            )
            .add_dictionary(
                "street",
                |address: &Address| address.street_names.iter(),
                |row: &AddressStreetName| row.localization_id,
                |row: &AddressStreetName| row.name.clone(),
                |vm: &mut AddressVm, street| vm.street = street,
            )
            .get_final()
    }

    fn translate_to_entity(
        &self,
        vm: &AddressVm,
        target: Address,
        ctx: &TranslationContext,
    ) -> Result<Address> {
        ctx.view_model_entity_definition(vm, target)
            .use_create_or_update(vm.id)
            .add_simple_with(
                "character_type_id",
                |vm: &AddressVm, ctx| ctx.cache().get::<AddressCharacter>(&vm.character),
                |address: &mut Address, id| address.character_type_id = id,
            )
            .add_dictionary_rows(
                "street_names",
                |vm: &AddressVm| &vm.street,
                |address: &mut Address| &mut address.street_names,
                DictionaryRows::by_language(|row: &AddressStreetName| row.localization_id),
                |language_id, name: &String, mut row: AddressStreetName| {
                    row.localization_id = language_id;
                    row.name.clone_from(name);
                    row
                },
            )
            .add_propagation(|address: &mut Address, _| {
                let address_id = address.id;
                for street in &mut address.street_names {
                    street.address_id = address_id;
                }
                Ok(())
            })
            .get_final()
    }
}
