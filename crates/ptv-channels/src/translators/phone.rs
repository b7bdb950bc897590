//! Phone number translator
//!
//! Number, prefix, additional information and order number are copied by
//! auto-translation; only the reference codes are mapped explicitly. An
//! item that omits its type or language keeps the stored one. A new row
//! without a language gets the request language, and one without a type is
//! left untyped for the owning list to settle.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::entities::ServiceChannelPhone;
use crate::reference::PhoneNumberType;
use crate::view_models::PhoneNumberVm;
use ptv_translation::{parse_language_code, Result, TranslationContext, Translator};
use uuid::Uuid;

pub struct PhoneNumberTranslator;

/// Language id given by the item or taken from the request
enum Resolved {
    Given(Uuid),
    Fallback(Uuid),
}

impl Resolved {
    fn apply(self, slot: &mut Uuid) {
        match self {
            Resolved::Given(id) => *slot = id,
            Resolved::Fallback(id) if slot.is_nil() => *slot = id,
            Resolved::Fallback(_) => {}
        }
    }
}

impl Translator<ServiceChannelPhone, PhoneNumberVm> for PhoneNumberTranslator {
    fn translate_to_view_model(
        &self,
        entity: &ServiceChannelPhone,
        target: PhoneNumberVm,
        ctx: &TranslationContext,
    ) -> Result<PhoneNumberVm> {
        ctx.entity_view_model_definition(entity, target)
            .add_simple_with(
                "type_code",
                |phone: &ServiceChannelPhone, ctx| {
                    Ok(ctx.cache().get_by_value::<PhoneNumberType>(phone.type_id)?.to_string())
                },
                |vm: &mut PhoneNumberVm, code| vm.type_code = Some(code),
            )
            .add_simple_with(
                "language",
                |phone: &ServiceChannelPhone, ctx| {
                    Ok(ctx.language_code(phone.localization_id)?.to_string())
                },
                |vm: &mut PhoneNumberVm, code| vm.language = Some(code),
            )
            .get_final()
    }

    fn translate_to_entity(
        &self,
        vm: &PhoneNumberVm,
        target: ServiceChannelPhone,
        ctx: &TranslationContext,
    ) -> Result<ServiceChannelPhone> {
        ctx.view_model_entity_definition(vm, target)
            .add_simple_with(
                "type_id",
                |vm: &PhoneNumberVm, ctx| {
                    vm.type_code
                        .as_deref()
                        .map(|code| ctx.cache().get::<PhoneNumberType>(code))
                        .transpose()
                },
                |phone: &mut ServiceChannelPhone, type_id: Option<Uuid>| {
                    if let Some(type_id) = type_id {
                        phone.type_id = type_id;
                    }
                },
            )
            .add_simple_with(
                "localization_id",
                |vm: &PhoneNumberVm, ctx| match vm.language.as_deref() {
                    Some(language) => {
                        let code = parse_language_code("language", language)?;
                        ctx.language_id(&code).map(Resolved::Given)
                    }
                    None => ctx.request_language_id().map(Resolved::Fallback),
                },
                |phone: &mut ServiceChannelPhone, resolved: Resolved| {
                    resolved.apply(&mut phone.localization_id)
                },
            )
            .get_final()
    }
}
