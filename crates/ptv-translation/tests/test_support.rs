//! Shared test support utilities for integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use ptv_translation::{
    CollectionOptions, DictionaryRows, EngineConfig, Entity, FixedClock, Identifiable,
    InMemoryStore, LanguageAvailability, Orderable, PublishingStatus, Result, SequentialIds,
    TranslationContext, TranslationEngine, Translator, TranslatorRegistry, VersionedEntity,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

pub const FI: Uuid = Uuid::from_u128(0xf1);
pub const SV: Uuid = Uuid::from_u128(0x5f);
pub const EN: Uuid = Uuid::from_u128(0xe1);

/// Engine configuration with fi/sv/en languages
pub fn config() -> EngineConfig {
    EngineConfig::default()
        .with_reference("Language", "fi", FI)
        .with_reference("Language", "sv", SV)
        .with_reference("Language", "en", EN)
}

pub fn registry() -> TranslatorRegistry {
    let mut registry = TranslatorRegistry::new();
    registry.register(StepTranslator).register(GuideTranslator);
    registry
}

/// Deterministic engine over `store`
pub fn engine(store: InMemoryStore) -> TranslationEngine {
    TranslationEngine::builder()
        .registry(registry())
        .store(store)
        .ids(SequentialIds::starting_at(10_000))
        .clock(FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()))
        .config(config())
        .build()
        .unwrap()
}

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideTitle {
    pub id: Uuid,
    pub language_id: Uuid,
    pub text: String,
}

impl Entity for GuideTitle {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: Uuid,
    pub text: String,
    pub order_number: Option<i32>,
}

impl Entity for Step {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

impl Orderable for Step {
    fn order_number(&self) -> Option<i32> {
        self.order_number
    }

    fn set_order_number(&mut self, order: i32) {
        self.order_number = Some(order);
    }
}

/// Versioned entity with localized titles and an ordered child collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: Uuid,
    pub root_id: Uuid,
    pub status: PublishingStatus,
    pub titles: Vec<GuideTitle>,
    pub steps: Vec<Step>,
    pub availabilities: Vec<LanguageAvailability>,
}

impl Entity for Guide {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

impl VersionedEntity for Guide {
    fn root_id(&self) -> Uuid {
        self.root_id
    }

    fn set_root_id(&mut self, id: Uuid) {
        self.root_id = id;
    }

    fn publishing_status(&self) -> PublishingStatus {
        self.status
    }

    fn set_publishing_status(&mut self, status: PublishingStatus) {
        self.status = status;
    }

    fn language_availabilities(&self) -> &[LanguageAvailability] {
        &self.availabilities
    }

    fn language_availabilities_mut(&mut self) -> &mut Vec<LanguageAvailability> {
        &mut self.availabilities
    }

    fn content_languages(&self) -> BTreeSet<Uuid> {
        self.titles.iter().map(|title| title.language_id).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepVm {
    pub id: Option<Uuid>,
    pub text: String,
}

impl Identifiable for StepVm {
    fn identity(&self) -> Option<Uuid> {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideVm {
    pub id: Option<Uuid>,
    pub titles: BTreeMap<String, String>,
    pub steps: Vec<StepVm>,
    pub languages: BTreeMap<String, PublishingStatus>,
}

pub struct StepTranslator;

impl Translator<Step, StepVm> for StepTranslator {
    fn translate_to_view_model(
        &self,
        entity: &Step,
        target: StepVm,
        ctx: &TranslationContext,
    ) -> Result<StepVm> {
        ctx.entity_view_model_definition(entity, target)
            .add_simple("id", |step: &Step| Some(step.id), |vm: &mut StepVm, id| vm.id = id)
            .get_final()
    }

    fn translate_to_entity(
        &self,
        vm: &StepVm,
        target: Step,
        ctx: &TranslationContext,
    ) -> Result<Step> {
        ctx.view_model_entity_definition(vm, target)
            .disable_auto_translation()
            .add_simple(
                "text",
                |vm: &StepVm| vm.text.clone(),
                |step: &mut Step, text| step.text = text,
            )
            .get_final()
    }
}

pub struct GuideTranslator;

impl Translator<Guide, GuideVm> for GuideTranslator {
    fn translate_to_view_model(
        &self,
        entity: &Guide,
        target: GuideVm,
        ctx: &TranslationContext,
    ) -> Result<GuideVm> {
        ctx.entity_view_model_definition(entity, target)
            .add_simple("id", |guide: &Guide| Some(guide.id), |vm: &mut GuideVm, id| vm.id = id)
            .add_dictionary(
                "titles",
                |guide: &Guide| guide.titles.iter(),
                |title: &GuideTitle| title.language_id,
                |title: &GuideTitle| title.text.clone(),
                |vm: &mut GuideVm, titles| vm.titles = titles,
            )
            .add_collection(
                "steps",
                |guide: &Guide| &guide.steps[..],
                |vm: &mut GuideVm, steps| vm.steps = steps,
            )
            .add_language_statuses(|vm: &mut GuideVm, languages| vm.languages = languages)
            .get_final()
    }

    fn translate_to_entity(
        &self,
        vm: &GuideVm,
        target: Guide,
        ctx: &TranslationContext,
    ) -> Result<Guide> {
        ctx.view_model_entity_definition(vm, target)
            .use_versioning(vm.id)
            .add_dictionary_rows(
                "titles",
                |vm: &GuideVm| &vm.titles,
                |guide: &mut Guide| &mut guide.titles,
                DictionaryRows::by_language(|title: &GuideTitle| title.language_id),
                |language_id, text: &String, mut title: GuideTitle| {
                    title.language_id = language_id;
                    title.text = text.clone();
                    title
                },
            )
            .add_collection_reconciled(
                "steps",
                |vm: &GuideVm| &vm.steps[..],
                |guide: &mut Guide| &mut guide.steps,
                CollectionOptions::new().ordered(),
            )
            .add_language_availabilities(|vm: &GuideVm| &vm.languages)
            .get_final()
    }
}

pub fn titles(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(code, text)| (code.to_string(), text.to_string()))
        .collect()
}

pub fn new_step(text: &str) -> StepVm {
    StepVm {
        id: None,
        text: text.to_string(),
    }
}
