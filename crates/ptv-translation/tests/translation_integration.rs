//! Integration tests for the translation engine
//!
//! These tests drive complete translator pairs through the engine facade:
//! versioned create and update, dictionary round-trips, ordered collection
//! reconciliation, language availabilities and configuration loading.

mod test_support;

use ptv_translation::{
    Change, EngineConfig, Error, ErrorCategory, InMemoryStore, Language, LanguageAvailability,
    PublishingStatus, ReferenceDataCache, StaticReferenceData, TranslationEngine,
};
use std::io::Write;
use std::sync::Arc;
use test_support::*;

fn stored_guide() -> Guide {
    Guide {
        id: id(1),
        root_id: id(2),
        status: PublishingStatus::Published,
        titles: vec![
            GuideTitle {
                id: id(3),
                language_id: FI,
                text: "Opas".to_string(),
            },
            GuideTitle {
                id: id(4),
                language_id: EN,
                text: "Guide".to_string(),
            },
        ],
        steps: vec![
            Step {
                id: id(10),
                text: "A".to_string(),
                order_number: Some(0),
            },
            Step {
                id: id(11),
                text: "B".to_string(),
                order_number: Some(1),
            },
        ],
        availabilities: vec![LanguageAvailability::draft(FI), LanguageAvailability::draft(EN)],
    }
}

#[test]
fn test_create_produces_new_root_and_version() {
    let engine = engine(InMemoryStore::new());
    let vm = GuideVm {
        titles: titles(&[("fi", "Palvelu"), ("en", "Service")]),
        steps: vec![new_step("first"), new_step("second")],
        ..Default::default()
    };

    let translation = engine.to_entity_with_changes::<GuideVm, Guide>(&vm).unwrap();
    let guide = &translation.entity;

    assert_eq!(guide.status, PublishingStatus::Draft);
    assert_eq!(translation.changes.roots_created(), vec![guide.root_id]);
    assert_eq!(translation.changes.versions_created(), vec![guide.id]);
    assert!(matches!(
        translation.changes.changes()[1],
        Change::VersionCreated { previous_id: None, .. }
    ));

    let orders: Vec<Option<i32>> = guide.steps.iter().map(|step| step.order_number).collect();
    assert_eq!(orders, vec![Some(0), Some(1)]);
    assert!(guide.steps.iter().all(|step| !step.id.is_nil()));
    assert_eq!(translation.changes.collection("steps").unwrap().added.len(), 2);
}

#[test]
fn test_update_derives_new_version_from_stored_row() {
    let engine = engine(InMemoryStore::new().with(stored_guide()));
    let vm = GuideVm {
        id: Some(id(1)),
        titles: titles(&[("fi", "Opas")]),
        steps: vec![
            StepVm {
                id: Some(id(11)),
                text: "B".to_string(),
            },
            new_step("+358"),
        ],
        ..Default::default()
    };

    let translation = engine.to_entity_with_changes::<GuideVm, Guide>(&vm).unwrap();
    let guide = translation.entity;

    assert_ne!(guide.id, id(1));
    assert_eq!(guide.root_id, id(2));
    assert_eq!(guide.status, PublishingStatus::Modified);
    assert!(translation.changes.roots_created().is_empty());

    // B moves to the front, A is removed, the new step follows
    let steps = translation.changes.collection("steps").unwrap();
    assert_eq!(steps.updated, vec![id(11)]);
    assert_eq!(steps.removed, vec![id(10)]);
    assert_eq!(steps.added.len(), 1);
    assert_eq!(guide.steps[0].id, id(11));
    assert_eq!(guide.steps[0].order_number, Some(0));
    assert_eq!(guide.steps[1].text, "+358");
    assert_eq!(guide.steps[1].order_number, Some(1));

    // English lost its content and its availability
    assert_eq!(guide.titles.len(), 1);
    assert_eq!(guide.availabilities, vec![LanguageAvailability::draft(FI)]);
    assert_eq!(translation.changes.collection("titles").unwrap().removed, vec![id(4)]);
}

#[test]
fn test_update_of_unknown_id_is_not_a_create() {
    let engine = engine(InMemoryStore::new());
    let vm = GuideVm {
        id: Some(id(404)),
        ..Default::default()
    };

    let err = engine.to_entity::<GuideVm, Guide>(&vm).unwrap_err();
    assert!(matches!(err, Error::EntityNotFound { id: missing, .. } if missing == id(404)));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn test_orphan_step_reference_fails() {
    let engine = engine(InMemoryStore::new().with(stored_guide()));
    let vm = GuideVm {
        id: Some(id(1)),
        titles: titles(&[("fi", "Opas")]),
        steps: vec![StepVm {
            id: Some(id(99)),
            text: "ghost".to_string(),
        }],
        ..Default::default()
    };

    let err = engine.to_entity::<GuideVm, Guide>(&vm).unwrap_err();
    assert!(matches!(err, Error::OrphanReference { ref collection, .. } if collection == "steps"));
}

#[test]
fn test_dictionary_round_trip_omits_absent_language() {
    let engine = engine(InMemoryStore::new());
    let vm = GuideVm {
        titles: titles(&[("fi", "Palvelu"), ("en", "Service")]),
        ..Default::default()
    };

    let guide: Guide = engine.to_entity(&vm).unwrap();
    assert_eq!(guide.titles.len(), 2);
    assert!(guide.titles.iter().all(|title| title.language_id != SV));

    let back: GuideVm = engine.to_view_model(&guide).unwrap();
    assert_eq!(back.titles, vm.titles);
    assert!(!back.titles.contains_key("sv"));
}

#[test]
fn test_second_save_changes_no_collection() {
    let store = InMemoryStore::new();
    let vm = GuideVm {
        titles: titles(&[("fi", "Palvelu")]),
        steps: vec![new_step("one"), new_step("two"), new_step("three")],
        ..Default::default()
    };
    let first: Guide = engine(InMemoryStore::new()).to_entity(&vm).unwrap();
    store.insert(first.clone());

    let engine = engine(store);
    let echoed: GuideVm = engine.to_view_model(&first).unwrap();
    let second = engine.to_entity_with_changes::<GuideVm, Guide>(&echoed).unwrap();

    assert!(second.changes.collections_unchanged());
    assert_eq!(second.entity.steps, first.steps);
    assert_eq!(second.entity.titles, first.titles);
}

#[test]
fn test_language_statuses_round_trip() {
    let engine = engine(InMemoryStore::new().with(stored_guide()));
    let mut vm: GuideVm = engine.to_view_model(&stored_guide()).unwrap();
    assert_eq!(vm.languages.get("fi"), Some(&PublishingStatus::Draft));

    vm.languages.insert("en".to_string(), PublishingStatus::Archived);
    vm.languages.insert("fi".to_string(), PublishingStatus::Published);
    let guide: Guide = engine.to_entity(&vm).unwrap();

    let fi = guide.availabilities.iter().find(|a| a.language_id == FI).unwrap();
    let en = guide.availabilities.iter().find(|a| a.language_id == EN).unwrap();
    assert_eq!(fi.status, PublishingStatus::Published);
    assert!(fi.published_at.is_some());
    assert!(en.is_archived());
    assert!(en.archived_at.is_some());
}

#[test]
fn test_unknown_language_code_is_configuration_error() {
    let engine = engine(InMemoryStore::new());
    let vm = GuideVm {
        titles: titles(&[("de", "Dienst")]),
        ..Default::default()
    };

    let err = engine.to_entity::<GuideVm, Guide>(&vm).unwrap_err();
    assert!(matches!(err, Error::UnknownReferenceCode { table: "Language", .. }));
    assert!(err.is_configuration());
}

#[test]
fn test_engine_from_yaml_config_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"
auto_translation: true
order_origin: 1
default_language: fi
reference_data:
  Language:
    fi: "00000000-0000-0000-0000-0000000000f1"
    en: "00000000-0000-0000-0000-0000000000e1"
"#
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    let engine = TranslationEngine::builder()
        .registry(registry())
        .config(config)
        .build()
        .unwrap();

    assert!(engine.cache().is_populated());
    assert_eq!(engine.cache().get::<Language>("fi").unwrap(), FI);

    let vm = GuideVm {
        titles: titles(&[("fi", "Palvelu")]),
        steps: vec![new_step("one"), new_step("two")],
        ..Default::default()
    };
    let guide: Guide = engine.to_entity(&vm).unwrap();
    let orders: Vec<Option<i32>> = guide.steps.iter().map(|step| step.order_number).collect();
    assert_eq!(orders, vec![Some(1), Some(2)]);
}

#[test]
fn test_lazy_population_shared_cache() {
    let cache = Arc::new(ReferenceDataCache::new(StaticReferenceData::from_config(&config())));
    let engine = TranslationEngine::builder()
        .registry(registry())
        .cache(Arc::clone(&cache))
        .config(EngineConfig {
            populate_on_start: false,
            ..config()
        })
        .build()
        .unwrap();
    assert!(!cache.is_populated());

    let vm = GuideVm {
        titles: titles(&[("sv", "Tjänst")]),
        ..Default::default()
    };
    let guide: Guide = engine.to_entity(&vm).unwrap();

    assert_eq!(guide.titles[0].language_id, SV);
    assert!(cache.is_populated());
    assert_eq!(cache.load_count(), 1);
}
