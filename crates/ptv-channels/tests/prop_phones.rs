//! Property-based tests for phone reconciliation on a stored channel
//!
//! Whatever subset and order of the stored phones comes back, plus any
//! number of new ones, the phone partition follows the incoming order, keeps
//! the requested types and leaves the fax partition alone.

mod test_support;

use proptest::prelude::*;
use ptv_channels::{PhoneNumberVm, ServiceChannelVersioned, ServiceChannelVm};
use ptv_translation::InMemoryStore;
use test_support::*;
use uuid::Uuid;

/// New number with no type, or an explicit phone or SMS type
fn fresh_phone() -> impl Strategy<Value = (String, Option<&'static str>)> {
    let type_code = proptest::option::of(prop_oneof![Just("Phone"), Just("Sms")]);
    ("\\+358 [0-9]{2} [0-9]{3,6}", type_code)
}

/// Existing phone ids (a subset, shuffled) followed by new numbers
fn incoming() -> impl Strategy<Value = (Vec<u128>, Vec<(String, Option<&'static str>)>)> {
    let existing = proptest::sample::subsequence(vec![10u128, 11], 0..=2).prop_shuffle();
    let fresh = proptest::collection::vec(fresh_phone(), 0..4);
    (existing, fresh)
}

fn expected_type(type_code: Option<&str>) -> Uuid {
    match type_code {
        Some("Sms") => SMS,
        _ => PHONE,
    }
}

proptest! {
    #[test]
    fn prop_phone_order_follows_request((existing, fresh) in incoming()) {
        let engine = engine(InMemoryStore::new().with(stored_channel()));
        let mut phone_numbers: Vec<PhoneNumberVm> =
            existing.iter().map(|&n| existing_phone(n)).collect();
        phone_numbers.extend(fresh.iter().map(|(number, type_code)| PhoneNumberVm {
            type_code: type_code.map(str::to_string),
            ..new_phone(number)
        }));
        let vm = ServiceChannelVm {
            base: stored_base(),
            phone_numbers,
            fax_numbers: vec![existing_phone(12)],
            ..Default::default()
        };

        let translation = engine
            .to_entity_with_changes::<ServiceChannelVm, ServiceChannelVersioned>(&vm)
            .unwrap();
        let channel = &translation.entity;

        let mut phones: Vec<_> = channel
            .phones
            .iter()
            .filter(|phone| phone.type_id != FAX)
            .collect();
        phones.sort_by_key(|phone| phone.order_number);
        prop_assert_eq!(phones.len(), existing.len() + fresh.len());
        for (position, phone) in phones.iter().enumerate() {
            prop_assert_eq!(phone.order_number, Some(position as i32));
        }
        for (phone, n) in phones.iter().zip(&existing) {
            prop_assert_eq!(phone.id, id(*n));
            prop_assert_eq!(phone.type_id, PHONE);
        }
        for (phone, (number, type_code)) in phones.iter().skip(existing.len()).zip(&fresh) {
            prop_assert_eq!(&phone.number, number);
            prop_assert_eq!(phone.type_id, expected_type(*type_code));
        }

        let mut removed = translation.changes.collection("phone_numbers").unwrap().removed.clone();
        removed.sort();
        let expected: Vec<_> = [10u128, 11]
            .into_iter()
            .filter(|n| !existing.contains(n))
            .map(id)
            .collect();
        prop_assert_eq!(removed, expected);

        prop_assert_eq!(channel.phones_of_type(FAX).count(), 1);
    }
}
