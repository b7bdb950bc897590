//! Collection reconciliation
//!
//! Reconciles an incoming ordered sequence of desired child items against the
//! rows that are currently persisted for a parent. Items without an identity
//! become new rows, items with an identity update the existing row with that
//! id, and existing rows nobody referenced are removed when the removal
//! predicate matches them.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::translation::changes::CollectionChanges;
use crate::types::{Entity, Identifiable, Orderable};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

struct OrderSpec<R> {
    origin: i32,
    assign: fn(&mut R, i32),
}

/// Outcome of reconciling one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<R> {
    /// Final collection: retained rows first, then the desired rows in incoming order
    pub rows: Vec<R>,
    pub added: Vec<Uuid>,
    pub updated: Vec<Uuid>,
    pub unchanged: Vec<Uuid>,
    /// Existing rows dropped from the collection
    pub removed: Vec<R>,
    /// Unreferenced rows the removal predicate spared
    pub retained: Vec<Uuid>,
}

impl<R> Reconciliation<R> {
    pub(crate) fn empty() -> Self {
        Self {
            rows: Vec::new(),
            added: Vec::new(),
            updated: Vec::new(),
            unchanged: Vec::new(),
            removed: Vec::new(),
            retained: Vec::new(),
        }
    }

    /// True when the collection needs any write
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }
}

impl<R: Entity> Reconciliation<R> {
    /// Summary recorded in the change set
    pub fn to_changes(&self, collection: &str) -> CollectionChanges {
        CollectionChanges {
            collection: collection.to_string(),
            added: self.added.clone(),
            updated: self.updated.clone(),
            unchanged: self.unchanged.clone(),
            removed: self.removed.iter().map(Entity::id).collect(),
        }
    }
}

/// Add/update/remove diff for one child collection
pub struct CollectionReconciler<'r, R> {
    collection: String,
    removal: Option<Box<dyn Fn(&R) -> bool + 'r>>,
    ordering: Option<OrderSpec<R>>,
}

impl<'r, R> CollectionReconciler<'r, R>
where
    R: Entity + Clone + Default + PartialEq,
{
    /// Reconciler removing every unreferenced row
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            removal: None,
            ordering: None,
        }
    }

    pub(crate) fn with_ordering(mut self, origin: i32, assign: fn(&mut R, i32)) -> Self {
        self.ordering = Some(OrderSpec { origin, assign });
        self
    }

    /// Only remove unreferenced rows matching `predicate`; the rest are retained
    pub fn remove_when(mut self, predicate: impl Fn(&R) -> bool + 'r) -> Self {
        self.removal = Some(Box::new(predicate));
        self
    }

    /// Never remove unreferenced rows
    pub fn keep_unreferenced(self) -> Self {
        self.remove_when(|_| false)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Reconcile `incoming` against `existing`
    ///
    /// `translate` materializes one incoming item onto either the existing
    /// row it refers to or a default row; `allocate` hands out identifiers for
    /// new rows that came back without one.
    pub fn reconcile<'i, I, F, G>(
        &self,
        incoming: impl IntoIterator<Item = &'i I>,
        existing: Vec<R>,
        mut translate: F,
        mut allocate: G,
    ) -> Result<Reconciliation<R>>
    where
        I: Identifiable + 'i,
        F: FnMut(&I, R) -> Result<R>,
        G: FnMut() -> Uuid,
    {
        let mut pool: Vec<Option<R>> = existing.into_iter().map(Some).collect();
        let index: HashMap<Uuid, usize> = pool
            .iter()
            .enumerate()
            .filter_map(|(position, row)| row.as_ref().map(|row| (row.id(), position)))
            .collect();

        let mut referenced = HashSet::new();
        let mut desired: Vec<(R, Option<R>)> = Vec::new();

        for item in incoming {
            match item.identity() {
                None => {
                    let mut row = translate(item, R::default())?;
                    if row.id().is_nil() {
                        row.set_id(allocate());
                    }
                    desired.push((row, None));
                }
                Some(id) => {
                    if !referenced.insert(id) {
                        return Err(Error::DuplicateReference {
                            collection: self.collection.clone(),
                            id,
                        });
                    }

                    let previous = index
                        .get(&id)
                        .and_then(|&position| pool[position].take())
                        .ok_or_else(|| Error::OrphanReference {
                            collection: self.collection.clone(),
                            id,
                        })?;

                    let mut row = translate(item, previous.clone())?;
                    row.set_id(id);
                    desired.push((row, Some(previous)));
                }
            }
        }

        if let Some(ordering) = &self.ordering {
            for (position, (row, _)) in desired.iter_mut().enumerate() {
                (ordering.assign)(row, ordering.origin + position as i32);
            }
        }

        let mut outcome = Reconciliation::empty();

        for row in pool.into_iter().flatten() {
            let remove = self.removal.as_ref().map_or(true, |predicate| predicate(&row));
            if remove {
                outcome.removed.push(row);
            } else {
                outcome.retained.push(row.id());
                outcome.rows.push(row);
            }
        }

        for (row, previous) in desired {
            match previous {
                None => outcome.added.push(row.id()),
                Some(previous) if previous == row => outcome.unchanged.push(row.id()),
                Some(_) => outcome.updated.push(row.id()),
            }
            outcome.rows.push(row);
        }

        log::debug!(
            "Reconciled '{}': {} added, {} updated, {} unchanged, {} removed, {} retained",
            self.collection,
            outcome.added.len(),
            outcome.updated.len(),
            outcome.unchanged.len(),
            outcome.removed.len(),
            outcome.retained.len()
        );

        Ok(outcome)
    }
}

impl<'r, R> CollectionReconciler<'r, R>
where
    R: Entity + Orderable + Clone + Default + PartialEq,
{
    /// Re-number desired rows `origin, origin + 1, ...` in incoming order
    pub fn ordered_from(self, origin: i32) -> Self {
        self.with_ordering(origin, <R as Orderable>::set_order_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Phone {
        id: Uuid,
        number: String,
        kind: &'static str,
        order: Option<i32>,
    }

    impl Entity for Phone {
        fn id(&self) -> Uuid {
            self.id
        }

        fn set_id(&mut self, id: Uuid) {
            self.id = id;
        }
    }

    impl Orderable for Phone {
        fn order_number(&self) -> Option<i32> {
            self.order
        }

        fn set_order_number(&mut self, order: i32) {
            self.order = Some(order);
        }
    }

    struct PhoneVm {
        id: Option<Uuid>,
        number: Option<&'static str>,
    }

    impl Identifiable for PhoneVm {
        fn identity(&self) -> Option<Uuid> {
            self.id
        }
    }

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn phone(n: u128, number: &str, order: i32) -> Phone {
        Phone {
            id: id(n),
            number: number.to_string(),
            kind: "Phone",
            order: Some(order),
        }
    }

    fn translate(item: &PhoneVm, mut row: Phone) -> Result<Phone> {
        if let Some(number) = item.number {
            row.number = number.to_string();
        }
        row.kind = "Phone";
        Ok(row)
    }

    fn allocator() -> impl FnMut() -> Uuid {
        let mut next = 100;
        move || {
            next += 1;
            id(next)
        }
    }

    #[test]
    fn test_update_remove_and_create_with_ordering() {
        let existing = vec![phone(1, "111", 0), phone(2, "222", 1)];
        let incoming = vec![
            PhoneVm { id: Some(id(2)), number: None },
            PhoneVm { id: None, number: Some("+358401234567") },
        ];

        let outcome = CollectionReconciler::new("phones")
            .ordered_from(0)
            .reconcile(&incoming, existing, translate, allocator())
            .unwrap();

        assert_eq!(outcome.updated, vec![id(2)]);
        assert_eq!(outcome.added, vec![id(101)]);
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.removed[0].id, id(1));

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].id, id(2));
        assert_eq!(outcome.rows[0].order, Some(0));
        assert_eq!(outcome.rows[1].number, "+358401234567");
        assert_eq!(outcome.rows[1].order, Some(1));
    }

    #[test]
    fn test_orphan_reference_is_error() {
        let incoming = vec![PhoneVm { id: Some(id(9)), number: None }];
        let err = CollectionReconciler::new("phones")
            .reconcile(&incoming, vec![phone(1, "111", 0)], translate, allocator())
            .unwrap_err();

        match err {
            Error::OrphanReference { collection, id: missing } => {
                assert_eq!(collection, "phones");
                assert_eq!(missing, id(9));
            }
            other => panic!("Expected OrphanReference, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_reference_is_error() {
        let incoming = vec![
            PhoneVm { id: Some(id(1)), number: None },
            PhoneVm { id: Some(id(1)), number: Some("999") },
        ];
        let err = CollectionReconciler::new("phones")
            .reconcile(&incoming, vec![phone(1, "111", 0)], translate, allocator())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateReference { .. }));
    }

    #[test]
    fn test_removal_predicate_retains_rows() {
        let mut fax = phone(3, "333", 5);
        fax.kind = "Fax";
        let existing = vec![phone(1, "111", 0), fax];

        let outcome = CollectionReconciler::new("phones")
            .remove_when(|row: &Phone| row.kind == "Phone")
            .reconcile(&Vec::<PhoneVm>::new(), existing, translate, allocator())
            .unwrap();

        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.retained, vec![id(3)]);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].order, Some(5));
    }

    #[test]
    fn test_keep_unreferenced() {
        let outcome = CollectionReconciler::new("phones")
            .keep_unreferenced()
            .reconcile(&Vec::<PhoneVm>::new(), vec![phone(1, "111", 0)], translate, allocator())
            .unwrap();
        assert!(!outcome.has_changes());
        assert_eq!(outcome.retained, vec![id(1)]);
    }

    #[test]
    fn test_second_run_is_noop() {
        let incoming = vec![
            PhoneVm { id: None, number: Some("1") },
            PhoneVm { id: None, number: Some("2") },
        ];
        let reconciler = CollectionReconciler::new("phones").ordered_from(1);
        let first = reconciler
            .reconcile(&incoming, Vec::new(), translate, allocator())
            .unwrap();
        assert_eq!(first.added.len(), 2);

        let echoed: Vec<PhoneVm> = first
            .rows
            .iter()
            .map(|row| PhoneVm { id: Some(row.id), number: None })
            .collect();
        let second = reconciler
            .reconcile(&echoed, first.rows.clone(), translate, allocator())
            .unwrap();

        assert!(!second.has_changes());
        assert_eq!(second.unchanged.len(), 2);
        assert_eq!(second.rows, first.rows);
        assert_eq!(second.to_changes("phones").removed, Vec::<Uuid>::new());
    }
}
