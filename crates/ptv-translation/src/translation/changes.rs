//! Record of what a translation decided to write
//!
//! The engine does not persist anything. Instead every create/update decision
//! taken while building an entity is collected in a [`ChangeSet`] that the
//! persistence boundary applies inside its own transaction.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use serde::Serialize;
use uuid::Uuid;

/// Add/update/remove decisions for one reconciled collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionChanges {
    pub collection: String,
    pub added: Vec<Uuid>,
    pub updated: Vec<Uuid>,
    pub unchanged: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

impl CollectionChanges {
    /// True when applying this entry would write something
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }
}

/// A single decision taken during translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// First version of an entity: a new root identity
    RootCreated { entity: &'static str, root_id: Uuid },
    /// New versioned snapshot linked to a root
    VersionCreated {
        entity: &'static str,
        id: Uuid,
        root_id: Uuid,
        previous_id: Option<Uuid>,
    },
    /// Non-versioned entity inserted
    EntityCreated { entity: &'static str, id: Uuid },
    /// Non-versioned entity updated in place
    EntityUpdated { entity: &'static str, id: Uuid },
    /// Child collection reconciled against its persisted rows
    CollectionReconciled(CollectionChanges),
}

/// Ordered log of decisions for one unit of work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Root ids created in this unit of work
    pub fn roots_created(&self) -> Vec<Uuid> {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::RootCreated { root_id, .. } => Some(*root_id),
                _ => None,
            })
            .collect()
    }

    /// Versioned snapshot ids created in this unit of work
    pub fn versions_created(&self) -> Vec<Uuid> {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::VersionCreated { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Latest reconciliation recorded for a collection
    pub fn collection(&self, name: &str) -> Option<&CollectionChanges> {
        self.changes.iter().rev().find_map(|change| match change {
            Change::CollectionReconciled(collection) if collection.collection == name => {
                Some(collection)
            }
            _ => None,
        })
    }

    /// True when no collection has anything to add, update or remove
    pub fn collections_unchanged(&self) -> bool {
        self.changes.iter().all(|change| match change {
            Change::CollectionReconciled(collection) => !collection.has_changes(),
            _ => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries() {
        let mut changes = ChangeSet::new();
        changes.push(Change::RootCreated {
            entity: "Channel",
            root_id: Uuid::from_u128(1),
        });
        changes.push(Change::VersionCreated {
            entity: "Channel",
            id: Uuid::from_u128(2),
            root_id: Uuid::from_u128(1),
            previous_id: None,
        });
        changes.push(Change::CollectionReconciled(CollectionChanges {
            collection: "phones".to_string(),
            unchanged: vec![Uuid::from_u128(3)],
            ..Default::default()
        }));

        assert_eq!(changes.len(), 3);
        assert_eq!(changes.roots_created(), vec![Uuid::from_u128(1)]);
        assert_eq!(changes.versions_created(), vec![Uuid::from_u128(2)]);
        assert!(changes.collection("phones").is_some());
        assert!(changes.collection("emails").is_none());
        assert!(changes.collections_unchanged());
    }

    #[test]
    fn test_serializes_tagged() {
        let change = Change::EntityCreated {
            entity: "Address",
            id: Uuid::nil(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["kind"], "entity_created");
        assert_eq!(json["entity"], "Address");
    }
}
