//! Core entity model shared by translators
//!
//! Persisted entities expose their identity through [`Entity`], view models
//! through [`Identifiable`]. Versioned entities follow the root / snapshot
//! pattern: every snapshot carries the id of the root it belongs to, a
//! publishing status and one [`LanguageAvailability`] per content language.
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use crate::input::EnumValues;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A persisted row with a generated identifier
///
/// A nil id means the row has not been allocated an identifier yet.
pub trait Entity {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
}

/// A view model whose identity may be unset
///
/// An unset identity means "create"; a set identity means "update the
/// existing row with this id".
pub trait Identifiable {
    fn identity(&self) -> Option<Uuid>;
}

/// A row whose position inside its collection is persisted
pub trait Orderable {
    fn order_number(&self) -> Option<i32>;
    fn set_order_number(&mut self, order: i32);
}

/// A versioned snapshot of a root entity
pub trait VersionedEntity: Entity + Clone + Default {
    /// Identifier of the root that survives all versions
    fn root_id(&self) -> Uuid;
    fn set_root_id(&mut self, id: Uuid);

    fn publishing_status(&self) -> PublishingStatus;
    fn set_publishing_status(&mut self, status: PublishingStatus);

    fn language_availabilities(&self) -> &[LanguageAvailability];
    fn language_availabilities_mut(&mut self) -> &mut Vec<LanguageAvailability>;

    /// Language ids for which this snapshot has localized content
    fn content_languages(&self) -> BTreeSet<Uuid>;
}

/// Publishing workflow status of a snapshot or of one of its languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublishingStatus {
    /// Never published
    #[default]
    Draft,
    /// Visible to the public
    Published,
    /// Edited copy of a published version
    Modified,
    /// Withdrawn from publication
    Archived,
    /// Superseded published version
    OldPublished,
}

impl PublishingStatus {
    /// Status of a new snapshot created by editing a snapshot in this status
    pub fn after_edit(self) -> Self {
        match self {
            PublishingStatus::Draft => PublishingStatus::Draft,
            PublishingStatus::Published
            | PublishingStatus::Modified
            | PublishingStatus::Archived
            | PublishingStatus::OldPublished => PublishingStatus::Modified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PublishingStatus::Draft => "Draft",
            PublishingStatus::Published => "Published",
            PublishingStatus::Modified => "Modified",
            PublishingStatus::Archived => "Archived",
            PublishingStatus::OldPublished => "OldPublished",
        }
    }
}

impl fmt::Display for PublishingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EnumValues for PublishingStatus {
    const VALUES: &'static [&'static str] =
        &["Draft", "Published", "Modified", "Archived", "OldPublished"];
}

impl FromStr for PublishingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Draft" => Ok(PublishingStatus::Draft),
            "Published" => Ok(PublishingStatus::Published),
            "Modified" => Ok(PublishingStatus::Modified),
            "Archived" => Ok(PublishingStatus::Archived),
            "OldPublished" => Ok(PublishingStatus::OldPublished),
            other => Err(Error::Validation {
                field: "publishing_status".to_string(),
                message: format!("'{}' is not a publishing status", other),
                expected: Some(format!("One of: {}", Self::VALUES.join(", "))),
            }),
        }
    }
}

/// Per-language publication record of a versioned snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageAvailability {
    pub language_id: Uuid,
    pub status: PublishingStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl LanguageAvailability {
    /// A fresh draft entry for a language
    pub fn draft(language_id: Uuid) -> Self {
        Self {
            language_id,
            status: PublishingStatus::Draft,
            published_at: None,
            archived_at: None,
        }
    }

    /// Move this language to a new status, stamping the transition time
    pub fn transition(&mut self, status: PublishingStatus, now: DateTime<Utc>) {
        if self.status == status {
            return;
        }
        match status {
            PublishingStatus::Published => {
                self.published_at = Some(now);
                self.archived_at = None;
            }
            PublishingStatus::Archived => {
                self.archived_at = Some(now);
            }
            PublishingStatus::Draft
            | PublishingStatus::Modified
            | PublishingStatus::OldPublished => {
                self.archived_at = None;
            }
        }
        self.status = status;
    }

    pub fn is_archived(&self) -> bool {
        self.status == PublishingStatus::Archived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_after_edit() {
        assert_eq!(PublishingStatus::Draft.after_edit(), PublishingStatus::Draft);
        assert_eq!(PublishingStatus::Published.after_edit(), PublishingStatus::Modified);
        assert_eq!(PublishingStatus::Archived.after_edit(), PublishingStatus::Modified);
    }

    #[test]
    fn test_status_parse_lists_valid_values() {
        assert_eq!("Published".parse::<PublishingStatus>().unwrap(), PublishingStatus::Published);

        match "Live".parse::<PublishingStatus>() {
            Err(Error::Validation { expected, .. }) => {
                let expected = expected.unwrap();
                assert!(expected.contains("Draft"));
                assert!(expected.contains("OldPublished"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_transition_stamps() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut availability = LanguageAvailability::draft(Uuid::nil());

        availability.transition(PublishingStatus::Published, now);
        assert_eq!(availability.published_at, Some(now));

        availability.transition(PublishingStatus::Archived, now);
        assert!(availability.is_archived());
        assert_eq!(availability.archived_at, Some(now));

        availability.transition(PublishingStatus::Modified, now);
        assert_eq!(availability.archived_at, None);
        assert_eq!(availability.published_at, Some(now));
    }
}
