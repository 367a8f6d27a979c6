//! Record lifecycle bookkeeping shared by every persisted entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Soft-delete flag plus created/updated/deleted timestamps.
///
/// Maps to the `is_deleted`, `created`, `updated` and `deleted` columns that
/// both service tables carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    pub is_deleted: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub deleted: Option<DateTime<Utc>>,
}

impl Lifecycle {
    /// Lifecycle of a record that has not been stored yet.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            is_deleted: false,
            created: now,
            updated: now,
            deleted: None,
        }
    }

    /// Refresh the `updated` timestamp.
    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }

    /// Flag the record as deleted.
    ///
    /// Calling this on an already deleted record overwrites the deletion
    /// timestamp.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.is_deleted = true;
        self.deleted = Some(now);
        self.updated = now;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
