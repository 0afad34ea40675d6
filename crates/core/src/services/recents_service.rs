use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::records::{RecentItem, MAX_RECENT};
use crate::storage::keys;
use crate::storage::local::LocalStorage;

/// Bounded most-recently-viewed list, newest first, no duplicates.
#[derive(Debug, Clone)]
pub struct RecentsService {
    storage: LocalStorage,
    limit: usize,
}

impl RecentsService {
    /// `limit` is clamped to `1..=MAX_RECENT`.
    pub fn new(storage: LocalStorage, limit: usize) -> Self {
        Self {
            storage,
            limit: limit.clamp(1, MAX_RECENT),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn get_all(&self) -> Vec<RecentItem> {
        self.storage.read(keys::RECENTLY_VIEWED, Vec::new())
    }

    /// Move `listing_id` to the front (adding it if new) and evict the oldest
    /// entries past the limit.
    pub fn push(&self, listing_id: &str, now: DateTime<Utc>) -> Result<Vec<RecentItem>, CoreError> {
        let mut next = vec![RecentItem {
            id: listing_id.to_string(),
            viewed_at: now,
        }];
        next.extend(self.get_all().into_iter().filter(|r| r.id != listing_id));
        next.truncate(self.limit);

        self.storage.write(keys::RECENTLY_VIEWED, &next)?;
        Ok(next)
    }
}
