use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::CoreError;
use crate::ids::generate_id;
use crate::models::draft::{DraftInput, UserListingDraft};
use crate::storage::keys;
use crate::storage::local::LocalStorage;

/// Listing drafts created through the Sell form, newest first.
#[derive(Debug, Clone)]
pub struct UserListingsService {
    storage: LocalStorage,
}

impl UserListingsService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn get_all(&self) -> Vec<UserListingDraft> {
        self.storage.read(keys::USER_LISTINGS, Vec::new())
    }

    /// Store a validated draft. Validation happens in
    /// [`ListingForm::into_draft_input`](crate::models::draft::ListingForm::into_draft_input).
    pub fn add(&self, input: DraftInput, now: DateTime<Utc>) -> Result<UserListingDraft, CoreError> {
        let draft = UserListingDraft {
            id: generate_id("ul", now),
            title: input.title,
            category: input.category,
            tech_stack: input.tech_stack,
            price: input.price,
            is_auction: input.is_auction,
            ends_at: input.ends_at,
            short_pitch: input.short_pitch,
            tags: input.tags,
            screenshots: input.screenshots,
            created_at: now,
        };

        let mut all = self.get_all();
        all.insert(0, draft.clone());
        self.storage.write(keys::USER_LISTINGS, &all)?;

        info!(draft_id = %draft.id, title = %draft.title, "listing draft saved");
        Ok(draft)
    }
}
