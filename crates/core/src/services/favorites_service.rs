use tracing::debug;

use crate::errors::CoreError;
use crate::models::records::ToggleResult;
use crate::storage::keys;
use crate::storage::local::LocalStorage;

/// Saved listing ids, newest first.
#[derive(Debug, Clone)]
pub struct FavoritesService {
    storage: LocalStorage,
}

impl FavoritesService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn get_all(&self) -> Vec<String> {
        self.storage.read(keys::FAVORITES, Vec::new())
    }

    pub fn contains(&self, listing_id: &str) -> bool {
        self.get_all().iter().any(|id| id == listing_id)
    }

    /// Add the id (at the front) if absent, remove it if present.
    pub fn toggle(&self, listing_id: &str) -> Result<ToggleResult, CoreError> {
        let current = self.get_all();
        let exists = current.iter().any(|id| id == listing_id);

        let ids: Vec<String> = if exists {
            current.into_iter().filter(|id| id != listing_id).collect()
        } else {
            std::iter::once(listing_id.to_string())
                .chain(current)
                .collect()
        };
        self.storage.write(keys::FAVORITES, &ids)?;

        debug!(listing_id, saved = !exists, "favorite toggled");
        Ok(ToggleResult {
            ids,
            saved: !exists,
        })
    }
}
