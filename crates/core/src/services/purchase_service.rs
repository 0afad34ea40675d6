use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::CoreError;
use crate::ids::generate_id;
use crate::models::records::{Purchase, PurchaseInput};
use crate::storage::keys;
use crate::storage::local::LocalStorage;

/// Completed mock purchases, newest first.
#[derive(Debug, Clone)]
pub struct PurchasesService {
    storage: LocalStorage,
}

impl PurchasesService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn get_all(&self) -> Vec<Purchase> {
        self.storage.read(keys::PURCHASES, Vec::new())
    }

    pub fn add(&self, input: PurchaseInput, now: DateTime<Utc>) -> Result<Purchase, CoreError> {
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(CoreError::Validation(format!(
                "purchase price {} is not a valid amount",
                input.price
            )));
        }

        let purchase = Purchase {
            id: generate_id("p", now),
            listing_id: input.listing_id,
            title: input.title,
            price: input.price,
            created_at: now,
        };

        let mut all = self.get_all();
        all.insert(0, purchase.clone());
        self.storage.write(keys::PURCHASES, &all)?;

        info!(purchase_id = %purchase.id, listing_id = %purchase.listing_id, price = purchase.price, "purchase recorded");
        Ok(purchase)
    }
}
