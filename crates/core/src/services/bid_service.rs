use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::CoreError;
use crate::ids::generate_id;
use crate::models::bid::{Bid, BidStore, Bidder};
use crate::storage::keys;
use crate::storage::local::LocalStorage;

/// Append-only bid ledger persisted under a single key as
/// `{ listingId: [Bid, ...] }`, each list newest first.
#[derive(Debug, Clone)]
pub struct BidLedger {
    storage: LocalStorage,
}

impl BidLedger {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// The whole ledger, or empty if nothing (readable) is stored.
    pub fn get_store(&self) -> BidStore {
        self.storage.read(keys::BIDS, BidStore::new())
    }

    pub fn get_for_listing(&self, listing_id: &str) -> Vec<Bid> {
        self.get_store().remove(listing_id).unwrap_or_default()
    }

    /// Record a bid and rewrite the ledger. Not atomic against other writers.
    pub fn add(
        &self,
        listing_id: &str,
        amount: f64,
        bidder: Bidder,
        now: DateTime<Utc>,
    ) -> Result<Bid, CoreError> {
        let mut store = self.get_store();

        let bid = Bid {
            id: generate_id("bid", now),
            listing_id: listing_id.to_string(),
            amount,
            created_at: now,
            bidder,
        };

        store
            .entry(listing_id.to_string())
            .or_default()
            .insert(0, bid.clone());
        self.storage.write(keys::BIDS, &store)?;

        info!(listing_id, amount, %bidder, bid_id = %bid.id, "bid recorded");
        Ok(bid)
    }
}
