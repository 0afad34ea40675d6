use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Who placed a bid: the local user or a (simulated) competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bidder {
    You,
    Other,
}

impl std::fmt::Display for Bidder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bidder::You => write!(f, "You"),
            Bidder::Other => write!(f, "Other"),
        }
    }
}

/// A single bid on an auction listing. Never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub listing_id: String,
    /// Always positive
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub bidder: Bidder,
}

/// Persisted ledger shape: listing id → bids, newest first.
pub type BidStore = HashMap<String, Vec<Bid>>;

/// Sort bids newest first. Stable, so equal timestamps keep their order.
pub fn sort_newest_first(bids: &mut [Bid]) {
    bids.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
