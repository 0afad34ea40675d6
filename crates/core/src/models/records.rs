use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on the recently-viewed list.
pub const MAX_RECENT: usize = 8;

/// One entry in the recently-viewed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub id: String,
    pub viewed_at: DateTime<Utc>,
}

/// Outcome of toggling a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResult {
    /// Favorites after the toggle, newest first
    pub ids: Vec<String>,
    /// `true` if the id is now a favorite
    pub saved: bool,
}

/// A completed mock purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub listing_id: String,
    pub title: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of a purchase; id and timestamp are generated.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseInput {
    pub listing_id: String,
    pub title: String,
    pub price: f64,
}

/// Mock service fee rate applied at checkout.
pub const CHECKOUT_FEE_RATE: f64 = 0.03;

/// Price breakdown shown before a Buy Now purchase is confirmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutQuote {
    pub price: f64,
    pub fees: f64,
    pub total: f64,
}

impl CheckoutQuote {
    pub fn for_price(price: f64) -> Self {
        let fees = (price * CHECKOUT_FEE_RATE).round();
        Self {
            price,
            fees,
            total: price + fees,
        }
    }
}
