use std::cmp::Ordering;
use tracing::debug;

use crate::models::filter::{BrowseFilters, BrowseResult, Selector, SortKey};
use crate::models::listing::Listing;

/// Filters and sorts the catalog for the browse view.
///
/// Pure business logic, no I/O. Total over well-formed filters.
pub struct BrowseService;

impl BrowseService {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline: every predicate must hold, then sort.
    pub fn apply(&self, listings: &[Listing], filters: &BrowseFilters) -> BrowseResult {
        let query = filters.query.trim().to_lowercase();

        let mut items: Vec<Listing> = listings
            .iter()
            .filter(|l| self.matches(l, filters, &query))
            .cloned()
            .collect();

        self.sort(&mut items, filters.sort);

        debug!(
            matched = items.len(),
            of = listings.len(),
            sort = %filters.sort,
            "browse pipeline"
        );

        let total = items.len();
        BrowseResult { items, total }
    }

    /// `query` must already be trimmed and lowercased.
    fn matches(&self, l: &Listing, f: &BrowseFilters, query: &str) -> bool {
        let match_query = query.is_empty() || l.search_haystack().contains(query);
        let match_category = f.category.matches(&l.category);
        let match_tech = match f.tech {
            Selector::All => true,
            Selector::Only(t) => l.has_tech(t),
        };
        let match_auction = !f.auction_only || l.is_auction;
        let price = l.effective_price();
        let match_price = price >= f.price_min && price <= f.price_max;

        match_query && match_category && match_tech && match_auction && match_price
    }

    /// Stable sort: ties keep their input order.
    pub fn sort(&self, items: &mut [Listing], key: SortKey) {
        match key {
            SortKey::Price => items.sort_by(|a, b| {
                a.effective_price()
                    .partial_cmp(&b.effective_price())
                    .unwrap_or(Ordering::Equal)
            }),
            // Untimed listings go after every timed one.
            SortKey::EndingSoon => items.sort_by(|a, b| match (a.ends_at, b.ends_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            SortKey::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Popular => items.sort_by(|a, b| b.views.cmp(&a.views)),
        }
    }
}

impl Default for BrowseService {
    fn default() -> Self {
        Self::new()
    }
}
