//! Persistence keys. Every key lives under the `sb:` namespace and carries a
//! format version suffix so registries never collide.

/// Prefix shared by every key this library writes.
pub const NAMESPACE: &str = "sb:";

pub const BROWSE_FILTERS: &str = "sb:browseFilters:v1";
pub const BIDS: &str = "sb:bids:v1";
pub const FAVORITES: &str = "sb:favorites:v1";
pub const RECENTLY_VIEWED: &str = "sb:recentlyViewed:v1";
pub const USER_LISTINGS: &str = "sb:userListings:v1";
pub const PURCHASES: &str = "sb:purchases:v1";
pub const SETTINGS: &str = "sb:settings:v1";

/// All keys, for bulk operations.
pub const ALL: [&str; 7] = [
    BROWSE_FILTERS,
    BIDS,
    FAVORITES,
    RECENTLY_VIEWED,
    USER_LISTINGS,
    PURCHASES,
    SETTINGS,
];
