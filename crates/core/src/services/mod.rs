pub mod auction_service;
pub mod bid_service;
pub mod browse_service;
pub mod favorites_service;
pub mod listing_service;
pub mod purchase_service;
pub mod recents_service;
