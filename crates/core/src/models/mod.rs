pub mod bid;
pub mod draft;
pub mod filter;
pub mod listing;
pub mod records;
pub mod settings;
