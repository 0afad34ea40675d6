use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Record id of the form `<prefix>_<random hex>_<unix millis>`.
pub fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}_{}", &random[..12], now.timestamp_millis())
}
