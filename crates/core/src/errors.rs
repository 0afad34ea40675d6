use thiserror::Error;

/// Unified error type for the entire sitebazaar-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// User-facing validation (bid rejections, sell-form field errors) is NOT
/// reported through this type; those are ordinary return values.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    #[error("Listing {0} is Buy Now only, not an auction")]
    NotAnAuction(String),

    // ── Runtime ─────────────────────────────────────────────────────
    #[error("Scheduler unavailable: {0}")]
    Scheduler(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
