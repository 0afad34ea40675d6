use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Uniform samples in `[0, 1)`, injectable so simulations can be replayed.
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}

/// OS-backed randomness via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next_f64(&self) -> f64 {
        let mut buf = [0u8; 8];
        let bits = match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(e) => {
                warn!(error = %e, "getrandom failed, falling back to clock entropy");
                u64::from(Utc::now().timestamp_subsec_nanos()).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            }
        };
        // top 53 bits -> [0, 1)
        (bits >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    /// Panics if `values` is empty.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceRandom needs at least one value");
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&self) -> f64 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}
