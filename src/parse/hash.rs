use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 32-bit string hash (`h = h * 31 + unit`, wrapping) over UTF-16 code units.
#[must_use]
pub fn hash_code(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0_i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
}

/// Series id derived from a seed string: `s` followed by 8 hex digits.
#[must_use]
pub fn series_id(seed: &str) -> String {
    format!("s{:08x}", hash_code(seed) as u32)
}

/// Seed for sources that carry neither a URL nor an explicit key.
///
/// Combines wall-clock nanoseconds with a process-wide counter so two seeds
/// taken in the same instant still differ.
#[must_use]
pub fn fresh_seed() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{nanos}:{counter}")
}
