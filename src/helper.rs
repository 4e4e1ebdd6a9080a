use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Mint a process unique id namespaced by `kind`, such as
/// `reply_1718000000000_7`. Ids of different kinds never collide, and two
/// ids minted in the same millisecond differ by their sequence number.
pub fn mint_id(kind: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{kind}_{millis}_{sequence}")
}
