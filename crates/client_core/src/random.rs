use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hasher},
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use ring::rand::{SecureRandom, SystemRandom};

static WEAK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Draws from the operating system CSPRNG; `None` when no secure source is
/// available on this platform.
pub(crate) fn secure_u32() -> Option<u32> {
    let mut buf = [0u8; 4];
    SystemRandom::new().fill(&mut buf).ok()?;
    Some(u32::from_le_bytes(buf))
}

/// Non-cryptographic value for jitter and for the no-CSPRNG fallback.
pub(crate) fn weak_u64() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(nanos);
    hasher.write_u64(WEAK_COUNTER.fetch_add(1, Ordering::Relaxed));
    hasher.finish()
}

/// Uniform-ish draw in `min..=max`.
pub(crate) fn weak_in_range(min: u64, max: u64) -> u64 {
    if max <= min {
        return min;
    }
    min + weak_u64() % (max - min + 1)
}
