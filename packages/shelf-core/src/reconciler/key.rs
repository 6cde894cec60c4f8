//! Fallback business key generation.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Modulus keeping the low-order 6 digits of the timestamp.
const TIMESTAMP_MODULUS: u64 = 1_000_000;
/// Exclusive upper bound of the random offset.
const RANDOM_OFFSET_BOUND: u64 = 1000;

/// Source of epoch-millisecond timestamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Combines a timestamp and a random offset into a positive key.
///
/// Best effort only: two calls in the same millisecond, or calls whose
/// timestamps differ by less than the offset range, can collide.
pub fn fallback_key_at(now_millis: u64, offset: u64) -> u64 {
    (now_millis % TIMESTAMP_MODULUS + offset % RANDOM_OFFSET_BOUND).max(1)
}

/// Fallback key generator with injectable time and randomness.
pub struct KeyGenerator {
    clock: Box<dyn Clock>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl KeyGenerator {
    /// Creates a generator from a clock and a random source.
    pub fn new(clock: Box<dyn Clock>, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            clock,
            rng: Mutex::new(rng),
        }
    }

    /// Returns the next fallback key.
    pub fn next_key(&self) -> u64 {
        let offset = self.rng.lock().gen_range(0..RANDOM_OFFSET_BOUND);
        fallback_key_at(self.clock.now_millis(), offset)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(Box::new(SystemClock), Box::new(StdRng::from_entropy()))
    }
}

impl std::fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGenerator").finish_non_exhaustive()
    }
}
