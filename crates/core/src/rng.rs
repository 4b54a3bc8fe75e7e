//! RNG module - seeded random source for pattern generation
//!
//! A small LCG is enough here: patterns only need uniform codes and
//! reproducibility under a fixed seed (for tests and replayable sessions).

use std::time::{SystemTime, UNIX_EPOCH};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock and process id
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let mixed = nanos ^ (nanos >> 32) ^ u64::from(std::process::id()).rotate_left(16);
        Self::new(mixed as u32)
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Takes the high bits of the state; the low bits of a power-of-two LCG
    /// cycle with a very short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Current internal state (a seed that resumes this exact sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        let v1 = rng1.next_u32();
        let v2 = rng2.next_u32();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_zero_seed_is_not_stuck() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..10_000 {
            assert!(rng.next_range(8) < 8);
        }
    }

    #[test]
    fn test_next_range_covers_every_bucket() {
        let mut rng = SimpleRng::new(99);
        let mut counts = [0u32; 8];
        for _ in 0..8_000 {
            counts[rng.next_range(8) as usize] += 1;
        }
        // Roughly uniform: every bucket near 1000.
        for (bucket, &n) in counts.iter().enumerate() {
            assert!((700..1300).contains(&n), "bucket {} drew {} times", bucket, n);
        }
    }

    #[test]
    fn test_low_bits_period_does_not_leak_into_range() {
        // With `% 8` the sequence would repeat every 8 draws.
        let mut rng = SimpleRng::new(1);
        let draws: Vec<u32> = (0..32).map(|_| rng.next_range(8)).collect();
        assert_ne!(draws[..8], draws[8..16]);
    }

    #[test]
    fn test_state_resumes_sequence() {
        let mut rng = SimpleRng::new(4242);
        rng.next_u32();
        let mut resumed = SimpleRng::new(rng.state());
        assert_eq!(rng.next_u32(), resumed.next_u32());
    }
}
