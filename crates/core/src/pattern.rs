//! Pattern engine - round sequence generation and comparison

use crate::rng::SimpleRng;
use crate::types::{ButtonCode, Pattern, BUTTON_COUNT};

/// Generates round patterns from a seeded random source
///
/// Holds no state between calls beyond the RNG.
#[derive(Debug, Clone)]
pub struct PatternEngine {
    rng: SimpleRng,
}

impl PatternEngine {
    /// Create an engine with a fixed seed (same seed, same patterns)
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SimpleRng::from_entropy(),
        }
    }

    /// Produce `round` codes, each drawn independently and uniformly from the
    /// eight buttons. Repeats are expected.
    pub fn generate(&mut self, round: u32) -> Pattern {
        (0..round)
            .map(|_| ButtonCode::from_index(self.rng.next_range(BUTTON_COUNT as u32) as usize))
            .collect::<Vec<_>>()
            .into()
    }
}

/// True iff both sequences have the same length and the same code at every position.
pub fn matches(expected: &Pattern, actual: &[ButtonCode]) -> bool {
    expected.as_slice() == actual
}
