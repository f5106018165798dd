//! Policies deciding whether a visible pen move is held back.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomized micro-jitter suppression for pen drags.
pub trait JitterPolicy: Send {
    /// Return true to pin the outgoing move to the drag origin.
    fn suppress(&mut self) -> bool;
}

/// Suppresses with a fixed probability.
pub struct RandomJitter {
    probability: f64,
    rng: StdRng,
}

impl RandomJitter {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for reproducible runs.
    pub fn with_seed(probability: f64, seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl JitterPolicy for RandomJitter {
    fn suppress(&mut self) -> bool {
        self.rng.gen_bool(self.probability)
    }
}

/// Never suppresses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverSuppress;

impl JitterPolicy for NeverSuppress {
    fn suppress(&mut self) -> bool {
        false
    }
}

/// Replays a fixed decision sequence, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedJitter {
    decisions: Vec<bool>,
    next: usize,
}

impl ScriptedJitter {
    pub fn new(decisions: impl Into<Vec<bool>>) -> Self {
        Self {
            decisions: decisions.into(),
            next: 0,
        }
    }
}

impl JitterPolicy for ScriptedJitter {
    fn suppress(&mut self) -> bool {
        if self.decisions.is_empty() {
            return false;
        }
        let decision = self.decisions[self.next % self.decisions.len()];
        self.next += 1;
        decision
    }
}
