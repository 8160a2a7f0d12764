#[cfg(test)]
#[path = "../../tests/unit/utils/random_test.rs"]
mod random_test;

use crate::utils::Float;
use rand::prelude::*;
use std::sync::Mutex;

/// Provides the way to use randomized values in generic way.
pub trait Random {
    /// Produces integral random value, uniformly distributed on the closed interval [min, max].
    fn uniform_int(&self, min: i32, max: i32) -> i32;

    /// Produces real random value, uniformly distributed on the closed interval [min, max).
    fn uniform_real(&self, min: Float, max: Float) -> Float;

    /// Tests probability value in (0., 1.) range.
    fn is_hit(&self, probability: Float) -> bool;
}

/// A default random implementation backed by a small rng instance.
pub struct DefaultRandom {
    rng: Mutex<SmallRng>,
}

impl Default for DefaultRandom {
    fn default() -> Self {
        Self { rng: Mutex::new(SmallRng::from_rng(thread_rng()).expect("cannot get RNG")) }
    }
}

impl DefaultRandom {
    /// Creates a new instance of `DefaultRandom` seeded with the given value.
    /// Two instances with the same seed produce the same sequence of values.
    pub fn new_with_seed(seed: u64) -> Self {
        Self { rng: Mutex::new(SmallRng::seed_from_u64(seed)) }
    }

    fn with_rng<T>(&self, action: impl FnOnce(&mut SmallRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|err| err.into_inner());
        action(&mut rng)
    }
}

impl Random for DefaultRandom {
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.with_rng(|rng| rng.gen_range(min..max + 1))
    }

    fn uniform_real(&self, min: Float, max: Float) -> Float {
        if (min - max).abs() < Float::EPSILON {
            return min;
        }

        assert!(min < max);
        self.with_rng(|rng| rng.gen_range(min..max))
    }

    fn is_hit(&self, probability: Float) -> bool {
        self.with_rng(|rng| rng.gen_bool(probability.clamp(0., 1.)))
    }
}
