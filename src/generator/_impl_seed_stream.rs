use crate::generator::{SeedStream, MAX_SEED};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

impl SeedStream {
    /// Create a new stream which is fully determined by the given `seed`.
    pub fn new(seed: u64) -> SeedStream {
        SeedStream {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw `count` new seeds, each in `[0, 2^31 - 1)`.
    pub fn seeds(&mut self, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.rng.gen_range(0..MAX_SEED)).collect()
    }

    /// Draw `count` fair coin flips.
    pub fn coin_flips(&mut self, count: usize) -> Vec<bool> {
        (0..count).map(|_| self.rng.gen::<bool>()).collect()
    }

    /// Draw `count` independent values which are `true` with the given `probability`.
    pub fn bernoulli(&mut self, count: usize, probability: f64) -> Vec<bool> {
        (0..count).map(|_| self.chance(probability)).collect()
    }

    /// Draw a value which is `true` with the given `probability` (clamped to `[0, 1]`).
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Draw a value uniformly from the given (non-empty) inclusive range.
    pub fn uniform(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.gen_range(range)
    }

    /// Same as `uniform`, but for `usize` ranges.
    pub fn uniform_usize(&mut self, range: RangeInclusive<usize>) -> usize {
        self.rng.gen_range(range)
    }

    /// A uniformly random probability in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Pick a uniformly random element of `items`, or `None` if `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Shuffle `items` in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
