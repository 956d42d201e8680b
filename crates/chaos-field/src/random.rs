//! Uniform random samples behind a swappable interface.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform samples in `[0, 1)`.
///
/// Every random decision in the field goes through this trait, so tests can
/// substitute a seeded generator or a fixed script of values.
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform sample in `[low, high)`.
    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Sample centered on zero spanning `magnitude` in total.
    fn signed(&mut self, magnitude: f64) -> f64 {
        (self.next_f64() - 0.5) * magnitude
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() > 1.0 - p
    }

    /// Fair coin flip.
    fn coin(&mut self) -> bool {
        self.next_f64() > 0.5
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

/// The default random source.
pub type StdRandom = RngSource<StdRng>;

impl StdRandom {
    /// Seed from the operating system.
    pub fn from_entropy() -> Self {
        RngSource(StdRng::from_entropy())
    }

    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

/// Replays a fixed list of samples, cycling when it runs out.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct Script {
    values: Vec<f64>,
    index: usize,
}

#[cfg(test)]
impl Script {
    pub(crate) fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            index: 0,
        }
    }

    /// A script that always returns `value`.
    pub(crate) fn constant(value: f64) -> Self {
        Self::new(&[value])
    }
}

#[cfg(test)]
impl RandomSource for Script {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.index % self.values.len()];
        self.index += 1;
        v
    }
}
