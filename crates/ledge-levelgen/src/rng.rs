//! Injectable random source for template draws and exit ordering.

/// Source of uniformly distributed integers.
///
/// Generation threads one of these through every random decision, so a
/// fixed seed reproduces a level exactly.
pub trait RandomSource {
    /// Returns an integer in `min..max_exclusive`.
    ///
    /// Callers guarantee `min < max_exclusive`.
    fn next_int(&mut self, min: usize, max_exclusive: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_int(&mut self, min: usize, max_exclusive: usize) -> usize {
        (**self).next_int(min, max_exclusive)
    }
}

/// Seedable generator backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: fastrand::Rng,
    seed: u64,
}

impl SeededRandom {
    /// Creates a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            seed,
        }
    }

    /// Creates a generator with a seed drawn from the process generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(fastrand::u64(..))
    }

    /// Returns the seed this generator started from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_int(&mut self, min: usize, max_exclusive: usize) -> usize {
        self.rng.usize(min..max_exclusive)
    }
}

/// Returns `0..count` in random order (Fisher-Yates).
pub fn shuffled_indices<R: RandomSource + ?Sized>(rng: &mut R, count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..count).collect();
    // The last position has only one candidate left, so it needs no draw
    for i in 0..count.saturating_sub(1) {
        let j = i + rng.next_int(0, count - i);
        indices.swap(i, j);
    }
    indices
}
