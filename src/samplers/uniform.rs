//! Uniform random sampler drawing minimal samples without replacement.

use crate::core::Sampler;
use crate::utils::UniformRandomGenerator;

/// Uniform random sampler drawing minimal samples without replacement.
///
/// All randomness of a RANSAC run flows through this sampler's generator,
/// so a seeded sampler makes the whole run reproducible.
pub struct UniformRandomSampler {
    rng: UniformRandomGenerator<usize>,
}

impl Default for UniformRandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandomSampler {
    /// Construct a new sampler with a random seed.
    pub fn new() -> Self {
        Self {
            rng: UniformRandomGenerator::new(),
        }
    }

    /// Construct a sampler from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: UniformRandomGenerator::from_seed(seed),
        }
    }
}

impl Sampler for UniformRandomSampler {
    fn sample(&mut self, pool_size: usize, sample_size: usize, out_indices: &mut [usize]) -> bool {
        if sample_size == 0 || sample_size > pool_size || out_indices.len() < sample_size {
            return false;
        }

        // Sample unique indices in the range [0, pool_size-1].
        self.rng
            .gen_unique(&mut out_indices[..sample_size], 0, pool_size - 1);
        true
    }
}
