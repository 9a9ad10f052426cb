// Per-page randomness source. One generator per page, never shared.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::{ROTATION_MAX_DEG, ROTATION_MIN_DEG};

/// Random generator owned by a single page-processing task.
///
/// Each page draws its rotation angle and grain noise from its own `PageRng`,
/// so pages are statistically independent and the orchestrator can process
/// them in any order. Unseeded construction pulls fresh OS entropy per page;
/// seeded construction makes a whole run reproducible for tests.
pub struct PageRng {
    inner: StdRng,
}

impl PageRng {
    /// Generator seeded from OS entropy. This is the production path: two
    /// invocations on the same document never draw the same values.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Generator with a fixed seed, for deterministic runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator for one page of a job.
    ///
    /// With a job seed, each page derives a distinct but reproducible stream
    /// from (seed, page index); without one, every page gets fresh entropy.
    pub fn for_page(seed: Option<u64>, page_index: u32) -> Self {
        match seed {
            Some(seed) => {
                // Splitmix-style odd multiplier keeps per-page streams apart.
                Self::seeded(seed ^ (page_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            }
            None => Self::from_entropy(),
        }
    }

    /// Draw a signed rotation angle in degrees.
    ///
    /// Sign is uniform over {-1, +1}; magnitude is uniform over
    /// [`ROTATION_MIN_DEG`, `ROTATION_MAX_DEG`]. The result is never zero.
    pub fn rotation_degrees(&mut self) -> f64 {
        let sign = if self.inner.random_bool(0.5) { 1.0 } else { -1.0 };
        let magnitude =
            ROTATION_MIN_DEG + self.inner.random::<f64>() * (ROTATION_MAX_DEG - ROTATION_MIN_DEG);
        sign * magnitude
    }
}

// Distribution sampling (Poisson grain) takes any `Rng`; delegating the core
// trait keeps the page's draws flowing through the one per-page generator.
impl RngCore for PageRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }
}
