// Per-event random number stream based on the PCG-LCG generator used by OpenMC
// (random_lcg.cpp). Every event of a run draws from its own stream, obtained by
// skipping the base seed ahead by a fixed stride per event, so results do not depend
// on the order or thread in which events are processed.

use rand::{RngCore, SeedableRng};

/// LCG multiplier (same as OpenMC)
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant (same as OpenMC)
const PRN_ADD: u64 = 1442695040888963407;
/// Number of LCG draws reserved for each event before the next event's stream begins.
pub const EVENT_STRIDE: u64 = 152917;

/// Fast RNG using OpenMC's PCG-LCG algorithm.
///
/// Reference: Melissa E. O'Neill, "PCG: A Family of Simple Fast Space-Efficient
/// Statistically Good Algorithms for Random Number Generation"
#[derive(Clone, Copy, Debug)]
pub struct FastRng {
    seed: u64,
}

/// Advance an LCG state by `n` steps in O(log n).
fn future_seed(mut n: u64, seed: u64) -> u64 {
    let mut g = PRN_MULT;
    let mut c = PRN_ADD;
    let mut g_new = 1u64;
    let mut c_new = 0u64;
    while n > 0 {
        if n & 1 == 1 {
            g_new = g_new.wrapping_mul(g);
            c_new = c_new.wrapping_mul(g).wrapping_add(c);
        }
        c = g.wrapping_add(1).wrapping_mul(c);
        g = g.wrapping_mul(g);
        n >>= 1;
    }
    g_new.wrapping_mul(seed).wrapping_add(c_new)
}

impl FastRng {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Stream for event `event` of a run seeded with `seed`.
    pub fn for_event(seed: u64, event: u64) -> Self {
        Self {
            seed: future_seed(event.wrapping_mul(EVENT_STRIDE), seed),
        }
    }

    /// Uniform f64 in [0, 1) built from the top 53 bits of the next output.
    #[inline(always)]
    pub fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Skip `n` draws ahead.
    pub fn advance(&mut self, n: u64) {
        self.seed = future_seed(n, self.seed);
    }

    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed: u64::from_le_bytes(seed),
        }
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.seed = PRN_MULT.wrapping_mul(self.seed).wrapping_add(PRN_ADD);

        // PCG output permutation (RXS-M-XS)
        let word = ((self.seed >> ((self.seed >> 59) + 5)) ^ self.seed)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut left = dest;
        while left.len() >= 8 {
            let bytes = self.next_u64().to_le_bytes();
            left[..8].copy_from_slice(&bytes);
            left = &mut left[8..];
        }
        if !left.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            left.copy_from_slice(&bytes[..left.len()]);
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_fast_rng_deterministic() {
        let mut rng1 = FastRng::new(12345);
        let mut rng2 = FastRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.uniform(), rng2.uniform());
        }
    }

    #[test]
    fn test_fast_rng_range() {
        let mut rng = FastRng::new(42);
        for _ in 0..10000 {
            let val = rng.uniform();
            assert!((0.0..1.0).contains(&val), "Value {} out of range [0, 1)", val);
        }
    }

    #[test]
    fn test_skip_ahead_matches_sequential_draws() {
        let mut sequential = FastRng::new(7);
        for _ in 0..1000 {
            sequential.next_u64();
        }
        let mut skipped = FastRng::new(7);
        skipped.advance(1000);
        assert_eq!(sequential.next_u64(), skipped.next_u64());
    }

    #[test]
    fn test_event_streams_are_disjoint_offsets() {
        let mut event0 = FastRng::for_event(99, 0);
        let mut event1 = FastRng::for_event(99, 1);
        assert_ne!(event0.uniform(), event1.uniform());

        // event 1 starts exactly one stride after event 0
        let mut shifted = FastRng::for_event(99, 0);
        shifted.advance(EVENT_STRIDE);
        let mut event1_again = FastRng::for_event(99, 1);
        assert_eq!(shifted.next_u64(), event1_again.next_u64());
    }

    #[test]
    fn test_fast_rng_as_rand_rng() {
        let mut rng = FastRng::new(12345);
        let x: f64 = rng.gen();
        assert!((0.0..1.0).contains(&x));
        let _: u32 = rng.gen();
        let _: bool = rng.gen();
    }

    #[test]
    fn test_fast_rng_reseed() {
        let mut rng = FastRng::new(12345);
        let first_val = rng.uniform();
        for _ in 0..100 {
            rng.uniform();
        }
        rng.reseed(12345);
        assert_eq!(rng.uniform(), first_val);
    }
}
