//! Seeded scalar random stream
//!
//! Every texture generator (and the few randomized geometry details) draws
//! from a `ShipRng` created for that one build. Identical seeds and identical
//! draw sequences give identical values on every platform.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic stream of floats in `[0, 1)`
#[derive(Clone, Debug)]
pub struct ShipRng {
    inner: Pcg32,
}

impl ShipRng {
    /// Create a stream from a seed. Any seed is valid, including 0.
    pub fn new(seed: u32) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed as u64),
        }
    }

    /// Create a stream for one texture section, so sections drawn from the
    /// same design seed do not share a sequence.
    pub fn for_section(seed: u32, salt: u32) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(((salt as u64) << 32) | seed as u64),
        }
    }

    /// Draw the next value in `[0, 1)`
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Draw a value in `[min, max)`
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Draw a symmetric value in `[-magnitude, magnitude)`
    #[inline]
    pub fn signed(&mut self, magnitude: f32) -> f32 {
        (self.next_f32() * 2.0 - 1.0) * magnitude
    }

    /// True with the given probability. `0.0` never fires, `1.0` always does.
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }

    /// Draw an index in `0..len` (0 when `len` is 0)
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = ShipRng::new(1701);
        let mut b = ShipRng::new(1701);
        for _ in 0..1000 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn test_values_in_unit_range() {
        let mut rng = ShipRng::new(0);
        for _ in 0..5000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = ShipRng::new(1);
        let mut b = ShipRng::new(2);
        let same = (0..64).filter(|_| a.next_f32() == b.next_f32()).count();
        assert!(same < 4);
    }

    #[test]
    fn test_sections_diverge_from_base_seed() {
        let mut a = ShipRng::for_section(42, 1);
        let mut b = ShipRng::for_section(42, 2);
        assert_ne!(a.next_f32(), b.next_f32());
    }

    #[test]
    fn test_chance_bounds() {
        let mut rng = ShipRng::new(9);
        assert!((0..500).all(|_| !rng.chance(0.0)));
        assert!((0..500).all(|_| rng.chance(1.0)));
    }

    #[test]
    fn test_index_stays_in_range() {
        let mut rng = ShipRng::new(3);
        for _ in 0..500 {
            assert!(rng.index(7) < 7);
        }
        assert_eq!(rng.index(0), 0);
    }
}
