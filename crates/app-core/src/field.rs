//! Seeded scalar noise potential the curl field is derived from.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

/// Scalar simplex-noise potential over ℝ³.
///
/// Owned explicitly by whoever samples it so a fixed seed always yields the
/// same field; there is no process-wide generator.
#[derive(Clone, Debug)]
pub struct NoiseField {
    simplex: Simplex,
    seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: Simplex::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the potential at `(x, y, z)`. Roughly in [-1, 1].
    #[inline]
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.simplex.get([x, y, z])
    }

    #[inline]
    pub fn sample_at(&self, p: DVec3) -> f64 {
        self.sample(p.x, p.y, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_values() {
        let a = NoiseField::new(7);
        let b = NoiseField::new(7);
        for i in 0..32 {
            let t = i as f64 * 0.137;
            assert_eq!(
                a.sample(t, -t, t * 0.5).to_bits(),
                b.sample(t, -t, t * 0.5).to_bits()
            );
        }
    }

    #[test]
    fn small_steps_give_small_changes() {
        let f = NoiseField::new(3);
        let p = DVec3::new(0.21, -0.4, 0.05);
        let d = (f.sample_at(p) - f.sample_at(p + DVec3::splat(1e-6))).abs();
        assert!(d < 1e-3, "noise jumped by {d}");
    }
}
