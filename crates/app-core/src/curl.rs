use crate::constants::CURL_EPSILON;
use crate::field::NoiseField;
use glam::DVec3;

/// Which finite-difference stencil the y component uses.
///
/// `Legacy` reproduces the early flow-tube sketches, which sampled
/// `f(x + ε)` on both sides of the ∂f/∂x difference. That term is always
/// zero, so y collapses to ∂f/∂z. Only useful for matching old renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurlVariant {
    #[default]
    Central,
    Legacy,
}

/// Curl of the noise potential at `(x, y, z)` using central differences.
///
/// ```text
/// x = df/dy - df/dz
/// y = df/dz - df/dx
/// z = df/dx - df/dy
/// ```
#[inline]
pub fn curl(field: &NoiseField, x: f64, y: f64, z: f64) -> DVec3 {
    curl_with(field, x, y, z, CurlVariant::Central)
}

pub fn curl_with(field: &NoiseField, x: f64, y: f64, z: f64, variant: CurlVariant) -> DVec3 {
    let eps = CURL_EPSILON;
    let inv = 1.0 / (2.0 * eps);

    let df_dx = (field.sample(x + eps, y, z) - field.sample(x - eps, y, z)) * inv;
    let df_dy = (field.sample(x, y + eps, z) - field.sample(x, y - eps, z)) * inv;
    let df_dz = (field.sample(x, y, z + eps) - field.sample(x, y, z - eps)) * inv;

    let df_dx_for_y = match variant {
        CurlVariant::Central => df_dx,
        CurlVariant::Legacy => (field.sample(x + eps, y, z) - field.sample(x + eps, y, z)) * inv,
    };

    DVec3::new(df_dy - df_dz, df_dz - df_dx_for_y, df_dx - df_dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_bit_for_bit() {
        let f = NoiseField::new(11);
        let a = curl(&f, 0.12, -0.3, 0.44);
        let b = curl(&f, 0.12, -0.3, 0.44);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }

    #[test]
    fn legacy_only_changes_y() {
        let f = NoiseField::new(5);
        let (x, y, z) = (0.3, 0.1, -0.2);
        let c = curl_with(&f, x, y, z, CurlVariant::Central);
        let l = curl_with(&f, x, y, z, CurlVariant::Legacy);
        assert_eq!(c.x, l.x);
        assert_eq!(c.z, l.z);

        let eps = CURL_EPSILON;
        let df_dz = (f.sample(x, y, z + eps) - f.sample(x, y, z - eps)) / (2.0 * eps);
        assert!((l.y - df_dz).abs() < 1e-12);
    }

    #[test]
    fn components_sum_to_zero() {
        // x + y + z telescopes to zero for the central stencil.
        let f = NoiseField::new(2);
        for i in 0..16 {
            let t = i as f64 * 0.071;
            let c = curl(&f, t, 0.5 - t, t * t);
            assert!((c.x + c.y + c.z).abs() < 1e-9);
        }
    }

    #[test]
    fn finite_everywhere_sampled() {
        let f = NoiseField::new(9);
        for i in -10..10 {
            let t = i as f64 * 3.3;
            let c = curl(&f, t, t * 0.5, -t);
            assert!(c.is_finite());
        }
    }
}
