//! Centripetal Catmull-Rom curve through a point list, with arc-length
//! reparameterisation and parallel-transport frames for tube sweeping.

use glam::{DMat3, DVec3};

const ARC_LENGTH_DIVISIONS: usize = 200;
const TANGENT_DELTA: f64 = 1e-4;
const MIN_KNOT_SPACING: f64 = 1e-4;

/// Cubic in one coordinate, set up from the non-uniform Catmull-Rom tangents.
#[derive(Clone, Copy)]
struct Cubic {
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
}

impl Cubic {
    fn hermite(x0: f64, x1: f64, t0: f64, t1: f64) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn nonuniform(x0: f64, x1: f64, x2: f64, x3: f64, dt0: f64, dt1: f64, dt2: f64) -> Self {
        let mut t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let mut t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        t1 *= dt1;
        t2 *= dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    #[inline]
    fn eval(&self, t: f64) -> f64 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

/// Open centripetal Catmull-Rom spline.
#[derive(Clone, Debug)]
pub struct CatmullRomCurve {
    points: Vec<DVec3>,
    arc_lengths: Vec<f64>,
}

/// Tangent/normal/binormal triples sampled along a curve.
#[derive(Clone, Debug, Default)]
pub struct FrenetFrames {
    pub tangents: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    pub binormals: Vec<DVec3>,
}

impl CatmullRomCurve {
    /// Build a spline through `points`. Needs at least two points.
    pub fn new(points: Vec<DVec3>) -> Self {
        assert!(points.len() >= 2, "a curve needs at least two points");
        let mut curve = Self {
            points,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.compute_arc_lengths(ARC_LENGTH_DIVISIONS);
        curve
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn length(&self) -> f64 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t` in [0, 1] (not arc-length uniform).
    pub fn point(&self, t: f64) -> DVec3 {
        let pts = &self.points;
        let l = pts.len();
        let p = (l - 1) as f64 * t;
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f64;
        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }

        let p0 = if int_point > 0 {
            pts[int_point - 1]
        } else {
            pts[0] + (pts[0] - pts[1])
        };
        let p1 = pts[int_point];
        let p2 = pts[int_point + 1];
        let p3 = if int_point + 2 < l {
            pts[int_point + 2]
        } else {
            pts[l - 1] + (pts[l - 1] - pts[l - 2])
        };

        // centripetal: knot spacing is |d|^0.5, i.e. (d²)^0.25
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        let cx = Cubic::nonuniform(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2);
        let cy = Cubic::nonuniform(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2);
        let cz = Cubic::nonuniform(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2);
        DVec3::new(cx.eval(weight), cy.eval(weight), cz.eval(weight))
    }

    /// Point at arc-length fraction `u` in [0, 1].
    pub fn point_at(&self, u: f64) -> DVec3 {
        self.point(self.u_to_t(u))
    }

    pub fn tangent(&self, t: f64) -> DVec3 {
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or_zero()
    }

    pub fn tangent_at(&self, u: f64) -> DVec3 {
        self.tangent(self.u_to_t(u))
    }

    /// Map an arc-length fraction to the curve parameter.
    pub fn u_to_t(&self, u: f64) -> f64 {
        let lengths = &self.arc_lengths;
        let n = lengths.len();
        let target = u.clamp(0.0, 1.0) * self.length();

        // last index whose cumulative length is <= target
        let i = lengths.partition_point(|&l| l <= target).saturating_sub(1);
        if lengths[i] == target || i + 1 >= n {
            return i as f64 / (n - 1) as f64;
        }
        let before = lengths[i];
        let segment = lengths[i + 1] - before;
        let frac = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f64 + frac) / (n - 1) as f64
    }

    /// Parallel-transport frames at `segments + 1` arc-length-uniform samples.
    pub fn frenet_frames(&self, segments: usize) -> FrenetFrames {
        let tangents: Vec<DVec3> = (0..=segments)
            .map(|i| self.tangent_at(i as f64 / segments as f64))
            .collect();

        let mut normals = Vec::with_capacity(segments + 1);
        let mut binormals = Vec::with_capacity(segments + 1);

        // initial normal: the axis the first tangent is least aligned with
        let t0 = tangents[0];
        let (tx, ty, tz) = (t0.x.abs(), t0.y.abs(), t0.z.abs());
        let mut min = f64::MAX;
        let mut axis = DVec3::X;
        if tx <= min {
            min = tx;
            axis = DVec3::X;
        }
        if ty <= min {
            min = ty;
            axis = DVec3::Y;
        }
        if tz <= min {
            axis = DVec3::Z;
        }
        let side = t0.cross(axis).normalize_or_zero();
        let n0 = t0.cross(side);
        normals.push(n0);
        binormals.push(t0.cross(n0));

        for i in 1..=segments {
            let mut n = normals[i - 1];
            let axis = tangents[i - 1].cross(tangents[i]);
            if axis.length() > f64::EPSILON {
                let axis = axis.normalize();
                let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
                n = DMat3::from_axis_angle(axis, theta) * n;
            }
            binormals.push(tangents[i].cross(n));
            normals.push(n);
        }

        FrenetFrames {
            tangents,
            normals,
            binormals,
        }
    }

    fn compute_arc_lengths(&self, divisions: usize) -> Vec<f64> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        lengths.push(0.0);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        for p in 1..=divisions {
            let current = self.point(p as f64 / divisions as f64);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> CatmullRomCurve {
        CatmullRomCurve::new((0..5).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect())
    }

    #[test]
    fn passes_through_endpoints() {
        let c = CatmullRomCurve::new(vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(2.0, 0.0, 1.0),
        ]);
        assert!(c.point(0.0).distance(DVec3::ZERO) < 1e-12);
        assert!(c.point(1.0).distance(DVec3::new(2.0, 0.0, 1.0)) < 1e-12);
        assert!(c.point(0.5).distance(DVec3::new(1.0, 1.0, 0.0)) < 1e-12);
    }

    #[test]
    fn straight_line_stays_straight() {
        let c = line();
        for i in 0..=10 {
            let p = c.point_at(i as f64 / 10.0);
            assert!(p.y.abs() < 1e-12 && p.z.abs() < 1e-12);
        }
        assert!((c.length() - 4.0).abs() < 1e-9);
        assert!((c.point_at(0.5).x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn u_to_t_is_monotonic() {
        let c = CatmullRomCurve::new(vec![
            DVec3::ZERO,
            DVec3::new(0.1, 0.0, 0.0),
            DVec3::new(2.0, 1.0, 0.0),
            DVec3::new(2.5, 1.2, 0.3),
        ]);
        let mut prev = -1.0;
        for i in 0..=50 {
            let t = c.u_to_t(i as f64 / 50.0);
            assert!(t >= prev);
            prev = t;
        }
        assert!((c.u_to_t(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn frames_are_orthonormal() {
        let pts = (0..40)
            .map(|i| {
                let a = i as f64 * 0.2;
                DVec3::new(a.cos(), a.sin(), a * 0.1)
            })
            .collect();
        let c = CatmullRomCurve::new(pts);
        let f = c.frenet_frames(64);
        assert_eq!(f.normals.len(), 65);
        for i in 0..=64 {
            let (t, n, b) = (f.tangents[i], f.normals[i], f.binormals[i]);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(t.dot(n).abs() < 1e-3);
            assert!(b.dot(n).abs() < 1e-6);
        }
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let c = CatmullRomCurve::new(vec![DVec3::ONE; 4]);
        assert!(c.point(0.3).is_finite());
        assert!(c.point_at(0.7).is_finite());
    }
}
