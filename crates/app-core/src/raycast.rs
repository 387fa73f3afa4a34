use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Finite, double-sided axis-aligned rectangle on z = `z`.
///
/// This is the invisible surface pointer rays are cast against to find the
/// light's world-space target.
#[derive(Clone, Copy, Debug)]
pub struct InteractionPlane {
    pub z: f32,
    pub half_width: f32,
    pub half_height: f32,
}

impl InteractionPlane {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            z: 0.0,
            half_width: width * 0.5,
            half_height: height * 0.5,
        }
    }

    /// Nearest hit in front of the ray origin, if any.
    ///
    /// Rays parallel to the plane, pointing away from it, or landing outside
    /// its extent miss.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = ray.direction.z;
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.z - ray.origin.z) / denom;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        let hit = ray.at(t);
        (hit.x.abs() <= self.half_width && hit.y.abs() <= self.half_height).then_some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane() -> InteractionPlane {
        InteractionPlane::new(100.0, 100.0)
    }

    #[test]
    fn straight_down_hits_origin() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 0.5),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(plane().intersect(&ray), Some(Vec3::ZERO));
    }

    #[test]
    fn back_face_hits_too() {
        let ray = Ray {
            origin: Vec3::new(0.2, 0.1, -1.0),
            direction: Vec3::Z,
        };
        assert_eq!(plane().intersect(&ray), Some(Vec3::new(0.2, 0.1, 0.0)));
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 0.5),
            direction: Vec3::X,
        };
        assert_eq!(plane().intersect(&ray), None);
    }

    #[test]
    fn pointing_away_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 0.5),
            direction: Vec3::Z,
        };
        assert_eq!(plane().intersect(&ray), None);
    }

    #[test]
    fn outside_extent_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 0.5),
            direction: Vec3::new(1.0, 0.0, -0.001).normalize(),
        };
        assert_eq!(plane().intersect(&ray), None);
    }
}
