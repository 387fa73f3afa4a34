//! Scene construction: the tube field, the light marker and the raycast plane.
//!
//! Materials are owned here and meshes name the one they draw with, so there
//! is no shared-pointer graph between meshes, materials and uniforms.

use crate::config::SketchConfig;
use crate::constants::{MARKER_COLOR, MARKER_RADIUS, MARKER_SEGMENTS, PLANE_SIZE};
use crate::field::NoiseField;
use crate::flow::{self, FlowCurve};
use crate::geometry::{self, MeshData};
use crate::raycast::InteractionPlane;
use crate::spline::CatmullRomCurve;
use glam::{DVec3, Vec3};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Shader material on the raycast plane.
    Main,
    /// Shader material shared by every tube.
    Tubes,
    /// Flat unlit colour for the light marker.
    Marker,
}

/// The two values every shader material receives: `uTime` and `uLight`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaterialUniforms {
    pub time: f32,
    pub light: Vec3,
}

#[derive(Clone, Debug)]
pub struct ShaderMaterial {
    pub name: &'static str,
    pub uniforms: MaterialUniforms,
    pub double_sided: bool,
}

impl ShaderMaterial {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            uniforms: MaterialUniforms::default(),
            double_sided: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Materials {
    pub main: ShaderMaterial,
    pub tubes: ShaderMaterial,
    pub marker_color: [f32; 4],
}

impl Default for Materials {
    fn default() -> Self {
        Self {
            main: ShaderMaterial::new("main"),
            tubes: ShaderMaterial::new("tubes"),
            marker_color: MARKER_COLOR,
        }
    }
}

impl Materials {
    pub fn shader(&self, kind: MaterialKind) -> Option<&ShaderMaterial> {
        match kind {
            MaterialKind::Main => Some(&self.main),
            MaterialKind::Tubes => Some(&self.tubes),
            MaterialKind::Marker => None,
        }
    }

    pub fn set_light(&mut self, light: Vec3) {
        self.main.uniforms.light = light;
        self.tubes.uniforms.light = light;
    }

    pub fn set_time(&mut self, time: f32) {
        self.main.uniforms.time = time;
        self.tubes.uniforms.time = time;
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: MeshData,
    pub material: MaterialKind,
    pub position: Vec3,
    /// Streamline a tube was swept from.
    pub curve: Option<FlowCurve>,
}

impl Mesh {
    fn new(geometry: MeshData, material: MaterialKind) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            curve: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
}

/// Which scene a render command refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneLayer {
    /// Only the interaction plane; drawn first.
    Raycast,
    /// Tubes plus the light marker; drawn last.
    Main,
}

#[derive(Clone, Debug)]
pub struct SceneSet {
    pub raycast: Scene,
    pub main: Scene,
    pub materials: Materials,
    pub plane: InteractionPlane,
    marker: usize,
}

impl SceneSet {
    /// Build every mesh once. Geometry never changes afterwards.
    pub fn build(config: &SketchConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let field = NoiseField::new(rng.gen());
        let spread = config.seed_spread as f64;

        let mut main = Scene::default();
        main.meshes.reserve(config.tube_count + 1);
        for _ in 0..config.tube_count {
            let seed = DVec3::new(
                rng.gen::<f64>() - 0.5,
                rng.gen::<f64>() - 0.5,
                rng.gen::<f64>() - 0.5,
            ) * spread;
            main.meshes.push(tube_mesh(&field, seed, config));
        }

        let marker = main.meshes.len();
        main.meshes.push(Mesh::new(
            geometry::sphere(MARKER_RADIUS, MARKER_SEGMENTS, MARKER_SEGMENTS),
            MaterialKind::Marker,
        ));

        let raycast = Scene {
            meshes: vec![Mesh::new(
                geometry::plane(PLANE_SIZE, PLANE_SIZE),
                MaterialKind::Main,
            )],
        };

        let set = Self {
            raycast,
            main,
            materials: Materials::default(),
            plane: InteractionPlane::new(PLANE_SIZE, PLANE_SIZE),
            marker,
        };
        log::info!(
            "[scene] noise_seed={} tubes={} vertices={} triangles={}",
            field.seed(),
            config.tube_count,
            set.vertex_count(),
            set.triangle_count()
        );
        set
    }

    pub fn scene(&self, layer: SceneLayer) -> &Scene {
        match layer {
            SceneLayer::Raycast => &self.raycast,
            SceneLayer::Main => &self.main,
        }
    }

    pub fn tubes(&self) -> impl Iterator<Item = &Mesh> {
        self.main
            .meshes
            .iter()
            .filter(|m| m.material == MaterialKind::Tubes)
    }

    pub fn marker(&self) -> &Mesh {
        &self.main.meshes[self.marker]
    }

    pub fn marker_position(&self) -> Vec3 {
        self.marker().position
    }

    pub fn set_marker_position(&mut self, position: Vec3) {
        self.main.meshes[self.marker].position = position;
    }

    pub fn vertex_count(&self) -> usize {
        self.raycast
            .meshes
            .iter()
            .chain(&self.main.meshes)
            .map(|m| m.geometry.vertices.len())
            .sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.raycast
            .meshes
            .iter()
            .chain(&self.main.meshes)
            .map(|m| m.geometry.triangle_count())
            .sum()
    }
}

fn tube_mesh(field: &NoiseField, seed: DVec3, config: &SketchConfig) -> Mesh {
    let curve = flow::generate(field, seed, config.flow);
    let path = CatmullRomCurve::new(curve.points().to_vec());
    let geometry = geometry::tube(
        &path,
        config.tubular_segments,
        config.tube_radius,
        config.radial_segments,
    );
    Mesh {
        curve: Some(curve),
        ..Mesh::new(geometry, MaterialKind::Tubes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SketchConfig {
        let mut c = SketchConfig::default().with_seed(17);
        c.tube_count = 6;
        c.tubular_segments = 24;
        c
    }

    #[test]
    fn builds_tubes_marker_and_plane() {
        let set = SceneSet::build(&small());
        assert_eq!(set.tubes().count(), 6);
        assert_eq!(set.main.meshes.len(), 7);
        assert_eq!(set.marker().material, MaterialKind::Marker);
        assert_eq!(set.raycast.meshes.len(), 1);
        assert_eq!(set.raycast.meshes[0].material, MaterialKind::Main);
    }

    #[test]
    fn seeds_lie_in_scaled_cube() {
        let set = SceneSet::build(&small());
        for tube in set.tubes() {
            let curve = tube.curve.as_ref().expect("tube keeps its curve");
            assert_eq!(curve.len(), 501);
            let s = curve.first();
            for c in [s.x, s.y, s.z] {
                assert!((-0.225..0.225).contains(&c), "seed component {c}");
            }
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = SceneSet::build(&small());
        let b = SceneSet::build(&small());
        for (ta, tb) in a.tubes().zip(b.tubes()) {
            assert_eq!(ta.geometry.vertices, tb.geometry.vertices);
        }
    }

    #[test]
    fn uniforms_written_to_both_materials() {
        let mut m = Materials::default();
        m.set_light(Vec3::new(0.1, 0.2, 0.0));
        m.set_time(3.0);
        assert_eq!(m.main.uniforms, m.tubes.uniforms);
        assert_eq!(m.shader(MaterialKind::Tubes).map(|s| s.name), Some("tubes"));
        assert!(m.shader(MaterialKind::Marker).is_none());
    }
}
