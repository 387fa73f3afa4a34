//! Indexed triangle meshes for the tubes, the light marker and the raycast plane.

use crate::spline::CatmullRomCurve;
use glam::{DVec3, Vec3};
use std::f64::consts::PI;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// Counter-clockwise indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append `other`, rebasing its indices.
    pub fn extend_from(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
}

/// Sweep a circle of `radius` along `path` (open ends, no caps).
///
/// Produces `(tubular_segments + 1) * (radial_segments + 1)` vertices; the seam
/// column is duplicated so uvs wrap cleanly.
pub fn tube(
    path: &CatmullRomCurve,
    tubular_segments: usize,
    radius: f32,
    radial_segments: usize,
) -> MeshData {
    let frames = path.frenet_frames(tubular_segments);
    let ring = radial_segments + 1;
    let mut mesh = MeshData {
        vertices: Vec::with_capacity((tubular_segments + 1) * ring),
        indices: Vec::with_capacity(tubular_segments * radial_segments * 6),
    };

    for i in 0..=tubular_segments {
        let u = i as f64 / tubular_segments as f64;
        let p = path.point_at(u);
        let n = frames.normals[i];
        let b = frames.binormals[i];
        for j in 0..=radial_segments {
            let v = j as f64 / radial_segments as f64 * PI * 2.0;
            let sin = v.sin();
            let cos = -v.cos();
            let normal: DVec3 = (n * cos + b * sin).normalize_or_zero();
            let position = p + normal * radius as f64;
            mesh.vertices.push(Vertex::new(
                position.as_vec3(),
                normal.as_vec3(),
                [u as f32, j as f32 / radial_segments as f32],
            ));
        }
    }

    let ring = ring as u32;
    for j in 1..=tubular_segments as u32 {
        for i in 1..=radial_segments as u32 {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;
            mesh.push_quad(a, b, c, d);
        }
    }
    mesh
}

/// UV sphere centred at the origin. Degenerate pole triangles are skipped.
pub fn sphere(radius: f32, width_segments: usize, height_segments: usize) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = MeshData::default();
    let mut grid = Vec::with_capacity(height_segments + 1);
    let r = radius as f64;

    for iy in 0..=height_segments {
        let v = iy as f64 / height_segments as f64;
        let u_offset = if iy == 0 {
            0.5 / width_segments as f64
        } else if iy == height_segments {
            -0.5 / width_segments as f64
        } else {
            0.0
        };
        let mut row = Vec::with_capacity(width_segments + 1);
        for ix in 0..=width_segments {
            let u = ix as f64 / width_segments as f64;
            let phi = u * PI * 2.0;
            let theta = v * PI;
            let p = DVec3::new(
                -r * phi.cos() * theta.sin(),
                r * theta.cos(),
                r * phi.sin() * theta.sin(),
            );
            row.push(mesh.vertices.len() as u32);
            mesh.vertices.push(Vertex::new(
                p.as_vec3(),
                p.normalize_or_zero().as_vec3(),
                [(u + u_offset) as f32, (1.0 - v) as f32],
            ));
        }
        grid.push(row);
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Single quad on z = 0 facing +z.
pub fn plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let n = Vec3::Z;
    MeshData {
        vertices: vec![
            Vertex::new(Vec3::new(-hw, hh, 0.0), n, [0.0, 1.0]),
            Vertex::new(Vec3::new(hw, hh, 0.0), n, [1.0, 1.0]),
            Vertex::new(Vec3::new(-hw, -hh, 0.0), n, [0.0, 0.0]),
            Vertex::new(Vec3::new(hw, -hh, 0.0), n, [1.0, 0.0]),
        ],
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}
