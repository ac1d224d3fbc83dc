//! CPU-side mesh representation and the procedural shapes the demos use.

use std::f32::consts::{PI, TAU};

use corelib::Vec3;
use corelib::scene::MeshKind;

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices. Triangles wind CCW
/// when seen from outside.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    pub fn from_kind(kind: &MeshKind) -> Self {
        match *kind {
            MeshKind::Sphere {
                radius,
                width_segments,
                height_segments,
            } => Self::sphere(radius, width_segments, height_segments),
            MeshKind::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => Self::torus_knot(radius, tube, tubular_segments, radial_segments, p, q),
        }
    }

    /// UV sphere. `v = 0` is the north pole, matching top-row-first image data.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let row = ws + 1;

        let mut vertices = Vec::with_capacity((row * (hs + 1)) as usize);
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let dir = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                let normal = dir.normalize_or(Vec3::Y);
                vertices.push(MeshVertex::new(
                    (dir * radius).to_array(),
                    normal.to_array(),
                    [u, v],
                ));
            }
        }

        // Pole rows collapse to a point, so they contribute one triangle per quad.
        let mut indices = Vec::with_capacity((ws * (hs - 1) * 6) as usize);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::new(vertices, indices)
    }

    /// (p, q) torus knot wrapped by a tube of radius `tube`.
    pub fn torus_knot(
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    ) -> Self {
        let ts = tubular_segments.max(3);
        let rs = radial_segments.max(3);
        let (pf, qf) = (p.max(1) as f32, q as f32);

        let curve = |u: f32| {
            let q_over_p = qf / pf * u;
            let cs = q_over_p.cos();
            Vec3::new(
                radius * (2.0 + cs) * 0.5 * u.cos(),
                radius * (2.0 + cs) * 0.5 * u.sin(),
                radius * q_over_p.sin() * 0.5,
            )
        };

        let mut vertices = Vec::with_capacity(((ts + 1) * (rs + 1)) as usize);
        for i in 0..=ts {
            let u = i as f32 / ts as f32 * pf * TAU;
            let p1 = curve(u);
            let p2 = curve(u + 0.01);

            // Frenet-like frame along the curve.
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(n).normalize_or(Vec3::Z);
            let n = b.cross(t).normalize_or(Vec3::Y);

            for j in 0..=rs {
                let v = j as f32 / rs as f32 * TAU;
                let cx = -tube * v.cos();
                let cy = tube * v.sin();
                let position = p1 + n * cx + b * cy;
                let normal = (position - p1).normalize_or(n);
                vertices.push(MeshVertex::new(
                    position.to_array(),
                    normal.to_array(),
                    [i as f32 / ts as f32, j as f32 / rs as f32],
                ));
            }
        }

        let mut indices = Vec::with_capacity((ts * rs * 6) as usize);
        for j in 1..=ts {
            for i in 1..=rs {
                let a = (rs + 1) * (j - 1) + (i - 1);
                let b = (rs + 1) * j + (i - 1);
                let c = (rs + 1) * j + i;
                let d = (rs + 1) * (j - 1) + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0]);
        assert!(data.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn sphere_counts_and_radius() {
        let mesh = MeshData::sphere(0.4, 32, 16);
        assert_eq!(mesh.vertices.len(), 33 * 17);
        assert_eq!(mesh.indices.len(), 32 * 30 * 3);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!((p.length() - 0.4).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let mesh = MeshData::sphere(1.0, 16, 8);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let face = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(face.dot(center) > 0.0);
        }
    }

    #[test]
    fn high_tessellation_sphere_for_displacement() {
        let mesh = MeshData::from_kind(&MeshKind::Sphere {
            radius: 0.4,
            width_segments: 180,
            height_segments: 180,
        });
        assert_eq!(mesh.vertices.len(), 181 * 181);
    }

    #[test]
    fn torus_knot_counts() {
        let mesh = MeshData::from_kind(&MeshKind::torus_knot(0.2, 0.03, 50, 8));
        assert_eq!(mesh.vertices.len(), 51 * 9);
        assert_eq!(mesh.indices.len(), 50 * 8 * 6);
        assert!(mesh.is_valid());
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
