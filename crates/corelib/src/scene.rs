//! Scene: a handful of mesh entities, the light rig and the clear color.

use crate::transform::Transform;
use crate::{Vec3, vec3};

/// Entity id (dense, index into component arrays).
pub type Entity = u32;

/// Procedural meshes a demo can ask for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeshKind {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
}

impl MeshKind {
    /// Sphere with the usual 32x16 tessellation.
    pub fn sphere(radius: f32) -> Self {
        MeshKind::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        }
    }

    /// (2, 3) torus knot.
    pub fn torus_knot(radius: f32, tube: f32, tubular_segments: u32, radial_segments: u32) -> Self {
        MeshKind::TorusKnot {
            radius,
            tube,
            tubular_segments,
            radial_segments,
            p: 2,
            q: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub mesh: MeshKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// Angular speed (rad/s) of the orbit around +Y; `None` keeps it fixed.
    pub orbit_speed: Option<f32>,
}

/// Lights used by the demos. Either light may be absent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: Option<AmbientLight>,
    pub point: Option<PointLight>,
}

impl LightRig {
    /// Soft ambient plus one point light up and to the right of the camera.
    pub fn studio(animated: bool) -> Self {
        Self {
            ambient: Some(AmbientLight {
                color: Vec3::ONE,
                intensity: 0.4,
            }),
            point: Some(PointLight {
                color: Vec3::ONE,
                intensity: 1.0,
                position: vec3(1.0, 1.0, 1.5),
                orbit_speed: animated.then_some(0.6),
            }),
        }
    }
}

/// Dense parallel arrays; spawn may allocate, per-frame updates do not.
#[derive(Clone, Debug)]
pub struct Scene {
    transforms: Vec<Transform>,
    renderables: Vec<Option<Renderable>>,
    alive: Vec<bool>,
    len: u32,
    pub lights: LightRig,
    pub background: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            transforms: Vec::new(),
            renderables: Vec::new(),
            alive: Vec::new(),
            len: 0,
            lights: LightRig::studio(false),
            background: Vec3::ZERO,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn entity with Transform and optional Renderable.
    pub fn spawn(&mut self, t: Transform, r: Option<Renderable>) -> Entity {
        let id = self.len;
        let idx = id as usize;
        self.len += 1;

        if idx >= self.transforms.len() {
            let new_len = (idx + 1).next_power_of_two().max(8);
            self.transforms.resize(new_len, Transform::identity());
            self.renderables.resize(new_len, None);
            self.alive.resize(new_len, false);
        }

        self.transforms[idx] = t;
        self.renderables[idx] = r;
        self.alive[idx] = true;
        id
    }

    #[inline]
    pub fn is_alive(&self, e: Entity) -> bool {
        let i = e as usize;
        i < self.alive.len() && self.alive[i]
    }

    #[inline]
    pub fn transform(&self, e: Entity) -> Option<&Transform> {
        self.is_alive(e).then(|| &self.transforms[e as usize])
    }

    /// Iterate over (Transform, Renderable) pairs of live entities.
    pub fn iter_renderables(&self) -> impl Iterator<Item = (&Transform, &Renderable)> {
        (0..self.len as usize).filter_map(move |i| {
            if self.alive.get(i).copied().unwrap_or(false) {
                if let Some(r) = self.renderables[i].as_ref() {
                    return Some((&self.transforms[i], r));
                }
            }
            None
        })
    }

    /// Point light position at `time` seconds, following its orbit if any.
    pub fn point_light_position(&self, time: f32) -> Option<Vec3> {
        let light = self.lights.point?;
        Some(match light.orbit_speed {
            Some(speed) => {
                let (s, c) = (time * speed).sin_cos();
                let p = light.position;
                vec3(p.x * c + p.z * s, p.y, -p.x * s + p.z * c)
            }
            None => light.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_renderables_are_iterated() {
        let mut scene = Scene::new();
        let e = scene.spawn(
            Transform::identity(),
            Some(Renderable {
                mesh: MeshKind::sphere(0.4),
            }),
        );
        scene.spawn(Transform::identity(), None);
        assert!(scene.is_alive(e));
        assert_eq!(scene.iter_renderables().count(), 1);
    }

    #[test]
    fn static_light_does_not_move() {
        let scene = Scene::new();
        let p0 = scene.point_light_position(0.0).unwrap();
        let p1 = scene.point_light_position(10.0).unwrap();
        assert_eq!(p0, p1);
    }

    #[test]
    fn orbiting_light_keeps_radius() {
        let mut scene = Scene::new();
        scene.lights = LightRig::studio(true);
        let p0 = scene.point_light_position(0.0).unwrap();
        let p1 = scene.point_light_position(3.0).unwrap();
        assert_ne!(p0, p1);
        assert!((p0.length() - p1.length()).abs() < 1e-5);
    }
}
