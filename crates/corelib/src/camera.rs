use crate::{Mat4, Vec2, Vec3};

/// Perspective camera (right-handed).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// Camera used by every demo: 45° FOV looking at the origin from +Z.
    pub fn demo_default(aspect: f32) -> Self {
        Self::new_perspective(
            Vec3::new(0.0, 0.0, 1.2),
            Vec3::ZERO,
            Vec3::Y,
            45f32.to_radians(),
            0.01,
            100.0,
            aspect,
        )
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// wgpu-style projection (depth in [0, 1]).
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }
}

/// Orbit controller: rotate around `camera.target` by dragging, zoom by scrolling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitController {
    /// Horizontal angle around +Y, radians.
    pub yaw: f32,
    /// Elevation above the XZ plane, radians.
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Distance multiplier per scroll line.
    pub zoom_factor: f32,
}

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.2,
            min_distance: 0.5,
            max_distance: 10.0,
            rotate_speed: 0.005,
            zoom_factor: 0.9,
        }
    }
}

impl OrbitController {
    /// Derive yaw/pitch/distance from the camera's current placement.
    pub fn from_camera(camera: &Camera) -> Self {
        let offset = camera.eye - camera.target;
        let distance = offset.length().max(1e-4);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            ..Self::default()
        }
    }

    /// Apply a pointer drag (pixels). Dragging right orbits the camera left.
    pub fn drag(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.rotate_speed;
        self.pitch = (self.pitch + delta.y * self.rotate_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Apply scroll lines; positive zooms in.
    pub fn scroll(&mut self, lines: f32) {
        self.distance = (self.distance * self.zoom_factor.powf(lines))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Write the orbit position into `camera.eye`.
    pub fn apply(&self, camera: &mut Camera) {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let offset = Vec3::new(sy * cp, sp, cy * cp) * self.distance;
        camera.eye = camera.target + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_pv_is_finite() {
        let cam = Camera::demo_default(16.0 / 9.0);
        let a = cam.proj_view().to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn orbit_round_trips_camera_position() {
        let mut cam = Camera::demo_default(1.0);
        let orbit = OrbitController::from_camera(&cam);
        let eye = cam.eye;
        orbit.apply(&mut cam);
        assert!((cam.eye - eye).length() < 1e-5);
    }

    #[test]
    fn pitch_and_zoom_are_clamped() {
        let mut orbit = OrbitController::default();
        orbit.drag(Vec2::new(0.0, 1.0e6));
        assert!(orbit.pitch < std::f32::consts::FRAC_PI_2);
        orbit.scroll(1000.0);
        assert_eq!(orbit.distance, orbit.min_distance);
        orbit.scroll(-1000.0);
        assert_eq!(orbit.distance, orbit.max_distance);
    }
}
