//! Core types: math re-exports, Transform, Camera, Scene, Material and the
//! texture-swap mechanism. Renderer-agnostic.

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4, vec2, vec3};

pub mod camera;
pub mod error;
pub mod material;
pub mod property;
pub mod scene;
pub mod slot;
pub mod swap;
pub mod transform;

pub use error::{MaterialError, MaterialResult};
pub use material::{Material, ShadingModel, Side, TextureHandle};
pub use property::{PropertyId, PropertyValue, ScalarProperty, TextureProperty, VectorProperty};
pub use slot::TextureSlot;
pub use swap::TextureSwap;

/// Convert a packed `0xRRGGBB` color into linear-ish `[0, 1]` components.
#[inline]
pub fn color_from_hex(hex: u32) -> Vec3 {
    vec3(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translate_then_scale_matrix() {
        let t = transform::Transform::from_trs(
            vec3(1.0, 2.0, 3.0),
            vec3(0.0, 0.0, 0.0),
            vec3(2.0, 2.0, 2.0),
        );
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn hex_colors_unpack() {
        let c = color_from_hex(0x049ef4);
        assert!((c.x - 4.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 158.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 244.0 / 255.0).abs() < 1e-6);
        assert_eq!(color_from_hex(0x444444), Vec3::splat(68.0 / 255.0));
    }
}
