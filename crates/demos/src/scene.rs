//! Per-variant demo construction.

use asset::SamplerSettings;
use corelib::scene::{Entity, LightRig, MeshKind, Renderable, Scene};
use corelib::transform::Transform;
use corelib::{
    Material, MaterialResult, ScalarProperty, Side, TextureProperty, TextureSlot, TextureSwap,
    Vec2, Vec3, color_from_hex,
};

use crate::assets::{self, DemoAssets};
use crate::controls::{ControlError, ControlPanel};
use crate::kind::DemoKind;

const ROUGHNESS: f32 = 0.07;
const SPHERE_RADIUS: f32 = 0.4;

/// A fully configured demo: one mesh, one material, one panel.
#[derive(Clone, Debug)]
pub struct DemoScene {
    pub kind: DemoKind,
    pub scene: Scene,
    pub mesh: Entity,
    pub material: Material,
    pub panel: ControlPanel,
}

impl DemoScene {
    pub fn build(kind: DemoKind, assets: &DemoAssets) -> Result<Self, ControlError> {
        let built = match kind {
            DemoKind::Color => color_map(assets)?,
            DemoKind::Bump => bump_map(assets)?,
            DemoKind::Normal => normal_map(assets)?,
            DemoKind::Displacement => displacement_map(assets)?,
            DemoKind::Alpha => alpha_map(assets)?,
            DemoKind::Emissive => emissive_map(assets)?,
            DemoKind::Gradient => gradient_map(assets)?,
        };

        let mut scene = Scene::new();
        scene.lights = built.lights;
        scene.background = built.background;
        let mesh = scene.spawn(
            Transform::identity(),
            Some(Renderable { mesh: built.mesh }),
        );

        log::info!(
            "Built demo '{}': {} texture(s) bound, {} control(s)",
            kind.title(),
            built.material.bound_textures().count(),
            built.panel.entries().len()
        );

        Ok(Self {
            kind,
            scene,
            mesh,
            material: built.material,
            panel: built.panel,
        })
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn mesh_kind(&self) -> Option<MeshKind> {
        self.scene.iter_renderables().next().map(|(_, r)| r.mesh)
    }
}

struct Parts {
    material: Material,
    panel: ControlPanel,
    mesh: MeshKind,
    lights: LightRig,
    background: Vec3,
}

impl Parts {
    fn sphere(material: Material, panel: ControlPanel, lights: LightRig) -> Self {
        Self {
            material,
            panel,
            mesh: MeshKind::sphere(SPHERE_RADIUS),
            lights,
            background: Vec3::ZERO,
        }
    }
}

/// `{none, <label>: texture}` mapping.
fn none_or(label: &str, texture: corelib::TextureHandle) -> MaterialResult<TextureSlot> {
    TextureSlot::with_none().with(label, Some(texture))
}

fn color_map(assets: &DemoAssets) -> Result<Parts, ControlError> {
    let color = assets.texture(assets::BLOCKS_COLOR);
    let swap = TextureSwap::new(TextureProperty::Map, none_or("blocks", color)?);

    let material = Material::new("color-map")
        .with_texture(TextureProperty::Map, Some(color))
        .with_roughness(ROUGHNESS);

    let mut panel = ControlPanel::new();
    panel.add_texture_choice("map", swap, &material)?;
    Ok(Parts::sphere(material, panel, LightRig::studio(false)))
}

fn bump_map(assets: &DemoAssets) -> Result<Parts, ControlError> {
    let color = assets.texture(assets::BLOCKS_COLOR);
    let bump = assets.texture(assets::BLOCKS_BUMP);
    let swap = TextureSwap::new(TextureProperty::BumpMap, none_or("blocks", bump)?);

    let material = Material::new("bump-map")
        .with_texture(TextureProperty::Map, Some(color))
        .with_texture(TextureProperty::BumpMap, Some(bump))
        .with_roughness(ROUGHNESS);

    let mut panel = ControlPanel::new();
    panel.add_texture_choice("bumpMap", swap, &material)?;
    panel.add_scalar("bumpScale", ScalarProperty::BumpScale, -3.0..=3.0, &material)?;
    Ok(Parts::sphere(material, panel, LightRig::studio(true)))
}

fn normal_map(assets: &DemoAssets) -> Result<Parts, ControlError> {
    let color = assets.texture(assets::BLOCKS_COLOR);
    let normal = assets.texture(assets::BLOCKS_NORMAL);
    let swap = TextureSwap::new(TextureProperty::NormalMap, none_or("blocks", normal)?);

    let material = Material::new("normal-map")
        .with_texture(TextureProperty::Map, Some(color))
        .with_texture(TextureProperty::NormalMap, Some(normal))
        .with_roughness(ROUGHNESS);

    let mut panel = ControlPanel::new();
    panel.add_texture_choice("normalMap", swap, &material)?;
    panel.add_normal_scale("normalScale", -3.0..=3.0, &material)?;
    Ok(Parts::sphere(material, panel, LightRig::studio(true)))
}

fn displacement_map(assets: &DemoAssets) -> Result<Parts, ControlError> {
    let color = assets.texture(assets::SANDS_COLOR);
    let displacement = assets.texture(assets::SANDS_DISPLACEMENT);
    let swap = TextureSwap::new(
        TextureProperty::DisplacementMap,
        none_or("sands", displacement)?,
    );

    let material = Material::new("displacement-map")
        .with_texture(TextureProperty::Map, Some(color))
        .with_texture(TextureProperty::DisplacementMap, Some(displacement))
        .with_displacement_scale(0.1)
        .with_roughness(ROUGHNESS);

    let mut panel = ControlPanel::new();
    panel.add_texture_choice("displacementMap", swap, &material)?;
    panel.add_scalar(
        "displacementScale",
        ScalarProperty::DisplacementScale,
        -0.5..=0.5,
        &material,
    )?;

    // Dense tessellation keeps the displaced poles from faceting.
    let mut parts = Parts::sphere(material, panel, LightRig::studio(true));
    parts.mesh = MeshKind::Sphere {
        radius: SPHERE_RADIUS,
        width_segments: 180,
        height_segments: 180,
    };
    Ok(parts)
}

fn alpha_map(assets: &DemoAssets) -> Result<Parts, ControlError> {
    let alpha = assets.texture_with(assets::ALPHA_MAP, SamplerSettings::repeating(8.0, 8.0));
    let swap = TextureSwap::new(TextureProperty::AlphaMap, none_or("partial", alpha)?);

    let material = Material::new("alpha-map")
        .with_texture(TextureProperty::AlphaMap, Some(alpha))
        .with_roughness(ROUGHNESS)
        .with_transparency(Side::Double);

    let mut panel = ControlPanel::new();
    panel.add_texture_choice("alphaMap", swap, &material)?;
    Ok(Parts::sphere(material, panel, LightRig::studio(false)))
}

fn emissive_map(assets: &DemoAssets) -> Result<Parts, ControlError> {
    let emissive = assets.texture(assets::LAVA_EMISSIVE);
    let normal = assets.texture(assets::LAVA_NORMAL);
    let swap = TextureSwap::new(TextureProperty::EmissiveMap, none_or("lava", emissive)?);

    let material = Material::new("emissive-map")
        .with_texture(TextureProperty::EmissiveMap, Some(emissive))
        .with_emissive(Vec3::ONE)
        .with_roughness(ROUGHNESS)
        .with_texture(TextureProperty::NormalMap, Some(normal))
        .with_normal_scale(Vec2::splat(4.0));

    let mut panel = ControlPanel::new();
    panel.add_texture_choice("emissiveMap", swap, &material)?;

    // Emission only reads well against a dim scene.
    let mut lights = LightRig::studio(true);
    lights.ambient = None;
    let mut parts = Parts::sphere(material, panel, lights);
    parts.background = color_from_hex(0x444444);
    Ok(parts)
}

fn gradient_map(assets: &DemoAssets) -> Result<Parts, ControlError> {
    let three = assets.texture_with(assets::TONE_THREE, SamplerSettings::nearest());
    let five = assets.texture_with(assets::TONE_FIVE, SamplerSettings::nearest());
    let slot = TextureSlot::with_none()
        .with("threeTone", Some(three))?
        .with("fiveTone", Some(five))?;
    let swap = TextureSwap::new(TextureProperty::GradientMap, slot);

    let material = Material::toon("gradient-map")
        .with_color(color_from_hex(0x049ef4))
        .with_texture(TextureProperty::GradientMap, Some(three));

    let mut panel = ControlPanel::new();
    panel.add_texture_choice("gradientMap", swap, &material)?;

    Ok(Parts {
        material,
        panel,
        mesh: MeshKind::torus_knot(0.2, 0.03, 50, 8),
        lights: LightRig::studio(true),
        background: Vec3::ZERO,
    })
}
