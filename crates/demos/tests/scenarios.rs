use asset::{SamplerSettings, TextureRegistry};
use corelib::scene::MeshKind;
use corelib::{MaterialError, ShadingModel, Side, TextureProperty, Vec2, Vec3};
use demos::{Axis, Control, ControlChange, ControlError, DemoAssets, DemoKind, DemoScene};

fn build(kind: DemoKind) -> DemoScene {
    // Missing files are fine: handles are issued up front and failures only log.
    let assets = DemoAssets::new("no-such-texture-dir", TextureRegistry::new());
    DemoScene::build(kind, &assets).expect("demo builds")
}

fn selected(demo: &DemoScene, name: &str) -> String {
    match demo.panel.get(name) {
        Some(Control::TextureChoice { selected, .. }) => selected.clone(),
        other => panic!("'{name}' is not a texture control: {other:?}"),
    }
}

#[test]
fn every_demo_starts_on_its_first_real_texture() {
    let choices = [
        (DemoKind::Color, "map", TextureProperty::Map, "blocks"),
        (DemoKind::Bump, "bumpMap", TextureProperty::BumpMap, "blocks"),
        (DemoKind::Normal, "normalMap", TextureProperty::NormalMap, "blocks"),
        (
            DemoKind::Displacement,
            "displacementMap",
            TextureProperty::DisplacementMap,
            "sands",
        ),
        (DemoKind::Alpha, "alphaMap", TextureProperty::AlphaMap, "partial"),
        (DemoKind::Emissive, "emissiveMap", TextureProperty::EmissiveMap, "lava"),
        (DemoKind::Gradient, "gradientMap", TextureProperty::GradientMap, "threeTone"),
    ];

    for (kind, control, property, label) in choices {
        let demo = build(kind);
        assert_eq!(selected(&demo, control), label, "{kind}");
        assert!(demo.material.texture(property).is_some(), "{kind}");
        assert!(demo.material.needs_update(), "{kind}");
        assert_eq!(demo.scene.iter_renderables().count(), 1);
    }
}

#[test]
fn color_map_switches_to_none() {
    let mut demo = build(DemoKind::Color);
    let blocks = demo.material.texture(TextureProperty::Map);
    assert!(blocks.is_some());
    demo.material.take_needs_update();

    let DemoScene { panel, material, .. } = &mut demo;
    panel.select_texture(material, "map", "none").unwrap();
    assert_eq!(demo.material.texture(TextureProperty::Map), None);
    assert!(demo.material.needs_update());

    let DemoScene { panel, material, .. } = &mut demo;
    panel.select_texture(material, "map", "blocks").unwrap();
    assert_eq!(demo.material.texture(TextureProperty::Map), blocks);
}

#[test]
fn unknown_label_from_panel_is_rejected() {
    let mut demo = build(DemoKind::Gradient);
    demo.material.take_needs_update();
    let before = demo.material.clone();

    let DemoScene { panel, material, .. } = &mut demo;
    let err = panel
        .apply(
            material,
            &ControlChange::Texture {
                name: "gradientMap".into(),
                label: "sevenTone".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ControlError::Material(MaterialError::UnknownLabel { .. })
    ));
    assert_eq!(demo.material, before);
    assert_eq!(selected(&demo, "gradientMap"), "threeTone");
}

#[test]
fn normal_scale_composite_is_order_independent() {
    let mut a = build(DemoKind::Normal);
    let mut b = build(DemoKind::Normal);

    {
        let DemoScene { panel, material, .. } = &mut a;
        panel.set_axis(material, "normalScale", Axis::X, 2.0).unwrap();
        panel.set_axis(material, "normalScale", Axis::Y, -1.0).unwrap();
    }
    {
        let DemoScene { panel, material, .. } = &mut b;
        panel.set_axis(material, "normalScale", Axis::Y, -1.0).unwrap();
        panel.set_axis(material, "normalScale", Axis::X, 2.0).unwrap();
    }

    assert_eq!(a.material.normal_scale, Vec2::new(2.0, -1.0));
    assert_eq!(b.material.normal_scale, Vec2::new(2.0, -1.0));
}

#[test]
fn displacement_defaults() {
    let demo = build(DemoKind::Displacement);
    assert_eq!(demo.material.displacement_scale, 0.1);
    match demo.panel.get("displacementScale") {
        Some(Control::Scalar { value, range, .. }) => {
            assert_eq!(*value, 0.1);
            assert_eq!(range.clone(), -0.5..=0.5);
        }
        other => panic!("unexpected control {other:?}"),
    }
    assert!(matches!(
        demo.mesh_kind(),
        Some(MeshKind::Sphere {
            width_segments: 180,
            height_segments: 180,
            ..
        })
    ));
}

#[test]
fn emissive_demo_dims_the_scene() {
    let demo = build(DemoKind::Emissive);
    assert!(demo.scene.lights.ambient.is_none());
    assert!(demo.scene.lights.point.is_some());
    assert_eq!(demo.scene.background, corelib::color_from_hex(0x444444));
    assert_eq!(demo.material.emissive, Vec3::ONE);
    assert_eq!(demo.material.normal_scale, Vec2::splat(4.0));
}

#[test]
fn alpha_and_gradient_material_state() {
    let assets = DemoAssets::new("no-such-texture-dir", TextureRegistry::new());
    let alpha = DemoScene::build(DemoKind::Alpha, &assets).unwrap();
    assert!(alpha.material.is_transparent());
    assert_eq!(alpha.material.side(), Side::Double);
    let handle = alpha.material.texture(TextureProperty::AlphaMap).unwrap();
    assert_eq!(
        assets.registry().sampler(handle),
        Some(SamplerSettings::repeating(8.0, 8.0))
    );

    let toon = DemoScene::build(DemoKind::Gradient, &assets).unwrap();
    assert_eq!(toon.material.shading(), ShadingModel::Toon);
    assert!(matches!(toon.mesh_kind(), Some(MeshKind::TorusKnot { .. })));
    let three = toon.material.texture(TextureProperty::GradientMap).unwrap();
    assert_eq!(assets.registry().sampler(three), Some(SamplerSettings::nearest()));
}
