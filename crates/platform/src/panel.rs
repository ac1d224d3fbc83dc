//! Control panel widgets. Widgets only report changes; the caller applies
//! them to the material so that rejected changes leave everything untouched.

use demos::{Axis, Control, ControlChange, ControlPanel};

/// Draw one widget per control and collect what the user changed this frame.
pub fn controls_ui(ui: &mut egui::Ui, panel: &ControlPanel) -> Vec<ControlChange> {
    let mut changes = Vec::new();
    for entry in panel.entries() {
        let name = entry.name.as_str();
        match &entry.control {
            Control::TextureChoice { swap, selected } => {
                let mut choice = selected.clone();
                egui::ComboBox::from_label(name)
                    .selected_text(choice.as_str())
                    .show_ui(ui, |ui| {
                        for label in swap.slot().labels() {
                            ui.selectable_value(&mut choice, label.to_owned(), label);
                        }
                    });
                if &choice != selected {
                    changes.push(ControlChange::Texture {
                        name: name.to_owned(),
                        label: choice,
                    });
                }
            }
            Control::Scalar { range, value, .. } => {
                let mut v = *value;
                if ui
                    .add(egui::Slider::new(&mut v, range.clone()).text(name))
                    .changed()
                {
                    changes.push(ControlChange::Scalar {
                        name: name.to_owned(),
                        value: v,
                    });
                }
            }
            Control::NormalScale { x, y, range } => {
                for (axis, current, suffix) in [(Axis::X, *x, "x"), (Axis::Y, *y, "y")] {
                    let mut v = current;
                    let label = format!("{name}.{suffix}");
                    if ui
                        .add(egui::Slider::new(&mut v, range.clone()).text(label))
                        .changed()
                    {
                        changes.push(ControlChange::Axis {
                            name: name.to_owned(),
                            axis,
                            value: v,
                        });
                    }
                }
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use corelib::{Material, ScalarProperty, TextureHandle, TextureProperty, TextureSlot, TextureSwap};

    use super::*;

    #[test]
    fn idle_frame_reports_no_changes() {
        let material = Material::new("m").with_texture(TextureProperty::Map, Some(TextureHandle(1)));
        let slot = TextureSlot::with_none()
            .with("blocks", Some(TextureHandle(1)))
            .unwrap();
        let mut panel = ControlPanel::new();
        panel
            .add_texture_choice("map", TextureSwap::new(TextureProperty::Map, slot), &material)
            .unwrap();
        panel
            .add_scalar("bumpScale", ScalarProperty::BumpScale, -3.0..=3.0, &material)
            .unwrap();
        panel
            .add_normal_scale("normalScale", -3.0..=3.0, &material)
            .unwrap();

        let ctx = egui::Context::default();
        let mut changes = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                changes = controls_ui(ui, &panel);
            });
        });
        assert!(changes.is_empty(), "{changes:?}");
    }
}
