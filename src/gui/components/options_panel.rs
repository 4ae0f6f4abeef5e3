//! Filter option controls inserted into the host options dialog

use eframe::egui;

use crate::controller::{ControlEvent, ControlSet};
use crate::gui::constants::{COMBO_WIDTH, ITEM_SPACING};
use crate::tables::{ColorTone, OverlayEffect, QuantizationLevel, Scope};

/// Renders the four option controls and returns the change events raised
/// this frame. Level and effect are grayed out while their control is
/// disabled but keep showing their value.
pub fn ui(ui: &mut egui::Ui, controls: &mut ControlSet) -> Vec<ControlEvent> {
    let mut events = Vec::new();

    ui.group(|ui| {
        ui.label(egui::RichText::new("Display Filter").strong());
        ui.add_space(ITEM_SPACING);

        let mut scope = controls.scope.value();
        if combo(ui, "Filter Scope:", "orange_filter_scope", &mut scope, &Scope::ALL, Scope::label)
            && controls.scope.select(scope)
        {
            events.push(ControlEvent::Scope(scope));
        }

        let mut color = controls.color.value();
        ui.add_enabled_ui(controls.color.is_enabled(), |ui| {
            if combo(ui, "Color Tone:", "orange_filter_color", &mut color, &ColorTone::ALL, ColorTone::label)
                && controls.color.select(color)
            {
                events.push(ControlEvent::Color(color));
            }
        });

        let mut level = controls.level.value();
        ui.add_enabled_ui(controls.level.is_enabled(), |ui| {
            if combo(
                ui,
                "Color Levels:",
                "orange_filter_level",
                &mut level,
                &QuantizationLevel::SELECTABLE,
                QuantizationLevel::label,
            ) && controls.level.select(level)
            {
                events.push(ControlEvent::Level(level));
            }
        });

        let mut effect = controls.effect.value();
        ui.add_enabled_ui(controls.effect.is_enabled(), |ui| {
            if combo(
                ui,
                "Overlay Effects:",
                "orange_filter_effect",
                &mut effect,
                &OverlayEffect::ALL,
                OverlayEffect::label,
            ) && controls.effect.select(effect)
            {
                events.push(ControlEvent::Effect(effect));
            }
        });

        if !controls.level.is_enabled() {
            ui.weak("Filter is off; levels and effects are kept for when it is turned back on.");
        }
    });

    events
}

fn combo<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    label: &str,
    id_salt: &str,
    value: &mut T,
    options: &[T],
    text: fn(T) -> &'static str,
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id_salt)
            .selected_text(text(*value))
            .width(COMBO_WIDTH)
            .show_ui(ui, |ui| {
                for option in options {
                    if ui.selectable_value(value, *option, text(*option)).changed() {
                        changed = true;
                    }
                }
            });
    });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::controller::{HostDialog, ReconciliationController};
    use crate::persistence::MemoryStore;
    use crate::target::DocumentRoot;

    #[test]
    fn test_render_without_input_raises_no_events() {
        let mut controller =
            ReconciliationController::start(MemoryStore::new(), DocumentRoot::new());
        controller.attach(&HostDialog {
            id: 1,
            has_theme_anchor: true,
        });
        let before = controller.controls().cloned();

        let ctx = egui::Context::default();
        let mut events = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |panel| {
                if let Some(controls) = controller.controls_mut() {
                    events = super::ui(panel, controls);
                }
            });
        });

        assert!(events.is_empty());
        assert_eq!(controller.controls().cloned(), before);
        assert_eq!(*controller.current(), Configuration::default());
    }
}
