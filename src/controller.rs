//! Reconciliation between the live configuration, storage, the rendering
//! target and the bound option controls
//!
//! The controller owns the authoritative `Configuration` for the session.
//! Every mutation goes through [`ReconciliationController::apply`], which
//! installs the synthesized filter, rewrites the root markers and persists
//! the record. Controls are mirrors: they display `current` and feed change
//! events back in.

use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::constants::markers;
use crate::filter;
use crate::persistence::ConfigStore;
use crate::target::RenderTarget;
use crate::tables::{ColorTone, OverlayEffect, QuantizationLevel, Scope};

/// Identity of one host options dialog instance
pub type DialogId = u64;

/// Presence signal for the host options dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostDialog {
    pub id: DialogId,
    /// Whether the theme selector the controls are inserted after exists yet
    pub has_theme_anchor: bool,
}

/// A selectable-value widget mirrored by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control<T> {
    value: T,
    enabled: bool,
}

impl<T: Copy + PartialEq> Control<T> {
    fn new(value: T, enabled: bool) -> Self {
        Self { value, enabled }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// User picks a value; a disabled widget keeps its value.
    /// Returns true when the displayed value changed.
    pub fn select(&mut self, value: T) -> bool {
        if !self.enabled || self.value == value {
            return false;
        }
        self.value = value;
        true
    }
}

/// The four option controls inserted into one host dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSet {
    dialog: DialogId,
    pub scope: Control<Scope>,
    pub color: Control<ColorTone>,
    pub level: Control<QuantizationLevel>,
    pub effect: Control<OverlayEffect>,
}

impl ControlSet {
    fn reflecting(dialog: DialogId, config: &Configuration) -> Self {
        let gated = config.is_active();
        Self {
            dialog,
            scope: Control::new(config.scope, true),
            color: Control::new(config.color, true),
            level: Control::new(config.level, gated),
            effect: Control::new(config.effect, gated),
        }
    }

    pub fn dialog(&self) -> DialogId {
        self.dialog
    }

    fn show(&mut self, config: &Configuration) {
        self.scope.value = config.scope;
        self.color.value = config.color;
        self.level.value = config.level;
        self.effect.value = config.effect;
        self.set_gated_enabled(config.is_active());
    }

    fn set_gated_enabled(&mut self, enabled: bool) {
        self.level.enabled = enabled;
        self.effect.enabled = enabled;
    }
}

/// Change event raised by one of the option controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Scope(Scope),
    Color(ColorTone),
    Level(QuantizationLevel),
    Effect(OverlayEffect),
}

/// Host element that was missing when binding was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingHostElement {
    ThemeAnchor,
}

/// Result of a bind attempt on a dialog presence signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached,
    AlreadyAttached,
    /// Retry on the next presence signal
    Deferred(MissingHostElement),
}

pub struct ReconciliationController<S: ConfigStore, T: RenderTarget> {
    current: Configuration,
    store: S,
    target: T,
    controls: Option<ControlSet>,
}

impl<S: ConfigStore, T: RenderTarget> ReconciliationController<S, T> {
    /// Load the stored configuration and install it on the target
    pub fn start(store: S, target: T) -> Self {
        let current = store.load();
        info!(config = ?current, "Starting filter controller");
        let mut controller = Self {
            current,
            store,
            target,
            controls: None,
        };
        controller.apply(current, false);
        controller
    }

    pub fn current(&self) -> &Configuration {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn controls(&self) -> Option<&ControlSet> {
        self.controls.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut ControlSet> {
        self.controls.as_mut()
    }

    /// Make `config` current, install it, persist it and optionally push it
    /// into the bound controls
    pub fn apply(&mut self, mut config: Configuration, reflect: bool) {
        if config.is_active() && config.level.is_off() {
            warn!(scope = config.scope.value(), "Filter scope is on with level 0, using level 4");
            config.level = QuantizationLevel::Four;
        }
        self.current = config;

        if config.is_active() {
            let pipeline = filter::build(config.level, config.effect, config.color);
            self.target.install_filter(&pipeline.to_markup());
            self.target.set_attribute(markers::FILTER_ENABLED, markers::TRUE);
            self.target.set_attribute(markers::COLOR_TONE, config.color.key());
            self.target
                .set_attribute(markers::SCOPE, &config.scope.value().to_string());
            for marker in markers::EFFECTS {
                self.target.remove_attribute(marker);
            }
            if let Some(marker) = config.effect.marker() {
                self.target.set_attribute(marker, markers::TRUE);
            }
        } else {
            self.target.clear_filter();
            self.target.remove_attribute(markers::FILTER_ENABLED);
            self.target.remove_attribute(markers::COLOR_TONE);
            self.target.remove_attribute(markers::SCOPE);
            for marker in markers::EFFECTS {
                self.target.remove_attribute(marker);
            }
        }

        self.store.save(&config);

        if reflect {
            if let Some(controls) = self.controls.as_mut() {
                controls.show(&config);
            }
        }

        debug!(config = ?config, reflect, "Applied filter config");
    }

    /// Dispatch a control change event
    pub fn handle(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Scope(scope) => self.on_scope_changed(scope),
            ControlEvent::Color(color) => self.on_color_changed(color),
            ControlEvent::Level(level) => self.on_level_changed(level),
            ControlEvent::Effect(effect) => self.on_effect_changed(effect),
        }
    }

    pub fn on_scope_changed(&mut self, scope: Scope) {
        let previous = self.current.scope;
        self.current.scope = scope;

        if let Some(controls) = self.controls.as_mut() {
            controls.scope.value = scope;
        }

        if scope.is_off() {
            // Level and effect are kept; their controls stay showing them, grayed out
            if let Some(controls) = self.controls.as_mut() {
                controls.set_gated_enabled(false);
            }
        } else {
            if self.current.level.is_off() {
                info!(scope = scope.value(), "Recovering level 4 for enabled scope");
                self.current.level = QuantizationLevel::Four;
                if let Some(controls) = self.controls.as_mut() {
                    controls.level.value = self.current.level;
                }
            }
            if let Some(controls) = self.controls.as_mut() {
                controls.set_gated_enabled(true);
            }
        }

        info!(from = previous.value(), to = scope.value(), "Filter scope changed");
        self.apply(self.current, false);
    }

    pub fn on_level_changed(&mut self, level: QuantizationLevel) {
        if !self.level_enabled() {
            debug!(level = level.value(), "Ignoring level change from disabled control");
            return;
        }
        if level.is_off() {
            warn!("Ignoring level 0 from control; use the scope control to turn the filter off");
            return;
        }
        self.current.level = level;
        self.apply(self.current, false);
    }

    pub fn on_effect_changed(&mut self, effect: OverlayEffect) {
        if !self.effect_enabled() {
            debug!(effect = effect.value(), "Ignoring effect change from disabled control");
            return;
        }
        self.current.effect = effect;
        self.apply(self.current, false);
    }

    pub fn on_color_changed(&mut self, color: ColorTone) {
        if let Some(controls) = &self.controls {
            if !controls.color.is_enabled() {
                debug!(color = %color, "Ignoring color change from disabled control");
                return;
            }
        }
        self.current.color = color;
        self.apply(self.current, false);
    }

    /// Bind controls to a newly observed host dialog.
    /// Controls reflect `current`, not storage, so edits made earlier in the
    /// session survive reopening the dialog.
    pub fn attach(&mut self, dialog: &HostDialog) -> AttachOutcome {
        if let Some(controls) = &self.controls {
            if controls.dialog == dialog.id {
                return AttachOutcome::AlreadyAttached;
            }
        }
        if !dialog.has_theme_anchor {
            debug!(dialog = dialog.id, "Theme anchor not present yet, deferring bind");
            return AttachOutcome::Deferred(MissingHostElement::ThemeAnchor);
        }

        self.controls = Some(ControlSet::reflecting(dialog.id, &self.current));
        info!(dialog = dialog.id, "Attached filter controls to options dialog");
        AttachOutcome::Attached
    }

    /// Drop controls of a dialog that went away
    pub fn detach(&mut self) {
        if let Some(controls) = self.controls.take() {
            debug!(dialog = controls.dialog, "Detached filter controls");
        }
    }

    // Without bound controls the gate follows the live scope
    fn level_enabled(&self) -> bool {
        match &self.controls {
            Some(controls) => controls.level.is_enabled(),
            None => self.current.is_active(),
        }
    }

    fn effect_enabled(&self) -> bool {
        match &self.controls {
            Some(controls) => controls.effect.is_enabled(),
            None => self.current.is_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::target::DocumentRoot;

    type TestController = ReconciliationController<MemoryStore, DocumentRoot>;

    const DIALOG: HostDialog = HostDialog {
        id: 1,
        has_theme_anchor: true,
    };

    fn controller_with(config: Configuration) -> TestController {
        let store = MemoryStore::with_record(config.encode().unwrap());
        ReconciliationController::start(store, DocumentRoot::new())
    }

    fn config(level: QuantizationLevel, effect: OverlayEffect, color: ColorTone, scope: Scope) -> Configuration {
        Configuration {
            level,
            effect,
            color,
            scope,
        }
    }

    #[test]
    fn test_start_installs_stored_config() {
        let c = controller_with(config(
            QuantizationLevel::Eight,
            OverlayEffect::Scanlines,
            ColorTone::PureRed,
            Scope::InterfaceAndImages,
        ));
        let root = c.target();
        assert!(!root.filter_markup().is_empty());
        assert_eq!(root.attribute(markers::FILTER_ENABLED), Some("true"));
        assert_eq!(root.attribute(markers::COLOR_TONE), Some("pure-red"));
        assert_eq!(root.attribute(markers::SCOPE), Some("2"));
        assert_eq!(root.attribute(markers::SCANLINES), Some("true"));
    }

    #[test]
    fn test_start_with_empty_store_uses_default() {
        let c = ReconciliationController::start(MemoryStore::new(), DocumentRoot::new());
        assert_eq!(*c.current(), Configuration::default());
        assert_eq!(c.target().attribute(markers::SCOPE), Some("1"));
        // Startup apply persists the default
        assert_eq!(
            c.store().contents().as_deref(),
            Some(r#"{"level":4,"effect":0,"color":"orange","scope":1}"#)
        );
    }

    #[test]
    fn test_apply_scope_off_clears_target_but_keeps_fields() {
        let mut c = controller_with(Configuration::default());
        let off = config(
            QuantizationLevel::Twelve,
            OverlayEffect::DotGrid,
            ColorTone::BlueGreen,
            Scope::Off,
        );
        c.apply(off, false);

        assert_eq!(c.target().filter_markup(), "");
        assert!(c.target().attributes().is_empty());
        assert_eq!(*c.current(), off);
        assert_eq!(c.store().load(), off);
    }

    #[test]
    fn test_apply_sets_exactly_one_effect_marker() {
        let mut c = controller_with(Configuration::default());
        for effect in OverlayEffect::ALL {
            c.apply(
                config(QuantizationLevel::Four, effect, ColorTone::Orange, Scope::Interface),
                false,
            );
            let set: Vec<_> = markers::EFFECTS
                .iter()
                .filter(|m| c.target().attribute(m).is_some())
                .collect();
            match effect.marker() {
                Some(marker) => assert_eq!(set, vec![&marker]),
                None => assert!(set.is_empty()),
            }
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut c = controller_with(Configuration::default());
        let target = config(
            QuantizationLevel::Sixteen,
            OverlayEffect::PixelationDiagonal,
            ColorTone::YellowGreen,
            Scope::InterfaceImagesAndVideo,
        );

        c.apply(target, false);
        let first_root = c.target().clone();
        let first_bytes = c.store().contents();

        c.apply(target, false);
        assert_eq!(*c.target(), first_root);
        assert_eq!(c.store().contents(), first_bytes);
    }

    #[test]
    fn test_scope_off_then_on_keeps_level_and_effect() {
        let mut c = controller_with(config(
            QuantizationLevel::Twelve,
            OverlayEffect::DiagonalGrid,
            ColorTone::Orange,
            Scope::Interface,
        ));
        assert_eq!(c.attach(&DIALOG), AttachOutcome::Attached);

        c.on_scope_changed(Scope::Off);
        let controls = c.controls().unwrap();
        assert!(!controls.level.is_enabled());
        assert!(!controls.effect.is_enabled());
        // Grayed-out controls keep showing the retained values
        assert_eq!(controls.level.value(), QuantizationLevel::Twelve);
        assert_eq!(controls.effect.value(), OverlayEffect::DiagonalGrid);
        assert!(c.target().attributes().is_empty());

        c.on_scope_changed(Scope::InterfaceAndImages);
        assert_eq!(c.current().level, QuantizationLevel::Twelve);
        assert_eq!(c.current().effect, OverlayEffect::DiagonalGrid);
        assert_eq!(c.current().scope, Scope::InterfaceAndImages);
        let controls = c.controls().unwrap();
        assert!(controls.level.is_enabled());
        assert!(controls.effect.is_enabled());
        assert_eq!(c.target().attribute(markers::DIAGONAL_GRID), Some("true"));
    }

    #[test]
    fn test_apply_recovers_level_zero_with_active_scope() {
        let mut c = controller_with(Configuration::default());
        c.attach(&DIALOG);

        c.apply(
            config(
                QuantizationLevel::Off,
                OverlayEffect::Scanlines,
                ColorTone::Orange,
                Scope::Interface,
            ),
            true,
        );

        assert_eq!(c.current().level, QuantizationLevel::Four);
        assert!(!c.target().filter_markup().is_empty());
        assert_eq!(c.target().attribute(markers::FILTER_ENABLED), Some("true"));
        assert_eq!(c.target().attribute(markers::SCANLINES), Some("true"));
        assert_eq!(c.controls().unwrap().level.value(), QuantizationLevel::Four);
        assert_eq!(
            c.store().contents().as_deref(),
            Some(r#"{"level":4,"effect":1,"color":"orange","scope":1}"#)
        );
        assert_eq!(c.store().load(), *c.current());
    }

    #[test]
    fn test_scope_event_updates_scope_control() {
        let mut c = controller_with(Configuration::default());
        c.attach(&DIALOG);

        c.handle(ControlEvent::Scope(Scope::Off));
        let controls = c.controls().unwrap();
        assert_eq!(controls.scope.value(), Scope::Off);
        assert!(!controls.level.is_enabled());

        c.handle(ControlEvent::Scope(Scope::InterfaceImagesAndVideo));
        let controls = c.controls().unwrap();
        assert_eq!(controls.scope.value(), Scope::InterfaceImagesAndVideo);
        assert!(controls.level.is_enabled());
    }

    #[test]
    fn test_scope_on_recovers_legacy_level_zero() {
        let store = MemoryStore::with_record(r#"{"level":0,"effect":0,"color":"orange"}"#);
        let mut c = ReconciliationController::start(store, DocumentRoot::new());
        assert_eq!(c.current().scope, Scope::Off);
        c.attach(&DIALOG);

        c.on_scope_changed(Scope::InterfaceAndImages);
        assert_eq!(c.current().level, QuantizationLevel::Four);
        assert_eq!(c.current().effect, OverlayEffect::None);
        assert_eq!(c.controls().unwrap().level.value(), QuantizationLevel::Four);
        assert!(!c.target().filter_markup().is_empty());
        assert_eq!(
            c.store().contents().as_deref(),
            Some(r#"{"level":4,"effect":0,"color":"orange","scope":2}"#)
        );
    }

    #[test]
    fn test_level_and_effect_ignored_while_disabled() {
        let mut c = controller_with(config(
            QuantizationLevel::Eight,
            OverlayEffect::None,
            ColorTone::Orange,
            Scope::Off,
        ));
        c.attach(&DIALOG);
        let before = c.store().contents();

        c.handle(ControlEvent::Level(QuantizationLevel::Sixteen));
        c.handle(ControlEvent::Effect(OverlayEffect::Scanlines));
        assert_eq!(c.current().level, QuantizationLevel::Eight);
        assert_eq!(c.current().effect, OverlayEffect::None);
        assert_eq!(c.store().contents(), before);
    }

    #[test]
    fn test_level_ignored_without_controls_when_scope_off() {
        let mut c = controller_with(config(
            QuantizationLevel::Eight,
            OverlayEffect::None,
            ColorTone::Orange,
            Scope::Off,
        ));
        c.on_level_changed(QuantizationLevel::Four);
        assert_eq!(c.current().level, QuantizationLevel::Eight);
    }

    #[test]
    fn test_color_change_allowed_while_scope_off() {
        let mut c = controller_with(config(
            QuantizationLevel::Eight,
            OverlayEffect::None,
            ColorTone::Orange,
            Scope::Off,
        ));
        c.attach(&DIALOG);
        c.handle(ControlEvent::Color(ColorTone::BlackWhite));
        assert_eq!(c.current().color, ColorTone::BlackWhite);
        assert_eq!(c.current().scope, Scope::Off);
        assert!(c.target().attributes().is_empty());
    }

    #[test]
    fn test_field_changes_never_touch_scope() {
        let mut c = controller_with(config(
            QuantizationLevel::Four,
            OverlayEffect::None,
            ColorTone::Orange,
            Scope::InterfaceImagesAndVideo,
        ));
        c.handle(ControlEvent::Level(QuantizationLevel::Twelve));
        c.handle(ControlEvent::Effect(OverlayEffect::PixelationBlock));
        c.handle(ControlEvent::Color(ColorTone::BlueGreen));
        assert_eq!(
            *c.current(),
            config(
                QuantizationLevel::Twelve,
                OverlayEffect::PixelationBlock,
                ColorTone::BlueGreen,
                Scope::InterfaceImagesAndVideo,
            )
        );
        assert_eq!(c.target().attribute(markers::PIXELATION_BLOCK), Some("true"));
        assert!(c.target().filter_markup().contains("feMorphology"));
    }

    #[test]
    fn test_level_zero_from_control_rejected() {
        let mut c = controller_with(Configuration::default());
        c.handle(ControlEvent::Level(QuantizationLevel::Off));
        assert_eq!(c.current().level, QuantizationLevel::Four);
    }

    #[test]
    fn test_apply_without_reflect_leaves_controls() {
        let mut c = controller_with(Configuration::default());
        c.attach(&DIALOG);
        let shown = c.controls().cloned();

        c.apply(
            config(QuantizationLevel::Eight, OverlayEffect::DotGrid, ColorTone::PureRed, Scope::Interface),
            false,
        );
        assert_eq!(c.controls().cloned(), shown);

        c.apply(
            config(QuantizationLevel::Eight, OverlayEffect::DotGrid, ColorTone::PureRed, Scope::Off),
            true,
        );
        let controls = c.controls().unwrap();
        assert_eq!(controls.level.value(), QuantizationLevel::Eight);
        assert_eq!(controls.effect.value(), OverlayEffect::DotGrid);
        assert_eq!(controls.color.value(), ColorTone::PureRed);
        assert_eq!(controls.scope.value(), Scope::Off);
        assert!(!controls.level.is_enabled());
    }

    #[test]
    fn test_attach_is_idempotent_per_dialog() {
        let mut c = controller_with(Configuration::default());
        assert_eq!(c.attach(&DIALOG), AttachOutcome::Attached);
        c.controls_mut().unwrap().color.select(ColorTone::PureRed);

        // Repeated signal for the same dialog must not rebuild the controls
        assert_eq!(c.attach(&DIALOG), AttachOutcome::AlreadyAttached);
        assert_eq!(c.controls().unwrap().color.value(), ColorTone::PureRed);
    }

    #[test]
    fn test_attach_defers_without_anchor() {
        let mut c = controller_with(Configuration::default());
        let dialog = HostDialog {
            id: 7,
            has_theme_anchor: false,
        };
        assert_eq!(
            c.attach(&dialog),
            AttachOutcome::Deferred(MissingHostElement::ThemeAnchor)
        );
        assert!(c.controls().is_none());

        let ready = HostDialog {
            has_theme_anchor: true,
            ..dialog
        };
        assert_eq!(c.attach(&ready), AttachOutcome::Attached);
    }

    #[test]
    fn test_reattach_reflects_in_session_edits() {
        let mut c = controller_with(Configuration::default());
        c.attach(&DIALOG);
        c.handle(ControlEvent::Effect(OverlayEffect::Scanlines));
        c.handle(ControlEvent::Scope(Scope::Off));
        c.detach();
        assert!(c.controls().is_none());

        let reopened = HostDialog {
            id: 2,
            has_theme_anchor: true,
        };
        assert_eq!(c.attach(&reopened), AttachOutcome::Attached);
        let controls = c.controls().unwrap();
        assert_eq!(controls.dialog(), 2);
        assert_eq!(controls.effect.value(), OverlayEffect::Scanlines);
        assert_eq!(controls.scope.value(), Scope::Off);
        assert!(!controls.effect.is_enabled());
    }

    #[test]
    fn test_disabled_control_select_is_noop() {
        let mut control = Control::new(OverlayEffect::DotGrid, false);
        assert!(!control.select(OverlayEffect::Scanlines));
        assert_eq!(control.value(), OverlayEffect::DotGrid);

        let mut control = Control::new(OverlayEffect::DotGrid, true);
        assert!(!control.select(OverlayEffect::DotGrid));
        assert!(control.select(OverlayEffect::Scanlines));
        assert_eq!(control.value(), OverlayEffect::Scanlines);
    }
}
