//! Preview window standing in for the host page
//!
//! The central panel plays the document root: it shows the installed filter
//! markup and marker attributes. The Options button opens a host-style
//! dialog whose theme selector is the anchor the filter controls bind after.

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{debug, info};

use super::components::options_panel;
use super::constants::*;
use super::observer::DialogObserver;
use crate::config::Configuration;
use crate::constants::host::{BIND_DELAY_MS, OPTIONS_DIALOG_TITLE};
use crate::controller::{AttachOutcome, DialogId, HostDialog, ReconciliationController};
use crate::persistence::FileStore;
use crate::target::DocumentRoot;

const THEMES: [&str; 3] = ["Auto", "Light", "Dark"];

/// Host-owned dialog state
struct OpenDialog {
    id: DialogId,
    theme: &'static str,
    /// Frames drawn so far; the theme selector exists after the first one
    frames: u32,
}

struct PreviewApp {
    controller: ReconciliationController<FileStore, DocumentRoot>,
    observer: DialogObserver,
    dialog: Option<OpenDialog>,
    next_dialog_id: DialogId,
}

impl PreviewApp {
    fn new(_cc: &CreationContext<'_>, store: FileStore) -> Self {
        info!(path = ?store.path(), "Initializing filter preview");
        Self {
            controller: ReconciliationController::start(store, DocumentRoot::new()),
            observer: DialogObserver::new(),
            dialog: None,
            next_dialog_id: 1,
        }
    }

    fn open_dialog(&mut self) {
        if self.dialog.is_some() {
            return;
        }
        let id = self.next_dialog_id;
        self.next_dialog_id += 1;
        debug!(dialog = id, "Opening options dialog");
        self.dialog = Some(OpenDialog {
            id,
            theme: THEMES[0],
            frames: 0,
        });
    }

    fn presence(&self) -> Option<HostDialog> {
        self.dialog.as_ref().map(|dialog| HostDialog {
            id: dialog.id,
            has_theme_anchor: dialog.frames > 0,
        })
    }

    fn page_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("File Browser");
        ui.add_space(SECTION_SPACING);

        ui.horizontal(|ui| {
            if ui.button("⚙ Options").clicked() {
                self.open_dialog();
            }
            if ui.button("Reset filter").clicked() {
                self.controller.apply(Configuration::default(), true);
            }
        });

        ui.add_space(SECTION_SPACING);

        let root = self.controller.target();
        ui.group(|ui| {
            ui.label(egui::RichText::new("Document root").strong());
            ui.add_space(ITEM_SPACING);
            let attributes = root.attribute_list();
            if attributes.is_empty() {
                ui.weak("(no filter attributes)");
            }
            for attribute in attributes {
                ui.monospace(attribute);
            }
        });

        ui.add_space(SECTION_SPACING);

        ui.group(|ui| {
            ui.label(egui::RichText::new("Installed filter").strong());
            ui.add_space(ITEM_SPACING);
            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut markup = root.svg_container();
                ui.add(
                    egui::TextEdit::multiline(&mut markup)
                        .code_editor()
                        .interactive(false)
                        .desired_width(f32::INFINITY),
                );
            });
        });
    }

    fn dialog_ui(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };

        let mut open = true;
        let mut events = Vec::new();
        let controller = &mut self.controller;

        egui::Window::new(OPTIONS_DIALOG_TITLE)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(DIALOG_WIDTH)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Theme:");
                    egui::ComboBox::from_id_salt("option-theme")
                        .selected_text(dialog.theme)
                        .show_ui(ui, |ui| {
                            for theme in THEMES {
                                ui.selectable_value(&mut dialog.theme, theme, theme);
                            }
                        });
                });
                ui.add_space(ITEM_SPACING);

                if let Some(controls) = controller.controls_mut() {
                    events = options_panel::ui(ui, controls);
                }
            });

        dialog.frames = dialog.frames.saturating_add(1);

        for event in events {
            self.controller.handle(event);
        }
        if !open {
            debug!("Options dialog closed");
            self.dialog = None;
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let presence = self.presence();
        if let Some(AttachOutcome::Attached) =
            self.observer.observe(presence, &mut self.controller, now)
        {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| self.page_ui(ui));
        self.dialog_ui(ctx);

        let wait = self
            .observer
            .pending(now)
            .unwrap_or(Duration::from_millis(BIND_DELAY_MS));
        ctx.request_repaint_after(wait);
    }
}

pub fn run_preview(store: FileStore) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("HFS Orange Filter Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "HFS Orange Filter Preview",
        options,
        Box::new(|cc| Ok(Box::new(PreviewApp::new(cc, store)))),
    )
    .map_err(|err| anyhow!("Failed to launch filter preview: {err}"))
}
