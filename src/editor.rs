//! The layout editor — a second native window hosting an editable surface.
//!
//! The editor loads its own copy of a layout (no state is shared with the
//! tracker window, even for the same file). Property edits committed from
//! the dialogs mutate the in-memory document and mark it dirty; Save
//! serializes the current descriptors back to disk.

use eframe::egui;
use std::path::PathBuf;

use crate::components::dialogs::{DialogResult, ElementPropsDialog, MessagePopup};
use crate::components::element::ElementAction;
use crate::components::surface::EditorSurface;
use crate::{io, layout, log_err, log_info};

pub struct EditorWindow {
    pub open: bool,
    surface: EditorSurface,
    layout_path: Option<PathBuf>,
    dirty: bool,
    /// At most one properties dialog at a time.
    props_dialog: Option<ElementPropsDialog>,
    error_popup: Option<MessagePopup>,
}

impl EditorWindow {
    pub fn new() -> Self {
        Self {
            open: false,
            surface: EditorSurface::new(),
            layout_path: None,
            dirty: false,
            props_dialog: None,
            error_popup: None,
        }
    }

    /// Window title with the loaded file name and a `*` dirty marker.
    fn display_title(&self) -> String {
        let name = self
            .layout_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string());
        match name {
            Some(name) if self.dirty => format!("Spirit Editor - {}*", name),
            Some(name) => format!("Spirit Editor - {}", name),
            None => "Spirit Editor".to_string(),
        }
    }

    fn open_layout_from(&mut self, path: PathBuf) {
        match self.surface.open(&path) {
            Ok(count) => {
                log_info!("Editor loaded {} elements from {}", count, path.display());
                self.layout_path = Some(path);
                self.dirty = false;
                self.props_dialog = None;
            }
            Err(e) => {
                log_err!("Editor failed to load {}: {}", path.display(), e);
                self.error_popup = Some(MessagePopup::new("Load Failed", e.to_string()));
            }
        }
    }

    fn choose_layout(&mut self) {
        if let Some(path) = io::pick_layout_path() {
            self.open_layout_from(path);
        }
    }

    fn save_to(&mut self, path: PathBuf) {
        match layout::save_layout(&path, &self.surface.descriptors()) {
            Ok(()) => {
                log_info!("Saved layout to {}", path.display());
                self.layout_path = Some(path);
                self.dirty = false;
            }
            Err(e) => {
                log_err!("Failed to save {}: {}", path.display(), e);
                self.error_popup = Some(MessagePopup::new("Save Failed", e.to_string()));
            }
        }
    }

    /// Show the editor as its own native window. Immediate viewport: runs
    /// synchronously within the parent's frame.
    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }

        let builder = egui::ViewportBuilder::default()
            .with_title(self.display_title())
            .with_inner_size([800.0, 620.0]);

        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("layout_editor"),
            builder,
            |ctx, _class| {
                let dialog_open = self.props_dialog.is_some() || self.error_popup.is_some();

                // F4 chooses a layout, unless a dialog is eating input
                if !dialog_open
                    && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::F4))
                {
                    self.choose_layout();
                }

                egui::TopBottomPanel::top("editor_menu_bar").show(ctx, |ui| {
                    egui::menu::bar(ui, |ui| {
                        ui.menu_button("File", |ui| {
                            if ui
                                .add(egui::Button::new("Open Layout").shortcut_text("F4"))
                                .clicked()
                            {
                                self.choose_layout();
                                ui.close_menu();
                            }
                            ui.separator();
                            let has_path = self.layout_path.is_some();
                            if ui
                                .add_enabled(has_path, egui::Button::new("Save Layout"))
                                .clicked()
                            {
                                if let Some(path) = self.layout_path.clone() {
                                    self.save_to(path);
                                }
                                ui.close_menu();
                            }
                            if ui.button("Save Layout As…").clicked() {
                                if let Some(path) = io::save_layout_path() {
                                    self.save_to(path);
                                }
                                ui.close_menu();
                            }
                        });
                    });
                });

                egui::CentralPanel::default().show(ctx, |ui| {
                    let action = self.surface.ui(ui);
                    if !dialog_open
                        && let Some((index, ElementAction::OpenProperties)) = action
                        && let Some(element) = self.surface.element(index)
                    {
                        self.props_dialog =
                            Some(ElementPropsDialog::new(index, element.state.descriptor()));
                    }
                });

                // -- Properties dialog routing --------------------------------
                let mut dialog_result = None;
                if let Some(dialog) = &mut self.props_dialog {
                    let index = dialog.element_index();
                    let (base_dir, textures) = self.surface.dialog_context();
                    dialog_result = Some((index, dialog.show(ctx, base_dir, textures)));
                }
                if let Some((index, result)) = dialog_result {
                    match result {
                        DialogResult::Ok(descriptor) => {
                            self.surface.apply_to_element(index, descriptor);
                            self.dirty = true;
                            self.props_dialog = None;
                        }
                        DialogResult::Apply(descriptor) => {
                            self.surface.apply_to_element(index, descriptor);
                            self.dirty = true;
                        }
                        DialogResult::Cancel => self.props_dialog = None,
                        DialogResult::Open => {}
                    }
                }

                // -- Error popup ----------------------------------------------
                let dismiss = self.error_popup.as_ref().is_some_and(|p| p.show(ctx));
                if dismiss {
                    self.error_popup = None;
                }

                if ctx.input(|i| i.viewport().close_requested()) {
                    self.open = false;
                }
            },
        );
    }
}
