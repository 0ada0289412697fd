//! Editor dialogs: element properties, single-image editing, and the shared
//! message popup used for load/save errors.
//!
//! Dialogs stage their edits locally; the live element and the in-memory
//! document change only when the properties dialog commits via OK or Apply.

use egui::{Align2, Key, Modifiers, RichText};
use std::path::Path;

use crate::io::{self, TextureCache};
use crate::layout::{ElementDescriptor, ImageEntry};

/// Result returned by each dialog's `show()` method every frame.
pub enum DialogResult<T> {
    /// Dialog is still open, nothing to do this frame.
    Open,
    /// User clicked Apply — commit the values, keep the dialog open.
    Apply(T),
    /// User confirmed — commit the values and close.
    Ok(T),
    /// User cancelled; discard everything staged.
    Cancel,
}

// ============================================================================
// MESSAGE POPUP
// ============================================================================

/// Modal message box for errors that must not crash the window (failed
/// loads, failed saves). Returns true when dismissed.
pub struct MessagePopup {
    title: String,
    text: String,
}

impl MessagePopup {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut dismissed = ctx.input_mut(|i| {
            i.consume_key(Modifiers::NONE, Key::Enter) || i.consume_key(Modifiers::NONE, Key::Escape)
        });

        egui::Window::new(&self.title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.label(&self.text);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        dismissed
    }
}

// ============================================================================
// IMAGE EDIT DIALOG
// ============================================================================

/// Edits one (name, file) pair with a live preview. Confirming writes back
/// into the owning table row only — never directly into the element.
pub struct ImageEditDialog {
    /// Table row being edited; `None` appends a new entry on confirm.
    row: Option<usize>,
    name: String,
    file: String,
}

impl ImageEditDialog {
    pub fn add_new() -> Self {
        Self {
            row: None,
            name: String::new(),
            file: String::new(),
        }
    }

    pub fn edit_row(row: usize, entry: &ImageEntry) -> Self {
        Self {
            row: Some(row),
            name: entry.name().to_string(),
            file: entry.file().to_string(),
        }
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    fn entry(&self) -> ImageEntry {
        ImageEntry::new(self.name.trim(), self.file.trim())
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        base_dir: &Path,
        textures: &mut TextureCache,
    ) -> DialogResult<ImageEntry> {
        let mut result = DialogResult::Open;

        // Keyboard: Enter = confirm, Esc = cancel
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Enter)) {
            result = DialogResult::Ok(self.entry());
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape)) {
            result = DialogResult::Cancel;
        }

        let title = if self.row.is_some() {
            "Edit Image"
        } else {
            "Add Image"
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [48.0, 48.0])
            .show(ctx, |ui| {
                ui.set_min_width(280.0);

                egui::Grid::new("image_edit_fields")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Name");
                        ui.text_edit_singleline(&mut self.name);
                        ui.end_row();

                        ui.label("Image File");
                        ui.horizontal(|ui| {
                            ui.text_edit_singleline(&mut self.file);
                            if ui.button("Choose File…").clicked()
                                && let Some(path) = io::pick_image_path()
                            {
                                self.file = io::relativize_image_path(&path, base_dir);
                            }
                        });
                        ui.end_row();
                    });

                // Live preview of the resolved path
                ui.add_space(6.0);
                if self.file.trim().is_empty() {
                    ui.weak("No image selected");
                } else if let Some(tex) = textures.get_or_load(ui.ctx(), base_dir, self.file.trim())
                {
                    ui.add(egui::Image::new(&tex).max_size(egui::vec2(160.0, 160.0)));
                } else {
                    ui.colored_label(ui.visuals().warn_fg_color, "Preview unavailable");
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Fine").clicked() {
                        result = DialogResult::Ok(self.entry());
                    }
                    if ui.button("Dammit").clicked() {
                        result = DialogResult::Cancel;
                    }
                });
            });
        result
    }
}

// ============================================================================
// ELEMENT PROPERTIES DIALOG
// ============================================================================

/// Form + table view over one element's descriptor. Everything is staged:
/// the element is only touched when the caller receives `Ok` or `Apply`.
pub struct ElementPropsDialog {
    element_index: usize,
    name: String,
    x: String,
    y: String,
    layer: String,
    images: Vec<ImageEntry>,
    selected_row: Option<usize>,
    field_error: Option<String>,
    image_edit: Option<ImageEditDialog>,
}

impl ElementPropsDialog {
    pub fn new(element_index: usize, descriptor: &ElementDescriptor) -> Self {
        Self {
            element_index,
            name: descriptor.name.clone(),
            x: descriptor.coords.0.to_string(),
            y: descriptor.coords.1.to_string(),
            layer: descriptor.layer.to_string(),
            images: descriptor.images.clone(),
            selected_row: None,
            field_error: None,
            image_edit: None,
        }
    }

    pub fn element_index(&self) -> usize {
        self.element_index
    }

    /// Build the descriptor from the staged fields. Numeric fields must
    /// parse as integers; otherwise the commit is blocked and a message is
    /// shown in the dialog.
    fn staged_descriptor(&mut self) -> Option<ElementDescriptor> {
        let parsed = (
            self.x.trim().parse::<i32>(),
            self.y.trim().parse::<i32>(),
            self.layer.trim().parse::<i32>(),
        );
        let (Ok(x), Ok(y), Ok(layer)) = parsed else {
            self.field_error = Some("X, Y and Layer must be whole numbers".to_string());
            return None;
        };
        self.field_error = None;
        Some(ElementDescriptor {
            name: self.name.trim().to_string(),
            images: self.images.clone(),
            coords: (x, y),
            layer,
        })
    }

    /// Route a confirmed image edit into the staged table.
    fn commit_image_edit(&mut self, row: Option<usize>, entry: ImageEntry) {
        match row {
            Some(row) if row < self.images.len() => self.images[row] = entry,
            _ => self.images.push(entry),
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        base_dir: &Path,
        textures: &mut TextureCache,
    ) -> DialogResult<ElementDescriptor> {
        // Sub-dialog first, so it eats Enter/Esc before the main window.
        if let Some(image_edit) = &mut self.image_edit {
            match image_edit.show(ctx, base_dir, textures) {
                DialogResult::Ok(entry) => {
                    let row = image_edit.row();
                    self.commit_image_edit(row, entry);
                    self.image_edit = None;
                }
                DialogResult::Cancel => self.image_edit = None,
                _ => {}
            }
        }
        let sub_open = self.image_edit.is_some();

        let mut result = DialogResult::Open;
        if !sub_open {
            if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Enter))
                && let Some(descriptor) = self.staged_descriptor()
            {
                result = DialogResult::Ok(descriptor);
            }
            if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape)) {
                result = DialogResult::Cancel;
            }
        }

        egui::Window::new("Element Properties")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(340.0);
                ui.add_enabled_ui(!sub_open, |ui| {
                    // -- Name / position / layer fields --------------------
                    ui.horizontal(|ui| {
                        ui.label("Element name");
                        ui.text_edit_singleline(&mut self.name);
                    });
                    ui.horizontal(|ui| {
                        ui.label("X");
                        ui.add(egui::TextEdit::singleline(&mut self.x).desired_width(48.0));
                        ui.label("Y");
                        ui.add(egui::TextEdit::singleline(&mut self.y).desired_width(48.0));
                        ui.label("Layer");
                        ui.add(egui::TextEdit::singleline(&mut self.layer).desired_width(48.0));
                    });

                    // -- Image table ----------------------------------------
                    ui.add_space(6.0);
                    egui::ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                        egui::Grid::new("image_table")
                            .num_columns(2)
                            .striped(true)
                            .min_col_width(120.0)
                            .show(ui, |ui| {
                                ui.label(RichText::new("Name").strong());
                                ui.label(RichText::new("Image File").strong());
                                ui.end_row();
                                for (row, entry) in self.images.iter().enumerate() {
                                    let selected = self.selected_row == Some(row);
                                    if ui.selectable_label(selected, entry.name()).clicked() {
                                        self.selected_row = Some(row);
                                    }
                                    if ui.selectable_label(selected, entry.file()).clicked() {
                                        self.selected_row = Some(row);
                                    }
                                    ui.end_row();
                                }
                            });
                    });

                    // -- Row operations --------------------------------------
                    ui.horizontal(|ui| {
                        if ui.button("Add").clicked() {
                            self.image_edit = Some(ImageEditDialog::add_new());
                        }
                        let has_selection = self.selected_row.is_some();
                        if ui
                            .add_enabled(has_selection, egui::Button::new("Edit Selected"))
                            .clicked()
                            && let Some(row) = self.selected_row
                        {
                            self.image_edit = Some(ImageEditDialog::edit_row(row, &self.images[row]));
                        }
                        // An element must keep at least one image
                        let can_delete = has_selection && self.images.len() > 1;
                        if ui
                            .add_enabled(can_delete, egui::Button::new("Delete Selected"))
                            .clicked()
                            && let Some(row) = self.selected_row
                        {
                            self.images.remove(row);
                            self.selected_row = None;
                        }
                    });

                    if let Some(error) = &self.field_error {
                        ui.colored_label(ui.visuals().error_fg_color, error);
                    }

                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked()
                            && let Some(descriptor) = self.staged_descriptor()
                        {
                            result = DialogResult::Ok(descriptor);
                        }
                        if ui.button("Cancel").clicked() {
                            result = DialogResult::Cancel;
                        }
                        if ui.button("Apply").clicked()
                            && let Some(descriptor) = self.staged_descriptor()
                        {
                            result = DialogResult::Apply(descriptor);
                        }
                    });
                });
            });
        result
    }
}

// ============================================================================
// TESTS
// ============================================================================
