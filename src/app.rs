//! The tracker window — menu bar, the trackable surface, and the editor
//! window host.

use eframe::egui;
use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::components::dialogs::MessagePopup;
use crate::components::surface::TrackerSurface;
use crate::editor::EditorWindow;
use crate::{io, log_err, log_info};

pub struct TrackerApp {
    surface: TrackerSurface,
    editor: EditorWindow,
    layout_path: Option<PathBuf>,
    error_popup: Option<MessagePopup>,

    /// Layout passed on the command line, opened on the first frame.
    pending_startup_layout: Option<PathBuf>,
    open_editor_at_startup: bool,
    first_frame: bool,
}

impl TrackerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, args: CliArgs) -> Self {
        Self {
            surface: TrackerSurface::new(),
            editor: EditorWindow::new(),
            layout_path: None,
            error_popup: None,
            pending_startup_layout: args.layout,
            open_editor_at_startup: args.editor,
            first_frame: true,
        }
    }

    fn open_layout_from(&mut self, path: PathBuf) {
        match self.surface.open(&path) {
            Ok(count) => {
                log_info!("Loaded {} elements from {}", count, path.display());
                self.layout_path = Some(path);
            }
            Err(e) => {
                // Failed loads leave the previous elements in place
                log_err!("Failed to load {}: {}", path.display(), e);
                self.error_popup = Some(MessagePopup::new("Load Failed", e.to_string()));
            }
        }
    }

    fn choose_layout(&mut self) {
        if let Some(path) = io::pick_layout_path() {
            self.open_layout_from(path);
        }
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Dynamic window title: "Spirit Tracker - <layout name>" ---
        {
            let title = match self.layout_path.as_ref().and_then(|p| p.file_name()) {
                Some(name) => format!("Spirit Tracker - {}", name.to_string_lossy()),
                None => "Spirit Tracker".to_string(),
            };
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }

        // --- Startup arguments, handled on the very first frame ---
        if self.first_frame {
            self.first_frame = false;
            if let Some(path) = self.pending_startup_layout.take() {
                self.open_layout_from(path);
            }
            if self.open_editor_at_startup {
                self.editor.open = true;
            }
        }

        // --- F3 opens the layout editor ---
        if self.error_popup.is_none()
            && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::F3))
        {
            self.editor.open = true;
        }

        // --- Menu bar ---
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Layout").clicked() {
                        self.choose_layout();
                        ui.close_menu();
                    }
                    if ui
                        .add(egui::Button::new("Layout Editor").shortcut_text("F3"))
                        .clicked()
                    {
                        self.editor.open = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // --- Tracker surface ---
        egui::CentralPanel::default().show(ctx, |ui| {
            self.surface.ui(ui);
        });

        // --- Load-error popup ---
        let dismiss = self.error_popup.as_ref().is_some_and(|p| p.show(ctx));
        if dismiss {
            self.error_popup = None;
        }

        // --- Editor window (separate native viewport) ---
        self.editor.show(ctx);
    }
}
