//! On-screen trackable elements.
//!
//! Each widget is bound to one `ElementDescriptor` and owns the current
//! image index. The tracker variant cycles on left-click and jumps by name
//! from its context menu; the editor variant exposes Cycle / Choose Image /
//! Properties from its context menu instead.

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use std::path::Path;

use crate::io::TextureCache;
use crate::layout::{ElementDescriptor, ImageEntry};

/// Widget size when the current image file cannot be decoded.
const PLACEHOLDER_SIZE: Vec2 = Vec2::splat(48.0);

// ============================================================================
// IMAGE-INDEX STATE MACHINE
// ============================================================================

/// Runtime state of one element: its descriptor plus the current image
/// index. The index is always a valid position in the (non-empty) image
/// list.
pub struct ElementState {
    descriptor: ElementDescriptor,
    image_index: usize,
}

impl ElementState {
    /// Initial state shows the first image in the descriptor.
    pub fn new(descriptor: ElementDescriptor) -> Self {
        Self {
            descriptor,
            image_index: 0,
        }
    }

    pub fn descriptor(&self) -> &ElementDescriptor {
        &self.descriptor
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    pub fn current_image(&self) -> &ImageEntry {
        &self.descriptor.images[self.image_index]
    }

    /// Advance by one, wrapping to the first image after the last.
    pub fn cycle_image(&mut self) {
        self.image_index = (self.image_index + 1) % self.descriptor.images.len();
    }

    /// Jump to the first entry whose name matches. Duplicate names resolve
    /// to the lowest index. Returns false (state unchanged) when no entry
    /// matches.
    pub fn set_image_by_name(&mut self, name: &str) -> bool {
        match self.descriptor.images.iter().position(|e| e.name() == name) {
            Some(idx) => {
                self.image_index = idx;
                true
            }
            None => false,
        }
    }

    /// Replace the descriptor after a committed property edit. The index is
    /// kept when it still points into the new image list, otherwise it
    /// resets to the first image.
    pub fn apply_descriptor(&mut self, descriptor: ElementDescriptor) {
        if self.image_index >= descriptor.images.len() {
            self.image_index = 0;
        }
        self.descriptor = descriptor;
    }
}

// ============================================================================
// SHARED DRAWING
// ============================================================================

fn paint_icon(ui: &egui::Ui, rect: Rect, texture: Option<&egui::TextureHandle>, name: &str) {
    let painter = ui.painter();
    match texture {
        Some(tex) => {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(tex.id(), rect, uv, Color32::WHITE);
        }
        None => {
            // Undecodable image file: named placeholder instead of a crash.
            painter.rect_filled(rect, 2.0, Color32::from_gray(45));
            painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::from_gray(95)));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                name,
                FontId::proportional(10.0),
                Color32::from_gray(200),
            );
        }
    }
}

fn element_rect(
    ui: &egui::Ui,
    state: &ElementState,
    base_dir: &Path,
    textures: &mut TextureCache,
) -> Rect {
    let origin = ui.max_rect().min;
    let (x, y) = state.descriptor().coords;
    let pos = origin + Vec2::new(x as f32, y as f32);
    let size = textures
        .get_or_load(ui.ctx(), base_dir, state.current_image().file())
        .map_or(PLACEHOLDER_SIZE, |t| t.size_vec2());
    Rect::from_min_size(pos, size)
}

// ============================================================================
// TRACKER ELEMENT
// ============================================================================

pub struct TrackerElement {
    pub state: ElementState,
}

impl TrackerElement {
    pub fn new(descriptor: ElementDescriptor) -> Self {
        Self {
            state: ElementState::new(descriptor),
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, index: usize, base_dir: &Path, textures: &mut TextureCache) {
        let rect = element_rect(ui, &self.state, base_dir, textures);
        let response = ui.interact(rect, ui.id().with(("element", index)), Sense::click());

        if response.clicked() {
            self.state.cycle_image();
        }

        // The menu is rebuilt from the current image list on every
        // invocation, so it can never go stale.
        let mut chosen: Option<String> = None;
        response.context_menu(|ui| {
            for entry in &self.state.descriptor().images {
                if ui.button(entry.name()).clicked() {
                    chosen = Some(entry.name().to_string());
                    ui.close_menu();
                }
            }
        });
        if let Some(name) = chosen {
            self.state.set_image_by_name(&name);
        }

        // Draw whatever the transitions above selected; the widget rect
        // follows the new image's intrinsic size on the next frame.
        let texture = textures.get_or_load(ui.ctx(), base_dir, self.state.current_image().file());
        paint_icon(ui, rect, texture.as_ref(), &self.state.descriptor().name);
    }
}

// ============================================================================
// EDITOR ELEMENT
// ============================================================================

/// Request raised from an editor element's context menu, handled by the
/// owning window.
pub enum ElementAction {
    OpenProperties,
}

pub struct EditorElement {
    pub state: ElementState,
}

impl EditorElement {
    pub fn new(descriptor: ElementDescriptor) -> Self {
        Self {
            state: ElementState::new(descriptor),
        }
    }

    /// Left-click does nothing in the editor; all interaction goes through
    /// the context menu.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        index: usize,
        base_dir: &Path,
        textures: &mut TextureCache,
    ) -> Option<ElementAction> {
        let rect = element_rect(ui, &self.state, base_dir, textures);
        let response = ui.interact(rect, ui.id().with(("element", index)), Sense::click());

        let mut action = None;
        let mut cycle = false;
        let mut chosen: Option<String> = None;
        response.context_menu(|ui| {
            if ui.button("Cycle Image").clicked() {
                cycle = true;
                ui.close_menu();
            }
            ui.menu_button("Choose Image", |ui| {
                for entry in &self.state.descriptor().images {
                    if ui.button(entry.name()).clicked() {
                        chosen = Some(entry.name().to_string());
                        ui.close_menu();
                    }
                }
            });
            if ui.button("Properties").clicked() {
                action = Some(ElementAction::OpenProperties);
                ui.close_menu();
            }
        });
        if cycle {
            self.state.cycle_image();
        }
        if let Some(name) = chosen {
            self.state.set_image_by_name(&name);
        }

        let texture = textures.get_or_load(ui.ctx(), base_dir, self.state.current_image().file());
        paint_icon(ui, rect, texture.as_ref(), &self.state.descriptor().name);

        action
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(images: &[(&str, &str)]) -> ElementDescriptor {
        ElementDescriptor {
            name: "sword".into(),
            images: images
                .iter()
                .map(|(n, f)| ImageEntry::new(*n, *f))
                .collect(),
            coords: (10, 20),
            layer: 1,
        }
    }

    #[test]
    fn starts_on_the_first_image() {
        let state = ElementState::new(descriptor(&[("off", "off.png"), ("on", "on.png")]));
        assert_eq!(state.image_index(), 0);
        assert_eq!(state.current_image().file(), "off.png");
    }

    #[test]
    fn click_cycle_advances_and_wraps() {
        let mut state = ElementState::new(descriptor(&[("off", "off.png"), ("on", "on.png")]));
        state.cycle_image();
        assert_eq!(state.current_image().file(), "on.png");
        state.cycle_image();
        assert_eq!(state.current_image().file(), "off.png");
    }

    #[test]
    fn cycling_n_times_returns_to_the_start() {
        let mut state = ElementState::new(descriptor(&[
            ("a", "a.png"),
            ("b", "b.png"),
            ("c", "c.png"),
        ]));
        state.set_image_by_name("b");
        let start = state.image_index();
        for _ in 0..state.descriptor().images.len() {
            state.cycle_image();
        }
        assert_eq!(state.image_index(), start);
    }

    #[test]
    fn duplicate_names_resolve_to_the_first_match() {
        let mut state = ElementState::new(descriptor(&[
            ("off", "off0.png"),
            ("on", "on.png"),
            ("off", "off1.png"),
        ]));
        state.cycle_image(); // move away from index 0
        assert!(state.set_image_by_name("off"));
        assert_eq!(state.image_index(), 0);
        assert_eq!(state.current_image().file(), "off0.png");
    }

    #[test]
    fn unknown_name_leaves_state_unchanged() {
        let mut state = ElementState::new(descriptor(&[("off", "off.png"), ("on", "on.png")]));
        state.cycle_image();
        assert!(!state.set_image_by_name("missing"));
        assert_eq!(state.image_index(), 1);
    }

    #[test]
    fn applying_a_shorter_image_list_resets_the_index() {
        let mut state = ElementState::new(descriptor(&[
            ("a", "a.png"),
            ("b", "b.png"),
            ("c", "c.png"),
        ]));
        state.set_image_by_name("c");
        state.apply_descriptor(descriptor(&[("a", "a.png")]));
        assert_eq!(state.image_index(), 0);
    }

    #[test]
    fn applying_a_compatible_descriptor_keeps_the_index() {
        let mut state = ElementState::new(descriptor(&[("a", "a.png"), ("b", "b.png")]));
        state.cycle_image();
        let mut edited = descriptor(&[("a", "a.png"), ("b", "b2.png")]);
        edited.coords = (99, 99);
        state.apply_descriptor(edited);
        assert_eq!(state.image_index(), 1);
        assert_eq!(state.current_image().file(), "b2.png");
        assert_eq!(state.descriptor().coords, (99, 99));
    }
}
