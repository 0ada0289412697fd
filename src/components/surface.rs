//! Surfaces — the widget collections behind the tracker and editor windows.
//!
//! `open()` parses the document first and swaps the element set only on a
//! confirmed successful parse; a failed load leaves the previous elements
//! fully intact and propagates the error to the caller.

use std::path::{Path, PathBuf};

use crate::components::element::{EditorElement, ElementAction, TrackerElement};
use crate::io::TextureCache;
use crate::layout::{self, ElementDescriptor, LayoutError};

// ============================================================================
// TRACKER SURFACE
// ============================================================================

#[derive(Default)]
pub struct TrackerSurface {
    elements: Vec<TrackerElement>,
    base_dir: PathBuf,
    textures: TextureCache,
}

impl TrackerSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a layout document, replacing every current element on success.
    /// Returns the number of elements loaded.
    pub fn open(&mut self, path: &Path) -> Result<usize, LayoutError> {
        let descriptors = layout::load_layout(path)?;
        self.elements = descriptors.into_iter().map(TrackerElement::new).collect();
        self.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.textures.clear();
        Ok(self.elements.len())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[TrackerElement] {
        &self.elements
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        for (index, element) in self.elements.iter_mut().enumerate() {
            element.ui(ui, index, &self.base_dir, &mut self.textures);
        }
    }
}

// ============================================================================
// EDITOR SURFACE
// ============================================================================

#[derive(Default)]
pub struct EditorSurface {
    elements: Vec<EditorElement>,
    base_dir: PathBuf,
    textures: TextureCache,
}

impl EditorSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, path: &Path) -> Result<usize, LayoutError> {
        let descriptors = layout::load_layout(path)?;
        self.elements = descriptors.into_iter().map(EditorElement::new).collect();
        self.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.textures.clear();
        Ok(self.elements.len())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn element(&self, index: usize) -> Option<&EditorElement> {
        self.elements.get(index)
    }

    /// Split borrow for the dialogs: the image base directory plus the
    /// texture cache they preview through.
    pub fn dialog_context(&mut self) -> (&Path, &mut TextureCache) {
        (&self.base_dir, &mut self.textures)
    }

    /// Snapshot of the current in-memory document, committed edits included.
    /// This is what "Save Layout" serializes.
    pub fn descriptors(&self) -> Vec<ElementDescriptor> {
        self.elements
            .iter()
            .map(|e| e.state.descriptor().clone())
            .collect()
    }

    /// Commit an edited descriptor back onto a live element.
    pub fn apply_to_element(&mut self, index: usize, descriptor: ElementDescriptor) {
        if let Some(element) = self.elements.get_mut(index) {
            element.state.apply_descriptor(descriptor);
        }
    }

    /// Draw every element; returns the first action raised this frame.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<(usize, ElementAction)> {
        let mut raised = None;
        for (index, element) in self.elements.iter_mut().enumerate() {
            if let Some(action) = element.ui(ui, index, &self.base_dir, &mut self.textures) {
                raised = Some((index, action));
            }
        }
        raised
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ImageEntry;
    use tempfile::tempdir;

    const TWO_ELEMENTS: &str = r#"[
        {"name":"sword","images":[["off","off.png"],["on","on.png"]],"coords":[10,20],"layer":1},
        {"name":"shield","images":[["no","no.png"]],"coords":[60,20],"layer":2}
    ]"#;

    fn write_layout(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn open_mirrors_the_document_in_order_and_count() {
        let dir = tempdir().unwrap();
        let path = write_layout(dir.path(), "a.layout", TWO_ELEMENTS);

        let mut surface = TrackerSurface::new();
        assert_eq!(surface.open(&path).unwrap(), 2);
        assert_eq!(surface.element_count(), 2);
        assert_eq!(surface.elements()[0].state.descriptor().name, "sword");
        assert_eq!(surface.elements()[0].state.descriptor().coords, (10, 20));
        assert_eq!(surface.elements()[1].state.descriptor().name, "shield");
        assert_eq!(surface.elements()[1].state.descriptor().coords, (60, 20));
    }

    #[test]
    fn reload_fully_replaces_the_previous_elements() {
        let dir = tempdir().unwrap();
        let first = write_layout(dir.path(), "a.layout", TWO_ELEMENTS);
        let second = write_layout(
            dir.path(),
            "b.layout",
            r#"[{"name":"boots","images":[["got","got.png"]],"coords":[0,0],"layer":1}]"#,
        );

        let mut surface = TrackerSurface::new();
        surface.open(&first).unwrap();
        surface.open(&second).unwrap();
        assert_eq!(surface.element_count(), 1);
        assert_eq!(surface.elements()[0].state.descriptor().name, "boots");
    }

    #[test]
    fn failed_reload_leaves_the_previous_elements_untouched() {
        let dir = tempdir().unwrap();
        let good = write_layout(dir.path(), "good.layout", TWO_ELEMENTS);
        // Missing the required "layer" key
        let bad = write_layout(
            dir.path(),
            "bad.layout",
            r#"[{"name":"boots","images":[["got","got.png"]],"coords":[0,0]}]"#,
        );

        let mut surface = TrackerSurface::new();
        surface.open(&good).unwrap();
        assert!(surface.open(&bad).is_err());
        assert_eq!(surface.element_count(), 2);
        assert_eq!(surface.elements()[0].state.descriptor().name, "sword");
    }

    #[test]
    fn editor_commits_descriptor_edits_into_the_saved_document() {
        let dir = tempdir().unwrap();
        let path = write_layout(dir.path(), "a.layout", TWO_ELEMENTS);

        let mut surface = EditorSurface::new();
        surface.open(&path).unwrap();

        let mut edited = surface.element(0).unwrap().state.descriptor().clone();
        edited.name = "master sword".into();
        edited.coords = (30, 40);
        edited.images.push(ImageEntry::new("broken", "broken.png"));
        surface.apply_to_element(0, edited.clone());

        let descriptors = surface.descriptors();
        assert_eq!(descriptors[0], edited);
        assert_eq!(descriptors[1].name, "shield");

        // Round-trips through the saver
        let out = dir.path().join("out.layout");
        layout::save_layout(&out, &descriptors).unwrap();
        assert_eq!(layout::load_layout(&out).unwrap(), descriptors);
    }

    #[test]
    fn sword_scenario_from_a_loaded_document() {
        let dir = tempdir().unwrap();
        let path = write_layout(
            dir.path(),
            "sword.layout",
            r#"[{"name":"sword","images":[["off","off.png"],["on","on.png"]],"coords":[10,20],"layer":1}]"#,
        );

        let mut surface = TrackerSurface::new();
        surface.open(&path).unwrap();
        let state = &mut surface.elements[0].state;
        assert_eq!(state.current_image().file(), "off.png");
        state.cycle_image();
        assert_eq!(state.current_image().file(), "on.png");
        state.cycle_image();
        assert_eq!(state.current_image().file(), "off.png");
    }
}
