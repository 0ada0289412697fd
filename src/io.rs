//! File dialogs, image decoding, and the per-surface texture cache.
//!
//! All I/O here is synchronous on the UI thread. Layout documents and icon
//! images are small; nothing in this application warrants a background
//! pipeline.

use egui::{ColorImage, TextureHandle, TextureOptions};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::log_warn;

// ============================================================================
// NATIVE FILE DIALOGS
// ============================================================================

/// Pick an existing layout document.
pub fn pick_layout_path() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Choose Layout")
        .add_filter("Layout Files", &["layout"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Pick a destination for saving a layout document.
pub fn save_layout_path() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Save Layout")
        .add_filter("Layout Files", &["layout"])
        .save_file()
}

/// Pick a replacement icon image.
pub fn pick_image_path() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Choose Image")
        .add_filter("PNG Images", &["png"])
        .add_filter("Images", &["png", "jpg", "jpeg", "bmp"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

// ============================================================================
// PATH RESOLUTION
// ============================================================================

/// Resolve an image path from a layout document. Relative paths are taken
/// against the layout file's parent directory; absolute paths pass through.
pub fn resolve_image_path(base_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Store a picked image path the way layout documents expect it: relative to
/// the layout's directory when possible, with forward-slash separators so the
/// document stays portable. Falls back to the path as given.
pub fn relativize_image_path(path: &Path, base_dir: &Path) -> String {
    let stored = path.strip_prefix(base_dir).unwrap_or(path);
    stored.to_string_lossy().replace('\\', "/")
}

// ============================================================================
// IMAGE DECODE + TEXTURE CACHE
// ============================================================================

/// Decode an image file into an egui `ColorImage`.
pub fn load_color_image(path: &Path) -> Result<ColorImage, String> {
    let img = image::open(path).map_err(|e| e.to_string())?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        rgba.as_raw(),
    ))
}

/// Texture store for one surface. Keyed by resolved path so elements sharing
/// an icon share one GPU upload. Decode failures are cached as `None` so a
/// broken path is not re-read from disk every frame.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<PathBuf, Option<TextureHandle>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached handle. Called when a surface loads a new document.
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    /// Fetch the texture for an image path, decoding and uploading on first
    /// use. Returns `None` when the file is missing or undecodable; the
    /// caller draws a placeholder instead.
    pub fn get_or_load(
        &mut self,
        ctx: &egui::Context,
        base_dir: &Path,
        file: &str,
    ) -> Option<TextureHandle> {
        let resolved = resolve_image_path(base_dir, file);
        if let Some(slot) = self.textures.get(&resolved) {
            return slot.clone();
        }

        let loaded = match load_color_image(&resolved) {
            Ok(color_image) => Some(ctx.load_texture(
                resolved.to_string_lossy(),
                color_image,
                TextureOptions::NEAREST,
            )),
            Err(e) => {
                log_warn!("Failed to load image {}: {}", resolved.display(), e);
                None
            }
        };
        self.textures.insert(resolved, loaded.clone());
        loaded
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_the_layout_directory() {
        let base = Path::new("/layouts/alttp");
        assert_eq!(
            resolve_image_path(base, "icons/hammer.png"),
            PathBuf::from("/layouts/alttp/icons/hammer.png")
        );
    }

    #[test]
    fn absolute_paths_pass_through() {
        let base = Path::new("/layouts/alttp");
        assert_eq!(
            resolve_image_path(base, "/srv/shared/hammer.png"),
            PathBuf::from("/srv/shared/hammer.png")
        );
    }

    #[test]
    fn picked_files_inside_the_layout_dir_are_stored_relative() {
        let base = Path::new("/layouts/alttp");
        assert_eq!(
            relativize_image_path(Path::new("/layouts/alttp/icons/on.png"), base),
            "icons/on.png"
        );
    }

    #[test]
    fn picked_files_outside_the_layout_dir_stay_as_given() {
        let base = Path::new("/layouts/alttp");
        assert_eq!(
            relativize_image_path(Path::new("/elsewhere/on.png"), base),
            "/elsewhere/on.png"
        );
    }

    #[test]
    fn decoding_a_missing_file_is_an_error() {
        assert!(load_color_image(Path::new("/no/such/image.png")).is_err());
    }
}
