//! Layout document model and (de)serialization.
//!
//! A `.layout` file is a plain JSON array of element descriptors:
//!
//! ```json
//! [
//!   {
//!     "name": "sword",
//!     "images": [["off", "off.png"], ["on", "on.png"]],
//!     "coords": [10, 20],
//!     "layer": 1
//!   }
//! ]
//! ```
//!
//! There is no schema version and no element IDs — an element's identity is
//! its position in the array. Relative image paths resolve against the layout
//! file's parent directory.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// ============================================================================
// DATA MODEL
// ============================================================================

/// One (display name, image file) pair. Serializes as a two-element JSON
/// array to match the wire format. Duplicate names are tolerated; lookups
/// resolve to the first match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry(pub String, pub String);

impl ImageEntry {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self(name.into(), file.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn file(&self) -> &str {
        &self.1
    }
}

/// One trackable element as stored in the layout document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Display label. Not guaranteed unique.
    pub name: String,
    /// Ordered, non-empty. Order defines cycle order.
    pub images: Vec<ImageEntry>,
    /// Absolute pixel position of the top-left corner within the surface.
    pub coords: (i32, i32),
    /// Carried and editable; render order stays document order.
    pub layer: i32,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error type for layout document operations.
#[derive(Debug)]
pub enum LayoutError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// An element declared no images; index 0 must always be displayable.
    EmptyImages { element: String },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Io(e) => write!(f, "I/O error: {}", e),
            LayoutError::Parse(e) => write!(f, "Invalid layout document: {}", e),
            LayoutError::EmptyImages { element } => {
                write!(f, "Element \"{}\" has an empty image list", element)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

impl From<std::io::Error> for LayoutError {
    fn from(e: std::io::Error) -> Self {
        LayoutError::Io(e)
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Parse(e)
    }
}

// ============================================================================
// LOAD / SAVE
// ============================================================================

/// Read a layout document. Fails on a missing/unreadable file, on malformed
/// JSON, and on any descriptor missing a required field — there is no
/// partial or defaulted construction. Does not mutate the file.
pub fn load_layout(path: &Path) -> Result<Vec<ElementDescriptor>, LayoutError> {
    let file = File::open(path)?;
    let descriptors: Vec<ElementDescriptor> = serde_json::from_reader(BufReader::new(file))?;
    for descriptor in &descriptors {
        if descriptor.images.is_empty() {
            return Err(LayoutError::EmptyImages {
                element: descriptor.name.clone(),
            });
        }
    }
    Ok(descriptors)
}

/// Write a layout document as pretty-printed JSON. Exact round-trip with
/// `load_layout`.
pub fn save_layout(path: &Path, descriptors: &[ElementDescriptor]) -> Result<(), LayoutError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, descriptors)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_layout(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_a_single_element_document() {
        let dir = tempdir().unwrap();
        let path = write_layout(
            dir.path(),
            "sword.layout",
            r#"[{"name":"sword","images":[["off","off.png"],["on","on.png"]],"coords":[10,20],"layer":1}]"#,
        );

        let descriptors = load_layout(&path).unwrap();
        assert_eq!(descriptors.len(), 1);
        let sword = &descriptors[0];
        assert_eq!(sword.name, "sword");
        assert_eq!(sword.coords, (10, 20));
        assert_eq!(sword.layer, 1);
        assert_eq!(sword.images[0], ImageEntry::new("off", "off.png"));
        assert_eq!(sword.images[1], ImageEntry::new("on", "on.png"));
    }

    #[test]
    fn preserves_document_order() {
        let dir = tempdir().unwrap();
        let path = write_layout(
            dir.path(),
            "many.layout",
            r#"[
                {"name":"c","images":[["a","a.png"]],"coords":[0,0],"layer":3},
                {"name":"a","images":[["a","a.png"]],"coords":[1,1],"layer":1},
                {"name":"b","images":[["a","a.png"]],"coords":[2,2],"layer":2}
            ]"#,
        );

        let names: Vec<String> = load_layout(&path)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn missing_required_field_fails_the_whole_load() {
        let dir = tempdir().unwrap();
        let path = write_layout(
            dir.path(),
            "bad.layout",
            r#"[{"name":"sword","images":[["off","off.png"]],"coords":[10,20]}]"#,
        );

        assert!(matches!(load_layout(&path), Err(LayoutError::Parse(_))));
    }

    #[test]
    fn malformed_json_fails() {
        let dir = tempdir().unwrap();
        let path = write_layout(dir.path(), "garbage.layout", "not json at all {");
        assert!(matches!(load_layout(&path), Err(LayoutError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.layout");
        assert!(matches!(load_layout(&path), Err(LayoutError::Io(_))));
    }

    #[test]
    fn empty_image_list_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_layout(
            dir.path(),
            "empty.layout",
            r#"[{"name":"hollow","images":[],"coords":[0,0],"layer":1}]"#,
        );

        match load_layout(&path) {
            Err(LayoutError::EmptyImages { element }) => assert_eq!(element, "hollow"),
            other => panic!("expected EmptyImages, got {:?}", other),
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.layout");
        let descriptors = vec![
            ElementDescriptor {
                name: "hammer".into(),
                images: vec![
                    ImageEntry::new("hammer", "icons/hammer.png"),
                    ImageEntry::new("mirror", "icons/mirror.png"),
                ],
                coords: (50, 50),
                layer: 1,
            },
            ElementDescriptor {
                name: "chest".into(),
                images: vec![ImageEntry::new("closed", "icons/chest0.png")],
                coords: (120, 50),
                layer: 2,
            },
        ];

        save_layout(&path, &descriptors).unwrap();
        assert_eq!(load_layout(&path).unwrap(), descriptors);
    }
}
