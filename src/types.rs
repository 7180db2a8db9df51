//! Iconset data types and shared constants.
//!
//! An [`IconSet`] is the in-memory form of an iconset document. It only lives
//! long enough to be serialized (when generating) or to be turned back into
//! individual SVG files (when splitting).

/// Icon size used when neither the options nor the icons themselves provide one.
pub const DEFAULT_SIZE: u32 = 100;

/// Import path of the companion `iron-iconset-svg` element.
pub const DEFAULT_IMPORT_PATH: &str = "../bower_components/iron-iconset-svg/iron-iconset-svg.html";

/// Location of the `iron-iconset-svg` element relative to a bower components directory.
pub const ICONSET_IMPORT_FILE: &str = "iron-iconset-svg/iron-iconset-svg.html";

/// File extension of iconset documents.
pub const CONTAINER_EXTENSION: &str = "html";

/// File extension of individual icons.
pub const SVG_EXTENSION: &str = "svg";

/// Pixel dimensions of a single icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The larger of both edges.
    pub fn max_edge(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// A single named icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDefinition {
    /// Icon name, unique within a set. Becomes the `id` of its `<g>` block.
    pub name: String,
    /// SVG fragment without the outer `<svg>` element.
    pub markup: String,
    /// Size detected from the source file, if any.
    pub dimensions: Option<Dimensions>,
}

impl IconDefinition {
    pub fn new(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markup: markup.into(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: Option<Dimensions>) -> Self {
        self.dimensions = dimensions;
        self
    }
}

/// A named collection of icons sharing one size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    /// Iconset name, written to the `name` attribute of the root element.
    pub name: String,
    /// Edge length in pixels. Icons are assumed to be square.
    pub size: u32,
    /// Reference to the companion `iron-iconset-svg` element.
    pub import_path: String,
    /// Icons in directory listing order.
    pub definitions: Vec<IconDefinition>,
}

impl IconSet {
    pub fn new(name: impl Into<String>, size: u32, import_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            import_path: import_path.into(),
            definitions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Largest edge across all detected icon dimensions.
    pub fn max_detected_size(&self) -> Option<u32> {
        self.definitions
            .iter()
            .filter_map(|def| def.dimensions)
            .map(|dims| dims.max_edge())
            .max()
    }
}

/// A rendered output file, named relative to its destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    pub file_name: String,
    pub contents: String,
}
