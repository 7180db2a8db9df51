//! Extraction of icon definitions from individual SVG files.
//!
//! Source icons are expected to be simple, self-contained documents, so the
//! `<svg>` element is located with a first-match scan rather than a full
//! structural parse.

use std::path::Path;
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, trace};

use crate::cleaner::{root_dimensions, CleanOptions, Cleaner};
use crate::error::{IconError, IconResult};
use crate::types::{Dimensions, IconDefinition, SVG_EXTENSION};

/// Opening `<svg>` tag (group 1) and everything up to the last `</svg>` (group 2).
static SVG_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(<svg(?:\s[^>]*)?>)(.*)</svg>").expect("valid svg element pattern")
});

/// Naming and normalization settings for a batch of icons.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Prepended to every derived icon name.
    pub prefix: String,

    /// Stripped from the start of every file stem before the prefix is added.
    pub omit_prefix: String,

    /// Run the markup through the cleaner first.
    pub clean: bool,

    /// Forwarded to the cleaner.
    pub clean_options: CleanOptions,

    /// Parse dimensions from the root `<svg>` tag when not cleaning.
    pub detect_dimensions: bool,
}

/// Turns SVG documents into named icon definitions.
pub struct IconExtractor<'a> {
    options: &'a ExtractOptions,
    cleaner: &'a dyn Cleaner,
}

impl<'a> IconExtractor<'a> {
    pub fn new(options: &'a ExtractOptions, cleaner: &'a dyn Cleaner) -> Self {
        Self { options, cleaner }
    }

    /// Derives the icon name for `file_name`.
    ///
    /// The `.svg` extension is dropped, then the omit-prefix is removed if the
    /// stem starts with it, then the prefix is prepended. An omit-prefix that
    /// would consume the whole stem is ignored.
    pub fn icon_name(&self, file_name: &str) -> String {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());

        let omit = self.options.omit_prefix.as_str();
        let stem = match stem.strip_prefix(omit) {
            Some(rest) if !omit.is_empty() && !rest.is_empty() => rest,
            _ => stem.as_str(),
        };

        format!("{}{}", self.options.prefix, stem)
    }

    /// Extracts the icon contained in `content`, read from `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::MalformedSvg`] if no `<svg>` element is found and
    /// [`IconError::Cleaner`] if cleaning fails.
    pub fn extract(&self, content: &str, file_name: &str) -> IconResult<IconDefinition> {
        let name = self.icon_name(file_name);

        let (svg, cleaned_dimensions) = if self.options.clean {
            let cleaned = self.cleaner.clean(content, &self.options.clean_options)?;
            (cleaned.markup, cleaned.dimensions)
        } else {
            (content.to_string(), None)
        };

        let captures = SVG_ELEMENT
            .captures(&svg)
            .ok_or_else(|| IconError::MalformedSvg {
                file: file_name.to_string(),
            })?;

        let opening_tag = captures.get(1).map_or("", |m| m.as_str());
        let markup = captures.get(2).map_or("", |m| m.as_str());

        let dimensions = if self.options.clean {
            cleaned_dimensions
        } else if self.options.detect_dimensions {
            tag_dimensions(opening_tag)
        } else {
            None
        };

        debug!("Extracted icon '{}' from {}", name, file_name);
        trace!("Icon '{}' dimensions: {:?}", name, dimensions);

        Ok(IconDefinition::new(name, markup).with_dimensions(dimensions))
    }
}

/// Whether `file_name` has exactly the `.svg` extension.
pub fn is_svg_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == SVG_EXTENSION)
}

/// Best-effort size detection from the `width` and `height` of a raw
/// opening `<svg>` tag.
fn tag_dimensions(tag: &str) -> Option<Dimensions> {
    let mut reader = Reader::from_str(tag);
    match reader.read_event() {
        Ok(Event::Start(elem)) | Ok(Event::Empty(elem)) => root_dimensions(&elem, false),
        _ => None,
    }
}
