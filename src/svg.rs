//! SVG converter implementation for icon sets.
//!
//! This module provides the `Converter` used when splitting: every icon of a
//! set becomes a standalone SVG 1.1 document sized to the set's icon size.

use std::fmt::Write;

use tracing::{debug, warn};

use crate::converter::{Converter, ConverterConfig};
use crate::error::IconResult;
use crate::types::{IconFile, IconSet, SVG_EXTENSION};

/// Converter that produces one SVG document per icon.
///
/// # Example
///
/// ```ignore
/// use pig::{Converter, ConverterConfig, SvgConverter};
///
/// let converter = SvgConverter::with_config(ConverterConfig::new().with_file_prefix("ic-"));
/// for file in converter.convert(&set)? {
///     std::fs::write(dir.join(&file.file_name), file.contents)?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SvgConverter {
    /// Configuration options.
    config: ConverterConfig,
}

impl SvgConverter {
    /// Creates a new SVG converter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new SVG converter with the given configuration.
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }
}

impl Converter for SvgConverter {
    type Output = Vec<IconFile>;

    fn convert(&self, set: &IconSet) -> IconResult<Self::Output> {
        let mut files = Vec::with_capacity(set.len());

        for def in &set.definitions {
            let file_name = format!("{}{}.{}", self.config.file_prefix, def.name, SVG_EXTENSION);
            if !is_plain_file_name(&file_name) {
                warn!("Skipping icon '{}': not usable as a file name", def.name);
                continue;
            }

            debug!("Wrapping icon '{}' as {}", def.name, file_name);
            files.push(IconFile {
                file_name,
                contents: wrap_svg(&def.markup, set.size),
            });
        }

        Ok(files)
    }
}

/// Wraps an icon fragment in a standalone SVG document.
pub fn wrap_svg(markup: &str, size: u32) -> String {
    let mut svg = String::with_capacity(markup.len() + 320);
    svg.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    svg.push_str(
        "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
         \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
    );
    let _ = write!(
        svg,
        "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" \
         xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{size}px\" height=\"{size}px\">\n"
    );
    svg.push_str(markup);
    svg.push_str("\n</svg>");
    svg
}

/// Rejects names that would escape the destination directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
}
