//! Abstract converter trait for icon sets.
//!
//! This module defines the `Converter` trait that turns an [`IconSet`] into
//! an output format. The crate ships two implementations: the iconset
//! document written by `generate` and the individual SVG files written by
//! `split`.

use crate::error::IconResult;
use crate::types::IconSet;

/// A trait for converting icon sets to other formats.
///
/// # Type Parameter
///
/// * `Output` - The type of the conversion output (e.g., `String` for a
///   single document, `Vec<IconFile>` for one file per icon).
///
/// # Example
///
/// ```ignore
/// use pig::{Converter, IconSet, IconResult};
///
/// struct NameList;
///
/// impl Converter for NameList {
///     type Output = Vec<String>;
///
///     fn convert(&self, set: &IconSet) -> IconResult<Self::Output> {
///         Ok(set.definitions.iter().map(|def| def.name.clone()).collect())
///     }
/// }
/// ```
pub trait Converter {
    /// The output type of the conversion.
    type Output;

    /// Converts the given icon set to the output format.
    fn convert(&self, set: &IconSet) -> IconResult<Self::Output>;
}

/// Configuration options for converters.
#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    /// Comment placed at the top of generated iconset documents.
    pub comment: Option<String>,

    /// Prepended to the file name of every icon written by a split.
    pub file_prefix: String,
}

impl ConverterConfig {
    /// Creates a new converter configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document comment.
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Sets the icon file name prefix.
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }
}
