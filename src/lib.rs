//! # PIG - Polymer Iconset Generator
//!
//! A library for bundling a directory of SVG icons into a single
//! `iron-iconset-svg` document, and for splitting such a document back into
//! individual SVG files.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use pig::{generate, split, Options};
//!
//! let options = Options { prefix: Some("app-".into()), ..Options::default() };
//! if let Some(document) = generate(Path::new("icons/app"), &options)? {
//!     split(&document, &Options::default())?;
//! }
//! ```

pub mod cleaner;
pub mod config;
pub mod converter;
pub mod error;
pub mod extract;
pub mod generate;
pub mod html;
pub mod parser;
pub mod prefix;
pub mod split;
pub mod svg;
pub mod types;

// Re-export main types for convenient access
pub use cleaner::{CleanOptions, Cleaned, Cleaner, XmlCleaner};
pub use config::Options;
pub use converter::{Converter, ConverterConfig};
pub use error::{IconError, IconResult};
pub use extract::{ExtractOptions, IconExtractor};
pub use generate::{aggregate, aggregate_with, generate, generate_with};
pub use html::HtmlConverter;
pub use parser::ContainerParser;
pub use prefix::detect_common_prefix;
pub use split::split;
pub use svg::SvgConverter;
pub use types::*;
