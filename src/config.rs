//! Configuration merging.
//!
//! ## Sources (in precedence order, highest to lowest):
//! 1. **Explicit options** - CLI flags or values set by a library caller
//! 2. **`pig.json`** - optional overlay file in the processed directory
//! 3. **Built-in defaults** - applied when a value is finally resolved
//!
//! Merging only fills fields that are still unset, so a higher-priority
//! source can never be overwritten by a lower one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cleaner::CleanOptions;
use crate::converter::ConverterConfig;
use crate::types::{DEFAULT_IMPORT_PATH, ICONSET_IMPORT_FILE};

/// File name of the per-directory overlay.
pub const CONFIG_FILE_NAME: &str = "pig.json";

/// Options recognized by `generate` and `split`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Output file or directory.
    pub dest: Option<PathBuf>,
    /// Import path of the `iron-iconset-svg` element embedded in the output.
    #[serde(alias = "libPath")]
    pub import_path: Option<String>,
    /// Path to a `bower_components` directory, used to derive the import path.
    pub bower_path: Option<PathBuf>,
    /// Iconset name; the source directory name when unset.
    pub name: Option<String>,
    /// Icon size in pixels; detected from the icons when unset.
    pub size: Option<u32>,
    /// Prefix added to icon names (generate) or icon file names (split).
    pub prefix: Option<String>,
    /// Prefix stripped from icon names. Auto-detected when unset; an empty
    /// string disables stripping.
    pub omit_prefix: Option<String>,
    /// Run icons through the cleaner.
    pub clean: Option<bool>,
    /// Compact cleaner output. Only meaningful together with `clean`.
    pub minify: Option<bool>,
    /// Strip paint attributes and style elements. Only meaningful together with `clean`.
    pub monochrome: Option<bool>,
    /// Comment added at the top of the iconset document.
    pub comment: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every unset field of `self` from `lower`.
    pub fn merge(mut self, lower: Options) -> Self {
        fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
            if slot.is_none() {
                *slot = value;
            }
        }

        fill(&mut self.dest, lower.dest);
        fill(&mut self.import_path, lower.import_path);
        fill(&mut self.bower_path, lower.bower_path);
        fill(&mut self.name, lower.name);
        fill(&mut self.size, lower.size);
        fill(&mut self.prefix, lower.prefix);
        fill(&mut self.omit_prefix, lower.omit_prefix);
        fill(&mut self.clean, lower.clean);
        fill(&mut self.minify, lower.minify);
        fill(&mut self.monochrome, lower.monochrome);
        fill(&mut self.comment, lower.comment);
        self
    }

    /// Merges the overlay found in `dir`, if any.
    pub fn with_overlay(self, dir: &Path) -> Self {
        match Self::load_overlay(dir) {
            Some(overlay) => self.merge(overlay),
            None => self,
        }
    }

    /// Merges the overlay found next to an iconset document being split.
    ///
    /// The overlay's `prefix` and `dest` describe how the document was
    /// generated, not where its icons go, so both are ignored here.
    pub fn with_split_overlay(self, dir: &Path) -> Self {
        match Self::load_overlay(dir) {
            Some(overlay) => self.merge(Options {
                prefix: None,
                dest: None,
                ..overlay
            }),
            None => self,
        }
    }

    /// Loads `pig.json` from `dir`.
    ///
    /// A missing file is not an error. A file that cannot be read or parsed
    /// is reported and skipped.
    pub fn load_overlay(dir: &Path) -> Option<Options> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(options) => {
                debug!("Loaded overlay {}", path.display());
                Some(options)
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Import path written to generated documents.
    pub fn resolved_import_path(&self) -> String {
        if let Some(import_path) = &self.import_path {
            return import_path.clone();
        }
        match &self.bower_path {
            Some(bower) => bower.join(ICONSET_IMPORT_FILE).to_string_lossy().into_owned(),
            None => DEFAULT_IMPORT_PATH.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }

    pub fn is_clean(&self) -> bool {
        self.clean.unwrap_or(false)
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions::new()
            .with_minify(self.minify.unwrap_or(false))
            .with_monochrome(self.monochrome.unwrap_or(false))
    }

    pub fn converter_config(&self) -> ConverterConfig {
        ConverterConfig::new()
            .with_comment(self.comment.clone())
            .with_file_prefix(self.prefix())
    }
}
