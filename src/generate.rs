//! Iconset generation.
//!
//! Reads every `.svg` file of a directory, extracts the icons in parallel
//! and writes them as one iconset document.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::cleaner::{Cleaner, XmlCleaner};
use crate::config::Options;
use crate::converter::Converter;
use crate::error::{IconError, IconResult};
use crate::extract::{is_svg_file, ExtractOptions, IconExtractor};
use crate::html::HtmlConverter;
use crate::prefix::detect_common_prefix;
use crate::types::{IconDefinition, IconSet, CONTAINER_EXTENSION, DEFAULT_SIZE};

/// Name used when the source directory has no usable name of its own.
const FALLBACK_SET_NAME: &str = "icons";

/// Generates the iconset document for `src_dir` using the built-in cleaner.
///
/// Returns the path of the written document, or `None` if the directory
/// contains no `.svg` files and nothing was written. A directory whose icons
/// all fail to extract still produces an (empty) document.
///
/// # Errors
///
/// Returns [`IconError::DirectoryNotFound`] if `src_dir` cannot be listed
/// and an I/O error if the document cannot be written. Individual icons
/// that fail to extract are skipped with a warning.
pub fn generate(src_dir: &Path, options: &Options) -> IconResult<Option<PathBuf>> {
    generate_with(src_dir, options, &XmlCleaner)
}

/// Like [`generate`], with a caller-supplied cleaner.
pub fn generate_with(
    src_dir: &Path,
    options: &Options,
    cleaner: &dyn Cleaner,
) -> IconResult<Option<PathBuf>> {
    let (set, found) = build_set(src_dir, options, cleaner)?;
    if found == 0 {
        info!("No icons found in {}, nothing to write", src_dir.display());
        return Ok(None);
    }

    let dest = destination(src_dir, &set.name, options);
    let html = HtmlConverter::with_config(options.converter_config()).convert(&set)?;

    write_atomic(&dest, &html)?;
    info!(
        "Wrote iconset '{}' with {} icons ({}px) to {}",
        set.name,
        set.len(),
        set.size,
        dest.display()
    );

    Ok(Some(dest))
}

/// Builds the icon set for `src_dir` without writing anything.
pub fn aggregate(src_dir: &Path, options: &Options) -> IconResult<IconSet> {
    aggregate_with(src_dir, options, &XmlCleaner)
}

/// Like [`aggregate`], with a caller-supplied cleaner.
pub fn aggregate_with(
    src_dir: &Path,
    options: &Options,
    cleaner: &dyn Cleaner,
) -> IconResult<IconSet> {
    build_set(src_dir, options, cleaner).map(|(set, _)| set)
}

/// Builds the icon set and reports how many `.svg` files were found.
fn build_set(
    src_dir: &Path,
    options: &Options,
    cleaner: &dyn Cleaner,
) -> IconResult<(IconSet, usize)> {
    info!("Reading icons from {}", src_dir.display());
    let file_names = list_svg_files(src_dir)?;
    debug!("Found {} svg files", file_names.len());

    let omit_prefix = match &options.omit_prefix {
        Some(omit_prefix) => omit_prefix.clone(),
        None => {
            let detected = detect_common_prefix(&file_names);
            if !detected.is_empty() {
                debug!("Detected common prefix '{}'", detected);
            }
            detected
        }
    };

    let extract_options = ExtractOptions {
        prefix: options.prefix().to_string(),
        omit_prefix,
        clean: options.is_clean(),
        clean_options: options.clean_options(),
        detect_dimensions: options.size.is_none(),
    };
    let extractor = IconExtractor::new(&extract_options, cleaner);

    // `collect` keeps listing order regardless of completion order.
    let results: Vec<IconResult<IconDefinition>> = file_names
        .par_iter()
        .map(|file_name| read_icon(src_dir, file_name, &extractor))
        .collect();

    let mut definitions = Vec::with_capacity(results.len());
    for (file_name, result) in file_names.iter().zip(results) {
        match result {
            Ok(def) => definitions.push(def),
            Err(e) => warn!("Skipping {}: {}", file_name, e),
        }
    }

    warn_duplicates(&definitions);

    let name = options
        .name
        .clone()
        .unwrap_or_else(|| directory_name(src_dir));

    let mut set = IconSet::new(name, DEFAULT_SIZE, options.resolved_import_path());
    set.definitions = definitions;
    set.size = options
        .size
        .or_else(|| set.max_detected_size())
        .unwrap_or(DEFAULT_SIZE);
    trace!("Resolved iconset '{}' size {}", set.name, set.size);

    Ok((set, file_names.len()))
}

/// Path of the document written for the set `name`.
///
/// A destination with the document extension is used as is; any other
/// destination, or the source directory when none is given, is treated as
/// the directory to write `<name>.html` into.
pub fn destination(src_dir: &Path, name: &str, options: &Options) -> PathBuf {
    let dest = options.dest.as_deref().unwrap_or(src_dir);
    if dest
        .extension()
        .is_some_and(|ext| ext == CONTAINER_EXTENSION)
    {
        dest.to_path_buf()
    } else {
        dest.join(format!("{}.{}", name, CONTAINER_EXTENSION))
    }
}

/// Sorted names of the `.svg` files directly inside `dir`.
fn list_svg_files(dir: &Path) -> IconResult<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| IconError::DirectoryNotFound {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if is_svg_file(&name) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

fn read_icon(dir: &Path, file_name: &str, extractor: &IconExtractor<'_>) -> IconResult<IconDefinition> {
    let path = dir.join(file_name);
    let content = fs::read_to_string(&path)
        .map_err(|source| IconError::FileNotFound { path, source })?;
    extractor.extract(&content, file_name)
}

fn warn_duplicates(definitions: &[IconDefinition]) {
    let mut seen = HashSet::new();
    for def in definitions {
        if !seen.insert(def.name.as_str()) {
            warn!("Duplicate icon name '{}'", def.name);
        }
    }
}

fn directory_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            fs::canonicalize(dir)
                .ok()
                .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| FALLBACK_SET_NAME.to_string())
}

/// Replaces `path` with `contents` through a temporary sibling file.
fn write_atomic(path: &Path, contents: &str) -> IconResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        IconError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_destination_defaults_to_source_dir() {
        let dest = destination(Path::new("icons/app"), "app", &Options::new());
        assert_eq!(dest, PathBuf::from("icons/app/app.html"));
    }

    #[test]
    fn test_destination_file_is_used_verbatim() {
        let options = Options {
            dest: Some(PathBuf::from("out/set.html")),
            ..Default::default()
        };
        assert_eq!(destination(Path::new("src"), "app", &options), PathBuf::from("out/set.html"));
    }

    #[test]
    fn test_destination_directory() {
        let options = Options {
            dest: Some(PathBuf::from("out")),
            ..Default::default()
        };
        assert_eq!(destination(Path::new("src"), "app", &options), PathBuf::from("out/app.html"));
    }

    #[test]
    fn test_list_svg_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.svg", "a.svg", "notes.txt", "c.SVG", "pig.json"] {
            fs::write(dir.path().join(name), "<svg></svg>").unwrap();
        }
        fs::create_dir(dir.path().join("nested.svg")).unwrap();

        let names = list_svg_files(dir.path()).unwrap();
        assert_eq!(names, vec!["a.svg", "b.svg"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = list_svg_files(&dir.path().join("missing"));
        assert!(matches!(result, Err(IconError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/set.html");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("deep/.set.html.tmp").exists());
    }
}
