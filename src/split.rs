//! Iconset splitting.
//!
//! Turns an iconset document back into one SVG file per icon.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Options;
use crate::converter::Converter;
use crate::error::{IconError, IconResult};
use crate::parser::ContainerParser;
use crate::svg::SvgConverter;
use crate::types::{IconSet, CONTAINER_EXTENSION};

/// Splits `src_file` into individual SVG files.
///
/// Files are written to `<dest>/<document name>/<prefix><icon>.svg`, where
/// `dest` defaults to the directory of `src_file`. Returns the written paths.
///
/// # Errors
///
/// Returns [`IconError::InvalidInput`] before touching the filesystem if
/// `src_file` is not an `.html` document, and [`IconError::FileNotFound`] if
/// it cannot be read. A document without recognizable iconset structure
/// yields no files.
pub fn split(src_file: &Path, options: &Options) -> IconResult<Vec<PathBuf>> {
    let stem = document_stem(src_file)?;

    let dest_dir = options
        .dest
        .clone()
        .unwrap_or_else(|| parent_dir(src_file))
        .join(&stem);

    info!("Splitting {}", src_file.display());
    let document = fs::read_to_string(src_file).map_err(|source| IconError::FileNotFound {
        path: src_file.to_path_buf(),
        source,
    })?;

    let set = match ContainerParser::new(&document).parse() {
        Ok(set) => set,
        Err(IconError::MalformedContainer(reason)) => {
            warn!("No icons found in {}: {}", src_file.display(), reason);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    write_icons(&set, &dest_dir, options)
}

fn write_icons(set: &IconSet, dest_dir: &Path, options: &Options) -> IconResult<Vec<PathBuf>> {
    let files = SvgConverter::with_config(options.converter_config()).convert(set)?;
    if files.is_empty() {
        info!("Iconset '{}' contains no icons", set.name);
        return Ok(Vec::new());
    }

    fs::create_dir_all(dest_dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dest_dir.join(&file.file_name);
        fs::write(&path, file.contents)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }

    info!(
        "Split {} icons ({}px) into {}",
        written.len(),
        set.size,
        dest_dir.display()
    );
    Ok(written)
}

/// File name of `src_file` without its `.html` extension.
fn document_stem(src_file: &Path) -> IconResult<String> {
    let is_document = src_file
        .extension()
        .is_some_and(|ext| ext == CONTAINER_EXTENSION);
    if !is_document {
        return Err(IconError::InvalidInput(format!(
            "{} needs to be an {} file",
            src_file.display(),
            CONTAINER_EXTENSION
        )));
    }

    src_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| IconError::InvalidInput(format!("{} has no file name", src_file.display())))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rejects_non_html_before_io() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("icons.svg");

        let result = split(&missing, &Options::new());
        assert!(matches!(result, Err(IconError::InvalidInput(_))));
        assert!(!dir.path().join("icons").exists());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = split(&dir.path().join("gone.html"), &Options::new());
        assert!(matches!(result, Err(IconError::FileNotFound { .. })));
    }

    #[test]
    fn test_unrecognized_document_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("page.html");
        fs::write(&src, "<html><body><p>hello</p></body></html>").unwrap();

        let written = split(&src, &Options::new()).unwrap();
        assert!(written.is_empty());
        assert!(!dir.path().join("page").exists());
    }
}
