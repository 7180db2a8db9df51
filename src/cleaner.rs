//! SVG markup normalization.
//!
//! The [`Cleaner`] trait is the seam through which icon markup gets
//! normalized before it is bundled. [`XmlCleaner`] is the built-in
//! implementation: it re-serializes the document with `quick-xml`, dropping
//! everything that does not contribute to rendering the icon.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::trace;

use crate::error::{IconError, IconResult};
use crate::types::Dimensions;

/// Elements that never contribute to the rendered icon.
const DROPPED_ELEMENTS: &[&[u8]] = &[b"metadata", b"title", b"desc"];

/// Attributes removed in monochrome mode.
const PAINT_ATTRIBUTES: &[&[u8]] = &[b"fill", b"stroke", b"class"];

/// Options controlling how markup gets normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Emit compact markup instead of pretty-printing it.
    pub minify: bool,

    /// Remove fill, stroke and class attributes as well as style elements.
    pub monochrome: bool,
}

impl CleanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_monochrome(mut self, monochrome: bool) -> Self {
        self.monochrome = monochrome;
        self
    }
}

/// Result of cleaning one SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned {
    /// The normalized document, still wrapped in its `<svg>` element.
    pub markup: String,
    /// Natural size of the icon, if the root element declares one.
    pub dimensions: Option<Dimensions>,
}

/// A markup normalizer.
///
/// Implementations receive a complete SVG document and return a normalized
/// document. They may also report the icon's natural size.
pub trait Cleaner: Send + Sync {
    /// Normalizes `svg`.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::Cleaner`] if the markup cannot be processed.
    fn clean(&self, svg: &str, options: &CleanOptions) -> IconResult<Cleaned>;
}

/// Cleaner backed by a streaming `quick-xml` round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCleaner;

impl XmlCleaner {
    pub fn new() -> Self {
        Self
    }

    fn is_dropped(name: &[u8], options: &CleanOptions) -> bool {
        DROPPED_ELEMENTS.contains(&name) || (options.monochrome && name == b"style")
    }
}

impl Cleaner for XmlCleaner {
    fn clean(&self, svg: &str, options: &CleanOptions) -> IconResult<Cleaned> {
        let mut reader = Reader::from_str(svg);

        let mut writer = if options.minify {
            Writer::new(Vec::with_capacity(svg.len()))
        } else {
            Writer::new_with_indent(Vec::with_capacity(svg.len()), b' ', 2)
        };

        let mut dimensions = None;
        let mut seen_root = false;
        // Depth inside an element that is being dropped.
        let mut skipping = 0usize;
        // Whitespace is only kept inside a run of text and entity references.
        let mut in_text = false;
        let mut pending_space: Option<Event<'_>> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                IconError::Cleaner(format!("{} at position {}", e, reader.error_position()))
            })?;

            if matches!(event, Event::Start(_) | Event::Empty(_) | Event::End(_)) {
                in_text = false;
                pending_space = None;
            }

            match event {
                Event::Eof => break,
                Event::Decl(_) | Event::DocType(_) | Event::PI(_) | Event::Comment(_) => {}
                Event::Start(elem) => {
                    if skipping > 0 || Self::is_dropped(elem.local_name().as_ref(), options) {
                        skipping += 1;
                        continue;
                    }
                    if !seen_root && elem.local_name().as_ref() == b"svg" {
                        seen_root = true;
                        dimensions = root_dimensions(&elem, true);
                    }
                    write(&mut writer, Event::Start(strip_paint(elem, options)?))?;
                }
                Event::Empty(elem) => {
                    if skipping > 0 || Self::is_dropped(elem.local_name().as_ref(), options) {
                        continue;
                    }
                    if !seen_root && elem.local_name().as_ref() == b"svg" {
                        seen_root = true;
                        dimensions = root_dimensions(&elem, true);
                    }
                    write(&mut writer, Event::Empty(strip_paint(elem, options)?))?;
                }
                Event::End(elem) => {
                    if skipping > 0 {
                        skipping -= 1;
                        continue;
                    }
                    write(&mut writer, Event::End(elem))?;
                }
                Event::Text(text) if skipping == 0 && text.iter().all(u8::is_ascii_whitespace) => {
                    if in_text {
                        write(&mut writer, Event::Text(text))?;
                    } else {
                        pending_space = Some(Event::Text(text));
                    }
                }
                other => {
                    if skipping == 0 {
                        if let Some(space) = pending_space.take() {
                            write(&mut writer, space)?;
                        }
                        in_text = matches!(other, Event::Text(_) | Event::GeneralRef(_) | Event::CData(_));
                        write(&mut writer, other)?;
                    }
                }
            }
        }

        let markup = String::from_utf8(writer.into_inner())
            .map_err(|e| IconError::Cleaner(e.to_string()))?;
        trace!("Cleaned markup: {} -> {} bytes", svg.len(), markup.len());

        Ok(Cleaned { markup, dimensions })
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> IconResult<()> {
    writer
        .write_event(event)
        .map_err(|e| IconError::Cleaner(e.to_string()))
}

/// Removes paint attributes from `elem` in monochrome mode.
fn strip_paint(elem: BytesStart<'_>, options: &CleanOptions) -> IconResult<BytesStart<'static>> {
    if !options.monochrome {
        return Ok(elem.into_owned());
    }

    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut stripped = BytesStart::new(name);
    for attr in elem.attributes() {
        let attr = attr.map_err(|e| IconError::Cleaner(e.to_string()))?;
        if PAINT_ATTRIBUTES.contains(&attr.key.as_ref()) {
            continue;
        }
        stripped.push_attribute(attr);
    }
    Ok(stripped)
}

/// Reads the natural size declared on a root `<svg>` tag.
///
/// `width` and `height` win. With `allow_view_box`, the `viewBox` extent
/// fills in whichever of them is missing or not expressed in pixels.
pub fn root_dimensions(tag: &BytesStart<'_>, allow_view_box: bool) -> Option<Dimensions> {
    let mut width = None;
    let mut height = None;
    let mut view_box = None;

    for attr in tag.attributes().flatten() {
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        match attr.key.as_ref() {
            b"width" => width = parse_length(&value),
            b"height" => height = parse_length(&value),
            b"viewBox" if allow_view_box => view_box = parse_view_box(&value),
            _ => {}
        }
    }

    let width = width.or(view_box.map(|dims| dims.width))?;
    let height = height.or(view_box.map(|dims| dims.height))?;
    Some(Dimensions::new(width, height))
}

/// Parses a pixel length such as `24`, `24px` or `23.5`.
fn parse_length(value: &str) -> Option<u32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    to_pixels(number.parse::<f64>().ok()?)
}

fn parse_view_box(value: &str) -> Option<Dimensions> {
    let parts: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    match parts.as_slice() {
        [_, _, width, height] => Some(Dimensions::new(to_pixels(*width)?, to_pixels(*height)?)),
        _ => None,
    }
}

fn to_pixels(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) {
        Some(value.round() as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<!-- Generator: Sketch -->
<svg xmlns="http://www.w3.org/2000/svg" width="24px" height="24px" viewBox="0 0 24 24">
    <title>home</title>
    <desc>Created with Sketch.</desc>
    <g class="layer" fill="#000">
        <path d="M10 20v-6h4v6" stroke="red"/>
    </g>
</svg>"##;

    #[test]
    fn test_minify_drops_boilerplate() {
        let cleaned = XmlCleaner::new()
            .clean(ICON, &CleanOptions::new().with_minify(true))
            .unwrap();

        assert_eq!(
            cleaned.markup,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="24px" height="24px" viewBox="0 0 24 24">"#,
                r##"<g class="layer" fill="#000"><path d="M10 20v-6h4v6" stroke="red"/></g></svg>"##,
            )
        );
        assert_eq!(cleaned.dimensions, Some(Dimensions::new(24, 24)));
    }

    #[test]
    fn test_pretty_print_indents() {
        let cleaned = XmlCleaner::new().clean(ICON, &CleanOptions::new()).unwrap();

        assert!(cleaned.markup.contains("\n  <g class=\"layer\""));
        assert!(cleaned.markup.contains("\n    <path "));
        assert!(!cleaned.markup.contains("<title>"));
    }

    #[test]
    fn test_monochrome_strips_paint() {
        let svg = r#"<svg width="16" height="16"><style>.a{fill:red}</style><path class="a" fill="red" d="M0 0"/></svg>"#;
        let cleaned = XmlCleaner::new()
            .clean(svg, &CleanOptions::new().with_minify(true).with_monochrome(true))
            .unwrap();

        assert_eq!(cleaned.markup, r#"<svg width="16" height="16"><path d="M0 0"/></svg>"#);
    }

    #[test]
    fn test_invalid_markup_is_cleaner_error() {
        let result = XmlCleaner::new().clean("<svg><g></svg>", &CleanOptions::new());
        assert!(matches!(result, Err(IconError::Cleaner(_))));
    }

    #[test]
    fn test_view_box_fallback() {
        let cleaned = XmlCleaner::new()
            .clean(r#"<svg viewBox="0 0 48 32"><path d="M0 0"/></svg>"#, &CleanOptions::new())
            .unwrap();
        assert_eq!(cleaned.dimensions, Some(Dimensions::new(48, 32)));
    }

    #[test]
    fn test_text_around_entities_keeps_spaces() {
        let svg = "<svg>\n  <text>a &amp; b</text>\n  <text>&lt; &gt;</text>\n</svg>";
        let cleaned = XmlCleaner::new()
            .clean(svg, &CleanOptions::new().with_minify(true))
            .unwrap();

        assert_eq!(
            cleaned.markup,
            "<svg><text>a &amp; b</text><text>&lt; &gt;</text></svg>"
        );
    }

    #[test]
    fn test_view_box_only_when_allowed() {
        let svg = r#"<svg viewBox="0 0 48 32" width="24">"#;
        let mut reader = Reader::from_str(svg);
        let Ok(Event::Start(tag)) = reader.read_event() else {
            panic!("Expected start tag");
        };

        assert_eq!(root_dimensions(&tag, true), Some(Dimensions::new(24, 32)));
        assert_eq!(root_dimensions(&tag, false), None);
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("24"), Some(24));
        assert_eq!(parse_length("24px"), Some(24));
        assert_eq!(parse_length(" 23.6 "), Some(24));
        assert_eq!(parse_length("100%"), None);
        assert_eq!(parse_length("-4"), None);
    }
}
