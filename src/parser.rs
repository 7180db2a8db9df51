//! Iconset document parser.
//!
//! This module reads an iconset document back into an [`IconSet`]. The
//! surrounding HTML is only scanned leniently for the import link and the
//! iconset root element, while the embedded `<svg>` block gets a strict XML
//! parse so arbitrarily nested icon markup is delimited correctly.

use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::error::{IconError, IconResult};
use crate::types::{IconDefinition, IconSet, DEFAULT_SIZE};

/// Everything from the first `<svg>` start tag to the last `</svg>` end tag.
static SVG_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<svg(?:\s[^>]*)?>.*</svg>").expect("valid svg block pattern")
});

/// Element names accepted as the iconset root, newest first.
const ROOT_ELEMENTS: &[&[u8]] = &[b"iron-iconset-svg", b"core-iconset-svg"];

/// Parser for iconset documents.
pub struct ContainerParser<'a> {
    /// The complete document text.
    document: &'a str,
}

/// Attributes of the iconset root element.
#[derive(Debug)]
struct Header {
    name: String,
    size: u32,
    import_path: String,
    /// Byte offset just past the root start tag.
    body_start: usize,
}

/// A `<g id>` definition whose end tag has not been reached yet.
struct OpenIcon {
    name: String,
    start: usize,
    depth: usize,
}

impl<'a> ContainerParser<'a> {
    pub fn new(document: &'a str) -> Self {
        Self { document }
    }

    /// Parses the document into an icon set.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::MalformedContainer`] if there is no iconset root
    /// element, no `<svg>` block, or the block is not well-formed XML. A
    /// well-formed document without definitions parses to an empty set.
    pub fn parse(self) -> IconResult<IconSet> {
        let header = self
            .parse_header()?
            .ok_or_else(|| IconError::MalformedContainer("no iconset element found".into()))?;
        debug!("Found iconset '{}' with size {}", header.name, header.size);

        let body = self.document.get(header.body_start..).unwrap_or_default();
        let block = SVG_BLOCK
            .find(body)
            .ok_or_else(|| IconError::MalformedContainer("no <svg> block found".into()))?;

        let mut set = IconSet::new(header.name, header.size, header.import_path);
        set.definitions = parse_definitions(block.as_str())?;
        debug!("Parsed {} icon definitions", set.len());

        Ok(set)
    }

    /// Scans for the import link and the iconset root element.
    ///
    /// The surrounding document is HTML, so end tags are not required to
    /// match here.
    fn parse_header(&self) -> IconResult<Option<Header>> {
        let mut reader = Reader::from_str(self.document);
        reader.config_mut().check_end_names = false;

        let mut import_path = String::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                IconError::MalformedContainer(format!("{} at position {}", e, reader.error_position()))
            })?;

            match event {
                Event::Start(elem) | Event::Empty(elem) => {
                    let name = elem.local_name();
                    if name.as_ref() == b"link" {
                        if import_path.is_empty() && attribute(&elem, b"rel").as_deref() == Some("import") {
                            import_path = attribute(&elem, b"href").unwrap_or_default();
                            trace!("Import path: {}", import_path);
                        }
                    } else if ROOT_ELEMENTS.contains(&name.as_ref()) {
                        return Ok(Some(Header {
                            name: attribute(&elem, b"name")
                                .or_else(|| attribute(&elem, b"id"))
                                .unwrap_or_default(),
                            size: parse_size(&elem),
                            import_path,
                            body_start: position(&reader),
                        }));
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

/// Collects every `<g id>` that is a direct child of a `<defs>` element.
fn parse_definitions(block: &str) -> IconResult<Vec<IconDefinition>> {
    let mut reader = Reader::from_str(block);
    let mut definitions = Vec::new();

    // Number of currently open elements.
    let mut depth = 0usize;
    let mut defs_depth: Option<usize> = None;
    let mut open: Option<OpenIcon> = None;

    loop {
        let before = position(&reader);
        let event = reader.read_event().map_err(|e| {
            IconError::MalformedContainer(format!("{} at position {}", e, reader.error_position()))
        })?;

        match event {
            Event::Start(elem) => {
                depth += 1;
                if open.is_some() {
                    continue;
                }
                let name = elem.local_name();
                if name.as_ref() == b"defs" && defs_depth.is_none() {
                    defs_depth = Some(depth);
                } else if name.as_ref() == b"g" && defs_depth == Some(depth - 1) {
                    if let Some(id) = attribute(&elem, b"id") {
                        open = Some(OpenIcon {
                            name: id,
                            start: position(&reader),
                            depth,
                        });
                    }
                }
            }
            Event::Empty(elem) => {
                if open.is_none() && elem.local_name().as_ref() == b"g" && defs_depth == Some(depth) {
                    if let Some(id) = attribute(&elem, b"id") {
                        definitions.push(IconDefinition::new(id, ""));
                    }
                }
            }
            Event::End(_) => {
                if open.as_ref().is_some_and(|icon| icon.depth == depth) {
                    if let Some(icon) = open.take() {
                        let inner = block.get(icon.start..before).unwrap_or_default();
                        trace!("Recovered icon '{}' ({} bytes)", icon.name, inner.len());
                        definitions.push(IconDefinition::new(icon.name, strip_wrapping(inner)));
                    }
                }
                if defs_depth == Some(depth) {
                    defs_depth = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(icon) = open {
        warn!("Definition '{}' is never closed", icon.name);
    }

    Ok(definitions)
}

/// Removes the line breaks that separate icon markup from its `<g>` tags.
///
/// Leading whitespace is dropped through its last newline and trailing
/// whitespace from its first newline, so indentation of the first line and
/// whitespace without line breaks are kept.
fn strip_wrapping(inner: &str) -> &str {
    let body_start = inner.len() - inner.trim_start().len();
    let start = inner[..body_start].rfind('\n').map_or(0, |idx| idx + 1);

    let body_end = inner.trim_end().len();
    let end = inner[body_end..]
        .find('\n')
        .map_or(inner.len(), |idx| body_end + idx);

    if start <= end {
        &inner[start..end]
    } else {
        ""
    }
}

fn parse_size(elem: &BytesStart<'_>) -> u32 {
    let Some(raw) = attribute(elem, b"size").or_else(|| attribute(elem, b"iconSize")) else {
        return DEFAULT_SIZE;
    };

    let value = raw.trim();
    match value.strip_suffix("px").unwrap_or(value).trim().parse() {
        Ok(size) => size,
        Err(_) => {
            warn!("Invalid iconset size '{}', using {}", raw, DEFAULT_SIZE);
            DEFAULT_SIZE
        }
    }
}

/// Unescaped value of attribute `key`, if present and readable.
fn attribute(elem: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    elem.try_get_attribute(key)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|value| value.into_owned()))
}

fn position(reader: &Reader<&[u8]>) -> usize {
    reader.buffer_position() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = concat!(
        "<link rel=\"import\" href=\"../iron-iconset-svg/iron-iconset-svg.html\">\n",
        "\n",
        "<iron-iconset-svg name=\"app\" size=\"24\">\n",
        "<svg>\n",
        "<defs>\n",
        "<g id=\"home\">\n",
        "<path d=\"M10 20v-6h4v6\"/>\n",
        "</g>\n",
        "<g id=\"nested\">\n",
        "<g transform=\"scale(2)\">\n  <g><circle r=\"1\"/></g>\n</g>\n",
        "</g>\n",
        "</defs>\n",
        "</svg>\n",
        "</iron-icon-set>",
    );

    #[test]
    fn test_parse_document() {
        let set = ContainerParser::new(DOCUMENT).parse().unwrap();

        assert_eq!(set.name, "app");
        assert_eq!(set.size, 24);
        assert_eq!(set.import_path, "../iron-iconset-svg/iron-iconset-svg.html");
        assert_eq!(set.len(), 2);
        assert_eq!(set.definitions[0].name, "home");
        assert_eq!(set.definitions[0].markup, "<path d=\"M10 20v-6h4v6\"/>");
        assert_eq!(set.definitions[1].name, "nested");
        assert_eq!(
            set.definitions[1].markup,
            "<g transform=\"scale(2)\">\n  <g><circle r=\"1\"/></g>\n</g>"
        );
    }

    #[test]
    fn test_empty_defs() {
        let doc = "<iron-iconset-svg name=\"x\" size=\"16\">\n<svg>\n<defs>\n</defs>\n</svg>\n</iron-icon-set>";
        let set = ContainerParser::new(doc).parse().unwrap();

        assert!(set.is_empty());
        assert_eq!(set.size, 16);
    }

    #[test]
    fn test_groups_outside_defs_are_ignored() {
        let doc = concat!(
            "<iron-iconset-svg name=\"x\" size=\"16\">\n",
            "<svg><g id=\"stray\"><path/></g><defs><g id=\"kept\">\n<path/>\n</g><g><path/></g></defs></svg>\n",
            "</iron-icon-set>",
        );
        let set = ContainerParser::new(doc).parse().unwrap();

        let names: Vec<_> = set.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["kept"]);
    }

    #[test]
    fn test_legacy_core_iconset() {
        let doc = concat!(
            "<link rel=\"import\" href=\"core-iconset-svg.html\">\n\n",
            "<core-iconset-svg id=\"old\" iconSize=\"32\">\n",
            "<svg>\n<defs>\n\n<g id=\"a\">\n<rect/>\n</g>\n</defs>\n</svg>\n</core-icon-set>",
        );
        let set = ContainerParser::new(doc).parse().unwrap();

        assert_eq!(set.name, "old");
        assert_eq!(set.size, 32);
        assert_eq!(set.definitions[0].markup, "<rect/>");
    }

    #[test]
    fn test_missing_root_is_malformed() {
        let result = ContainerParser::new("<svg><defs><g id=\"a\"/></defs></svg>").parse();
        assert!(matches!(result, Err(IconError::MalformedContainer(_))));
    }

    #[test]
    fn test_broken_svg_block_is_malformed() {
        let doc = "<iron-iconset-svg size=\"8\"><svg><defs><g id=\"a\"></defs></svg></iron-icon-set>";
        let result = ContainerParser::new(doc).parse();
        assert!(matches!(result, Err(IconError::MalformedContainer(_))));
    }

    #[test]
    fn test_empty_group_definition() {
        let doc = "<iron-iconset-svg size=\"8\"><svg><defs><g id=\"blank\"/></defs></svg></iron-icon-set>";
        let set = ContainerParser::new(doc).parse().unwrap();

        assert_eq!(set.definitions, vec![IconDefinition::new("blank", "")]);
        assert_eq!(set.name, "");
    }

    #[test]
    fn test_strip_wrapping() {
        assert_eq!(strip_wrapping("\n<path/>\n"), "<path/>");
        assert_eq!(strip_wrapping("\n  \n  <path/>\n  "), "  <path/>");
        assert_eq!(strip_wrapping("<path/>"), "<path/>");
        assert_eq!(strip_wrapping("\n \n"), "");
    }
}
