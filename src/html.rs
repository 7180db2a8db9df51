//! Iconset document writer.
//!
//! Produces the `iron-iconset-svg` document consumed by the web component:
//!
//! ```text
//! <link rel="import" href="{import_path}">
//!
//! <iron-iconset-svg name="{name}" size="{size}">
//! <svg>
//! <defs>
//! <g id="{icon}">
//! {markup}
//! </g>
//! </defs>
//! </svg>
//! </iron-icon-set>
//! ```
//!
//! The closing tag deliberately does not match the opening one. Existing
//! documents have always been written this way and consumers rely on it.

use std::fmt::Write;

use quick_xml::escape::escape;
use tracing::trace;

use crate::converter::{Converter, ConverterConfig};
use crate::error::IconResult;
use crate::types::IconSet;

/// Root element of iconset documents.
pub const ICONSET_ELEMENT: &str = "iron-iconset-svg";

/// Closing tag written after the definitions.
pub const ICONSET_CLOSING_ELEMENT: &str = "iron-icon-set";

/// Converter that produces an iconset document.
#[derive(Debug, Clone, Default)]
pub struct HtmlConverter {
    config: ConverterConfig,
}

impl HtmlConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }
}

impl Converter for HtmlConverter {
    type Output = String;

    fn convert(&self, set: &IconSet) -> IconResult<Self::Output> {
        let markup_len: usize = set.definitions.iter().map(|def| def.markup.len()).sum();
        let mut html = String::with_capacity(markup_len + 64 * set.len() + 256);

        if let Some(comment) = &self.config.comment {
            let _ = writeln!(html, "<!-- {} -->", comment_text(comment));
        }

        let _ = write!(
            html,
            "<link rel=\"import\" href=\"{}\">\n\n<{} name=\"{}\" size=\"{}\">\n<svg>\n<defs>\n",
            escape(set.import_path.as_str()),
            ICONSET_ELEMENT,
            escape(set.name.as_str()),
            set.size
        );

        for def in &set.definitions {
            let _ = write!(
                html,
                "<g id=\"{}\">\n{}\n</g>\n",
                escape(def.name.as_str()),
                def.markup
            );
        }

        let _ = write!(html, "</defs>\n</svg>\n</{}>", ICONSET_CLOSING_ELEMENT);

        trace!("Rendered iconset '{}' ({} bytes)", set.name, html.len());
        Ok(html)
    }
}

/// Separates consecutive hyphens, which may not appear inside an XML comment.
fn comment_text(comment: &str) -> String {
    let mut text = String::with_capacity(comment.len());
    for c in comment.chars() {
        if c == '-' && text.ends_with('-') {
            text.push(' ');
        }
        text.push(c);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IconDefinition;
    use pretty_assertions::assert_eq;

    fn sample_set() -> IconSet {
        let mut set = IconSet::new("icons", 32, "lib/iron-iconset-svg.html");
        set.definitions.push(IconDefinition::new("a", r#"<path d="M0 0"/>"#));
        set.definitions.push(IconDefinition::new("b", r#"<circle r="1"/>"#));
        set
    }

    #[test]
    fn test_render_document() {
        let html = HtmlConverter::new().convert(&sample_set()).unwrap();

        assert_eq!(
            html,
            concat!(
                "<link rel=\"import\" href=\"lib/iron-iconset-svg.html\">\n",
                "\n",
                "<iron-iconset-svg name=\"icons\" size=\"32\">\n",
                "<svg>\n",
                "<defs>\n",
                "<g id=\"a\">\n",
                "<path d=\"M0 0\"/>\n",
                "</g>\n",
                "<g id=\"b\">\n",
                "<circle r=\"1\"/>\n",
                "</g>\n",
                "</defs>\n",
                "</svg>\n",
                "</iron-icon-set>",
            )
        );
    }

    #[test]
    fn test_render_comment() {
        let config = ConverterConfig::new().with_comment(Some("generated -- do not edit".into()));
        let html = HtmlConverter::with_config(config).convert(&sample_set()).unwrap();

        assert!(html.starts_with("<!-- generated - - do not edit -->\n<link rel=\"import\""));
    }

    #[test]
    fn test_comment_hyphen_runs() {
        assert_eq!(comment_text("a---b"), "a- - -b");
        assert_eq!(comment_text("a-b"), "a-b");
        assert!(!comment_text("----").contains("--"));
    }

    #[test]
    fn test_render_escapes_attributes() {
        let mut set = IconSet::new("a&b", 24, "x.html");
        set.definitions.push(IconDefinition::new("say-\"hi\"", "<path/>"));
        let html = HtmlConverter::new().convert(&set).unwrap();

        assert!(html.contains("name=\"a&amp;b\""));
        assert!(html.contains("<g id=\"say-&quot;hi&quot;\">"));
    }
}
