//! Text label injection into SVG documents.
//!
//! The label is spliced in directly before the root `</svg>` tag. The
//! position of that tag is taken from the parsed document tree; only when the
//! document cannot be parsed do we fall back to searching for a trailing
//! `</svg>` in the raw text.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[cfg(feature = "tracing")]
use tracing::instrument;

const ROOT_CLOSE: &str = "</svg>";

/// The document has no place to put the label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedDocumentError {
    #[error("root element is <{0}>, expected <svg>")]
    UnexpectedRoot(String),
    #[error("closing </svg> tag not found at the end of the document")]
    MissingClosingTag,
}

/// Presentation attributes of the injected `<text>` element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font_family: String,
    pub font_weight: String,
    pub text_anchor: String,
    pub fill: String,
    pub stroke_width: u32,
    /// Drawn font size is `font_size * emphasis`.
    pub emphasis: u32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            font_weight: "bold".to_string(),
            text_anchor: "middle".to_string(),
            fill: "black".to_string(),
            stroke_width: 3,
            emphasis: 2,
        }
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Byte offset of the root closing tag, found through the document tree.
fn closing_tag_from_tree(
    document: &str,
    doc: &roxmltree::Document<'_>,
) -> Result<usize, MalformedDocumentError> {
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(MalformedDocumentError::UnexpectedRoot(
            root.tag_name().name().to_string(),
        ));
    }

    // Anything after the root element (comments, PIs) is outside the search.
    let limit = doc
        .root()
        .children()
        .skip_while(|n| *n != root)
        .nth(1)
        .map(|n| n.range().start)
        .unwrap_or(document.len());
    let head = document[..limit].trim_end();

    let pos = head
        .rfind("</")
        .filter(|&p| p > root.range().start)
        .ok_or(MalformedDocumentError::MissingClosingTag)?;
    let name = head[pos + 2..].trim_end_matches('>').trim_end();
    if name == "svg" || name.ends_with(":svg") {
        Ok(pos)
    } else {
        Err(MalformedDocumentError::MissingClosingTag)
    }
}

/// Byte offset of a trailing `</svg>`, found by plain text search.
fn closing_tag_from_text(document: &str) -> Result<usize, MalformedDocumentError> {
    let pos = document
        .rfind(ROOT_CLOSE)
        .ok_or(MalformedDocumentError::MissingClosingTag)?;
    if document[pos + ROOT_CLOSE.len()..].trim().is_empty() {
        Ok(pos)
    } else {
        Err(MalformedDocumentError::MissingClosingTag)
    }
}

fn closing_tag_offset(document: &str) -> Result<usize, MalformedDocumentError> {
    match roxmltree::Document::parse(document) {
        Ok(doc) => closing_tag_from_tree(document, &doc),
        Err(err) => {
            log::warn!("document does not parse ({err}), locating </svg> textually");
            closing_tag_from_text(document)
        }
    }
}

/// Insert a `<text>` label right before the root closing tag.
///
/// Calling this twice adds two labels.
pub fn inject_label(
    document: &str,
    text: &str,
    anchor_x: usize,
    anchor_y: usize,
    font_size: u32,
) -> Result<String, MalformedDocumentError> {
    inject_label_with_style(
        document,
        text,
        anchor_x,
        anchor_y,
        font_size,
        &LabelStyle::default(),
    )
}

/// [`inject_label`] with explicit presentation attributes.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(document, style), fields(len = document.len()))
)]
pub fn inject_label_with_style(
    document: &str,
    text: &str,
    anchor_x: usize,
    anchor_y: usize,
    font_size: u32,
    style: &LabelStyle,
) -> Result<String, MalformedDocumentError> {
    let pos = closing_tag_offset(document)?;

    let element = format!(
        concat!(
            "\n  <!-- Text Labels -->\n",
            "  <text x=\"{x}\" y=\"{y}\" font-family=\"{family}\" font-size=\"{size}\" ",
            "font-weight=\"{weight}\" text-anchor=\"{anchor}\" fill=\"{fill}\" ",
            "stroke-width=\"{stroke}\">{text}</text>\n"
        ),
        x = anchor_x,
        y = anchor_y,
        family = escape(&style.font_family),
        size = u64::from(font_size) * u64::from(style.emphasis),
        weight = escape(&style.font_weight),
        anchor = escape(&style.text_anchor),
        fill = escape(&style.fill),
        stroke = style.stroke_width,
        text = escape(text),
    );

    let mut out = String::with_capacity(document.len() + element.len());
    out.push_str(&document[..pos]);
    out.push_str(&element);
    out.push_str(&document[pos..]);
    Ok(out)
}
