//! Rich-text markup <-> LaTeX conversion
//!
//! Library fields carry a small HTML-like markup (`<i>`, `<b>`, `<sup>`,
//! `<sub>`, small-caps spans). This crate provides:
//! - html -> LaTeX conversion with tag-stack recovery for malformed input
//! - Unicode -> LaTeX character escaping (full table or specials only)
//! - A best-effort LaTeX -> html reverse mapping for the formatting subset
//! - LaTeX -> Unicode decoding of the character table
//! - URL escaping for `\url`/`\href`

mod chars;
mod html;
mod markup;
mod url;

pub use chars::{escape_text, latex_to_unicode, lookup, LatexChar, LatexMode};
pub use html::{convert_html, html_to_latex, Conversion, HtmlTag, MarkupWarning, MAX_TAG_DEPTH};
pub use markup::latex_to_html;
pub use url::{minimal_escape, url_to_latex};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
