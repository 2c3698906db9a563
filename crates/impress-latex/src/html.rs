//! html -> LaTeX conversion
//!
//! The library's rich-text fields use a fixed tag vocabulary. Tags are
//! matched with an explicit open-tag stack so that malformed input (stray
//! closes, out-of-order closes, unclosed tags) still yields balanced LaTeX.

use crate::chars::{escape_text, LatexMode};
use lazy_static::lazy_static;
use regex::Regex;

/// Nesting limit for open tags within one conversion
pub const MAX_TAG_DEPTH: usize = 64;

/// The supported markup vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlTag {
    Sup,
    Sub,
    I,
    B,
    P,
    Span,
    Br,
    Break,
}

impl HtmlTag {
    /// Parse a tag name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sup" => Some(Self::Sup),
            "sub" => Some(Self::Sub),
            "i" => Some(Self::I),
            "b" => Some(Self::B),
            "p" => Some(Self::P),
            "span" => Some(Self::Span),
            "br" => Some(Self::Br),
            "break" => Some(Self::Break),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sup => "sup",
            Self::Sub => "sub",
            Self::I => "i",
            Self::B => "b",
            Self::P => "p",
            Self::Span => "span",
            Self::Br => "br",
            Self::Break => "break",
        }
    }

    /// LaTeX emitted for the opening tag
    pub fn open(&self) -> &'static str {
        match self {
            Self::Sup => "\\ensuremath{^{",
            Self::Sub => "\\ensuremath{_{",
            Self::I => "\\emph{",
            Self::B => "\\textbf{",
            Self::P | Self::Br | Self::Break => "\n\n",
            Self::Span => "",
        }
    }

    /// LaTeX emitted for the closing tag
    pub fn close(&self) -> &'static str {
        match self {
            Self::Sup | Self::Sub => "}}",
            Self::I | Self::B => "}",
            Self::P => "\n\n",
            Self::Span | Self::Br | Self::Break => "",
        }
    }

    /// Void tags never take a closing tag and are never stacked
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Br | Self::Break)
    }
}

/// Recoverable anomaly found while converting markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupWarning {
    /// A closing tag with no matching open tag; dropped
    UnexpectedClose { tag: String },
    /// A closing tag that forced inner tags closed (innermost first)
    ImplicitlyClosed { tag: String, closed: Vec<String> },
    /// Tags still open at the end of input (innermost first)
    Unclosed { tags: Vec<String> },
    /// An opening tag beyond `MAX_TAG_DEPTH`; dropped
    TooDeep { tag: String },
}

impl std::fmt::Display for MarkupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedClose { tag } => write!(f, "Ignoring unexpected close tag \"{}\"", tag),
            Self::ImplicitlyClosed { tag, closed } => write!(
                f,
                "Unexpected close tag \"{}\", closing \"{}\"",
                tag,
                closed.join(", ")
            ),
            Self::Unclosed { tags } => write!(f, "Unmatched HTML tags: {}", tags.join(", ")),
            Self::TooDeep { tag } => write!(
                f,
                "Ignoring \"{}\", tags nested deeper than {}",
                tag, MAX_TAG_DEPTH
            ),
        }
    }
}

/// Result of a conversion: the LaTeX text and any anomalies found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub latex: String,
    pub warnings: Vec<MarkupWarning>,
}

lazy_static! {
    static ref PRE: Regex = Regex::new(r"(?is)<pre\b[^>]*>(.*?)</pre\s*>").unwrap();
    static ref TAG: Regex =
        Regex::new(r"(?i)<(/?)(sup|sub|i|b|p|span|br|break)\b([^<>]*?)(/?)>").unwrap();
    static ref SMALL_CAPS: Regex = Regex::new(r"(?i)small-caps").unwrap();
    static ref EMPTY_GROUP_SPACE: Regex = Regex::new(r"\{\}\s+").unwrap();
}

/// A tag on the open stack, with the LaTeX that closes it
#[derive(Debug, Clone, Copy)]
struct OpenTag {
    tag: HtmlTag,
    close: &'static str,
}

/// Open-tag stack local to a single conversion
struct TagStack {
    open: Vec<OpenTag>,
}

impl TagStack {
    fn new() -> Self {
        Self { open: Vec::new() }
    }

    fn push(&mut self, tag: OpenTag) -> bool {
        if self.open.len() >= MAX_TAG_DEPTH {
            return false;
        }
        self.open.push(tag);
        true
    }

    /// Pop up to and including the nearest open `tag`
    ///
    /// Returns the popped tags innermost first, or `None` when `tag` is not open.
    fn close(&mut self, tag: HtmlTag) -> Option<Vec<OpenTag>> {
        let position = self.open.iter().rposition(|open| open.tag == tag)?;
        let mut popped = self.open.split_off(position);
        popped.reverse();
        Some(popped)
    }

    /// Pop everything, innermost first
    fn drain(&mut self) -> Vec<OpenTag> {
        let mut popped = std::mem::take(&mut self.open);
        popped.reverse();
        popped
    }
}

struct Converter {
    mode: LatexMode,
    stack: TagStack,
    warnings: Vec<MarkupWarning>,
}

impl Converter {
    fn new(mode: LatexMode) -> Self {
        Self {
            mode,
            stack: TagStack::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: MarkupWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Convert a chunk outside any `<pre>` block
    fn markup(&mut self, chunk: &str) -> String {
        let mut out = String::with_capacity(chunk.len());
        let mut last = 0;

        for caps in TAG.captures_iter(chunk) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&self.escape(&chunk[last..whole.start()]));
            last = whole.end();

            let Some(tag) = caps.get(2).and_then(|m| HtmlTag::from_name(m.as_str())) else {
                continue;
            };
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let attributes = caps.get(3).map_or("", |m| m.as_str());
            let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());

            if closing {
                self.close_tag(tag, &mut out);
            } else {
                self.open_tag(tag, attributes, self_closing, &mut out);
            }
        }
        out.push_str(&self.escape(&chunk[last..]));
        out
    }

    /// Escape a text run; an empty group left by the table before
    /// whitespace collapses to one space
    fn escape(&self, text: &str) -> String {
        EMPTY_GROUP_SPACE
            .replace_all(&escape_text(text, self.mode), " ")
            .into_owned()
    }

    fn open_tag(&mut self, tag: HtmlTag, attributes: &str, self_closing: bool, out: &mut String) {
        let (open, close) = if tag == HtmlTag::Span && SMALL_CAPS.is_match(attributes) {
            ("\\textsc{", "}")
        } else {
            (tag.open(), tag.close())
        };

        if tag.is_void() {
            out.push_str(open);
            return;
        }

        if self_closing {
            out.push_str(open);
            out.push_str(close);
            return;
        }

        if self.stack.push(OpenTag { tag, close }) {
            out.push_str(open);
        } else {
            self.warn(MarkupWarning::TooDeep {
                tag: tag.name().to_string(),
            });
        }
    }

    fn close_tag(&mut self, tag: HtmlTag, out: &mut String) {
        let Some(popped) = self.stack.close(tag) else {
            self.warn(MarkupWarning::UnexpectedClose {
                tag: tag.name().to_string(),
            });
            return;
        };

        if popped.len() > 1 {
            let closed = popped[..popped.len() - 1]
                .iter()
                .map(|open| open.tag.name().to_string())
                .collect();
            self.warn(MarkupWarning::ImplicitlyClosed {
                tag: tag.name().to_string(),
                closed,
            });
        }

        for open in &popped {
            out.push_str(open.close);
        }
    }

    /// Force-close whatever is still open
    fn finish(&mut self, out: &mut String) {
        let popped = self.stack.drain();
        if popped.is_empty() {
            return;
        }

        self.warn(MarkupWarning::Unclosed {
            tags: popped.iter().map(|open| open.tag.name().to_string()).collect(),
        });
        for open in &popped {
            out.push_str(open.close);
        }
    }
}

/// Convert rich-text markup to LaTeX, reporting anomalies
///
/// `<pre>` blocks are copied verbatim without their wrapper tags.
pub fn convert_html(html: &str, mode: LatexMode) -> Conversion {
    let mut converter = Converter::new(mode);
    let mut latex = String::with_capacity(html.len());
    let mut last = 0;

    for caps in PRE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        latex.push_str(&converter.markup(&html[last..whole.start()]));
        latex.push_str(caps.get(1).map_or("", |m| m.as_str()));
        last = whole.end();
    }
    latex.push_str(&converter.markup(&html[last..]));
    converter.finish(&mut latex);

    Conversion {
        latex,
        warnings: converter.warnings,
    }
}

/// Convert rich-text markup to LaTeX
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn html_to_latex(html: &str, mode: LatexMode) -> String {
    convert_html(html, mode).latex
}
