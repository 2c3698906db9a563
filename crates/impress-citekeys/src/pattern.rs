//! Cite key pattern parser
//!
//! A pattern is a `|`-separated list of alternative templates. Each template
//! is literal text mixed with bracketed directives:
//!
//! | Directive | Meaning |
//! |-----------|---------|
//! | `[auth]` | First author's family name |
//! | `[auth3]` | ... truncated to 3 characters |
//! | `[auth3_1]` | Second author's family name, truncated to 3 characters |
//! | `[edtr]` | Same as `auth`, editors only |
//! | `[year:(nd)]` | Year, `nd` when there is none |
//! | `[title:lower]` | Function output passed through filters |
//!
//! Parsing never fails: text that does not form a directive (an unterminated
//! `[`, an empty `[]`) stays literal.

use crate::functions::Function;
use lazy_static::lazy_static;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::map,
    multi::{many0, separated_list1},
    sequence::delimited,
    IResult,
};
use regex::Regex;

lazy_static! {
    static ref NAME_N_M: Regex = Regex::new(r"^([^0-9]+)([0-9]+)_([0-9]+)$").unwrap();
    static ref NAME_N: Regex = Regex::new(r"^([^0-9]+)([0-9]+)$").unwrap();
}

/// A parsed cite key pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub alternatives: Vec<Template>,
}

/// One `|`-separated alternative
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Directive(Directive),
}

/// A bracketed directive such as `[auth3_1:lower]`
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Function name after suffix removal and editor rewriting
    pub name: String,
    /// Name as written, used for the record field fallback
    pub property: String,
    /// N: character or item limit
    pub repeat: Option<usize>,
    /// M: zero-based item index
    pub index: Option<usize>,
    pub only_editors: bool,
    pub function: Function,
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `(text)`: substituted when the value is empty at this point
    Default(String),
    Named(NamedFilter),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedFilter {
    /// Remove whitespace
    Condense,
    /// First character of every word
    Abbr,
    Lower,
    Upper,
}

impl NamedFilter {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "condense" => Some(Self::Condense),
            "abbr" => Some(Self::Abbr),
            "lower" => Some(Self::Lower),
            "upper" => Some(Self::Upper),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Condense => "condense",
            Self::Abbr => "abbr",
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }

    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::Condense => value.chars().filter(|c| !c.is_whitespace()).collect(),
            Self::Abbr => value
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .collect(),
            Self::Lower => value.to_lowercase(),
            Self::Upper => value.to_uppercase(),
        }
    }
}

impl Filter {
    fn parse(text: &str) -> Self {
        if text.len() >= 2 && text.starts_with('(') && text.ends_with(')') {
            return Self::Default(text[1..text.len() - 1].to_string());
        }
        match NamedFilter::from_name(text) {
            Some(filter) => Self::Named(filter),
            None => Self::Unknown(text.to_string()),
        }
    }
}

impl Directive {
    /// Build a directive from the text between the brackets
    pub fn parse(command: &str) -> Self {
        let mut parts = command.split(':');
        let property = parts.next().unwrap_or_default().to_string();
        let filters = parts.map(Filter::parse).collect();

        let (base, repeat, index) = split_numeric_suffix(&property);
        let (name, only_editors) = if let Some(rest) = base.strip_prefix("edtr") {
            (format!("auth{}", rest), true)
        } else if let Some(rest) = base.strip_prefix("editors") {
            (format!("authors{}", rest), true)
        } else {
            (base.to_string(), false)
        };

        Self {
            function: Function::from_name(&name),
            name,
            property,
            repeat,
            index,
            only_editors,
            filters,
        }
    }
}

/// `auth3_1` -> (`auth`, 3, 1); `auth3` -> (`auth`, 3, -)
fn split_numeric_suffix(name: &str) -> (&str, Option<usize>, Option<usize>) {
    if let Some(caps) = NAME_N_M.captures(name) {
        if let (Some(base), Some(n), Some(m)) = (caps.get(1), caps.get(2), caps.get(3)) {
            return (base.as_str(), n.as_str().parse().ok(), m.as_str().parse().ok());
        }
    }
    if let Some(caps) = NAME_N.captures(name) {
        if let (Some(base), Some(n)) = (caps.get(1), caps.get(2)) {
            return (base.as_str(), n.as_str().parse().ok(), None);
        }
    }
    (name, None, None)
}

impl Template {
    fn new(segments: Vec<Segment>) -> Self {
        // Stray brackets arrive as separate literals; merge neighbours
        let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
        for segment in segments {
            if let Segment::Literal(more) = &segment {
                if let Some(Segment::Literal(text)) = merged.last_mut() {
                    text.push_str(more);
                    continue;
                }
            }
            merged.push(segment);
        }
        Self { segments: merged }
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Directive(directive) => Some(directive),
            Segment::Literal(_) => None,
        })
    }
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        match alternatives(pattern) {
            Ok((_, alternatives)) => Self { alternatives },
            Err(_) => Self {
                alternatives: vec![Template::new(vec![Segment::Literal(pattern.to_string())])],
            },
        }
    }
}

// ===== Grammar =====

fn directive(input: &str) -> IResult<&str, Segment> {
    map(
        delimited(
            char('['),
            take_while1(|c: char| c != ']' && c != '|'),
            char(']'),
        ),
        |command: &str| Segment::Directive(Directive::parse(command)),
    )(input)
}

fn literal(input: &str) -> IResult<&str, Segment> {
    map(
        alt((take_while1(|c: char| c != '[' && c != '|'), tag("["))),
        |text: &str| Segment::Literal(text.to_string()),
    )(input)
}

fn template(input: &str) -> IResult<&str, Template> {
    map(many0(alt((directive, literal))), Template::new)(input)
}

fn alternatives(input: &str) -> IResult<&str, Vec<Template>> {
    separated_list1(char('|'), template)(input)
}
