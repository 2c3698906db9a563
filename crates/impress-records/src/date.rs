//! Loose date parsing
//!
//! Library dates are free text ("2020-03-01", "March 2020", "3/1/2020",
//! "Spring 1999"). Only the parts the exporter needs are extracted.

use lazy_static::lazy_static;
use regex::Regex;

/// Three-letter BibTeX month macros, indexed by zero-based month
pub const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Components recovered from a free-text date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedDate {
    pub year: Option<i32>,
    /// Zero-based month (0 = January)
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl ParsedDate {
    /// BibTeX month macro for the parsed month
    pub fn month_macro(&self) -> Option<&'static str> {
        self.month.and_then(|m| MONTHS.get(m as usize).copied())
    }
}

lazy_static! {
    static ref ISO_DATE: Regex =
        Regex::new(r"^(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?(?:[T\s]|$)").unwrap();
    static ref SLASH_DATE: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap();
    static ref DOT_DATE: Regex = Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})\b").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
    static ref MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?"
    )
    .unwrap();
    static ref DAY: Regex = Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\b").unwrap();
}

/// Parse a free-text date
pub fn parse_date(input: &str) -> ParsedDate {
    let input = input.trim();
    if input.is_empty() {
        return ParsedDate::default();
    }

    if let Some(caps) = ISO_DATE.captures(input) {
        return ParsedDate {
            year: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            month: month_index(caps.get(2).map(|m| m.as_str())),
            day: day_number(caps.get(3).map(|m| m.as_str())),
        };
    }

    if let Some(caps) = SLASH_DATE.captures(input) {
        return ParsedDate {
            year: caps.get(3).and_then(|m| m.as_str().parse().ok()),
            month: month_index(caps.get(1).map(|m| m.as_str())),
            day: day_number(caps.get(2).map(|m| m.as_str())),
        };
    }

    if let Some(caps) = DOT_DATE.captures(input) {
        return ParsedDate {
            year: caps.get(3).and_then(|m| m.as_str().parse().ok()),
            month: month_index(caps.get(2).map(|m| m.as_str())),
            day: day_number(caps.get(1).map(|m| m.as_str())),
        };
    }

    let year = YEAR
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let month_match = MONTH_NAME.captures(input).and_then(|caps| caps.get(1));
    let month = month_match.and_then(|m| {
        let abbr = m.as_str().to_lowercase();
        MONTHS.iter().position(|name| *name == abbr).map(|i| i as u32)
    });

    // A day only makes sense next to a month name
    let day = if month.is_some() {
        DAY.captures_iter(input)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| day_number(Some(m.as_str())))
    } else {
        None
    };

    ParsedDate { year, month, day }
}

fn month_index(value: Option<&str>) -> Option<u32> {
    let month: u32 = value?.parse().ok()?;
    if (1..=12).contains(&month) {
        Some(month - 1)
    } else {
        None
    }
}

fn day_number(value: Option<&str>) -> Option<u32> {
    let day: u32 = value?.parse().ok()?;
    if (1..=31).contains(&day) {
        Some(day)
    } else {
        None
    }
}
