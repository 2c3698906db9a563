//! Built-in key pattern functions
//!
//! Each function reads one aspect of a record (creators, title, date,
//! pages, tags) and yields a string, empty when the data is missing.

use crate::clean::words;
use impress_records::{parse_date, primary_creator_role, CreatorRole, Record, TypeMap};
use lazy_static::lazy_static;
use regex::Regex;

/// Words skipped by `shorttitle` / `veryshorttitle`
///
/// Articles, prepositions and conjunctions in English, German, Spanish and
/// French. Matched case-insensitively.
pub const STOP_WORDS: &[&str] = &[
    "a", "aboard", "about", "above", "across", "after", "against", "al", "along", "amid",
    "among", "an", "and", "anti", "around", "as", "at", "before", "behind", "below",
    "beneath", "beside", "besides", "between", "beyond", "but", "by", "d", "das", "de",
    "del", "der", "des", "despite", "die", "do", "down", "during", "ein", "eine", "einem",
    "einen", "einer", "eines", "el", "except", "for", "from", "in", "is", "inside", "into",
    "l", "la", "las", "le", "like", "los", "near", "nor", "of", "off", "on", "onto", "or",
    "over", "past", "per", "plus", "round", "save", "since", "so", "some", "than", "the",
    "through", "to", "toward", "towards", "un", "una", "unas", "under", "underneath", "une",
    "unlike", "uno", "unos", "until", "up", "upon", "versus", "via", "while", "with",
    "within", "without", "yet",
];

lazy_static! {
    static ref FIRST_PAGE: Regex = Regex::new(r"^([0-9]+)").unwrap();
    static ref LAST_PAGE: Regex = Regex::new(r"([0-9]+)[^0-9]*$").unwrap();
}

/// A pattern function, resolved from its name at parse time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    Id,
    Key,
    /// Mth creator's family name, truncated to N characters
    Auth,
    Type,
    AuthorLast,
    /// Family names joined by `.`, at most N followed by `EtAl`
    Authors,
    AuthorsAlpha,
    AuthIni,
    AuthorIni,
    AuthAuthEa,
    AuthEtal,
    AuthShort,
    FirstPage,
    LastPage,
    /// Nth tag
    Keyword,
    ShortTitle,
    VeryShortTitle,
    ShortYear,
    Year,
    Month,
    Title,
    Unknown(String),
}

impl Function {
    pub fn from_name(name: &str) -> Self {
        match name {
            "id" => Self::Id,
            "key" => Self::Key,
            "auth" => Self::Auth,
            "type" => Self::Type,
            "authorLast" => Self::AuthorLast,
            "authors" => Self::Authors,
            "authorsAlpha" => Self::AuthorsAlpha,
            "authIni" => Self::AuthIni,
            "authorIni" => Self::AuthorIni,
            "auth.auth.ea" => Self::AuthAuthEa,
            "auth.etal" => Self::AuthEtal,
            "authshort" => Self::AuthShort,
            "firstpage" => Self::FirstPage,
            "lastpage" => Self::LastPage,
            "keyword" => Self::Keyword,
            "shorttitle" => Self::ShortTitle,
            "veryshorttitle" => Self::VeryShortTitle,
            "shortyear" => Self::ShortYear,
            "year" => Self::Year,
            "month" => Self::Month,
            "title" => Self::Title,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Id => "id",
            Self::Key => "key",
            Self::Auth => "auth",
            Self::Type => "type",
            Self::AuthorLast => "authorLast",
            Self::Authors => "authors",
            Self::AuthorsAlpha => "authorsAlpha",
            Self::AuthIni => "authIni",
            Self::AuthorIni => "authorIni",
            Self::AuthAuthEa => "auth.auth.ea",
            Self::AuthEtal => "auth.etal",
            Self::AuthShort => "authshort",
            Self::FirstPage => "firstpage",
            Self::LastPage => "lastpage",
            Self::Keyword => "keyword",
            Self::ShortTitle => "shorttitle",
            Self::VeryShortTitle => "veryshorttitle",
            Self::ShortYear => "shortyear",
            Self::Year => "year",
            Self::Month => "month",
            Self::Title => "title",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Evaluate against a record
    ///
    /// `n` and `m` are the numeric suffixes of the directive name
    /// (`auth3_1` gives n = 3, m = 1).
    pub fn evaluate(
        &self,
        record: &Record,
        types: &TypeMap,
        only_editors: bool,
        n: Option<usize>,
        m: Option<usize>,
    ) -> String {
        // A zero length behaves like no limit
        let limit = n.filter(|n| *n > 0);

        match self {
            Self::Id => record.item_id.clone(),
            Self::Key => record.key.clone(),
            Self::Type => types.to_output(record),
            Self::Auth => {
                let creators = CreatorBuckets::new(record);
                creators
                    .select(only_editors)
                    .get(m.unwrap_or(0))
                    .map(|name| truncate(name, limit))
                    .unwrap_or_default()
            }
            Self::AuthorLast => {
                let creators = CreatorBuckets::new(record);
                creators
                    .select(only_editors)
                    .last()
                    .map(|name| name.to_string())
                    .unwrap_or_default()
            }
            Self::Authors => {
                let creators = CreatorBuckets::new(record);
                let names = creators.select(only_editors);
                match limit {
                    Some(n) if names.len() > n => {
                        let mut shown = names[..n].to_vec();
                        shown.push("EtAl");
                        shown.join(".")
                    }
                    _ => names.join("."),
                }
            }
            Self::AuthorsAlpha => {
                let creators = CreatorBuckets::new(record);
                let names = creators.select(only_editors);
                match names.len() {
                    0 => String::new(),
                    1 => truncate(names[0], Some(3)),
                    2..=4 => names.iter().map(|name| initial(name)).collect(),
                    _ => {
                        let mut alpha: String =
                            names[..3].iter().map(|name| initial(name)).collect();
                        alpha.push('+');
                        alpha
                    }
                }
            }
            Self::AuthIni => {
                let creators = CreatorBuckets::new(record);
                creators
                    .select(only_editors)
                    .iter()
                    .map(|name| truncate(name, limit))
                    .collect::<Vec<_>>()
                    .join(".")
            }
            Self::AuthorIni => {
                let creators = CreatorBuckets::new(record);
                let names = creators.select(only_editors);
                let Some((first, rest)) = names.split_first() else {
                    return String::new();
                };
                std::iter::once(truncate(first, Some(5)))
                    .chain(
                        rest.iter()
                            .map(|name| name.split_whitespace().map(initial).collect::<String>()),
                    )
                    .collect::<Vec<_>>()
                    .join(".")
            }
            Self::AuthAuthEa => {
                let creators = CreatorBuckets::new(record);
                let names = creators.select(only_editors);
                let mut parts: Vec<&str> = names.iter().take(2).copied().collect();
                if names.len() > 2 {
                    parts.push("ea");
                }
                parts.join(".")
            }
            Self::AuthEtal => {
                let creators = CreatorBuckets::new(record);
                let names = creators.select(only_editors);
                if names.len() == 2 {
                    return names.join(".");
                }
                let mut parts: Vec<&str> = names.iter().take(1).copied().collect();
                if names.len() > 1 {
                    parts.push("etal");
                }
                parts.join(".")
            }
            Self::AuthShort => {
                let creators = CreatorBuckets::new(record);
                let names = creators.select(only_editors);
                match names.len() {
                    0 => String::new(),
                    1 => names[0].to_string(),
                    len => {
                        let mut short = names
                            .iter()
                            .map(|name| initial(name))
                            .collect::<Vec<_>>()
                            .join(".");
                        if len > 3 {
                            short.push('+');
                        }
                        short
                    }
                }
            }
            Self::FirstPage => capture(&FIRST_PAGE, &record.pages),
            Self::LastPage => capture(&LAST_PAGE, &record.pages),
            Self::Keyword => n
                .and_then(|i| record.tags.get(i))
                .map(|tag| tag.tag.clone())
                .unwrap_or_default(),
            Self::ShortTitle => title_words(&record.title, true).into_iter().take(3).collect(),
            Self::VeryShortTitle => title_words(&record.title, true).into_iter().take(1).collect(),
            Self::ShortYear => match parse_date(&record.date).year {
                Some(year) => format!("{:02}", year.rem_euclid(100)),
                None => String::new(),
            },
            // Unparseable dates are used as they are
            Self::Year => match parse_date(&record.date).year {
                Some(year) => year.to_string(),
                None => record.date.clone(),
            },
            Self::Month => {
                let date = parse_date(&record.date);
                if date.year.is_none() {
                    return String::new();
                }
                date.month_macro().map(str::to_string).unwrap_or_default()
            }
            Self::Title => title_words(&record.title, false).concat(),
            Self::Unknown(_) => String::new(),
        }
    }
}

/// Creator family names sorted into role buckets, in declaration order
#[derive(Debug, Default)]
pub struct CreatorBuckets<'a> {
    pub authors: Vec<&'a str>,
    pub editors: Vec<&'a str>,
    pub collaborators: Vec<&'a str>,
    pub translators: Vec<&'a str>,
}

impl<'a> CreatorBuckets<'a> {
    pub fn new(record: &'a Record) -> Self {
        let primary = primary_creator_role(&record.item_type);
        let mut buckets = Self::default();

        for creator in &record.creators {
            let name = creator.last_name.trim();
            if name.is_empty() {
                continue;
            }
            if creator.role.is_editor() {
                buckets.editors.push(name);
            } else if creator.role == CreatorRole::Translator {
                buckets.translators.push(name);
            } else if creator.role == primary {
                buckets.authors.push(name);
            } else {
                buckets.collaborators.push(name);
            }
        }

        buckets
    }

    /// Names a generic "authors" request resolves to
    ///
    /// With `only_editors` only the editor bucket is considered. Otherwise
    /// the first non-empty of authors, editors, collaborators, translators.
    pub fn select(&self, only_editors: bool) -> &[&'a str] {
        if only_editors {
            return &self.editors;
        }
        [
            &self.authors,
            &self.editors,
            &self.collaborators,
            &self.translators,
        ]
        .into_iter()
        .find(|bucket| !bucket.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
    }
}

/// Title words for key building
///
/// With `short` set, every non-ASCII-letter is removed from each word and
/// stop words are skipped.
pub fn title_words(title: &str, short: bool) -> Vec<String> {
    words(title)
        .into_iter()
        .map(|word| {
            if short {
                word.chars().filter(char::is_ascii_alphabetic).collect()
            } else {
                word
            }
        })
        .filter(|word: &String| !word.is_empty())
        .filter(|word| !short || !is_stop_word(word))
        .collect()
}

pub fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

fn truncate(s: &str, n: Option<usize>) -> String {
    match n {
        Some(n) => s.chars().take(n).collect(),
        None => s.to_string(),
    }
}

fn initial(s: &str) -> String {
    truncate(s, Some(1))
}

fn capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
