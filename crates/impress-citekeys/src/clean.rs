//! Cite key character cleaning
//!
//! Keys are reduced to a conservative character set that every BibTeX and
//! biblatex toolchain accepts.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// Letters that have no canonical decomposition
const FOLDED_LETTERS: &[(char, &str)] = &[
    ('ß', "ss"),
    ('Æ', "AE"),
    ('æ', "ae"),
    ('Œ', "OE"),
    ('œ', "oe"),
    ('Ø', "O"),
    ('ø', "o"),
    ('Ł', "L"),
    ('ł', "l"),
    ('Đ', "D"),
    ('đ', "d"),
    ('Ð', "D"),
    ('ð', "d"),
    ('Þ', "TH"),
    ('þ', "th"),
    ('ı', "i"),
];

/// Characters allowed in a cleaned key besides ASCII letters and digits
const SAFE_PUNCTUATION: &str = "-_!$*+./:;?[]";

/// Strip accents and fold special letters to ASCII
pub fn remove_diacritics(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.nfkd().filter(|c| !is_combining_mark(*c)) {
        match FOLDED_LETTERS.iter().find(|(letter, _)| *letter == c) {
            Some((_, ascii)) => folded.push_str(ascii),
            None => folded.push(c),
        }
    }
    folded
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || SAFE_PUNCTUATION.contains(c)
}

/// Reduce a candidate key to the safe character set
pub fn clean_key(s: &str) -> String {
    remove_diacritics(s)
        .chars()
        .filter(|c| is_safe(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split text on whitespace and clean every word, dropping empties
pub fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(clean_key)
        .filter(|word| !word.is_empty())
        .collect()
}
