//! Unicode <-> LaTeX character table
//!
//! Two tables share one source list: the Unicode table only escapes the
//! characters LaTeX treats specially, the ASCII table additionally spells
//! out accented letters, typographic punctuation and math symbols.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Output character set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum LatexMode {
    /// Keep non-ASCII characters, escape only LaTeX specials
    #[default]
    Unicode,
    /// Spell every known non-ASCII character as a LaTeX command
    Ascii,
}

/// LaTeX spelling of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatexChar {
    pub latex: &'static str,
    /// Must be typeset in math mode
    pub math: bool,
}

// ===== Specials (both modes) =====

const SPECIALS: &[(char, &str)] = &[
    ('\\', "\\textbackslash{}"),
    ('{', "\\{"),
    ('}', "\\}"),
    ('#', "\\#"),
    ('$', "\\$"),
    ('%', "\\%"),
    ('&', "\\&"),
    ('_', "\\_"),
    ('~', "\\textasciitilde{}"),
    ('^', "\\textasciicircum{}"),
    ('<', "\\textless{}"),
    ('>', "\\textgreater{}"),
];

// ===== Text characters (ASCII mode) =====

const TEXT_CHARACTERS: &[(char, &str)] = &[
    // Latin-1 uppercase
    ('À', "{\\`A}"), ('Á', "{\\'A}"), ('Â', "{\\^A}"), ('Ã', "{\\~A}"),
    ('Ä', "{\\\"A}"), ('Å', "{\\AA}"), ('Æ', "{\\AE}"), ('Ç', "{\\c C}"),
    ('È', "{\\`E}"), ('É', "{\\'E}"), ('Ê', "{\\^E}"), ('Ë', "{\\\"E}"),
    ('Ì', "{\\`I}"), ('Í', "{\\'I}"), ('Î', "{\\^I}"), ('Ï', "{\\\"I}"),
    ('Ñ', "{\\~N}"), ('Ò', "{\\`O}"), ('Ó', "{\\'O}"), ('Ô', "{\\^O}"),
    ('Õ', "{\\~O}"), ('Ö', "{\\\"O}"), ('Ø', "{\\O}"), ('Ù', "{\\`U}"),
    ('Ú', "{\\'U}"), ('Û', "{\\^U}"), ('Ü', "{\\\"U}"), ('Ý', "{\\'Y}"),
    ('ß', "{\\ss}"),

    // Latin-1 lowercase
    ('à', "{\\`a}"), ('á', "{\\'a}"), ('â', "{\\^a}"), ('ã', "{\\~a}"),
    ('ä', "{\\\"a}"), ('å', "{\\aa}"), ('æ', "{\\ae}"), ('ç', "{\\c c}"),
    ('è', "{\\`e}"), ('é', "{\\'e}"), ('ê', "{\\^e}"), ('ë', "{\\\"e}"),
    ('ì', "{\\`\\i}"), ('í', "{\\'\\i}"), ('î', "{\\^\\i}"), ('ï', "{\\\"\\i}"),
    ('ñ', "{\\~n}"), ('ò', "{\\`o}"), ('ó', "{\\'o}"), ('ô', "{\\^o}"),
    ('õ', "{\\~o}"), ('ö', "{\\\"o}"), ('ø', "{\\o}"), ('ù', "{\\`u}"),
    ('ú', "{\\'u}"), ('û', "{\\^u}"), ('ü', "{\\\"u}"), ('ý', "{\\'y}"),
    ('ÿ', "{\\\"y}"),

    // Latin Extended-A
    ('ą', "{\\k a}"), ('Ą', "{\\k A}"), ('ć', "{\\'c}"), ('Ć', "{\\'C}"),
    ('č', "{\\v c}"), ('Č', "{\\v C}"), ('ď', "{\\v d}"), ('ę', "{\\k e}"),
    ('Ę', "{\\k E}"), ('ě', "{\\v e}"), ('ğ', "{\\u g}"), ('ı', "{\\i}"),
    ('ł', "{\\l}"), ('Ł', "{\\L}"), ('ń', "{\\'n}"), ('ň', "{\\v n}"),
    ('ő', "{\\H o}"), ('Ő', "{\\H O}"), ('œ', "{\\oe}"), ('Œ', "{\\OE}"),
    ('ř', "{\\v r}"), ('Ř', "{\\v R}"), ('ś', "{\\'s}"), ('Ś', "{\\'S}"),
    ('š', "{\\v s}"), ('Š', "{\\v S}"), ('ş', "{\\c s}"), ('Ş', "{\\c S}"),
    ('ť', "{\\v t}"), ('ů', "{\\r u}"), ('ű', "{\\H u}"), ('Ű', "{\\H U}"),
    ('ź', "{\\'z}"), ('Ź', "{\\'Z}"), ('ż', "{\\.z}"), ('Ż', "{\\.Z}"),
    ('ž', "{\\v z}"), ('Ž', "{\\v Z}"),

    // Letters without a decomposition
    ('Đ', "{\\DJ}"), ('đ', "{\\dj}"), ('Ð', "{\\DH}"), ('ð', "{\\dh}"),
    ('Þ', "{\\TH}"), ('þ', "{\\th}"), ('Ŋ', "{\\NG}"), ('ŋ', "{\\ng}"),
    ('ȷ', "{\\j}"),

    // Punctuation and symbols
    ('\u{2013}', "--"),
    ('\u{2014}', "---"),
    ('\u{2018}', "`"),
    ('\u{2019}', "'"),
    ('\u{201C}', "``"),
    ('\u{201D}', "''"),
    ('\u{2026}', "\\ldots{}"),
    ('\u{00A0}', "~"),
    ('§', "{\\S}"),
    ('¶', "{\\P}"),
    ('©', "\\textcopyright{}"),
    ('®', "\\textregistered{}"),
    ('™', "\\texttrademark{}"),
    ('£', "{\\pounds}"),
    ('€', "\\texteuro{}"),
    ('†', "\\dag{}"),
    ('‡', "\\ddag{}"),
    ('•', "\\textbullet{}"),
    ('«', "\\guillemotleft{}"),
    ('»', "\\guillemotright{}"),
    ('¿', "?`"),
    ('¡', "!`"),
    ('°', "\\textdegree{}"),
];

// ===== Math symbols (ASCII mode) =====

const MATH_SYMBOLS: &[(char, &str)] = &[
    // Greek letters (lowercase)
    ('α', "\\alpha"), ('β', "\\beta"), ('γ', "\\gamma"), ('δ', "\\delta"),
    ('ε', "\\epsilon"), ('ζ', "\\zeta"), ('η', "\\eta"), ('θ', "\\theta"),
    ('ι', "\\iota"), ('κ', "\\kappa"), ('λ', "\\lambda"), ('μ', "\\mu"),
    ('µ', "\\mu"), ('ν', "\\nu"), ('ξ', "\\xi"), ('π', "\\pi"),
    ('ρ', "\\rho"), ('σ', "\\sigma"), ('τ', "\\tau"), ('υ', "\\upsilon"),
    ('φ', "\\phi"), ('χ', "\\chi"), ('ψ', "\\psi"), ('ω', "\\omega"),

    // Greek letters (uppercase)
    ('Γ', "\\Gamma"), ('Δ', "\\Delta"), ('Θ', "\\Theta"), ('Λ', "\\Lambda"),
    ('Ξ', "\\Xi"), ('Π', "\\Pi"), ('Σ', "\\Sigma"), ('Υ', "\\Upsilon"),
    ('Φ', "\\Phi"), ('Ψ', "\\Psi"), ('Ω', "\\Omega"),

    // Operators and relations
    ('×', "\\times"), ('÷', "\\div"), ('±', "\\pm"), ('∓', "\\mp"),
    ('·', "\\cdot"), ('≤', "\\leq"), ('≥', "\\geq"), ('≠', "\\neq"),
    ('≈', "\\approx"), ('≡', "\\equiv"), ('∼', "\\sim"), ('∝', "\\propto"),
    ('≪', "\\ll"), ('≫', "\\gg"),

    // Sets, logic, arrows
    ('∈', "\\in"), ('∉', "\\notin"), ('⊂', "\\subset"), ('⊃', "\\supset"),
    ('⊆', "\\subseteq"), ('⊇', "\\supseteq"), ('∪', "\\cup"), ('∩', "\\cap"),
    ('∅', "\\emptyset"), ('∀', "\\forall"), ('∃', "\\exists"), ('¬', "\\neg"),
    ('∧', "\\wedge"), ('∨', "\\vee"), ('→', "\\rightarrow"), ('←', "\\leftarrow"),
    ('↔', "\\leftrightarrow"), ('⇒', "\\Rightarrow"), ('⇐', "\\Leftarrow"),
    ('⇔', "\\Leftrightarrow"),

    // Miscellaneous
    ('∞', "\\infty"), ('∂', "\\partial"), ('∇', "\\nabla"), ('∑', "\\sum"),
    ('∏', "\\prod"), ('∫', "\\int"), ('√', "\\surd"), ('′', "\\prime"),
];

lazy_static! {
    static ref UNICODE_TABLE: HashMap<char, LatexChar> = SPECIALS
        .iter()
        .map(|&(c, latex)| (c, LatexChar { latex, math: false }))
        .collect();

    static ref ASCII_TABLE: HashMap<char, LatexChar> = {
        let mut table = UNICODE_TABLE.clone();
        for &(c, latex) in TEXT_CHARACTERS {
            table.insert(c, LatexChar { latex, math: false });
        }
        for &(c, latex) in MATH_SYMBOLS {
            table.insert(c, LatexChar { latex, math: true });
        }
        table
    };

    /// Reverse patterns sorted by length (longest first) to avoid partial matches.
    /// Single-character spellings (`'`, `` ` ``, `~`) are plain text and stay out.
    static ref TO_UNICODE: Vec<(&'static str, char)> = {
        let mut patterns: Vec<(&str, char)> = SPECIALS
            .iter()
            .chain(TEXT_CHARACTERS)
            .chain(MATH_SYMBOLS)
            .filter(|(_, latex)| latex.chars().count() > 1)
            .map(|&(c, latex)| (latex, c))
            .collect();
        patterns.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        // µ and μ share a spelling; the Greek letter wins
        patterns.dedup_by(|a, b| a.0 == b.0);
        patterns
    };

    static ref ENSUREMATH: Regex = Regex::new(r"\\ensuremath\{([^{}]*)\}").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"[\r\n\t ]+").unwrap();
}

/// LaTeX spelling of a character in the given mode, if it needs one
pub fn lookup(c: char, mode: LatexMode) -> Option<&'static LatexChar> {
    match mode {
        LatexMode::Unicode => UNICODE_TABLE.get(&c),
        LatexMode::Ascii => ASCII_TABLE.get(&c),
    }
}

/// Escape plain text (no markup) for LaTeX
///
/// Consecutive math-mode characters are grouped into one `\ensuremath{}`.
pub fn escape_text(text: &str, mode: LatexMode) -> String {
    let mut out = String::with_capacity(text.len());
    let mut math = String::new();

    for c in text.chars() {
        match lookup(c, mode) {
            Some(latex) if latex.math => math.push_str(latex.latex),
            other => {
                flush_math(&mut out, &mut math);
                match other {
                    Some(latex) => out.push_str(latex.latex),
                    None if mode == LatexMode::Ascii && !c.is_ascii() => {
                        out.push_str(&spell_out(c))
                    }
                    None => out.push(c),
                }
            }
        }
    }
    flush_math(&mut out, &mut math);

    out
}

/// ASCII spelling of a character missing from the table
///
/// The compatibility decomposition supplies a base letter plus combining
/// marks, written as nested accent commands (`Ā` -> `{\=A}`). Anything
/// left without an ASCII form becomes `{\char"XXXX}`.
fn spell_out(c: char) -> String {
    let mut parts = std::iter::once(c).nfkd().peekable();
    let mut latex = String::new();

    while let Some(base) = parts.next() {
        let mut marks = Vec::new();
        while let Some(&mark) = parts.peek() {
            if !is_combining_mark(mark) {
                break;
            }
            marks.push(mark);
            parts.next();
        }

        if is_combining_mark(base) {
            latex.push_str(&char_code(base));
            continue;
        }

        let mut letter = match base {
            'i' | 'j' if marks.first().is_some_and(|&m| accent(m).is_some_and(is_above)) => {
                format!("\\{}", base)
            }
            _ if base.is_ascii() => match lookup(base, LatexMode::Ascii) {
                Some(special) => special.latex.to_string(),
                None => base.to_string(),
            },
            _ => match lookup(base, LatexMode::Ascii) {
                Some(known) if !known.math => known.latex.to_string(),
                _ => char_code(base),
            },
        };

        for mark in marks {
            // Unknown marks are dropped
            if let Some(command) = accent(mark) {
                letter = if command.chars().all(|c| c.is_ascii_alphabetic()) {
                    format!("{{\\{} {}}}", command, letter)
                } else {
                    format!("{{\\{}{}}}", command, letter)
                };
            }
        }
        latex.push_str(&letter);
    }

    latex
}

/// Accent command for a combining mark
fn accent(mark: char) -> Option<&'static str> {
    let command = match mark {
        '\u{0300}' => "`",
        '\u{0301}' => "'",
        '\u{0302}' => "^",
        '\u{0303}' => "~",
        '\u{0304}' => "=",
        '\u{0306}' => "u",
        '\u{0307}' => ".",
        '\u{0308}' => "\"",
        '\u{030A}' => "r",
        '\u{030B}' => "H",
        '\u{030C}' => "v",
        '\u{0323}' => "d",
        '\u{0326}' | '\u{0327}' => "c",
        '\u{0328}' => "k",
        '\u{0331}' => "b",
        _ => return None,
    };
    Some(command)
}

/// Accents drawn above the letter replace the dot of `i` and `j`
fn is_above(command: &str) -> bool {
    !matches!(command, "d" | "c" | "k" | "b")
}

fn char_code(c: char) -> String {
    format!("{{\\char\"{:04X}}}", c as u32)
}

fn flush_math(out: &mut String, math: &mut String) {
    if math.is_empty() {
        return;
    }
    out.push_str("\\ensuremath{");
    out.push_str(math);
    out.push('}');
    math.clear();
}

/// Decode the character table back to Unicode
///
/// Runs of whitespace collapse to a single space.
pub fn latex_to_unicode(latex: &str) -> String {
    let mut result = latex.to_string();

    for (pattern, c) in TO_UNICODE.iter() {
        if result.contains(pattern) {
            result = result.replace(pattern, &c.to_string());
        }
    }

    result = ENSUREMATH.replace_all(&result, "$1").to_string();
    WHITESPACE.replace_all(&result, " ").trim().to_string()
}
