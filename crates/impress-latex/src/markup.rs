//! LaTeX -> html reverse mapping
//!
//! Best effort only: recognizes the formatting commands the exporter emits
//! (and the older `$^{\textrm{..}}$` forms) and rewrites them to the
//! library's rich-text tags. Everything else is left untouched.

use lazy_static::lazy_static;
use regex::Regex;

// Innermost groups are rewritten first; nesting needs repeated passes
const MAX_PASSES: usize = 16;

lazy_static! {
    static ref FORMATTING_PATTERNS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"\\(?:textit|emph)\{([^{}]*)\}").unwrap(), "<i>$1</i>"),
        (Regex::new(r"\\textbf\{([^{}]*)\}").unwrap(), "<b>$1</b>"),
        (
            Regex::new(r"\\textsc\{([^{}]*)\}").unwrap(),
            "<span style=\"font-variant:small-caps;\">$1</span>",
        ),
        // Superscript
        (Regex::new(r"\\ensuremath\{\^\{\\textrm\{([^{}]*)\}\}\}").unwrap(), "<sup>$1</sup>"),
        (Regex::new(r"\\ensuremath\{\^\{([^{}]*)\}\}").unwrap(), "<sup>$1</sup>"),
        (Regex::new(r"\$\^\{\\textrm\{([^{}]*)\}\}\$").unwrap(), "<sup>$1</sup>"),
        (Regex::new(r"\$\^\{([^{}]*)\}\$").unwrap(), "<sup>$1</sup>"),
        // Subscript
        (Regex::new(r"\\ensuremath\{_\{\\textrm\{([^{}]*)\}\}\}").unwrap(), "<sub>$1</sub>"),
        (Regex::new(r"\\ensuremath\{_\{([^{}]*)\}\}").unwrap(), "<sub>$1</sub>"),
        (Regex::new(r"\$_\{\\textrm\{([^{}]*)\}\}\$").unwrap(), "<sub>$1</sub>"),
        (Regex::new(r"\$_\{([^{}]*)\}\$").unwrap(), "<sub>$1</sub>"),
    ];
}

/// Rewrite LaTeX formatting commands as rich-text tags
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn latex_to_html(latex: &str) -> String {
    let mut result = latex.to_string();

    for _ in 0..MAX_PASSES {
        let before = result.clone();
        for (pattern, replacement) in FORMATTING_PATTERNS.iter() {
            result = pattern.replace_all(&result, *replacement).into_owned();
        }
        if result == before {
            break;
        }
    }

    result
}
