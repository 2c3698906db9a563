//! URL and DOI escaping

use crate::chars::LatexMode;
use crate::html::html_to_latex;

/// Escape a URL for use inside `\url{}` / `\href{}`
///
/// Backslash-escapes `# \ _ % & { }`. In ASCII mode every byte outside
/// printable ASCII (`0x21..=0x7E`) of the UTF-8 encoding is written as
/// `\%xx`.
pub fn minimal_escape(url: &str, mode: LatexMode) -> String {
    let mut href = String::with_capacity(url.len());

    for c in url.chars() {
        match c {
            '#' | '\\' | '_' | '%' | '&' | '{' | '}' => {
                href.push('\\');
                href.push(c);
            }
            '\u{21}'..='\u{7E}' => href.push(c),
            _ if mode == LatexMode::Ascii => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    href.push_str(&format!("\\%{:02x}", byte));
                }
            }
            _ => href.push(c),
        }
    }

    href
}

/// Render a URL field, optionally as a clickable `\href`
///
/// The link target is the escaped URL; the label is the URL run through
/// the full markup conversion.
pub fn url_to_latex(url: &str, mode: LatexMode, fancy: bool) -> String {
    let href = minimal_escape(url, mode);
    if fancy {
        format!("\\href{{{}}}{{{}}}", href, html_to_latex(url, mode))
    } else {
        href
    }
}
