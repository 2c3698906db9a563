//! Markup conversion integration tests

use impress_latex::{
    convert_html, html_to_latex, latex_to_html, minimal_escape, url_to_latex, LatexMode,
    MarkupWarning, MAX_TAG_DEPTH,
};
use proptest::prelude::*;
use rstest::rstest;

fn braces_balanced(latex: &str) -> bool {
    let mut depth: i64 = 0;
    let mut escaped = false;
    for c in latex.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

// === Titles as they arrive from the library ===

#[rstest]
#[case(
    "The <i>E. coli</i> genome",
    "The \\emph{E. coli} genome"
)]
#[case(
    "Growth of H<sub>2</sub>O ice",
    "Growth of H\\ensuremath{_{2}}O ice"
)]
#[case(
    "The 2<sup>nd</sup> law & more",
    "The 2\\ensuremath{^{nd}} law \\& more"
)]
#[case(
    "<span style=\"font-variant:small-caps;\">Nasa</span> report",
    "\\textsc{Nasa} report"
)]
fn test_library_titles(#[case] html: &str, #[case] expected: &str) {
    let conversion = convert_html(html, LatexMode::Unicode);
    assert_eq!(conversion.latex, expected);
    assert!(conversion.warnings.is_empty());
}

#[test]
fn test_stack_is_not_shared_between_calls() {
    let first = convert_html("<i>open forever", LatexMode::Unicode);
    assert_eq!(first.latex, "\\emph{open forever}");
    assert_eq!(
        first.warnings,
        vec![MarkupWarning::Unclosed {
            tags: vec!["i".to_string()]
        }]
    );

    let second = convert_html("plain</i>", LatexMode::Unicode);
    assert_eq!(second.latex, "plain");
    assert_eq!(
        second.warnings,
        vec![MarkupWarning::UnexpectedClose {
            tag: "i".to_string()
        }]
    );
}

#[test]
fn test_pre_block_is_verbatim() {
    let latex = html_to_latex("a_b <pre>$x_1$ & <i>y</i></pre> c&d", LatexMode::Unicode);
    assert_eq!(latex, "a\\_b $x_1$ & <i>y</i> c\\&d");
}

#[test]
fn test_depth_limit() {
    let html = "<b>".repeat(MAX_TAG_DEPTH + 1);
    let conversion = convert_html(&html, LatexMode::Unicode);
    assert!(braces_balanced(&conversion.latex));
    assert!(conversion
        .warnings
        .iter()
        .any(|w| matches!(w, MarkupWarning::TooDeep { .. })));
}

#[test]
fn test_url_field() {
    let url = "https://example.org/search?q=a_b&lang=fr#top";
    assert_eq!(
        minimal_escape(url, LatexMode::Unicode),
        "https://example.org/search?q=a\\_b\\&lang=fr\\#top"
    );
    assert!(url_to_latex(url, LatexMode::Ascii, true).starts_with("\\href{https://"));
}

#[test]
fn test_reverse_mapping_subset() {
    for html in ["<i>Title</i>", "<b>Bold</b>", "x<sup>2</sup>", "CO<sub>2</sub>"] {
        assert_eq!(latex_to_html(&html_to_latex(html, LatexMode::Unicode)), html);
    }
}

// === Property-Based Tests ===

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<i>".to_string()),
        Just("</i>".to_string()),
        Just("<b>".to_string()),
        Just("</b>".to_string()),
        Just("<sup>".to_string()),
        Just("</sup>".to_string()),
        Just("<sub>".to_string()),
        Just("</sub>".to_string()),
        Just("<p>".to_string()),
        Just("</p>".to_string()),
        Just("<br/>".to_string()),
        Just(" ".to_string()),
        "[a-z]{1,6}",
    ]
}

proptest! {
    #[test]
    fn test_output_braces_balanced(tokens in prop::collection::vec(token(), 0..40)) {
        let html = tokens.concat();
        let latex = html_to_latex(&html, LatexMode::Unicode);
        prop_assert!(braces_balanced(&latex), "unbalanced output {:?} for {:?}", latex, html);
    }

    #[test]
    fn test_ascii_mode_output_is_ascii(
        text in "[a-zA-Z .,\u{00C0}-\u{024F}\u{1E00}-\u{1EFF}]{0,40}"
    ) {
        let latex = html_to_latex(&text, LatexMode::Ascii);
        prop_assert!(latex.is_ascii(), "non-ASCII output {:?} for {:?}", latex, text);
        prop_assert!(braces_balanced(&latex), "unbalanced output {:?} for {:?}", latex, text);
    }

    #[test]
    fn test_plain_ascii_unchanged(text in "[a-zA-Z0-9 ,.;:()-]{0,40}") {
        let conversion = convert_html(&text, LatexMode::Unicode);
        prop_assert_eq!(conversion.latex, text);
        prop_assert!(conversion.warnings.is_empty());
    }
}
