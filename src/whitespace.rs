//! Text handling for JSX text children and string attribute values.

use lazy_static::lazy_static;
use oxc_syntax::xml_entities::XML_ENTITIES;
use regex::{Captures, Regex};

lazy_static! {
    /// A newline together with the indentation around it.
    static ref INDENT_RUN_RE: Regex = Regex::new(r"[ \t]*\n[ \t]*").unwrap();
    static ref WHITESPACE_RUN_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref ENTITY_RE: Regex =
        Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);").unwrap();
}

/// Decodes named (`&amp;`, `&nbsp;`) and numeric (`&#169;`, `&#xA9;`)
/// character references. Unknown references are kept as written.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let inner = &caps[1];
            let decoded = if let Some(hex) = inner
                .strip_prefix("#x")
                .or_else(|| inner.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = inner.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                XML_ENTITIES.get(inner).copied()
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// How text children are emitted, selected by `compile:preserveWhitespace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceMode {
    /// `true`: text is emitted exactly as written.
    Preserve,
    /// `false`: every whitespace run becomes one space, ends trimmed.
    Collapse,
    /// `"smart"`: indentation around newlines folds first, then as `Collapse`.
    Smart,
}

pub fn normalize_text(text: &str, mode: WhitespaceMode) -> String {
    match mode {
        WhitespaceMode::Preserve => text.to_string(),
        WhitespaceMode::Smart => {
            let folded = INDENT_RUN_RE.replace_all(text, " ");
            WHITESPACE_RUN_RE
                .replace_all(&folded, " ")
                .trim()
                .to_string()
        }
        WhitespaceMode::Collapse => WHITESPACE_RUN_RE.replace_all(text, " ").trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_on_indented_text() {
        let text = "  foo\n  bar  ";
        assert_eq!(normalize_text(text, WhitespaceMode::Collapse), "foo bar");
        assert_eq!(normalize_text(text, WhitespaceMode::Smart), "foo bar");
        assert_eq!(normalize_text(text, WhitespaceMode::Preserve), text);
    }

    #[test]
    fn test_whitespace_only_text_collapses_to_empty() {
        assert_eq!(normalize_text("\n\t   \n", WhitespaceMode::Collapse), "");
        assert_eq!(normalize_text("\n\t   \n", WhitespaceMode::Smart), "");
        assert_eq!(normalize_text("\n\t   \n", WhitespaceMode::Preserve), "\n\t   \n");
    }

    #[test]
    fn test_decode_named_and_numeric_entities() {
        assert_eq!(decode_entities("a &amp; b &lt; c"), "a & b < c");
        assert_eq!(decode_entities("&copy; 2024&nbsp;x"), "\u{a9} 2024\u{a0}x");
        assert_eq!(decode_entities("&#169;&#xA9;&#XA9;"), "\u{a9}\u{a9}\u{a9}");
    }

    #[test]
    fn test_unknown_or_unterminated_entities_are_kept() {
        assert_eq!(decode_entities("&bogus; & &amp"), "&bogus; & &amp");
        assert_eq!(decode_entities("&#xFFFFFFFF;"), "&#xFFFFFFFF;");
        assert_eq!(decode_entities("héllo wörld"), "héllo wörld");
    }

    #[test]
    fn test_tabs_and_mixed_indentation() {
        let text = "Hello,\t\tworld\n\t\t  and\r\n  more";
        assert_eq!(normalize_text(text, WhitespaceMode::Collapse), "Hello, world and more");
        assert_eq!(normalize_text(text, WhitespaceMode::Smart), "Hello, world and more");
    }
}
