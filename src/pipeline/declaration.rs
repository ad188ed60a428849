//! XML declaration rewrite for legacy-encoded files.
//!
//! Output is always written as UTF-8, so a file read as ISO-8859-1 must stop
//! claiming `encoding="ISO-8859-1"` in its prolog. Only the exact,
//! case-sensitive attribute is replaced. A declaration spelled differently
//! (`encoding='iso-8859-1'`, extra spaces) is left alone and the output keeps
//! a stale label.

use super::encoding::SourceEncoding;
use tracing::debug;

/// Whether [`rewrite_declaration`] would change `text`.
pub fn declaration_needs_rewrite(encoding: SourceEncoding, text: &str) -> bool {
    encoding.is_legacy() && text.contains(SourceEncoding::Latin1.declaration())
}

/// Replace the legacy encoding attribute with the UTF-8 one.
///
/// UTF-8 input is returned unchanged, even when it contains the legacy
/// attribute.
pub fn rewrite_declaration(encoding: SourceEncoding, text: &str) -> String {
    if !encoding.is_legacy() {
        return text.to_string();
    }
    let legacy = SourceEncoding::Latin1.declaration();
    if !text.contains(legacy) {
        debug!("legacy file without literal {legacy}; declaration left as is");
        return text.to_string();
    }
    text.replace(legacy, SourceEncoding::Utf8.declaration())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROLOG: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>"#;

    #[test]
    fn legacy_declaration_is_rewritten() {
        let input = format!("{PROLOG}\n<band nr=\"15\">Text</band>");
        let out = rewrite_declaration(SourceEncoding::Latin1, &input);
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<band nr=\"15\">Text</band>"
        );
    }

    #[test]
    fn only_the_declaration_changes() {
        let input = format!("{PROLOG}<a>ISO-8859-1 encoding=</a>");
        let out = rewrite_declaration(SourceEncoding::Latin1, &input);
        assert_eq!(
            out.replace(r#"encoding="UTF-8""#, r#"encoding="ISO-8859-1""#),
            input
        );
        assert!(out.contains("<a>ISO-8859-1 encoding=</a>"));
    }

    #[test]
    fn utf8_files_are_untouched() {
        let input = format!("{PROLOG}<a/>");
        assert_eq!(rewrite_declaration(SourceEncoding::Utf8, &input), input);
        assert!(!declaration_needs_rewrite(SourceEncoding::Utf8, &input));
    }

    #[test]
    fn different_spelling_is_not_rewritten() {
        for input in [
            r#"<?xml version="1.0" encoding="iso-8859-1"?>"#,
            r#"<?xml version="1.0" encoding='ISO-8859-1'?>"#,
            r#"<?xml version="1.0" encoding = "ISO-8859-1"?>"#,
        ] {
            assert_eq!(rewrite_declaration(SourceEncoding::Latin1, input), input);
            assert!(!declaration_needs_rewrite(SourceEncoding::Latin1, input));
        }
    }

    #[test]
    fn needs_rewrite_detects_literal_match() {
        assert!(declaration_needs_rewrite(SourceEncoding::Latin1, PROLOG));
    }
}
