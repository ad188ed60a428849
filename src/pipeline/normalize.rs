//! The normalization pipeline for one decoded document.

use super::declaration::{declaration_needs_rewrite, rewrite_declaration};
use super::encoding::SourceEncoding;
use super::entities::decode_entities;
use serde::{Deserialize, Serialize};

/// Result of [`normalize_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Final UTF-8 text, ready to be written.
    pub text: String,
    /// Whether the legacy encoding declaration was replaced.
    pub declaration_rewritten: bool,
}

/// Rewrite the declaration (legacy files only), then decode references.
///
/// The declaration step matches against the raw attribute text, before any
/// reference in the prolog is decoded.
pub fn normalize_text(encoding: SourceEncoding, text: &str) -> NormalizedDocument {
    let declaration_rewritten = declaration_needs_rewrite(encoding, text);
    let text = rewrite_declaration(encoding, text);
    let text = decode_entities(&text);
    NormalizedDocument {
        text,
        declaration_rewritten,
    }
}
