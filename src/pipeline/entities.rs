//! Character-reference decoding.
//!
//! Two tables are consulted for every `&…` reference in the text:
//!
//! 1. the standard HTML5 set (`&amp;`, `&lt;`, `&eacute;`, `&#233;`,
//!    `&#x3B1;`, …). Named references are resolved by `html-escape`;
//!    numeric ones follow the HTML5 rules (Windows-1252 remap of
//!    `&#128;`–`&#159;`, U+FFFD for null, surrogates and out-of-range
//!    values). The legacy names that HTML5 accepts without a semicolon
//!    (`&amp`, `&eacute`, `&copy`, …) are decoded too;
//! 2. [`GREEK_ENTITIES`], the corpus' own Greek names (`&my;`, `&omikron;`,
//!    `&sigma2;`, the misspelt `&theata;`, …) that no standard covers.
//!    These always need their semicolon.
//!
//! The standard table always wins. References are resolved in a single
//! left-to-right scan, so the output of one decode is never fed back in:
//! `&amp;alpha;` becomes the literal text `&alpha;`, not `α`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Custom Greek entities: both cases of all 24 letters plus two extras.
///
/// Closed list. `sigma2` is the final sigma and `theata` a misspelling that
/// occurs in the sources.
pub static GREEK_ENTITIES: &[(&str, char)] = &[
    ("alpha", 'α'),
    ("Alpha", 'Α'),
    ("beta", 'β'),
    ("Beta", 'Β'),
    ("gamma", 'γ'),
    ("Gamma", 'Γ'),
    ("delta", 'δ'),
    ("Delta", 'Δ'),
    ("epsilon", 'ε'),
    ("Epsilon", 'Ε'),
    ("zeta", 'ζ'),
    ("Zeta", 'Ζ'),
    ("eta", 'η'),
    ("Eta", 'Η'),
    ("theta", 'θ'),
    ("theata", 'θ'),
    ("Theta", 'Θ'),
    ("iota", 'ι'),
    ("Iota", 'Ι'),
    ("kappa", 'κ'),
    ("Kappa", 'Κ'),
    ("lambda", 'λ'),
    ("Lambda", 'Λ'),
    ("my", 'μ'),
    ("My", 'Μ'),
    ("ny", 'ν'),
    ("Ny", 'Ν'),
    ("xi", 'ξ'),
    ("Xi", 'Ξ'),
    ("omikron", 'ο'),
    ("Omikron", 'Ο'),
    ("pi", 'π'),
    ("Pi", 'Π'),
    ("rho", 'ρ'),
    ("Rho", 'Ρ'),
    ("sigma", 'σ'),
    ("sigma2", 'ς'),
    ("Sigma", 'Σ'),
    ("tau", 'τ'),
    ("Tau", 'Τ'),
    ("ypsilon", 'υ'),
    ("Ypsilon", 'Υ'),
    ("phi", 'φ'),
    ("Phi", 'Φ'),
    ("chi", 'χ'),
    ("Chi", 'Χ'),
    ("psi", 'ψ'),
    ("Psi", 'Ψ'),
    ("omega", 'ω'),
    ("Omega", 'Ω'),
];

static GREEK_BY_NAME: Lazy<HashMap<&'static str, char>> =
    Lazy::new(|| GREEK_ENTITIES.iter().copied().collect());

/// HTML5 named references that are also valid without the final `;`.
static LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

static LEGACY_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| LEGACY_NAMES.iter().copied().collect());

/// What `&#128;`–`&#159;` stand for: Windows-1252, except the five
/// positions it leaves undefined.
const C1_REMAP: [char; 32] = [
    '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8D}', 'Ž', '\u{8F}',
    '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{9D}', 'ž', 'Ÿ',
];

static RE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*)(;?)").unwrap()
});

/// Decode all standard and custom Greek references in `text`.
///
/// Unknown references (`&foo;`) are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    RE_REFERENCE
        .replace_all(text, |caps: &Captures<'_>| {
            let body = &caps[1];
            match body.strip_prefix('#') {
                Some(digits) => decode_numeric(digits),
                None => resolve_named(&caps[0], body, !caps[2].is_empty()),
            }
        })
        .into_owned()
}

/// Resolve `&name;` or `&name`: standard table, then Greek table, then the
/// longest legacy name the reference starts with.
fn resolve_named(reference: &str, name: &str, terminated: bool) -> String {
    if terminated {
        if let Some(decoded) = decode_standard(reference) {
            return decoded;
        }
        if let Some(ch) = GREEK_BY_NAME.get(name) {
            return ch.to_string();
        }
    }
    // `&copy2013` → `©2013`, `&ampx;` → `&x;`
    let rest = &reference[1..];
    for end in (2..=name.len()).rev() {
        let prefix = &name[..end];
        if !LEGACY_SET.contains(prefix) {
            continue;
        }
        if let Some(decoded) = decode_standard(&format!("&{prefix};")) {
            return decoded + &rest[end..];
        }
    }
    reference.to_string()
}

fn decode_standard(reference: &str) -> Option<String> {
    match html_escape::decode_html_entities(reference) {
        Cow::Borrowed(_) => None,
        Cow::Owned(decoded) if decoded == reference => None,
        // A reference expands to at most two code points; anything longer
        // means only a legacy prefix (`&sigma` of `&sigma2;`) was recognised.
        Cow::Owned(decoded) if decoded.chars().count() > 2 => None,
        Cow::Owned(decoded) => Some(decoded),
    }
}

/// Decode the digits of `&#…;` (after the `#`), hex if prefixed by `x`.
///
/// Values saturate instead of overflowing; the result is empty for code
/// points HTML5 drops (controls and noncharacters).
fn decode_numeric(digits: &str) -> String {
    let (radix, body) = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    let value = body
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0u32, |acc, d| acc.saturating_mul(radix).saturating_add(d));
    code_point(value).map(String::from).unwrap_or_default()
}

fn code_point(value: u32) -> Option<char> {
    match value {
        0 | 0xD800..=0xDFFF | 0x11_0000..=u32::MAX => Some(char::REPLACEMENT_CHARACTER),
        0x80..=0x9F => Some(C1_REMAP[(value - 0x80) as usize]),
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => None,
        v if v & 0xFFFE == 0xFFFE => None,
        v => char::from_u32(v),
    }
}
