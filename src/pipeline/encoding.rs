//! Encoding detection and byte decoding.
//!
//! The corpus mixes UTF-8 files with a handful of ISO-8859-1 files. The
//! legacy files are identified by the number in their file name, never by
//! sniffing content: a BOM check or statistical detector would misfire on
//! short files, and the set of legacy files is known and closed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File numbers known to be stored as ISO-8859-1.
pub const LEGACY_LATIN1_IDS: [u64; 4] = [10, 15, 16, 23];

/// Encoding a source file is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceEncoding {
    /// ISO-8859-1, the legacy single-byte encoding.
    #[serde(rename = "iso-8859-1")]
    Latin1,
    /// UTF-8 (default).
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
}

impl SourceEncoding {
    /// Lowercase encoding label, as used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            SourceEncoding::Latin1 => "iso-8859-1",
            SourceEncoding::Utf8 => "utf-8",
        }
    }

    /// The exact XML declaration attribute naming this encoding.
    pub fn declaration(self) -> &'static str {
        match self {
            SourceEncoding::Latin1 => r#"encoding="ISO-8859-1""#,
            SourceEncoding::Utf8 => r#"encoding="UTF-8""#,
        }
    }

    pub fn is_legacy(self) -> bool {
        self == SourceEncoding::Latin1
    }

    /// Decode raw file bytes into text.
    ///
    /// Latin-1 maps every byte to the code point with the same value and
    /// therefore never fails. UTF-8 fails on the first invalid sequence.
    pub fn decode(self, bytes: Vec<u8>) -> Result<String, DecodeFailure> {
        match self {
            SourceEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
            SourceEncoding::Utf8 => String::from_utf8(bytes).map_err(|e| {
                let utf8 = e.utf8_error();
                DecodeFailure {
                    offset: utf8.valid_up_to(),
                    detail: utf8.to_string(),
                }
            }),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a byte buffer could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// Byte offset of the first invalid sequence.
    pub offset: usize,
    pub detail: String,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.detail, self.offset)
    }
}

static RE_NUMBERED_XML: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\.xml$").unwrap());

/// Infer the source encoding from a file name.
///
/// The trailing number right before `.xml` decides: numbers in
/// [`LEGACY_LATIN1_IDS`] are Latin-1, everything else is UTF-8. The match is
/// a search, so `vol15.xml` counts as file 15.
pub fn detect_encoding(file_name: &str) -> SourceEncoding {
    let Some(caps) = RE_NUMBERED_XML.captures(file_name) else {
        return SourceEncoding::Utf8;
    };
    match caps[1].parse::<u64>() {
        Ok(n) if LEGACY_LATIN1_IDS.contains(&n) => SourceEncoding::Latin1,
        _ => SourceEncoding::Utf8,
    }
}

/// [`detect_encoding`] applied to the last component of `path`.
pub fn detect_encoding_for_path(path: &Path) -> SourceEncoding {
    path.file_name()
        .map(|name| detect_encoding(&name.to_string_lossy()))
        .unwrap_or_default()
}

/// Convert CRLF and lone CR line endings to LF.
pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_ids_are_latin1() {
        for id in LEGACY_LATIN1_IDS {
            assert_eq!(
                detect_encoding(&format!("{id}.xml")),
                SourceEncoding::Latin1,
                "{id}.xml"
            );
        }
    }

    #[test]
    fn other_names_are_utf8() {
        for name in [
            "7.xml", "1.xml", "11.xml", "100.xml", "230.xml", "kant.xml", "15.xml.bak",
            "15.XML", "15.txt", "15", "",
        ] {
            assert_eq!(detect_encoding(name), SourceEncoding::Utf8, "{name}");
        }
    }

    #[test]
    fn leading_zeros_and_prefixes_still_match() {
        assert_eq!(detect_encoding("015.xml"), SourceEncoding::Latin1);
        assert_eq!(detect_encoding("vol16.xml"), SourceEncoding::Latin1);
        assert_eq!(detect_encoding("band-23.xml"), SourceEncoding::Latin1);
    }

    #[test]
    fn huge_numbers_are_utf8() {
        assert_eq!(
            detect_encoding("99999999999999999999999999.xml"),
            SourceEncoding::Utf8
        );
    }

    #[test]
    fn path_detection_uses_file_name() {
        assert_eq!(
            detect_encoding_for_path(Path::new("/data/raw/10.xml")),
            SourceEncoding::Latin1
        );
        assert_eq!(
            detect_encoding_for_path(Path::new("/data/10.xml/7.xml")),
            SourceEncoding::Utf8
        );
        assert_eq!(detect_encoding_for_path(Path::new("/")), SourceEncoding::Utf8);
    }

    #[test]
    fn latin1_decodes_every_byte() {
        let bytes = vec![b'K', 0xE4, b'f', 0xE9, 0xFF];
        assert_eq!(SourceEncoding::Latin1.decode(bytes).unwrap(), "Käféÿ");
    }

    #[test]
    fn utf8_rejects_latin1_bytes() {
        let err = SourceEncoding::Utf8
            .decode(vec![b'a', b'b', 0xE9, b'c'])
            .unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(err.to_string().contains("byte 2"));
    }

    #[test]
    fn utf8_accepts_valid_text() {
        let text = "Vernunft – Kritik".to_string();
        assert_eq!(
            SourceEncoding::Utf8.decode(text.clone().into_bytes()).unwrap(),
            text
        );
    }

    #[test]
    fn serialises_as_label() {
        for enc in [SourceEncoding::Latin1, SourceEncoding::Utf8] {
            let json = serde_json::to_string(&enc).unwrap();
            assert_eq!(json, format!("\"{}\"", enc.label()));
            assert_eq!(serde_json::from_str::<SourceEncoding>(&json).unwrap(), enc);
        }
    }

    #[test]
    fn declarations_and_labels() {
        assert_eq!(SourceEncoding::Latin1.declaration(), r#"encoding="ISO-8859-1""#);
        assert_eq!(SourceEncoding::Utf8.declaration(), r#"encoding="UTF-8""#);
        assert_eq!(SourceEncoding::Latin1.to_string(), "iso-8859-1");
        assert!(SourceEncoding::Latin1.is_legacy());
        assert!(!SourceEncoding::Utf8.is_legacy());
    }

    #[test]
    fn line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }
}
