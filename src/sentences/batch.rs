//! Keyed batch adapter: many `{id, text}` items in, `id → sentences` out.

use super::segmenter::Segmenter;
use crate::error::PrepError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use tracing::debug;

/// Identifier of a batch item: a JSON number or string.
///
/// Numbers keep their JSON rendering (`7`, `18446744073709551615`, `1.5`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// One text to segment. Other fields of the input object are ignored, so
/// whole paragraph records can be piped in unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentItem {
    #[serde(alias = "Id", alias = "ID")]
    pub id: ItemId,
    #[serde(alias = "Text")]
    pub text: String,
}

/// Sentences per item, keyed by the identifier rendered as a string.
pub type SentencesById = BTreeMap<String, Vec<String>>;

/// Segment every item with the same `segmenter`.
///
/// A repeated identifier keeps the sentences of its last occurrence.
pub fn split_items(segmenter: &Segmenter, items: &[SegmentItem]) -> SentencesById {
    let mut out = SentencesById::new();
    for item in items {
        let sentences = segmenter.split(&item.text);
        debug!("item {}: {} sentences", item.id, sentences.len());
        out.insert(item.id.to_string(), sentences);
    }
    out
}

/// Parse a JSON array of items from `reader` and segment them.
///
/// # Errors
/// [`PrepError::InvalidSegmentInput`] if the input is not a JSON array of
/// objects with an identifier and a text.
pub fn split_json<R: Read>(segmenter: &Segmenter, reader: R) -> Result<SentencesById, PrepError> {
    let items: Vec<SegmentItem> =
        serde_json::from_reader(reader).map_err(|e| PrepError::InvalidSegmentInput {
            detail: e.to_string(),
        })?;
    Ok(split_items(segmenter, &items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_by_string_ids() {
        let input = r#"[
            {"Id": 1, "Text": "Das ist ein erster Satz. Das ist ein zweiter Satz! Ist das ein dritter Satz?", "Pages": [3], "WorkId": 7},
            {"Id": 2, "Text": "Das ist ein erster Satz. Das ist ein zweiter Satz ohne Punkt"},
            {"id": "fn-3", "text": "Das ist ein erster Satz usw. der weiter geht. Das ist ein zweiter Satz."}
        ]"#;
        let out = split_json(&Segmenter::german(), input.as_bytes()).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(
            out["1"],
            vec![
                "Das ist ein erster Satz.",
                "Das ist ein zweiter Satz!",
                "Ist das ein dritter Satz?",
            ]
        );
        assert_eq!(out["2"].len(), 2);
        assert_eq!(
            out["fn-3"],
            vec![
                "Das ist ein erster Satz usw. der weiter geht.",
                "Das ist ein zweiter Satz.",
            ]
        );
    }

    #[test]
    fn last_duplicate_wins() {
        let items = vec![
            SegmentItem {
                id: ItemId::Number(5.into()),
                text: "Alt.".into(),
            },
            SegmentItem {
                id: ItemId::Number(5.into()),
                text: "Neu. Neuer.".into(),
            },
        ];
        let out = split_items(&Segmenter::german(), &items);
        assert_eq!(out["5"], vec!["Neu.", "Neuer."]);
    }

    #[test]
    fn wide_and_fractional_ids_are_kept() {
        let input = r#"[
            {"id": 18446744073709551615, "text": "Groß."},
            {"id": -3, "text": "Negativ."},
            {"id": 1.5, "text": "Halb."}
        ]"#;
        let out = split_json(&Segmenter::german(), input.as_bytes()).unwrap();
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["-3", "1.5", "18446744073709551615"]);
    }

    #[test]
    fn empty_array_gives_empty_map() {
        let out = split_json(&Segmenter::german(), "[]".as_bytes()).unwrap();
        assert!(out.is_empty());
        assert_eq!(serde_json::to_string(&out).unwrap(), "{}");
    }

    #[test]
    fn malformed_input_is_rejected() {
        for bad in [r#"{"Id": 1}"#, r#"[{"Id": 1}]"#, "not json", r#"[{"Text": "x"}]"#] {
            let err = split_json(&Segmenter::german(), bad.as_bytes()).unwrap_err();
            assert!(
                matches!(err, PrepError::InvalidSegmentInput { .. }),
                "{bad}: {err:?}"
            );
        }
    }
}
