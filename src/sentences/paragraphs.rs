//! Paragraph markers in extracted text.
//!
//! Downstream text dumps separate paragraphs with a literal `{r}` marker.
//! Splitting on it before segmentation keeps a sentence from spanning two
//! paragraphs.

use super::batch::SentencesById;
use super::segmenter::Segmenter;

/// Literal paragraph separator.
pub const PARAGRAPH_MARKER: &str = "{r}";

/// Split `text` on [`PARAGRAPH_MARKER`], trimming each part and dropping
/// empty ones.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split(PARAGRAPH_MARKER)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Segment each paragraph of `text`, keyed by its position (from `0`)
/// among the non-empty paragraphs.
pub fn split_paragraph_sentences(segmenter: &Segmenter, text: &str) -> SentencesById {
    split_paragraphs(text)
        .into_iter()
        .enumerate()
        .map(|(i, paragraph)| (i.to_string(), segmenter.split(paragraph)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_marker_and_drops_empty_parts() {
        assert_eq!(
            split_paragraphs("{r} Erster Absatz. {r}{r}\n Zweiter Absatz. {r}  "),
            vec!["Erster Absatz.", "Zweiter Absatz."]
        );
        assert!(split_paragraphs("").is_empty());
        assert_eq!(split_paragraphs("ohne Marker"), vec!["ohne Marker"]);
    }

    #[test]
    fn sentences_keyed_by_paragraph_index() {
        let text = "Eins. Zwei.{r}{r}Drei ohne Punkt{r}Vier!";
        let out = split_paragraph_sentences(&Segmenter::german(), text);
        assert_eq!(out.len(), 3);
        assert_eq!(out["0"], vec!["Eins.", "Zwei."]);
        assert_eq!(out["1"], vec!["Drei ohne Punkt"]);
        assert_eq!(out["2"], vec!["Vier!"]);
    }

    #[test]
    fn sentence_never_crosses_a_marker() {
        let out = split_paragraph_sentences(&Segmenter::german(), "Halber Satz{r}und Rest.");
        assert_eq!(out["0"], vec!["Halber Satz"]);
        assert_eq!(out["1"], vec!["und Rest."]);
    }
}
