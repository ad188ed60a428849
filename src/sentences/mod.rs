//! Sentence segmentation for German text.
//!
//! ```text
//! text ──▶ Segmenter::split ──▶ Vec<String>
//! [{id, text}, ..] ──▶ batch::split_json ──▶ { "id": [sentences] }
//! "..{r}..{r}.." ──▶ paragraphs::split_paragraph_sentences ──▶ { "0": [..], "1": [..] }
//! ```
//!
//! All entry points take a `&Segmenter` so one instance serves a whole batch.

pub mod batch;
pub mod paragraphs;
pub mod segmenter;

pub use batch::{split_items, split_json, ItemId, SegmentItem, SentencesById};
pub use paragraphs::{split_paragraph_sentences, split_paragraphs, PARAGRAPH_MARKER};
pub use segmenter::{Segmenter, SentenceSplit, Sentences};
