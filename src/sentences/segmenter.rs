use once_cell::sync::Lazy;
use std::collections::HashSet;

/// German abbreviations that never end a sentence, lowercase, without the
/// final period.
static GERMAN_ABBREVIATIONS: &[&str] = &[
    "a.a.o",
    "abb",
    "abs",
    "allg",
    "anm",
    "aufl",
    "ausg",
    "bd",
    "bde",
    "bes",
    "bspw",
    "bzgl",
    "bzw",
    "ca",
    "cf",
    "chr",
    "d.h",
    "d.i",
    "dgl",
    "dr",
    "ebd",
    "etc",
    "evtl",
    "ff",
    "fig",
    "frz",
    "geb",
    "gest",
    "ggf",
    "griech",
    "hr",
    "hrsg",
    "i.e",
    "inkl",
    "insb",
    "jh",
    "jhd",
    "kap",
    "lat",
    "m.e",
    "n.chr",
    "nr",
    "o.ä",
    "pag",
    "prof",
    "s.o",
    "s.u",
    "sog",
    "sp",
    "st",
    "str",
    "tab",
    "u.a",
    "u.ä",
    "u.s.w",
    "u.u",
    "übers",
    "usf",
    "usw",
    "v.a",
    "v.chr",
    "vgl",
    "vol",
    "vs",
    "z.b",
    "z.t",
    "zit",
    "zzgl",
];

/// Characters that can end a sentence.
const TERMINALS: &[char] = &['.', '!', '?', '‼', '⁇', '⁈', '⁉', '。', '！', '？', '｡', '．'];

/// Closing punctuation that stays with the sentence it follows.
const CLOSERS: &[char] = &[
    '"', '\'', ')', ']', '}', '»', '«', '“', '”', '‘', '’', '›', '‹',
];

/// Opening punctuation stripped before an abbreviation lookup.
const OPENERS: &[char] = &['(', '[', '{', '"', '\'', '„', '‚', '»', '«', '“', '‘', '›', '‹'];

/// Rule-based sentence segmenter for German text.
///
/// Build it once and reuse it for every text of a batch; it only holds the
/// abbreviation set and is `Send + Sync`.
#[derive(Debug, Clone)]
pub struct Segmenter {
    abbreviations: HashSet<String>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::german()
    }
}

impl Segmenter {
    /// Segmenter with the built-in German abbreviation list.
    pub fn german() -> Self {
        Self {
            abbreviations: GERMAN_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Add abbreviations (with or without the final period, any case).
    pub fn with_abbreviations<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for abbr in extra {
            let key = abbr.as_ref().trim().trim_end_matches('.').to_lowercase();
            if !key.is_empty() {
                self.abbreviations.insert(key);
            }
        }
        self
    }

    /// Split `text` into trimmed, non-empty sentences.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.sentences(text).map(str::to_string).collect()
    }

    /// Iterate over the sentences of `text` as borrowed slices.
    pub fn sentences<'s, 't>(&'s self, text: &'t str) -> Sentences<'s, 't> {
        Sentences {
            segmenter: self,
            input: text,
            position: 0,
        }
    }

    fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(&word.to_lowercase())
    }
}

/// Iterator returned by [`Segmenter::sentences`].
#[derive(Debug)]
pub struct Sentences<'s, 't> {
    segmenter: &'s Segmenter,
    input: &'t str,
    position: usize,
}

impl<'s, 't> Sentences<'s, 't> {
    /// Byte offset just past the sentence starting at `start`.
    fn find_boundary(&self, start: usize) -> usize {
        let input = self.input;
        let mut pos = start;

        while let Some(ch) = input[pos..].chars().next() {
            if !TERMINALS.contains(&ch) {
                pos += ch.len_utf8();
                continue;
            }

            let run_start = pos;
            let run_end = scan_terminal_run(input, run_start);
            let rest = &input[run_end..];

            match rest.chars().next() {
                None => return run_end,
                Some(next) if !next.is_whitespace() => {
                    pos = run_end;
                    continue;
                }
                Some(_) => {}
            }

            if self.run_continues_sentence(start, run_start, run_end) {
                pos = run_end;
                continue;
            }
            return run_end;
        }
        input.len()
    }

    /// Whether the terminal run at `run_start..run_end` is not a boundary.
    fn run_continues_sentence(&self, sentence_start: usize, run_start: usize, run_end: usize) -> bool {
        let input = self.input;
        let terminals: String = input[run_start..run_end]
            .chars()
            .filter(|c| TERMINALS.contains(c))
            .collect();

        // "..." and longer
        if terminals.len() >= 2 && terminals.chars().all(|c| c == '.') {
            return true;
        }
        if terminals != "." {
            return false;
        }

        let word = preceding_word(&input[sentence_start..run_start]);
        if word.is_empty() {
            return false;
        }
        if self.segmenter.is_abbreviation(word) {
            return true;
        }

        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            // initial, e.g. "I. Kant" or "S. 12"
            if c.is_alphabetic() {
                return true;
            }
        }

        // ordinal in running text, e.g. "am 3. des Monats"
        if word.len() <= 3 && word.chars().all(|c| c.is_ascii_digit()) {
            let next_word_start = input[run_end..].trim_start().chars().next();
            return next_word_start.is_some_and(|c| c.is_lowercase());
        }
        false
    }
}

impl<'s, 't> Iterator for Sentences<'s, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let remaining = &self.input[self.position..];
            let skipped = remaining.len() - remaining.trim_start().len();
            let start = self.position + skipped;
            if start >= self.input.len() {
                self.position = self.input.len();
                return None;
            }

            let end = self.find_boundary(start);
            self.position = end;
            let sentence = self.input[start..end].trim_end();
            if !sentence.is_empty() {
                return Some(sentence);
            }
        }
    }
}

/// End of the terminal run starting at `from`: consecutive terminals plus
/// any closing quotes or brackets after them.
fn scan_terminal_run(input: &str, from: usize) -> usize {
    let mut end = from;
    for ch in input[from..].chars() {
        if TERMINALS.contains(&ch) || CLOSERS.contains(&ch) {
            end += ch.len_utf8();
        } else {
            break;
        }
    }
    end
}

/// The whitespace-delimited word right before a period, without opening
/// punctuation.
fn preceding_word(before: &str) -> &str {
    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default();
    word.trim_start_matches(OPENERS)
}

static GERMAN: Lazy<Segmenter> = Lazy::new(Segmenter::german);

/// Split with a shared, lazily built German [`Segmenter`].
pub trait SentenceSplit {
    fn split_sentences(&self) -> Vec<String>;
}

impl<T: AsRef<str>> SentenceSplit for T {
    fn split_sentences(&self) -> Vec<String> {
        GERMAN.split(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        Segmenter::german().split(text)
    }

    #[test]
    fn basic_terminals() {
        assert_eq!(
            split("Das ist ein erster Satz. Das ist ein zweiter Satz! Ist das ein dritter Satz?"),
            vec![
                "Das ist ein erster Satz.",
                "Das ist ein zweiter Satz!",
                "Ist das ein dritter Satz?",
            ]
        );
    }

    #[test]
    fn trailing_sentence_without_terminal() {
        assert_eq!(
            split("Das ist ein erster Satz. Das ist ein zweiter Satz ohne Punkt"),
            vec!["Das ist ein erster Satz.", "Das ist ein zweiter Satz ohne Punkt"]
        );
    }

    #[test]
    fn abbreviation_does_not_split() {
        assert_eq!(
            split("Das ist ein erster Satz usw. der weiter geht. Das ist ein zweiter Satz."),
            vec![
                "Das ist ein erster Satz usw. der weiter geht.",
                "Das ist ein zweiter Satz.",
            ]
        );
    }

    #[test]
    fn ellipsis_does_not_split() {
        assert_eq!(
            split("Das ist ein erster Satz ... der weiter geht. Das ist ein zweiter Satz."),
            vec![
                "Das ist ein erster Satz ... der weiter geht.",
                "Das ist ein zweiter Satz.",
            ]
        );
    }

    #[test]
    fn dotted_abbreviations_and_initials() {
        assert_eq!(
            split("Vgl. z.B. die Vorrede, d.h. S. 12 bei I. Kant. Dann folgt mehr."),
            vec!["Vgl. z.B. die Vorrede, d.h. S. 12 bei I. Kant.", "Dann folgt mehr."]
        );
    }

    #[test]
    fn closing_quotes_stay_with_sentence() {
        assert_eq!(
            split("Er sagte: „Habe Mut!“ Dann schwieg er. (Ende.) Weiter."),
            vec!["Er sagte: „Habe Mut!“", "Dann schwieg er.", "(Ende.)", "Weiter."]
        );
    }

    #[test]
    fn ordinals_before_lowercase_words() {
        assert_eq!(
            split("Am 3. und 4. des Monats ruhte er. Es war der 12. Dann kam der Winter."),
            vec![
                "Am 3. und 4. des Monats ruhte er.",
                "Es war der 12.",
                "Dann kam der Winter.",
            ]
        );
    }

    #[test]
    fn punctuation_inside_tokens_does_not_split() {
        assert_eq!(
            split("Der Wert ist 3.14 und mehr!? Ja."),
            vec!["Der Wert ist 3.14 und mehr!?", "Ja."]
        );
    }

    #[test]
    fn whitespace_is_trimmed_and_empty_input_yields_nothing() {
        assert!(split("").is_empty());
        assert!(split("   \n\t ").is_empty());
        assert_eq!(
            split("  Erster Satz.\n\n  Zweiter Satz.  "),
            vec!["Erster Satz.", "Zweiter Satz."]
        );
    }

    #[test]
    fn custom_abbreviations() {
        let seg = Segmenter::german().with_abbreviations(["Akad.", "KrV"]);
        assert_eq!(
            seg.split("Siehe KrV. die Einleitung der Akad. Ausgabe. Ende."),
            vec!["Siehe KrV. die Einleitung der Akad. Ausgabe.", "Ende."]
        );
    }

    #[test]
    fn sentences_borrow_from_input() {
        let text = "Eins. Zwei.";
        let seg = Segmenter::german();
        let parts: Vec<&str> = seg.sentences(text).collect();
        assert_eq!(parts, vec!["Eins.", "Zwei."]);
    }

    #[test]
    fn blanket_trait() {
        assert_eq!("Eins. Zwei.".split_sentences().len(), 2);
    }
}
