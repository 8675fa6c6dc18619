//! Tokenizer for syllable-annotated sentences.
//!
//! Input uses a single space between words and a middle dot (`·`) between the
//! syllables of one word, e.g. `"KO·T PI·JE WO·DĘ"`. The output is a flat
//! token sequence where each word gap occupies one [`SyllableToken::Boundary`]
//! slot, plus one [`WordSpan`] per word.

use heapless::{String, Vec};
use log::debug;

pub const SYLLABLE_SEPARATOR: char = '·';
pub const WORD_SEPARATOR: char = ' ';

pub const LINE_TEXT_BYTES: usize = 480;
pub const MAX_LINE_TOKENS: usize = 96;
pub const MAX_LINE_WORDS: usize = 40;

/// One addressable cursor slot of a tokenized line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyllableToken<'a> {
    Syllable { text: &'a str, word_index: u16 },
    Boundary,
}

impl SyllableToken<'_> {
    pub const fn is_boundary(self) -> bool {
        matches!(self, Self::Boundary)
    }
}

/// Inclusive token range covered by one word's syllables.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WordSpan {
    pub start_index: u16,
    pub end_index: u16,
}

impl WordSpan {
    pub const fn contains(self, index: usize) -> bool {
        index >= self.start_index as usize && index <= self.end_index as usize
    }

    pub const fn syllable_count(self) -> usize {
        (self.end_index - self.start_index) as usize + 1
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    Syllable { start: u16, end: u16, word: u16 },
    Boundary,
}

/// Tokenizer output for one sentence (or one library word).
///
/// Syllable texts are packed into a single fixed-capacity buffer; tokens keep
/// byte ranges into it.
#[derive(Clone, Debug, Default)]
pub struct SyllableLine {
    text: String<LINE_TEXT_BYTES>,
    slots: Vec<Slot, MAX_LINE_TOKENS>,
    words: Vec<WordSpan, MAX_LINE_WORDS>,
    truncated: bool,
}

/// Split a syllable-annotated sentence into tokens and word spans.
///
/// Empty syllables (doubled, leading or trailing dots) are dropped, and a raw
/// word left without syllables is skipped without emitting a boundary. Never
/// fails: a sentence with nothing to read produces an empty line.
pub fn tokenize(sentence: &str) -> SyllableLine {
    let mut line = SyllableLine::new();

    for raw_word in sentence.split(WORD_SEPARATOR) {
        if !line.push_word(raw_word.split(SYLLABLE_SEPARATOR)) {
            break;
        }
    }

    line
}

/// Build a single-word line from a stored syllable list (`["ma", "ma"]`).
pub fn tokenize_pieces(pieces: &[&str]) -> SyllableLine {
    let mut line = SyllableLine::new();
    let _ = line.push_word(
        pieces
            .iter()
            .flat_map(|piece| piece.split(SYLLABLE_SEPARATOR)),
    );
    line
}

impl SyllableLine {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            slots: Vec::new(),
            words: Vec::new(),
            truncated: false,
        }
    }

    /// Token count, boundaries included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether input was cut at a word edge because a capacity was reached.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn words(&self) -> &[WordSpan] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn syllable_count(&self) -> usize {
        self.slots.len() - self.words.len().saturating_sub(1)
    }

    pub fn token(&self, index: usize) -> Option<SyllableToken<'_>> {
        self.slots.get(index).map(|slot| self.resolve(*slot))
    }

    pub fn is_boundary(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Boundary))
    }

    pub fn tokens(&self) -> impl Iterator<Item = SyllableToken<'_>> + '_ {
        self.slots.iter().map(|slot| self.resolve(*slot))
    }

    /// Syllable texts in order, boundaries skipped.
    pub fn syllables(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens().filter_map(|token| match token {
            SyllableToken::Syllable { text, .. } => Some(text),
            SyllableToken::Boundary => None,
        })
    }

    /// Word owning the syllable at `index`; `None` for boundaries.
    pub fn word_of(&self, index: usize) -> Option<WordSpan> {
        match self.slots.get(index) {
            Some(Slot::Syllable { word, .. }) => self.words.get(*word as usize).copied(),
            _ => None,
        }
    }

    fn resolve(&self, slot: Slot) -> SyllableToken<'_> {
        match slot {
            Slot::Syllable { start, end, word } => SyllableToken::Syllable {
                text: &self.text[start as usize..end as usize],
                word_index: word,
            },
            Slot::Boundary => SyllableToken::Boundary,
        }
    }

    /// Append one word. Returns `false` once a capacity is exhausted; the word
    /// is then dropped whole so the line keeps its shape.
    fn push_word<'s, I>(&mut self, pieces: I) -> bool
    where
        I: Iterator<Item = &'s str> + Clone,
    {
        let syllables = pieces.map(str::trim).filter(|piece| !piece.is_empty());

        let mut syllable_total = 0usize;
        let mut byte_total = 0usize;
        for syllable in syllables.clone() {
            syllable_total += 1;
            byte_total += syllable.len();
        }

        if syllable_total == 0 {
            return true;
        }

        let boundary = usize::from(!self.words.is_empty());
        let fits = self.slots.len() + boundary + syllable_total <= MAX_LINE_TOKENS
            && self.words.len() < MAX_LINE_WORDS
            && self.text.len() + byte_total <= LINE_TEXT_BYTES;
        if !fits {
            debug!(
                "syllables: line truncated words={} tokens={} bytes={} dropped_syllables={}",
                self.words.len(),
                self.slots.len(),
                self.text.len(),
                syllable_total
            );
            self.truncated = true;
            return false;
        }

        if boundary == 1 {
            let _ = self.slots.push(Slot::Boundary);
        }

        let word = self.words.len() as u16;
        let start_index = self.slots.len() as u16;
        for syllable in syllables {
            let start = self.text.len() as u16;
            let _ = self.text.push_str(syllable);
            let end = self.text.len() as u16;
            let _ = self.slots.push(Slot::Syllable { start, end, word });
        }

        let _ = self.words.push(WordSpan {
            start_index,
            end_index: self.slots.len() as u16 - 1,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syl(text: &str, word_index: u16) -> SyllableToken<'_> {
        SyllableToken::Syllable { text, word_index }
    }

    fn span(start_index: u16, end_index: u16) -> WordSpan {
        WordSpan {
            start_index,
            end_index,
        }
    }

    #[test]
    fn three_word_sentence_layout() {
        let line = tokenize("KO·T PI·JE WO·DĘ");

        let tokens: std::vec::Vec<_> = line.tokens().collect();
        assert_eq!(
            tokens,
            [
                syl("KO", 0),
                syl("T", 0),
                SyllableToken::Boundary,
                syl("PI", 1),
                syl("JE", 1),
                SyllableToken::Boundary,
                syl("WO", 2),
                syl("DĘ", 2),
            ]
        );
        assert_eq!(line.words(), &[span(0, 1), span(3, 4), span(6, 7)]);
        assert_eq!(line.syllable_count(), 6);
        assert!(!line.truncated());
    }

    #[test]
    fn token_count_matches_word_shape() {
        let shapes: [&[usize]; 5] = [&[1], &[2], &[1, 1], &[3, 1, 2], &[2, 2, 2, 1, 4]];

        for shape in shapes {
            let mut sentence = std::string::String::new();
            for (word, syllables) in shape.iter().enumerate() {
                if word > 0 {
                    sentence.push(' ');
                }
                for s in 0..*syllables {
                    if s > 0 {
                        sentence.push('·');
                    }
                    sentence.push_str(&std::format!("S{word}{s}"));
                }
            }

            let line = tokenize(&sentence);
            let syllable_total: usize = shape.iter().sum();
            let boundaries = line.tokens().filter(|token| token.is_boundary()).count();

            assert_eq!(line.len(), syllable_total + shape.len() - 1, "{sentence}");
            assert_eq!(boundaries, shape.len() - 1);
            assert_eq!(line.word_count(), shape.len());

            let mut expected_start = 0u16;
            for (span, syllables) in line.words().iter().zip(shape) {
                assert_eq!(span.start_index, expected_start);
                assert_eq!(span.syllable_count(), *syllables);
                expected_start = span.end_index + 2;
            }
        }
    }

    #[test]
    fn doubled_dots_are_filtered() {
        let doubled = tokenize("ko··t");
        let single = tokenize("ko·t");

        assert!(doubled.syllables().eq(single.syllables()));
        assert_eq!(doubled.words(), single.words());
    }

    #[test]
    fn leading_and_trailing_dots_are_dropped() {
        let line = tokenize("·MA·MA· ·TA·");
        assert!(line.syllables().eq(["MA", "MA", "TA"]));
        assert_eq!(line.words(), &[span(0, 1), span(3, 3)]);
    }

    #[test]
    fn word_without_dot_is_one_syllable() {
        let line = tokenize("DOM");
        assert_eq!(line.len(), 1);
        assert_eq!(line.token(0), Some(syl("DOM", 0)));
        assert_eq!(line.words(), &[span(0, 0)]);
    }

    #[test]
    fn empty_words_do_not_emit_boundaries() {
        let line = tokenize("  TO  ·· JEST ·  KOT ");
        assert!(line.syllables().eq(["TO", "JEST", "KOT"]));
        assert_eq!(line.len(), 5);
        assert!(line.is_boundary(1));
        assert!(line.is_boundary(3));
        assert!(!line.is_boundary(0));
        assert!(!line.is_boundary(4));
    }

    #[test]
    fn nothing_to_read_yields_empty_line() {
        for input in ["", " ", "   ", "·", "·· ·", " · "] {
            let line = tokenize(input);
            assert!(line.is_empty(), "{input:?}");
            assert!(line.words().is_empty());
            assert_eq!(line.token(0), None);
        }
    }

    #[test]
    fn word_of_reports_owning_span() {
        let line = tokenize("MA·MA MA KO·TA");
        assert_eq!(line.word_of(1), Some(span(0, 1)));
        assert_eq!(line.word_of(2), None);
        assert_eq!(line.word_of(3), Some(span(3, 3)));
        assert_eq!(line.word_of(6), Some(span(5, 6)));
        assert_eq!(line.word_of(7), None);
    }

    #[test]
    fn case_and_punctuation_are_preserved() {
        let line = tokenize("Ma·ma ma ko·ta.");
        assert!(line.syllables().eq(["Ma", "ma", "ma", "ko", "ta."]));
    }

    #[test]
    fn stored_pieces_form_a_single_word() {
        let line = tokenize_pieces(&["pił", "", "ka"]);
        assert!(line.syllables().eq(["pił", "ka"]));
        assert_eq!(line.words(), &[span(0, 1)]);
        assert!(!line.tokens().any(SyllableToken::is_boundary));
    }

    #[test]
    fn overlong_input_is_cut_at_a_word_edge() {
        let mut sentence = std::string::String::new();
        for _ in 0..(MAX_LINE_WORDS + 8) {
            sentence.push_str("LA·LA ");
        }

        let line = tokenize(&sentence);
        assert!(line.truncated());
        assert_eq!(line.word_count(), 32);
        assert!(line.len() <= MAX_LINE_TOKENS);
        assert!(!line.is_boundary(line.len() - 1));
        assert_eq!(line.words().last().map(|w| w.end_index as usize), Some(line.len() - 1));
    }
}
