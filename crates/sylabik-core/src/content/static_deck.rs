use log::debug;

use super::{Card, DeckError, DeckSource, Page, PageSyllables, SetKind};

/// Library word as stored by the caregiver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WordEntry {
    pub id: u16,
    pub text: &'static str,
    pub image_url: &'static str,
    pub syllables: &'static [&'static str],
}

impl WordEntry {
    /// Card shape for this word; missing fields pick the smaller variant.
    pub fn card(&self) -> Card<'static> {
        match (self.text.trim().is_empty(), self.image_url.is_empty()) {
            (true, _) => Card::Image {
                word_id: self.id,
                image_url: self.image_url,
            },
            (false, true) => Card::Word {
                word_id: self.id,
                text: self.text,
                syllables: self.syllables,
            },
            (false, false) => Card::Full {
                word_id: self.id,
                text: self.text,
                syllables: self.syllables,
                image_url: self.image_url,
            },
        }
    }
}

/// Booklet sentence; syllables are fetched on demand when not stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SentenceEntry {
    pub text: &'static str,
    pub syllables: Option<&'static str>,
    pub image_url: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LearningSet {
    pub id: u16,
    pub name: &'static str,
    pub kind: SetKind,
    pub word_ids: &'static [u16],
    pub sentences: &'static [SentenceEntry],
}

impl LearningSet {
    /// Sets with sentences page through them; others page through their words.
    pub const fn pages_sentences(&self) -> bool {
        !self.sentences.is_empty()
    }
}

const fn word(
    id: u16,
    text: &'static str,
    image_url: &'static str,
    syllables: &'static [&'static str],
) -> WordEntry {
    WordEntry {
        id,
        text,
        image_url,
        syllables,
    }
}

pub static WORD_LIBRARY: [WordEntry; 20] = [
    word(1, "mama", "https://picsum.photos/seed/mama/400/300", &["ma", "ma"]),
    word(2, "tata", "https://picsum.photos/seed/tata/400/300", &["ta", "ta"]),
    word(3, "dom", "https://picsum.photos/seed/dom/400/300", &["dom"]),
    word(4, "kot", "https://picsum.photos/seed/kot/400/300", &["kot"]),
    word(5, "pies", "https://picsum.photos/seed/pies/400/300", &["pies"]),
    word(6, "piłka", "https://picsum.photos/seed/pilka/400/300", &["pił", "ka"]),
    word(7, "auto", "https://picsum.photos/seed/auto/400/300", &["au", "to"]),
    word(8, "sok", "https://picsum.photos/seed/sok/400/300", &["sok"]),
    word(9, "woda", "https://picsum.photos/seed/woda/400/300", &["wo", "da"]),
    word(10, "lalka", "https://picsum.photos/seed/lalka/400/300", &["lal", "ka"]),
    word(11, "lis", "https://picsum.photos/seed/lis/400/300", &["lis"]),
    word(12, "liść", "https://picsum.photos/seed/lisc/400/300", &["liść"]),
    word(13, "list", "https://picsum.photos/seed/list/400/300", &["list"]),
    word(14, "kura", "https://picsum.photos/seed/kura/400/300", &["ku", "ra"]),
    word(15, "kula", "https://picsum.photos/seed/kula/400/300", &["ku", "la"]),
    word(16, "lala", "https://picsum.photos/seed/lala/400/300", &["la", "la"]),
    word(17, "mapa", "https://picsum.photos/seed/mapa/400/300", &["ma", "pa"]),
    word(18, "lama", "https://picsum.photos/seed/lama/400/300", &["la", "ma"]),
    word(19, "lampa", "https://picsum.photos/seed/lampa/400/300", &["lam", "pa"]),
    word(20, "pupa", "https://picsum.photos/seed/pupa/400/300", &["pu", "pa"]),
];

pub static CAT_STORY: [SentenceEntry; 3] = [
    SentenceEntry {
        text: "To jest kot.",
        syllables: None,
        image_url: Some("https://picsum.photos/seed/5-0/400/300"),
    },
    SentenceEntry {
        text: "Mama ma kota.",
        syllables: None,
        image_url: Some("https://picsum.photos/seed/5-1/400/300"),
    },
    SentenceEntry {
        text: "Kot pije wodę.",
        syllables: None,
        image_url: None,
    },
];

pub static LEARNING_SETS: [LearningSet; 6] = [
    LearningSet {
        id: 1,
        name: "Rodzina",
        kind: SetKind::PictureCards,
        word_ids: &[1, 2, 3],
        sentences: &[],
    },
    LearningSet {
        id: 2,
        name: "Zwierzęta",
        kind: SetKind::PictureCards,
        word_ids: &[4, 5, 11, 14],
        sentences: &[],
    },
    LearningSet {
        id: 6,
        name: "Gra w Memory - Podstawy",
        kind: SetKind::PictureCards,
        word_ids: &[1, 2, 16, 17, 18, 19, 7, 20, 14, 10],
        sentences: &[],
    },
    LearningSet {
        id: 3,
        name: "Do analizy",
        kind: SetKind::Analysis,
        word_ids: &[6, 7, 10],
        sentences: &[],
    },
    LearningSet {
        id: 4,
        name: "Porównania",
        kind: SetKind::Comparison,
        word_ids: &[11, 12, 13],
        sentences: &[],
    },
    LearningSet {
        id: 5,
        name: "Historyjka o kocie",
        kind: SetKind::Booklet,
        word_ids: &[1, 4, 9],
        sentences: &CAT_STORY,
    },
];

pub const DEFAULT_SET_ID: u16 = 5;

pub fn default_deck() -> StaticDeck<'static> {
    StaticDeck::new(&WORD_LIBRARY, &LEARNING_SETS)
}

/// In-memory deck over a word library and its learning sets.
#[derive(Clone, Debug)]
pub struct StaticDeck<'a> {
    words: &'a [WordEntry],
    sets: &'a [LearningSet],
    selected: usize,
}

impl<'a> StaticDeck<'a> {
    /// Starts on [`DEFAULT_SET_ID`] when present, otherwise the first set.
    pub fn new(words: &'a [WordEntry], sets: &'a [LearningSet]) -> Self {
        let selected = sets
            .iter()
            .position(|set| set.id == DEFAULT_SET_ID)
            .unwrap_or(0);
        Self {
            words,
            sets,
            selected,
        }
    }

    pub fn selected_set(&self) -> Option<&'a LearningSet> {
        self.sets.get(self.selected)
    }

    fn word_by_id(&self, id: u16) -> Option<&'a WordEntry> {
        self.words.iter().find(|word| word.id == id)
    }

    /// Words of the selected set that exist in the library, in set order.
    fn resolved_words(&self) -> impl Iterator<Item = &'a WordEntry> + '_ {
        self.selected_set()
            .map(|set| set.word_ids)
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.word_by_id(*id))
    }
}

impl DeckSource for StaticDeck<'_> {
    type Error = DeckError;

    fn set_id(&self) -> u16 {
        self.selected_set().map(|set| set.id).unwrap_or(0)
    }

    fn set_kind(&self) -> SetKind {
        self.selected_set()
            .map(|set| set.kind)
            .unwrap_or(SetKind::PictureCards)
    }

    fn title(&self) -> &str {
        self.selected_set().map(|set| set.name).unwrap_or("")
    }

    fn page_count(&self) -> u16 {
        let Some(set) = self.selected_set() else {
            return 0;
        };

        let count = if set.pages_sentences() {
            set.sentences.len()
        } else {
            self.resolved_words().count()
        };
        count.min(u16::MAX as usize) as u16
    }

    fn page(&self, index: u16) -> Option<Page<'_>> {
        let set = self.selected_set()?;

        if set.pages_sentences() {
            let sentence = set.sentences.get(index as usize)?;
            return Some(Page {
                text: sentence.text,
                syllables: sentence.syllables.map(PageSyllables::Notated),
                image_url: sentence.image_url,
            });
        }

        self.resolved_words()
            .nth(index as usize)
            .map(|word| word.card().as_page())
    }

    fn select_set(&mut self, set_id: u16) -> Result<(), Self::Error> {
        let Some(selected) = self.sets.iter().position(|set| set.id == set_id) else {
            debug!("deck: unknown set id={}", set_id);
            return Err(DeckError::UnknownSet(set_id));
        };

        self.selected = selected;
        debug!(
            "deck: selected set id={} pages={}",
            set_id,
            self.page_count()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_deck_opens_the_cat_story() {
        let deck = default_deck();
        assert_eq!(deck.set_id(), 5);
        assert_eq!(deck.set_kind(), SetKind::Booklet);
        assert_eq!(deck.title(), "Historyjka o kocie");
        assert_eq!(deck.page_count(), 3);

        let page = deck.page(1).unwrap();
        assert_eq!(page.text, "Mama ma kota.");
        assert!(page.syllables.is_none());
        assert!(deck.page(3).is_none());
    }

    #[test]
    fn image_lookup_is_per_page() {
        let deck = default_deck();
        assert_eq!(deck.image_url(0), Some("https://picsum.photos/seed/5-0/400/300"));
        assert_eq!(deck.image_url(2), None);
        assert_eq!(deck.image_url(7), None);
    }

    #[test]
    fn word_sets_page_through_library_cards() {
        let mut deck = default_deck();
        deck.select_set(3).unwrap();
        assert_eq!(deck.page_count(), 3);

        let page = deck.page(0).unwrap();
        assert_eq!(page.text, "piłka");
        assert_eq!(page.syllables, Some(PageSyllables::Pieces(&["pił", "ka"])));
        assert!(page.image_url.is_some());
    }

    #[test]
    fn dangling_word_ids_are_skipped() {
        const SETS: [LearningSet; 1] = [LearningSet {
            id: 9,
            name: "Luki",
            kind: SetKind::PictureCards,
            word_ids: &[3, 99, 4],
            sentences: &[],
        }];
        let deck = StaticDeck::new(&WORD_LIBRARY, &SETS);
        assert_eq!(deck.set_id(), 9);
        assert_eq!(deck.page_count(), 2);
        assert_eq!(deck.page(1).map(|page| page.text), Some("kot"));
    }

    #[test]
    fn unknown_set_keeps_selection() {
        let mut deck = default_deck();
        assert_eq!(deck.select_set(42), Err(DeckError::UnknownSet(42)));
        assert_eq!(deck.set_id(), 5);
    }

    #[test]
    fn word_without_image_becomes_word_card() {
        let entry = word(30, "sowa", "", &["so", "wa"]);
        assert!(matches!(entry.card(), Card::Word { word_id: 30, .. }));
        assert!(matches!(WORD_LIBRARY[0].card(), Card::Full { word_id: 1, .. }));
    }
}
