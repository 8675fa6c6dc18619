//! Learning content: library words, booklet sentences and the deck serving them.

pub mod static_deck;

use crate::{
    reveal::RevealConfig,
    syllables::{self, SyllableLine},
};

/// Kind of a learning set as authored by the caregiver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetKind {
    PictureCards,
    Booklet,
    Analysis,
    Comparison,
}

impl SetKind {
    /// Mode a set opens in when nothing else was chosen.
    pub const fn default_mode(self) -> LearningMode {
        match self {
            Self::Booklet => LearningMode::Booklet,
            Self::PictureCards | Self::Analysis | Self::Comparison => LearningMode::CardShow,
        }
    }
}

/// Session modes driven by the reveal engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LearningMode {
    CardShow,
    Booklet,
    BookletDiscovery,
    /// One word at a time, flipped between its whole and split forms.
    SyllablesInMotion,
}

impl LearningMode {
    pub const ALL: [Self; 4] = [
        Self::CardShow,
        Self::Booklet,
        Self::BookletDiscovery,
        Self::SyllablesInMotion,
    ];

    pub const fn reveal_config(self) -> RevealConfig {
        match self {
            Self::CardShow | Self::SyllablesInMotion => RevealConfig::card_show(),
            Self::Booklet => RevealConfig::booklet(),
            Self::BookletDiscovery => RevealConfig::discovery(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CardShow => "Pokaz kart",
            Self::Booklet => "Książeczka",
            Self::BookletDiscovery => "Odkrywanie",
            Self::SyllablesInMotion => "Sylaby w ruchu",
        }
    }

    /// Short config name (`card`, `booklet`, `discovery`, `motion`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::CardShow => "card",
            Self::Booklet => "booklet",
            Self::BookletDiscovery => "discovery",
            Self::SyllablesInMotion => "motion",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            Self::CardShow => 0,
            Self::Booklet => 1,
            Self::BookletDiscovery => 2,
            Self::SyllablesInMotion => 3,
        }
    }

    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::CardShow),
            1 => Some(Self::Booklet),
            2 => Some(Self::BookletDiscovery),
            3 => Some(Self::SyllablesInMotion),
            _ => None,
        }
    }
}

/// Syllables already stored with a page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageSyllables<'a> {
    /// Middle-dot notation for a whole sentence (`"KO·T PI·JE"`).
    Notated(&'a str),
    /// Syllable list of one library word (`["ma", "ma"]`).
    Pieces(&'a [&'a str]),
}

impl PageSyllables<'_> {
    pub fn tokenize(self) -> SyllableLine {
        match self {
            Self::Notated(text) => syllables::tokenize(text),
            Self::Pieces(pieces) => syllables::tokenize_pieces(pieces),
        }
    }
}

/// One addressable unit of a session: a booklet sentence or a word card.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Page<'a> {
    pub text: &'a str,
    pub syllables: Option<PageSyllables<'a>>,
    pub image_url: Option<&'a str>,
}

impl Page<'_> {
    /// Line built from stored syllables, when they yield anything to read.
    pub fn stored_line(&self) -> Option<SyllableLine> {
        let line = self.syllables?.tokenize();
        (!line.is_empty()).then_some(line)
    }
}

/// Word card shapes; each variant carries only what it shows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Card<'a> {
    Image {
        word_id: u16,
        image_url: &'a str,
    },
    Word {
        word_id: u16,
        text: &'a str,
        syllables: &'a [&'a str],
    },
    Full {
        word_id: u16,
        text: &'a str,
        syllables: &'a [&'a str],
        image_url: &'a str,
    },
}

impl<'a> Card<'a> {
    pub const fn word_id(&self) -> u16 {
        match *self {
            Self::Image { word_id, .. } | Self::Word { word_id, .. } | Self::Full { word_id, .. } => {
                word_id
            }
        }
    }

    pub fn as_page(&self) -> Page<'a> {
        match *self {
            Self::Image { image_url, .. } => Page {
                text: "",
                syllables: None,
                image_url: Some(image_url),
            },
            Self::Word {
                text, syllables, ..
            } => Page {
                text,
                syllables: Some(PageSyllables::Pieces(syllables)),
                image_url: None,
            },
            Self::Full {
                text,
                syllables,
                image_url,
                ..
            } => Page {
                text,
                syllables: Some(PageSyllables::Pieces(syllables)),
                image_url: Some(image_url),
            },
        }
    }
}

/// Failure of the external syllabify call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpstreamError {
    Timeout,
    Service(u16),
    InvalidResponse,
}

impl UpstreamError {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Timeout => "SERVICE TIMEOUT",
            Self::Service(_) => "SERVICE ERROR",
            Self::InvalidResponse => "BAD RESPONSE",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeckError {
    UnknownSet(u16),
}

/// Source of pages for the selected learning set.
pub trait DeckSource {
    type Error;

    /// Numeric id of the selected set.
    fn set_id(&self) -> u16;

    fn set_kind(&self) -> SetKind;

    fn title(&self) -> &str;

    fn page_count(&self) -> u16;

    /// Page by zero-based index, `None` past the end.
    fn page(&self, index: u16) -> Option<Page<'_>>;

    /// Image lookup for `(selected set, page index)`.
    fn image_url(&self, index: u16) -> Option<&str> {
        self.page(index).and_then(|page| page.image_url)
    }

    /// Switch to another set; page indices restart at zero.
    fn select_set(&mut self, set_id: u16) -> Result<(), Self::Error>;
}
