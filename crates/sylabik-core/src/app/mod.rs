//! Session state machine for syllable-by-syllable reading.
//!
//! `SessionApp` is polled by the host: `tick()` drains input and reports
//! whether a redraw is due, `with_screen()` hands a borrowed view model to the
//! renderer, and syllabification of pages without stored syllables is handed
//! off through `take_syllabify_request()` / `apply_syllabify_result()`.

use heapless::String;
use log::debug;

use crate::{
    content::{DeckSource, LearningMode, UpstreamError, static_deck::DEFAULT_SET_ID},
    input::{Action, InputEvent, InputProvider, Key, KeyBindings},
    render::{AnimationFrame, AnimationKind, AnimationSpec, ImageView, Screen, TokenView},
    reveal::{RevealCursor, RevealPolicy, Step, Visibility},
    settings::{PersistedSettings, ResumeState},
    syllables::{self, MAX_LINE_TOKENS, SyllableToken},
    text_policy::{PREVIEW_MAX_CHARS, TITLE_MAX_CHARS, clip_words, page_counter_label},
};

/// Capacity of the text sent out for syllabification.
pub const SYLLABIFY_TEXT_BYTES: usize = 480;

const ANIM_PAGE_MS: u16 = 220;
const ANIM_STATUS_MS: u16 = 180;
const ANIM_SPLIT_MS: u16 = 200;
const ANIM_COMPLETE_MS: u16 = 300;
const ANIM_REVEAL_MS: u16 = 480;
const TITLE_BYTES: usize = 64;
const PAGE_LABEL_BYTES: usize = 40;
const PREVIEW_BYTES: usize = 160;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrainerConfig {
    pub mode: LearningMode,
    pub set_id: u16,
    /// Page turns past either end wrap around instead of stopping.
    pub wrap_pages: bool,
    pub title: &'static str,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            mode: LearningMode::Booklet,
            set_id: DEFAULT_SET_ID,
            wrap_pages: true,
            title: "Sylabik",
        }
    }
}

/// Identifies one page visit. A result carrying an older ticket is stale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyllabifyTicket {
    pub page: u16,
    pub serial: u16,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyllabifyRequest {
    pub ticket: SyllabifyTicket,
    pub text: String<SYLLABIFY_TEXT_BYTES>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delivery {
    Applied,
    Stale,
}

/// Why a page has no cursor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotReady {
    /// Syllabified text produced no tokens.
    Malformed,
    Upstream(UpstreamError),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum PageTurn {
    Forward,
    Backward,
}

#[derive(Clone, Debug)]
enum PageState {
    Empty,
    Waiting { ticket: SyllabifyTicket },
    Unavailable { reason: NotReady },
    Ready(RevealCursor),
    Closed,
}

pub struct SessionApp<DS, IN>
where
    DS: DeckSource,
    IN: InputProvider,
{
    deck: DS,
    input: IN,
    config: TrainerConfig,
    bindings: KeyBindings,
    page_index: u16,
    serial: u16,
    state: PageState,
    /// Motion mode: the current word is shown split into syllables.
    split: bool,
    pending_request: Option<SyllabifyRequest>,
    pending_redraw: bool,
    transition: Option<AnimationSpec>,
    page_visits: u32,
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");
include!("navigation.rs");
