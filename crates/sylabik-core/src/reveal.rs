//! Read-progress cursor over one tokenized line.
//!
//! A [`RevealCursor`] owns the [`SyllableLine`] it walks. Moving to another
//! sentence means building a new cursor; there is no way to point an existing
//! one at different tokens.

use log::debug;

use crate::syllables::SyllableLine;

/// How sentence completion is surfaced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevealPolicy {
    /// Completion shows the whole sentence; nothing else is gated.
    Continuous,
    /// Completion is a two-step gate in front of the page image.
    Gated,
}

/// What a continuous cursor does when advanced past a completed sentence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FinishBehavior {
    Restart,
    NextPage,
}

/// Which already-passed syllables stay at full emphasis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadTrail {
    /// Only words whose last syllable has been passed.
    CompletedWords,
    /// Every syllable before the cursor.
    EverySyllable,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RevealConfig {
    pub policy: RevealPolicy,
    /// Ignored by [`RevealPolicy::Gated`], which always hands off to the next page.
    pub on_finish: FinishBehavior,
    pub trail: ReadTrail,
}

impl RevealConfig {
    /// Single word per card; finishing a word moves to the next card.
    pub const fn card_show() -> Self {
        Self {
            policy: RevealPolicy::Continuous,
            on_finish: FinishBehavior::NextPage,
            trail: ReadTrail::EverySyllable,
        }
    }

    /// Linear booklet; finishing a sentence starts it over.
    pub const fn booklet() -> Self {
        Self {
            policy: RevealPolicy::Continuous,
            on_finish: FinishBehavior::Restart,
            trail: ReadTrail::CompletedWords,
        }
    }

    /// Discovery booklet; the image is revealed only after reading.
    pub const fn discovery() -> Self {
        Self {
            policy: RevealPolicy::Gated,
            on_finish: FinishBehavior::NextPage,
            trail: ReadTrail::CompletedWords,
        }
    }
}

/// Cursor position; `BeforeStart` is "nothing read yet", `PastEnd` is the
/// fully-read sentinel one slot after the last token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Position {
    BeforeStart,
    At(u16),
    PastEnd,
}

impl Position {
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::At(index) => Some(index as usize),
            Self::BeforeStart | Self::PastEnd => None,
        }
    }
}

/// Outcome of a transition, for the caller's page handling and redraws.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    Moved,
    Completed,
    ImageRevealed,
    Restarted,
    /// The caller should open the next page; the cursor did not change.
    NextPage,
    /// Underflow at the start; the caller should open the previous page.
    PreviousPage,
    /// Nothing to walk (empty line).
    Ignored,
}

/// Render state of one token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visibility {
    /// Word gap, rendered as plain space.
    Gap,
    Dimmed,
    Read,
    Current,
}

impl Visibility {
    pub const fn is_emphasized(self) -> bool {
        matches!(self, Self::Read | Self::Current)
    }
}

#[derive(Clone, Debug)]
pub struct RevealCursor {
    line: SyllableLine,
    config: RevealConfig,
    position: Position,
    sentence_completed: bool,
    image_revealed: bool,
}

impl RevealCursor {
    pub fn new(line: SyllableLine, config: RevealConfig) -> Self {
        Self {
            line,
            config,
            position: Position::BeforeStart,
            sentence_completed: false,
            image_revealed: false,
        }
    }

    pub fn line(&self) -> &SyllableLine {
        &self.line
    }

    pub fn config(&self) -> RevealConfig {
        self.config
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn sentence_completed(&self) -> bool {
        self.sentence_completed
    }

    pub fn image_revealed(&self) -> bool {
        self.image_revealed
    }

    pub fn advance(&mut self) -> Step {
        let len = self.line.len();
        if len == 0 {
            return Step::Ignored;
        }

        match self.config.policy {
            RevealPolicy::Gated => {
                if self.image_revealed {
                    return Step::NextPage;
                }
                if self.sentence_completed {
                    self.image_revealed = true;
                    debug!("reveal: image revealed tokens={}", len);
                    return Step::ImageRevealed;
                }
            }
            RevealPolicy::Continuous => {
                if self.position == Position::PastEnd {
                    return match self.config.on_finish {
                        FinishBehavior::Restart => {
                            self.position = Position::BeforeStart;
                            self.sentence_completed = false;
                            debug!("reveal: restart tokens={}", len);
                            Step::Restarted
                        }
                        FinishBehavior::NextPage => Step::NextPage,
                    };
                }
            }
        }

        let next = self.next_index(len);
        if next >= len {
            self.position = Position::PastEnd;
            self.sentence_completed = true;
            debug!("reveal: sentence completed tokens={}", len);
            Step::Completed
        } else {
            self.position = Position::At(next as u16);
            Step::Moved
        }
    }

    pub fn retreat(&mut self) -> Step {
        let len = self.line.len();
        if len == 0 {
            return Step::Ignored;
        }

        if self.image_revealed {
            self.image_revealed = false;
            return Step::Moved;
        }

        if self.sentence_completed || self.position == Position::PastEnd {
            self.sentence_completed = false;
            self.position = Position::At((len - 1) as u16);
            return Step::Moved;
        }

        let current = match self.position {
            Position::BeforeStart => return Step::PreviousPage,
            Position::At(0) => {
                self.position = Position::BeforeStart;
                return Step::Moved;
            }
            Position::At(index) => index as usize,
            Position::PastEnd => len,
        };

        let mut target = current - 1;
        if self.line.is_boundary(current) {
            while target > 0 && self.line.is_boundary(target) {
                target -= 1;
            }
        } else {
            // Land where advance() would have rested: the first boundary of the run.
            while target > 0 && self.line.is_boundary(target) && self.line.is_boundary(target - 1)
            {
                target -= 1;
            }
        }

        self.position = Position::At(target as u16);
        Step::Moved
    }

    pub fn visibility_of(&self, index: usize) -> Visibility {
        debug_assert!(index < self.line.len(), "token index {index} out of range");

        let Some(token) = self.line.token(index) else {
            return Visibility::Gap;
        };
        if token.is_boundary() {
            return Visibility::Gap;
        }
        if self.sentence_completed {
            return Visibility::Read;
        }

        match self.position {
            Position::BeforeStart => Visibility::Dimmed,
            Position::PastEnd => Visibility::Read,
            Position::At(position) => {
                let position = position as usize;
                if index == position {
                    Visibility::Current
                } else if self.config.trail == ReadTrail::EverySyllable && index < position {
                    Visibility::Read
                } else if self
                    .line
                    .word_of(index)
                    .is_some_and(|word| word.end_index as usize <= position)
                {
                    Visibility::Read
                } else {
                    Visibility::Dimmed
                }
            }
        }
    }

    /// Visibility of every token in order.
    pub fn visibilities(&self) -> impl Iterator<Item = Visibility> + '_ {
        (0..self.line.len()).map(|index| self.visibility_of(index))
    }

    fn next_index(&self, len: usize) -> usize {
        let current = match self.position {
            Position::BeforeStart => return 0,
            Position::At(index) => index as usize,
            Position::PastEnd => return len,
        };

        let next = current + 1;
        if next < len && self.line.is_boundary(next) {
            return next;
        }

        if self.line.is_boundary(current) {
            let mut landing = next;
            while landing < len && self.line.is_boundary(landing) {
                landing += 1;
            }
            return landing;
        }

        next
    }
}
