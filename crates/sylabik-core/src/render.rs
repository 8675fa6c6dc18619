//! App-level view models and animation metadata.

use crate::{content::LearningMode, reveal::Visibility};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnimationKind {
    SlideLeft,
    SlideRight,
    Fade,
    Pulse,
    /// Page image uncovering after the second acknowledgement.
    Reveal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnimationFrame {
    pub kind: AnimationKind,
    /// 0..=100
    pub progress_pct: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    pub start_ms: u64,
    pub duration_ms: u16,
}

impl AnimationSpec {
    pub const fn new(kind: AnimationKind, start_ms: u64, duration_ms: u16) -> Self {
        Self {
            kind,
            start_ms,
            duration_ms,
        }
    }

    pub fn frame(self, now_ms: u64) -> Option<AnimationFrame> {
        let duration = self.duration_ms.max(1) as u64;
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= duration {
            return None;
        }

        let progress = ((elapsed * 100) / duration).min(100) as u8;
        Some(AnimationFrame {
            kind: self.kind,
            progress_pct: progress,
        })
    }
}

/// One rendered token. Boundaries carry a single space and [`Visibility::Gap`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenView<'a> {
    pub text: &'a str,
    pub visibility: Visibility,
}

impl Default for TokenView<'_> {
    fn default() -> Self {
        Self {
            text: " ",
            visibility: Visibility::Gap,
        }
    }
}

/// Page image slot. `url` is `None` when no image exists for the page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImageView<'a> {
    pub url: Option<&'a str>,
    pub revealed: bool,
}

/// App-level view model consumed by the frame renderer.
pub enum Screen<'a> {
    Reading {
        title: &'a str,
        page_label: &'a str,
        mode: LearningMode,
        tokens: &'a [TokenView<'a>],
        image: ImageView<'a>,
        sentence_completed: bool,
        animation: Option<AnimationFrame>,
    },
    /// Word shown whole, or split into its syllables once toggled.
    Motion {
        title: &'a str,
        page_label: &'a str,
        whole: &'a str,
        syllables: &'a [TokenView<'a>],
        split: bool,
        image: ImageView<'a>,
        animation: Option<AnimationFrame>,
    },
    Waiting {
        title: &'a str,
        page_label: &'a str,
        preview: &'a str,
        animation: Option<AnimationFrame>,
    },
    Unavailable {
        title: &'a str,
        page_label: &'a str,
        line1: &'a str,
        line2: &'a str,
        animation: Option<AnimationFrame>,
    },
    Empty {
        title: &'a str,
        line1: &'a str,
    },
    Closed {
        title: &'a str,
    },
}
