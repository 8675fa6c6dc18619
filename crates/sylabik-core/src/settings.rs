//! Persisted user settings abstraction.

use crate::content::LearningMode;

/// Session location used to resume on the next start.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResumeState {
    pub set_id: u16,
    pub page_index: u16,
}

/// Session choices that should survive a restart.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PersistedSettings {
    pub mode: LearningMode,
    pub set_id: u16,
    pub resume_page: u16,
}

impl PersistedSettings {
    pub const fn new(mode: LearningMode, set_id: u16) -> Self {
        Self {
            mode,
            set_id,
            resume_page: 0,
        }
    }

    pub const fn resume(&self) -> ResumeState {
        ResumeState {
            set_id: self.set_id,
            page_index: self.resume_page,
        }
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error>;
    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error>;
}
