use core::fmt::Debug;

use log::{debug, info};
use sylabik_core::settings::{PersistedSettings, SettingsStore};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

pub(super) struct SettingsSyncState {
    last_saved: PersistedSettings,
    pending: Option<(PersistedSettings, u64)>,
}

impl SettingsSyncState {
    pub(super) fn new(initial: PersistedSettings) -> Self {
        Self {
            last_saved: initial,
            pending: None,
        }
    }

    pub(super) fn track_current(&mut self, current: PersistedSettings, now_ms: u64) {
        if current == self.last_saved {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if *pending != current {
                    *pending = current;
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current, now_ms));
            }
        }
    }

    pub(super) fn flush_if_due<S>(&mut self, store: Option<&mut S>, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: Debug,
    {
        let Some((_, changed_at_ms)) = self.pending else {
            return;
        };

        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }

        self.flush(store, now_ms);
    }

    /// Save whatever is pending regardless of the debounce window.
    pub(super) fn flush<S>(&mut self, store: Option<&mut S>, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: Debug,
    {
        let Some((candidate, _)) = self.pending else {
            return;
        };

        match store {
            Some(store) => match store.save(&candidate) {
                Ok(()) => {
                    debug!(
                        "settings: saved mode={} set={} page={}",
                        candidate.mode.name(),
                        candidate.set_id,
                        candidate.resume_page
                    );
                    self.last_saved = candidate;
                    self.pending = None;
                }
                Err(err) => {
                    // Keep pending changes and retry after another debounce window.
                    info!("settings save failed: {:?}", err);
                    self.pending = Some((candidate, now_ms));
                }
            },
            None => {
                self.last_saved = candidate;
                self.pending = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sylabik_core::content::LearningMode;

    #[derive(Default)]
    struct MemoryStore {
        saved: Vec<PersistedSettings>,
        failing: bool,
    }

    impl SettingsStore for MemoryStore {
        type Error = ();

        fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
            Ok(self.saved.last().copied())
        }

        fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
            if self.failing {
                return Err(());
            }
            self.saved.push(*settings);
            Ok(())
        }
    }

    const START: PersistedSettings = PersistedSettings::new(LearningMode::Booklet, 5);

    fn on_page(page: u16) -> PersistedSettings {
        PersistedSettings {
            resume_page: page,
            ..START
        }
    }

    #[test]
    fn changes_are_saved_after_debounce() {
        let mut store = MemoryStore::default();
        let mut sync = SettingsSyncState::new(START);

        sync.track_current(on_page(1), 0);
        sync.flush_if_due(Some(&mut store), 100);
        assert!(store.saved.is_empty());

        sync.track_current(on_page(2), 200);
        sync.flush_if_due(Some(&mut store), SETTINGS_SAVE_DEBOUNCE_MS + 100);
        assert!(store.saved.is_empty());

        sync.flush_if_due(Some(&mut store), SETTINGS_SAVE_DEBOUNCE_MS + 200);
        assert_eq!(store.saved, [on_page(2)]);
    }

    #[test]
    fn returning_to_saved_state_cancels_pending() {
        let mut store = MemoryStore::default();
        let mut sync = SettingsSyncState::new(START);

        sync.track_current(on_page(1), 0);
        sync.track_current(START, 10);
        sync.flush(Some(&mut store), 10);
        assert!(store.saved.is_empty());
    }

    #[test]
    fn failed_save_stays_pending() {
        let mut store = MemoryStore {
            failing: true,
            ..MemoryStore::default()
        };
        let mut sync = SettingsSyncState::new(START);

        sync.track_current(on_page(1), 0);
        sync.flush(Some(&mut store), 0);
        assert!(store.saved.is_empty());

        store.failing = false;
        sync.flush(Some(&mut store), 50);
        assert_eq!(store.saved, [on_page(1)]);
    }
}
