//! Input abstraction layer.

pub mod scripted;

use crate::content::LearningMode;

/// Keyboard keys the session reacts to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
}

/// Raw learner input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    /// Click or tap on the reading area.
    Click,
    BackButton,
    ForwardButton,
    Key(Key),
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}

/// Logical actions consumed by the session app.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Advance,
    Retreat,
    NextPage,
    PreviousPage,
    /// Switch a word between its whole and split forms.
    ToggleSplit,
    Exit,
}

/// Per-mode mapping from raw input to actions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyBindings {
    mode: LearningMode,
}

impl KeyBindings {
    pub const fn for_mode(mode: LearningMode) -> Self {
        Self { mode }
    }

    pub const fn action_for(self, event: InputEvent) -> Option<Action> {
        use InputEvent::{BackButton, Click, ForwardButton};

        if matches!(event, InputEvent::Key(Key::Escape)) {
            return Some(Action::Exit);
        }

        let action = match (self.mode, event) {
            (LearningMode::SyllablesInMotion, Click | InputEvent::Key(Key::Space)) => {
                Action::ToggleSplit
            }
            (
                LearningMode::SyllablesInMotion,
                ForwardButton | InputEvent::Key(Key::ArrowRight),
            ) => Action::NextPage,
            (LearningMode::SyllablesInMotion, BackButton | InputEvent::Key(Key::ArrowLeft)) => {
                Action::PreviousPage
            }

            (_, Click | InputEvent::Key(Key::Space)) => Action::Advance,
            (_, BackButton) => Action::Retreat,

            (LearningMode::CardShow, ForwardButton | InputEvent::Key(Key::ArrowRight)) => {
                Action::Advance
            }
            (LearningMode::CardShow, InputEvent::Key(Key::ArrowLeft)) => Action::Retreat,

            (LearningMode::Booklet, InputEvent::Key(Key::ArrowRight)) => Action::Advance,
            (LearningMode::Booklet, InputEvent::Key(Key::ArrowLeft)) => Action::Retreat,
            (LearningMode::Booklet, ForwardButton) => Action::NextPage,

            (LearningMode::BookletDiscovery, ForwardButton | InputEvent::Key(Key::ArrowRight)) => {
                Action::NextPage
            }
            (LearningMode::BookletDiscovery, InputEvent::Key(Key::ArrowLeft)) => {
                Action::PreviousPage
            }

            (_, InputEvent::Key(Key::Escape)) => return None,
        };

        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [InputEvent; 7] = [
        InputEvent::Click,
        InputEvent::BackButton,
        InputEvent::ForwardButton,
        InputEvent::Key(Key::ArrowLeft),
        InputEvent::Key(Key::ArrowRight),
        InputEvent::Key(Key::Space),
        InputEvent::Key(Key::Escape),
    ];

    fn actions(mode: LearningMode) -> [Option<Action>; 7] {
        let bindings = KeyBindings::for_mode(mode);
        EVENTS.map(|event| bindings.action_for(event))
    }

    #[test]
    fn card_show_moves_through_syllables_only() {
        use Action::*;
        assert_eq!(
            actions(LearningMode::CardShow),
            [
                Some(Advance),
                Some(Retreat),
                Some(Advance),
                Some(Retreat),
                Some(Advance),
                Some(Advance),
                Some(Exit),
            ]
        );
    }

    #[test]
    fn booklet_forward_button_turns_page() {
        use Action::*;
        assert_eq!(
            actions(LearningMode::Booklet),
            [
                Some(Advance),
                Some(Retreat),
                Some(NextPage),
                Some(Retreat),
                Some(Advance),
                Some(Advance),
                Some(Exit),
            ]
        );
    }

    #[test]
    fn discovery_arrows_turn_pages() {
        use Action::*;
        assert_eq!(
            actions(LearningMode::BookletDiscovery),
            [
                Some(Advance),
                Some(Retreat),
                Some(NextPage),
                Some(PreviousPage),
                Some(NextPage),
                Some(Advance),
                Some(Exit),
            ]
        );
    }

    #[test]
    fn syllables_in_motion_toggles_and_flips_words() {
        use Action::*;
        assert_eq!(
            actions(LearningMode::SyllablesInMotion),
            [
                Some(ToggleSplit),
                Some(PreviousPage),
                Some(NextPage),
                Some(PreviousPage),
                Some(NextPage),
                Some(ToggleSplit),
                Some(Exit),
            ]
        );
    }
}
