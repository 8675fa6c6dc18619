impl<DS, IN> SessionApp<DS, IN>
where
    DS: DeckSource,
    IN: InputProvider,
{
    fn process_inputs(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_event() {
                Ok(Some(event)) => self.apply_input_event(event, now_ms),
                Ok(None) => break,
                Err(_) => {
                    debug!("session: input provider error page={}", self.page_index);
                    break;
                }
            }
        }
    }

    fn apply_input_event(&mut self, event: InputEvent, now_ms: u64) {
        if self.is_closed() {
            return;
        }

        let Some(action) = self.bindings.action_for(event) else {
            return;
        };
        let action = self.page_action(action, event);

        debug!(
            "session: input event={:?} action={:?} mode={} page={}",
            event,
            action,
            self.config.mode.name(),
            self.page_index
        );

        match action {
            Action::Advance => self.apply_advance(now_ms),
            Action::Retreat => self.apply_retreat(now_ms),
            Action::NextPage => self.turn_page(PageTurn::Forward, now_ms),
            Action::PreviousPage => self.turn_page(PageTurn::Backward, now_ms),
            Action::ToggleSplit => self.apply_toggle_split(now_ms),
            Action::Exit => self.enter_closed(now_ms),
        }
    }

    /// A page without a cursor can still be left. Backward inputs turn back,
    /// the forward button and right arrow turn on, and clicks keep retrying.
    fn page_action(&self, action: Action, event: InputEvent) -> Action {
        if !matches!(
            self.state,
            PageState::Waiting { .. } | PageState::Unavailable { .. }
        ) {
            return action;
        }

        match (action, event) {
            (Action::Advance, InputEvent::ForwardButton | InputEvent::Key(Key::ArrowRight)) => {
                Action::NextPage
            }
            (Action::Retreat, _) => Action::PreviousPage,
            _ => action,
        }
    }

    fn apply_toggle_split(&mut self, now_ms: u64) {
        match self.state {
            PageState::Ready(_) => {
                self.split = !self.split;
                debug!(
                    "session: page={} split={}",
                    self.page_index, self.split
                );
                self.start_transition(AnimationKind::Fade, now_ms, ANIM_SPLIT_MS);
                self.pending_redraw = true;
            }
            PageState::Unavailable { .. } => self.retry_page(now_ms),
            PageState::Waiting { .. } | PageState::Empty | PageState::Closed => {}
        }
    }

    fn apply_advance(&mut self, now_ms: u64) {
        let step = match &mut self.state {
            PageState::Ready(cursor) => cursor.advance(),
            PageState::Unavailable { .. } => {
                self.retry_page(now_ms);
                return;
            }
            PageState::Waiting { .. } | PageState::Empty | PageState::Closed => return,
        };
        self.apply_step(step, now_ms);
    }

    fn apply_retreat(&mut self, now_ms: u64) {
        let step = match &mut self.state {
            PageState::Ready(cursor) => cursor.retreat(),
            PageState::Waiting { .. }
            | PageState::Unavailable { .. }
            | PageState::Empty
            | PageState::Closed => return,
        };
        self.apply_step(step, now_ms);
    }

    fn apply_step(&mut self, step: Step, now_ms: u64) {
        match step {
            Step::Moved => self.pending_redraw = true,
            Step::Completed => {
                self.start_transition(AnimationKind::Pulse, now_ms, ANIM_COMPLETE_MS);
                self.pending_redraw = true;
            }
            Step::ImageRevealed => {
                self.start_transition(AnimationKind::Reveal, now_ms, ANIM_REVEAL_MS);
                self.pending_redraw = true;
            }
            Step::Restarted => {
                self.start_transition(AnimationKind::Fade, now_ms, ANIM_STATUS_MS);
                self.pending_redraw = true;
            }
            Step::NextPage => self.turn_page(PageTurn::Forward, now_ms),
            Step::PreviousPage => self.turn_page(PageTurn::Backward, now_ms),
            Step::Ignored => {}
        }
    }
}
