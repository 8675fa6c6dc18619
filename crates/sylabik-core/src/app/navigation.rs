impl<DS, IN> SessionApp<DS, IN>
where
    DS: DeckSource,
    IN: InputProvider,
{
    fn turn_page(&mut self, turn: PageTurn, now_ms: u64) {
        let total = self.deck.page_count();
        if total == 0 {
            return;
        }

        let target = match turn {
            PageTurn::Forward => next_page(self.page_index, total, self.config.wrap_pages),
            PageTurn::Backward => previous_page(self.page_index, total, self.config.wrap_pages),
        };
        let Some(target) = target else {
            debug!(
                "session: page turn {:?} stopped at edge page={}/{}",
                turn,
                self.page_index.saturating_add(1),
                total
            );
            return;
        };

        debug!(
            "session: page turn {:?} page={}/{} -> {}/{}",
            turn,
            self.page_index.saturating_add(1),
            total,
            target.saturating_add(1),
            total
        );

        let kind = match turn {
            PageTurn::Forward => AnimationKind::SlideLeft,
            PageTurn::Backward => AnimationKind::SlideRight,
        };
        self.open_page(target, now_ms, Some(kind));
    }

    /// Start a fresh visit of `index`: the previous cursor and any untaken
    /// request are dropped and the ticket serial moves on.
    fn open_page(&mut self, index: u16, now_ms: u64, animation: Option<AnimationKind>) {
        self.serial = self.serial.wrapping_add(1);
        self.pending_request = None;
        self.split = false;

        let total = self.deck.page_count();
        let index = index.min(total.saturating_sub(1));
        self.page_index = index;

        let opened = match self.deck.page(index) {
            None => PageState::Empty,
            Some(page) => {
                if let Some(line) = page.stored_line() {
                    debug!(
                        "session: page={} stored syllables tokens={}",
                        index,
                        line.len()
                    );
                    PageState::Ready(RevealCursor::new(line, self.config.mode.reveal_config()))
                } else if page.text.trim().is_empty() {
                    debug!("session: page={} has no text", index);
                    PageState::Unavailable {
                        reason: NotReady::Malformed,
                    }
                } else {
                    let ticket = SyllabifyTicket {
                        page: index,
                        serial: self.serial,
                    };
                    let mut text = String::new();
                    push_truncated(&mut text, page.text.trim());
                    self.pending_request = Some(SyllabifyRequest { ticket, text });
                    PageState::Waiting { ticket }
                }
            }
        };

        if !matches!(opened, PageState::Empty) {
            self.page_visits = self.page_visits.saturating_add(1);
        }
        self.state = opened;

        if let Some(kind) = animation {
            self.start_transition(kind, now_ms, ANIM_PAGE_MS);
        }
        self.pending_redraw = true;
    }

    fn start_transition(&mut self, kind: AnimationKind, now_ms: u64, duration_ms: u16) {
        self.transition = Some(AnimationSpec::new(kind, now_ms, duration_ms));
    }

    fn transition_frame(&self, now_ms: u64) -> Option<AnimationFrame> {
        self.transition.and_then(|anim| anim.frame(now_ms))
    }
}

fn next_page(current: u16, total: u16, wrap: bool) -> Option<u16> {
    if current.saturating_add(1) < total {
        Some(current + 1)
    } else if wrap {
        Some(0)
    } else {
        None
    }
}

fn previous_page(current: u16, total: u16, wrap: bool) -> Option<u16> {
    if current > 0 {
        Some(current - 1)
    } else if wrap {
        Some(total.saturating_sub(1))
    } else {
        None
    }
}

fn push_truncated<const N: usize>(out: &mut String<N>, text: &str) {
    for ch in text.chars() {
        if out.push(ch).is_err() {
            debug!("syllabify: request text truncated at {} bytes", out.len());
            break;
        }
    }
}
