impl<DS, IN> SessionApp<DS, IN>
where
    DS: DeckSource,
    IN: InputProvider,
{
    /// Hand the queued syllabify request to the host. At most one is queued
    /// per page visit; opening another page drops an untaken one.
    pub fn take_syllabify_request(&mut self) -> Option<SyllabifyRequest> {
        let request = self.pending_request.take()?;
        debug!(
            "syllabify: request page={} serial={} bytes={}",
            request.ticket.page,
            request.ticket.serial,
            request.text.len()
        );
        Some(request)
    }

    /// Apply a syllabify outcome. Results for a page visit that is no longer
    /// waiting are discarded without touching the current page.
    pub fn apply_syllabify_result(
        &mut self,
        ticket: SyllabifyTicket,
        result: Result<&str, UpstreamError>,
        now_ms: u64,
    ) -> Delivery {
        let current = match self.state {
            PageState::Waiting { ticket: waiting } => Some(waiting),
            _ => None,
        };
        if current != Some(ticket) {
            debug!(
                "syllabify: stale result page={} serial={} current={:?}",
                ticket.page, ticket.serial, current
            );
            return Delivery::Stale;
        }

        self.state = match result {
            Ok(text) => {
                let line = syllables::tokenize(text);
                if line.is_empty() {
                    debug!(
                        "syllabify: malformed result page={} text={:?}",
                        ticket.page, text
                    );
                    PageState::Unavailable {
                        reason: NotReady::Malformed,
                    }
                } else {
                    debug!(
                        "syllabify: ready page={} tokens={} words={} truncated={}",
                        ticket.page,
                        line.len(),
                        line.word_count(),
                        line.truncated()
                    );
                    PageState::Ready(RevealCursor::new(line, self.config.mode.reveal_config()))
                }
            }
            Err(error) => {
                debug!(
                    "syllabify: upstream failure page={} error={:?}",
                    ticket.page, error
                );
                PageState::Unavailable {
                    reason: NotReady::Upstream(error),
                }
            }
        };

        self.start_transition(AnimationKind::Fade, now_ms, ANIM_STATUS_MS);
        self.pending_redraw = true;
        Delivery::Applied
    }

    fn retry_page(&mut self, now_ms: u64) {
        debug!(
            "syllabify: retry page={} serial={}",
            self.page_index, self.serial
        );
        self.open_page(self.page_index, now_ms, Some(AnimationKind::Fade));
    }

    fn enter_closed(&mut self, now_ms: u64) {
        debug!(
            "session: closed set={} page={}",
            self.deck.set_id(),
            self.page_index
        );
        self.pending_request = None;
        self.state = PageState::Closed;
        self.start_transition(AnimationKind::Fade, now_ms, ANIM_STATUS_MS);
        self.pending_redraw = true;
    }
}
