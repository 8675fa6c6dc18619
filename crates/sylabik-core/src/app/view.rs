impl<DS, IN> SessionApp<DS, IN>
where
    DS: DeckSource,
    IN: InputProvider,
{
    pub fn new(mut deck: DS, input: IN, mut config: TrainerConfig) -> Self {
        if deck.set_id() != config.set_id && deck.select_set(config.set_id).is_err() {
            debug!(
                "session: set id={} unavailable; keeping set id={}",
                config.set_id,
                deck.set_id()
            );
            config.set_id = deck.set_id();
        }

        let mut app = Self {
            deck,
            input,
            config,
            bindings: KeyBindings::for_mode(config.mode),
            page_index: 0,
            serial: 0,
            state: PageState::Empty,
            split: false,
            pending_request: None,
            pending_redraw: true,
            transition: None,
            page_visits: 0,
        };
        app.open_page(0, 0, None);
        app
    }

    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.process_inputs(now_ms);

        let rendered = if self.pending_redraw {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        };

        if self.transition_frame(now_ms).is_some() {
            TickResult::RenderRequested
        } else {
            rendered
        }
    }

    pub fn with_screen<F>(&self, now_ms: u64, f: F)
    where
        F: FnOnce(Screen<'_>),
    {
        let animation = self.transition_frame(now_ms);

        let raw_title = match self.deck.title() {
            title if title.trim().is_empty() => self.config.title,
            title => title,
        };
        let title: String<TITLE_BYTES> = clip_words(raw_title, TITLE_MAX_CHARS);
        let page_label: String<PAGE_LABEL_BYTES> = page_counter_label(
            self.page_index.saturating_add(1),
            self.deck.page_count().max(1),
            self.config.mode.label(),
        );
        let (title, page_label) = (title.as_str(), page_label.as_str());

        match &self.state {
            PageState::Ready(cursor) if self.config.mode == LearningMode::SyllablesInMotion => {
                let line = cursor.line();
                let mut syllables = [TokenView::default(); MAX_LINE_TOKENS];
                for (slot, token) in syllables.iter_mut().zip(line.tokens()) {
                    *slot = match token {
                        SyllableToken::Syllable { text, .. } => TokenView {
                            text,
                            visibility: Visibility::Read,
                        },
                        SyllableToken::Boundary => TokenView::default(),
                    };
                }

                let whole = self
                    .deck
                    .page(self.page_index)
                    .map(|page| page.text.trim())
                    .unwrap_or("");

                f(Screen::Motion {
                    title,
                    page_label,
                    whole,
                    syllables: &syllables[..line.len()],
                    split: self.split,
                    image: ImageView {
                        url: self.deck.image_url(self.page_index),
                        revealed: true,
                    },
                    animation,
                });
            }
            PageState::Ready(cursor) => {
                let line = cursor.line();
                let mut tokens = [TokenView::default(); MAX_LINE_TOKENS];
                for (index, (slot, token)) in tokens.iter_mut().zip(line.tokens()).enumerate() {
                    let text = match token {
                        SyllableToken::Syllable { text, .. } => text,
                        SyllableToken::Boundary => " ",
                    };
                    *slot = TokenView {
                        text,
                        visibility: cursor.visibility_of(index),
                    };
                }

                let revealed = match cursor.config().policy {
                    RevealPolicy::Continuous => true,
                    RevealPolicy::Gated => cursor.image_revealed(),
                };

                f(Screen::Reading {
                    title,
                    page_label,
                    mode: self.config.mode,
                    tokens: &tokens[..line.len()],
                    image: ImageView {
                        url: self.deck.image_url(self.page_index),
                        revealed,
                    },
                    sentence_completed: cursor.sentence_completed(),
                    animation,
                });
            }
            PageState::Waiting { .. } => {
                let raw_preview = self
                    .deck
                    .page(self.page_index)
                    .map(|page| page.text)
                    .unwrap_or("");
                let preview: String<PREVIEW_BYTES> = clip_words(raw_preview, PREVIEW_MAX_CHARS);
                f(Screen::Waiting {
                    title,
                    page_label,
                    preview: &preview,
                    animation,
                });
            }
            PageState::Unavailable { reason } => {
                let line1 = match reason {
                    NotReady::Malformed => "NO SYLLABLES",
                    NotReady::Upstream(error) => error.message(),
                };
                f(Screen::Unavailable {
                    title,
                    page_label,
                    line1,
                    line2: "PRESS TO RETRY",
                    animation,
                });
            }
            PageState::Empty => {
                f(Screen::Empty {
                    title,
                    line1: "NO PAGES IN SET",
                });
            }
            PageState::Closed => {
                f(Screen::Closed {
                    title: self.config.title,
                });
            }
        }
    }

    pub fn with_input_mut<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut IN) -> R,
    {
        f(&mut self.input)
    }

    /// Cursor of the current page while it is ready to read.
    pub fn cursor(&self) -> Option<&RevealCursor> {
        match &self.state {
            PageState::Ready(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn page_index(&self) -> u16 {
        self.page_index
    }

    pub fn mode(&self) -> LearningMode {
        self.config.mode
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, PageState::Closed)
    }

    /// Page opens since the last call.
    pub fn drain_page_visits(&mut self) -> u32 {
        let count = self.page_visits;
        self.page_visits = 0;
        count
    }

    pub fn persisted_settings(&self) -> PersistedSettings {
        PersistedSettings {
            mode: self.config.mode,
            set_id: self.deck.set_id(),
            resume_page: self.page_index,
        }
    }

    pub fn apply_persisted_settings(&mut self, settings: PersistedSettings, now_ms: u64) {
        self.config.mode = settings.mode;
        self.bindings = KeyBindings::for_mode(settings.mode);
        if !self.import_resume(settings.resume(), now_ms) {
            self.open_page(self.page_index, now_ms, Some(AnimationKind::Fade));
        }
    }

    /// Switch mode and restart the current page with a fresh cursor.
    pub fn set_mode(&mut self, mode: LearningMode, now_ms: u64) {
        if mode == self.config.mode {
            return;
        }
        debug!(
            "session: mode {} -> {} page={}",
            self.config.mode.name(),
            mode.name(),
            self.page_index
        );
        self.config.mode = mode;
        self.bindings = KeyBindings::for_mode(mode);
        if !self.is_closed() {
            self.open_page(self.page_index, now_ms, Some(AnimationKind::Fade));
        }
    }

    pub fn export_resume(&self) -> Option<ResumeState> {
        match self.state {
            PageState::Empty | PageState::Closed => None,
            PageState::Waiting { .. } | PageState::Unavailable { .. } | PageState::Ready(_) => {
                Some(ResumeState {
                    set_id: self.deck.set_id(),
                    page_index: self.page_index,
                })
            }
        }
    }

    pub fn import_resume(&mut self, resume: ResumeState, now_ms: u64) -> bool {
        if resume.set_id != self.deck.set_id() {
            if self.deck.select_set(resume.set_id).is_err() {
                debug!("session: resume rejected unknown set id={}", resume.set_id);
                return false;
            }
            self.config.set_id = resume.set_id;
        }

        if resume.page_index >= self.deck.page_count() {
            debug!(
                "session: resume rejected page={} pages={}",
                resume.page_index,
                self.deck.page_count()
            );
            self.open_page(0, now_ms, Some(AnimationKind::Fade));
            return false;
        }

        self.open_page(resume.page_index, now_ms, Some(AnimationKind::Fade));
        true
    }
}
