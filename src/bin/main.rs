use std::{convert::Infallible, process};

use clap::Parser;
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel, signal::Signal};
use embassy_time::{Duration, Instant, Timer};
use log::{debug, error, info};
use static_cell::StaticCell;
use sylabik_core::{
    app::{Delivery, SessionApp, SyllabifyRequest, TickResult, TrainerConfig},
    content::{
        DeckSource, LearningMode,
        static_deck::{DEFAULT_SET_ID, StaticDeck, default_deck},
    },
    input::{InputEvent, InputProvider},
    settings::{PersistedSettings, SettingsStore},
};

use settings_file::FileSettingsStore;
use settings_sync::SettingsSyncState;
use syllabify::SyllabifyResponse;
use terminal::TerminalRenderer;

#[path = "main/settings_file.rs"]
mod settings_file;
#[path = "main/settings_sync.rs"]
mod settings_sync;
#[path = "main/syllabify.rs"]
mod syllabify;
#[path = "main/terminal.rs"]
mod terminal;

const TITLE: &str = "Sylabik";
const FRAME_INTERVAL_MS: u64 = 16;
const INPUT_QUEUE_DEPTH: usize = 16;
const SYLLABIFY_QUEUE_DEPTH: usize = 2;
const DEFAULT_SYLLABIFY_DELAY_MS: u64 = 350;
const SYLLABIFY_TIMEOUT_MS: u64 = 3_000;
const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;
const DEFAULT_SETTINGS_PATH: &str = "sylabik.settings";

type InputChannel = Channel<CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_DEPTH>;
/// Holds only the newest request; the session loop never waits on it.
type RequestSignal = Signal<CriticalSectionRawMutex, SyllabifyRequest>;
type ResponseChannel = Channel<CriticalSectionRawMutex, SyllabifyResponse, SYLLABIFY_QUEUE_DEPTH>;
type HostApp = SessionApp<StaticDeck<'static>, ChannelInput>;

static INPUT_EVENTS: StaticCell<InputChannel> = StaticCell::new();
static SYLLABIFY_REQUESTS: RequestSignal = Signal::new();
static SYLLABIFY_RESPONSES: ResponseChannel = Channel::new();

/// Input provider fed by the stdin thread.
struct ChannelInput {
    events: &'static InputChannel,
}

impl InputProvider for ChannelInput {
    type Error = Infallible;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        Ok(self.events.try_receive().ok())
    }
}

/// Terminal host for syllable-by-syllable reading sessions.
#[derive(Parser, Debug)]
#[command(name = "sylabik")]
#[command(about = "Syllable-by-syllable reading sessions in the terminal")]
struct HostOptions {
    /// Learning mode: card, booklet, discovery or motion (default: the set's own mode).
    #[arg(long, env = "SYLABIK_MODE", value_parser = parse_mode)]
    mode: Option<LearningMode>,

    /// Learning set to open.
    #[arg(long = "set", env = "SYLABIK_SET", value_name = "ID")]
    set_id: Option<u16>,

    /// Reply delay of the bundled syllabify service.
    #[arg(long, env = "SYLABIK_SYLLABIFY_DELAY_MS", default_value_t = DEFAULT_SYLLABIFY_DELAY_MS)]
    syllabify_delay_ms: u64,

    /// Settings file. An empty path keeps settings in memory only.
    #[arg(long, env = "SYLABIK_SETTINGS", default_value = DEFAULT_SETTINGS_PATH)]
    settings: String,

    /// Do not read or write the settings file.
    #[arg(long)]
    no_settings: bool,
}

fn parse_mode(raw: &str) -> Result<LearningMode, String> {
    LearningMode::from_name(raw)
        .ok_or_else(|| format!("unknown mode {raw:?}; expected card, booklet, discovery or motion"))
}

impl HostOptions {
    /// `None` keeps settings in memory only.
    fn settings_path(&self) -> Option<&str> {
        let path = self.settings.trim();
        (!self.no_settings && !path.is_empty()).then_some(path)
    }

    /// Without an explicit mode the chosen set opens in its own default mode.
    fn trainer_config(&self) -> TrainerConfig {
        let defaults = TrainerConfig::default();
        let set_id = self.set_id.unwrap_or(DEFAULT_SET_ID);
        let mut deck = default_deck();
        let set_mode = deck
            .select_set(set_id)
            .ok()
            .map(|()| deck.set_kind().default_mode());
        TrainerConfig {
            mode: self.mode.or(set_mode).unwrap_or(defaults.mode),
            set_id,
            title: TITLE,
            ..defaults
        }
    }

    /// Explicit options win over what was saved; switching sets drops the
    /// saved page.
    fn startup_settings(&self, saved: PersistedSettings) -> PersistedSettings {
        let mode = self.mode.unwrap_or(saved.mode);
        match self.set_id {
            Some(set_id) if set_id != saved.set_id => PersistedSettings::new(mode, set_id),
            _ => PersistedSettings { mode, ..saved },
        }
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = HostOptions::parse();
    let config = options.trainer_config();

    let events: &'static InputChannel = INPUT_EVENTS.init(Channel::new());
    if let Err(err) = terminal::spawn_stdin_reader(events) {
        error!("stdin reader failed to start: {}", err);
        process::exit(1);
    }

    let mut app = SessionApp::new(default_deck(), ChannelInput { events }, config);

    let mut settings_store = options.settings_path().map(FileSettingsStore::new);
    match settings_store.as_mut() {
        Some(store) => match store.load() {
            Ok(Some(saved)) => {
                app.apply_persisted_settings(options.startup_settings(saved), 0);
                info!("settings restored from {}", store.path().display());
            }
            Ok(None) => {
                info!("no saved settings at {}", store.path().display());
            }
            Err(err) => {
                info!("failed to read saved settings ({:?}); using defaults", err);
            }
        },
        None => info!("settings storage disabled; changes will be volatile"),
    }

    let mut settings_sync = SettingsSyncState::new(app.persisted_settings());

    let settings = app.persisted_settings();
    info!(
        "Session started: mode={} set={} page={} syllabify_delay_ms={}",
        settings.mode.name(),
        settings.set_id,
        settings.resume_page.saturating_add(1),
        options.syllabify_delay_ms
    );
    info!("Commands: click (enter), space, left, right, back, fwd, esc");

    let session = run_session(&mut app, settings_store.as_mut(), &mut settings_sync);
    let service = syllabify::serve(
        &SYLLABIFY_REQUESTS,
        &SYLLABIFY_RESPONSES,
        Duration::from_millis(options.syllabify_delay_ms),
        Duration::from_millis(SYLLABIFY_TIMEOUT_MS),
    );

    let code = match select(session, service).await {
        Either::First(code) => code,
        Either::Second(never) => never,
    };
    process::exit(code);
}

async fn run_session(
    app: &mut HostApp,
    mut settings_store: Option<&mut FileSettingsStore>,
    settings_sync: &mut SettingsSyncState,
) -> i32 {
    let mut renderer = TerminalRenderer::new();
    let started = Instant::now();
    let mut page_visits = 0u32;

    loop {
        let now_ms = started.elapsed().as_millis();

        while let Ok(response) = SYLLABIFY_RESPONSES.try_receive() {
            let result = match &response.result {
                Ok(text) => Ok(text.as_str()),
                Err(err) => Err(*err),
            };
            if app.apply_syllabify_result(response.ticket, result, now_ms) == Delivery::Stale {
                debug!(
                    "syllabify: dropped late reply page={} serial={}",
                    response.ticket.page, response.ticket.serial
                );
            }
        }

        if app.tick(now_ms) == TickResult::RenderRequested {
            let mut written = Ok(());
            app.with_screen(now_ms, |screen| written = renderer.render(&screen));
            if let Err(err) = written {
                error!("terminal write failed: {}", err);
                return 1;
            }
        }

        if let Some(request) = app.take_syllabify_request() {
            syllabify::submit(&SYLLABIFY_REQUESTS, request);
        }

        page_visits = page_visits.saturating_add(app.drain_page_visits());
        settings_sync.track_current(app.persisted_settings(), now_ms);
        settings_sync.flush_if_due(settings_store.as_deref_mut(), now_ms);

        if app.is_closed() {
            settings_sync.flush(settings_store.as_deref_mut(), now_ms);
            info!("session closed after {} page visits", page_visits);
            return 0;
        }

        Timer::after_millis(FRAME_INTERVAL_MS).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(mode: Option<LearningMode>, set_id: Option<u16>) -> HostOptions {
        HostOptions {
            mode,
            set_id,
            syllabify_delay_ms: 0,
            settings: String::new(),
            no_settings: true,
        }
    }

    const SAVED: PersistedSettings = PersistedSettings {
        mode: LearningMode::CardShow,
        set_id: 3,
        resume_page: 2,
    };

    #[test]
    fn saved_settings_apply_when_no_options_given() {
        assert_eq!(options(None, None).startup_settings(SAVED), SAVED);
    }

    #[test]
    fn explicit_mode_keeps_saved_page() {
        let settings = options(Some(LearningMode::Booklet), Some(3)).startup_settings(SAVED);
        assert_eq!(settings.mode, LearningMode::Booklet);
        assert_eq!(settings.resume_page, 2);
    }

    #[test]
    fn explicit_set_starts_from_first_page() {
        let settings = options(None, Some(5)).startup_settings(SAVED);
        assert_eq!(settings, PersistedSettings::new(LearningMode::CardShow, 5));
    }

    #[test]
    fn trainer_config_defaults_to_booklet_story() {
        let config = options(None, None).trainer_config();
        assert_eq!(config.mode, LearningMode::Booklet);
        assert_eq!(config.set_id, DEFAULT_SET_ID);
        assert_eq!(config.title, TITLE);
    }

    #[test]
    fn command_line_flags_parse() {
        let options = HostOptions::try_parse_from([
            "sylabik",
            "--mode",
            "Motion",
            "--set",
            "3",
            "--syllabify-delay-ms",
            "20",
            "--no-settings",
        ])
        .unwrap();
        assert_eq!(options.mode, Some(LearningMode::SyllablesInMotion));
        assert_eq!(options.set_id, Some(3));
        assert_eq!(options.syllabify_delay_ms, 20);
        assert_eq!(options.settings_path(), None);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(HostOptions::try_parse_from(["sylabik", "--mode", "memory"]).is_err());
        assert!(HostOptions::try_parse_from(["sylabik", "--set", "kot"]).is_err());
        assert!(HostOptions::try_parse_from(["sylabik", "--syllabify-delay-ms", "-5"]).is_err());
    }

    #[test]
    fn blank_settings_path_disables_storage() {
        let options = HostOptions::try_parse_from(["sylabik", "--settings", "  "]).unwrap();
        assert_eq!(options.settings_path(), None);

        let options = HostOptions::try_parse_from(["sylabik", "--settings", "a.bin"]).unwrap();
        assert_eq!(options.settings_path(), Some("a.bin"));
    }

    #[test]
    fn unknown_set_falls_back_to_default_mode() {
        let config = options(None, Some(99)).trainer_config();
        assert_eq!(config.mode, LearningMode::Booklet);
        assert_eq!(config.set_id, 99);
    }

    #[test]
    fn picture_set_opens_as_card_show() {
        let config = options(None, Some(3)).trainer_config();
        assert_eq!(config.mode, LearningMode::CardShow);

        let config = options(Some(LearningMode::BookletDiscovery), Some(3)).trainer_config();
        assert_eq!(config.mode, LearningMode::BookletDiscovery);
    }
}
