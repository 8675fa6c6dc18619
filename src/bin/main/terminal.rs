use std::{
    fmt::Write as _,
    io::{self, BufRead, Write as _},
    thread,
};

use log::{debug, info};
use sylabik_core::{
    input::{InputEvent, Key},
    render::{Screen, TokenView},
    reveal::Visibility,
};

use super::InputChannel;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_UNDERLINE: &str = "\x1b[4m";

/// Map one stdin line to a learner input. An empty line is a click.
pub(super) fn parse_command(line: &str) -> Option<InputEvent> {
    let event = match line.trim().to_ascii_lowercase().as_str() {
        "" | "click" | "c" => InputEvent::Click,
        "space" | "s" => InputEvent::Key(Key::Space),
        "left" | "l" => InputEvent::Key(Key::ArrowLeft),
        "right" | "r" => InputEvent::Key(Key::ArrowRight),
        "back" | "b" => InputEvent::BackButton,
        "fwd" | "forward" | "f" => InputEvent::ForwardButton,
        "esc" | "escape" | "q" | "quit" => InputEvent::Key(Key::Escape),
        _ => return None,
    };
    Some(event)
}

/// Forward stdin commands into the input channel until EOF, then close the
/// session.
pub(super) fn spawn_stdin_reader(events: &'static InputChannel) -> io::Result<()> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match parse_command(&line) {
                    Some(event) => {
                        if events.try_send(event).is_err() {
                            debug!("terminal: input queue full; dropped {:?}", event);
                        }
                    }
                    None => info!(
                        "unknown command {:?}; use click/space/left/right/back/fwd/esc",
                        line.trim()
                    ),
                }
            }
            let _ = events.try_send(InputEvent::Key(Key::Escape));
        })
        .map(|_| ())
}

/// Prints frames to stdout, skipping frames whose text did not change.
pub(super) struct TerminalRenderer {
    last_frame: String,
}

impl TerminalRenderer {
    pub(super) fn new() -> Self {
        Self {
            last_frame: String::new(),
        }
    }

    pub(super) fn render(&mut self, screen: &Screen<'_>) -> io::Result<()> {
        let frame = compose_frame(screen);
        if frame == self.last_frame {
            return Ok(());
        }

        let mut stdout = io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
        self.last_frame = frame;
        Ok(())
    }
}

fn compose_frame(screen: &Screen<'_>) -> String {
    let mut out = String::new();
    match screen {
        Screen::Reading {
            title,
            page_label,
            tokens,
            image,
            sentence_completed,
            ..
        } => {
            let _ = writeln!(out, "{ANSI_BOLD}{title}{ANSI_RESET}  [{page_label}]");
            let _ = writeln!(out, "  {}", styled_tokens(tokens));
            match (image.url, image.revealed) {
                (Some(url), true) => {
                    let _ = writeln!(out, "  image: {url}");
                }
                (Some(_), false) => {
                    let _ = writeln!(out, "  image: ?");
                }
                (None, _) => {}
            }
            if *sentence_completed {
                let _ = writeln!(out, "  ✓");
            }
        }
        Screen::Motion {
            title,
            page_label,
            whole,
            syllables,
            split,
            image,
            ..
        } => {
            let _ = writeln!(out, "{ANSI_BOLD}{title}{ANSI_RESET}  [{page_label}]");
            if *split {
                let _ = writeln!(out, "  {ANSI_BOLD}{}{ANSI_RESET}", split_syllables(syllables));
            } else {
                let _ = writeln!(out, "  {ANSI_BOLD}{whole}{ANSI_RESET}");
            }
            if let Some(url) = image.url {
                let _ = writeln!(out, "  image: {url}");
            }
        }
        Screen::Waiting {
            title,
            page_label,
            preview,
            ..
        } => {
            let _ = writeln!(out, "{ANSI_BOLD}{title}{ANSI_RESET}  [{page_label}]");
            let _ = writeln!(out, "  {ANSI_DIM}{preview} …{ANSI_RESET}");
        }
        Screen::Unavailable {
            title,
            page_label,
            line1,
            line2,
            ..
        } => {
            let _ = writeln!(out, "{ANSI_BOLD}{title}{ANSI_RESET}  [{page_label}]");
            let _ = writeln!(out, "  {line1}");
            let _ = writeln!(out, "  {ANSI_DIM}{line2}{ANSI_RESET}");
        }
        Screen::Empty { title, line1 } => {
            let _ = writeln!(out, "{ANSI_BOLD}{title}{ANSI_RESET}");
            let _ = writeln!(out, "  {line1}");
        }
        Screen::Closed { title } => {
            let _ = writeln!(out, "{title}: do zobaczenia!");
        }
    }
    out
}

fn styled_tokens(tokens: &[TokenView<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.visibility {
            Visibility::Gap => out.push(' '),
            Visibility::Dimmed => {
                let _ = write!(out, "{ANSI_DIM}{}{ANSI_RESET}", token.text);
            }
            Visibility::Read => out.push_str(token.text),
            Visibility::Current => {
                let _ = write!(out, "{ANSI_BOLD}{ANSI_UNDERLINE}{}{ANSI_RESET}", token.text);
            }
        }
    }
    out
}

/// Syllables of one word joined by ` - `; words stay three spaces apart.
fn split_syllables(tokens: &[TokenView<'_>]) -> String {
    let mut out = String::new();
    let mut in_word = false;
    for token in tokens {
        if token.visibility == Visibility::Gap {
            out.push_str("   ");
            in_word = false;
            continue;
        }
        if in_word {
            out.push_str(" - ");
        }
        out.push_str(token.text);
        in_word = true;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_events() {
        assert_eq!(parse_command(""), Some(InputEvent::Click));
        assert_eq!(parse_command("  Space "), Some(InputEvent::Key(Key::Space)));
        assert_eq!(parse_command("fwd"), Some(InputEvent::ForwardButton));
        assert_eq!(parse_command("q"), Some(InputEvent::Key(Key::Escape)));
        assert_eq!(parse_command("jump"), None);
    }

    #[test]
    fn tokens_are_styled_by_visibility() {
        let tokens = [
            TokenView {
                text: "KO",
                visibility: Visibility::Read,
            },
            TokenView {
                text: "T",
                visibility: Visibility::Current,
            },
            TokenView {
                text: " ",
                visibility: Visibility::Gap,
            },
            TokenView {
                text: "PI",
                visibility: Visibility::Dimmed,
            },
        ];
        assert_eq!(
            styled_tokens(&tokens),
            "KO\x1b[1m\x1b[4mT\x1b[0m \x1b[2mPI\x1b[0m"
        );
    }

    fn motion_screen(split: bool) -> String {
        let syllables = [
            TokenView {
                text: "MA",
                visibility: Visibility::Read,
            },
            TokenView {
                text: "MA",
                visibility: Visibility::Read,
            },
            TokenView::default(),
            TokenView {
                text: "MA",
                visibility: Visibility::Read,
            },
        ];
        compose_frame(&Screen::Motion {
            title: "Rodzina",
            page_label: "1/4 Sylaby w ruchu",
            whole: "MAMA MA",
            syllables: &syllables,
            split,
            image: sylabik_core::render::ImageView {
                url: None,
                revealed: true,
            },
            animation: None,
        })
    }

    #[test]
    fn motion_word_prints_whole_or_split() {
        assert!(motion_screen(false).contains("  \x1b[1mMAMA MA\x1b[0m"));
        assert!(motion_screen(true).contains("  \x1b[1mMA - MA   MA\x1b[0m"));
        assert!(!motion_screen(true).contains("image:"));
    }

    #[test]
    fn hidden_image_is_not_printed() {
        let frame = compose_frame(&Screen::Reading {
            title: "Historyjka",
            page_label: "1/3",
            mode: sylabik_core::content::LearningMode::BookletDiscovery,
            tokens: &[],
            image: sylabik_core::render::ImageView {
                url: Some("https://example.test/kot.png"),
                revealed: false,
            },
            sentence_completed: false,
            animation: None,
        });
        assert!(frame.contains("image: ?"));
        assert!(!frame.contains("kot.png"));
    }
}
