use crate::config::AppConfig;
use crate::form::Event;
use crate::session::Session;
use crate::tui::input::TextInput;
use crate::tui::ui;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::warn;

/// Which field receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Payload,
}

pub struct App {
    pub session: Session,

    // Field editing state; text mirrors the form
    pub search: TextInput,
    pub payload: TextInput,
    pub focus: Focus,

    pub status_message: String,
    pub show_help: bool,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> crate::Result<Self> {
        Ok(Self::with_session(Session::from_config(config)?))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            search: TextInput::default(),
            payload: TextInput::default(),
            focus: Focus::Payload,
            status_message: "Ready".to_string(),
            show_help: false,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                self.handle_terminal_event(event::read()?);
            }

            if last_tick.elapsed() >= tick_rate {
                self.process_completions();
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, event: Event) {
        self.session.dispatch(event);
    }

    pub fn process_completions(&mut self) {
        self.session.process_completions();
    }

    pub fn handle_terminal_event(&mut self, event: TermEvent) {
        match event {
            TermEvent::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            TermEvent::Paste(text) => self.paste(&text),
            _ => {}
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('s') if ctrl => {
                self.dispatch(Event::BroadcastSubmitted);
                return;
            }
            KeyCode::Char('f') if ctrl => {
                self.dispatch(Event::SearchSubmitted);
                return;
            }
            KeyCode::Char('v') if ctrl => {
                self.paste_clipboard();
                return;
            }
            KeyCode::Char('l') if ctrl => {
                self.field_mut().clear();
                self.sync_field();
                return;
            }
            KeyCode::F(1) => {
                self.show_help = true;
                return;
            }
            KeyCode::F(5) => {
                self.dispatch(Event::BroadcastSubmitted);
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Search => Focus::Payload,
                    Focus::Payload => Focus::Search,
                };
                return;
            }
            KeyCode::Esc => {
                if self.field().is_empty() {
                    self.should_quit = true;
                } else {
                    self.field_mut().clear();
                    self.sync_field();
                }
                return;
            }
            _ => {}
        }

        match key.code {
            KeyCode::Enter => match self.focus {
                Focus::Search => self.dispatch(Event::SearchSubmitted),
                Focus::Payload => {
                    self.payload.insert_char('\n');
                    self.sync_field();
                }
            },
            KeyCode::Char(c) if !ctrl => {
                self.field_mut().insert_char(c);
                self.sync_field();
            }
            KeyCode::Backspace => {
                if self.field_mut().backspace() {
                    self.sync_field();
                }
            }
            KeyCode::Delete => {
                if self.field_mut().delete() {
                    self.sync_field();
                }
            }
            KeyCode::Left => self.field_mut().move_left(),
            KeyCode::Right => self.field_mut().move_right(),
            KeyCode::Home => self.field_mut().home(),
            KeyCode::End => self.field_mut().end(),
            _ => {}
        }
    }

    /// Insert text into the focused field. The search field is single-line.
    pub fn paste(&mut self, text: &str) {
        match self.focus {
            Focus::Search => {
                let line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.search.insert_str(&line);
            }
            Focus::Payload => self.payload.insert_str(&text.replace("\r\n", "\n")),
        }
        self.sync_field();
    }

    fn paste_clipboard(&mut self) {
        match read_clipboard() {
            Ok(text) => {
                self.paste(&text);
                self.status_message = format!("Pasted {} characters", text.chars().count());
            }
            Err(e) => {
                warn!(error = %e, "Clipboard paste failed");
                self.status_message = e.to_string();
            }
        }
    }

    fn field(&self) -> &TextInput {
        match self.focus {
            Focus::Search => &self.search,
            Focus::Payload => &self.payload,
        }
    }

    fn field_mut(&mut self) -> &mut TextInput {
        match self.focus {
            Focus::Search => &mut self.search,
            Focus::Payload => &mut self.payload,
        }
    }

    /// Report the focused field's new content to the form
    fn sync_field(&mut self) {
        let event = match self.focus {
            Focus::Search => Event::SearchEdited(self.search.text.clone()),
            Focus::Payload => Event::PayloadEdited(self.payload.text.clone()),
        };
        self.dispatch(event);
    }
}

fn read_clipboard() -> crate::Result<String> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| crate::TxCastError::Clipboard(e.to_string()))?;
    clipboard
        .get_text()
        .map_err(|e| crate::TxCastError::Clipboard(e.to_string()))
}
