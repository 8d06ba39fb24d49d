//! A form bound to the worker that carries out its commands
//!
//! Both front ends hold one [`Session`]: they translate input into form
//! events, call [`Session::dispatch`], and poll completions every tick.

use crate::config::AppConfig;
use crate::form::{Command, Event, FormState};
use crate::worker::BroadcastWorker;
use chrono::{DateTime, Local};
use tracing::debug;

pub struct Session {
    pub form: FormState,
    /// When the label last changed or an action was submitted
    pub label_updated_at: Option<DateTime<Local>>,
    worker: BroadcastWorker,
}

impl Session {
    pub fn new(worker: BroadcastWorker, form: FormState) -> Self {
        Self {
            form,
            label_updated_at: None,
            worker,
        }
    }

    /// Session talking to the configured relay over HTTP
    pub fn from_config(config: &AppConfig) -> crate::Result<Self> {
        let worker = BroadcastWorker::from_config(config)?;
        Ok(Self::new(worker, FormState::new(config.stale_policy)))
    }

    pub fn endpoint(&self) -> &str {
        self.worker.endpoint()
    }

    /// Feed one form event through `update` and start any requested work
    pub fn dispatch(&mut self, event: Event) {
        let previous_label = self.form.label.clone();
        let stamp = match &event {
            Event::SearchSubmitted | Event::BroadcastSubmitted => true,
            Event::BroadcastFinished { ticket, .. } => self.form.applies_completion(*ticket),
            Event::SearchEdited(_) | Event::PayloadEdited(_) => false,
        };

        match self.form.update(event) {
            Command::None => {}
            Command::Broadcast(request) => {
                debug!(ticket = request.ticket.get(), "Submitting broadcast");
                self.worker.submit(request);
            }
        }

        if stamp || self.form.label != previous_label {
            self.label_updated_at = Some(Local::now());
        }
    }

    /// Apply every completion that has arrived. Returns true if any did.
    pub fn process_completions(&mut self) -> bool {
        let events = self.worker.drain();
        let any = !events.is_empty();
        for event in events {
            self.dispatch(event);
        }
        any
    }
}
