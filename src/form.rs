//! Form view state
//!
//! The whole form is one [`FormState`] record. Front ends turn user input
//! and worker completions into [`Event`]s, feed them to
//! [`FormState::update`], and carry out the returned [`Command`]. Rendering
//! only reads the record.

use crate::broadcast::BroadcastOutcome;
use crate::config::StalePolicy;
use tracing::debug;

/// Label shown when search is submitted with nothing to search for
pub const SEARCH_EMPTY_MESSAGE: &str = "Please enter a search query";
/// Label shown when broadcast is submitted with an empty payload
pub const PAYLOAD_EMPTY_MESSAGE: &str = "Please enter transaction data to broadcast";
/// Label shown for a relay body that is neither success nor error
pub const UNRECOGNIZED_MESSAGE: &str = "Unrecognized response format";

/// Generation number of an issued broadcast request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Work the front end must start on behalf of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub ticket: Ticket,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Search field content changed
    SearchEdited(String),
    /// Payload text area content changed
    PayloadEdited(String),
    SearchSubmitted,
    BroadcastSubmitted,
    /// A broadcast request issued earlier has completed
    BroadcastFinished {
        ticket: Ticket,
        outcome: BroadcastOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Broadcast(BroadcastRequest),
}

/// Presentation hint for the label; front ends pick colors from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelTone {
    #[default]
    Neutral,
    Info,
    Success,
    Warning,
    Error,
}

/// Everything the form shows
#[derive(Debug, Clone)]
pub struct FormState {
    pub search_query: String,
    pub payload: String,
    /// Single status/result line
    pub label: String,
    pub tone: LabelTone,
    pub stale_policy: StalePolicy,
    last_ticket: Option<Ticket>,
    in_flight: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(StalePolicy::default())
    }
}

impl FormState {
    pub fn new(stale_policy: StalePolicy) -> Self {
        Self {
            search_query: String::new(),
            payload: String::new(),
            label: String::new(),
            tone: LabelTone::Neutral,
            stale_policy,
            last_ticket: None,
            in_flight: 0,
        }
    }

    /// Number of issued requests that have not completed yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_broadcasting(&self) -> bool {
        self.in_flight > 0
    }

    /// Most recently issued request, if any
    pub fn last_ticket(&self) -> Option<Ticket> {
        self.last_ticket
    }

    /// Whether a completion for `ticket` would set the label under the
    /// current stale policy
    pub fn applies_completion(&self, ticket: Ticket) -> bool {
        let stale = self.last_ticket.is_some_and(|latest| ticket < latest);
        !(stale && self.stale_policy == StalePolicy::LatestRequest)
    }

    /// Apply one event and return the follow-up work
    pub fn update(&mut self, event: Event) -> Command {
        match event {
            Event::SearchEdited(query) => {
                self.search_query = query;
                Command::None
            }
            Event::PayloadEdited(payload) => {
                self.payload = payload;
                Command::None
            }
            Event::SearchSubmitted => {
                self.label = search_label(&self.search_query);
                self.tone = if self.search_query.trim().is_empty() {
                    LabelTone::Warning
                } else {
                    LabelTone::Info
                };
                Command::None
            }
            Event::BroadcastSubmitted => {
                if self.payload.trim().is_empty() {
                    self.label = PAYLOAD_EMPTY_MESSAGE.to_string();
                    self.tone = LabelTone::Warning;
                    return Command::None;
                }

                let next = self.last_ticket.map_or(1, |t| t.0 + 1);
                let ticket = Ticket(next);
                self.last_ticket = Some(ticket);
                self.in_flight += 1;
                debug!(ticket = next, in_flight = self.in_flight, "Broadcast issued");

                Command::Broadcast(BroadcastRequest {
                    ticket,
                    payload: self.payload.clone(),
                })
            }
            Event::BroadcastFinished { ticket, outcome } => {
                self.in_flight = self.in_flight.saturating_sub(1);

                if !self.applies_completion(ticket) {
                    debug!(ticket = ticket.0, "Discarding response to superseded broadcast");
                    return Command::None;
                }

                self.label = outcome_label(&outcome);
                self.tone = outcome_tone(&outcome);
                Command::None
            }
        }
    }
}

/// Label for a submitted search. The search itself is a placeholder.
pub fn search_label(query: &str) -> String {
    if query.trim().is_empty() {
        SEARCH_EMPTY_MESSAGE.to_string()
    } else {
        format!("Searching: {}", query)
    }
}

/// Label for a finished broadcast
pub fn outcome_label(outcome: &BroadcastOutcome) -> String {
    match outcome {
        BroadcastOutcome::Accepted { txid } => format!("Transaction ID: {}", txid),
        BroadcastOutcome::Rejected { message } => format!("Error: {}", message),
        BroadcastOutcome::Unrecognized => UNRECOGNIZED_MESSAGE.to_string(),
        BroadcastOutcome::Failed { reason } => format!("Error: {}", reason),
    }
}

pub fn outcome_tone(outcome: &BroadcastOutcome) -> LabelTone {
    match outcome {
        BroadcastOutcome::Accepted { .. } => LabelTone::Success,
        BroadcastOutcome::Unrecognized => LabelTone::Warning,
        BroadcastOutcome::Rejected { .. } | BroadcastOutcome::Failed { .. } => LabelTone::Error,
    }
}
