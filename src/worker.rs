//! Background broadcast dispatch
//!
//! Each request runs on its own thread and reports back over a channel that
//! the UI loop drains once per tick. Requests are never cancelled; ordering
//! of overlapping completions is left to [`FormState`](crate::form::FormState).

use crate::broadcast::{self, BroadcastOutcome, HttpTransport, Transport};
use crate::config::AppConfig;
use crate::form::{BroadcastRequest, Event, Ticket};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, trace};

/// Messages from broadcast threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: BroadcastOutcome,
}

impl From<Completion> for Event {
    fn from(completion: Completion) -> Self {
        Event::BroadcastFinished {
            ticket: completion.ticket,
            outcome: completion.outcome,
        }
    }
}

pub struct BroadcastWorker {
    transport: Arc<dyn Transport>,
    endpoint: String,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl BroadcastWorker {
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            transport,
            endpoint: endpoint.into(),
            sender,
            receiver,
        }
    }

    /// Worker backed by the reqwest transport
    pub fn from_config(config: &AppConfig) -> crate::Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::new(Arc::new(transport), config.endpoint.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start a request in the background
    pub fn submit(&self, request: BroadcastRequest) {
        let BroadcastRequest { ticket, payload } = request;
        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();
        let tx = self.sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("broadcast-{}", ticket.get()))
            .spawn(move || {
                let outcome = broadcast::broadcast(transport.as_ref(), &endpoint, &payload);
                let _ = tx.send(Completion { ticket, outcome });
            });

        if let Err(e) = spawned {
            error!(error = %e, "Failed to start broadcast thread");
            let _ = self.sender.send(Completion {
                ticket,
                outcome: BroadcastOutcome::Failed {
                    reason: e.to_string(),
                },
            });
        }
    }

    /// Completions that have arrived since the last call, without blocking
    pub fn drain(&self) -> Vec<Event> {
        let events: Vec<Event> = self.receiver.try_iter().map(Event::from).collect();
        if !events.is_empty() {
            trace!(count = events.len(), "Drained broadcast completions");
        }
        events
    }

    /// Block until the next completion, or `None` after `timeout`
    pub fn wait(&self, timeout: Duration) -> Option<Event> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => Some(completion.into()),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::HttpReply;
    use crate::config::StalePolicy;
    use crate::form::{Command, FormState};
    use crossbeam_channel::bounded;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Holds each request until the test releases it, so completion order
    /// can be chosen. Gates are keyed by request URL.
    struct GatedTransport {
        gates: Mutex<HashMap<String, Receiver<String>>>,
    }

    impl Transport for GatedTransport {
        fn get_json(&self, url: &str) -> crate::Result<HttpReply> {
            let gate = self.gates.lock().remove(url);
            let txid = gate.and_then(|g| g.recv().ok()).unwrap_or_default();
            Ok(HttpReply::new(
                200,
                format!(r#"{{"status":"success","txid":"{txid}"}}"#),
            ))
        }
    }

    fn issue(state: &mut FormState, worker: &BroadcastWorker, payload: &str) {
        state.update(Event::PayloadEdited(payload.to_string()));
        match state.update(Event::BroadcastSubmitted) {
            Command::Broadcast(request) => worker.submit(request),
            Command::None => panic!("expected a request"),
        }
    }

    fn run_race(policy: StalePolicy) -> String {
        let (release_first, first_gate) = bounded(1);
        let (release_second, second_gate) = bounded(1);
        let mut gates = HashMap::new();
        gates.insert("http://relay/tx/broadcast/aa".to_string(), first_gate);
        gates.insert("http://relay/tx/broadcast/bb".to_string(), second_gate);
        let transport = GatedTransport {
            gates: Mutex::new(gates),
        };
        let worker = BroadcastWorker::new(Arc::new(transport), "http://relay");
        let mut state = FormState::new(policy);

        issue(&mut state, &worker, "aa");
        issue(&mut state, &worker, "bb");
        assert_eq!(state.in_flight(), 2);

        release_second.send("second".to_string()).unwrap();
        let event = worker.wait(Duration::from_secs(5)).expect("second completion");
        state.update(event);

        release_first.send("first".to_string()).unwrap();
        let event = worker.wait(Duration::from_secs(5)).expect("first completion");
        state.update(event);

        assert!(!state.is_broadcasting());
        state.label
    }

    #[test]
    fn latest_request_wins_race() {
        assert_eq!(run_race(StalePolicy::LatestRequest), "Transaction ID: second");
    }

    #[test]
    fn last_response_wins_race() {
        assert_eq!(run_race(StalePolicy::LastResponse), "Transaction ID: first");
    }

    #[test]
    fn drain_collects_finished_requests() {
        let transport = GatedTransport {
            gates: Mutex::new(HashMap::new()),
        };
        let worker = BroadcastWorker::new(Arc::new(transport), "http://relay");
        assert!(worker.drain().is_empty());
        assert_eq!(worker.wait(Duration::from_millis(10)), None);

        let mut state = FormState::default();
        issue(&mut state, &worker, "cc");

        let mut events = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while events.is_empty() && std::time::Instant::now() < deadline {
            events = worker.drain();
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(events.len(), 1);
        for event in events {
            state.update(event);
        }
        assert_eq!(state.label, "Transaction ID: ");
    }
}
