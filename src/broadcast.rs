//! Broadcast relay client
//!
//! A payload is percent-encoded into the path of
//! `GET {endpoint}/tx/broadcast/{payload}` and the relay answers with a JSON
//! body whose `status` field is `"success"` (with `txid`) or `"error"`
//! (with `message`).

use crate::error::{Result, TxCastError};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Path prefix appended to the configured endpoint
pub const BROADCAST_PATH: &str = "/tx/broadcast/";

/// Percent-encode a string the way `encodeURIComponent` does: every UTF-8
/// byte is escaped except ASCII alphanumerics and `- _ . ! ~ * ' ( )`.
pub fn encode_component(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0F) as usize] as char);
            }
        }
    }
    out
}

/// Full request URL for a payload
pub fn broadcast_url(endpoint: &str, payload: &str) -> String {
    format!(
        "{}{}{}",
        endpoint.trim().trim_end_matches('/'),
        BROADCAST_PATH,
        encode_component(payload)
    )
}

/// Status code and raw body of a relay response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can perform the relay's GET request.
///
/// Implementations report only transport failures as errors; any response
/// that arrives, whatever its status, is returned as an [`HttpReply`].
pub trait Transport: Send + Sync {
    fn get_json(&self, url: &str) -> Result<HttpReply>;
}

/// Blocking reqwest transport
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// `None` disables the request timeout entirely
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &str) -> Result<HttpReply> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpReply { status, body })
    }
}

/// Body shapes the relay is known to send. Only `status` decides the
/// shape; the payload fields may hold any JSON value or be absent.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum RelayResponse {
    Success {
        #[serde(default)]
        txid: Value,
    },
    Error {
        #[serde(default)]
        message: Value,
    },
}

/// Label text for a relay field: strings verbatim, anything else as JSON.
/// A missing field reads as `null`.
fn field_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// What a single broadcast attempt ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Relay accepted the transaction
    Accepted { txid: String },
    /// Relay answered with `status: "error"`
    Rejected { message: String },
    /// 2xx response without a `"success"` or `"error"` status
    Unrecognized,
    /// Transport failure or non-2xx status
    Failed { reason: String },
}

impl BroadcastOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BroadcastOutcome::Accepted { .. })
    }
}

/// Classify a relay response
pub fn interpret(reply: &HttpReply) -> BroadcastOutcome {
    if !reply.is_success() {
        return BroadcastOutcome::Failed {
            reason: TxCastError::Status(reply.status).to_string(),
        };
    }

    match serde_json::from_str::<RelayResponse>(&reply.body) {
        Ok(RelayResponse::Success { txid }) => BroadcastOutcome::Accepted {
            txid: field_text(txid),
        },
        Ok(RelayResponse::Error { message }) => BroadcastOutcome::Rejected {
            message: field_text(message),
        },
        Err(e) => {
            debug!(error = %e, "Relay response has an unknown shape");
            BroadcastOutcome::Unrecognized
        }
    }
}

/// Send one payload and classify the result. Never retries.
pub fn broadcast(transport: &dyn Transport, endpoint: &str, payload: &str) -> BroadcastOutcome {
    let url = broadcast_url(endpoint, payload);
    debug!(url = %url, payload_len = payload.len(), "Broadcasting transaction");

    let outcome = match transport.get_json(&url) {
        Ok(reply) => interpret(&reply),
        Err(e) => BroadcastOutcome::Failed {
            reason: e.to_string(),
        },
    };

    match &outcome {
        BroadcastOutcome::Accepted { txid } => info!(txid = %txid, "Transaction accepted"),
        BroadcastOutcome::Rejected { message } => warn!(message = %message, "Relay rejected transaction"),
        BroadcastOutcome::Unrecognized => warn!(url = %url, "Unrecognized relay response"),
        BroadcastOutcome::Failed { reason } => warn!(reason = %reason, "Broadcast request failed"),
    }

    outcome
}
