//! txcast - single-page transaction broadcast form
//!
//! A search field and a payload text area, backed by a relay that accepts
//! raw transactions at `GET {endpoint}/tx/broadcast/{payload}`.
//!
//! # Features
//!
//! - **Form model**: every input is an [`Event`] fed through
//!   [`FormState::update`], which returns the [`Command`] to carry out
//! - **Broadcast**: percent-encodes the payload and classifies the relay reply
//! - **Overlapping requests**: tickets plus a [`StalePolicy`] decide which
//!   response may set the label
//! - **Front ends**: ratatui terminal form, egui window and one-shot CLI
//!
//! # Example
//!
//! ```no_run
//! use txcast::{broadcast, BroadcastOutcome, HttpTransport};
//!
//! fn main() -> txcast::Result<()> {
//!     let transport = HttpTransport::new(None)?;
//!     match broadcast::broadcast(&transport, "http://127.0.0.1:5000", "0200000001...") {
//!         BroadcastOutcome::Accepted { txid } => println!("txid {}", txid),
//!         other => println!("{}", txcast::form::outcome_label(&other)),
//!     }
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod form;
pub mod gui;
pub mod logging;
pub mod session;
pub mod tui;
pub mod worker;

// Re-export main types
pub use broadcast::{BroadcastOutcome, HttpReply, HttpTransport, Transport};
pub use config::{AppConfig, ConfigArgs, StalePolicy};
pub use error::{Result, TxCastError};
pub use form::{BroadcastRequest, Command, Event, FormState, LabelTone, Ticket};
pub use session::Session;
pub use worker::BroadcastWorker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
