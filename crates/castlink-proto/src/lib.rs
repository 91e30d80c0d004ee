//! Castlink wire protocol
//!
//! Typed messages carried as UTF-8 JSON text frames between the client SDK and
//! the interactive streaming service. Every frame is a single JSON object with
//! a `"type"` tag; field names are camelCase.
//!
//! The transport layer never looks inside a frame. Only the session
//! orchestrator decodes [`ServerMessage`]s (to route them by kind) and encodes
//! [`ClientMessage`]s (provisioning, cooldowns, readiness).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
pub mod errors;
mod server;
mod types;

pub use client::ClientMessage;
pub use errors::{ProtocolError, Result};
pub use server::{ParticipantState, RemoteState, ServerMessage};
pub use types::{DEFAULT_GROUP_ID, Group, Participant};
