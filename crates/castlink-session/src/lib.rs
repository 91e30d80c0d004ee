//! Castlink session orchestrator
//!
//! Connects a host application to the interactive streaming service and
//! turns the service's traffic into ordered, host-thread callbacks.
//!
//! # Architecture
//!
//! ```text
//! I/O thread ──> mailbox ──> Session::tick() ──> subscribers
//!                               │
//!                               └──> ProvisioningTracker / GroupDirectory
//! ```
//!
//! The host owns a [`Session`], calls [`Session::connect`] once, and
//! [`Session::tick`] every frame. Everything observable happens inside
//! `tick`: the session never calls back from another thread.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod controls;
mod env;
mod error;
mod events;
mod host;
mod init;
mod provisioning;
mod session;
mod state;
mod subscription;

pub use config::{DEFAULT_ADDRESS, DEFAULT_PROVISIONING_POLL_INTERVAL, GroupSceneBinding, SessionConfig};
pub use controls::{ButtonState, JoystickState};
pub use env::{Environment, SystemEnv};
pub use error::{
    ERROR_DECODE, ERROR_PROVISIONING_TIMEOUT, ERROR_TRANSPORT_SEND, ERROR_TRANSPORT_SETUP,
    SessionError,
};
pub use events::{ButtonEvent, ErrorEvent, JoystickEvent, ParticipantEvent};
pub use host::{Host, NoopHost};
pub use provisioning::{GroupDirectory, ProvisioningTracker};
pub use session::Session;
pub use state::{ConnectionState, StateChange};
pub use subscription::{Callback, Subscribers, SubscriptionId};
