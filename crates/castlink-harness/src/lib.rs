//! Deterministic test harness for castlink sessions.
//!
//! [`ManualEnv`] is a clock that only moves when told to, and
//! [`ScriptedRemote`] plays the streaming service over a
//! [`castlink_transport::MemoryTransport`]: it reads what the session sent
//! and answers the way the real service would. Together they make every
//! session behavior reproducible from a single thread.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod env;
mod remote;

pub use env::ManualEnv;
pub use remote::{RemoteConfig, ScriptedRemote};
