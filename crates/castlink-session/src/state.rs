//! Connection lifecycle.
//!
//! ```text
//! ┌──────┐ connect ┌────────────┐ Opened ┌─────────────────────┐
//! │ Idle │────────>│ Connecting │───────>│ ProvisioningPending │
//! └──────┘         └────────────┘        └─────────────────────┘
//!    ^                                              │ acknowledged
//!    │ Closed                                       ↓
//!    └───────────────── any ─────────────────── ┌───────┐
//!                                               │ Ready │
//!                                               └───────┘
//! ```
//!
//! `Connected` replaces `ProvisioningPending` when nothing is outstanding.
//! `ShortCodeRequired` holds the session back from `Ready` until the service
//! reports it authorized.
//!
//! Any state moves to `Idle` when the transport closes and to `Stopped` on
//! `disconnect`.

/// Where the session is in its connect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Idle,
    /// Transport is being set up.
    Connecting,
    /// The broadcaster must enter a short code before the session is
    /// authorized.
    ShortCodeRequired,
    /// Transport is up.
    Connected,
    /// Transport is up, still waiting for group and scene acknowledgements.
    ProvisioningPending,
    /// Provisioned, authorized and connected.
    Ready,
    /// Torn down by `disconnect`.
    Stopped,
}

impl ConnectionState {
    /// True while a transport connection is expected to exist.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle | Self::Stopped)
    }
}

/// A state transition delivered to `on_state_changed` subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// State before the transition.
    pub previous: ConnectionState,
    /// State after the transition.
    pub current: ConnectionState,
}
