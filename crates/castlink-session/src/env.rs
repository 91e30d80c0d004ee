//! Clock abstraction.
//!
//! The session never reads the system clock directly. Polling intervals,
//! provisioning timeouts and control cooldowns are all measured against an
//! [`Environment`], so tests can drive time by hand.

use std::{ops::Sub, time::Duration};

/// Source of monotonic time for the session.
///
/// # Invariants
///
/// - `now()` never goes backwards. Later calls return instants `>=` earlier
///   ones, and subtracting an earlier instant from a later one never panics.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Instant type used by this environment.
    ///
    /// Production uses `std::time::Instant`; test clocks can use anything
    /// ordered that yields a [`Duration`] on subtraction.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;
}

/// Wall-clock environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }
}
