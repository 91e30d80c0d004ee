//! Manually advanced clock.

use std::{sync::Arc, time::Duration};

use castlink_session::Environment;
use parking_lot::Mutex;

/// Clock that starts at zero and moves only on [`ManualEnv::advance`].
///
/// Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct ManualEnv {
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualEnv {
    /// Clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Time since creation.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Environment for ManualEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.elapsed()
    }
}
