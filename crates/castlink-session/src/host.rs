//! Hooks into the host application.

/// Host application settings the session may adjust while connected.
pub trait Host: Send {
    /// Whether the host keeps running while unfocused.
    fn run_in_background(&self) -> bool;

    /// Change whether the host keeps running while unfocused.
    fn set_run_in_background(&mut self, enabled: bool);
}

/// Host with no settings to adjust.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost {
    run_in_background: bool,
}

impl Host for NoopHost {
    fn run_in_background(&self) -> bool {
        self.run_in_background
    }

    fn set_run_in_background(&mut self, enabled: bool) {
        self.run_in_background = enabled;
    }
}
