//! Payloads delivered to subscribers.

use castlink_proto::{Participant, ParticipantState};

use crate::SessionError;

/// A participant joined, left, or changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEvent {
    /// Participant details as reported.
    pub participant: Participant,
    /// What happened.
    pub state: ParticipantState,
}

/// A button press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Control id.
    pub control_id: String,
    /// Participant that used the control.
    pub participant_id: String,
    /// `true` on press.
    pub pressed: bool,
}

/// A joystick move.
#[derive(Debug, Clone, PartialEq)]
pub struct JoystickEvent {
    /// Control id.
    pub control_id: String,
    /// Participant that used the control.
    pub participant_id: String,
    /// Horizontal axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
}

/// An error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    /// Stable code, see [`SessionError::code`].
    pub code: i32,
    /// Description.
    pub message: String,
}

impl From<&SessionError> for ErrorEvent {
    fn from(error: &SessionError) -> Self {
        Self { code: error.code(), message: error.to_string() }
    }
}
