//! Messages sent by the service.

use serde::{Deserialize, Serialize};

use crate::{Group, Participant, ProtocolError, Result};

/// Interactivity state as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteState {
    /// The broadcaster must authorize this client out of band.
    ShortCodeRequired,
    /// Authorized, but not yet accepting audience input.
    Connected,
    /// Accepting audience input.
    Ready,
}

/// Change reported for a single participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipantState {
    /// Participant joined the session.
    Joined,
    /// Participant left the session.
    Left,
    /// Participant changed (for example, moved to another group).
    Updated,
}

/// Service-to-client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Greeting sent once the socket is up.
    Hello {
        /// Protocol revision spoken by the service.
        #[serde(default)]
        protocol_version: u32,
    },

    /// The service's view of the session changed.
    InteractivityStateChanged {
        /// New remote state.
        state: RemoteState,
        /// Code to show the broadcaster while `state` is `ShortCodeRequired`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        short_code: Option<String>,
    },

    /// Acknowledges a `createGroups` request.
    GroupsCreated {
        /// Groups that now exist.
        groups: Vec<Group>,
    },

    /// Acknowledges an `updateGroups` request.
    GroupsUpdated {
        /// Groups with their new scenes.
        groups: Vec<Group>,
    },

    /// Complete, authoritative group list.
    GroupList {
        /// Every group the service knows.
        groups: Vec<Group>,
    },

    /// A participant joined, left, or changed.
    ParticipantStateChanged {
        /// Participant details.
        participant: Participant,
        /// What happened.
        state: ParticipantState,
    },

    /// Button input from a participant.
    Button {
        /// Control that was used.
        control_id: String,
        /// Participant that used it.
        participant_id: String,
        /// `true` on press, `false` on release.
        pressed: bool,
    },

    /// Joystick input from a participant.
    Joystick {
        /// Control that was used.
        control_id: String,
        /// Participant that used it.
        participant_id: String,
        /// Horizontal axis, -1.0 to 1.0.
        x: f64,
        /// Vertical axis, -1.0 to 1.0.
        y: f64,
    },

    /// Error reported by the service.
    Error {
        /// Service error code.
        code: i32,
        /// Human readable description.
        message: String,
    },
}

impl ServerMessage {
    /// Parse a text frame.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))
    }

    /// Serialize into a text frame (used by fakes of the service).
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Short name of the message kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hello { .. } => "hello",
            Self::InteractivityStateChanged { .. } => "interactivityStateChanged",
            Self::GroupsCreated { .. } => "groupsCreated",
            Self::GroupsUpdated { .. } => "groupsUpdated",
            Self::GroupList { .. } => "groupList",
            Self::ParticipantStateChanged { .. } => "participantStateChanged",
            Self::Button { .. } => "button",
            Self::Joystick { .. } => "joystick",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_short_code_state() {
        let msg = ServerMessage::decode(
            r#"{"type":"interactivityStateChanged","state":"shortCodeRequired","shortCode":"X7Q2"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ServerMessage::InteractivityStateChanged {
                state: RemoteState::ShortCodeRequired,
                short_code: Some("X7Q2".into()),
            }
        );
    }

    #[test]
    fn participant_defaults_to_default_group() {
        let msg = ServerMessage::decode(
            r#"{"type":"participantStateChanged","participant":{"participantId":"p1"},"state":"joined"}"#,
        )
        .unwrap();
        let ServerMessage::ParticipantStateChanged { participant, state } = msg else {
            panic!("wrong variant");
        };
        assert_eq!(participant.group_id, crate::DEFAULT_GROUP_ID);
        assert_eq!(state, ParticipantState::Joined);
    }

    #[test]
    fn unknown_type_is_decode_error() {
        let err = ServerMessage::decode(r#"{"type":"teleport"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn non_json_is_decode_error() {
        assert!(ServerMessage::decode("not json").is_err());
        assert!(ServerMessage::decode("").is_err());
    }
}
