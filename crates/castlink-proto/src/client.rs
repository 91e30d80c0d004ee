//! Messages sent by the client.

use serde::{Deserialize, Serialize};

use crate::{Group, ProtocolError, Result};

/// Client-to-service messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Ask the service to start (or stop) accepting audience input.
    Ready {
        /// `true` to go interactive.
        is_ready: bool,
    },

    /// Create new audience groups, each bound to a scene.
    CreateGroups {
        /// Groups to create.
        groups: Vec<Group>,
    },

    /// Reassign the scene of existing groups.
    UpdateGroups {
        /// New assignments.
        groups: Vec<Group>,
    },

    /// Request the authoritative group list.
    GetGroups,

    /// Disable a control for everyone for a while.
    SetCooldown {
        /// Control to cool down.
        control_id: String,
        /// Cooldown length in milliseconds.
        cooldown_ms: u64,
    },
}

impl ClientMessage {
    /// Serialize into a text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Parse a text frame produced by [`ClientMessage::encode`].
    ///
    /// Only fakes of the service need this direction.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}
