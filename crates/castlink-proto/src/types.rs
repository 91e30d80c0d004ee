//! Shared wire types.

use serde::{Deserialize, Serialize};

/// Identifier of the group every participant starts in.
///
/// The service creates it implicitly; clients only ever reassign its scene.
pub const DEFAULT_GROUP_ID: &str = "default";

/// An audience group and the scene it is currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Stable group identifier.
    pub group_id: String,
    /// Scene assigned to the group.
    pub scene_id: String,
}

impl Group {
    /// Create a group-to-scene assignment.
    pub fn new(group_id: impl Into<String>, scene_id: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), scene_id: scene_id.into() }
    }
}

/// A viewer taking part in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Service-assigned participant identifier.
    pub participant_id: String,
    /// Display name.
    #[serde(default)]
    pub user_name: String,
    /// Group the participant is currently in.
    #[serde(default = "default_group")]
    pub group_id: String,
}

fn default_group() -> String {
    DEFAULT_GROUP_ID.to_string()
}
