//! Session configuration.

use std::time::Duration;

use castlink_transport::TransportKind;
use serde::{Deserialize, Serialize};

/// Address used when none is configured.
pub const DEFAULT_ADDRESS: &str = "ws://127.0.0.1:8080/gameclient";

/// How often the tick checks whether provisioning has completed.
pub const DEFAULT_PROVISIONING_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Request that a group exist and show a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSceneBinding {
    /// Group to create.
    pub group_id: String,
    /// Scene the group starts on.
    pub scene_id: String,
}

impl GroupSceneBinding {
    /// Bind `group_id` to `scene_id`.
    pub fn new(group_id: impl Into<String>, scene_id: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), scene_id: scene_id.into() }
    }
}

/// Everything `connect` needs, fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Service endpoint.
    pub address: String,
    /// Extra handshake headers.
    pub headers: Vec<(String, String)>,
    /// Groups to create on connect.
    pub bindings: Vec<GroupSceneBinding>,
    /// Scene to assign to the default group on connect.
    pub default_scene: Option<String>,
    /// Transport backend.
    pub transport: TransportKind,
    /// Force the host to keep running while unfocused for as long as the
    /// session is connected.
    pub keep_running_in_background: bool,
    /// Minimum time between provisioning checks.
    pub provisioning_poll_interval: Duration,
    /// Report an error if provisioning is still incomplete after this long.
    /// `None` waits forever.
    pub provisioning_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            headers: Vec::new(),
            bindings: Vec::new(),
            default_scene: None,
            transport: TransportKind::default(),
            keep_running_in_background: false,
            provisioning_poll_interval: DEFAULT_PROVISIONING_POLL_INTERVAL,
            provisioning_timeout: None,
        }
    }
}

impl SessionConfig {
    /// Config for `address` with defaults elsewhere.
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), ..Self::default() }
    }

    /// Add a handshake header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a group binding.
    #[must_use]
    pub fn with_binding(mut self, group_id: impl Into<String>, scene_id: impl Into<String>) -> Self {
        self.bindings.push(GroupSceneBinding::new(group_id, scene_id));
        self
    }

    /// Replace all group bindings.
    #[must_use]
    pub fn with_bindings(mut self, bindings: Vec<GroupSceneBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    /// Set the default group's scene.
    #[must_use]
    pub fn with_default_scene(mut self, scene_id: impl Into<String>) -> Self {
        self.default_scene = Some(scene_id.into());
        self
    }

    /// Select the transport backend.
    #[must_use]
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    /// Keep the host running in the background while connected.
    #[must_use]
    pub fn with_keep_running_in_background(mut self, enabled: bool) -> Self {
        self.keep_running_in_background = enabled;
        self
    }

    /// Set the provisioning poll interval.
    #[must_use]
    pub fn with_provisioning_poll_interval(mut self, interval: Duration) -> Self {
        self.provisioning_poll_interval = interval;
        self
    }

    /// Report incomplete provisioning after `timeout`.
    #[must_use]
    pub fn with_provisioning_timeout(mut self, timeout: Duration) -> Self {
        self.provisioning_timeout = Some(timeout);
        self
    }
}
