//! Scripted stand-in for the streaming service.

use std::{collections::BTreeMap, sync::Arc};

use castlink_proto::{
    ClientMessage, Group, Participant, ParticipantState, RemoteState, ServerMessage,
};
use castlink_transport::{MemoryTransport, Transport};

/// How the scripted service answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Acknowledge `createGroups` and `updateGroups` as soon as they are
    /// pumped.
    pub auto_ack_groups: bool,
    /// Answer `ready` with an `interactivityStateChanged`.
    pub auto_ready: bool,
    /// Demand this short code instead of going ready.
    pub short_code: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { auto_ack_groups: true, auto_ready: true, short_code: None }
    }
}

/// In-process fake of the service, speaking the wire protocol over a
/// [`MemoryTransport`].
///
/// Nothing happens on its own: [`ScriptedRemote::pump`] processes whatever
/// the session has sent so far, and the `send_*` helpers inject traffic.
#[derive(Debug)]
pub struct ScriptedRemote {
    transport: Arc<MemoryTransport>,
    config: RemoteConfig,
    groups: BTreeMap<String, String>,
    cooldowns: BTreeMap<String, u64>,
    received: Vec<ClientMessage>,
}

impl Default for ScriptedRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRemote {
    /// Service that acknowledges everything immediately.
    pub fn new() -> Self {
        Self::with_config(RemoteConfig::default())
    }

    /// Service with explicit behavior.
    pub fn with_config(config: RemoteConfig) -> Self {
        Self {
            transport: Arc::new(MemoryTransport::new()),
            config,
            groups: BTreeMap::new(),
            cooldowns: BTreeMap::new(),
            received: Vec::new(),
        }
    }

    /// Transport to hand to the session.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport) as Arc<dyn Transport>
    }

    /// Underlying memory transport.
    pub fn memory(&self) -> &MemoryTransport {
        &self.transport
    }

    /// Change behavior mid-script.
    pub fn config_mut(&mut self) -> &mut RemoteConfig {
        &mut self.config
    }

    /// Process every frame the session sent since the last pump and answer
    /// per [`RemoteConfig`]. Returns how many frames were processed.
    pub fn pump(&mut self) -> usize {
        let frames = self.transport.take_sent();
        for frame in &frames {
            match ClientMessage::decode(frame) {
                Ok(message) => self.answer(message),
                Err(error) => tracing::warn!(%error, "scripted remote got an undecodable frame"),
            }
        }
        frames.len()
    }

    fn answer(&mut self, message: ClientMessage) {
        tracing::debug!(?message, "scripted remote received");
        self.received.push(message.clone());
        match message {
            ClientMessage::CreateGroups { groups } => {
                self.store(&groups);
                if self.config.auto_ack_groups {
                    self.send(&ServerMessage::GroupsCreated { groups });
                }
            },
            ClientMessage::UpdateGroups { groups } => {
                self.store(&groups);
                if self.config.auto_ack_groups {
                    self.send(&ServerMessage::GroupsUpdated { groups });
                }
            },
            ClientMessage::GetGroups => {
                let groups = self.groups();
                self.send(&ServerMessage::GroupList { groups });
            },
            ClientMessage::Ready { is_ready } => {
                if !self.config.auto_ready {
                    return;
                }
                let delivered = match self.config.short_code.clone() {
                    Some(code) => self.send_short_code(&code),
                    None => self.send_state(if is_ready { RemoteState::Ready } else { RemoteState::Connected }),
                };
                if !delivered {
                    tracing::debug!("scripted remote state reply not delivered");
                }
            },
            ClientMessage::SetCooldown { control_id, cooldown_ms } => {
                self.cooldowns.insert(control_id, cooldown_ms);
            },
        }
    }

    fn store(&mut self, groups: &[Group]) {
        for group in groups {
            self.groups.insert(group.group_id.clone(), group.scene_id.clone());
        }
    }

    /// Every message received so far, in order.
    pub fn received(&self) -> &[ClientMessage] {
        &self.received
    }

    /// Groups the service holds, in id order.
    pub fn groups(&self) -> Vec<Group> {
        self.groups.iter().map(|(g, s)| Group::new(g, s)).collect()
    }

    /// Cooldown last requested for a control, in milliseconds.
    pub fn cooldown(&self, control_id: &str) -> Option<u64> {
        self.cooldowns.get(control_id).copied()
    }

    /// Inject a server message. False if the transport is not open.
    pub fn send(&self, message: &ServerMessage) -> bool {
        match message.encode() {
            Ok(frame) => self.transport.inject_message(&frame),
            Err(error) => {
                tracing::warn!(%error, "scripted remote could not encode");
                false
            },
        }
    }

    /// Report a service state.
    pub fn send_state(&self, state: RemoteState) -> bool {
        self.send(&ServerMessage::InteractivityStateChanged { state, short_code: None })
    }

    /// Demand a short code.
    pub fn send_short_code(&self, code: &str) -> bool {
        self.send(&ServerMessage::InteractivityStateChanged {
            state: RemoteState::ShortCodeRequired,
            short_code: Some(code.to_owned()),
        })
    }

    /// Acknowledge one group as created.
    pub fn ack_group(&mut self, group_id: &str, scene_id: &str) -> bool {
        let groups = vec![Group::new(group_id, scene_id)];
        self.store(&groups);
        self.send(&ServerMessage::GroupsCreated { groups })
    }

    /// Acknowledge a scene change for one group.
    pub fn ack_scene(&mut self, group_id: &str, scene_id: &str) -> bool {
        let groups = vec![Group::new(group_id, scene_id)];
        self.store(&groups);
        self.send(&ServerMessage::GroupsUpdated { groups })
    }

    /// Report a participant change.
    pub fn send_participant(&self, participant_id: &str, user_name: &str, state: ParticipantState) -> bool {
        let participant = Participant {
            participant_id: participant_id.to_owned(),
            user_name: user_name.to_owned(),
            group_id: castlink_proto::DEFAULT_GROUP_ID.to_owned(),
        };
        self.send(&ServerMessage::ParticipantStateChanged { participant, state })
    }

    /// Report a button press or release.
    pub fn send_button(&self, control_id: &str, participant_id: &str, pressed: bool) -> bool {
        self.send(&ServerMessage::Button {
            control_id: control_id.to_owned(),
            participant_id: participant_id.to_owned(),
            pressed,
        })
    }

    /// Report a joystick move.
    pub fn send_joystick(&self, control_id: &str, participant_id: &str, x: f64, y: f64) -> bool {
        self.send(&ServerMessage::Joystick {
            control_id: control_id.to_owned(),
            participant_id: participant_id.to_owned(),
            x,
            y,
        })
    }

    /// Report a service error.
    pub fn send_error(&self, code: i32, message: &str) -> bool {
        self.send(&ServerMessage::Error { code, message: message.to_owned() })
    }

    /// Drop the connection from the service side.
    pub fn close(&self, code: u16, reason: &str) -> bool {
        self.transport.inject_close(code, reason)
    }
}
