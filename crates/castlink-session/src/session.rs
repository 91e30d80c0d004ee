//! The session orchestrator.
//!
//! A [`Session`] owns one transport and turns what arrives on it into ordered
//! callbacks. All of its logic runs on the host thread, inside
//! [`Session::connect`], [`Session::tick`] and [`Session::disconnect`]; the
//! only other threads involved are the transport's I/O thread and the short
//! lived init task, and both talk to the session solely through the
//! transport mailbox or the init task's join handle.
//!
//! # Readiness
//!
//! `on_ready` fires once per connect cycle, the first time all three hold:
//!
//! - every provisioning request has been observed in the group directory
//! - the service does not require a short code
//! - the transport is open
//!
//! Participant events are held back until provisioning is observed complete
//! and are then delivered once, in arrival order.

use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
    time::Duration,
};

use castlink_proto::{
    ClientMessage, DEFAULT_GROUP_ID, Group, Participant, ParticipantState, RemoteState, ServerMessage,
};
use castlink_transport::{QueuedEvent, SocketHandle, Transport};

use crate::{
    ButtonEvent, ButtonState, ConnectionState, Environment, ErrorEvent, GroupDirectory, Host,
    JoystickEvent, JoystickState, NoopHost, ParticipantEvent, ProvisioningTracker, SessionConfig,
    SessionError, StateChange, Subscribers, SubscriptionId,
    controls::Controls,
    init::{InitRequest, InitTask},
};

/// Subscriber registries, one per event type.
#[derive(Debug, Default)]
struct Listeners {
    ready: Subscribers<()>,
    state_changed: Subscribers<StateChange>,
    participant: Subscribers<ParticipantEvent>,
    button: Subscribers<ButtonEvent>,
    joystick: Subscribers<JoystickEvent>,
    error: Subscribers<ErrorEvent>,
}

impl Listeners {
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.ready.unsubscribe(id)
            || self.state_changed.unsubscribe(id)
            || self.participant.unsubscribe(id)
            || self.button.unsubscribe(id)
            || self.joystick.unsubscribe(id)
            || self.error.unsubscribe(id)
    }
}

/// Client session with the interactive streaming service.
pub struct Session<E: Environment> {
    config: SessionConfig,
    env: E,
    transport: Arc<dyn Transport>,
    host: Box<dyn Host>,
    listeners: Listeners,
    next_subscription: u64,

    state: ConnectionState,
    init: Option<InitTask>,
    /// A connect was accepted and has not yet reached ready or failed.
    connect_pending: bool,
    ready_fired: bool,
    /// Provisioning was observed complete this cycle.
    provisioned: bool,
    /// The service is not asking for a short code.
    authorized: bool,
    transport_live: bool,
    short_code: Option<String>,

    tracker: ProvisioningTracker,
    directory: GroupDirectory,
    roster: BTreeMap<String, Participant>,
    deferred: VecDeque<ParticipantEvent>,
    controls: Controls<E::Instant>,
    requested_scene: Option<String>,
    saved_background: Option<bool>,

    connect_started: Option<E::Instant>,
    last_provisioning_check: Option<E::Instant>,
    timeout_reported: bool,
}

impl<E: Environment> Session<E> {
    /// Session using the transport selected by `config.transport`.
    pub fn new(config: SessionConfig, env: E) -> Self {
        let transport = config.transport.build();
        Self::with_transport(config, env, transport)
    }

    /// Session over an explicit transport.
    pub fn with_transport(config: SessionConfig, env: E, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            env,
            transport,
            host: Box::new(NoopHost::default()),
            listeners: Listeners::default(),
            next_subscription: 0,
            state: ConnectionState::Idle,
            init: None,
            connect_pending: false,
            ready_fired: false,
            provisioned: false,
            authorized: true,
            transport_live: false,
            short_code: None,
            tracker: ProvisioningTracker::default(),
            directory: GroupDirectory::default(),
            roster: BTreeMap::new(),
            deferred: VecDeque::new(),
            controls: Controls::default(),
            requested_scene: None,
            saved_background: None,
            connect_started: None,
            last_provisioning_check: None,
            timeout_reported: false,
        }
    }

    /// Replace the host hooks.
    #[must_use]
    pub fn with_host(mut self, host: impl Host + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Start connecting. Ignored while a previous connect is still pending.
    ///
    /// `go_interactive` tells the service whether to start accepting input
    /// right away.
    pub fn connect(&mut self, go_interactive: bool) {
        if self.connect_pending {
            tracing::debug!(state = ?self.state, "connect already pending, ignoring");
            return;
        }
        if let Some(previous) = self.init.take() {
            previous.cancel();
            if let Err(error) = previous.join() {
                tracing::debug!(%error, "previous init task ended with error");
            }
        }

        self.connect_pending = true;
        self.transport_live &= self.transport.is_open();
        self.ready_fired = false;
        self.provisioned = false;
        self.authorized = true;
        self.short_code = None;
        self.timeout_reported = false;
        self.last_provisioning_check = None;
        self.connect_started = Some(self.env.now());

        if self.config.keep_running_in_background && self.saved_background.is_none() {
            self.saved_background = Some(self.host.run_in_background());
            self.host.set_run_in_background(true);
        }

        self.tracker.reset();
        let mut messages =
            self.tracker.begin(&self.config.bindings, self.config.default_scene.as_deref());
        if self.config.default_scene.is_some() {
            self.requested_scene.clone_from(&self.config.default_scene);
        }
        messages.push(ClientMessage::Ready { is_ready: go_interactive });

        let frames = messages.iter().filter_map(|message| self.encode(message)).collect();
        let request = InitRequest {
            address: self.config.address.clone(),
            headers: self.config.headers.clone(),
            frames,
        };

        tracing::info!(address = %self.config.address, go_interactive, "connecting");
        match InitTask::spawn(Arc::clone(&self.transport), request) {
            Ok(task) => {
                self.init = Some(task);
                let next = if self.transport_live { self.settled_state() } else { ConnectionState::Connecting };
                self.set_state(next);
            },
            Err(error) => {
                self.connect_pending = false;
                self.report(&error);
                self.set_state(ConnectionState::Idle);
            },
        }
    }

    /// Tear everything down. Safe to call at any time, including twice.
    ///
    /// Subscriptions survive; everything learned from the service does not.
    pub fn disconnect(&mut self) {
        if let Some(task) = self.init.take() {
            task.cancel();
            if let Err(error) = task.join() {
                tracing::debug!(%error, "init task ended with error during disconnect");
            }
        }
        self.transport.close();
        self.transport.clear_events();

        self.tracker.reset();
        self.directory.clear();
        self.roster.clear();
        self.deferred.clear();
        self.controls.clear();
        if let Some(saved) = self.saved_background.take() {
            self.host.set_run_in_background(saved);
        }

        self.connect_pending = false;
        self.ready_fired = false;
        self.provisioned = false;
        self.authorized = true;
        self.transport_live = false;
        self.short_code = None;
        self.connect_started = None;
        self.last_provisioning_check = None;
        self.timeout_reported = false;

        if self.state != ConnectionState::Stopped {
            tracing::info!(state = ?self.state, "disconnected");
        }
        self.set_state(ConnectionState::Stopped);
    }

    /// Deliver everything that arrived since the last tick. Call once per
    /// host frame.
    pub fn tick(&mut self) {
        self.reap_init();
        self.controls.begin_tick();

        for (handle, event) in self.transport.drain_events() {
            if self.transport.handle().is_some_and(|current| current != handle) {
                self.dispatch_stale(handle, event);
            } else {
                self.dispatch(event);
            }
        }

        self.check_provisioning();
    }

    /// Ask the service to disable `control_id` for `duration`.
    ///
    /// Events for the control that are already queued are still delivered.
    pub fn trigger_cooldown(&mut self, control_id: &str, duration: Duration) -> Result<(), SessionError> {
        self.controls.start_cooldown(control_id, self.env.now(), duration);
        let cooldown_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.send(&ClientMessage::SetCooldown { control_id: control_id.to_owned(), cooldown_ms })
    }

    /// Time left on a cooldown started by [`Session::trigger_cooldown`].
    pub fn cooldown_remaining(&self, control_id: &str) -> Duration {
        self.controls.cooldown_remaining(control_id, self.env.now())
    }

    /// Snapshot of a button. Unknown controls read as released.
    pub fn button_state(&self, control_id: &str) -> ButtonState {
        self.controls.button(control_id)
    }

    /// Latest joystick position. Unknown controls read as centered.
    pub fn joystick_state(&self, control_id: &str) -> JoystickState {
        self.controls.joystick(control_id)
    }

    /// Scene shown to the default group.
    pub fn current_scene(&self) -> Option<&str> {
        self.directory.scene_of(DEFAULT_GROUP_ID).or(self.requested_scene.as_deref())
    }

    /// Move the default group to `scene_id`.
    pub fn set_current_scene(&mut self, scene_id: &str) -> Result<(), SessionError> {
        self.requested_scene = Some(scene_id.to_owned());
        self.send(&ClientMessage::UpdateGroups { groups: vec![Group::new(DEFAULT_GROUP_ID, scene_id)] })
    }

    /// Ask the service for its full group list.
    pub fn refresh_groups(&mut self) -> Result<(), SessionError> {
        self.send(&ClientMessage::GetGroups)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Short code to show the broadcaster, while one is required.
    pub fn short_code(&self) -> Option<&str> {
        self.short_code.as_deref()
    }

    /// Participants delivered so far this cycle, by id.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.roster.values()
    }

    /// Group directory as last reported by the service.
    pub fn groups(&self) -> &GroupDirectory {
        &self.directory
    }

    /// Outstanding provisioning requests.
    pub fn provisioning(&self) -> &ProvisioningTracker {
        &self.tracker
    }

    /// True once provisioning was observed complete this cycle.
    pub fn is_provisioned(&self) -> bool {
        self.provisioned
    }

    /// True once `on_ready` fired this cycle.
    pub fn is_ready_fired(&self) -> bool {
        self.ready_fired
    }

    /// Called once per connect cycle when the session becomes ready.
    pub fn on_ready(&mut self, mut callback: impl FnMut() + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.listeners.ready.subscribe(id, Box::new(move |()| callback()));
        id
    }

    /// Called on every state transition, and on every state report from the
    /// service even when unchanged.
    pub fn on_state_changed(&mut self, callback: impl FnMut(&StateChange) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.listeners.state_changed.subscribe(id, Box::new(callback));
        id
    }

    /// Called for participant changes, once provisioning is complete.
    pub fn on_participant_state_changed(
        &mut self,
        callback: impl FnMut(&ParticipantEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.listeners.participant.subscribe(id, Box::new(callback));
        id
    }

    /// Called for every button event.
    pub fn on_button_event(&mut self, callback: impl FnMut(&ButtonEvent) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.listeners.button.subscribe(id, Box::new(callback));
        id
    }

    /// Called for every joystick event.
    pub fn on_joystick_event(&mut self, callback: impl FnMut(&JoystickEvent) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.listeners.joystick.subscribe(id, Box::new(callback));
        id
    }

    /// Called for every error.
    pub fn on_error(&mut self, callback: impl FnMut(&ErrorEvent) + Send + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.listeners.error.subscribe(id, Box::new(callback));
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn next_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId::new(self.next_subscription)
    }

    fn reap_init(&mut self) {
        if !self.init.as_ref().is_some_and(InitTask::is_finished) {
            return;
        }
        let Some(task) = self.init.take() else {
            return;
        };
        match task.join() {
            Ok(()) => {},
            Err(error @ SessionError::TransportSetup(_)) => {
                tracing::warn!(%error, "connect failed");
                self.connect_pending = false;
                self.report(&error);
                self.set_state(ConnectionState::Idle);
            },
            Err(error) => {
                tracing::warn!(%error, "connect incomplete");
                self.connect_pending = false;
                self.report(&error);
            },
        }
    }

    fn dispatch(&mut self, event: QueuedEvent) {
        let abnormal = event.is_abnormal_close();
        match event {
            QueuedEvent::Opened => {
                tracing::debug!("transport open");
                self.transport_live = true;
                self.set_state(ConnectionState::Connected);
                let next = self.settled_state();
                self.set_state(next);
                self.fire_ready_if_due();
            },
            QueuedEvent::Message(text) => match ServerMessage::decode(&text) {
                Ok(message) => self.handle_message(message),
                Err(error) => {
                    tracing::debug!(%error, "undecodable frame");
                    self.report(&SessionError::Protocol(error));
                },
            },
            QueuedEvent::Error { code, message } => {
                self.report(&SessionError::Transport { code, message });
            },
            QueuedEvent::Closed { code, reason } => {
                if abnormal {
                    tracing::warn!(code, %reason, "connection closed abnormally");
                    self.report(&SessionError::TransportClosed { code, reason });
                } else {
                    tracing::info!(%reason, "connection closed");
                }
                self.transport.close();
                self.transport_live = false;
                self.connect_pending = false;
                self.set_state(ConnectionState::Idle);
            },
        }
    }

    /// Events from a connection that a newer `connect` already replaced.
    ///
    /// Lifecycle events must not touch the replacement connection.
    fn dispatch_stale(&mut self, handle: SocketHandle, event: QueuedEvent) {
        let abnormal = event.is_abnormal_close();
        match event {
            QueuedEvent::Opened => {
                tracing::debug!(%handle, "ignoring open of replaced connection");
            },
            QueuedEvent::Closed { code, reason } if abnormal => {
                tracing::warn!(%handle, code, %reason, "replaced connection closed abnormally");
                self.report(&SessionError::TransportClosed { code, reason });
            },
            QueuedEvent::Closed { reason, .. } => {
                tracing::debug!(%handle, %reason, "replaced connection closed");
            },
            other => self.dispatch(other),
        }
    }

    fn handle_message(&mut self, message: ServerMessage) {
        tracing::trace!(kind = message.kind(), "message");
        match message {
            ServerMessage::Hello { protocol_version } => {
                tracing::debug!(protocol_version, "service hello");
            },
            ServerMessage::InteractivityStateChanged { state, short_code } => {
                self.handle_remote_state(state, short_code);
            },
            ServerMessage::GroupsCreated { groups } | ServerMessage::GroupsUpdated { groups } => {
                self.directory.upsert(&groups);
            },
            ServerMessage::GroupList { groups } => {
                self.directory.replace(&groups);
            },
            ServerMessage::ParticipantStateChanged { participant, state } => {
                let event = ParticipantEvent { participant, state };
                if self.provisioned {
                    self.deliver_participant(&event);
                } else {
                    tracing::debug!(
                        participant = %event.participant.participant_id,
                        "provisioning incomplete, deferring participant event"
                    );
                    self.deferred.push_back(event);
                }
            },
            ServerMessage::Button { control_id, participant_id, pressed } => {
                self.controls.record_button(&control_id, pressed);
                self.listeners.button.notify(&ButtonEvent { control_id, participant_id, pressed });
            },
            ServerMessage::Joystick { control_id, participant_id, x, y } => {
                self.controls.record_joystick(&control_id, x, y);
                self.listeners.joystick.notify(&JoystickEvent { control_id, participant_id, x, y });
            },
            ServerMessage::Error { code, message } => {
                self.report(&SessionError::Remote { code, message });
            },
        }
    }

    fn handle_remote_state(&mut self, remote: RemoteState, short_code: Option<String>) {
        let previous = self.state;
        let current = match remote {
            RemoteState::ShortCodeRequired => {
                self.authorized = false;
                self.short_code = short_code;
                ConnectionState::ShortCodeRequired
            },
            RemoteState::Connected | RemoteState::Ready => {
                self.authorized = true;
                self.short_code = None;
                self.settled_state()
            },
        };
        tracing::debug!(?remote, ?previous, ?current, "service state");

        self.state = current;
        self.listeners.state_changed.notify(&StateChange { previous, current });
        self.fire_ready_if_due();
    }

    fn deliver_participant(&mut self, event: &ParticipantEvent) {
        let id = event.participant.participant_id.clone();
        match event.state {
            ParticipantState::Left => {
                self.roster.remove(&id);
            },
            ParticipantState::Joined | ParticipantState::Updated => {
                self.roster.insert(id, event.participant.clone());
            },
        }
        self.listeners.participant.notify(event);
    }

    /// Periodic provisioning check, rate limited by the poll interval.
    fn check_provisioning(&mut self) {
        let Some(started) = self.connect_started else {
            return;
        };
        if self.provisioned || !self.transport_live {
            return;
        }
        let now = self.env.now();
        if self
            .last_provisioning_check
            .is_some_and(|last| now - last < self.config.provisioning_poll_interval)
        {
            return;
        }
        self.last_provisioning_check = Some(now);

        if self.tracker.is_complete(&self.directory) {
            tracing::info!(groups = self.directory.len(), "provisioning complete");
            self.provisioned = true;
            let next = self.settled_state();
            self.set_state(next);
            self.fire_ready_if_due();

            while let Some(event) = self.deferred.pop_front() {
                self.deliver_participant(&event);
            }
            return;
        }

        if let Some(timeout) = self.config.provisioning_timeout
            && !self.timeout_reported
            && now - started >= timeout
        {
            self.timeout_reported = true;
            let outstanding = self.tracker.outstanding();
            tracing::warn!(outstanding, ?timeout, "provisioning timed out");
            self.report(&SessionError::ProvisioningTimeout { outstanding });
        }
    }

    /// State implied by provisioning and authorization once the transport is
    /// up.
    fn settled_state(&self) -> ConnectionState {
        if !self.authorized {
            ConnectionState::ShortCodeRequired
        } else if self.provisioned && self.transport_live {
            ConnectionState::Ready
        } else if self.tracker.has_outstanding() {
            ConnectionState::ProvisioningPending
        } else {
            ConnectionState::Connected
        }
    }

    fn fire_ready_if_due(&mut self) {
        if self.ready_fired || self.state != ConnectionState::Ready {
            return;
        }
        self.ready_fired = true;
        self.connect_pending = false;
        tracing::info!("session ready");
        self.listeners.ready.notify(&());
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state == next {
            return;
        }
        let previous = std::mem::replace(&mut self.state, next);
        tracing::debug!(?previous, current = ?next, "state changed");
        self.listeners.state_changed.notify(&StateChange { previous, current: next });
    }

    fn encode(&mut self, message: &ClientMessage) -> Option<String> {
        match message.encode() {
            Ok(frame) => Some(frame),
            Err(error) => {
                self.report(&SessionError::Protocol(error));
                None
            },
        }
    }

    fn send(&mut self, message: &ClientMessage) -> Result<(), SessionError> {
        let frame = message.encode().map_err(SessionError::Protocol)?;
        self.transport.send(&frame).map_err(SessionError::TransportSend)
    }

    fn report(&mut self, error: &SessionError) {
        self.listeners.error.notify(&ErrorEvent::from(error));
    }
}

impl<E: Environment> Drop for Session<E> {
    fn drop(&mut self) {
        if let Some(task) = self.init.take() {
            task.cancel();
            if let Err(error) = task.join() {
                tracing::debug!(%error, "init task ended with error during drop");
            }
        }
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use castlink_transport::MemoryTransport;

    use super::*;
    use crate::SystemEnv;

    fn memory_session(config: SessionConfig) -> (Session<SystemEnv>, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new());
        let session = Session::with_transport(config, SystemEnv, transport.clone());
        (session, transport)
    }

    /// Tick until the init task has been reaped.
    fn settle(session: &mut Session<SystemEnv>) {
        for _ in 0..200 {
            session.tick();
            if session.init.is_none() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn ready_fires_without_provisioning_once_open() {
        let (mut session, _transport) = memory_session(SessionConfig::default());
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        session.on_ready(move || *counter.lock().unwrap() += 1);

        session.connect(true);
        settle(&mut session);
        session.tick();

        assert_eq!(session.state(), ConnectionState::Ready);
        assert_eq!(*fired.lock().unwrap(), 1);
        assert!(session.is_ready_fired());
    }

    #[test]
    fn connect_sends_provisioning_then_ready() {
        let config = SessionConfig::default().with_binding("vip", "vip-scene").with_default_scene("lobby");
        let (mut session, transport) = memory_session(config);

        session.connect(false);
        settle(&mut session);

        let sent: Vec<ClientMessage> =
            transport.sent().iter().map(|f| ClientMessage::decode(f).unwrap()).collect();
        assert_eq!(sent, vec![
            ClientMessage::CreateGroups { groups: vec![Group::new("vip", "vip-scene")] },
            ClientMessage::UpdateGroups { groups: vec![Group::new("default", "lobby")] },
            ClientMessage::Ready { is_ready: false },
        ]);
        assert_eq!(session.state(), ConnectionState::ProvisioningPending);
        assert_eq!(session.current_scene(), Some("lobby"));
    }

    #[test]
    fn undecodable_frame_is_reported_and_drain_continues() {
        let (mut session, transport) = memory_session(SessionConfig::default());
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        session.on_error(move |e| sink.lock().unwrap().push(e.code));
        let buttons = Arc::new(Mutex::new(0));
        let count = Arc::clone(&buttons);
        session.on_button_event(move |_| *count.lock().unwrap() += 1);

        session.connect(true);
        settle(&mut session);
        transport.inject_message("{not json");
        transport.inject_message(r#"{"type":"button","controlId":"a","participantId":"p","pressed":true}"#);
        session.tick();

        assert_eq!(*errors.lock().unwrap(), vec![crate::ERROR_DECODE]);
        assert_eq!(*buttons.lock().unwrap(), 1);
    }

    #[test]
    fn keep_running_in_background_is_restored() {
        #[derive(Clone, Default)]
        struct SharedHost(Arc<Mutex<bool>>);
        impl Host for SharedHost {
            fn run_in_background(&self) -> bool {
                *self.0.lock().unwrap()
            }
            fn set_run_in_background(&mut self, enabled: bool) {
                *self.0.lock().unwrap() = enabled;
            }
        }

        let host = SharedHost::default();
        let flag = Arc::clone(&host.0);
        let config = SessionConfig::default().with_keep_running_in_background(true);
        let (session, _transport) = memory_session(config);
        let mut session = session.with_host(host);

        session.connect(true);
        assert!(*flag.lock().unwrap());

        session.disconnect();
        assert!(!*flag.lock().unwrap());
    }

    #[test]
    fn disconnect_when_never_connected() {
        let (mut session, transport) = memory_session(SessionConfig::default());
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        session.on_state_changed(move |c| sink.lock().unwrap().push(c.current));

        session.disconnect();
        session.disconnect();

        assert_eq!(*changes.lock().unwrap(), vec![ConnectionState::Stopped]);
        assert_eq!(transport.open_count(), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let (mut session, transport) = memory_session(SessionConfig::default());
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        let id = session.on_button_event(move |_| *counter.lock().unwrap() += 1);

        session.connect(true);
        settle(&mut session);
        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        transport.inject_message(r#"{"type":"button","controlId":"a","participantId":"p","pressed":true}"#);
        session.tick();

        assert_eq!(*count.lock().unwrap(), 0);
        assert!(session.button_state("a").down);
    }
}
