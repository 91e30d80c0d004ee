//! End-to-end session behavior against a scripted service.
//!
//! Every test drives a real `Session` over a `MemoryTransport` with a manual
//! clock. The only thread besides the test is the session's init task, which
//! `Fixture::connect` waits out.

use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use castlink_harness::{ManualEnv, RemoteConfig, ScriptedRemote};
use castlink_proto::{ClientMessage, Group, ParticipantState, RemoteState};
use castlink_session::{
    ConnectionState, DEFAULT_PROVISIONING_POLL_INTERVAL, ERROR_DECODE, ERROR_PROVISIONING_TIMEOUT,
    ERROR_TRANSPORT_SEND, ERROR_TRANSPORT_SETUP, Session, SessionConfig, SessionError,
};
use castlink_transport::Transport;

#[derive(Debug, Clone, PartialEq)]
enum Observed {
    Ready,
    State(ConnectionState, ConnectionState),
    Participant(String, ParticipantState),
    Button(String, bool),
    Joystick(String, f64, f64),
    Error(i32),
}

struct Fixture {
    session: Session<ManualEnv>,
    remote: ScriptedRemote,
    env: ManualEnv,
    log: Arc<Mutex<Vec<Observed>>>,
}

impl Fixture {
    fn new(config: SessionConfig, remote: RemoteConfig) -> Self {
        let env = ManualEnv::new();
        let remote = ScriptedRemote::with_config(remote);
        let mut session = Session::with_transport(config, env.clone(), remote.transport());
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&log);
        session.on_ready(move || sink.lock().unwrap().push(Observed::Ready));
        let sink = Arc::clone(&log);
        session.on_state_changed(move |c| sink.lock().unwrap().push(Observed::State(c.previous, c.current)));
        let sink = Arc::clone(&log);
        session.on_participant_state_changed(move |e| {
            sink.lock().unwrap().push(Observed::Participant(e.participant.participant_id.clone(), e.state));
        });
        let sink = Arc::clone(&log);
        session.on_button_event(move |e| sink.lock().unwrap().push(Observed::Button(e.control_id.clone(), e.pressed)));
        let sink = Arc::clone(&log);
        session.on_joystick_event(move |e| {
            sink.lock().unwrap().push(Observed::Joystick(e.control_id.clone(), e.x, e.y));
        });
        let sink = Arc::clone(&log);
        session.on_error(move |e| sink.lock().unwrap().push(Observed::Error(e.code)));

        Self { session, remote, env, log }
    }

    fn vip_lobby() -> SessionConfig {
        SessionConfig::default().with_binding("vip", "vip-scene").with_default_scene("lobby")
    }

    /// Connect and wait until the init task has sent `frames` frames, then
    /// tick once so `Opened` is processed.
    fn connect(&mut self, go_interactive: bool, frames: usize) {
        self.session.connect(go_interactive);
        wait_until(|| self.remote.memory().sent().len() >= frames);
        self.session.tick();
    }

    /// Let the remote answer, then run two ticks one poll interval apart.
    fn round(&mut self) {
        self.remote.pump();
        self.session.tick();
        self.advance_and_tick();
    }

    fn advance_and_tick(&mut self) {
        self.env.advance(DEFAULT_PROVISIONING_POLL_INTERVAL);
        self.session.tick();
    }

    fn take(&self) -> Vec<Observed> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }

    fn count(&self, wanted: &Observed) -> usize {
        self.log.lock().unwrap().iter().filter(|o| *o == wanted).count()
    }

    fn errors(&self) -> Vec<i32> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|o| match o {
                Observed::Error(code) => Some(*code),
                _ => None,
            })
            .collect()
    }
}

fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..2000 {
        if condition() {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("condition not reached");
}

#[test]
fn connect_twice_opens_once_and_readies_once() {
    let mut fx = Fixture::new(Fixture::vip_lobby(), RemoteConfig::default());

    fx.session.connect(true);
    fx.session.connect(true);
    wait_until(|| fx.remote.memory().sent().len() >= 3);
    fx.session.tick();
    fx.round();
    fx.round();

    assert_eq!(fx.remote.memory().open_count(), 1);
    assert_eq!(fx.count(&Observed::Ready), 1);
    assert_eq!(fx.session.state(), ConnectionState::Ready);
    assert_eq!(fx.remote.received().len(), 3);
}

#[test]
fn ready_only_after_last_acknowledgement() {
    let remote = RemoteConfig { auto_ack_groups: false, auto_ready: false, short_code: None };
    let mut fx = Fixture::new(Fixture::vip_lobby(), remote);

    fx.connect(true, 3);
    fx.remote.pump();
    fx.remote.send_state(RemoteState::Connected);
    fx.session.tick();
    fx.advance_and_tick();
    assert_eq!(fx.count(&Observed::Ready), 0);
    assert_eq!(fx.session.state(), ConnectionState::ProvisioningPending);

    fx.remote.ack_group("vip", "vip-scene");
    fx.session.tick();
    fx.advance_and_tick();
    assert_eq!(fx.count(&Observed::Ready), 0);
    assert_eq!(fx.session.provisioning().outstanding(), 1);

    fx.remote.ack_scene("default", "lobby");
    fx.session.tick();
    fx.advance_and_tick();
    assert_eq!(fx.count(&Observed::Ready), 1);
    assert_eq!(fx.session.state(), ConnectionState::Ready);
    assert_eq!(fx.session.current_scene(), Some("lobby"));

    for _ in 0..3 {
        fx.advance_and_tick();
    }
    assert_eq!(fx.count(&Observed::Ready), 1);
}

#[test]
fn repeated_ready_reports_fire_once_per_cycle() {
    let mut fx = Fixture::new(Fixture::vip_lobby(), RemoteConfig::default());
    fx.connect(true, 3);
    fx.round();
    assert_eq!(fx.count(&Observed::Ready), 1);
    fx.take();

    for _ in 0..3 {
        fx.remote.send_state(RemoteState::Ready);
    }
    fx.session.tick();
    let observed = fx.take();
    assert_eq!(observed, vec![Observed::State(ConnectionState::Ready, ConnectionState::Ready); 3]);

    fx.session.disconnect();
    assert_eq!(fx.take(), vec![Observed::State(ConnectionState::Ready, ConnectionState::Stopped)]);
    assert!(!fx.session.is_ready_fired());

    fx.connect(true, 3);
    fx.round();
    assert_eq!(fx.count(&Observed::Ready), 1);
    assert_eq!(fx.remote.memory().open_count(), 2);
}

#[test]
fn participants_wait_for_provisioning_then_arrive_once_in_order() {
    let remote = RemoteConfig { auto_ack_groups: false, ..RemoteConfig::default() };
    let mut fx = Fixture::new(Fixture::vip_lobby(), remote);
    fx.connect(true, 3);
    fx.remote.pump();

    fx.remote.send_participant("p1", "ada", ParticipantState::Joined);
    fx.remote.send_participant("p2", "lin", ParticipantState::Joined);
    fx.remote.send_participant("p1", "ada", ParticipantState::Left);
    fx.session.tick();
    fx.advance_and_tick();
    assert_eq!(fx.count(&Observed::Participant("p1".into(), ParticipantState::Joined)), 0);
    assert_eq!(fx.session.participants().count(), 0);

    fx.remote.ack_group("vip", "vip-scene");
    fx.remote.ack_scene("default", "lobby");
    fx.session.tick();
    fx.take();
    fx.advance_and_tick();

    let observed = fx.take();
    assert_eq!(observed, vec![
        Observed::State(ConnectionState::ProvisioningPending, ConnectionState::Ready),
        Observed::Ready,
        Observed::Participant("p1".into(), ParticipantState::Joined),
        Observed::Participant("p2".into(), ParticipantState::Joined),
        Observed::Participant("p1".into(), ParticipantState::Left),
    ]);
    let roster: Vec<_> = fx.session.participants().map(|p| p.participant_id.clone()).collect();
    assert_eq!(roster, vec!["p2".to_string()]);

    fx.advance_and_tick();
    fx.remote.send_participant("p3", "kay", ParticipantState::Joined);
    fx.session.tick();
    assert_eq!(fx.take(), vec![Observed::Participant("p3".into(), ParticipantState::Joined)]);
}

#[test]
fn inputs_are_delivered_in_queue_order() {
    let mut fx = Fixture::new(SessionConfig::default(), RemoteConfig::default());
    fx.connect(true, 1);
    fx.round();
    fx.take();

    fx.remote.send_button("jump", "p1", true);
    fx.remote.send_joystick("move", "p2", 0.5, -1.0);
    fx.remote.memory().inject_message("garbage");
    fx.remote.send_button("jump", "p1", false);
    fx.remote.send_error(4010, "throttled");
    fx.session.tick();

    assert_eq!(fx.take(), vec![
        Observed::Button("jump".into(), true),
        Observed::Joystick("move".into(), 0.5, -1.0),
        Observed::Error(ERROR_DECODE),
        Observed::Button("jump".into(), false),
        Observed::Error(4010),
    ]);
    let jump = fx.session.button_state("jump");
    assert!(jump.down && jump.up && !jump.pressed);
    assert_eq!(fx.session.joystick_state("move").x, 0.5);

    fx.session.tick();
    assert!(!fx.session.button_state("jump").down);
}

#[test]
fn cooldown_does_not_drop_queued_button() {
    let mut fx = Fixture::new(SessionConfig::default(), RemoteConfig::default());
    fx.connect(true, 1);
    fx.round();
    fx.take();

    fx.session.trigger_cooldown("giveHealth", Duration::from_millis(7000)).unwrap();
    fx.remote.send_button("giveHealth", "p1", true);
    fx.session.tick();

    assert_eq!(fx.take(), vec![Observed::Button("giveHealth".into(), true)]);
    assert!(fx.session.button_state("giveHealth").pressed);
    assert_eq!(fx.session.cooldown_remaining("giveHealth"), Duration::from_secs(7));

    fx.remote.pump();
    assert_eq!(fx.remote.cooldown("giveHealth"), Some(7000));

    fx.env.advance(Duration::from_secs(3));
    assert_eq!(fx.session.cooldown_remaining("giveHealth"), Duration::from_secs(4));
}

#[test]
fn short_code_blocks_ready_until_authorized() {
    let remote = RemoteConfig { short_code: Some("AB12".into()), ..RemoteConfig::default() };
    let mut fx = Fixture::new(Fixture::vip_lobby(), remote);
    fx.connect(true, 3);
    fx.round();

    assert_eq!(fx.session.state(), ConnectionState::ShortCodeRequired);
    assert_eq!(fx.session.short_code(), Some("AB12"));
    assert!(fx.session.is_provisioned());
    assert_eq!(fx.count(&Observed::Ready), 0);

    fx.remote.send_state(RemoteState::Ready);
    fx.session.tick();

    assert_eq!(fx.session.state(), ConnectionState::Ready);
    assert_eq!(fx.session.short_code(), None);
    assert_eq!(fx.count(&Observed::Ready), 1);
}

#[test]
fn setup_failure_reports_error_and_allows_retry() {
    let mut fx = Fixture::new(SessionConfig::default(), RemoteConfig::default());
    fx.remote.memory().fail_next_open("refused");

    fx.session.connect(true);
    wait_until(|| {
        fx.session.tick();
        fx.log.lock().unwrap().iter().any(|o| matches!(o, Observed::Error(_)))
    });
    assert_eq!(fx.errors(), vec![ERROR_TRANSPORT_SETUP]);
    assert_eq!(fx.session.state(), ConnectionState::Idle);

    fx.connect(true, 1);
    fx.round();
    assert_eq!(fx.remote.memory().open_count(), 1);
    assert_eq!(fx.count(&Observed::Ready), 1);
}

#[test]
fn abnormal_close_reports_and_returns_to_idle() {
    let mut fx = Fixture::new(SessionConfig::default(), RemoteConfig::default());
    fx.connect(true, 1);
    fx.round();
    fx.take();

    fx.remote.close(1006, "gone");
    fx.session.tick();

    assert_eq!(fx.take(), vec![
        Observed::Error(1006),
        Observed::State(ConnectionState::Ready, ConnectionState::Idle),
    ]);
    assert_eq!(
        fx.session.set_current_scene("lobby"),
        Err(SessionError::TransportSend(castlink_transport::TransportError::Closed))
    );

    fx.connect(true, 1);
    fx.round();
    assert_eq!(fx.count(&Observed::Ready), 1);
}

#[test]
fn reconnect_before_tick_survives_close_of_previous_connection() {
    let mut fx = Fixture::new(Fixture::vip_lobby(), RemoteConfig::default());
    fx.connect(true, 3);
    fx.round();
    assert_eq!(fx.session.state(), ConnectionState::Ready);
    fx.take();

    fx.remote.close(1006, "gone");
    fx.connect(true, 3);
    fx.round();
    fx.round();

    let observed = fx.take();
    assert!(fx.remote.memory().is_open());
    assert_eq!(fx.remote.memory().open_count(), 2);
    assert_eq!(fx.session.state(), ConnectionState::Ready);
    assert_eq!(observed.iter().filter(|o| **o == Observed::Ready).count(), 1);
    assert_eq!(
        observed.iter().filter(|o| matches!(o, Observed::Error(_))).collect::<Vec<_>>(),
        vec![&Observed::Error(1006)]
    );
    assert!(!observed.iter().any(|o| matches!(o, Observed::State(_, ConnectionState::Idle))));
}

#[test]
fn clean_close_is_not_an_error() {
    let mut fx = Fixture::new(SessionConfig::default(), RemoteConfig::default());
    fx.connect(true, 1);
    fx.round();

    fx.remote.close(1000, "bye");
    fx.session.tick();

    assert!(fx.errors().is_empty());
    assert_eq!(fx.session.state(), ConnectionState::Idle);
}

#[test]
fn provisioning_timeout_reported_once_and_ready_still_possible() {
    let config = Fixture::vip_lobby().with_provisioning_timeout(Duration::from_secs(5));
    let remote = RemoteConfig { auto_ack_groups: false, ..RemoteConfig::default() };
    let mut fx = Fixture::new(config, remote);
    fx.connect(true, 3);
    fx.remote.pump();

    for _ in 0..8 {
        fx.advance_and_tick();
    }
    assert_eq!(fx.errors(), vec![ERROR_PROVISIONING_TIMEOUT]);

    fx.remote.ack_group("vip", "vip-scene");
    fx.remote.ack_scene("default", "lobby");
    fx.session.tick();
    fx.advance_and_tick();
    assert_eq!(fx.count(&Observed::Ready), 1);
}

#[test]
fn group_list_replaces_directory() {
    let mut fx = Fixture::new(Fixture::vip_lobby(), RemoteConfig::default());
    fx.connect(true, 3);
    fx.round();
    assert_eq!(fx.session.groups().len(), 2);

    fx.session.refresh_groups().unwrap();
    fx.remote.pump();
    fx.session.tick();

    let groups: Vec<_> = fx.session.groups().iter().map(|(g, s)| Group::new(g, s)).collect();
    assert_eq!(groups, fx.remote.groups());
}

#[test]
fn set_current_scene_updates_default_group() {
    let mut fx = Fixture::new(Fixture::vip_lobby(), RemoteConfig::default());
    fx.connect(true, 3);
    fx.round();

    fx.session.set_current_scene("arena").unwrap();
    assert_eq!(fx.session.current_scene(), Some("lobby"));
    fx.remote.pump();
    fx.session.tick();

    assert_eq!(fx.session.current_scene(), Some("arena"));
    assert_eq!(
        fx.remote.received().last(),
        Some(&ClientMessage::UpdateGroups { groups: vec![Group::new("default", "arena")] })
    );
}

#[test]
fn disconnect_clears_session_but_keeps_subscriptions() {
    let mut fx = Fixture::new(Fixture::vip_lobby(), RemoteConfig::default());
    fx.connect(true, 3);
    fx.round();
    fx.remote.send_participant("p1", "ada", ParticipantState::Joined);
    fx.remote.send_button("jump", "p1", true);
    fx.session.tick();
    assert_eq!(fx.session.participants().count(), 1);

    fx.session.disconnect();
    fx.session.disconnect();
    fx.session.tick();

    assert_eq!(fx.session.state(), ConnectionState::Stopped);
    assert_eq!(fx.session.participants().count(), 0);
    assert!(fx.session.groups().is_empty());
    assert!(!fx.session.button_state("jump").pressed);
    assert!(!fx.session.is_provisioned());
    assert_eq!(
        fx.session.trigger_cooldown("jump", Duration::from_secs(1)).map_err(|e| e.code()),
        Err(ERROR_TRANSPORT_SEND)
    );
    assert_eq!(fx.count(&Observed::State(ConnectionState::Ready, ConnectionState::Stopped)), 1);
}
