//! Fuzz target for the session event pipeline
//!
//! # Strategy
//!
//! - Raw frames: arbitrary strings straight into the mailbox
//! - Typed traffic: acknowledgements, state reports, participants, input
//! - Transport faults: errors and closes with arbitrary codes
//! - Host calls: ticks, clock movement, reconnects, cooldowns
//!
//! # Invariants
//!
//! - Nothing panics
//! - `on_ready` fires at most once per connect cycle
//! - No participant event is delivered before provisioning completes

#![no_main]

use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use arbitrary::Arbitrary;
use castlink_harness::{ManualEnv, RemoteConfig, ScriptedRemote};
use castlink_proto::{ParticipantState, RemoteState};
use castlink_session::{Session, SessionConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Frame(String),
    AckGroup(bool),
    AckDefault,
    State(u8),
    Participant(u8, bool),
    Button(String, bool),
    Joystick(f64, f64),
    TransportError(i32, String),
    Close(u16),
    Advance(u16),
    Tick,
    Cooldown(String, u16),
    Reconnect,
}

fn connect(session: &mut Session<ManualEnv>, remote: &ScriptedRemote, cycle_ready: &Arc<Mutex<usize>>) {
    *cycle_ready.lock().unwrap() = 0;
    session.connect(true);
    for _ in 0..500 {
        if !remote.memory().sent().is_empty() {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    session.tick();
}

fuzz_target!(|ops: Vec<Op>| {
    let env = ManualEnv::new();
    let remote_config = RemoteConfig { auto_ack_groups: false, auto_ready: false, short_code: None };
    let mut remote = ScriptedRemote::with_config(remote_config);
    let config = SessionConfig::default().with_binding("vip", "vip-scene").with_default_scene("lobby");
    let mut session = Session::with_transport(config, env.clone(), remote.transport());

    let ready = Arc::new(Mutex::new(0usize));
    let early = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&ready);
    session.on_ready(move || *sink.lock().unwrap() += 1);
    let sink = Arc::clone(&early);
    session.on_participant_state_changed(move |_| *sink.lock().unwrap() += 1);

    connect(&mut session, &remote, &ready);

    for op in ops {
        match op {
            Op::Frame(text) => {
                remote.memory().inject_message(&text);
            },
            Op::AckGroup(real) => {
                remote.ack_group(if real { "vip" } else { "other" }, "vip-scene");
            },
            Op::AckDefault => {
                remote.ack_scene("default", "lobby");
            },
            Op::State(n) => {
                let state = match n % 3 {
                    0 => RemoteState::Ready,
                    1 => RemoteState::Connected,
                    _ => RemoteState::ShortCodeRequired,
                };
                remote.send_state(state);
            },
            Op::Participant(n, joined) => {
                let state = if joined { ParticipantState::Joined } else { ParticipantState::Left };
                remote.send_participant(&format!("p{n}"), "viewer", state);
            },
            Op::Button(control, pressed) => {
                remote.send_button(&control, "p", pressed);
            },
            Op::Joystick(x, y) => {
                remote.send_joystick("stick", "p", x, y);
            },
            Op::TransportError(code, message) => {
                remote.memory().inject_error(code, &message);
            },
            Op::Close(code) => {
                remote.close(code, "fuzz");
            },
            Op::Advance(ms) => env.advance(Duration::from_millis(u64::from(ms))),
            Op::Tick => {
                let before = *early.lock().unwrap();
                session.tick();
                let after = *early.lock().unwrap();
                assert!(after == before || session.is_provisioned(), "participant delivered early");
            },
            Op::Cooldown(control, ms) => {
                let _ = session.trigger_cooldown(&control, Duration::from_millis(u64::from(ms)));
            },
            Op::Reconnect => {
                session.disconnect();
                remote.pump();
                connect(&mut session, &remote, &ready);
            },
        }
        remote.pump();
        assert!(*ready.lock().unwrap() <= 1, "on_ready fired twice in one cycle");
    }

    session.disconnect();
});
