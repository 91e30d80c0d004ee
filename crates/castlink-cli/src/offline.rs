//! Offline mode: a scripted audience instead of the real service.

use castlink_harness::ScriptedRemote;
use castlink_proto::ParticipantState;

const VIEWERS: [&str; 3] = ["ada", "lin", "kay"];

/// Generates a little audience traffic every few ticks.
#[derive(Debug, Default)]
pub struct Audience {
    ticks: u64,
}

impl Audience {
    /// Answer the session and inject this tick's traffic.
    pub fn step(&mut self, remote: &mut ScriptedRemote) {
        remote.pump();
        self.ticks += 1;

        let n = self.ticks;
        if n % 25 == 0 {
            let viewer = VIEWERS[(n / 25) as usize % VIEWERS.len()];
            let id = format!("p-{viewer}");
            let state = if (n / 25) % 6 < 3 { ParticipantState::Joined } else { ParticipantState::Left };
            remote.send_participant(&id, viewer, state);
        }
        if n % 40 == 0 {
            remote.send_button("cheer", "p-ada", true);
        }
        if n % 40 == 5 {
            remote.send_button("cheer", "p-ada", false);
        }
        if n % 15 == 0 {
            let phase = n as f64 / 15.0;
            remote.send_joystick("aim", "p-lin", phase.cos(), phase.sin());
        }
    }
}
