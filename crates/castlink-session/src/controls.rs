//! Per-control input snapshots.
//!
//! Hosts that poll instead of subscribing read these. Button edges (`down`,
//! `up`) and counts cover only the current tick; `pressed` holds until a
//! release arrives.

use std::{collections::HashMap, time::Duration};

/// Button snapshot for one control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// A press arrived this tick.
    pub down: bool,
    /// The button is held.
    pub pressed: bool,
    /// A release arrived this tick.
    pub up: bool,
    /// Presses this tick.
    pub down_count: u32,
    /// Releases this tick.
    pub up_count: u32,
}

/// Joystick snapshot for one control.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoystickState {
    /// Latest horizontal axis.
    pub x: f64,
    /// Latest vertical axis.
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
struct Cooldown<I> {
    started: I,
    duration: Duration,
}

/// Snapshots and cooldown deadlines for every control seen so far.
#[derive(Debug)]
pub(crate) struct Controls<I> {
    buttons: HashMap<String, ButtonState>,
    joysticks: HashMap<String, JoystickState>,
    cooldowns: HashMap<String, Cooldown<I>>,
}

impl<I> Default for Controls<I> {
    fn default() -> Self {
        Self { buttons: HashMap::new(), joysticks: HashMap::new(), cooldowns: HashMap::new() }
    }
}

impl<I> Controls<I>
where
    I: Copy + Ord + std::ops::Sub<Output = Duration>,
{
    /// Clear per-tick edges, keeping levels.
    pub(crate) fn begin_tick(&mut self) {
        for button in self.buttons.values_mut() {
            *button = ButtonState { pressed: button.pressed, ..ButtonState::default() };
        }
    }

    pub(crate) fn record_button(&mut self, control_id: &str, pressed: bool) {
        let button = self.buttons.entry(control_id.to_owned()).or_default();
        button.pressed = pressed;
        if pressed {
            button.down = true;
            button.down_count += 1;
        } else {
            button.up = true;
            button.up_count += 1;
        }
    }

    pub(crate) fn record_joystick(&mut self, control_id: &str, x: f64, y: f64) {
        self.joysticks.insert(control_id.to_owned(), JoystickState { x, y });
    }

    pub(crate) fn button(&self, control_id: &str) -> ButtonState {
        self.buttons.get(control_id).copied().unwrap_or_default()
    }

    pub(crate) fn joystick(&self, control_id: &str) -> JoystickState {
        self.joysticks.get(control_id).copied().unwrap_or_default()
    }

    pub(crate) fn start_cooldown(&mut self, control_id: &str, now: I, duration: Duration) {
        self.cooldowns.insert(control_id.to_owned(), Cooldown { started: now, duration });
    }

    /// Time left on a control's cooldown, zero if none.
    pub(crate) fn cooldown_remaining(&self, control_id: &str, now: I) -> Duration {
        self.cooldowns.get(control_id).map_or(Duration::ZERO, |cooldown| {
            if now < cooldown.started {
                return cooldown.duration;
            }
            cooldown.duration.saturating_sub(now - cooldown.started)
        })
    }

    pub(crate) fn clear(&mut self) {
        self.buttons.clear();
        self.joysticks.clear();
        self.cooldowns.clear();
    }
}
