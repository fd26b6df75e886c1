use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::reference::patterns::CRUISE_ALT;
use crate::reference::Setpoint;

// ---------------------------------------------------------------------------
// Keyboard setpoint channel
// ---------------------------------------------------------------------------

/// Commanded lateral and vertical speed, m/s.
const LINEAR_SPEED: f64 = 3.0;

/// Commanded yaw rate, rad/s.
const YAW_RATE: f64 = 1.5;

/// Normalized axis commands from the host's key states.
///
/// Each axis is clamped to [-1, 1]; held keys map to ±1 on the collaborator
/// side, but analogue sources are accepted too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisCommand {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

impl AxisCommand {
    fn clamped(&self) -> AxisCommand {
        AxisCommand {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
            z: self.z.clamp(-1.0, 1.0),
            yaw: self.yaw.clamp(-1.0, 1.0),
        }
    }
}

/// Integrated setpoint driven by axis commands.
///
/// The target starts at the hover point so that switching to keyboard
/// control holds altitude until a key is pressed.
#[derive(Debug, Clone)]
pub struct KeyboardChannel {
    target: Vector3<f64>,
    target_yaw: f64,
    axes: AxisCommand,
}

impl KeyboardChannel {
    pub fn new() -> KeyboardChannel {
        KeyboardChannel {
            target: Vector3::new(0.0, CRUISE_ALT, 0.0),
            target_yaw: 0.0,
            axes: AxisCommand::default(),
        }
    }

    pub fn reset(&mut self) {
        *self = KeyboardChannel::new();
    }

    pub fn set_axes(&mut self, axes: AxisCommand) {
        self.axes = axes.clamped();
    }

    /// Integrate the commanded velocity by `dt` and emit the new target.
    /// The commanded velocity is returned as feed-forward.
    pub fn tick(&mut self, dt: f64) -> Setpoint {
        let vel = Vector3::new(
            LINEAR_SPEED * self.axes.x,
            LINEAR_SPEED * self.axes.y,
            LINEAR_SPEED * self.axes.z,
        );
        self.target += vel * dt;
        self.target.y = self.target.y.max(0.0);
        self.target_yaw += YAW_RATE * self.axes.yaw * dt;

        Setpoint { pos: self.target, vel, yaw: self.target_yaw }
    }

    /// Current target without integrating.
    pub fn current(&self) -> Setpoint {
        Setpoint { pos: self.target, vel: Vector3::zeros(), yaw: self.target_yaw }
    }
}

impl Default for KeyboardChannel {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_axes_hold_the_target() {
        let mut kb = KeyboardChannel::new();
        let before = kb.current().pos;
        for _ in 0..120 {
            kb.tick(1.0 / 120.0);
        }
        assert!((kb.current().pos - before).norm() < 1e-12);
    }

    #[test]
    fn held_axis_integrates_at_command_speed() {
        let mut kb = KeyboardChannel::new();
        kb.set_axes(AxisCommand { x: 1.0, ..Default::default() });
        for _ in 0..120 {
            kb.tick(1.0 / 120.0);
        }
        // 3 m/s for 1 s
        assert!((kb.current().pos.x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn feed_forward_velocity_matches_command() {
        let mut kb = KeyboardChannel::new();
        kb.set_axes(AxisCommand { z: -1.0, ..Default::default() });
        let sp = kb.tick(1.0 / 120.0);
        assert!((sp.vel.z + LINEAR_SPEED).abs() < 1e-12);
    }

    #[test]
    fn altitude_target_never_goes_underground() {
        let mut kb = KeyboardChannel::new();
        kb.set_axes(AxisCommand { y: -1.0, ..Default::default() });
        for _ in 0..1200 {
            kb.tick(1.0 / 120.0);
        }
        assert_eq!(kb.current().pos.y, 0.0);
    }

    #[test]
    fn yaw_integrates_at_yaw_rate() {
        let mut kb = KeyboardChannel::new();
        kb.set_axes(AxisCommand { yaw: 1.0, ..Default::default() });
        for _ in 0..120 {
            kb.tick(1.0 / 120.0);
        }
        assert!((kb.current().yaw - YAW_RATE).abs() < 1e-9);
    }

    #[test]
    fn commands_are_clamped_to_unit_range() {
        let mut kb = KeyboardChannel::new();
        kb.set_axes(AxisCommand { x: 5.0, ..Default::default() });
        let sp = kb.tick(1.0);
        assert!((sp.vel.x - LINEAR_SPEED).abs() < 1e-12);
    }
}
