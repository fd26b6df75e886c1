pub mod custom;
pub mod keyboard;
pub mod patterns;

pub use custom::CustomWalker;
pub use keyboard::{AxisCommand, KeyboardChannel};
pub use patterns::{evaluate, Pattern};

use nalgebra::Vector3;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Setpoint record
// ---------------------------------------------------------------------------

/// Desired position, feed-forward velocity and yaw at a point in time.
#[derive(Debug, Clone, Copy)]
pub struct Setpoint {
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    pub yaw: f64,
}

impl Default for Setpoint {
    fn default() -> Self {
        Setpoint { pos: Vector3::zeros(), vel: Vector3::zeros(), yaw: 0.0 }
    }
}

// ---------------------------------------------------------------------------
// Reference generator
// ---------------------------------------------------------------------------

/// Produces the setpoint stream for the active pattern and owns the two
/// stateful channels (custom waypoint walker, keyboard target).
#[derive(Debug, Clone)]
pub struct Reference {
    pattern: Pattern,
    walker: CustomWalker,
    keyboard: KeyboardChannel,
}

impl Reference {
    pub fn new() -> Reference {
        Reference {
            pattern: Pattern::Hover,
            walker: CustomWalker::new(),
            keyboard: KeyboardChannel::new(),
        }
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Select the active pattern. Selecting `Custom` without a waypoint
    /// path is rejected and the previous pattern persists.
    pub fn set_pattern(&mut self, pattern: Pattern) -> Result<(), ConfigError> {
        if matches!(pattern, Pattern::Custom) {
            if !self.walker.has_path() {
                return Err(ConfigError::TooFewWaypoints);
            }
            self.walker.reset();
        }
        self.pattern = pattern;
        Ok(())
    }

    pub fn set_waypoints(&mut self, waypoints: Vec<Vector3<f64>>) -> Result<(), ConfigError> {
        self.walker.set_path(waypoints)
    }

    pub fn set_axes(&mut self, axes: AxisCommand) {
        self.keyboard.set_axes(axes);
    }

    /// Restart the stateful channels (episode reset).
    pub fn reset(&mut self) {
        self.walker.reset();
        self.keyboard.reset();
    }

    /// Per-tick setpoint query at simulation time `t`. Advances the
    /// stateful channels; analytic patterns are pure in `t`.
    pub fn tick(&mut self, t: f64, dt: f64) -> Setpoint {
        match self.pattern {
            Pattern::Custom => self.walker.tick(),
            Pattern::Keyboard => self.keyboard.tick(dt),
            ref p => patterns::evaluate(p, t).unwrap_or_default(),
        }
    }

    /// Side-effect-free sampling at an arbitrary time, used by the
    /// predictive controller for horizon lookahead. The stateful channels
    /// hold their current target.
    pub fn lookahead(&self, t: f64) -> Setpoint {
        match self.pattern {
            Pattern::Custom => self.walker.current(),
            Pattern::Keyboard => self.keyboard.current(),
            ref p => patterns::evaluate(p, t).unwrap_or_default(),
        }
    }

    /// Uniform sampling of a pattern over a horizon window, for drawing
    /// the desired path. `n` positions at t = k·horizon/n, k = 0..n.
    pub fn preview(&self, pattern: &Pattern, n: usize, horizon_s: f64) -> Vec<Vector3<f64>> {
        if n == 0 {
            return Vec::new();
        }
        (0..n)
            .map(|k| {
                let t = horizon_s * k as f64 / n as f64;
                match pattern {
                    Pattern::Custom => self.walker.sample(t),
                    Pattern::Keyboard => self.keyboard.current().pos,
                    p => patterns::evaluate(p, t).map(|sp| sp.pos).unwrap_or_default(),
                }
            })
            .collect()
    }
}

impl Default for Reference {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
