use std::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reference::Setpoint;

// ---------------------------------------------------------------------------
// Trajectory catalogue
// ---------------------------------------------------------------------------

// Shared analytic-pattern constants.
pub const CIRCLE_RADIUS: f64 = 4.0;
pub const CRUISE_ALT: f64 = 3.0;
pub const ANGULAR_RATE: f64 = 0.5;
pub const HELIX_BASE_ALT: f64 = 1.0;
pub const HELIX_CLIMB_RATE: f64 = 0.3;
pub const FIG8_SPAN: f64 = 4.0;
pub const SQUARE_HALF_SIDE: f64 = 3.0;
pub const SQUARE_DWELL: f64 = 1.5;
pub const SQUARE_TRANSIT: f64 = 2.5;

/// Reference pattern id, with parameters where the pattern has them.
///
/// The analytic patterns are pure functions of time; `Custom` and
/// `Keyboard` are stateful channels owned by the reference generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Hover,
    Circle,
    Helix,
    Figure8,
    Square,
    Step { y0: f64, y1: f64, t_switch: f64 },
    Custom,
    Keyboard,
}

impl Pattern {
    /// Default step pattern: 1 m to 4 m at t = 3 s.
    pub fn step() -> Pattern {
        Pattern::Step { y0: 1.0, y1: 4.0, t_switch: 3.0 }
    }

    /// True for patterns that are pure functions of time.
    pub fn is_analytic(&self) -> bool {
        !matches!(self, Pattern::Custom | Pattern::Keyboard)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Hover => "hover",
            Pattern::Circle => "circle",
            Pattern::Helix => "helix",
            Pattern::Figure8 => "figure8",
            Pattern::Square => "square",
            Pattern::Step { .. } => "step",
            Pattern::Custom => "custom",
            Pattern::Keyboard => "keyboard",
        }
    }
}

impl FromStr for Pattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hover" => Ok(Pattern::Hover),
            "circle" => Ok(Pattern::Circle),
            "helix" => Ok(Pattern::Helix),
            "figure8" => Ok(Pattern::Figure8),
            "square" => Ok(Pattern::Square),
            "step" => Ok(Pattern::step()),
            "custom" => Ok(Pattern::Custom),
            "keyboard" => Ok(Pattern::Keyboard),
            other => Err(ConfigError::UnknownPattern(other.to_string())),
        }
    }
}

/// Cubic smoothstep 3s² − 2s³ on [0, 1].
pub fn smoothstep(s: f64) -> f64 {
    let s = s.clamp(0.0, 1.0);
    s * s * (3.0 - 2.0 * s)
}

/// Evaluate an analytic pattern at time `t`.
///
/// Returns `None` for the stateful channels (`Custom`, `Keyboard`), which
/// can only be queried through the reference generator.
pub fn evaluate(pattern: &Pattern, t: f64) -> Option<Setpoint> {
    let w = ANGULAR_RATE;
    match *pattern {
        Pattern::Hover => Some(Setpoint {
            pos: Vector3::new(0.0, CRUISE_ALT, 0.0),
            vel: Vector3::zeros(),
            yaw: 0.0,
        }),
        Pattern::Circle => {
            let r = CIRCLE_RADIUS;
            Some(Setpoint {
                pos: Vector3::new(r * (w * t).cos(), CRUISE_ALT, r * (w * t).sin()),
                vel: Vector3::new(-r * w * (w * t).sin(), 0.0, r * w * (w * t).cos()),
                yaw: 0.0,
            })
        }
        Pattern::Helix => {
            let r = CIRCLE_RADIUS;
            Some(Setpoint {
                pos: Vector3::new(
                    r * (w * t).cos(),
                    HELIX_BASE_ALT + HELIX_CLIMB_RATE * t,
                    r * (w * t).sin(),
                ),
                vel: Vector3::new(
                    -r * w * (w * t).sin(),
                    HELIX_CLIMB_RATE,
                    r * w * (w * t).cos(),
                ),
                yaw: 0.0,
            })
        }
        Pattern::Figure8 => {
            // Lemniscate of Gerono, lifted with a slow altitude wave.
            let s = FIG8_SPAN;
            Some(Setpoint {
                pos: Vector3::new(
                    s * (w * t).cos(),
                    CRUISE_ALT + 0.5 * (0.5 * w * t).sin(),
                    s * (2.0 * w * t).sin() / 2.0,
                ),
                vel: Vector3::new(
                    -s * w * (w * t).sin(),
                    0.25 * w * (0.5 * w * t).cos(),
                    s * w * (2.0 * w * t).cos(),
                ),
                yaw: 0.0,
            })
        }
        Pattern::Square => Some(square(t)),
        Pattern::Step { y0, y1, t_switch } => {
            let y = if t < t_switch { y0 } else { y1 };
            Some(Setpoint {
                pos: Vector3::new(0.0, y, 0.0),
                vel: Vector3::zeros(),
                yaw: 0.0,
            })
        }
        Pattern::Custom | Pattern::Keyboard => None,
    }
}

/// Square circuit: dwell at each corner, smoothstep transit between
/// adjacent corners, cyclic. Acceleration is discontinuous at joins.
fn square(t: f64) -> Setpoint {
    let l = SQUARE_HALF_SIDE;
    let corners = [
        Vector3::new(l, CRUISE_ALT, -l),
        Vector3::new(l, CRUISE_ALT, l),
        Vector3::new(-l, CRUISE_ALT, l),
        Vector3::new(-l, CRUISE_ALT, -l),
    ];

    let leg = SQUARE_DWELL + SQUARE_TRANSIT;
    let cycle = t.rem_euclid(4.0 * leg);
    let idx = (cycle / leg) as usize % 4;
    let local = cycle - idx as f64 * leg;

    let pos = if local < SQUARE_DWELL {
        corners[idx]
    } else {
        let s = (local - SQUARE_DWELL) / SQUARE_TRANSIT;
        let from = corners[idx];
        let to = corners[(idx + 1) % 4];
        from + (to - from) * smoothstep(s)
    };

    Setpoint { pos, vel: Vector3::zeros(), yaw: 0.0 }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for id in ["hover", "circle", "helix", "figure8", "square", "step", "custom", "keyboard"] {
            let p: Pattern = id.parse().unwrap();
            assert_eq!(p.as_str(), id);
        }
        assert!(matches!(
            "spiral".parse::<Pattern>(),
            Err(ConfigError::UnknownPattern(_))
        ));
    }

    #[test]
    fn circle_velocity_is_the_position_derivative() {
        let h = 1e-6;
        for i in 0..20 {
            let t = i as f64 * 0.7;
            let a = evaluate(&Pattern::Circle, t - h).unwrap();
            let b = evaluate(&Pattern::Circle, t + h).unwrap();
            let v = evaluate(&Pattern::Circle, t).unwrap().vel;
            let fd = (b.pos - a.pos) / (2.0 * h);
            assert!((fd - v).norm() < 1e-6, "t = {t}");
        }
    }

    #[test]
    fn helix_climbs_at_constant_rate() {
        let a = evaluate(&Pattern::Helix, 0.0).unwrap();
        let b = evaluate(&Pattern::Helix, 10.0).unwrap();
        assert!((b.pos.y - a.pos.y - 3.0).abs() < 1e-12);
        assert!((a.vel.y - HELIX_CLIMB_RATE).abs() < 1e-12);
    }

    #[test]
    fn figure8_crosses_the_centreline_twice_per_cycle() {
        // z = S sin(2wt)/2 has twice the x frequency
        let period = 2.0 * std::f64::consts::PI / ANGULAR_RATE;
        let quarter = evaluate(&Pattern::Figure8, period / 4.0).unwrap();
        assert!(quarter.pos.x.abs() < 1e-9);
        assert!(quarter.pos.z.abs() < 1e-9);
    }

    #[test]
    fn square_dwells_at_corners() {
        let start = evaluate(&Pattern::Square, 0.0).unwrap();
        let still = evaluate(&Pattern::Square, SQUARE_DWELL * 0.9).unwrap();
        assert!((start.pos - still.pos).norm() < 1e-12);
        // Midway through the first transit the setpoint is between corners
        let mid = evaluate(&Pattern::Square, SQUARE_DWELL + SQUARE_TRANSIT / 2.0).unwrap();
        assert!((mid.pos.x - SQUARE_HALF_SIDE).abs() < 1e-9);
        assert!(mid.pos.z.abs() < 1e-9);
    }

    #[test]
    fn square_is_cyclic() {
        let cycle = 4.0 * (SQUARE_DWELL + SQUARE_TRANSIT);
        let a = evaluate(&Pattern::Square, 1.2).unwrap();
        let b = evaluate(&Pattern::Square, 1.2 + cycle).unwrap();
        assert!((a.pos - b.pos).norm() < 1e-9);
    }

    #[test]
    fn step_switches_once() {
        let p = Pattern::step();
        assert!((evaluate(&p, 2.9).unwrap().pos.y - 1.0).abs() < 1e-12);
        assert!((evaluate(&p, 3.0).unwrap().pos.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn stateful_channels_are_not_analytic() {
        assert!(evaluate(&Pattern::Custom, 0.0).is_none());
        assert!(evaluate(&Pattern::Keyboard, 0.0).is_none());
        assert!(!Pattern::Custom.is_analytic());
        assert!(Pattern::Hover.is_analytic());
    }
}
