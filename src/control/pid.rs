use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::control::cascade::{attitude_pd, thrust_vector};
use crate::control::ControlInput;
use crate::error::ConfigError;
use crate::plant::params::Params;
use crate::plant::state::State;
use crate::reference::Setpoint;

// ---------------------------------------------------------------------------
// Cascaded PID
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PidGains {
    pub kp_xy: f64,
    pub ki_xy: f64,
    pub kd_xy: f64,
    pub kp_z: f64,
    pub ki_z: f64,
    pub kd_z: f64,
    pub kp_att: f64,
    pub kd_att: f64,
    pub kp_yaw: f64,
    pub kd_yaw: f64,
    pub i_max: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp_xy: 4.0,
            ki_xy: 0.5,
            kd_xy: 4.0,
            kp_z: 6.25,
            ki_z: 0.2,
            kd_z: 5.0,
            kp_att: 0.8,
            kd_att: 0.12,
            kp_yaw: 0.5,
            kd_yaw: 0.1,
            i_max: 0.5,
        }
    }
}

impl PidGains {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named: [(&'static str, f64); 11] = [
            ("Kp_xy", self.kp_xy),
            ("Ki_xy", self.ki_xy),
            ("Kd_xy", self.kd_xy),
            ("Kp_z", self.kp_z),
            ("Ki_z", self.ki_z),
            ("Kd_z", self.kd_z),
            ("Kp_att", self.kp_att),
            ("Kd_att", self.kd_att),
            ("Kp_yaw", self.kp_yaw),
            ("Kd_yaw", self.kd_yaw),
            ("iMax", self.i_max),
        ];
        for (name, v) in named {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidGain(name));
            }
        }
        if self.i_max == 0.0 {
            return Err(ConfigError::InvalidGain("iMax"));
        }
        Ok(())
    }
}

/// Cascaded PID: per-axis position PID producing a desired acceleration,
/// thrust-vector inversion, PD attitude inner loop.
///
/// The horizontal axes use the `_xy` gain family and altitude the `_z`
/// family. (The original controller cross-wired the two families; this
/// implementation routes them as named.)
#[derive(Debug, Clone)]
pub struct PidController {
    pub gains: PidGains,
    integral: Vector3<f64>,
}

impl PidController {
    pub fn new(gains: PidGains) -> PidController {
        PidController { gains, integral: Vector3::zeros() }
    }

    pub fn reset(&mut self) {
        self.integral = Vector3::zeros();
    }

    /// Position-error integrators, clamped to ±iMax.
    pub fn integral(&self) -> Vector3<f64> {
        self.integral
    }

    pub fn control(&mut self, state: &State, sp: &Setpoint, params: &Params, dt: f64) -> ControlInput {
        let g = &self.gains;
        let err = sp.pos - state.pos;
        let verr = sp.vel - state.vel;

        // Anti-windup: clamp each accumulator to the same ±iMax bound
        self.integral.x = (self.integral.x + err.x * dt).clamp(-g.i_max, g.i_max);
        self.integral.y = (self.integral.y + err.y * dt).clamp(-g.i_max, g.i_max);
        self.integral.z = (self.integral.z + err.z * dt).clamp(-g.i_max, g.i_max);

        let accel_des = Vector3::new(
            g.kp_xy * err.x + g.ki_xy * self.integral.x + g.kd_xy * verr.x,
            g.kp_z * err.y + g.ki_z * self.integral.y + g.kd_z * verr.y,
            g.kp_xy * err.z + g.ki_xy * self.integral.z + g.kd_xy * verr.z,
        );

        let target = thrust_vector(&accel_des, state, params, sp.yaw);
        let torque = attitude_pd(&target, state, g.kp_att, g.kd_att, g.kp_yaw, g.kd_yaw);

        ControlInput { thrust: target.thrust, torque }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
