use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::control::cascade::{sat, thrust_vector};
use crate::control::ControlInput;
use crate::error::ConfigError;
use crate::plant::params::Params;
use crate::plant::state::State;
use crate::reference::Setpoint;

// ---------------------------------------------------------------------------
// First-order sliding mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmcGains {
    pub lambda_xy: f64,
    pub lambda_z: f64,
    pub eta_xy: f64,
    pub eta_z: f64,
    pub phi_xy: f64,
    pub phi_z: f64,
    pub lambda_att: f64,
    pub eta_att: f64,
    pub phi_att: f64,
}

impl Default for SmcGains {
    fn default() -> Self {
        Self {
            lambda_xy: 2.0,
            lambda_z: 3.0,
            eta_xy: 8.0,
            eta_z: 8.0,
            phi_xy: 0.12,
            phi_z: 0.12,
            lambda_att: 15.0,
            eta_att: 60.0,
            phi_att: 0.3,
        }
    }
}

impl SmcGains {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named: [(&'static str, f64); 9] = [
            ("lambda_xy", self.lambda_xy),
            ("lambda_z", self.lambda_z),
            ("eta_xy", self.eta_xy),
            ("eta_z", self.eta_z),
            ("phi_xy", self.phi_xy),
            ("phi_z", self.phi_z),
            ("lambda_att", self.lambda_att),
            ("eta_att", self.eta_att),
            ("phi_att", self.phi_att),
        ];
        for (name, v) in named {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidGain(name));
            }
        }
        Ok(())
    }
}

/// First-order sliding mode on position and attitude.
///
/// Surface per translational axis: s = (v_ref − v) + λ(x_ref − x).
/// Zero boundary-layer width gives the discontinuous reaching law
/// (chattering); a positive width trades exact reaching for smoothness.
/// No persistent state beyond the surface values kept for telemetry.
#[derive(Debug, Clone)]
pub struct SmcController {
    pub gains: SmcGains,
    pub(crate) surfaces: Vector3<f64>,
}

impl SmcController {
    pub fn new(gains: SmcGains) -> SmcController {
        SmcController { gains, surfaces: Vector3::zeros() }
    }

    pub fn reset(&mut self) {
        self.surfaces = Vector3::zeros();
    }

    pub fn control(&mut self, state: &State, sp: &Setpoint, params: &Params) -> ControlInput {
        let g = &self.gains;
        let err = sp.pos - state.pos;
        let verr = sp.vel - state.vel;

        let s = Vector3::new(
            verr.x + g.lambda_xy * err.x,
            verr.y + g.lambda_z * err.y,
            verr.z + g.lambda_xy * err.z,
        );
        self.surfaces = s;

        let accel_des = Vector3::new(
            g.lambda_xy * verr.x + g.eta_xy * sat(s.x, g.phi_xy),
            g.lambda_z * verr.y + g.eta_z * sat(s.y, g.phi_z),
            g.lambda_xy * verr.z + g.eta_xy * sat(s.z, g.phi_xy),
        );

        // Inner loop holds zero yaw
        let target = thrust_vector(&accel_des, state, params, 0.0);

        let (p, q, r) = (state.rates.x, state.rates.y, state.rates.z);
        let s_roll = -p + g.lambda_att * (target.roll - state.att.x);
        let s_pitch = -q + g.lambda_att * (target.pitch - state.att.y);
        let s_yaw = -r + g.lambda_att * (0.0 - state.att.z);

        let torque = Vector3::new(
            params.ixx * (g.lambda_att * -p + g.eta_att * sat(s_roll, g.phi_att)),
            params.iyy * (g.lambda_att * -q + g.eta_att * sat(s_pitch, g.phi_att)),
            params.izz * (g.lambda_att * -r + g.eta_att * sat(s_yaw, g.phi_att)),
        );

        ControlInput { thrust: target.thrust, torque }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn hover_setpoint() -> Setpoint {
        Setpoint { pos: Vector3::new(0.0, 3.0, 0.0), vel: Vector3::zeros(), yaw: 0.0 }
    }

    fn on_setpoint_state() -> State {
        let mut s = State::at_rest();
        s.pos = Vector3::new(0.0, 3.0, 0.0);
        s
    }

    #[test]
    fn default_gains_validate() {
        assert!(SmcGains::default().validate().is_ok());
    }

    #[test]
    fn zero_surface_with_zero_layer_gives_zero_correction() {
        let params = Params::default();
        let mut g = SmcGains::default();
        g.phi_xy = 0.0;
        g.phi_z = 0.0;
        let mut c = SmcController::new(g);
        let out = c.control(&on_setpoint_state(), &hover_setpoint(), &params);
        // sign(0) = 0: pure hover thrust, no torque
        assert!((out.thrust - params.hover_thrust()).abs() < 1e-9);
        assert_eq!(c.surfaces, Vector3::zeros());
    }

    #[test]
    fn control_is_continuous_inside_the_boundary_layer() {
        let params = Params::default();
        let mut c = SmcController::new(SmcGains::default());
        let sp = hover_setpoint();
        // Two nearby states inside the layer: outputs must be close
        let mut s1 = on_setpoint_state();
        s1.pos.y += 0.001;
        let mut s2 = on_setpoint_state();
        s2.pos.y += 0.0011;
        let o1 = c.control(&s1, &sp, &params);
        let o2 = c.control(&s2, &sp, &params);
        assert!((o1.thrust - o2.thrust).abs() < 0.05);
    }

    #[test]
    fn surfaces_are_published_for_telemetry() {
        let params = Params::default();
        let mut c = SmcController::new(SmcGains::default());
        let state = State::at_rest(); // 3 m altitude error
        c.control(&state, &hover_setpoint(), &params);
        let expect = SmcGains::default().lambda_z * 3.0;
        assert!((c.surfaces.y - expect).abs() < 1e-12);
        c.reset();
        assert_eq!(c.surfaces, Vector3::zeros());
    }

    #[test]
    fn positive_surface_pushes_up() {
        let params = Params::default();
        let mut c = SmcController::new(SmcGains::default());
        let state = State::at_rest();
        let out = c.control(&state, &hover_setpoint(), &params);
        assert!(out.thrust > params.hover_thrust());
    }
}
