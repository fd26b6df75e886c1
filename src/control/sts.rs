use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::control::cascade::{sign, thrust_vector};
use crate::control::ControlInput;
use crate::error::ConfigError;
use crate::plant::params::Params;
use crate::plant::state::State;
use crate::reference::Setpoint;

// ---------------------------------------------------------------------------
// Super-twisting sliding mode (continuous second-order)
// ---------------------------------------------------------------------------

/// Gains for the super-twisting algorithm.
///
/// Finite-time convergence against Lipschitz disturbances is guaranteed
/// for α₁² ≥ 4α₂; the bound is documented, not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StsGains {
    pub lambda_xy: f64,
    pub lambda_z: f64,
    pub alpha1_xy: f64,
    pub alpha2_xy: f64,
    pub alpha1_z: f64,
    pub alpha2_z: f64,
    pub lambda_att: f64,
    pub alpha1_att: f64,
    pub alpha2_att: f64,
}

impl Default for StsGains {
    fn default() -> Self {
        Self {
            lambda_xy: 2.0,
            lambda_z: 3.0,
            alpha1_xy: 3.0,
            alpha2_xy: 2.0,
            alpha1_z: 4.0,
            alpha2_z: 4.0,
            lambda_att: 15.0,
            alpha1_att: 40.0,
            alpha2_att: 150.0,
        }
    }
}

impl StsGains {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named: [(&'static str, f64); 9] = [
            ("lambda_xy", self.lambda_xy),
            ("lambda_z", self.lambda_z),
            ("alpha1_xy", self.alpha1_xy),
            ("alpha2_xy", self.alpha2_xy),
            ("alpha1_z", self.alpha1_z),
            ("alpha2_z", self.alpha2_z),
            ("lambda_att", self.lambda_att),
            ("alpha1_att", self.alpha1_att),
            ("alpha2_att", self.alpha2_att),
        ];
        for (name, v) in named {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidGain(name));
            }
        }
        Ok(())
    }
}

/// Super-twisting controller: continuous control with finite-time
/// convergence of both the surface and its derivative.
///
/// Per axis: u = α₁·√|s|·sign(s) + v with v̇ = −α₂·sign(s), the
/// accumulator integrated by explicit Euler. Six accumulators persist
/// across ticks (three translational, three attitude); all are
/// zero-initialized at reset.
#[derive(Debug, Clone)]
pub struct StsController {
    pub gains: StsGains,
    v_pos: Vector3<f64>,
    v_att: Vector3<f64>,
    pub(crate) surfaces: Vector3<f64>,
}

impl StsController {
    pub fn new(gains: StsGains) -> StsController {
        StsController {
            gains,
            v_pos: Vector3::zeros(),
            v_att: Vector3::zeros(),
            surfaces: Vector3::zeros(),
        }
    }

    pub fn reset(&mut self) {
        self.v_pos = Vector3::zeros();
        self.v_att = Vector3::zeros();
        self.surfaces = Vector3::zeros();
    }

    pub fn accumulators(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.v_pos, self.v_att)
    }

    fn twist(s: f64, v: &mut f64, alpha1: f64, alpha2: f64, dt: f64) -> f64 {
        let u = alpha1 * s.abs().sqrt() * sign(s) + *v;
        *v -= alpha2 * sign(s) * dt;
        u
    }

    pub fn control(&mut self, state: &State, sp: &Setpoint, params: &Params, dt: f64) -> ControlInput {
        let g = self.gains.clone();
        let err = sp.pos - state.pos;
        let verr = sp.vel - state.vel;

        let s = Vector3::new(
            verr.x + g.lambda_xy * err.x,
            verr.y + g.lambda_z * err.y,
            verr.z + g.lambda_xy * err.z,
        );
        self.surfaces = s;

        let accel_des = Vector3::new(
            Self::twist(s.x, &mut self.v_pos.x, g.alpha1_xy, g.alpha2_xy, dt),
            Self::twist(s.y, &mut self.v_pos.y, g.alpha1_z, g.alpha2_z, dt),
            Self::twist(s.z, &mut self.v_pos.z, g.alpha1_xy, g.alpha2_xy, dt),
        );

        // Inner loop holds zero yaw, same surface shape as first-order SMC
        let target = thrust_vector(&accel_des, state, params, 0.0);

        let (p, q, r) = (state.rates.x, state.rates.y, state.rates.z);
        let s_roll = -p + g.lambda_att * (target.roll - state.att.x);
        let s_pitch = -q + g.lambda_att * (target.pitch - state.att.y);
        let s_yaw = -r + g.lambda_att * (0.0 - state.att.z);

        let torque = Vector3::new(
            params.ixx * Self::twist(s_roll, &mut self.v_att.x, g.alpha1_att, g.alpha2_att, dt),
            params.iyy * Self::twist(s_pitch, &mut self.v_att.y, g.alpha1_att, g.alpha2_att, dt),
            params.izz * Self::twist(s_yaw, &mut self.v_att.z, g.alpha1_att, g.alpha2_att, dt),
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

    #[test]
    fn default_gains_validate_and_satisfy_convergence_bound() {
        let g = StsGains::default();
        assert!(g.validate().is_ok());
        assert!(g.alpha1_xy.powi(2) >= 4.0 * g.alpha2_xy);
        assert!(g.alpha1_z.powi(2) >= 4.0 * g.alpha2_z);
        assert!(g.alpha1_att.powi(2) >= 4.0 * g.alpha2_att);
    }

    #[test]
    fn accumulators_integrate_against_the_surface_sign() {
        let params = Params::default();
        let mut c = StsController::new(StsGains::default());
        let state = State::at_rest(); // altitude surface positive
        c.control(&state, &hover_setpoint(), &params, 1.0 / 120.0);
        let (v_pos, _) = c.accumulators();
        assert!(v_pos.y < 0.0, "v integrates −α₂·sign(s)");
        assert_eq!(v_pos.x, 0.0, "zero surface leaves the accumulator alone");
    }

    #[test]
    fn reset_zeroes_all_six_accumulators() {
        let params = Params::default();
        let mut c = StsController::new(StsGains::default());
        let mut state = State::at_rest();
        state.att = Vector3::new(0.1, -0.1, 0.05);
        for _ in 0..50 {
            c.control(&state, &hover_setpoint(), &params, 1.0 / 120.0);
        }
        let (v_pos, v_att) = c.accumulators();
        assert!(v_pos.norm() > 0.0 && v_att.norm() > 0.0);
        c.reset();
        let (v_pos, v_att) = c.accumulators();
        assert_eq!(v_pos, Vector3::zeros());
        assert_eq!(v_att, Vector3::zeros());
        assert_eq!(c.surfaces, Vector3::zeros());
    }

    #[test]
    fn output_is_continuous_across_the_surface() {
        let params = Params::default();
        let sp = hover_setpoint();
        let mut c1 = StsController::new(StsGains::default());
        let mut c2 = StsController::new(StsGains::default());
        let mut s1 = State::at_rest();
        s1.pos = Vector3::new(0.0, 3.0 - 1e-6, 0.0);
        let mut s2 = State::at_rest();
        s2.pos = Vector3::new(0.0, 3.0 + 1e-6, 0.0);
        let o1 = c1.control(&s1, &sp, &params, 1.0 / 120.0);
        let o2 = c2.control(&s2, &sp, &params, 1.0 / 120.0);
        // √|s| shrinks the discontinuity to zero at the surface
        assert!((o1.thrust - o2.thrust).abs() < 0.05);
    }
}
