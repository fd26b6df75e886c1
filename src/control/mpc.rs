use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::control::cascade::{attitude_pd, thrust_vector};
use crate::control::ControlInput;
use crate::error::ConfigError;
use crate::plant::params::Params;
use crate::plant::state::State;
use crate::reference::{Reference, Setpoint};

// ---------------------------------------------------------------------------
// Receding-horizon predictive control
// ---------------------------------------------------------------------------

/// Largest accepted horizon length; beyond this the lookahead cost per
/// tick stops buying any tracking improvement.
pub const MAX_HORIZON: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MpcGains {
    pub n: usize,
    pub q_pos: f64,
    pub q_vel: f64,
    pub r: f64,
    pub kp_att: f64,
    pub kd_att: f64,
}

impl Default for MpcGains {
    fn default() -> Self {
        Self {
            n: 10,
            q_pos: 6.0,
            q_vel: 3.0,
            r: 0.1,
            kp_att: 0.8,
            kd_att: 0.12,
        }
    }
}

impl MpcGains {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 || self.n > MAX_HORIZON {
            return Err(ConfigError::InvalidGain("N"));
        }
        let named: [(&'static str, f64); 5] = [
            ("Q_pos", self.q_pos),
            ("Q_vel", self.q_vel),
            ("R", self.r),
            ("Kp_att", self.kp_att),
            ("Kd_att", self.kd_att),
        ];
        for (name, v) in named {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidGain(name));
            }
        }
        Ok(())
    }
}

/// Receding-horizon controller: a closed-form weighted sum over sampled
/// future references, not a constrained QP solve.
///
/// For each translational axis, the reference is sampled N steps ahead at
/// 2·dt spacing against a zero-acceleration rollout; the weighted errors
/// collapse into a single acceleration command. The inner attitude loop is
/// the PD law shared with the cascaded PID.
#[derive(Debug, Clone)]
pub struct MpcController {
    pub gains: MpcGains,
    pub(crate) horizon: Vec<Vector3<f64>>,
}

impl MpcController {
    pub fn new(gains: MpcGains) -> MpcController {
        MpcController { gains, horizon: Vec::new() }
    }

    pub fn reset(&mut self) {
        self.horizon.clear();
    }

    pub fn control(
        &mut self,
        state: &State,
        sp: &Setpoint,
        reference: &Reference,
        params: &Params,
        dt: f64,
    ) -> ControlInput {
        let g = &self.gains;
        let n = g.n;
        let dt_pred = 2.0 * dt;
        let t_now = state.time;

        let mut weighted = Vector3::zeros();
        let mut weight_sum = 0.0;
        for k in 1..=n {
            let t_k = t_now + k as f64 * dt_pred;
            let ref_k = reference.lookahead(t_k).pos;
            let pred_k = state.pos + state.vel * (k as f64 * dt_pred);
            let err_k = ref_k - pred_k;
            let w_k = 1.0 - 0.3 * (k - 1) as f64 / n as f64;
            weighted += w_k * (g.q_pos * err_k - g.q_vel * state.vel);
            weight_sum += w_k;
        }
        let accel_des = weighted / (weight_sum * (1.0 + g.r));

        // Constant-acceleration rollout, published for the renderer only
        self.horizon.clear();
        self.horizon.extend((0..=n).map(|k| {
            let tau = k as f64 * dt_pred;
            state.pos + state.vel * tau + accel_des * (0.5 * tau * tau)
        }));

        let target = thrust_vector(&accel_des, state, params, sp.yaw);
        let torque = attitude_pd(&target, state, g.kp_att, g.kd_att, g.kp_att, g.kd_att);

        ControlInput { thrust: target.thrust, torque }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
