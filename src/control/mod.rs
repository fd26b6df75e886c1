pub mod cascade;
pub mod mpc;
pub mod pid;
pub mod smc;
pub mod sts;

pub use mpc::{MpcController, MpcGains};
pub use pid::{PidController, PidGains};
pub use smc::{SmcController, SmcGains};
pub use sts::{StsController, StsGains};

use std::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::plant::params::Params;
use crate::plant::state::State;
use crate::reference::{Reference, Setpoint};

// ---------------------------------------------------------------------------
// Control input
// ---------------------------------------------------------------------------

/// Body-axis control demand: total thrust plus roll/pitch/yaw torques.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlInput {
    pub thrust: f64,             // N, along body +y
    pub torque: Vector3<f64>,    // N·m, [τφ, τθ, τψ]
}

// ---------------------------------------------------------------------------
// Algorithm catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Pid,
    Smc,
    Sts,
    Mpc,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Pid => "pid",
            Algorithm::Smc => "smc",
            Algorithm::Sts => "sts",
            Algorithm::Mpc => "mpc",
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pid" => Ok(Algorithm::Pid),
            "smc" => Ok(Algorithm::Smc),
            "sts" => Ok(Algorithm::Sts),
            "mpc" => Ok(Algorithm::Mpc),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Gain sets
// ---------------------------------------------------------------------------

/// Tagged gain set, one shape per algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Gains {
    Pid(PidGains),
    Smc(SmcGains),
    Sts(StsGains),
    Mpc(MpcGains),
}

impl Gains {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Gains::Pid(_) => Algorithm::Pid,
            Gains::Smc(_) => Algorithm::Smc,
            Gains::Sts(_) => Algorithm::Sts,
            Gains::Mpc(_) => Algorithm::Mpc,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Gains::Pid(g) => g.validate(),
            Gains::Smc(g) => g.validate(),
            Gains::Sts(g) => g.validate(),
            Gains::Mpc(g) => g.validate(),
        }
    }
}

/// Per-algorithm gain storage. `setGains` updates the slot for its
/// algorithm; switching algorithms picks the stored set back up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GainBank {
    pub pid: PidGains,
    pub smc: SmcGains,
    pub sts: StsGains,
    pub mpc: MpcGains,
}

impl GainBank {
    pub fn store(&mut self, gains: Gains) {
        match gains {
            Gains::Pid(g) => self.pid = g,
            Gains::Smc(g) => self.smc = g,
            Gains::Sts(g) => self.sts = g,
            Gains::Mpc(g) => self.mpc = g,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller dispatch
// ---------------------------------------------------------------------------

/// The active control law and its internal state.
///
/// Internal state is owned here, never by the plant; resetting
/// reconstructs the variant's state and clears published telemetry.
#[derive(Debug, Clone)]
pub enum Controller {
    Pid(PidController),
    Smc(SmcController),
    Sts(StsController),
    Mpc(MpcController),
}

impl Controller {
    pub fn new(algorithm: Algorithm, bank: &GainBank) -> Controller {
        match algorithm {
            Algorithm::Pid => Controller::Pid(PidController::new(bank.pid.clone())),
            Algorithm::Smc => Controller::Smc(SmcController::new(bank.smc.clone())),
            Algorithm::Sts => Controller::Sts(StsController::new(bank.sts.clone())),
            Algorithm::Mpc => Controller::Mpc(MpcController::new(bank.mpc.clone())),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Controller::Pid(_) => Algorithm::Pid,
            Controller::Smc(_) => Algorithm::Smc,
            Controller::Sts(_) => Algorithm::Sts,
            Controller::Mpc(_) => Algorithm::Mpc,
        }
    }

    /// Compute the control input for one tick.
    pub fn control(
        &mut self,
        state: &State,
        setpoint: &Setpoint,
        reference: &Reference,
        params: &Params,
        dt: f64,
    ) -> ControlInput {
        match self {
            Controller::Pid(c) => c.control(state, setpoint, params, dt),
            Controller::Smc(c) => c.control(state, setpoint, params),
            Controller::Sts(c) => c.control(state, setpoint, params, dt),
            Controller::Mpc(c) => c.control(state, setpoint, reference, params, dt),
        }
    }

    /// Zero all integrators, accumulators and published telemetry.
    /// Mandatory on episode reset and on algorithm switch.
    pub fn reset(&mut self) {
        match self {
            Controller::Pid(c) => c.reset(),
            Controller::Smc(c) => c.reset(),
            Controller::Sts(c) => c.reset(),
            Controller::Mpc(c) => c.reset(),
        }
    }

    /// Swap in a new gain set of the matching shape; internal state is
    /// preserved so tuning does not restart the episode.
    pub fn apply_gains(&mut self, gains: &Gains) {
        match (self, gains) {
            (Controller::Pid(c), Gains::Pid(g)) => c.gains = g.clone(),
            (Controller::Smc(c), Gains::Smc(g)) => c.gains = g.clone(),
            (Controller::Sts(c), Gains::Sts(g)) => c.gains = g.clone(),
            (Controller::Mpc(c), Gains::Mpc(g)) => c.gains = g.clone(),
            _ => {}
        }
    }

    /// Sliding-surface values (s_x, s_y, s_z); zero for PID and MPC.
    pub fn surfaces(&self) -> Vector3<f64> {
        match self {
            Controller::Smc(c) => c.surfaces,
            Controller::Sts(c) => c.surfaces,
            _ => Vector3::zeros(),
        }
    }

    /// Predicted horizon positions; empty unless the predictive
    /// controller is active and has run at least one tick.
    pub fn horizon(&self) -> &[Vector3<f64>] {
        match self {
            Controller::Mpc(c) => &c.horizon,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_ids_parse() {
        for id in ["pid", "smc", "sts", "mpc"] {
            let a: Algorithm = id.parse().unwrap();
            assert_eq!(a.as_str(), id);
        }
        assert!(matches!(
            "lqr".parse::<Algorithm>(),
            Err(ConfigError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn bank_stores_by_variant() {
        let mut bank = GainBank::default();
        let mut pid = PidGains::default();
        pid.kp_xy = 42.0;
        bank.store(Gains::Pid(pid));
        assert_eq!(bank.pid.kp_xy, 42.0);
        // Other slots untouched
        assert_eq!(bank.smc.eta_xy, SmcGains::default().eta_xy);
    }

    #[test]
    fn non_sliding_controllers_publish_zero_surfaces() {
        let bank = GainBank::default();
        let c = Controller::new(Algorithm::Pid, &bank);
        assert_eq!(c.surfaces(), Vector3::zeros());
        assert!(c.horizon().is_empty());
    }

    #[test]
    fn gain_swap_preserves_variant() {
        let bank = GainBank::default();
        let mut c = Controller::new(Algorithm::Smc, &bank);
        c.apply_gains(&Gains::Pid(PidGains::default()));
        assert_eq!(c.algorithm(), Algorithm::Smc);
    }
}
