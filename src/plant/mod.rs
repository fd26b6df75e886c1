pub mod dynamics;
pub mod motors;
pub mod params;
pub mod state;

pub use params::{Params, ParamsBuilder};
pub use state::{Deriv, State};

use nalgebra::Vector3;

use crate::control::ControlInput;
use crate::sim::integrator::rk4_step;

// ---------------------------------------------------------------------------
// Plant: owns the state vector and the physical parameters
// ---------------------------------------------------------------------------

/// The simulated vehicle. Exclusively owns its state and parameters; the
/// orchestrator borrows the state for the duration of a single substep.
#[derive(Debug, Clone)]
pub struct Plant {
    state: State,
    params: Params,
}

impl Plant {
    pub fn new(params: Params) -> Plant {
        Plant { state: State::at_rest(), params }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Back to rest on the ground, t = 0.
    pub fn reset(&mut self) {
        self.state = State::at_rest();
    }

    /// Advance one RK4 step of `dt` seconds with the input and wind sample
    /// held constant, then apply ground contact and recompute the rotor
    /// speeds for telemetry. Returns the rotor saturation flag.
    pub fn step(&mut self, input: &ControlInput, wind: &Vector3<f64>, dt: f64) -> bool {
        self.state = rk4_step(&self.state, input, &self.params, wind, dt);

        // Soft ground contact: clamp height and kill downward velocity,
        // attitude untouched.
        if self.state.pos.y < 0.0 {
            self.state.pos.y = 0.0;
            self.state.vel.y = self.state.vel.y.max(0.0);
        }

        let (speeds, saturated) = motors::allocate(input, &self.params);
        self.state.motors = speeds;
        saturated
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
