use nalgebra::Vector3;

use crate::control::ControlInput;
use crate::plant::dynamics::derivatives;
use crate::plant::params::Params;
use crate::plant::state::State;

// ---------------------------------------------------------------------------
// Classical RK4 with constant input and wind over the step
// ---------------------------------------------------------------------------

/// Single RK4 step. Intermediate states are value copies; the caller
/// receives a fresh state advanced by `dt`.
pub fn rk4_step(
    state: &State,
    input: &ControlInput,
    params: &Params,
    wind: &Vector3<f64>,
    dt: f64,
) -> State {
    let k1 = derivatives(state, input, params, wind);
    let k2 = derivatives(&state.apply(&k1, dt * 0.5), input, params, wind);
    let k3 = derivatives(&state.apply(&k2, dt * 0.5), input, params, wind);
    let k4 = derivatives(&state.apply(&k3, dt), input, params, wind);

    let sixth = dt / 6.0;
    State {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * sixth,
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * sixth,
        att: state.att + (k1.datt + 2.0 * k2.datt + 2.0 * k3.datt + k4.datt) * sixth,
        rates: state.rates + (k1.drates + 2.0 * k2.drates + 2.0 * k3.drates + k4.drates) * sixth,
        motors: state.motors,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equilibrium_hover_does_not_drift() {
        let params = Params::default();
        let mut state = State::at_rest();
        state.pos = Vector3::new(0.0, 3.0, 0.0);
        let input = ControlInput { thrust: params.hover_thrust(), torque: Vector3::zeros() };

        let dt = 1.0 / 120.0;
        for _ in 0..120 {
            state = rk4_step(&state, &input, &params, &Vector3::zeros(), dt);
        }
        let drift = (state.pos - Vector3::new(0.0, 3.0, 0.0)).norm();
        assert!(drift < 1e-6, "hover drift {drift} after 1 s");
        assert!((state.time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn free_fall_matches_the_closed_form() {
        let params = crate::plant::ParamsBuilder::new().c_drag(0.0).build().unwrap();
        let mut state = State::at_rest();
        state.pos = Vector3::new(0.0, 100.0, 0.0);
        let input = ControlInput::default();

        let dt = 1.0 / 120.0;
        for _ in 0..120 {
            state = rk4_step(&state, &input, &params, &Vector3::zeros(), dt);
        }
        // y = y0 − g t² / 2 after 1 s
        let expect = 100.0 - 0.5 * params.gravity;
        assert!((state.pos.y - expect).abs() < 1e-9);
        assert!((state.vel.y + params.gravity).abs() < 1e-9);
    }

    #[test]
    fn constant_torque_spins_up_linearly() {
        let params = Params::default();
        let state = State::at_rest();
        let input = ControlInput {
            thrust: 0.0,
            torque: Vector3::new(0.0, 0.0, 0.001),
        };
        let next = rk4_step(&state, &input, &params, &Vector3::zeros(), 0.01);
        let expect = 0.001 / params.izz * 0.01;
        assert!((next.rates.z - expect).abs() < 1e-9);
    }
}
