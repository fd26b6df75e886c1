use nalgebra::Vector3;

use crate::control::ControlInput;
use crate::plant::params::Params;
use crate::plant::state::{Deriv, State};

// ---------------------------------------------------------------------------
// Equations of motion (6DOF rigid body, Euler-angle kinematics)
// ---------------------------------------------------------------------------

/// Compute the 12 state derivatives.
///
/// Forces & moments:
///   1. Rotor thrust along body +y, rotated to world (ZYX)
///   2. Gravity (world -y)
///   3. Linear translational drag
///   4. External wind acceleration
///   5. Body torques with inertia cross-coupling (Euler's equations)
///
/// The Euler kinematics are singular at |θ| = π/2; the attitude clamp in the
/// control cascade keeps commanded pitch well inside that region.
pub fn derivatives(state: &State, input: &ControlInput, params: &Params, wind: &Vector3<f64>) -> Deriv {
    let (phi, theta, psi) = (state.att.x, state.att.y, state.att.z);
    let (p, q, r) = (state.rates.x, state.rates.y, state.rates.z);

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_psi, cos_psi) = psi.sin_cos();

    // --- Thrust direction in world frame (body +y rotated by ZYX) ---
    let t = input.thrust;
    let thrust_world = Vector3::new(
        t * (cos_psi * sin_theta * cos_phi + sin_psi * sin_phi),
        t * (cos_theta * cos_phi),
        t * (sin_psi * sin_theta * cos_phi - cos_psi * sin_phi),
    );

    // --- Translational acceleration ---
    let accel = thrust_world / params.mass
        - Vector3::new(0.0, params.gravity, 0.0)
        - state.vel * params.c_drag
        + wind;

    // --- Euler-angle kinematics ---
    let datt = Vector3::new(
        p + theta.tan() * (sin_phi * q + cos_phi * r),
        cos_phi * q - sin_phi * r,
        (sin_phi * q + cos_phi * r) / cos_theta,
    );

    // --- Euler's equations (body frame, principal axes) ---
    let tau = &input.torque;
    let drates = Vector3::new(
        (tau.x - (params.izz - params.iyy) * q * r) / params.ixx,
        (tau.y - (params.ixx - params.izz) * p * r) / params.iyy,
        (tau.z - (params.iyy - params.ixx) * p * q) / params.izz,
    );

    Deriv {
        dpos: state.vel,
        dvel: accel,
        datt,
        drates,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn hover_state() -> State {
        let mut s = State::at_rest();
        s.pos = Vector3::new(0.0, 3.0, 0.0);
        s
    }

    fn hover_input(params: &Params) -> ControlInput {
        ControlInput {
            thrust: params.hover_thrust(),
            torque: Vector3::zeros(),
        }
    }

    #[test]
    fn hover_is_an_equilibrium() {
        let params = Params::default();
        let s = hover_state();
        let d = derivatives(&s, &hover_input(&params), &params, &Vector3::zeros());
        assert!(d.dvel.norm() < 1e-12, "hover thrust must cancel gravity");
        assert!(d.datt.norm() < 1e-12);
        assert!(d.drates.norm() < 1e-12);
    }

    #[test]
    fn level_thrust_points_up() {
        let params = Params::default();
        let s = hover_state();
        let input = ControlInput { thrust: 2.0 * params.hover_thrust(), torque: Vector3::zeros() };
        let d = derivatives(&s, &input, &params, &Vector3::zeros());
        assert!(d.dvel.y > 0.0);
        assert!(d.dvel.x.abs() < 1e-12 && d.dvel.z.abs() < 1e-12);
    }

    #[test]
    fn roll_tilts_thrust_sideways() {
        let params = Params::default();
        let mut s = hover_state();
        s.att.x = 0.2; // positive roll, zero yaw
        let d = derivatives(&s, &hover_input(&params), &params, &Vector3::zeros());
        // Tz = T(sinψ sinθ cosφ − cosψ sinφ) = −T sinφ at ψ = θ = 0
        assert!(d.dvel.z < 0.0, "positive roll accelerates toward −z");
        assert!(d.dvel.y < 0.0, "tilted thrust no longer cancels gravity");
    }

    #[test]
    fn drag_opposes_velocity() {
        let params = Params::default();
        let mut s = hover_state();
        s.vel = Vector3::new(2.0, 0.0, -1.0);
        let d = derivatives(&s, &hover_input(&params), &params, &Vector3::zeros());
        assert!(d.dvel.x < 0.0);
        assert!(d.dvel.z > 0.0);
    }

    #[test]
    fn wind_adds_to_acceleration() {
        let params = Params::default();
        let s = hover_state();
        let w = Vector3::new(1.5, 0.0, -0.5);
        let d = derivatives(&s, &hover_input(&params), &params, &w);
        assert!((d.dvel.x - 1.5).abs() < 1e-12);
        assert!((d.dvel.z + 0.5).abs() < 1e-12);
    }

    #[test]
    fn pitch_rate_couples_into_roll_when_banked() {
        let params = Params::default();
        let mut s = hover_state();
        s.att.x = 0.3;
        s.att.y = 0.2;
        s.rates = Vector3::new(0.0, 1.0, 0.0);
        let d = derivatives(&s, &hover_input(&params), &params, &Vector3::zeros());
        // φ' = p + tanθ (sinφ q + cosφ r)
        let expect = 0.2_f64.tan() * 0.3_f64.sin();
        assert!((d.datt.x - expect).abs() < 1e-12);
    }

    #[test]
    fn yaw_torque_spins_r() {
        let params = Params::default();
        let s = hover_state();
        let input = ControlInput {
            thrust: params.hover_thrust(),
            torque: Vector3::new(0.0, 0.0, 0.01),
        };
        let d = derivatives(&s, &input, &params, &Vector3::zeros());
        assert!((d.drates.z - 0.01 / params.izz).abs() < 1e-9);
    }
}
