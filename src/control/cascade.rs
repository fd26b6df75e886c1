use nalgebra::Vector3;

use crate::plant::params::Params;
use crate::plant::state::State;

// ---------------------------------------------------------------------------
// Shared outer/inner cascade pieces
// ---------------------------------------------------------------------------

/// Tilt limit for the desired roll/pitch, rad. Keeps the small-attitude
/// linearization valid and stays clear of the Euler singularity.
pub const TILT_LIMIT: f64 = 0.6;

/// Desired thrust and attitude produced by the outer loop.
#[derive(Debug, Clone, Copy)]
pub struct AttitudeTarget {
    pub thrust: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Thrust-vector inversion: map a desired world-frame acceleration into
/// total thrust and the roll/pitch that realize its horizontal component.
///
/// Thrust is clamped to [0, 4mg]; the `max(·, 0.1)` guards bound the
/// near-singular configurations (free fall, knife-edge attitude).
pub fn thrust_vector(accel_des: &Vector3<f64>, state: &State, params: &Params, yaw_des: f64) -> AttitudeTarget {
    let (phi, theta, psi) = (state.att.x, state.att.y, state.att.z);

    let thrust = (params.mass * (params.gravity + accel_des.y)
        / (phi.cos() * theta.cos()).max(0.1))
        .clamp(0.0, params.max_thrust());

    let sin_roll = (params.mass * (accel_des.x * psi.sin() - accel_des.z * psi.cos())
        / thrust.max(0.1))
        .clamp(-0.8, 0.8);
    let roll = sin_roll.asin().clamp(-TILT_LIMIT, TILT_LIMIT);

    let pitch = (accel_des.x * psi.cos() + accel_des.z * psi.sin())
        .atan2(params.gravity + accel_des.y)
        .clamp(-TILT_LIMIT, TILT_LIMIT);

    AttitudeTarget { thrust, roll, pitch, yaw: yaw_des }
}

/// Inner-loop PD on attitude: torque from attitude error and body rate.
pub fn attitude_pd(
    target: &AttitudeTarget,
    state: &State,
    kp_att: f64,
    kd_att: f64,
    kp_yaw: f64,
    kd_yaw: f64,
) -> Vector3<f64> {
    Vector3::new(
        kp_att * (target.roll - state.att.x) - kd_att * state.rates.x,
        kp_att * (target.pitch - state.att.y) - kd_att * state.rates.y,
        kp_yaw * (target.yaw - state.att.z) - kd_yaw * state.rates.z,
    )
}

/// Exact sign with sign(0) = 0.
pub fn sign(s: f64) -> f64 {
    if s > 0.0 {
        1.0
    } else if s < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Boundary-layer saturation: linear inside a layer of width `width`,
/// pure sign when the width is zero.
pub fn sat(s: f64, width: f64) -> f64 {
    if width > 0.0 {
        (s / width).clamp(-1.0, 1.0)
    } else {
        sign(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
