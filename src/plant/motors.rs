use std::f64::consts::SQRT_2;

use crate::control::ControlInput;
use crate::plant::params::Params;

// ---------------------------------------------------------------------------
// X-configuration motor mixing
// ---------------------------------------------------------------------------
//
// Motor order: 1 front-right (CW), 2 front-left (CCW),
//              3 rear-left (CW),   4 rear-right (CCW).

/// Inverse mixing: rotor speeds realizing a thrust/torque demand.
///
/// Each squared speed is clamped to [0, ωmax²] before the square root.
/// Returns the speeds and whether any rotor saturated; saturation is
/// telemetry only and never feeds back into the dynamics.
pub fn allocate(input: &ControlInput, params: &Params) -> ([f64; 4], bool) {
    let a = input.thrust / (4.0 * params.k_thrust);
    let b = input.torque.x * SQRT_2 / (4.0 * params.k_thrust * params.arm_len);
    let c = input.torque.y * SQRT_2 / (4.0 * params.k_thrust * params.arm_len);
    let d = input.torque.z / (4.0 * params.k_drag);

    let squared = [
        a - b - c - d,
        a - b + c + d,
        a + b + c - d,
        a + b - c + d,
    ];

    let max_sq = params.motor_max * params.motor_max;
    let mut speeds = [0.0; 4];
    let mut saturated = false;
    for (out, sq) in speeds.iter_mut().zip(squared) {
        if sq < 0.0 || sq > max_sq {
            saturated = true;
        }
        *out = sq.clamp(0.0, max_sq).sqrt();
    }
    (speeds, saturated)
}

/// Forward mixing: thrust and torques produced by a set of rotor speeds.
pub fn mix(speeds: &[f64; 4], params: &Params) -> ControlInput {
    let sq: Vec<f64> = speeds.iter().map(|w| w * w).collect();
    let (w1, w2, w3, w4) = (sq[0], sq[1], sq[2], sq[3]);

    let kl = params.k_thrust * params.arm_len / SQRT_2;
    ControlInput {
        thrust: params.k_thrust * (w1 + w2 + w3 + w4),
        torque: nalgebra::Vector3::new(
            kl * (-w1 - w2 + w3 + w4),
            kl * (-w1 + w2 + w3 - w4),
            params.k_drag * (-w1 + w2 - w3 + w4),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
