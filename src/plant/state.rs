use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Rigid-body state: position, velocity, attitude, body rates
// ---------------------------------------------------------------------------

/// Full 6-DOF state at a single point in time.
///
/// World frame: `y` is up; `x`, `z` span the horizontal plane.
/// Attitude is ZYX intrinsic Euler angles; rates are body-frame.
#[derive(Debug, Clone)]
pub struct State {
    pub time: f64,
    pub pos: Vector3<f64>,    // m, world [x, y (up), z]
    pub vel: Vector3<f64>,    // m/s, world
    pub att: Vector3<f64>,    // rad [roll φ, pitch θ, yaw ψ]
    pub rates: Vector3<f64>,  // rad/s, body [p, q, r]
    pub motors: [f64; 4],     // rad/s, recomputed each tick for telemetry
}

impl State {
    /// State at rest on the ground, t = 0.
    pub fn at_rest() -> State {
        State {
            time: 0.0,
            pos: Vector3::zeros(),
            vel: Vector3::zeros(),
            att: Vector3::zeros(),
            rates: Vector3::zeros(),
            motors: [0.0; 4],
        }
    }

    /// Advance state by a derivative scaled by dt (used inside RK4).
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            att: self.att + d.datt * dt,
            rates: self.rates + d.drates * dt,
            motors: self.motors,
        }
    }

    /// Roll angle φ (rad).
    pub fn roll(&self) -> f64 {
        self.att.x
    }

    /// Pitch angle θ (rad).
    pub fn pitch(&self) -> f64 {
        self.att.y
    }

    /// Yaw angle ψ (rad).
    pub fn yaw(&self) -> f64 {
        self.att.z
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector3<f64>,    // velocity
    pub dvel: Vector3<f64>,    // acceleration
    pub datt: Vector3<f64>,    // Euler-angle rates
    pub drates: Vector3<f64>,  // angular acceleration, body frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_scales_by_dt() {
        let s = State::at_rest();
        let d = Deriv {
            dpos: Vector3::new(1.0, 2.0, 3.0),
            dvel: Vector3::new(0.5, 0.0, 0.0),
            datt: Vector3::new(0.0, 0.1, 0.0),
            drates: Vector3::zeros(),
        };
        let s2 = s.apply(&d, 0.5);
        assert!((s2.pos.x - 0.5).abs() < 1e-12);
        assert!((s2.pos.y - 1.0).abs() < 1e-12);
        assert!((s2.vel.x - 0.25).abs() < 1e-12);
        assert!((s2.att.y - 0.05).abs() < 1e-12);
        assert!((s2.time - 0.5).abs() < 1e-12);
    }
}
