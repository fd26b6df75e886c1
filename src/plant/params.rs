use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Plant parameters (immutable for a run)
// ---------------------------------------------------------------------------

/// Physical parameters of the vehicle, fixed for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    pub mass: f64,        // kg
    pub gravity: f64,     // m/s^2
    pub ixx: f64,         // kg·m^2
    pub iyy: f64,         // kg·m^2
    pub izz: f64,         // kg·m^2
    pub arm_len: f64,     // m, centre to motor
    pub k_thrust: f64,    // N/(rad/s)^2, rotor thrust coefficient
    pub k_drag: f64,      // N·m/(rad/s)^2, rotor drag (yaw) coefficient
    pub c_drag: f64,      // 1/s, translational drag
    pub motor_max: f64,   // rad/s, rotor speed ceiling
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mass: 0.5,
            gravity: 9.81,
            ixx: 0.0023,
            iyy: 0.0023,
            izz: 0.004,
            arm_len: 0.17,
            k_thrust: 2.98e-6,
            k_drag: 1.14e-7,
            c_drag: 0.04,
            motor_max: 2200.0,
        }
    }
}

impl Params {
    /// Hover thrust: the total thrust that balances weight.
    pub fn hover_thrust(&self) -> f64 {
        self.mass * self.gravity
    }

    /// Thrust ceiling used by the cascade (4x hover weight).
    pub fn max_thrust(&self) -> f64 {
        4.0 * self.mass * self.gravity
    }

    /// Reject non-finite or non-positive parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, f64); 10] = [
            ("mass", self.mass),
            ("gravity", self.gravity),
            ("ixx", self.ixx),
            ("iyy", self.iyy),
            ("izz", self.izz),
            ("arm_len", self.arm_len),
            ("k_thrust", self.k_thrust),
            ("k_drag", self.k_drag),
            ("c_drag", self.c_drag),
            ("motor_max", self.motor_max),
        ];
        for (name, v) in checks {
            // c_drag may be zero (drag-free plant); everything else must be > 0
            let ok = v.is_finite() && if name == "c_drag" { v >= 0.0 } else { v > 0.0 };
            if !ok {
                return Err(ConfigError::InvalidParameter(name));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Params builder
// ---------------------------------------------------------------------------

pub struct ParamsBuilder {
    params: Params,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self { params: Params::default() }
    }

    pub fn mass(mut self, v: f64) -> Self { self.params.mass = v; self }
    pub fn gravity(mut self, v: f64) -> Self { self.params.gravity = v; self }
    pub fn inertia(mut self, ixx: f64, iyy: f64, izz: f64) -> Self {
        self.params.ixx = ixx;
        self.params.iyy = iyy;
        self.params.izz = izz;
        self
    }
    pub fn arm_len(mut self, v: f64) -> Self { self.params.arm_len = v; self }
    pub fn k_thrust(mut self, v: f64) -> Self { self.params.k_thrust = v; self }
    pub fn k_drag(mut self, v: f64) -> Self { self.params.k_drag = v; self }
    pub fn c_drag(mut self, v: f64) -> Self { self.params.c_drag = v; self }
    pub fn motor_max(mut self, v: f64) -> Self { self.params.motor_max = v; self }

    pub fn build(self) -> Result<Params, ConfigError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn builder_rejects_bad_mass() {
        let r = ParamsBuilder::new().mass(-1.0).build();
        assert_eq!(r.unwrap_err(), ConfigError::InvalidParameter("mass"));
    }

    #[test]
    fn zero_translational_drag_is_allowed() {
        assert!(ParamsBuilder::new().c_drag(0.0).build().is_ok());
    }

    #[test]
    fn hover_thrust_balances_weight() {
        let p = Params::default();
        assert!((p.hover_thrust() - 0.5 * 9.81).abs() < 1e-12);
        assert!((p.max_thrust() - 4.0 * p.hover_thrust()).abs() < 1e-12);
    }
}
