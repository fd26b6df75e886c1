use thiserror::Error;

// ---------------------------------------------------------------------------
// Boundary errors
// ---------------------------------------------------------------------------

/// Configuration errors rejected at the simulator boundary.
///
/// A rejected setter leaves the previously valid configuration in place.
/// Numeric saturation inside the control loop (thrust clamp, attitude clamp,
/// motor clamp, integrator anti-windup) is feedback, not an error, and is
/// never reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Algorithm id not in the catalogue (`pid`, `smc`, `sts`, `mpc`).
    #[error("unknown control algorithm `{0}`")]
    UnknownAlgorithm(String),

    /// Pattern id not in the catalogue.
    #[error("unknown trajectory pattern `{0}`")]
    UnknownPattern(String),

    /// A gain is non-finite or outside its admissible range.
    #[error("gain `{0}` is non-finite or out of range")]
    InvalidGain(&'static str),

    /// A plant parameter is non-finite or non-positive.
    #[error("parameter `{0}` must be positive and finite")]
    InvalidParameter(&'static str),

    /// Wind intensity must be finite and non-negative.
    #[error("wind intensity must be non-negative and finite")]
    InvalidWindIntensity,

    /// A custom trajectory needs at least two waypoints.
    #[error("custom trajectory needs at least two waypoints")]
    TooFewWaypoints,
}
