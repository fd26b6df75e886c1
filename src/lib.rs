pub mod control;
pub mod error;
pub mod io;
pub mod plant;
pub mod reference;
pub mod sim;
pub mod wind;

// Convenience re-exports for collaborators
pub mod types {
    pub use crate::control::{Algorithm, ControlInput, GainBank, Gains};
    pub use crate::error::ConfigError;
    pub use crate::plant::{Deriv, Params, ParamsBuilder, Plant, State};
    pub use crate::reference::{AxisCommand, Pattern, Reference, Setpoint};
    pub use crate::sim::{Simulator, TickRecord, DT};
    pub use crate::wind::Wind;
}
