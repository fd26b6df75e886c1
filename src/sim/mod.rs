pub mod integrator;
pub mod runner;

pub use integrator::rk4_step;
pub use runner::{Simulator, TickRecord, DT};
