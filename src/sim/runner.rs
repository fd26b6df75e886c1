use nalgebra::Vector3;

use crate::control::{Algorithm, ControlInput, Controller, GainBank, Gains};
use crate::error::ConfigError;
use crate::plant::{Params, Plant, State};
use crate::reference::{AxisCommand, Pattern, Reference, Setpoint};
use crate::wind::Wind;

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Fixed physics timestep: 120 Hz, independent of wall clock.
pub const DT: f64 = 1.0 / 120.0;

/// One tick of logged telemetry: the post-step state together with the
/// setpoint and input that produced it.
#[derive(Debug, Clone)]
pub struct TickRecord {
    pub state: State,
    pub setpoint: Setpoint,
    pub input: ControlInput,
    pub surfaces: Vector3<f64>,
    pub saturated: bool,
    pub algorithm: Algorithm,
}

/// The simulator bench: owns the plant, the reference generator, the wind
/// environment and the active controller, and drives them in strict
/// per-tick order (reference query → controller → plant step).
///
/// Single-threaded and cooperative: the host issues substeps from its
/// frame callback; pausing is simply not issuing substeps. Runs are
/// bit-exactly reproducible for identical configuration.
#[derive(Debug, Clone)]
pub struct Simulator {
    plant: Plant,
    reference: Reference,
    wind: Wind,
    bank: GainBank,
    controller: Controller,
    setpoint: Setpoint,
    input: ControlInput,
    saturated: bool,
}

impl Simulator {
    pub fn new(params: Params) -> Result<Simulator, ConfigError> {
        params.validate()?;
        let bank = GainBank::default();
        let controller = Controller::new(Algorithm::Pid, &bank);
        Ok(Simulator {
            plant: Plant::new(params),
            reference: Reference::new(),
            wind: Wind::calm(),
            bank,
            controller,
            setpoint: Setpoint::default(),
            input: ControlInput::default(),
            saturated: false,
        })
    }

    /// Episode reset: vehicle back to rest at the origin, controller
    /// internal state zeroed, stateful reference channels restarted.
    /// Pattern, gains and wind intensity persist.
    pub fn reset(&mut self) {
        self.plant.reset();
        self.controller.reset();
        self.reference.reset();
        self.setpoint = Setpoint::default();
        self.input = ControlInput::default();
        self.saturated = false;
    }

    /// Advance one fixed substep and return the new state.
    pub fn step(&mut self) -> &State {
        let t = self.plant.state().time;

        self.setpoint = self.reference.tick(t, DT);
        let setpoint = self.setpoint;
        self.input = self.controller.control(
            self.plant.state(),
            &setpoint,
            &self.reference,
            self.plant.params(),
            DT,
        );
        let wind = self.wind.sample(t);
        self.saturated = self.plant.step(&self.input, &wind, DT);
        self.plant.state()
    }

    /// Issue `substeps` substeps, realizing a time-scaling factor.
    pub fn advance(&mut self, substeps: usize) {
        for _ in 0..substeps {
            self.step();
        }
    }

    /// Run for `duration_s` seconds collecting one record per tick.
    pub fn run(&mut self, duration_s: f64) -> Vec<TickRecord> {
        let steps = (duration_s / DT).round() as usize;
        let mut log = Vec::with_capacity(steps);
        for _ in 0..steps {
            self.step();
            log.push(TickRecord {
                state: self.plant.state().clone(),
                setpoint: self.setpoint,
                input: self.input,
                surfaces: self.controller.surfaces(),
                saturated: self.saturated,
                algorithm: self.controller.algorithm(),
            });
        }
        log
    }

    // -- configuration ------------------------------------------------------

    /// Switch the control law. The incoming controller starts from the
    /// gains stored for it and from zeroed internal state.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        if algorithm != self.controller.algorithm() {
            self.controller = Controller::new(algorithm, &self.bank);
        }
    }

    /// Store a validated gain set for its algorithm; the live controller
    /// picks it up immediately when it matches.
    pub fn set_gains(&mut self, gains: Gains) -> Result<(), ConfigError> {
        gains.validate()?;
        if gains.algorithm() == self.controller.algorithm() {
            self.controller.apply_gains(&gains);
        }
        self.bank.store(gains);
        Ok(())
    }

    pub fn set_pattern(&mut self, pattern: Pattern) -> Result<(), ConfigError> {
        self.reference.set_pattern(pattern)
    }

    pub fn set_wind_intensity(&mut self, intensity: f64) -> Result<(), ConfigError> {
        self.wind.set_intensity(intensity)
    }

    pub fn set_axes(&mut self, axes: AxisCommand) {
        self.reference.set_axes(axes);
    }

    pub fn set_waypoints(&mut self, waypoints: Vec<Vector3<f64>>) -> Result<(), ConfigError> {
        self.reference.set_waypoints(waypoints)
    }

    // -- telemetry ----------------------------------------------------------

    pub fn state(&self) -> &State {
        self.plant.state()
    }

    pub fn params(&self) -> &Params {
        self.plant.params()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.controller.algorithm()
    }

    pub fn pattern(&self) -> Pattern {
        self.reference.pattern()
    }

    pub fn wind_intensity(&self) -> f64 {
        self.wind.intensity()
    }

    pub fn setpoint(&self) -> Setpoint {
        self.setpoint
    }

    pub fn control_output(&self) -> ControlInput {
        self.input
    }

    pub fn sliding_surfaces(&self) -> Vector3<f64> {
        self.controller.surfaces()
    }

    pub fn mpc_horizon(&self) -> &[Vector3<f64>] {
        self.controller.horizon()
    }

    pub fn motor_saturated(&self) -> bool {
        self.saturated
    }

    /// Sample a pattern's desired path for drawing.
    pub fn preview_pattern(&self, pattern: &Pattern, n: usize, horizon_s: f64) -> Vec<Vector3<f64>> {
        self.reference.preview(pattern, n, horizon_s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
