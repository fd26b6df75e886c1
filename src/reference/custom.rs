use nalgebra::Vector3;

use crate::error::ConfigError;
use crate::reference::patterns::smoothstep;
use crate::reference::Setpoint;

// ---------------------------------------------------------------------------
// Custom waypoint walker
// ---------------------------------------------------------------------------

/// Nominal tick the walker advances by per query, independent of wall clock.
const NOMINAL_TICK: f64 = 1.0 / 120.0;

/// Constant traversal speed along each segment, m/s.
const TRAVERSAL_SPEED: f64 = 2.0;

/// Piecewise-smoothstep path through user waypoints, cyclic.
///
/// Stateful: the walker carries the current segment index and segment-local
/// time, advancing by a fixed nominal tick on every query.
#[derive(Debug, Clone)]
pub struct CustomWalker {
    waypoints: Vec<Vector3<f64>>,
    segment: usize,
    tau: f64,
}

impl CustomWalker {
    pub fn new() -> CustomWalker {
        CustomWalker { waypoints: Vec::new(), segment: 0, tau: 0.0 }
    }

    pub fn has_path(&self) -> bool {
        self.waypoints.len() >= 2
    }

    /// Replace the path. Progress restarts from the first segment.
    pub fn set_path(&mut self, waypoints: Vec<Vector3<f64>>) -> Result<(), ConfigError> {
        if waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints);
        }
        self.waypoints = waypoints;
        self.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.segment = 0;
        self.tau = 0.0;
    }

    fn segment_duration(&self, idx: usize) -> f64 {
        let n = self.waypoints.len();
        let from = self.waypoints[idx % n];
        let to = self.waypoints[(idx + 1) % n];
        (to - from).norm() / TRAVERSAL_SPEED
    }

    fn position_on(&self, idx: usize, tau: f64) -> Vector3<f64> {
        let n = self.waypoints.len();
        let from = self.waypoints[idx % n];
        let to = self.waypoints[(idx + 1) % n];
        let dur = self.segment_duration(idx);
        if dur <= f64::EPSILON {
            return from;
        }
        from + (to - from) * smoothstep(tau / dur)
    }

    /// Setpoint at the current progress without advancing.
    pub fn current(&self) -> Setpoint {
        if !self.has_path() {
            return Setpoint::default();
        }
        Setpoint {
            pos: self.position_on(self.segment, self.tau),
            vel: Vector3::zeros(),
            yaw: 0.0,
        }
    }

    /// Emit the current setpoint, then advance by one nominal tick,
    /// rolling over to the next segment (cyclic) when it completes.
    pub fn tick(&mut self) -> Setpoint {
        if !self.has_path() {
            return Setpoint::default();
        }
        let out = self.current();

        self.tau += NOMINAL_TICK;
        // Zero-length segments are skipped; bail out after one full lap in
        // case every waypoint coincides.
        let n = self.waypoints.len();
        let mut hops = 0;
        while self.tau >= self.segment_duration(self.segment) {
            self.tau -= self.segment_duration(self.segment);
            self.segment = (self.segment + 1) % n;
            hops += 1;
            if hops > n {
                self.tau = 0.0;
                break;
            }
        }
        out
    }

    /// Pure sample at `path_time` seconds from the path start (cyclic).
    /// Used for previews; does not touch walker progress.
    pub fn sample(&self, path_time: f64) -> Vector3<f64> {
        if !self.has_path() {
            return Vector3::zeros();
        }
        let n = self.waypoints.len();
        let total: f64 = (0..n).map(|i| self.segment_duration(i)).sum();
        if total <= f64::EPSILON {
            return self.waypoints[0];
        }
        let mut t = path_time.rem_euclid(total);
        let mut idx = 0;
        while t >= self.segment_duration(idx) {
            t -= self.segment_duration(idx);
            idx = (idx + 1) % n;
        }
        self.position_on(idx, t)
    }
}

impl Default for CustomWalker {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn line_path() -> Vec<Vector3<f64>> {
        vec![Vector3::new(0.0, 2.0, 0.0), Vector3::new(4.0, 2.0, 0.0)]
    }

    #[test]
    fn needs_two_waypoints() {
        let mut w = CustomWalker::new();
        assert_eq!(w.set_path(vec![Vector3::zeros()]), Err(ConfigError::TooFewWaypoints));
        assert!(!w.has_path());
        assert!(w.set_path(line_path()).is_ok());
    }

    #[test]
    fn starts_at_the_first_waypoint() {
        let mut w = CustomWalker::new();
        w.set_path(line_path()).unwrap();
        let sp = w.tick();
        assert!((sp.pos - Vector3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn walks_the_segment_and_cycles_back() {
        let mut w = CustomWalker::new();
        w.set_path(line_path()).unwrap();
        // Segment length 4 m at 2 m/s: 2 s = 240 ticks each way
        let mut reached_end = false;
        for _ in 0..240 {
            let sp = w.tick();
            if (sp.pos.x - 4.0).abs() < 1e-6 {
                reached_end = true;
            }
        }
        assert!(reached_end || w.current().pos.x > 3.9);
        // After the full out-and-back cycle we are near the start again
        for _ in 0..240 {
            w.tick();
        }
        assert!(w.current().pos.x < 0.1);
    }

    #[test]
    fn interpolation_is_smoothstep() {
        let mut w = CustomWalker::new();
        w.set_path(line_path()).unwrap();
        // Advance to the segment midpoint: 1 s = 120 ticks
        for _ in 0..120 {
            w.tick();
        }
        // smoothstep(0.5) = 0.5 exactly
        assert!((w.current().pos.x - 2.0).abs() < 0.05);
    }

    #[test]
    fn sample_matches_progress_walk() {
        let mut w = CustomWalker::new();
        w.set_path(line_path()).unwrap();
        let direct = w.sample(0.5);
        for _ in 0..60 {
            w.tick();
        }
        assert!((w.current().pos - direct).norm() < 1e-9);
    }

    #[test]
    fn replacing_the_path_restarts_progress() {
        let mut w = CustomWalker::new();
        w.set_path(line_path()).unwrap();
        for _ in 0..100 {
            w.tick();
        }
        w.set_path(line_path()).unwrap();
        assert!((w.current().pos.x).abs() < 1e-12);
    }
}
