use std::io::{self, Write};

use crate::sim::runner::TickRecord;

/// Tracking statistics computed from a run log.
#[derive(Debug, Clone)]
pub struct TrackingSummary {
    pub duration_s: f64,
    pub mean_err_m: f64,
    pub max_err_m: f64,
    pub rms_err_m: f64,
    pub final_err_m: f64,
    pub mean_thrust_n: f64,
    pub saturated_fraction: f64,
}

impl TrackingSummary {
    /// Compute summary statistics from a tick log.
    pub fn from_log(log: &[TickRecord]) -> Self {
        if log.is_empty() {
            return TrackingSummary {
                duration_s: 0.0,
                mean_err_m: 0.0,
                max_err_m: 0.0,
                rms_err_m: 0.0,
                final_err_m: 0.0,
                mean_thrust_n: 0.0,
                saturated_fraction: 0.0,
            };
        }

        let n = log.len() as f64;
        let errs: Vec<f64> = log
            .iter()
            .map(|r| (r.state.pos - r.setpoint.pos).norm())
            .collect();

        let mean_err = errs.iter().sum::<f64>() / n;
        let max_err = errs.iter().cloned().fold(0.0_f64, f64::max);
        let rms_err = (errs.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
        let mean_thrust = log.iter().map(|r| r.input.thrust).sum::<f64>() / n;
        let saturated = log.iter().filter(|r| r.saturated).count() as f64 / n;

        TrackingSummary {
            duration_s: log.last().map(|r| r.state.time).unwrap_or(0.0),
            mean_err_m: mean_err,
            max_err_m: max_err,
            rms_err_m: rms_err,
            final_err_m: *errs.last().unwrap(),
            mean_thrust_n: mean_thrust,
            saturated_fraction: saturated,
        }
    }
}

/// Write a tracking summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    algorithm: &str,
    pattern: &str,
    summary: &TrackingSummary,
) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"run\": {{")?;
    writeln!(writer, "    \"algorithm\": \"{algorithm}\",")?;
    writeln!(writer, "    \"pattern\": \"{pattern}\",")?;
    writeln!(writer, "    \"duration_s\": {:.2}", summary.duration_s)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"tracking\": {{")?;
    writeln!(writer, "    \"mean_err_m\": {:.4},", summary.mean_err_m)?;
    writeln!(writer, "    \"max_err_m\": {:.4},", summary.max_err_m)?;
    writeln!(writer, "    \"rms_err_m\": {:.4},", summary.rms_err_m)?;
    writeln!(writer, "    \"final_err_m\": {:.4},", summary.final_err_m)?;
    writeln!(writer, "    \"mean_thrust_n\": {:.3},", summary.mean_thrust_n)?;
    writeln!(writer, "    \"saturated_fraction\": {:.4}", summary.saturated_fraction)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write a tracking summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    algorithm: &str,
    pattern: &str,
    summary: &TrackingSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, algorithm, pattern, summary)
}
