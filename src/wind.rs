use nalgebra::Vector3;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Deterministic gust model (summed sines)
// ---------------------------------------------------------------------------

/// Pseudo-random wind as a world-frame acceleration, reproduced exactly from
/// simulation time. There is no entropy source; identical intensity and time
/// always yield identical samples.
#[derive(Debug, Clone)]
pub struct Wind {
    intensity: f64,
}

impl Wind {
    pub fn calm() -> Wind {
        Wind { intensity: 0.0 }
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f64) -> Result<(), ConfigError> {
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(ConfigError::InvalidWindIntensity);
        }
        self.intensity = intensity;
        Ok(())
    }

    /// Wind acceleration at simulation time `t`.
    pub fn sample(&self, t: f64) -> Vector3<f64> {
        let w = self.intensity;
        Vector3::new(
            w * (0.5 * (1.7 * t).sin() + 0.5 * (0.3 * t).sin()),
            w * 0.3 * (0.8 * t).sin(),
            w * (0.4 * (1.2 * t).cos() + 0.3 * (2.1 * t).sin()),
        )
    }
}

impl Default for Wind {
    fn default() -> Self {
        Self::calm()
    }
}
