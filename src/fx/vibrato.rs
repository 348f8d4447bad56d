//! Vibrato stage
//!
//! Periodic pitch modulation: each output sample is read from a fractional
//! input position displaced by a low-frequency sine. Fractional positions
//! are linearly interpolated and clamped at the buffer edges, so the output
//! has exactly the input's length.

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{Result, VoiceFxError};
use crate::fx::util::read_interpolated;

/// Vibrato stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibratoParams {
    /// Modulation rate in Hz
    pub rate_hz: f32,
    /// Peak time displacement in seconds
    pub depth: f32,
}

impl VibratoParams {
    pub fn new(rate_hz: f32, depth: f32) -> Self {
        Self { rate_hz, depth }
    }

    /// Validate all parameters are within range
    pub fn validate(&self) -> Result<()> {
        if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 {
            return Err(VoiceFxError::invalid_parameter(
                "rate_hz",
                self.rate_hz,
                "a positive frequency in Hz",
            ));
        }
        if !self.depth.is_finite() || self.depth < 0.0 {
            return Err(VoiceFxError::invalid_parameter(
                "depth",
                self.depth,
                "a non-negative displacement in seconds",
            ));
        }
        Ok(())
    }
}

impl Default for VibratoParams {
    fn default() -> Self {
        Self {
            rate_hz: 6.0,
            depth: 0.003,
        }
    }
}

/// Apply the vibrato stage in place
pub fn apply(buffer: &mut AudioBuffer, params: &VibratoParams) -> Result<()> {
    params.validate()?;

    let sample_rate = buffer.sample_rate as f32;
    let depth_samples = params.depth * sample_rate;
    let phase_step = 2.0 * std::f32::consts::PI * params.rate_hz / sample_rate;

    for channel in &mut buffer.samples {
        let source = channel.clone();
        for (i, sample) in channel.iter_mut().enumerate() {
            let offset = depth_samples * (phase_step * i as f32).sin();
            *sample = read_interpolated(&source, i as f32 - offset);
        }
    }

    Ok(())
}
