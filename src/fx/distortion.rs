//! Distortion stage
//!
//! Hard clipping: every sample is amplified by `gain` and clamped to
//! `[-threshold, threshold]`. Stateless and sample-wise, so the output
//! peak can never exceed the threshold.

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{Result, VoiceFxError};

/// Distortion stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistortionParams {
    /// Input gain, 1.0 or greater
    pub gain: f32,
    /// Clipping threshold in (0, 1]
    pub threshold: f32,
}

impl DistortionParams {
    pub fn new(gain: f32, threshold: f32) -> Self {
        Self { gain, threshold }
    }

    /// Validate all parameters are within range
    pub fn validate(&self) -> Result<()> {
        if !self.gain.is_finite() || self.gain < 1.0 {
            return Err(VoiceFxError::invalid_parameter(
                "gain",
                self.gain,
                "1.0 or greater",
            ));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(VoiceFxError::invalid_parameter(
                "threshold",
                self.threshold,
                "greater than 0.0, at most 1.0",
            ));
        }
        Ok(())
    }
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self {
            gain: 1.5,
            threshold: 0.7,
        }
    }
}

/// Apply the distortion stage in place
pub fn apply(buffer: &mut AudioBuffer, params: &DistortionParams) -> Result<()> {
    params.validate()?;

    for channel in &mut buffer.samples {
        for sample in channel.iter_mut() {
            *sample = (*sample * params.gain).clamp(-params.threshold, params.threshold);
        }
    }

    Ok(())
}
