//! Echo stage
//!
//! Delayed, decaying repetition with recursive feedback:
//!
//! ```text
//! y[i] = x[i] + decay * y[i - delay]
//! ```
//!
//! Feeding the output back (rather than summing a single delayed copy of the
//! input) produces the natural train of repeats that each decay further, at
//! no extra memory cost. Samples before the first tap pass through
//! unchanged. If the feedback sum pushes the signal past full scale the
//! whole buffer is normalized back to peak 1.0.

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{Result, VoiceFxError};

/// Echo stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoParams {
    /// Delay between repeats in seconds
    pub delay_secs: f32,
    /// Feedback level: 0 (single pass-through) to 1
    pub decay: f32,
}

impl EchoParams {
    pub fn new(delay_secs: f32, decay: f32) -> Self {
        Self { delay_secs, decay }
    }

    /// Validate all parameters are within range
    pub fn validate(&self) -> Result<()> {
        if !self.delay_secs.is_finite() || self.delay_secs <= 0.0 {
            return Err(VoiceFxError::invalid_parameter(
                "delay_secs",
                self.delay_secs,
                "a positive delay in seconds",
            ));
        }
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(VoiceFxError::invalid_parameter(
                "decay",
                self.decay,
                "0.0 to 1.0",
            ));
        }
        Ok(())
    }
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            delay_secs: 0.2,
            decay: 0.3,
        }
    }
}

/// Apply the echo stage in place
pub fn apply(buffer: &mut AudioBuffer, params: &EchoParams) -> Result<()> {
    params.validate()?;

    let delay_samples = (params.delay_secs * buffer.sample_rate as f32).round() as usize;
    if delay_samples == 0 || delay_samples >= buffer.len() {
        // No tap lands inside the buffer
        return Ok(());
    }

    for channel in &mut buffer.samples {
        for i in delay_samples..channel.len() {
            channel[i] += params.decay * channel[i - delay_samples];
        }
    }

    // Feedback summation can exceed full scale; pull the whole buffer back
    // rather than hard-clipping the repeats.
    let out_peak = buffer.peak();
    if out_peak > 1.0 {
        for channel in &mut buffer.samples {
            for sample in channel.iter_mut() {
                *sample /= out_peak;
            }
        }
    }

    Ok(())
}
