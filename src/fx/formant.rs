//! Formant shift stage
//!
//! Shifts the spectral envelope by resampling the signal at a constant rate
//! ratio and keeping the original duration. Reading faster (`shift > 1`)
//! compresses the spectrum upward for a brighter, smaller-sounding voice;
//! reading slower (`shift < 1`) deepens it. Reads past the end are padded
//! with silence and material beyond the original duration is truncated, so
//! the buffer length never changes.
//!
//! `shift == 1.0` is an exact identity (the buffer is left untouched).

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{Result, VoiceFxError};

/// Formant stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormantParams {
    /// Resampling ratio: > 1 raises formants, < 1 lowers them
    pub shift: f32,
}

impl FormantParams {
    pub fn new(shift: f32) -> Self {
        Self { shift }
    }

    /// Validate all parameters are within range
    pub fn validate(&self) -> Result<()> {
        if !self.shift.is_finite() || self.shift <= 0.0 {
            return Err(VoiceFxError::invalid_parameter(
                "shift",
                self.shift,
                "a positive resampling ratio",
            ));
        }
        Ok(())
    }
}

impl Default for FormantParams {
    fn default() -> Self {
        Self { shift: 1.1 }
    }
}

/// Apply the formant shift stage in place
pub fn apply(buffer: &mut AudioBuffer, params: &FormantParams) -> Result<()> {
    params.validate()?;

    if params.shift == 1.0 {
        return Ok(());
    }

    for channel in &mut buffer.samples {
        let source = channel.clone();
        let max_index = source.len().saturating_sub(1) as f32;

        for (i, sample) in channel.iter_mut().enumerate() {
            let pos = i as f32 * params.shift;
            *sample = if pos > max_index {
                // Past the end of the resampled material
                0.0
            } else {
                let base = pos.floor() as usize;
                let frac = pos - base as f32;
                if base + 1 < source.len() {
                    source[base] * (1.0 - frac) + source[base + 1] * frac
                } else {
                    source[base]
                }
            };
        }
    }

    Ok(())
}
