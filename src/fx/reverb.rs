//! Reverb stage
//!
//! Convolution reverb with a synthetic impulse response: exponentially
//! decaying noise whose length grows with `room_size` and whose decay rate
//! grows with `damping`. The noise source is a seeded PRNG so a run is
//! reproducible when the caller pins the seed; `ReverbParams::new` seeds
//! from the clock for a fresh-sounding tail on every production run.
//!
//! The wet signal is mixed against the dry signal at a fixed ratio and the
//! result is normalized back to the input's peak so convolution gain cannot
//! blow up the buffer.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{Result, VoiceFxError};
use crate::fx::util::convolve;

/// Maximum impulse response length in seconds (at room_size = 1.0)
const MAX_TAIL_SECS: f32 = 1.5;

/// Impulse decay rate in 1/s at damping = 0.0
const DECAY_FLOOR: f32 = 2.0;

/// Additional decay rate in 1/s contributed by damping = 1.0
const DECAY_SCALE: f32 = 18.0;

/// Dry signal level in the output mix
const DRY_MIX: f32 = 0.6;

/// Wet (convolved) signal level in the output mix
const WET_MIX: f32 = 0.4;

/// Reverb stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverbParams {
    /// Room size: 0 (tiny) to 1 (huge hall). Scales the impulse length.
    pub room_size: f32,
    /// Damping: 0 (long, bright tail) to 1 (fast decay)
    pub damping: f32,
    /// PRNG seed for the impulse noise
    #[serde(default = "seed_from_clock")]
    pub seed: u64,
}

impl ReverbParams {
    /// Create parameters with a clock-derived seed
    pub fn new(room_size: f32, damping: f32) -> Self {
        Self {
            room_size,
            damping,
            seed: seed_from_clock(),
        }
    }

    /// Create parameters with an explicit seed (reproducible output)
    pub fn with_seed(room_size: f32, damping: f32, seed: u64) -> Self {
        Self {
            room_size,
            damping,
            seed,
        }
    }

    /// Validate all parameters are within range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.room_size) {
            return Err(VoiceFxError::invalid_parameter(
                "room_size",
                self.room_size,
                "0.0 to 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(VoiceFxError::invalid_parameter(
                "damping",
                self.damping,
                "0.0 to 1.0",
            ));
        }
        Ok(())
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self::new(0.8, 0.3)
    }
}

/// Seed derived from the current time
fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Synthesize a decaying-noise impulse response
fn impulse_response(len: usize, damping: f32, seed: u64, sample_rate: u32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let decay_rate = DECAY_FLOOR + damping * DECAY_SCALE;

    (0..len)
        .map(|n| {
            let t = n as f32 / sample_rate as f32;
            let noise: f32 = rng.random_range(-1.0..=1.0);
            noise * (-decay_rate * t).exp()
        })
        .collect()
}

/// Apply the reverb stage in place
///
/// Stereo channels get decorrelated tails from per-channel seed offsets.
pub fn apply(buffer: &mut AudioBuffer, params: &ReverbParams) -> Result<()> {
    params.validate()?;

    let sample_rate = buffer.sample_rate;
    let ir_len = (params.room_size * sample_rate as f32 * MAX_TAIL_SECS) as usize;
    if ir_len == 0 || buffer.is_empty() {
        // room_size of zero means no reverberant field at all
        return Ok(());
    }

    let input_peak = buffer.peak();

    for (ch, channel) in buffer.samples.iter_mut().enumerate() {
        let impulse = impulse_response(
            ir_len,
            params.damping,
            params.seed.wrapping_add(ch as u64),
            sample_rate,
        );
        let wet = convolve(channel, &impulse);

        for (i, sample) in channel.iter_mut().enumerate() {
            *sample = DRY_MIX * *sample + WET_MIX * wet[i];
        }
    }

    // Convolution can raise the level arbitrarily; pin it back to the
    // input's own peak.
    if input_peak > 0.0 {
        let out_peak = buffer.peak();
        if out_peak > 0.0 {
            let scale = input_peak / out_peak;
            for channel in &mut buffer.samples {
                for sample in channel.iter_mut() {
                    *sample *= scale;
                }
            }
        }
    }

    Ok(())
}
