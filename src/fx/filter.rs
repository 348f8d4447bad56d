//! Frequency filter stage
//!
//! Butterworth-class spectral shaping built from RBJ cookbook biquads.
//! Two identical sections are cascaded for a steeper (4th-order) rolloff.
//! Filtering is standard causal forward filtering, not zero-phase; the
//! slight phase shift is inaudible for this kind of creative processing.
//!
//! For bandpass, the cutoff is the upper band edge and the lower edge sits
//! one octave down, so a 1 kHz bandpass keeps roughly 500 Hz to 1 kHz.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

use crate::audio::AudioBuffer;
use crate::error::{Result, VoiceFxError};

/// Number of cascaded biquad sections
const NUM_SECTIONS: usize = 2;

/// Filter response type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Remove content above the cutoff
    #[default]
    Lowpass,
    /// Remove content below the cutoff
    Highpass,
    /// Keep the octave below the cutoff
    Bandpass,
}

impl FilterMode {
    /// Get string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Lowpass => "lowpass",
            FilterMode::Highpass => "highpass",
            FilterMode::Bandpass => "bandpass",
        }
    }
}

impl FromStr for FilterMode {
    type Err = VoiceFxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lowpass" | "low" => Ok(FilterMode::Lowpass),
            "highpass" | "high" => Ok(FilterMode::Highpass),
            "bandpass" | "band" => Ok(FilterMode::Bandpass),
            other => Err(VoiceFxError::invalid_parameter(
                "filter_mode",
                other,
                "lowpass, highpass, or bandpass",
            )),
        }
    }
}

/// Filter stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterParams {
    /// Cutoff frequency in Hz (band upper edge for bandpass)
    pub cutoff_hz: f32,
    /// Response type
    pub mode: FilterMode,
}

impl FilterParams {
    pub fn new(cutoff_hz: f32, mode: FilterMode) -> Self {
        Self { cutoff_hz, mode }
    }

    /// Validate the cutoff against the Nyquist limit for `sample_rate`
    ///
    /// A cutoff at or above Nyquist would alias instead of filtering, so it
    /// is rejected rather than clamped.
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        let nyquist = sample_rate as f32 / 2.0;
        if !self.cutoff_hz.is_finite() || self.cutoff_hz <= 0.0 || self.cutoff_hz >= nyquist {
            return Err(VoiceFxError::invalid_parameter(
                "cutoff_hz",
                self.cutoff_hz,
                format!("0 < cutoff < {} (Nyquist)", nyquist),
            ));
        }
        Ok(())
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            cutoff_hz: 1000.0,
            mode: FilterMode::Lowpass,
        }
    }
}

/// Biquad filter coefficients
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    /// Calculate coefficients using Audio EQ Cookbook formulas
    /// Reference: https://www.w3.org/2011/audio/audio-eq-cookbook.html
    fn calculate(mode: FilterMode, sample_rate: f64, cutoff_hz: f64) -> Self {
        // Bandpass: place the center between the band edges [cutoff/2, cutoff]
        // and set Q for a one-octave bandwidth.
        let (freq, q) = match mode {
            FilterMode::Bandpass => (cutoff_hz * std::f64::consts::FRAC_1_SQRT_2, 2.0_f64.sqrt()),
            _ => (cutoff_hz, std::f64::consts::FRAC_1_SQRT_2),
        };

        let w0 = 2.0 * PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * q);

        let (b0, b1, b2, a0, a1, a2) = match mode {
            FilterMode::Lowpass => (
                (1.0 - cos_w0) / 2.0,
                1.0 - cos_w0,
                (1.0 - cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            FilterMode::Highpass => (
                (1.0 + cos_w0) / 2.0,
                -(1.0 + cos_w0),
                (1.0 + cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            FilterMode::Bandpass => {
                // Constant 0 dB peak gain bandpass
                (
                    alpha,
                    0.0,
                    -alpha,
                    1.0 + alpha,
                    -2.0 * cos_w0,
                    1.0 - alpha,
                )
            }
        };

        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Biquad filter state for one channel
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    /// Process a single sample, Direct Form I
    fn process(&mut self, input: f64, coeffs: &BiquadCoeffs) -> f64 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

/// Apply the filter stage in place
pub fn apply(buffer: &mut AudioBuffer, params: &FilterParams) -> Result<()> {
    params.validate(buffer.sample_rate)?;

    let coeffs = BiquadCoeffs::calculate(
        params.mode,
        buffer.sample_rate as f64,
        params.cutoff_hz as f64,
    );

    for channel in &mut buffer.samples {
        // Fresh state per section and per channel
        for _ in 0..NUM_SECTIONS {
            let mut state = BiquadState::default();
            for sample in channel.iter_mut() {
                *sample = state.process(*sample as f64, &coeffs) as f32;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{generate_test_tone, AudioBuffer, ChannelLayout};

    /// Mix of a low and a high sine for spectral assertions
    fn two_tone(low_hz: f32, high_hz: f32, sample_rate: u32) -> AudioBuffer {
        let num_samples = sample_rate as usize / 2;
        let mut buffer = AudioBuffer::new(num_samples, ChannelLayout::Mono, sample_rate);
        let w_low = 2.0 * std::f32::consts::PI * low_hz / sample_rate as f32;
        let w_high = 2.0 * std::f32::consts::PI * high_hz / sample_rate as f32;
        for (i, sample) in buffer.samples[0].iter_mut().enumerate() {
            *sample = 0.5 * (w_low * i as f32).sin() + 0.5 * (w_high * i as f32).sin();
        }
        buffer
    }

    #[test]
    fn test_filter_mode_from_str() {
        assert_eq!("lowpass".parse::<FilterMode>().unwrap(), FilterMode::Lowpass);
        assert_eq!("HIGH".parse::<FilterMode>().unwrap(), FilterMode::Highpass);
        assert_eq!("bandpass".parse::<FilterMode>().unwrap(), FilterMode::Bandpass);
        assert!("notch".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_cutoff_at_nyquist_rejected() {
        let mut buffer = generate_test_tone(440.0, 0.1, 44100);
        let params = FilterParams::new(22050.0, FilterMode::Lowpass);
        let result = apply(&mut buffer, &params);
        assert!(matches!(
            result,
            Err(VoiceFxError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_cutoff_zero_rejected() {
        let mut buffer = generate_test_tone(440.0, 0.1, 44100);
        assert!(apply(&mut buffer, &FilterParams::new(0.0, FilterMode::Lowpass)).is_err());
        assert!(apply(&mut buffer, &FilterParams::new(-100.0, FilterMode::Highpass)).is_err());
    }

    #[test]
    fn test_preserves_length() {
        let mut buffer = generate_test_tone(440.0, 0.25, 44100);
        let len = buffer.len();
        apply(&mut buffer, &FilterParams::new(8000.0, FilterMode::Lowpass)).unwrap();
        assert_eq!(buffer.len(), len);
    }

    #[test]
    fn test_lowpass_attenuates_high_band() {
        let mut buffer = two_tone(200.0, 8000.0, 44100);
        let rms_before = buffer.rms();
        apply(&mut buffer, &FilterParams::new(1000.0, FilterMode::Lowpass)).unwrap();

        // The 8 kHz component carries half the energy; removing it should
        // drop RMS noticeably while keeping the 200 Hz component.
        let rms_after = buffer.rms();
        assert!(rms_after < rms_before);
        assert!(rms_after > 0.2 * rms_before);
    }

    #[test]
    fn test_highpass_attenuates_low_band() {
        let mut low_only = generate_test_tone(100.0, 0.5, 44100);
        apply(
            &mut low_only,
            &FilterParams::new(4000.0, FilterMode::Highpass),
        )
        .unwrap();

        // A 100 Hz tone far below a 4 kHz highpass should nearly vanish
        assert!(low_only.rms() < 0.05);
    }

    #[test]
    fn test_bandpass_keeps_in_band_tone() {
        // 750 Hz sits inside the [500, 1000] Hz band of a 1 kHz bandpass
        let mut in_band = generate_test_tone(750.0, 0.5, 44100);
        apply(
            &mut in_band,
            &FilterParams::new(1000.0, FilterMode::Bandpass),
        )
        .unwrap();
        let in_band_rms = in_band.rms();

        let mut out_of_band = generate_test_tone(8000.0, 0.5, 44100);
        apply(
            &mut out_of_band,
            &FilterParams::new(1000.0, FilterMode::Bandpass),
        )
        .unwrap();

        assert!(in_band_rms > 5.0 * out_of_band.rms());
    }

    #[test]
    fn test_deterministic() {
        let params = FilterParams::new(2000.0, FilterMode::Lowpass);
        let mut a = generate_test_tone(440.0, 0.2, 44100);
        let mut b = generate_test_tone(440.0, 0.2, 44100);
        apply(&mut a, &params).unwrap();
        apply(&mut b, &params).unwrap();
        assert_eq!(a.samples, b.samples);
    }
}
