//! Pipeline orchestrator
//!
//! The pipeline is an explicit ordered list of stage descriptors; processing
//! is a fold over that list. `EffectSettings` is the full parameter record a
//! collaborator (CLI, UI) supplies for one run and expands to the documented
//! stage order: reverb, filter, vibrato, formant, echo, distortion.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{Result, VoiceFxError};
use crate::fx::{distortion, echo, filter, formant, reverb, vibrato};
use crate::fx::{
    DistortionParams, EchoParams, FilterParams, FormantParams, ReverbParams, VibratoParams,
};

/// A single pipeline stage with its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    Reverb(ReverbParams),
    Filter(FilterParams),
    Vibrato(VibratoParams),
    Formant(FormantParams),
    Echo(EchoParams),
    Distortion(DistortionParams),
}

impl Stage {
    /// Stage name for logs and error context
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Reverb(_) => "reverb",
            Stage::Filter(_) => "filter",
            Stage::Vibrato(_) => "vibrato",
            Stage::Formant(_) => "formant",
            Stage::Echo(_) => "echo",
            Stage::Distortion(_) => "distortion",
        }
    }

    /// Apply this stage to the buffer
    pub fn apply(&self, buffer: &mut AudioBuffer) -> Result<()> {
        match self {
            Stage::Reverb(params) => reverb::apply(buffer, params),
            Stage::Filter(params) => filter::apply(buffer, params),
            Stage::Vibrato(params) => vibrato::apply(buffer, params),
            Stage::Formant(params) => formant::apply(buffer, params),
            Stage::Echo(params) => echo::apply(buffer, params),
            Stage::Distortion(params) => distortion::apply(buffer, params),
        }
    }
}

/// Full parameter record for one pipeline run
///
/// Defaults follow the interactive collaborator's slider defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    pub reverb: ReverbParams,
    pub filter: FilterParams,
    pub vibrato: VibratoParams,
    pub formant: FormantParams,
    pub echo: EchoParams,
    pub distortion: DistortionParams,
}

impl EffectSettings {
    /// Expand to the fixed stage order
    pub fn to_stages(&self) -> Vec<Stage> {
        vec![
            Stage::Reverb(self.reverb.clone()),
            Stage::Filter(self.filter.clone()),
            Stage::Vibrato(self.vibrato.clone()),
            Stage::Formant(self.formant.clone()),
            Stage::Echo(self.echo.clone()),
            Stage::Distortion(self.distortion.clone()),
        ]
    }
}

/// Run the pipeline over the buffer, stage by stage
///
/// Fails fast: the first stage error is returned and the buffer is left in
/// whatever state the completed stages produced; callers must not use it
/// after an error. An empty buffer is rejected before any stage runs.
pub fn process(buffer: &mut AudioBuffer, stages: &[Stage]) -> Result<()> {
    if buffer.is_empty() {
        return Err(VoiceFxError::EmptyBuffer);
    }

    for stage in stages {
        debug!(
            "applying {} to {} samples at {} Hz",
            stage.name(),
            buffer.len(),
            buffer.sample_rate
        );
        stage.apply(buffer)?;
    }

    Ok(())
}

/// Run the full documented chain with the given settings
pub fn process_with_settings(buffer: &mut AudioBuffer, settings: &EffectSettings) -> Result<()> {
    process(buffer, &settings.to_stages())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{generate_test_tone, AudioBuffer, ChannelLayout};
    use crate::fx::FilterMode;

    fn fixed_settings() -> EffectSettings {
        EffectSettings {
            reverb: ReverbParams::with_seed(0.3, 0.5, 42),
            filter: FilterParams::new(8000.0, FilterMode::Lowpass),
            vibrato: VibratoParams::new(5.0, 0.002),
            formant: FormantParams::new(1.0),
            echo: EchoParams::new(0.2, 0.4),
            distortion: DistortionParams::new(2.0, 0.8),
        }
    }

    #[test]
    fn test_empty_buffer_rejected_before_stages() {
        let mut buffer = AudioBuffer::new(0, ChannelLayout::Mono, 44100);
        // Even an invalid stage parameter must not be reached
        let stages = [Stage::Filter(FilterParams::new(-1.0, FilterMode::Lowpass))];
        let result = process(&mut buffer, &stages);
        assert!(matches!(result, Err(VoiceFxError::EmptyBuffer)));
    }

    #[test]
    fn test_fails_fast_on_first_invalid_stage() {
        let mut buffer = generate_test_tone(440.0, 0.1, 44100);
        let original = buffer.samples.clone();
        let stages = [
            Stage::Filter(FilterParams::new(44100.0, FilterMode::Lowpass)),
            Stage::Distortion(DistortionParams::new(2.0, 0.8)),
        ];
        let result = process(&mut buffer, &stages);
        assert!(matches!(
            result,
            Err(VoiceFxError::InvalidParameter { .. })
        ));
        // First stage failed validation before touching the buffer
        assert_eq!(buffer.samples, original);
    }

    #[test]
    fn test_stage_order() {
        let stages = fixed_settings().to_stages();
        let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["reverb", "filter", "vibrato", "formant", "echo", "distortion"]
        );
    }

    #[test]
    fn test_full_chain_end_to_end() {
        // 1s 440 Hz sine at 44.1 kHz
        let mut buffer = generate_test_tone(440.0, 1.0, 44100);
        let len = buffer.len();

        process_with_settings(&mut buffer, &fixed_settings()).unwrap();

        assert_eq!(buffer.len(), len);
        assert_eq!(buffer.sample_rate, 44100);
        assert!(buffer.peak() <= 0.8 + f32::EPSILON);
        assert!(buffer.rms() > 0.0);
        assert!(buffer.is_finite());
    }

    #[test]
    fn test_chain_is_not_idempotent() {
        let settings = fixed_settings();

        let mut once = generate_test_tone(440.0, 0.5, 44100);
        process_with_settings(&mut once, &settings).unwrap();

        let mut twice = generate_test_tone(440.0, 0.5, 44100);
        process_with_settings(&mut twice, &settings).unwrap();
        process_with_settings(&mut twice, &settings).unwrap();

        assert_ne!(once.samples, twice.samples);
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = fixed_settings();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: EffectSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.reverb.seed, 42);
        assert_eq!(parsed.filter.mode, FilterMode::Lowpass);
        assert_eq!(parsed.echo.delay_secs, 0.2);
    }

    #[test]
    fn test_partial_settings_json_uses_defaults() {
        let parsed: EffectSettings =
            serde_json::from_str(r#"{"distortion": {"gain": 3.0, "threshold": 0.5}}"#).unwrap();
        assert_eq!(parsed.distortion.gain, 3.0);
        assert_eq!(parsed.filter.cutoff_hz, FilterParams::default().cutoff_hz);
    }

    #[test]
    fn test_stereo_chain_preserves_channels() {
        let mut buffer = crate::audio::generate_stereo_test_tone(440.0, 660.0, 0.25, 48000);
        process_with_settings(&mut buffer, &fixed_settings()).unwrap();
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.sample_rate, 48000);
    }
}
