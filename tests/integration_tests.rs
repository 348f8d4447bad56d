//! Integration tests for the full effects pipeline
//!
//! Exercises the documented chain end-to-end, including the WAV I/O
//! collaborator boundary.

use pretty_assertions::assert_eq;

use voicefx::audio::{
    export_audio, generate_stereo_test_tone, generate_test_tone, import_audio, AudioBuffer,
    ChannelLayout, ExportFormat,
};
use voicefx::fx::{
    process, process_with_settings, DistortionParams, EchoParams, EffectSettings, FilterMode,
    FilterParams, FormantParams, ReverbParams, Stage, VibratoParams,
};
use voicefx::VoiceFxError;

/// The parameter set from the end-to-end scenario
fn scenario_settings() -> EffectSettings {
    EffectSettings {
        reverb: ReverbParams::with_seed(0.3, 0.5, 20260827),
        filter: FilterParams::new(8000.0, FilterMode::Lowpass),
        vibrato: VibratoParams::new(5.0, 0.002),
        formant: FormantParams::new(1.0),
        echo: EchoParams::new(0.2, 0.4),
        distortion: DistortionParams::new(2.0, 0.8),
    }
}

#[test]
fn full_chain_on_one_second_sine() {
    let mut buffer = generate_test_tone(440.0, 1.0, 44100);
    let input_len = buffer.len();

    process_with_settings(&mut buffer, &scenario_settings()).unwrap();

    assert_eq!(buffer.len(), input_len);
    assert_eq!(buffer.sample_rate, 44100);
    assert_eq!(buffer.channels(), 1);
    assert!(buffer.peak() <= 0.8 + f32::EPSILON, "peak {}", buffer.peak());
    assert!(buffer.rms() > 0.0, "output went silent");
    assert!(buffer.is_finite());
}

#[test]
fn full_chain_stereo() {
    let mut buffer = generate_stereo_test_tone(330.0, 440.0, 0.5, 48000);
    let input_len = buffer.len();

    process_with_settings(&mut buffer, &scenario_settings()).unwrap();

    assert_eq!(buffer.len(), input_len);
    assert_eq!(buffer.channels(), 2);
    // Reverb decorrelates the channels; they must both stay live
    let left = AudioBuffer {
        samples: vec![buffer.samples[0].clone()],
        sample_rate: buffer.sample_rate,
    };
    let right = AudioBuffer {
        samples: vec![buffer.samples[1].clone()],
        sample_rate: buffer.sample_rate,
    };
    assert!(left.rms() > 0.0);
    assert!(right.rms() > 0.0);
}

#[test]
fn empty_buffer_fails_before_any_stage() {
    let mut buffer = AudioBuffer::new(0, ChannelLayout::Mono, 44100);
    let result = process_with_settings(&mut buffer, &scenario_settings());
    assert!(matches!(result, Err(VoiceFxError::EmptyBuffer)));
}

#[test]
fn pipeline_is_deterministic_with_fixed_seed() {
    let settings = scenario_settings();

    let mut a = generate_test_tone(440.0, 0.5, 44100);
    let mut b = generate_test_tone(440.0, 0.5, 44100);
    process_with_settings(&mut a, &settings).unwrap();
    process_with_settings(&mut b, &settings).unwrap();

    assert_eq!(a.samples, b.samples);
}

#[test]
fn two_runs_differ_from_one_run() {
    let settings = scenario_settings();

    let mut once = generate_test_tone(440.0, 0.5, 44100);
    process_with_settings(&mut once, &settings).unwrap();

    let mut twice = once.clone();
    process_with_settings(&mut twice, &settings).unwrap();

    assert_ne!(once.samples, twice.samples);
}

#[test]
fn nyquist_violation_propagates_through_pipeline() {
    let mut buffer = generate_test_tone(440.0, 0.25, 44100);
    let mut settings = scenario_settings();
    settings.filter.cutoff_hz = 22050.0;

    let result = process_with_settings(&mut buffer, &settings);
    match result {
        Err(VoiceFxError::InvalidParameter { param, .. }) => assert_eq!(param, "cutoff_hz"),
        other => panic!("expected InvalidParameter, got {:?}", other),
    }
}

#[test]
fn single_stage_pipeline() {
    // The orchestrator is a fold over the stage list, so a one-stage list
    // must behave exactly like calling the stage directly.
    let params = DistortionParams::new(2.0, 0.5);

    let mut via_pipeline = generate_test_tone(440.0, 0.25, 44100);
    process(&mut via_pipeline, &[Stage::Distortion(params.clone())]).unwrap();

    let mut direct = generate_test_tone(440.0, 0.25, 44100);
    voicefx::fx::distortion::apply(&mut direct, &params).unwrap();

    assert_eq!(via_pipeline.samples, direct.samples);
}

#[test]
fn processed_audio_survives_wav_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("processed.wav");

    let mut buffer = generate_test_tone(440.0, 0.5, 44100);
    process_with_settings(&mut buffer, &scenario_settings()).unwrap();

    export_audio(&buffer, &path, ExportFormat::new(32)).unwrap();
    let reloaded = import_audio(&path).unwrap();

    assert_eq!(reloaded.len(), buffer.len());
    assert_eq!(reloaded.sample_rate, 44100);
    for (orig, imp) in buffer.samples[0].iter().zip(reloaded.samples[0].iter()) {
        assert!((orig - imp).abs() < 1e-6);
    }
}

#[test]
fn cli_run_end_to_end() {
    use clap::Parser;
    use voicefx::cli::{run, Cli};

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.wav");
    let output = dir.path().join("output.wav");

    let tone = generate_test_tone(440.0, 0.5, 44100);
    export_audio(&tone, &input, ExportFormat::new(16)).unwrap();

    let cli = Cli::try_parse_from([
        "voicefx-cli",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--seed",
        "99",
        "--cutoff",
        "8000",
        "--formant-shift",
        "1.0",
    ])
    .unwrap();

    run(cli).unwrap();

    let processed = import_audio(&output).unwrap();
    assert_eq!(processed.len(), tone.len());
    assert!(processed.rms() > 0.0);
}
