//! Command-line collaborator
//!
//! Thin presentation layer over the pipeline: decodes a WAV file, runs the
//! full effect chain with parameters from a JSON settings file and/or
//! flags, and writes the processed WAV. Flags override the settings file,
//! which overrides the built-in defaults.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::audio::{export_audio, import_audio, ExportFormat};
use crate::error::Result;
use crate::fx::{process_with_settings, EffectSettings, FilterMode};

#[derive(Parser, Debug)]
#[command(
    name = "voicefx-cli",
    version,
    about = "Apply reverb, filtering, vibrato, formant shift, echo, and distortion to a voice recording"
)]
pub struct Cli {
    /// Input WAV file
    pub input: PathBuf,

    /// Output WAV file
    pub output: PathBuf,

    /// JSON settings file; individual flags below override its values
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Reverb room size (0.0 to 1.0)
    #[arg(long)]
    pub room_size: Option<f32>,

    /// Reverb damping (0.0 to 1.0)
    #[arg(long)]
    pub damping: Option<f32>,

    /// Reverb noise seed; omit for a clock-derived seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Filter cutoff frequency in Hz
    #[arg(long)]
    pub cutoff: Option<f32>,

    /// Filter mode: lowpass, highpass, or bandpass
    #[arg(long)]
    pub filter_mode: Option<FilterMode>,

    /// Vibrato rate in Hz
    #[arg(long)]
    pub vibrato_rate: Option<f32>,

    /// Vibrato depth (peak displacement in seconds)
    #[arg(long)]
    pub vibrato_depth: Option<f32>,

    /// Formant shift factor (>1 raises, <1 lowers)
    #[arg(long)]
    pub formant_shift: Option<f32>,

    /// Echo delay in seconds
    #[arg(long)]
    pub echo_delay: Option<f32>,

    /// Echo decay (0.0 to 1.0)
    #[arg(long)]
    pub echo_decay: Option<f32>,

    /// Distortion input gain (1.0 or greater)
    #[arg(long)]
    pub gain: Option<f32>,

    /// Distortion clipping threshold (0.0 to 1.0)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output bit depth: 16, 24, or 32 (float)
    #[arg(long, default_value_t = 16)]
    pub bit_depth: u16,
}

impl Cli {
    /// Resolve the effective settings from file and flag overrides
    pub fn effect_settings(&self) -> Result<EffectSettings> {
        let mut settings = match &self.settings {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => EffectSettings::default(),
        };

        if let Some(v) = self.room_size {
            settings.reverb.room_size = v;
        }
        if let Some(v) = self.damping {
            settings.reverb.damping = v;
        }
        if let Some(v) = self.seed {
            settings.reverb.seed = v;
        }
        if let Some(v) = self.cutoff {
            settings.filter.cutoff_hz = v;
        }
        if let Some(v) = self.filter_mode {
            settings.filter.mode = v;
        }
        if let Some(v) = self.vibrato_rate {
            settings.vibrato.rate_hz = v;
        }
        if let Some(v) = self.vibrato_depth {
            settings.vibrato.depth = v;
        }
        if let Some(v) = self.formant_shift {
            settings.formant.shift = v;
        }
        if let Some(v) = self.echo_delay {
            settings.echo.delay_secs = v;
        }
        if let Some(v) = self.echo_decay {
            settings.echo.decay = v;
        }
        if let Some(v) = self.gain {
            settings.distortion.gain = v;
        }
        if let Some(v) = self.threshold {
            settings.distortion.threshold = v;
        }

        Ok(settings)
    }
}

/// Execute a full load-process-save run
pub fn run(cli: Cli) -> Result<()> {
    let settings = cli.effect_settings()?;

    let mut buffer = import_audio(&cli.input)?;
    info!(
        "loaded {} ({:.2}s, {} channel(s) at {} Hz)",
        cli.input.display(),
        buffer.duration_secs(),
        buffer.channels(),
        buffer.sample_rate
    );

    process_with_settings(&mut buffer, &settings)?;

    export_audio(&buffer, &cli.output, ExportFormat::new(cli.bit_depth))?;
    info!("wrote {}", cli.output.display());

    Ok(())
}
