//! Effects pipeline
//!
//! Six creative voice effects, each a pure transform over an `AudioBuffer`,
//! applied in a fixed documented order by the pipeline orchestrator:
//! reverb, filter, vibrato, formant, echo, distortion.

pub mod distortion;
pub mod echo;
pub mod filter;
pub mod formant;
pub mod pipeline;
pub mod reverb;
pub mod util;
pub mod vibrato;

pub use distortion::DistortionParams;
pub use echo::EchoParams;
pub use filter::{FilterMode, FilterParams};
pub use formant::FormantParams;
pub use pipeline::{process, process_with_settings, EffectSettings, Stage};
pub use reverb::ReverbParams;
pub use vibrato::VibratoParams;
