//! VoiceFx - Creative Voice Effects Processor
//!
//! Applies a chain of creative audio effects to a mono or stereo voice
//! recording: reverb, frequency filtering, vibrato, formant shifting, echo,
//! and distortion.
//!
//! # Architecture
//!
//! - `audio`: buffer type and WAV file I/O (the collaborator boundary)
//! - `fx`: the six effect stages and the pipeline orchestrator
//!
//! The pipeline processes a complete in-memory buffer in a single
//! synchronous pass; stages are pure transforms with no I/O and no shared
//! state, so concurrent runs on separate buffers need no locking.

pub mod audio;
pub mod cli;
pub mod error;
pub mod fx;

pub use error::{Result, VoiceFxError};
