//! Audio buffer types and WAV file I/O

pub mod buffer;
pub mod io;

pub use buffer::{db_to_linear, linear_to_db, AudioBuffer, ChannelLayout};
pub use io::{export_audio, generate_stereo_test_tone, generate_test_tone, import_audio, ExportFormat};
