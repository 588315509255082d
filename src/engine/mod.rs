//! Audio engine: sample buffers and file I/O

pub mod buffer;
pub mod io;

pub use buffer::{db_to_linear, linear_to_db, AudioBuffer};
pub use io::{export_audio, generate_test_tone, import_audio, ExportFormat};
