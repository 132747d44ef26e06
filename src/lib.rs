//! rollscribe - A terminal piano roll over AI-transcribed audio.
//!
//! This library provides the core functionality for the transcription editor.

pub mod analysis;
pub mod app;
pub mod audio;
pub mod geometry;
pub mod transport;
pub mod ui;

// Re-export commonly used types
pub use analysis::{AnalysisResult, HttpTranscriber, Note, NoteId, Transcriber};
pub use app::{App, Tool};
pub use audio::{AudioClock, DecodedAudio};
pub use geometry::Viewport;
pub use transport::{Transport, TransportState};
