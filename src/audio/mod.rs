//! Audio decode, clock, and playback.
//!
//! Decoding is treated as a black box behind rodio's decoder; playback goes
//! through a single seekable handle on the output stream. The transport
//! derives its position from a clock abstraction so the timing logic can be
//! tested without an audio device.

pub mod clock;
pub mod player;

pub use clock::{AudioClock, SystemClock};
pub use player::{AudioOutput, DecodedAudio, PlaybackHandle};
