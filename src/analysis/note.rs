//! Transcribed note representation.
//!
//! A note is one discrete pitch event recovered from the audio by the
//! transcription service, with timing in seconds and a 0.0-1.0 intensity.

use super::{PITCH_MAX, PITCH_MIN};
use crate::geometry::{clamp_pitch, clamp_time};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique note IDs.
/// Using atomic for thread-safety in case of parallel operations.
static NOTE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a note within an analysis result.
///
/// Ids are assigned locally when a transcription is received and stay stable
/// across edits; identifiers from the service itself are never trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(u64);

impl NoteId {
    /// Generates a new unique note ID.
    ///
    /// Thread-safe: uses atomic increment internally.
    pub fn new() -> Self {
        Self(NOTE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value (for debugging).
    #[allow(dead_code)]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

/// A single transcribed note with timing and dynamics.
///
/// Pitch is restricted to the piano range 21-108 (A0-C8); times are in
/// seconds from the start of the clip. The `selected` flag is derived state
/// owned by the selection model and recomputed wholesale on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note instance.
    pub id: NoteId,

    /// MIDI pitch number (21-108). 60 = Middle C (C4).
    pub pitch: u8,

    /// Start time in seconds from the beginning of the clip.
    pub start_time: f64,

    /// Duration in seconds. Always positive.
    pub duration: f64,

    /// Intensity (0.0-1.0). 0.0 is silent, 1.0 is maximum.
    pub intensity: f64,

    /// Whether this note is currently selected.
    pub selected: bool,
}

impl Note {
    /// Creates a new note with a fresh unique ID.
    ///
    /// Pitch is clamped into 21-108, start time into >= 0 and intensity
    /// into 0.0-1.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollscribe::analysis::Note;
    ///
    /// // Middle C for half a second, starting two seconds in
    /// let note = Note::new(60, 2.0, 0.5, 0.8);
    /// assert_eq!(note.pitch, 60);
    /// ```
    pub fn new(pitch: i32, start_time: f64, duration: f64, intensity: f64) -> Self {
        Self {
            id: NoteId::new(),
            pitch: clamp_pitch(pitch),
            start_time: clamp_time(start_time),
            duration,
            intensity: intensity.clamp(0.0, 1.0),
            selected: false,
        }
    }

    /// Returns the end time of this note (start + duration).
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Checks if this note is sounding at a specific time.
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }

    /// Checks if this note overlaps a time range.
    ///
    /// `start` is inclusive, `end` exclusive.
    pub fn overlaps_range(&self, start: f64, end: f64) -> bool {
        self.start_time < end && self.end_time() > start
    }

    /// Moves the note to a new time/pitch, clamping both into their valid
    /// ranges. Identity and all other fields are untouched.
    pub fn move_to(&mut self, start_time: f64, pitch: i32) {
        self.start_time = clamp_time(start_time);
        self.pitch = clamp_pitch(pitch);
    }

    /// Returns true for accidental (black-key) pitches.
    pub fn is_accidental(&self) -> bool {
        super::is_accidental(self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let note = Note::new(60, 5.0, 2.0, 0.8);
        assert_eq!(note.pitch, 60);
        assert_eq!(note.start_time, 5.0);
        assert_eq!(note.duration, 2.0);
        assert_eq!(note.intensity, 0.8);
        assert!(!note.selected);
    }

    #[test]
    fn test_note_clamping() {
        let note = Note::new(200, -1.0, 1.0, 2.0);
        assert_eq!(note.pitch, PITCH_MAX);
        assert_eq!(note.start_time, 0.0);
        assert_eq!(note.intensity, 1.0);

        let note = Note::new(3, 0.0, 1.0, -0.5);
        assert_eq!(note.pitch, PITCH_MIN);
        assert_eq!(note.intensity, 0.0);
    }

    #[test]
    fn test_unique_ids() {
        let a = Note::new(60, 0.0, 1.0, 0.5);
        let b = Note::new(60, 0.0, 1.0, 0.5);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_note_active() {
        let note = Note::new(60, 1.0, 2.0, 0.5);
        assert!(!note.is_active_at(0.99));
        assert!(note.is_active_at(1.0));
        assert!(note.is_active_at(2.5));
        assert!(!note.is_active_at(3.0));
    }

    #[test]
    fn test_note_overlap() {
        let note = Note::new(60, 1.0, 2.0, 0.5); // 1.0-3.0
        assert!(note.overlaps_range(0.0, 1.5));
        assert!(note.overlaps_range(2.0, 4.0));
        assert!(!note.overlaps_range(0.0, 1.0));
        assert!(!note.overlaps_range(3.0, 4.0));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut note = Note::new(60, 5.0, 2.0, 0.8);
        note.move_to(-1.5, 300);
        assert_eq!(note.start_time, 0.0);
        assert_eq!(note.pitch, PITCH_MAX);
    }
}
