//! Transcription data model.
//!
//! This module provides the core types for the transcribed view of an audio
//! clip: the notes themselves and the analysis result that owns them, plus
//! the client for the external transcription service.

mod note;
pub mod transcribe;

pub use note::{Note, NoteId};
pub use transcribe::{HttpTranscriber, TranscribeError, TranscriptionResponse, Transcriber};

use serde::{Deserialize, Serialize};

/// Lowest displayable MIDI pitch (A0, bottom of the piano).
pub const PITCH_MIN: u8 = 21;

/// Highest displayable MIDI pitch (C8, top of the piano).
pub const PITCH_MAX: u8 = 108;

/// Fallback musical key when the service omits one.
pub const DEFAULT_KEY: &str = "C";

/// Fallback scale label when the service omits one.
pub const DEFAULT_SCALE: &str = "major";

/// Fallback tempo in beats per minute.
pub const DEFAULT_BPM: f64 = 120.0;

/// Standard note names for display purposes.
/// Maps MIDI note number modulo 12 to note name within an octave.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Converts a MIDI note number to a human-readable note name with octave.
///
/// # Examples
///
/// ```
/// use rollscribe::analysis::note_to_name;
///
/// assert_eq!(note_to_name(60), "C4"); // Middle C
/// ```
pub fn note_to_name(note: u8) -> String {
    let octave = (note / 12) as i8 - 1; // MIDI octave convention
    let note_index = (note % 12) as usize;
    format!("{}{}", NOTE_NAMES[note_index], octave)
}

/// Returns true for accidental (black-key) pitches.
///
/// Within an octave the accidentals sit at semitone offsets 1, 3, 6, 8, 10
/// (C#, D#, F#, G#, A#).
pub fn is_accidental(pitch: u8) -> bool {
    matches!(pitch % 12, 1 | 3 | 6 | 8 | 10)
}

/// The complete transcription of one audio clip.
///
/// Created once per successful upload and replaced wholesale on the next.
/// Note order carries no meaning; notes are looked up and replaced by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Musical key label, e.g. "C" or "F#".
    pub key: String,

    /// Scale label, e.g. "major" or "minor".
    pub scale: String,

    /// Tempo in beats per minute. Always positive.
    pub bpm: f64,

    /// Transcribed notes.
    notes: Vec<Note>,
}

impl AnalysisResult {
    /// Builds an analysis result from a service response.
    ///
    /// Every note receives a fresh local id; pitches, start times and
    /// intensities are clamped into their documented ranges. Notes with a
    /// non-positive duration are dropped. A non-positive tempo falls back to
    /// [`DEFAULT_BPM`].
    pub fn from_response(response: TranscriptionResponse) -> Self {
        let notes = response
            .notes
            .into_iter()
            .filter(|event| event.duration > 0.0)
            .map(|event| {
                Note::new(
                    event.midi as i32,
                    event.start_time,
                    event.duration,
                    event.velocity,
                )
            })
            .collect();

        let bpm = if response.bpm > 0.0 {
            response.bpm
        } else {
            DEFAULT_BPM
        };

        Self {
            key: response.key,
            scale: response.scale,
            bpm,
            notes,
        }
    }

    /// Creates an analysis result directly from notes (tests and tools).
    pub fn from_notes(key: impl Into<String>, scale: impl Into<String>, bpm: f64, notes: Vec<Note>) -> Self {
        Self {
            key: key.into(),
            scale: scale.into(),
            bpm,
            notes,
        }
    }

    /// Returns all notes.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Finds a note by id.
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Finds a note by id for mutation.
    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Writes an updated note back into the collection by id.
    ///
    /// Replace-in-collection semantics: the slot keeping the note's identity
    /// is overwritten in place. Returns false if no note has the given id.
    pub fn replace_note(&mut self, note: Note) -> bool {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(slot) => {
                *slot = note;
                true
            }
            None => false,
        }
    }

    /// Replaces the selection set wholesale.
    ///
    /// Every note's selection flag is recomputed as membership in `ids`, so
    /// the flags can never drift from the selection set.
    pub fn select(&mut self, ids: &[NoteId]) {
        for note in &mut self.notes {
            note.selected = ids.contains(&note.id);
        }
    }

    /// Returns the ids of all currently selected notes.
    pub fn selected_ids(&self) -> Vec<NoteId> {
        self.notes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id)
            .collect()
    }

    /// Finds the note whose rectangle contains the given (time, pitch)
    /// point, if any. Later notes win when overlapping.
    pub fn note_at(&self, time: f64, pitch: u8) -> Option<&Note> {
        self.notes
            .iter()
            .rev()
            .find(|n| n.pitch == pitch && n.is_active_at(time))
    }
}
