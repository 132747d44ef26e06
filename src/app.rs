//! Application state and editing behavior.
//!
//! This module defines the main application state that coordinates the
//! analysis result, the viewport, the transport clock, and the pointer
//! tools. All mutation happens on discrete event callbacks from the main
//! loop; there is no parallel execution.

use crate::analysis::{
    transcribe::{ensure_upload_size, mime_for_path},
    AnalysisResult, NoteId, TranscribeError, Transcriber, PITCH_MAX, PITCH_MIN,
};
use crate::audio::{AudioOutput, DecodedAudio, PlaybackHandle, SystemClock};
use crate::geometry::Viewport;
use crate::transport::{TickOutcome, Transport};
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long a status message stays visible.
const STATUS_EXPIRY: Duration = Duration::from_secs(3);

/// Audio file extensions shown in the file browser.
const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "mp3", "flac", "ogg", "m4a"];

/// The active editing tool. Modes are mutually exclusive.
///
/// Only the pointer tool has drag-editing behavior; the others are
/// selectable modes without actions yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select and drag notes.
    #[default]
    Pointer,
    /// Draw new notes.
    Pencil,
    /// Split notes.
    Cut,
    /// Zoom the view.
    Zoom,
}

impl Tool {
    /// Short display label for the header bar.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pointer => "pointer",
            Tool::Pencil => "pencil",
            Tool::Cut => "cut",
            Tool::Zoom => "zoom",
        }
    }
}

/// One in-flight pointer drag on a note.
///
/// Ephemeral: exists only between pointer-down and pointer-up. Deltas are
/// always computed against the pointer origin and the note's pre-drag
/// position, never accumulated, so rounding cannot drift.
#[derive(Debug, Clone, Copy)]
struct DragGesture {
    /// The note being dragged.
    note_id: NoteId,
    /// Pointer position when the drag started (grid pixels).
    origin_x: f64,
    origin_y: f64,
    /// The note's position when the drag started.
    start_time: f64,
    start_pitch: u8,
}

/// State for the file browser dialog.
#[derive(Debug, Clone)]
pub struct FileBrowserState {
    /// Whether the browser is open.
    pub open: bool,
    /// Current directory path.
    pub current_dir: PathBuf,
    /// List of entries in current directory.
    pub entries: Vec<PathBuf>,
    /// Currently selected index.
    pub selected: usize,
    /// Scroll offset for long lists.
    pub scroll: usize,
}

impl Default for FileBrowserState {
    fn default() -> Self {
        Self {
            open: false,
            current_dir: std::env::current_dir().unwrap_or_default(),
            entries: Vec::new(),
            selected: 0,
            scroll: 0,
        }
    }
}

/// Layout regions for mouse hit testing, updated each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutRegions {
    /// The transport/header bar at the top.
    pub header: Rect,
    /// The waveform strip.
    pub waveform: Rect,
    /// The piano roll panel (including borders and key labels).
    pub piano_roll: Rect,
    /// The note grid area only (excluding key labels and ruler).
    pub grid: Rect,
    /// The time ruler above the grid.
    pub ruler: Rect,
}

impl LayoutRegions {
    fn contains(rect: Rect, x: u16, y: u16) -> bool {
        x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
    }

    /// Returns grid-relative pixel coordinates if the point is inside the
    /// note grid.
    pub fn grid_point(&self, x: u16, y: u16) -> Option<(f64, f64)> {
        if Self::contains(self.grid, x, y) {
            Some(self.grid_point_unclamped(x, y))
        } else {
            None
        }
    }

    /// Grid-relative coordinates without the bounds check; used while a
    /// drag is in progress and the pointer leaves the grid.
    pub fn grid_point_unclamped(&self, x: u16, y: u16) -> (f64, f64) {
        (
            x as f64 - self.grid.x as f64,
            y as f64 - self.grid.y as f64,
        )
    }
}

/// Errors from the upload/analyze flow.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read.
    #[error("could not read audio file: {0}")]
    Io(#[from] std::io::Error),
    /// Decoding failed (black-box decoder rejected the data).
    #[error("could not decode audio: {0}")]
    Decode(String),
    /// The transcription service call failed.
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),
}

/// Main application state.
pub struct App {
    /// The current transcription, replaced wholesale on each upload.
    pub analysis: Option<AnalysisResult>,
    /// The decoded clip backing playback and the waveform strip.
    pub audio: Option<DecodedAudio>,
    /// Audio output device; None when unavailable (view-only session).
    output: Option<AudioOutput>,
    /// The single live playback handle, if playing.
    playback: Option<PlaybackHandle>,
    /// Playback position clock.
    pub transport: Transport,
    /// Zoom and scroll state.
    pub viewport: Viewport,
    /// Active tool mode.
    pub tool: Tool,
    /// In-flight drag gesture, if any. At most one at a time.
    drag: Option<DragGesture>,
    /// Path of the loaded file, for the header bar.
    pub loaded_path: Option<PathBuf>,
    /// Status message to display, with its creation time.
    pub status_message: Option<(String, Instant)>,
    /// File browser dialog state.
    pub file_browser: FileBrowserState,
    /// Layout regions for mouse hit testing (updated each frame).
    pub layout: LayoutRegions,
}

impl App {
    /// Creates the application with no audio output attached.
    pub fn new() -> Self {
        Self {
            analysis: None,
            audio: None,
            output: None,
            playback: None,
            transport: Transport::new(Box::new(SystemClock::new())),
            viewport: Viewport::default(),
            tool: Tool::default(),
            drag: None,
            loaded_path: None,
            status_message: None,
            file_browser: FileBrowserState::default(),
            layout: LayoutRegions::default(),
        }
    }

    /// Opens the default audio output device.
    ///
    /// On failure the app keeps running view-only; playback requests are
    /// then silently ignored.
    pub fn init_audio_output(&mut self) {
        match AudioOutput::new() {
            Ok(output) => self.output = Some(output),
            Err(e) => {
                tracing::warn!("Audio output unavailable: {e}");
                self.set_status("Audio output unavailable - playback disabled");
            }
        }
    }

    /// Sets a status message shown in the status bar.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clears the status message once it has expired.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() > STATUS_EXPIRY {
                self.status_message = None;
            }
        }
    }

    /// Updates the layout regions after rendering.
    pub fn update_layout(&mut self, layout: LayoutRegions) {
        self.layout = layout;
    }

    // ========== SELECTION ==========

    /// Replaces the selection set wholesale.
    pub fn select(&mut self, ids: &[NoteId]) {
        if let Some(analysis) = &mut self.analysis {
            analysis.select(ids);
        }
    }

    // ========== NOTE DRAGGING ==========

    /// Starts dragging a note from a grid-relative pointer position.
    ///
    /// No-op unless the pointer tool is active and no other gesture is in
    /// flight (single-pointer input should make a second press impossible,
    /// but guard anyway).
    pub fn begin_drag(&mut self, note_id: NoteId, x: f64, y: f64) {
        if self.tool != Tool::Pointer || self.drag.is_some() {
            return;
        }
        let Some(analysis) = &self.analysis else {
            return;
        };
        let Some(note) = analysis.note(note_id) else {
            return;
        };
        self.drag = Some(DragGesture {
            note_id,
            origin_x: x,
            origin_y: y,
            start_time: note.start_time,
            start_pitch: note.pitch,
        });
    }

    /// Applies the current pointer position to the dragged note.
    ///
    /// The deltas from the drag origin are mapped through the viewport
    /// inverse, applied to the note's pre-drag position, clamped, and
    /// written back into the analysis by id. The collection is updated
    /// live; there is no separate commit on release.
    pub fn update_drag(&mut self, x: f64, y: f64) {
        let Some(drag) = self.drag else {
            return;
        };
        let time = drag.start_time + self.viewport.time_delta(x - drag.origin_x);
        let pitch = drag.start_pitch as i32 + self.viewport.pitch_delta(y - drag.origin_y);

        let Some(analysis) = &mut self.analysis else {
            return;
        };
        let Some(note) = analysis.note(drag.note_id) else {
            return;
        };
        let mut updated = note.clone();
        updated.move_to(time, pitch);
        analysis.replace_note(updated);
    }

    /// Ends the drag gesture.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// The note currently being dragged, for render highlighting.
    pub fn dragging(&self) -> Option<NoteId> {
        self.drag.map(|d| d.note_id)
    }

    /// Handles a pointer press at grid-relative coordinates.
    ///
    /// With the pointer tool, pressing a note selects exactly that note and
    /// starts a drag; pressing empty grid clears the selection. The other
    /// tools have no press behavior yet.
    pub fn handle_grid_press(&mut self, x: f64, y: f64) {
        if self.tool != Tool::Pointer {
            return;
        }
        let time = self.viewport.time_at(x);
        let pitch = self.viewport.pitch_at(y);

        let hit = self.analysis.as_ref().and_then(|analysis| {
            if (PITCH_MIN as i32..=PITCH_MAX as i32).contains(&pitch) {
                analysis.note_at(time, pitch as u8).map(|n| n.id)
            } else {
                None
            }
        });

        match hit {
            Some(id) => {
                self.select(&[id]);
                self.begin_drag(id, x, y);
            }
            None => self.select(&[]),
        }
    }

    // ========== UPLOAD / ANALYZE ==========

    /// Loads an audio file: size guard, decode, transcription.
    ///
    /// Returns true on success. Every failure leaves the previous state
    /// untouched and surfaces a status message; nothing is retried.
    pub fn load_audio(&mut self, path: PathBuf, transcriber: &dyn Transcriber) -> bool {
        // Reject oversized files before reading, decoding, or any network
        // traffic.
        let size = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::error!("Cannot stat {:?}: {e}", path);
                self.set_status("Could not read audio file");
                return false;
            }
        };
        if let Err(e) = ensure_upload_size(size) {
            tracing::warn!("Rejected upload of {:?}: {e}", path);
            self.set_status(e.to_string());
            return false;
        }

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Cannot read {:?}: {e}", path);
                self.set_status("Could not read audio file");
                return false;
            }
        };

        let mime = mime_for_path(&path);
        match self.load_audio_bytes(bytes, mime, transcriber) {
            Ok(()) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.loaded_path = Some(path);
                self.set_status(format!("Transcribed {}", name));
                true
            }
            Err(e) => {
                tracing::error!("Upload of {:?} failed: {e}", path);
                let message = match &e {
                    LoadError::Transcribe(TranscribeError::MissingApiKey)
                    | LoadError::Transcribe(TranscribeError::TooLarge { .. }) => e.to_string(),
                    _ => "Could not analyze audio - nothing was changed".to_string(),
                };
                self.set_status(message);
                false
            }
        }
    }

    /// Decodes and transcribes raw audio bytes, replacing the analysis
    /// wholesale on success.
    ///
    /// State is committed only after both decode and transcription succeed,
    /// so a failed upload never leaves a partial analysis behind.
    pub fn load_audio_bytes(
        &mut self,
        bytes: Vec<u8>,
        mime: &str,
        transcriber: &dyn Transcriber,
    ) -> Result<(), LoadError> {
        ensure_upload_size(bytes.len() as u64)?;
        let decoded =
            DecodedAudio::decode(&bytes).map_err(|e| LoadError::Decode(e.to_string()))?;
        let response = transcriber.transcribe(&bytes, mime)?;
        let analysis = AnalysisResult::from_response(response);

        if let Some(handle) = self.playback.take() {
            handle.stop();
        }
        self.transport.set_duration(decoded.duration_seconds());
        self.audio = Some(decoded);
        self.analysis = Some(analysis);
        self.drag = None;
        self.viewport.scroll_x = 0.0;
        Ok(())
    }

    // ========== PLAYBACK ==========

    /// Starts playback from the current transport position.
    ///
    /// Silently ignored when nothing is loaded or no output device exists.
    pub fn start_playback(&mut self) {
        if self.transport.is_playing() {
            return;
        }
        let (Some(audio), Some(output)) = (self.audio.as_ref(), self.output.as_ref()) else {
            return;
        };

        match output.play_from(audio, self.transport.position()) {
            Ok(handle) => {
                // The previous handle must be stopped before a new one lives
                if let Some(old) = self.playback.take() {
                    old.stop();
                }
                self.playback = Some(handle);
                self.transport.play();
                self.set_status("Playing");
            }
            Err(e) => {
                tracing::error!("Failed to start playback: {e}");
                self.set_status("Could not start playback");
            }
        }
    }

    /// Manual stop: halts audio, rewinds the transport and the view.
    pub fn stop_playback(&mut self) {
        if let Some(handle) = self.playback.take() {
            handle.stop();
        }
        self.transport.stop();
        self.viewport.scroll_x = 0.0;
        self.set_status("Stopped");
    }

    /// Toggles between playing and stopped.
    pub fn toggle_playback(&mut self) {
        if self.transport.is_playing() {
            self.stop_playback();
        } else {
            self.start_playback();
        }
    }

    /// Advances the transport once per redraw tick.
    ///
    /// On end-of-clip auto-stop the playback handle is dropped but the
    /// position is left at the clip end (only a manual stop rewinds).
    pub fn update_playback(&mut self) {
        match self.transport.tick() {
            TickOutcome::Finished => {
                if let Some(handle) = self.playback.take() {
                    handle.stop();
                }
            }
            TickOutcome::Advancing => self.follow_playhead(),
            TickOutcome::Idle => {}
        }
    }

    /// Auto-scrolls so the playhead stays visible during playback.
    fn follow_playhead(&mut self) {
        let width = self.layout.grid.width as f64;
        if width <= 0.0 {
            return;
        }
        let x = self.viewport.x_of_time(self.transport.position());
        if x > width * 0.75 {
            self.viewport.scroll_x =
                (self.transport.position() * self.viewport.zoom_x - width * 0.25).max(0.0);
        }
    }

    // ========== FILE BROWSER ==========

    /// Opens the file browser dialog.
    pub fn open_file_browser(&mut self) {
        self.file_browser.open = true;
        self.file_browser.current_dir = std::env::current_dir().unwrap_or_default();
        self.file_browser.selected = 0;
        self.file_browser.scroll = 0;
        self.refresh_file_browser();
    }

    /// Refreshes the file browser entries.
    fn refresh_file_browser(&mut self) {
        self.file_browser.entries.clear();

        if self.file_browser.current_dir.parent().is_some() {
            self.file_browser.entries.push(PathBuf::from(".."));
        }

        if let Ok(entries) = std::fs::read_dir(&self.file_browser.current_dir) {
            let mut dirs: Vec<PathBuf> = Vec::new();
            let mut files: Vec<PathBuf> = Vec::new();

            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                    if AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                        files.push(path);
                    }
                }
            }

            dirs.sort();
            files.sort();

            self.file_browser.entries.extend(dirs);
            self.file_browser.entries.extend(files);
        }

        if self.file_browser.selected >= self.file_browser.entries.len() {
            self.file_browser.selected = 0;
        }
    }

    /// Moves selection up in the file browser.
    pub fn file_browser_up(&mut self) {
        if self.file_browser.open && self.file_browser.selected > 0 {
            self.file_browser.selected -= 1;
            if self.file_browser.selected < self.file_browser.scroll {
                self.file_browser.scroll = self.file_browser.selected;
            }
        }
    }

    /// Moves selection down in the file browser.
    pub fn file_browser_down(&mut self) {
        if self.file_browser.open && self.file_browser.selected + 1 < self.file_browser.entries.len()
        {
            self.file_browser.selected += 1;
            if self.file_browser.selected >= self.file_browser.scroll + 10 {
                self.file_browser.scroll = self.file_browser.selected.saturating_sub(9);
            }
        }
    }

    /// Activates the current entry. Returns the chosen audio file, if the
    /// entry was a file; directories navigate in place.
    pub fn file_browser_select(&mut self) -> Option<PathBuf> {
        if !self.file_browser.open || self.file_browser.entries.is_empty() {
            return None;
        }

        let selected_path = self.file_browser.entries[self.file_browser.selected].clone();

        if selected_path == PathBuf::from("..") {
            if let Some(parent) = self.file_browser.current_dir.parent() {
                self.file_browser.current_dir = parent.to_path_buf();
                self.file_browser.selected = 0;
                self.file_browser.scroll = 0;
                self.refresh_file_browser();
            }
            None
        } else if selected_path.is_dir() {
            self.file_browser.current_dir = selected_path;
            self.file_browser.selected = 0;
            self.file_browser.scroll = 0;
            self.refresh_file_browser();
            None
        } else {
            self.file_browser.open = false;
            Some(selected_path)
        }
    }

    /// Cancels the file browser.
    pub fn file_browser_cancel(&mut self) {
        self.file_browser.open = false;
        self.set_status("Open cancelled");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Note, TranscriptionResponse};
    use std::cell::Cell;

    /// Transcriber double that records whether it was called.
    struct CountingTranscriber {
        calls: Cell<usize>,
    }

    impl CountingTranscriber {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl Transcriber for CountingTranscriber {
        fn transcribe(
            &self,
            _audio: &[u8],
            _mime: &str,
        ) -> Result<TranscriptionResponse, TranscribeError> {
            self.calls.set(self.calls.get() + 1);
            Err(TranscribeError::Http("not a real service".into()))
        }
    }

    /// App at the documented reference zoom (100 px/sec, 24 px/semitone).
    fn test_app() -> App {
        let mut app = App::new();
        app.viewport.zoom_x = 100.0;
        app.viewport.zoom_y = 24.0;
        app
    }

    fn install_note(app: &mut App) -> NoteId {
        let note = Note::new(60, 5.0, 2.0, 0.8);
        let id = note.id;
        app.analysis = Some(AnalysisResult::from_notes("C", "major", 120.0, vec![note]));
        id
    }

    #[test]
    fn test_click_selects_exactly_one_note() {
        let mut app = test_app();
        let target = Note::new(60, 5.0, 2.0, 0.8);
        let other = Note::new(64, 0.0, 1.0, 0.5);
        let (id, other_id) = (target.id, other.id);
        let mut analysis = AnalysisResult::from_notes("C", "major", 120.0, vec![target, other]);
        analysis.select(&[other_id]);
        app.analysis = Some(analysis);

        // Press inside the first note's rectangle: time 6s, pitch 60
        let x = app.viewport.x_of_time(6.0);
        let y = app.viewport.y_of_pitch(60);
        app.handle_grid_press(x, y);

        let analysis = app.analysis.as_ref().unwrap();
        assert_eq!(analysis.selected_ids(), vec![id]);
        assert_eq!(app.dragging(), Some(id));
    }

    #[test]
    fn test_background_click_clears_selection() {
        let mut app = test_app();
        let id = install_note(&mut app);
        app.analysis.as_mut().unwrap().select(&[id]);

        // Empty grid: time 20s, pitch 40
        let x = app.viewport.x_of_time(20.0);
        let y = app.viewport.y_of_pitch(40);
        app.handle_grid_press(x, y);

        assert!(app.analysis.as_ref().unwrap().selected_ids().is_empty());
        assert_eq!(app.dragging(), None);
    }

    #[test]
    fn test_drag_retime_and_repitch() {
        let mut app = test_app();
        let id = install_note(&mut app);

        // Drag by (dx=-50, dy=48): -0.5 s, -2 semitones
        app.begin_drag(id, 500.0, 1152.0);
        app.update_drag(450.0, 1200.0);

        let note = app.analysis.as_ref().unwrap().note(id).unwrap();
        assert!((note.start_time - 4.5).abs() < 1e-9);
        assert_eq!(note.pitch, 58);
        // Other fields untouched, identity preserved
        assert_eq!(note.duration, 2.0);
        assert_eq!(note.intensity, 0.8);

        app.end_drag();
        assert_eq!(app.dragging(), None);
    }

    #[test]
    fn test_drag_clamps_time_at_zero() {
        let mut app = test_app();
        let id = install_note(&mut app);

        app.begin_drag(id, 0.0, 0.0);
        // 10 seconds leftwards from a 5 second start
        app.update_drag(-1000.0, 0.0);
        let note = app.analysis.as_ref().unwrap().note(id).unwrap();
        assert_eq!(note.start_time, 0.0);
    }

    #[test]
    fn test_drag_clamps_pitch_range() {
        let mut app = test_app();
        let id = install_note(&mut app);

        app.begin_drag(id, 0.0, 0.0);
        app.update_drag(0.0, -24.0 * 100.0); // way up
        assert_eq!(app.analysis.as_ref().unwrap().note(id).unwrap().pitch, PITCH_MAX);

        app.update_drag(0.0, 24.0 * 100.0); // way down
        assert_eq!(app.analysis.as_ref().unwrap().note(id).unwrap().pitch, PITCH_MIN);
    }

    #[test]
    fn test_drag_deltas_are_relative_to_origin_not_accumulated() {
        let mut app = test_app();
        let id = install_note(&mut app);

        app.begin_drag(id, 100.0, 0.0);
        app.update_drag(150.0, 0.0);
        app.update_drag(200.0, 0.0);
        let note = app.analysis.as_ref().unwrap().note(id).unwrap();
        // Net pointer travel is +100 px = +1 s, not 0.5 + 1.0
        assert!((note.start_time - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_begin_drag_requires_pointer_tool() {
        let mut app = test_app();
        let id = install_note(&mut app);

        for tool in [Tool::Pencil, Tool::Cut, Tool::Zoom] {
            app.tool = tool;
            app.begin_drag(id, 0.0, 0.0);
            assert_eq!(app.dragging(), None);
        }
    }

    #[test]
    fn test_second_begin_drag_is_ignored() {
        let mut app = test_app();
        let id = install_note(&mut app);
        let other_id = Note::new(70, 0.0, 1.0, 0.5).id;

        app.begin_drag(id, 0.0, 0.0);
        app.begin_drag(other_id, 10.0, 10.0);
        assert_eq!(app.dragging(), Some(id));
    }

    #[test]
    fn test_oversized_upload_rejected_before_transcription() {
        let mut app = test_app();
        let transcriber = CountingTranscriber::new();
        let oversized = vec![0u8; 60 * 1024 * 1024];

        let result = app.load_audio_bytes(oversized, "audio/wav", &transcriber);
        assert!(matches!(
            result,
            Err(LoadError::Transcribe(TranscribeError::TooLarge { .. }))
        ));
        // No network call was made and no state changed
        assert_eq!(transcriber.calls.get(), 0);
        assert!(app.analysis.is_none());
        assert!(app.audio.is_none());
    }

    #[test]
    fn test_failed_upload_preserves_previous_state() {
        let mut app = test_app();
        let id = install_note(&mut app);
        let transcriber = CountingTranscriber::new();

        // Garbage bytes fail to decode before the transcriber is reached
        let result = app.load_audio_bytes(vec![0u8; 64], "audio/wav", &transcriber);
        assert!(matches!(result, Err(LoadError::Decode(_))));
        assert_eq!(transcriber.calls.get(), 0);
        assert!(app.analysis.as_ref().unwrap().note(id).is_some());
    }

    #[test]
    fn test_playback_without_audio_is_noop() {
        let mut app = test_app();
        app.toggle_playback();
        assert!(!app.transport.is_playing());
        // And again with an analysis but no decoded audio/output
        install_note(&mut app);
        app.toggle_playback();
        assert!(!app.transport.is_playing());
    }
}
