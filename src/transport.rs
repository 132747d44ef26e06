//! Transport clock for playback position.
//!
//! The transport derives the current playback position from the audio
//! clock's absolute counter and an epoch recorded when playback starts,
//! rather than accumulating a software timer. Each redraw tick recomputes
//! `elapsed = now - epoch`; the loop re-arms itself only while playing.

use crate::audio::AudioClock;

/// Playback states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Not playing.
    Stopped,
    /// Advancing with the audio clock.
    Playing,
}

/// What a tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing to do, the loop should not re-arm.
    Idle,
    /// Still playing; position was republished.
    Advancing,
    /// Elapsed time reached the clip duration; playback auto-stopped.
    /// The caller should drop its playback handle. The position is left at
    /// the clip end, not reset.
    Finished,
}

/// Single playback cursor over the loaded clip.
pub struct Transport {
    clock: Box<dyn AudioClock>,
    state: TransportState,
    /// Current position in seconds, within [0, duration].
    position: f64,
    /// Clock reading corresponding to position 0 of the current run.
    epoch: f64,
    /// Duration of the loaded clip in seconds; 0 when nothing is loaded.
    duration: f64,
}

impl Transport {
    pub fn new(clock: Box<dyn AudioClock>) -> Self {
        Self {
            clock,
            state: TransportState::Stopped,
            position: 0.0,
            epoch: 0.0,
            duration: 0.0,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Current playback position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration of the loaded clip in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Installs a newly loaded clip: stops playback and rewinds.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        self.state = TransportState::Stopped;
        self.position = 0.0;
    }

    /// Starts playing from the current position.
    ///
    /// A no-op when already playing or when no clip is loaded.
    pub fn play(&mut self) {
        if self.state == TransportState::Playing || self.duration <= 0.0 {
            return;
        }
        self.epoch = self.clock.now() - self.position;
        self.state = TransportState::Playing;
    }

    /// Recomputes the position from the clock; call once per redraw tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TransportState::Playing {
            return TickOutcome::Idle;
        }

        let elapsed = self.clock.now() - self.epoch;
        if elapsed >= self.duration {
            // Auto-stop: the position stays at the clip end. Only a manual
            // stop rewinds to zero.
            self.state = TransportState::Stopped;
            self.position = self.duration;
            TickOutcome::Finished
        } else {
            self.position = elapsed.max(0.0);
            TickOutcome::Advancing
        }
    }

    /// Manual stop: halts playback and resets the position to zero.
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.position = 0.0;
    }

    /// Moves the cursor, clamped into [0, duration], re-anchoring the epoch
    /// if currently playing.
    pub fn seek(&mut self, position: f64) {
        self.position = position.clamp(0.0, self.duration);
        if self.state == TransportState::Playing {
            self.epoch = self.clock.now() - self.position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Test clock advanced by hand.
    #[derive(Clone)]
    struct ManualClock(Rc<Cell<f64>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(0.0)))
        }

        fn advance(&self, dt: f64) {
            self.0.set(self.0.get() + dt);
        }
    }

    impl AudioClock for ManualClock {
        fn now(&self) -> f64 {
            self.0.get()
        }
    }

    fn transport(clock: &ManualClock, duration: f64) -> Transport {
        let mut t = Transport::new(Box::new(clock.clone()));
        t.set_duration(duration);
        t
    }

    #[test]
    fn test_position_tracks_clock() {
        let clock = ManualClock::new();
        let mut t = transport(&clock, 40.0);

        t.play();
        clock.advance(2.5);
        assert_eq!(t.tick(), TickOutcome::Advancing);
        assert!((t.position() - 2.5).abs() < 1e-9);

        clock.advance(0.5);
        t.tick();
        assert!((t.position() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_resume_from_offset() {
        let clock = ManualClock::new();
        let mut t = transport(&clock, 40.0);

        t.seek(10.0);
        t.play();
        clock.advance(1.5);
        t.tick();
        assert!((t.position() - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_auto_stop_keeps_position() {
        let clock = ManualClock::new();
        let mut t = transport(&clock, 5.0);

        t.play();
        clock.advance(7.0);
        assert_eq!(t.tick(), TickOutcome::Finished);
        assert_eq!(t.state(), TransportState::Stopped);
        // Auto-stop leaves the cursor at the clip end
        assert_eq!(t.position(), 5.0);
    }

    #[test]
    fn test_manual_stop_resets_position() {
        let clock = ManualClock::new();
        let mut t = transport(&clock, 40.0);

        t.play();
        clock.advance(3.0);
        t.tick();
        t.stop();
        assert_eq!(t.state(), TransportState::Stopped);
        assert_eq!(t.position(), 0.0);
    }

    #[test]
    fn test_tick_while_stopped_is_inert() {
        let clock = ManualClock::new();
        let mut t = transport(&clock, 40.0);

        clock.advance(9.0);
        assert_eq!(t.tick(), TickOutcome::Idle);
        assert_eq!(t.position(), 0.0);

        // After an auto-stop, further ticks stay idle and do not move
        t.play();
        clock.advance(50.0);
        t.tick();
        clock.advance(10.0);
        assert_eq!(t.tick(), TickOutcome::Idle);
        assert_eq!(t.position(), 40.0);
    }

    #[test]
    fn test_play_without_clip_is_noop() {
        let clock = ManualClock::new();
        let mut t = Transport::new(Box::new(clock.clone()));

        t.play();
        assert_eq!(t.state(), TransportState::Stopped);
        clock.advance(1.0);
        assert_eq!(t.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_seek_clamps_and_reanchors() {
        let clock = ManualClock::new();
        let mut t = transport(&clock, 10.0);

        t.seek(25.0);
        assert_eq!(t.position(), 10.0);
        t.seek(-5.0);
        assert_eq!(t.position(), 0.0);

        t.play();
        clock.advance(2.0);
        t.tick();
        t.seek(8.0);
        clock.advance(1.0);
        t.tick();
        assert!((t.position() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_epoch_offset_with_nonzero_clock_origin() {
        // Playback started at t0 and queried after simulated elapsed
        // hardware time dt reports t0 + dt
        let clock = ManualClock::new();
        clock.advance(100.0); // arbitrary clock origin
        let mut t = transport(&clock, 60.0);

        t.seek(12.0);
        t.play();
        clock.advance(4.25);
        t.tick();
        assert!((t.position() - 16.25).abs() < 1e-9);
    }
}
