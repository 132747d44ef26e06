//! Coordinate transforms between musical space and screen space.
//!
//! The piano roll lives in a two-dimensional musical space: time in seconds
//! on the horizontal axis and MIDI pitch on the vertical axis. A [`Viewport`]
//! maps that space onto screen pixels given the current zoom factors and
//! scroll offsets, and provides the inverse mapping used to turn pointer
//! drag deltas back into time/pitch deltas.

use crate::analysis::{PITCH_MAX, PITCH_MIN};

/// Default horizontal zoom in pixels per second.
pub const DEFAULT_ZOOM_X: f64 = 8.0;

/// Default vertical zoom in pixels per semitone.
pub const DEFAULT_ZOOM_Y: f64 = 1.0;

/// Minimum allowed zoom factor on either axis.
const MIN_ZOOM: f64 = 0.25;

/// Maximum allowed zoom factor on either axis.
const MAX_ZOOM: f64 = 512.0;

/// Clamps an arbitrary pitch value into the displayable MIDI range.
pub fn clamp_pitch(pitch: i32) -> u8 {
    pitch.clamp(PITCH_MIN as i32, PITCH_MAX as i32) as u8
}

/// Clamps a time value to be non-negative.
pub fn clamp_time(time: f64) -> f64 {
    time.max(0.0)
}

/// The visible window onto the piano roll.
///
/// Zoom factors are strictly positive; scroll offsets are non-negative
/// pixel distances from the origin (time 0, pitch [`PITCH_MAX`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal zoom in pixels per second.
    pub zoom_x: f64,
    /// Vertical zoom in pixels per semitone.
    pub zoom_y: f64,
    /// Horizontal scroll offset in pixels.
    pub scroll_x: f64,
    /// Vertical scroll offset in pixels.
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom_x: DEFAULT_ZOOM_X,
            zoom_y: DEFAULT_ZOOM_Y,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl Viewport {
    /// Returns the horizontal pixel coordinate for a time in seconds.
    pub fn x_of_time(&self, time: f64) -> f64 {
        time * self.zoom_x - self.scroll_x
    }

    /// Returns the vertical pixel coordinate for a MIDI pitch.
    ///
    /// Higher pitches map to smaller (higher on screen) coordinates.
    pub fn y_of_pitch(&self, pitch: u8) -> f64 {
        (PITCH_MAX as f64 - pitch as f64) * self.zoom_y - self.scroll_y
    }

    /// Converts a horizontal pixel delta into a time delta in seconds.
    ///
    /// Time is continuous: the delta is never rounded or snapped.
    pub fn time_delta(&self, dx: f64) -> f64 {
        dx / self.zoom_x
    }

    /// Converts a vertical pixel delta into a semitone delta.
    ///
    /// The sign is inverted (screen-down is pitch-down) and the result is
    /// rounded to the nearest whole semitone.
    pub fn pitch_delta(&self, dy: f64) -> i32 {
        -(dy / self.zoom_y).round() as i32
    }

    /// Returns the time in seconds at a horizontal pixel coordinate.
    pub fn time_at(&self, x: f64) -> f64 {
        (x + self.scroll_x) / self.zoom_x
    }

    /// Returns the pitch row at a vertical pixel coordinate.
    ///
    /// The result may fall outside the valid MIDI range; callers hit-testing
    /// notes should check it against [`PITCH_MIN`]..=[`PITCH_MAX`].
    pub fn pitch_at(&self, y: f64) -> i32 {
        PITCH_MAX as i32 - ((y + self.scroll_y) / self.zoom_y).floor() as i32
    }

    /// Scrolls the viewport by a pixel delta, clamping offsets at zero.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll_x = (self.scroll_x + dx).max(0.0);
        self.scroll_y = (self.scroll_y + dy).max(0.0);
    }

    /// Scales the horizontal zoom by a factor, clamped to sane bounds.
    pub fn zoom_x_by(&mut self, factor: f64) {
        self.zoom_x = (self.zoom_x * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Scales the vertical zoom by a factor, clamped to sane bounds.
    pub fn zoom_y_by(&mut self, factor: f64) {
        self.zoom_y = (self.zoom_y * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(zoom_x: f64, zoom_y: f64, scroll_x: f64, scroll_y: f64) -> Viewport {
        Viewport {
            zoom_x,
            zoom_y,
            scroll_x,
            scroll_y,
        }
    }

    #[test]
    fn test_x_of_time_is_linear() {
        let vp = viewport(100.0, 24.0, 30.0, 0.0);
        assert_eq!(vp.x_of_time(0.0), -30.0);
        assert_eq!(vp.x_of_time(1.0), 70.0);
        assert_eq!(vp.x_of_time(2.0), 170.0);
    }

    #[test]
    fn test_y_of_pitch_formula() {
        let vp = viewport(100.0, 24.0, 0.0, 0.0);
        // (108 - 60) * 24 = 1152
        assert_eq!(vp.y_of_pitch(60), 1152.0);
        assert_eq!(vp.y_of_pitch(108), 0.0);
        assert_eq!(vp.y_of_pitch(21), (108.0 - 21.0) * 24.0);
    }

    #[test]
    fn test_y_strictly_decreasing_in_pitch() {
        let vp = viewport(100.0, 3.5, 0.0, 12.0);
        for pitch in PITCH_MIN..PITCH_MAX {
            assert!(vp.y_of_pitch(pitch + 1) < vp.y_of_pitch(pitch));
        }
    }

    #[test]
    fn test_scroll_offsets_shift_coordinates() {
        let vp = viewport(100.0, 24.0, 50.0, 48.0);
        assert_eq!(vp.x_of_time(5.0), 450.0);
        assert_eq!(vp.y_of_pitch(60), 1152.0 - 48.0);
    }

    #[test]
    fn test_time_delta_is_continuous() {
        let vp = viewport(100.0, 24.0, 0.0, 0.0);
        assert_eq!(vp.time_delta(-50.0), -0.5);
        assert_eq!(vp.time_delta(33.0), 0.33);
    }

    #[test]
    fn test_pitch_delta_rounds_and_inverts() {
        let vp = viewport(100.0, 24.0, 0.0, 0.0);
        assert_eq!(vp.pitch_delta(48.0), -2);
        assert_eq!(vp.pitch_delta(-48.0), 2);
        // 11 pixels at 24 px/semitone rounds to zero semitones
        assert_eq!(vp.pitch_delta(11.0), 0);
        // 13 pixels rounds to one
        assert_eq!(vp.pitch_delta(13.0), -1);
    }

    #[test]
    fn test_inverse_point_mapping() {
        let vp = viewport(100.0, 24.0, 200.0, 96.0);
        let x = vp.x_of_time(3.25);
        assert!((vp.time_at(x) - 3.25).abs() < 1e-9);
        let y = vp.y_of_pitch(72);
        assert_eq!(vp.pitch_at(y), 72);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_pitch(200), PITCH_MAX);
        assert_eq!(clamp_pitch(0), PITCH_MIN);
        assert_eq!(clamp_pitch(60), 60);
        assert_eq!(clamp_time(-0.5), 0.0);
        assert_eq!(clamp_time(1.5), 1.5);
    }

    #[test]
    fn test_scroll_clamps_at_zero() {
        let mut vp = Viewport::default();
        vp.scroll_by(-100.0, -100.0);
        assert_eq!(vp.scroll_x, 0.0);
        assert_eq!(vp.scroll_y, 0.0);
        vp.scroll_by(10.0, 4.0);
        assert_eq!(vp.scroll_x, 10.0);
        assert_eq!(vp.scroll_y, 4.0);
    }

    #[test]
    fn test_zoom_stays_positive() {
        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.zoom_x_by(0.5);
            vp.zoom_y_by(0.5);
        }
        assert!(vp.zoom_x > 0.0);
        assert!(vp.zoom_y > 0.0);
    }
}
