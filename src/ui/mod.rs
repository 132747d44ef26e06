//! Terminal user interface components.
//!
//! This module provides the visual components for the transcription editor:
//! the transport bar, the waveform strip, the piano roll, and the file
//! browser dialog.

mod dialogs;
mod piano_roll;
mod timeline;
mod waveform;

use crate::app::{App, LayoutRegions};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub use dialogs::render_file_browser;
pub use piano_roll::render_piano_roll;
pub use timeline::render_timeline;
pub use waveform::render_waveform;

/// Width of the note-name label column on the left of the piano roll.
pub const KEY_LABEL_WIDTH: u16 = 5;

/// Formats a time in seconds as m:ss.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Returns the first whole second falling inside `[t0, t1)`, if any.
pub(super) fn second_in_column(t0: f64, t1: f64) -> Option<u64> {
    let first = t0.max(0.0).ceil() as u64;
    if (first as f64) < t1 && first as f64 >= t0 {
        Some(first)
    } else {
        None
    }
}

/// Renders a time ruler with second markers.
///
/// Columns map to time through the viewport's horizontal transform, so the
/// ruler stays aligned with the grid at any zoom or scroll. Every fifth
/// second gets a numeric label; the rest get a tick mark.
pub fn render_time_ruler(frame: &mut Frame, area: Rect, app: &App) {
    let mut ruler_spans: Vec<Span> = Vec::with_capacity(area.width as usize);
    let mut col = 0u16;

    while col < area.width {
        let t0 = app.viewport.time_at(col as f64);
        let t1 = app.viewport.time_at(col as f64 + 1.0);

        if let Some(second) = second_in_column(t0, t1) {
            if second % 5 == 0 {
                let label = format_time(second as f64);
                let chars_remaining = (area.width - col) as usize;

                if label.len() <= chars_remaining {
                    ruler_spans.push(Span::styled(
                        label.clone(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ));
                    col += label.len() as u16;
                    continue;
                } else {
                    ruler_spans.push(Span::styled("|", Style::default().fg(Color::Yellow)));
                }
            } else {
                ruler_spans.push(Span::styled(".", Style::default().fg(Color::DarkGray)));
            }
        } else {
            ruler_spans.push(Span::styled(" ", Style::default().fg(Color::DarkGray)));
        }
        col += 1;
    }

    frame.render_widget(Paragraph::new(Line::from(ruler_spans)), area);
}

/// Calculates the layout regions for the given terminal size.
///
/// Called during rendering to keep the regions used for mouse hit testing
/// in sync with what is on screen.
fn calculate_layout(size: Rect) -> (LayoutRegions, [Rect; 3]) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Length(6), // Waveform strip
            Constraint::Min(10),   // Piano roll
        ])
        .split(size);

    let piano_roll = main_chunks[2];

    // Inside the piano roll block: 1-cell borders, a key label column on the
    // left, and a ruler row above the grid
    let ruler = Rect {
        x: piano_roll.x + 1 + KEY_LABEL_WIDTH,
        y: piano_roll.y + 1,
        width: piano_roll.width.saturating_sub(2 + KEY_LABEL_WIDTH),
        height: 1,
    };
    let grid = Rect {
        x: ruler.x,
        y: ruler.y + 1,
        width: ruler.width,
        height: piano_roll.height.saturating_sub(3),
    };

    let layout = LayoutRegions {
        header: main_chunks[0],
        waveform: main_chunks[1],
        piano_roll,
        grid,
        ruler,
    };

    (layout, [main_chunks[0], main_chunks[1], main_chunks[2]])
}

/// Renders the complete UI layout and updates layout regions.
///
/// The layout is divided into:
/// - Top: Transport bar with playback state, position, and clip metadata
/// - Middle: Waveform strip for the loaded clip
/// - Bottom: Piano roll editor over the transcribed notes
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let (layout, main_chunks) = calculate_layout(size);

    // Update app's layout regions for mouse hit testing
    app.update_layout(layout);

    render_timeline(frame, main_chunks[0], app);
    render_waveform(frame, main_chunks[1], app);
    render_piano_roll(frame, main_chunks[2], app);

    if app.file_browser.open {
        render_file_browser(frame, app);
    }
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.7), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_second_in_column() {
        assert_eq!(second_in_column(0.0, 0.125), Some(0));
        assert_eq!(second_in_column(0.125, 0.25), None);
        assert_eq!(second_in_column(0.9, 1.1), Some(1));
        assert_eq!(second_in_column(1.1, 1.9), None);
    }

    #[test]
    fn test_layout_grid_sits_inside_piano_roll() {
        let (layout, _) = calculate_layout(Rect::new(0, 0, 120, 40));
        assert!(layout.grid.x > layout.piano_roll.x);
        assert!(layout.grid.y > layout.piano_roll.y);
        assert!(layout.grid.width < layout.piano_roll.width);
        assert_eq!(layout.ruler.y + 1, layout.grid.y);
    }
}
