//! Piano roll editor rendering.
//!
//! Displays the transcribed notes on a grid with pitch on the Y-axis and
//! time in seconds on the X-axis, similar to a DAW piano roll. Black-key
//! rows are shaded darker, second boundaries get column rules, and the
//! playhead is drawn as a red vertical line.

use super::KEY_LABEL_WIDTH;
use crate::analysis::{is_accidental, note_to_name, PITCH_MAX, PITCH_MIN};
use crate::app::App;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the piano roll editor.
pub fn render_piano_roll(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.analysis {
        Some(analysis) => format!(
            " Piano Roll - {} {} @ {:.0} BPM ",
            analysis.key, analysis.scale, analysis.bpm
        ),
        None => " Piano Roll ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 10 || inner.height < 6 {
        return; // Too small to render
    }

    // Layout: [key labels] [time ruler + grid]
    let grid_width = inner.width.saturating_sub(KEY_LABEL_WIDTH);
    let grid_height = inner.height.saturating_sub(1);

    let ruler_rect = Rect::new(inner.x + KEY_LABEL_WIDTH, inner.y, grid_width, 1);
    super::render_time_ruler(frame, ruler_rect, app);

    // Empty corner above the key labels, for alignment
    frame.render_widget(
        Paragraph::new("     ").style(Style::default().bg(Color::Rgb(20, 20, 20))),
        Rect::new(inner.x, inner.y, KEY_LABEL_WIDTH, 1),
    );

    // Playhead column, hidden when the cursor is at zero and stopped
    let playhead_col = if app.transport.is_playing() || app.transport.position() > 0.0 {
        let x = app.viewport.x_of_time(app.transport.position());
        if x >= 0.0 && x < grid_width as f64 {
            Some(x as u16)
        } else {
            None
        }
    } else {
        None
    };

    let position = app.transport.position();
    let playing = app.transport.is_playing();
    let dragging = app.dragging();
    let notes = app.analysis.as_ref().map(|a| a.notes()).unwrap_or(&[]);

    for row in 0..grid_height {
        let y = inner.y + 1 + row;
        let pitch = app.viewport.pitch_at(row as f64);

        if !(PITCH_MIN as i32..=PITCH_MAX as i32).contains(&pitch) {
            frame.render_widget(
                Paragraph::new(" ".repeat(inner.width as usize)),
                Rect::new(inner.x, y, inner.width, 1),
            );
            continue;
        }
        let pitch = pitch as u8;
        let black_key = is_accidental(pitch);
        let is_c = pitch % 12 == 0;

        // Key label column
        let key_style = if black_key {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else if is_c {
            Style::default().bg(Color::White).fg(Color::Black)
        } else {
            Style::default().bg(Color::Gray).fg(Color::Black)
        };
        frame.render_widget(
            Paragraph::new(format!("{:>4} ", note_to_name(pitch))).style(key_style),
            Rect::new(inner.x, y, KEY_LABEL_WIDTH, 1),
        );

        // Grid row
        let mut grid_line: Vec<Span> = Vec::with_capacity(grid_width as usize);

        for col in 0..grid_width {
            let t0 = app.viewport.time_at(col as f64);
            let t1 = app.viewport.time_at(col as f64 + 1.0);

            let note_here = notes
                .iter()
                .rev()
                .find(|n| n.pitch == pitch && n.overlaps_range(t0, t1));

            let is_playhead = playhead_col == Some(col);

            let (ch, style) = if let Some(note) = note_here {
                // Note cell; notes take priority over the playhead line
                let is_start = note.start_time >= t0 && note.start_time < t1;
                let is_dragged = dragging == Some(note.id);
                let is_sounding = playing && note.is_active_at(position);

                let bg = if is_sounding {
                    Color::White
                } else if is_dragged {
                    Color::Cyan
                } else if note.selected {
                    Color::Magenta
                } else {
                    Color::Green
                };

                let ch = if is_start { '[' } else { '=' };
                (ch, Style::default().fg(Color::Black).bg(bg))
            } else if is_playhead {
                (
                    '|',
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else {
                // Grid background
                let bg = if black_key {
                    Color::Rgb(30, 30, 30)
                } else {
                    Color::Rgb(40, 40, 40)
                };

                let (ch, fg) = if super::second_in_column(t0, t1).is_some() {
                    ('|', Color::DarkGray)
                } else {
                    ('.', Color::Rgb(60, 60, 60))
                };

                (ch, Style::default().fg(fg).bg(bg))
            };

            grid_line.push(Span::styled(ch.to_string(), style));
        }

        frame.render_widget(
            Paragraph::new(Line::from(grid_line)),
            Rect::new(inner.x + KEY_LABEL_WIDTH, y, grid_width, 1),
        );
    }
}
